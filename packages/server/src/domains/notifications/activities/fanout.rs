//! Notification fan-out: one row per affected recipient per trigger.

use tracing::{debug, warn};

use crate::common::{CoreResult, UserId};
use crate::domains::notifications::models::{Notification, NotificationKind};
use crate::kernel::ServerDeps;

/// The recipients that actually get a row: stakeholders minus the actor.
pub fn fanout_recipients(stakeholders: &[UserId], actor: UserId) -> Vec<UserId> {
    stakeholders
        .iter()
        .copied()
        .filter(|recipient| *recipient != actor)
        .collect()
}

/// Create one notification per recipient, excluding the actor.
///
/// There is no cross-recipient transaction: a failed insert is logged and
/// the remaining recipients still get theirs. Returns the number created.
pub async fn emit(
    stakeholders: &[UserId],
    actor: UserId,
    kind: NotificationKind,
    text: &str,
    url: &str,
    deps: &ServerDeps,
) -> CoreResult<u64> {
    let recipients = fanout_recipients(stakeholders, actor);
    let mut created = 0u64;

    for recipient in recipients {
        match Notification::create(recipient, kind, text, url, &deps.db_pool).await {
            Ok(_) => created += 1,
            Err(e) => {
                warn!(%recipient, %kind, "notification insert failed: {e:#}");
            }
        }
    }

    debug!(%actor, %kind, created, "notification fan-out complete");
    Ok(created)
}
