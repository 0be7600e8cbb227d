// Domain modules, one per bounded area of the board.

pub mod conversations;
pub mod notifications;
pub mod posts;
pub mod tags;
pub mod users;
