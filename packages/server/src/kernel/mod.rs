// Kernel: shared dependency container for activities

pub mod deps;

pub use deps::ServerDeps;
