//! Per-player session records

pub mod state;
pub mod store;

// Re-export key types for convenience
pub use state::{InteractPoint, PlayerSession};
pub use store::PlayerSessionStore;
