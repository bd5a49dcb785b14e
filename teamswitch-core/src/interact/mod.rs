//! Interact point spawn and removal policy

pub mod lifecycle;

// Re-export key types for convenience
pub use lifecycle::{
    InteractPointLifecycle, RemovalOutcome, RemovalReason, SkipReason, SpawnOutcome,
};
