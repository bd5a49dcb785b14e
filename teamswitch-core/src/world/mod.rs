//! Host world abstraction

pub mod mock;
pub mod traits;

// Re-export key types for convenience
pub use mock::{MockObject, MockSoldier, MockWorld, WorldCall};
pub use traits::World;
