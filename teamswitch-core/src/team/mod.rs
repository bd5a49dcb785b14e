//! Team assignment

pub mod assignment;

pub use assignment::TeamAssignmentService;
