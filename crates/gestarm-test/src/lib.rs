//! GESTARM Test Harness - Simulated operator sessions
//!
//! This crate provides:
//! - Recording and failing arm drivers
//! - Gesture scripts that build landmark frame sequences
//! - Detector chaos (landmark jitter, dropouts, malformed frames)
//! - Scenario runner and end-to-end tests

pub mod chaos;
pub mod drivers;
pub mod scenario;
pub mod script;

pub use chaos::*;
pub use drivers::*;
pub use scenario::*;
pub use script::*;
