//! GESTARM Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every stage of the
//! landmark → gesture → motion → arm pipeline:
//! - Geometry helpers (distances, angles, Vec3)
//! - Hand landmarks and landmark frames
//! - Gesture symbols, control modes and tracking state
//! - Arm commands
//! - Time primitives (Timestamp)
//! - Configuration and error types

pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod landmark;
pub mod symbol;
pub mod time;

pub use command::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use landmark::*;
pub use symbol::*;
pub use time::*;
