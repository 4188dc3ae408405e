//! GESTARM Reach - Is this target commandable?
//!
//! The rail accepts any offset within its physical travel. The arm envelope
//! is non-convex: base rotation and elevation are bounded by fixed angle
//! limits, and the allowed reach between them is bounded by distance limits
//! that are themselves piecewise polynomial fits of height, switching at
//! calibrated elevation angles.
//!
//! The piecewise boundaries (strict `<` / `>` with a fixed value exactly at
//! the pivot) are a safety property of the arm near its joint limits and
//! are preserved as calibrated.

pub mod envelope;
pub mod validator;

pub use envelope::*;
pub use validator::*;
