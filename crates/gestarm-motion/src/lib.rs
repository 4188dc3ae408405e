//! GESTARM Motion - Where will the hand be?
//!
//! Landmark frames are mapped into the arm's millimeter frame, optionally
//! smoothed, and extrapolated a short horizon ahead from a two-sample
//! velocity and acceleration estimate to hide sensor and driver latency.
//!
//! Prediction is unbounded. Whether the predicted point is safe to command
//! is decided downstream by the reachability validator.

pub mod mapping;
pub mod predictor;
pub mod smoothing;

pub use mapping::*;
pub use predictor::*;
pub use smoothing::*;
