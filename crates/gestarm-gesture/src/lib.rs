//! GESTARM Gesture - Discrete hand gestures from landmark geometry
//!
//! One frame in, one symbol out. Each gesture is a pattern over per-finger
//! open/closed states plus a thumb distance rule; patterns are checked in a
//! fixed priority order and the first match wins.
//!
//! Fingers are judged by vertical displacement of the tip above the
//! knuckle, the thumb by planar distance to a reference landmark.

pub mod classifier;
pub mod finger;
pub mod pattern;
pub mod synth;

pub use classifier::*;
pub use finger::*;
pub use pattern::*;
pub use synth::*;
