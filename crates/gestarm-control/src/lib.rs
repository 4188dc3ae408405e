//! GESTARM Control - Mode coordination
//!
//! The coordinator is the hub of the pipeline. Once per frame it:
//! 1. Validates the landmark frame
//! 2. On every Nth frame, classifies the gesture and applies it
//!    (tracking toggle on a rising edge with cooldown, mode select, gripper)
//! 3. While tracking, maps the palm into the arm frame, predicts ahead,
//!    validates the prediction for the active mode and emits a motion command
//!
//! It owns all session state: tracking flag, control mode, the previous
//! tick's gesture for edge detection, the cooldown deadline and the motion
//! history. Commands go out through the `ArmDriver` capability trait.

pub mod cooldown;
pub mod coordinator;
pub mod driver;
pub mod source;

pub use cooldown::*;
pub use coordinator::*;
pub use driver::*;
pub use source::*;
