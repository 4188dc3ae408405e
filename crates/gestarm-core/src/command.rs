//! Commands emitted to the arm driver
//!
//! Commands are fire-and-forget: the core never waits for completion.

use crate::Vec3;

/// One manipulator command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Move the arm end effector to an absolute position (mm)
    MoveAbsolute { x: f64, y: f64, z: f64 },
    /// Move the rail carriage to a lateral offset (mm of travel)
    MoveRail { lateral: f64 },
    /// `closed = true` closes the gripper jaws
    SetGripper { closed: bool },
    SetRailEnabled { enabled: bool },
}

impl Command {
    pub fn move_to(target: Vec3) -> Self {
        Command::MoveAbsolute {
            x: target.x,
            y: target.y,
            z: target.z,
        }
    }

    /// Motion commands may be superseded by a newer one; discrete
    /// commands (gripper, rail enable) must all be delivered.
    pub fn is_motion(&self) -> bool {
        matches!(self, Command::MoveAbsolute { .. } | Command::MoveRail { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::MoveAbsolute { .. } => "move-absolute",
            Command::MoveRail { .. } => "move-rail",
            Command::SetGripper { .. } => "set-gripper",
            Command::SetRailEnabled { .. } => "set-rail-enabled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_classification() {
        assert!(Command::move_to(Vec3::new(200.0, 0.0, 50.0)).is_motion());
        assert!(Command::MoveRail { lateral: 10.0 }.is_motion());
        assert!(!Command::SetGripper { closed: true }.is_motion());
        assert!(!Command::SetRailEnabled { enabled: false }.is_motion());
    }
}
