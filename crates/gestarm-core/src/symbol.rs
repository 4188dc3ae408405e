//! Discrete gesture symbols and control state

use serde::{Deserialize, Serialize};

/// Result of classifying one hand frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureSymbol {
    /// No known pattern matched
    #[default]
    None,
    ToggleTracking,
    SelectRailMode,
    SelectArmMode,
    CloseGripper,
    OpenGripper,
}

impl GestureSymbol {
    pub fn is_none(self) -> bool {
        self == GestureSymbol::None
    }

    pub fn name(self) -> &'static str {
        match self {
            GestureSymbol::None => "none",
            GestureSymbol::ToggleTracking => "toggle-tracking",
            GestureSymbol::SelectRailMode => "select-rail",
            GestureSymbol::SelectArmMode => "select-arm",
            GestureSymbol::CloseGripper => "close-gripper",
            GestureSymbol::OpenGripper => "open-gripper",
        }
    }
}

/// Which motion subsystem receives position commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Linear rail translation
    #[default]
    Rail,
    /// Rotary arm positioning
    Arm,
}

/// Whether hand motion is being forwarded to the manipulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackingState {
    #[default]
    Idle,
    Tracking,
}

impl TrackingState {
    pub fn toggled(self) -> Self {
        match self {
            TrackingState::Idle => TrackingState::Tracking,
            TrackingState::Tracking => TrackingState::Idle,
        }
    }

    pub fn is_tracking(self) -> bool {
        self == TrackingState::Tracking
    }
}

/// Per-frame status surfaced to the display layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackingIndicator {
    /// A motion command was issued this frame
    Tracking,
    /// Idle, no hand, or the target was out of range
    #[default]
    NotTracking,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracking_toggle() {
        assert_eq!(TrackingState::Idle.toggled(), TrackingState::Tracking);
        assert_eq!(TrackingState::Tracking.toggled(), TrackingState::Idle);
        assert!(!TrackingState::default().is_tracking());
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&ControlMode::Arm).unwrap();
        assert_eq!(json, "\"arm\"");
        let mode: ControlMode = serde_json::from_str("\"rail\"").unwrap();
        assert_eq!(mode, ControlMode::Rail);
    }
}
