//! Configuration
//!
//! Every tunable the pipeline consumes lives here with its calibrated
//! default. Loading from disk is the host application's job; these structs
//! only deserialize and validate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult, ControlMode, Vec3};

/// Gesture classifier configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Open/closed threshold in normalized image units
    pub threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

/// Linear rail configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RailConfig {
    /// Lowest commandable carriage offset (mm)
    pub min_travel: f64,
    /// Highest commandable carriage offset (mm)
    pub max_travel: f64,
    /// Arm pose held while the rail moves
    pub arm_pose: Vec3,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            min_travel: 0.0,
            max_travel: 1000.0,
            arm_pose: Vec3::new(200.0, 0.0, 0.0),
        }
    }
}

/// Reachable envelope of the rotary arm
///
/// The distance polynomials come from physical calibration of the joint
/// limits. Coefficients are highest order first and are evaluated in `z`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmEnvelopeConfig {
    /// Shoulder to elbow (mm)
    pub upper_link: f64,
    /// Elbow to end effector (mm)
    pub lower_link: f64,
    /// Allowed base rotation (degrees)
    pub horizontal_limits: (f64, f64),
    /// Allowed elevation (degrees)
    pub vertical_limits: (f64, f64),
    /// Elevation where the minimum-distance fit switches (degrees)
    pub min_distance_pivot: f64,
    /// Minimum distance used exactly at the pivot or at z = 0
    pub min_distance_boundary: f64,
    /// Minimum distance above the pivot
    pub min_distance_cubic: [f64; 4],
    /// Minimum distance below the pivot
    pub min_distance_quadratic: [f64; 3],
    /// Elevation where the maximum-distance fit switches (degrees)
    pub max_distance_pivot: f64,
    /// Maximum distance used exactly at the pivot
    pub max_distance_boundary: f64,
    /// Maximum distance below the pivot
    pub max_distance_quadratic: [f64; 3],
    /// Subtracted from both distance bounds (mm)
    pub safety_margin: f64,
    /// Decimal places angles and distances are rounded to before comparison
    pub rounding_places: i32,
}

impl Default for ArmEnvelopeConfig {
    fn default() -> Self {
        Self {
            upper_link: 135.0,
            lower_link: 147.0,
            horizontal_limits: (-90.0, 90.0),
            vertical_limits: (-30.0, 41.67),
            min_distance_pivot: 27.3,
            min_distance_boundary: 111.0,
            min_distance_cubic: [0.00002, -0.00778, 1.66028, 110.66023],
            min_distance_quadratic: [-0.0019, -1.1724, 112.1743],
            max_distance_pivot: -3.5,
            max_distance_boundary: 327.0,
            max_distance_quadratic: [-0.02395, -4.38796, 124.43856],
            safety_margin: 10.0,
            rounding_places: 2,
        }
    }
}

impl ArmEnvelopeConfig {
    /// Fully extended reach (mm)
    pub fn max_reach(&self) -> f64 {
        self.upper_link + self.lower_link
    }
}

/// Motion predictor configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// How far ahead to extrapolate
    pub horizon: Duration,
    /// Sampling intervals shorter than this are clamped up to it
    pub min_interval: Duration,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            horizon: Duration::from_millis(100),
            min_interval: Duration::from_millis(1),
        }
    }
}

/// Mapping from normalized palm coordinates into the arm frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceMappingConfig {
    /// Image y span mapped onto arm x (mm)
    pub forward_span: f64,
    pub forward_offset: f64,
    /// Image x span mapped onto arm y (mm)
    pub lateral_span: f64,
    pub lateral_offset: f64,
    /// Wrist to middle-knuckle distance treated as farthest from the camera
    pub depth_near_span: f64,
    /// Wrist to middle-knuckle distance treated as closest to the camera
    pub depth_far_span: f64,
    /// Depth output range (mm), centered on zero
    pub depth_range: f64,
    /// Smooth palm x/y with a running average
    pub averaging: bool,
    /// Departure from the average (mm) that restarts averaging
    pub averaging_jump: f64,
}

impl Default for WorkspaceMappingConfig {
    fn default() -> Self {
        Self {
            forward_span: 516.0,
            forward_offset: -16.0,
            lateral_span: 760.0,
            lateral_offset: -380.0,
            depth_near_span: 0.3,
            depth_far_span: 0.5,
            depth_range: 180.0,
            averaging: false,
            averaging_jump: 55.0,
        }
    }
}

/// Mode coordinator configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Classify gestures every Nth frame
    pub gesture_interval: u32,
    /// Gesture processing pause after a tracking toggle
    pub cooldown: Duration,
    /// Control mode at session start
    pub default_mode: ControlMode,
    /// Arm position commanded at startup
    pub home_position: Vec3,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            gesture_interval: 10,
            cooldown: Duration::from_secs(2),
            default_mode: ControlMode::Rail,
            home_position: Vec3::new(200.0, 0.0, 50.0),
        }
    }
}

/// Complete pipeline configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestarmConfig {
    pub gesture: GestureConfig,
    pub arm: ArmEnvelopeConfig,
    pub rail: RailConfig,
    pub predictor: PredictorConfig,
    pub mapping: WorkspaceMappingConfig,
    pub control: ControlConfig,
}

impl GestarmConfig {
    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: GestarmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.gesture.threshold > 0.0 && self.gesture.threshold.is_finite()) {
            return Err(ConfigError::invalid(
                "gesture.threshold",
                format!("must be positive, got {}", self.gesture.threshold),
            ));
        }

        if self.rail.min_travel > self.rail.max_travel {
            return Err(ConfigError::invalid(
                "rail",
                format!(
                    "min_travel {} exceeds max_travel {}",
                    self.rail.min_travel, self.rail.max_travel
                ),
            ));
        }

        let (h_lo, h_hi) = self.arm.horizontal_limits;
        if h_lo > h_hi {
            return Err(ConfigError::invalid(
                "arm.horizontal_limits",
                format!("({}, {}) is empty", h_lo, h_hi),
            ));
        }
        let (v_lo, v_hi) = self.arm.vertical_limits;
        if v_lo > v_hi {
            return Err(ConfigError::invalid(
                "arm.vertical_limits",
                format!("({}, {}) is empty", v_lo, v_hi),
            ));
        }
        if self.arm.upper_link <= 0.0 || self.arm.lower_link <= 0.0 {
            return Err(ConfigError::invalid("arm", "link lengths must be positive"));
        }
        if self.arm.safety_margin < 0.0 {
            return Err(ConfigError::invalid("arm.safety_margin", "must not be negative"));
        }

        if self.predictor.min_interval.is_zero() {
            return Err(ConfigError::invalid("predictor.min_interval", "must be non-zero"));
        }

        if self.mapping.depth_far_span <= self.mapping.depth_near_span {
            return Err(ConfigError::invalid(
                "mapping",
                "depth_far_span must exceed depth_near_span",
            ));
        }

        if self.control.gesture_interval == 0 {
            return Err(ConfigError::invalid("control.gesture_interval", "must be at least 1"));
        }

        Ok(())
    }
}
