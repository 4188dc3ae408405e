//! Error types
//!
//! Per-frame failures are values: the pipeline logs them and issues no
//! command for that frame. Unreachable targets are not errors at all.

use thiserror::Error;

/// Landmark input errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("Invalid landmark frame: expected {expected} points, got {actual}")]
    InvalidInput { expected: usize, actual: usize },
}

/// Motion predictor errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotionError {
    #[error("Degenerate sample: time delta {delta_us}us")]
    DegenerateSample { delta_us: i64 },
}

/// Arm driver errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("Driver not connected")]
    NotConnected,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Command rejected: {0}")]
    CommandRejected(String),

    #[error("Driver I/O error: {0}")]
    Io(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config field {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
