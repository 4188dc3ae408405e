//! Runtime errors
//!
//! Only startup can fail a session. Once frames are flowing, failures are
//! logged and the loop carries on.

use gestarm_core::{ConfigError, DriverError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Driver connection failed: {0}")]
    Connect(#[source] DriverError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for session setup
pub type SessionResult<T> = Result<T, SessionError>;
