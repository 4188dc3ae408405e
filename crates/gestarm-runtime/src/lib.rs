//! GESTARM Runtime - Session orchestration
//!
//! Drives the pipeline one camera frame at a time:
//! 1. Read the session clock
//! 2. Pull a landmark frame from the source
//! 3. Run the mode coordinator
//! 4. Dispatch the resulting commands to the driver
//!
//! Slow hardware can be put behind `AsyncDriver`, a tokio worker that keeps
//! every discrete command but only the newest motion target.

pub mod clock;
pub mod error;
pub mod logging;
pub mod session;
pub mod worker;

pub use clock::*;
pub use error::*;
pub use logging::*;
pub use session::*;
pub use worker::*;
