use std::{fmt::Display, result::Result as StdResult, sync::mpsc};

use thiserror::Error;
use tracing::error;

/// Result type for stagehand operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("precondition violated: {0}")]
    /// A caller broke an API contract.
    Precondition(String),
    #[error("resource load: {0}")]
    /// A required asset could not be loaded.
    ResourceLoad(String),
    #[error("runloop: {0}")]
    /// The UI loop is gone or refused the hand-off.
    RunLoop(String),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("internal: {0}")]
    /// Internal error.
    Internal(String),
}

impl From<mpsc::RecvError> for Error {
    fn from(e: mpsc::RecvError) -> Self {
        Self::RunLoop(e.to_string())
    }
}

impl<T> From<mpsc::SendError<T>> for Error {
    fn from(_: mpsc::SendError<T>) -> Self {
        Self::RunLoop("ui loop has shut down".into())
    }
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}

/// Abort on a programmer error. The message is logged before the panic so it
/// survives hosts that swallow panic output.
#[track_caller]
pub fn precondition(msg: impl Display) -> ! {
    let err = Error::Precondition(msg.to_string());
    error!("{err}");
    panic!("{err}");
}

/// Abort on an unrecoverable failure, such as a missing asset the application
/// cannot run without.
#[track_caller]
pub fn fatal(err: Error) -> ! {
    error!("fatal: {err}");
    panic!("fatal: {err}");
}
