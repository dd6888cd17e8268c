use std::{error::Error as StdError, fmt, result::Result as StdResult};

/// Geometry error type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// A dimension was NaN or infinite.
    NonFiniteSize {
        /// Offending width.
        w: f64,
        /// Offending height.
        h: f64,
    },
    /// A dimension was below zero.
    NegativeSize {
        /// Offending width.
        w: f64,
        /// Offending height.
        h: f64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteSize { w, h } => write!(f, "non-finite size {w}x{h}"),
            Self::NegativeSize { w, h } => write!(f, "negative size {w}x{h}"),
        }
    }
}

impl StdError for Error {}

/// Result type for geometry operations.
pub type Result<T> = StdResult<T, Error>;
