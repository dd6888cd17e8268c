//! Geometry primitives used across stagehand.
//!
//! All coordinates are floating point scene units. The scene convention is
//! that the origin sits at the top-left of a node and positive Y runs up, so
//! content that hangs below a node has negative Y.

/// Error types for geometry operations.
mod error;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use error::{Error, Result};
pub use point::Point;
pub use rect::Rect;
pub use size::Size;
