//! Interactive and display nodes used by the built-in screens.
//!
//! Every widget method may be called from any thread. Reads and plain
//! setters block until the UI thread has applied them. Presentation updates
//! (text, progress, textures and animated geometry) are queued and return at
//! once.

use std::time::Duration;

use crate::{error::Result, geom::Size};

/// A push button.
pub mod button;
/// A labelled progress bar.
pub mod progress;
/// A textured sprite.
pub mod sprite;

pub use button::Button;
pub use progress::ProgressBar;
pub use sprite::{Motion, Sprite};

/// Widgets with a text label.
pub trait HasText {
    /// Queue a label change.
    fn set_text(&self, text: &str) -> Result<()>;

    /// The current label.
    fn text(&self) -> Result<String>;
}

/// Widgets showing an integer value.
pub trait HasIntValue {
    /// Queue a value change.
    fn set_int_value(&self, value: i64) -> Result<()>;

    /// The current value.
    fn int_value(&self) -> Result<i64>;
}

/// Widgets whose extent can change.
pub trait HasMutableSize {
    /// Change size over `duration`.
    fn set_size_animated(&self, size: Size, duration: Duration) -> Result<()>;

    /// Change size at once.
    fn set_size(&self, size: Size) -> Result<()> {
        self.set_size_animated(size, Duration::ZERO)
    }
}

/// Widgets that can be moved. Locations are given as the left and top
/// offsets of the widget within its parent, with `top` growing downward.
pub trait HasMutableLocation {
    /// Move over `duration`.
    fn set_location_animated(&self, left: f64, top: f64, duration: Duration) -> Result<()>;

    /// Move at once.
    fn set_location(&self, left: f64, top: f64) -> Result<()> {
        self.set_location_animated(left, top, Duration::ZERO)
    }
}

/// Widgets that can be hidden.
pub trait HasMutableVisibility {
    /// Show or hide the widget.
    fn set_visible(&self, visible: bool) -> Result<()>;
}
