//! A headless application core for stagehand: loads textures, shows the
//! main menu and deals a table of draggable cards.

/// The application context and stage tracking.
pub mod app;
/// Presenters for the loading, main menu and game views.
pub mod presenter;
/// Card placement and dragging.
pub mod table;
/// In-memory textures and atlas slicing.
pub mod textures;

pub use app::{DemoCore, Stage};
