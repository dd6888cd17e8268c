//! Stagehand: a small presentation layer for card-table style games.
//!
//! A [`Scene`] hosts exactly one full-screen view at a time. Views are built
//! by the crate and bound to presenters supplied by an
//! [`ApplicationContext`]; presenters drive the view through thread-safe
//! widget handles and receive input through registered handlers.
//!
//! # Module Organization
//!
//! - [`ui`] - The UI thread, its task queue and [`UiHandle`]
//! - [`view`] - Generic views and presenter binding
//! - [`screens`] - The loading, main menu and game views
//! - [`widgets`] - Buttons, progress bars and sprites
//! - [`geom`] - Geometry primitives

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub mod prelude;
pub mod screens;
pub mod widgets;

pub use geom;

pub use core::{
    confined, context, error, handler, input, node, registration, registry, scene, style, testing,
    texture, transition, ui, view,
};
pub use core::{
    context::{ApplicationContext, Presenter},
    registration::{HandlerRegistration, Registrations},
    scene::{Scene, SceneConfig},
    ui::{UiHandle, UiLoop, UiThread},
    view::{Screen, View},
};
