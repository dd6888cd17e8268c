#![allow(clippy::new_without_default)]
//! Core runtime for the stagehand presentation layer.

/// UI-thread confined shared state.
pub mod confined;
/// The application context that builds presenters.
pub mod context;
/// Core error types.
pub mod error;
/// Click, drag and layout handler interfaces.
pub mod handler;
/// Pointer input translation and delivery.
pub mod input;
/// Scene graph nodes.
pub mod node;
/// Handler registration tokens.
pub mod registration;
/// Handler registries.
pub mod registry;
/// The hosting scene.
pub mod scene;
/// Colours.
pub mod style;
/// Testing utilities.
pub mod testing;
/// Textures and texture loading.
pub mod texture;
/// View transitions.
pub mod transition;
/// The UI thread and its task queue.
pub mod ui;
/// Views and their presenter binding.
pub mod view;
