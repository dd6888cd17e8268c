use std::any::Any;

use crate::screens::{GameView, LoadingView, MainMenuView};

/// An opaque presenter supplied by the application core. Views own exactly
/// one at a time and never look inside it.
pub type Presenter = Box<dyn Any + Send>;

/// The application core's side of view binding. One instance is shared by
/// every view for the life of the application.
///
/// Each method builds the presenter for a freshly created view. The returned
/// presenter is handed straight to that view with `set_presenter`.
pub trait ApplicationContext: Send + Sync + 'static {
    /// Build the presenter for the loading screen.
    fn bind_to_loading_view(&self, view: &LoadingView) -> Presenter;

    /// Build the presenter for the main menu.
    fn bind_to_main_menu_view(&self, view: &MainMenuView) -> Presenter;

    /// Build the presenter for the game screen.
    fn bind_to_game_view(&self, view: &GameView) -> Presenter;
}
