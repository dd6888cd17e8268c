//! The application's screens: loading, main menu and game.

use crate::{
    geom::{Point, Size},
    view::View,
};

/// Game screen.
pub mod game;
/// Loading screen.
pub mod loading;
/// Main menu.
pub mod main_menu;

pub use game::GameScreen;
pub use loading::LoadingScreen;
pub use main_menu::MainMenuScreen;

/// The loading view.
pub type LoadingView = View<LoadingScreen>;
/// The main menu view.
pub type MainMenuView = View<MainMenuScreen>;
/// The game view.
pub type GameView = View<GameScreen>;

/// Width/height ratio of centred controls.
pub const GOLDEN_RATIO: f64 = 1.618;

/// Fraction of the viewport width a centred control takes.
pub const CONTROL_WIDTH_FRACTION: f64 = 1.0 / 5.0;

/// Size and position of a control centred in a viewport of `size`.
pub fn centered_control(size: Size) -> (Size, Point) {
    let w = size.w * CONTROL_WIDTH_FRACTION;
    (
        Size::new(w, w / GOLDEN_RATIO),
        Point::new(size.w / 2.0, -size.h / 2.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn control_frame() -> Result<()> {
        let (s, p) = centered_control(Size::new(1000.0, 600.0));
        assert_eq!(s.w, 200.0);
        assert!((s.h - 200.0 / 1.618).abs() < 1e-9);
        assert_eq!(p, Point::new(500.0, -300.0));
        Ok(())
    }
}
