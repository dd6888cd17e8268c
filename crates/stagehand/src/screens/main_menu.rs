use crate::{
    error::Result,
    geom::Size,
    node::NodeRef,
    screens::{GameView, centered_control},
    style::Color,
    ui::UiHandle,
    view::{Screen, View},
    widgets::Button,
};

/// The main menu: a single start button.
pub struct MainMenuScreen {
    /// Starts a new game.
    start_new_game: Button,
}

impl Screen for MainMenuScreen {
    const NAME: &'static str = "main_menu";

    fn create(ui: &UiHandle) -> Result<Self> {
        let start_new_game = Button::new(ui, "start_new_game");
        start_new_game.set_fill_color(Color::Cyan)?;
        Ok(Self { start_new_game })
    }

    fn children(&self) -> Vec<NodeRef> {
        vec![self.start_new_game.node()]
    }

    fn layout(&self, size: Size) -> Result<()> {
        let (control, at) = centered_control(size);
        self.start_new_game.set_size(control)?;
        self.start_new_game.set_position(at)
    }
}

impl View<MainMenuScreen> {
    /// The start button.
    pub fn start_new_game_button(&self) -> &Button {
        &self.screen().start_new_game
    }

    /// Move on to the game. The game is bound and queued for display before
    /// its presenter is built.
    pub fn transition_to_game_view(&self) -> Result<GameView> {
        let next = GameView::new(self.core().ui())?;
        self.transition_to(&next)?;
        next.set_presenter(self.context().bind_to_game_view(&next));
        Ok(next)
    }
}
