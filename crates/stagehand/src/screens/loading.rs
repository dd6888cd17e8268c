use crate::{
    error::Result,
    geom::Size,
    node::NodeRef,
    screens::{MainMenuView, centered_control},
    ui::UiHandle,
    view::{Screen, View},
    widgets::ProgressBar,
};

/// Shown while the application core loads its resources.
pub struct LoadingScreen {
    /// Load progress.
    progress: ProgressBar,
}

impl Screen for LoadingScreen {
    const NAME: &'static str = "loading";

    fn create(ui: &UiHandle) -> Result<Self> {
        Ok(Self {
            progress: ProgressBar::new(ui, "progress"),
        })
    }

    fn children(&self) -> Vec<NodeRef> {
        vec![self.progress.node()]
    }

    fn layout(&self, size: Size) -> Result<()> {
        let (control, at) = centered_control(size);
        self.progress.set_size(control)?;
        self.progress.set_position(at)
    }
}

impl View<LoadingScreen> {
    /// The progress indicator.
    pub fn progress_indicator(&self) -> &ProgressBar {
        &self.screen().progress
    }

    /// Move on to the main menu. The menu is bound and queued for display
    /// before its presenter is built.
    pub fn transition_to_main_menu_view(&self) -> Result<MainMenuView> {
        let next = MainMenuView::new(self.core().ui())?;
        self.transition_to(&next)?;
        next.set_presenter(self.context().bind_to_main_menu_view(&next));
        Ok(next)
    }
}
