use std::{
    sync::{Arc, Condvar, Mutex, OnceLock, PoisonError},
    time::Duration,
};

use stagehand::{
    ApplicationContext, Presenter,
    error::{self, Error},
    screens::{GameView, LoadingView, MainMenuView},
    texture::SystemView,
};
use tracing::info;

use crate::{
    presenter::{GamePresenter, LoadingPresenter, MainMenuPresenter},
    table::Table,
    textures::Textures,
};

/// The hand dealt when no other is given.
pub const DEFAULT_HAND: &[&str] = &["four", "four", "four", "four"];

/// How far the application has got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Loading resources.
    Loading,
    /// Showing the main menu.
    MainMenu,
    /// Playing.
    Game,
}

/// The current stage, with a way to wait for it to move on.
#[derive(Debug)]
pub struct Stages {
    /// Current stage.
    stage: Mutex<Stage>,
    /// Signalled on every advance.
    changed: Condvar,
}

impl Stages {
    /// Start out loading.
    fn new() -> Self {
        Self {
            stage: Mutex::new(Stage::Loading),
            changed: Condvar::new(),
        }
    }

    /// Move on to `stage`.
    pub fn advance(&self, stage: Stage) {
        *self.stage.lock().unwrap_or_else(PoisonError::into_inner) = stage;
        info!(?stage, "stage");
        self.changed.notify_all();
    }

    /// The current stage.
    pub fn current(&self) -> Stage {
        *self.stage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait up to `timeout` for the application to reach `stage`. Returns
    /// false on timeout.
    pub fn wait_for(&self, stage: Stage, timeout: Duration) -> bool {
        let guard = self.stage.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .changed
            .wait_timeout_while(guard, timeout, |s| *s < stage)
            .unwrap_or_else(PoisonError::into_inner);
        *guard >= stage
    }
}

/// A stand-in application core: loads textures, then runs a card table with
/// no rules.
pub struct DemoCore {
    /// Host services.
    system: SystemView,
    /// Set once loading finishes.
    textures: Arc<OnceLock<Arc<Textures>>>,
    /// Progress through the views.
    stages: Arc<Stages>,
    /// Faces to deal.
    hand: Vec<&'static str>,
    /// The most recently dealt table.
    table: Mutex<Option<Table>>,
}

impl DemoCore {
    /// A core dealing [`DEFAULT_HAND`].
    pub fn new(system: SystemView) -> Arc<Self> {
        Self::with_hand(system, DEFAULT_HAND.to_vec())
    }

    /// A core dealing `hand`.
    pub fn with_hand(system: SystemView, hand: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            system,
            textures: Arc::new(OnceLock::new()),
            stages: Arc::new(Stages::new()),
            hand,
            table: Mutex::new(None),
        })
    }

    /// Progress through the views.
    pub fn stages(&self) -> &Stages {
        &self.stages
    }

    /// Wait up to `timeout` for `stage`.
    pub fn wait_for(&self, stage: Stage, timeout: Duration) -> bool {
        self.stages.wait_for(stage, timeout)
    }

    /// The loaded textures, once loading has finished.
    pub fn textures(&self) -> Option<Arc<Textures>> {
        self.textures.get().cloned()
    }

    /// The most recently dealt table.
    pub fn table(&self) -> Option<Table> {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ApplicationContext for DemoCore {
    fn bind_to_loading_view(&self, view: &LoadingView) -> Presenter {
        Box::new(LoadingPresenter::start(
            view.clone(),
            self.system.clone(),
            self.textures.clone(),
            self.stages.clone(),
        ))
    }

    fn bind_to_main_menu_view(&self, view: &MainMenuView) -> Presenter {
        match MainMenuPresenter::start(view, self.stages.clone()) {
            Ok(p) => Box::new(p),
            Err(e) => error::fatal(e),
        }
    }

    fn bind_to_game_view(&self, view: &GameView) -> Presenter {
        let Some(textures) = self.textures.get() else {
            error::precondition("game view bound before textures were loaded");
        };
        match GamePresenter::start(view, textures, &self.hand) {
            Ok(p) => {
                *self.table.lock().unwrap_or_else(PoisonError::into_inner) =
                    Some(p.table().clone());
                Box::new(p)
            }
            Err(e) => error::fatal(Error::Internal(format!("dealing: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn stages_wait_and_time_out() {
        let stages = Arc::new(Stages::new());
        assert_eq!(stages.current(), Stage::Loading);
        assert!(!stages.wait_for(Stage::MainMenu, Duration::from_millis(10)));
        let s = stages.clone();
        let t = thread::spawn(move || s.advance(Stage::Game));
        assert!(stages.wait_for(Stage::MainMenu, Duration::from_secs(10)));
        t.join().unwrap();
        assert_eq!(stages.current(), Stage::Game);
    }
}
