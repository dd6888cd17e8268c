use std::{
    sync::{Arc, OnceLock},
    thread::{self, JoinHandle},
};

use stagehand::{
    Registrations,
    error::{self, Error, Result},
    handler::DragFns,
    screens::{GameView, LoadingView, MainMenuView},
    texture::SystemView,
    widgets::{HasIntValue, HasText},
};
use tracing::{debug, warn};

use crate::{
    app::{Stage, Stages},
    table::Table,
    textures::Textures,
};

/// Log a failed fire-and-forget update. Handlers have nowhere to return
/// errors to.
fn log_failure(what: &str, res: Result<()>) {
    if let Err(e) = res {
        warn!("{what}: {e}");
    }
}

/// Loads textures on a worker thread, reporting progress on the loading
/// view, then moves on to the main menu.
pub struct LoadingPresenter {
    /// The loader thread. Never joined: the thread retires this presenter's
    /// view, and with it the presenter.
    worker: JoinHandle<()>,
}

impl LoadingPresenter {
    /// Label the progress bar and start loading. Failing to start the loader
    /// thread is fatal.
    pub fn start(
        view: LoadingView,
        system: SystemView,
        textures: Arc<OnceLock<Arc<Textures>>>,
        stages: Arc<Stages>,
    ) -> Self {
        log_failure(
            "progress label",
            view.progress_indicator().set_text("Loading..."),
        );
        let worker = thread::Builder::new()
            .name("loader".into())
            .spawn(move || load(&view, &system, &textures, &stages));
        match worker {
            Ok(worker) => Self { worker },
            Err(e) => error::fatal(Error::Internal(format!("spawning loader: {e}"))),
        }
    }

    /// Has the loader thread finished?
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }
}

impl Drop for LoadingPresenter {
    fn drop(&mut self) {
        debug!("loading presenter dropped");
    }
}

/// Body of the loader thread.
fn load(
    view: &LoadingView,
    system: &SystemView,
    textures: &OnceLock<Arc<Textures>>,
    stages: &Stages,
) {
    let bar = view.progress_indicator();
    let loaded = match Textures::load(system, |p| {
        log_failure("progress", bar.set_int_value((p * 100.0).round() as i64));
    }) {
        Ok(t) => t,
        Err(e) => error::fatal(e),
    };
    if textures.set(Arc::new(loaded)).is_err() {
        debug!("textures already loaded");
    }
    match view.transition_to_main_menu_view() {
        Ok(_) => stages.advance(Stage::MainMenu),
        Err(e) => warn!("moving to the main menu: {e}"),
    }
}

/// Labels the start button and starts a game when it is clicked.
pub struct MainMenuPresenter {
    /// Handlers on the menu, removed when the presenter goes.
    registrations: Registrations,
}

impl MainMenuPresenter {
    /// Bind to `view`.
    pub fn start(view: &MainMenuView, stages: Arc<Stages>) -> Result<Self> {
        let button = view.start_new_game_button();
        button.set_text("New Game")?;
        let mut registrations = Registrations::scoped();
        let menu = view.clone();
        registrations.push(button.add_click_handler(Arc::new(move || {
            match menu.transition_to_game_view() {
                Ok(_) => stages.advance(Stage::Game),
                Err(e) => warn!("starting a game: {e}"),
            }
        }))?);
        Ok(Self { registrations })
    }

    /// Number of handlers this presenter holds.
    pub fn handler_count(&self) -> usize {
        self.registrations.len()
    }
}

impl Drop for MainMenuPresenter {
    fn drop(&mut self) {
        debug!("main menu presenter dropped");
    }
}

/// Deals a hand of cards, keeps them laid out, and lets the player drag them
/// around.
pub struct GamePresenter {
    /// The dealt cards.
    table: Table,
    /// Handlers on the game view, removed when the presenter goes.
    registrations: Registrations,
}

impl GamePresenter {
    /// Deal `hand` onto `view` and register layout and drag handlers.
    pub fn start(view: &GameView, textures: &Textures, hand: &[&'static str]) -> Result<Self> {
        let table = Table::deal(view, textures, hand)?;
        let mut registrations = Registrations::scoped();

        let t = table.clone();
        registrations.push(view.add_layout_handler(Arc::new(move |w: i64, h: i64| {
            log_failure("card layout", t.layout(w, h));
        }))?);

        let (grab, drag, release) = (table.clone(), table.clone(), table.clone());
        let drags = DragFns::new()
            .on_start(move |e| {
                if grab.grab(e.local) {
                    debug!(x = e.local.x, y = e.local.y, "card picked up");
                }
            })
            .on_move(move |e| log_failure("card drag", drag.drag_to(e.local)))
            .on_end(move |_| release.release());
        registrations.push(view.add_drag_handler(Arc::new(drags))?);

        Ok(Self {
            table,
            registrations,
        })
    }

    /// The dealt cards.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Number of handlers this presenter holds.
    pub fn handler_count(&self) -> usize {
        self.registrations.len()
    }
}

impl Drop for GamePresenter {
    fn drop(&mut self) {
        debug!("game presenter dropped");
    }
}
