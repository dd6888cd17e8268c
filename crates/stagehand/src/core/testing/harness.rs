use std::sync::Arc;

use crate::{
    context::ApplicationContext,
    error::Result,
    geom::Point,
    scene::{Scene, SceneConfig},
    screens::LoadingView,
    ui::{UiHandle, UiLoop},
};

/// A scene driven by the test thread. The thread that builds the harness is
/// the UI thread, so synchronous calls run inline and queued work runs when
/// the test calls [`Harness::drain`].
pub struct Harness {
    /// The UI loop, owned by the test thread.
    pub ui: UiLoop,
    /// The scene under test.
    pub scene: Scene,
}

impl Harness {
    /// A harness with a top-left native origin.
    pub fn new() -> Result<Self> {
        Self::with_config(SceneConfig::default())
    }

    /// A harness with the given scene configuration.
    pub fn with_config(config: SceneConfig) -> Result<Self> {
        let ui = UiLoop::new();
        let scene = Scene::new(ui.handle(), config);
        Ok(Self { ui, scene })
    }

    /// A handle onto the harness loop.
    pub fn ui(&self) -> UiHandle {
        self.ui.handle()
    }

    /// Run everything queued so far and return how many tasks ran.
    pub fn drain(&self) -> Result<usize> {
        self.ui.run_pending()
    }

    /// Resize the scene and drain.
    pub fn resize(&self, width: f64, height: f64) -> Result<()> {
        self.scene.resize(width, height)?;
        self.drain()?;
        Ok(())
    }

    /// Launch the loading view against `context` and drain, so the view is
    /// attached when this returns.
    pub fn launch(&self, context: Arc<dyn ApplicationContext>) -> Result<LoadingView> {
        let view = self.scene.launch(context)?;
        self.drain()?;
        Ok(view)
    }

    /// Press and release at native `(x, y)`, then drain. Returns true if a
    /// node took the press.
    pub fn click_at(&self, x: f64, y: f64) -> Result<bool> {
        let hit = self.scene.pointer_down(x, y)?;
        self.scene.pointer_up(x, y)?;
        self.drain()?;
        Ok(hit)
    }

    /// Drag from `from` to `to` in native coordinates with `steps` moves in
    /// between, then drain. Returns true if a node took the press.
    pub fn drag(&self, from: Point, to: Point, steps: usize) -> Result<bool> {
        let hit = self.scene.pointer_down(from.x, from.y)?;
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            self.scene
                .pointer_move(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)?;
        }
        self.scene.pointer_up(to.x, to.y)?;
        self.drain()?;
        Ok(hit)
    }
}
