//! The host: a root node holding exactly one active view, the last known
//! window size, and pointer routing.

use std::sync::{Arc, Weak};

use tracing::{debug, trace, warn};

use crate::{
    confined::Confined,
    context::ApplicationContext,
    error::Result,
    geom::{Point, Size},
    input::{NativeOrigin, PointerInput, PointerPhase, RawPointer},
    node::{NodeCore, NodeRef, hit_test_here},
    screens::LoadingView,
    transition::{HostedView, TransitionService},
    ui::UiHandle,
};

/// Host configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneConfig {
    /// Where the platform puts the window origin.
    pub native_origin: NativeOrigin,
}

/// Host state owned by the UI thread.
#[derive(Default)]
struct HostState {
    /// Last size reported by the host.
    size: Option<Size>,
    /// The active view.
    current: Option<Arc<dyn HostedView>>,
    /// Node receiving the rest of the current gesture.
    captured: Option<NodeRef>,
}

/// Shared body of a [`Scene`].
struct SceneInner {
    /// The UI loop.
    ui: UiHandle,
    /// Root of the scene graph.
    root: NodeCore,
    /// Host state.
    host: Confined<HostState>,
    /// Host configuration.
    config: SceneConfig,
}

/// The top-level container. Cloning gives another handle onto the same scene.
#[derive(Clone)]
pub struct Scene {
    /// Shared body.
    inner: Arc<SceneInner>,
}

impl Scene {
    /// An empty scene on the loop behind `ui`.
    pub fn new(ui: UiHandle, config: SceneConfig) -> Self {
        Self {
            inner: Arc::new(SceneInner {
                root: NodeCore::new(ui.clone(), "root"),
                host: Confined::new(ui.clone(), HostState::default()),
                ui,
                config,
            }),
        }
    }

    /// The UI loop this scene lives on.
    pub fn ui(&self) -> &UiHandle {
        &self.inner.ui
    }

    /// Host configuration.
    pub fn config(&self) -> SceneConfig {
        self.inner.config
    }

    /// A transition service that swaps this scene's active view. The service
    /// does not keep the scene alive.
    pub fn transition_service(&self) -> TransitionService {
        let weak: Weak<SceneInner> = Arc::downgrade(&self.inner);
        TransitionService::new(self.inner.ui.clone(), move |view| {
            if let Some(inner) = weak.upgrade() {
                inner.present_here(view);
            }
        })
    }

    /// Build the loading view, bind it to `context`, queue it for display and
    /// give it its presenter.
    pub fn launch(&self, context: Arc<dyn ApplicationContext>) -> Result<LoadingView> {
        let view = LoadingView::new(&self.inner.ui)?;
        let transitions = self.transition_service();
        view.bind(context.clone(), transitions.clone());
        transitions.transition(view.hosted())?;
        view.set_presenter(context.bind_to_loading_view(&view));
        debug!("launched");
        Ok(view)
    }

    /// Report a new window size, from any thread. The active view is laid
    /// out before this returns.
    pub fn set_size(&self, size: Size) -> Result<()> {
        let inner = self.inner.clone();
        self.inner.ui.run_sync(move || inner.resize_here(size))?
    }

    /// Report a new window size from raw dimensions.
    pub fn resize(&self, width: f64, height: f64) -> Result<()> {
        self.set_size(Size::try_new(width, height)?)
    }

    /// The last reported window size.
    pub fn size(&self) -> Result<Option<Size>> {
        self.inner.host.sync(|h| h.size)
    }

    /// Route a raw pointer event. Returns true if a node took it.
    pub fn pointer(&self, raw: RawPointer) -> Result<bool> {
        let inner = self.inner.clone();
        self.inner.ui.run_sync(move || inner.pointer_here(raw))
    }

    /// Pointer pressed at native `(x, y)`.
    pub fn pointer_down(&self, x: f64, y: f64) -> Result<bool> {
        self.pointer(RawPointer::new(PointerPhase::Down, x, y))
    }

    /// Pointer moved to native `(x, y)`.
    pub fn pointer_move(&self, x: f64, y: f64) -> Result<bool> {
        self.pointer(RawPointer::new(PointerPhase::Move, x, y))
    }

    /// Pointer released at native `(x, y)`.
    pub fn pointer_up(&self, x: f64, y: f64) -> Result<bool> {
        self.pointer(RawPointer::new(PointerPhase::Up, x, y))
    }

    /// Gesture cancelled at native `(x, y)`.
    pub fn pointer_cancel(&self, x: f64, y: f64) -> Result<bool> {
        self.pointer(RawPointer::new(PointerPhase::Cancel, x, y))
    }

    /// Name of the active view, if any.
    pub fn current_view_name(&self) -> Result<Option<&'static str>> {
        self.inner.host.sync(|h| h.current.as_ref().map(|v| v.name()))
    }

    /// Number of nodes attached directly under the root.
    pub fn root_child_count(&self) -> Result<usize> {
        self.inner.root.sync(|s| s.child_count())
    }

    /// Is a gesture currently captured by a node?
    pub fn has_capture(&self) -> Result<bool> {
        self.inner.host.sync(|h| h.captured.is_some())
    }
}

impl SceneInner {
    /// Swap the active view for `view` and lay it out at the last known size.
    fn present_here(&self, view: Arc<dyn HostedView>) {
        let old = self.root.remove_all_children_here();
        self.root.add_child_here(view.clone().into_node());
        let size = self.host.with(|h| {
            h.current = Some(view.clone());
            h.captured = None;
            h.size
        });
        debug!(view = view.name(), detached = old.len(), "view attached");
        if let Some(size) = size {
            if let Err(e) = view.layout_here(size) {
                warn!(view = view.name(), "layout failed: {e}");
            }
        }
    }

    /// Record a new size and lay out the active view.
    fn resize_here(&self, size: Size) -> Result<()> {
        self.root.with(|s| s.size = size);
        let current = self.host.with(|h| {
            h.size = Some(size);
            h.current.clone()
        });
        match current {
            Some(view) => view.layout_here(size),
            None => Ok(()),
        }
    }

    /// Route one pointer event to the captured node or the topmost
    /// interactive node under it.
    fn pointer_here(&self, raw: RawPointer) -> bool {
        let (size, captured) = self.host.with(|h| (h.size, h.captured.clone()));
        let height = match (self.config.native_origin, size) {
            (NativeOrigin::BottomLeft, None) => {
                warn!(?raw, "pointer event before the window size is known, dropped");
                return false;
            }
            (_, size) => size.map(|s| s.h).unwrap_or_default(),
        };
        let input = PointerInput::from_raw(raw, self.config.native_origin, height);
        let target = match raw.phase {
            PointerPhase::Down => {
                let hit = hit_test_here(&self.root.children_here(), Point::zero(), input.scene);
                self.host.with(|h| h.captured = hit.clone());
                hit
            }
            _ => captured,
        };
        if matches!(raw.phase, PointerPhase::Up | PointerPhase::Cancel) {
            self.host.with(|h| h.captured = None);
        }
        let Some(node) = target else {
            trace!(?raw, "pointer event hit nothing");
            return false;
        };
        if let Some(t) = node.input_target() {
            t.handle_input(&input);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness::Harness;

    #[test]
    fn input_before_size_with_bottom_left_origin_is_dropped() -> Result<()> {
        let h = Harness::with_config(SceneConfig {
            native_origin: NativeOrigin::BottomLeft,
        })?;
        assert!(!h.scene.pointer_down(1.0, 1.0)?);
        assert!(h.scene.resize(-1.0, 1.0).is_err());
        Ok(())
    }

    #[test]
    fn no_view_means_no_target() -> Result<()> {
        let h = Harness::new()?;
        h.scene.resize(100.0, 100.0)?;
        assert!(!h.scene.pointer_down(1.0, 1.0)?);
        assert!(!h.scene.has_capture()?);
        assert_eq!(h.scene.size()?, Some(Size::new(100.0, 100.0)));
        Ok(())
    }
}
