//! Full-screen views and their binding to presenters.
//!
//! A [`View`] is generic over a [`Screen`], which supplies the per-screen
//! children, layout and input. The view itself carries what every screen
//! shares: the application context and transition service (bound once), and
//! the presenter slot.
//!
//! The lifecycle is created, bound, attached, used, retired. A view is retired
//! by [`View::transition_to`], which clears its presenter synchronously while
//! the visual swap to the next view is still queued on the UI thread.

use std::{
    any::Any,
    fmt, mem,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use tracing::{debug, warn};

use crate::{
    confined::Confined,
    context::{ApplicationContext, Presenter},
    error::{self, Result},
    geom::Size,
    input::{InputTarget, Interaction, PointerInput},
    node::{NodeCore, NodeRef, SceneNode},
    transition::{HostedView, TransitionService},
    ui::UiHandle,
};

/// Per-screen behaviour plugged into a [`View`].
pub trait Screen: Send + Sync + Sized + 'static {
    /// Diagnostic name, also used as the view node's name.
    const NAME: &'static str;

    /// Build the screen's widgets.
    fn create(ui: &UiHandle) -> Result<Self>;

    /// Nodes attached under the view when it is created.
    fn children(&self) -> Vec<NodeRef>;

    /// Reposition children for a new hosting size. Called on the UI thread.
    fn layout(&self, size: Size) -> Result<()>;

    /// Input handling for the view's own area, if the screen takes any.
    fn interaction(&self) -> Option<&Interaction> {
        None
    }
}

/// Context and transition service, set together exactly once.
struct Binding {
    /// Shared application context.
    context: Arc<dyn ApplicationContext>,
    /// Shared transition service.
    transitions: TransitionService,
}

/// Who owns the view right now.
enum PresenterSlot {
    /// No presenter yet, or cleared.
    Vacant,
    /// The current presenter.
    Held(Presenter),
    /// The view has been superseded and will never hold a presenter again.
    Retired,
}

/// Shared body of a [`View`].
struct ViewInner<S> {
    /// Scene node for the view.
    core: NodeCore,
    /// Per-screen behaviour.
    screen: S,
    /// Set once by `bind`.
    binding: OnceLock<Binding>,
    /// Presenter slot. Not confined to the UI thread: presenters are set and
    /// cleared from whichever thread drives the transition.
    presenter: Mutex<PresenterSlot>,
    /// Last size passed to layout.
    laid_out: Confined<Option<Size>>,
}

/// A full-screen view over screen behaviour `S`. Cloning gives another handle
/// onto the same view.
pub struct View<S> {
    /// Shared body.
    inner: Arc<ViewInner<S>>,
}

impl<S> Clone for View<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Screen> fmt::Debug for View<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View").field("screen", &S::NAME).finish()
    }
}

impl<S: Screen> View<S> {
    /// Create an unbound view and attach the screen's children to it.
    pub fn new(ui: &UiHandle) -> Result<Self> {
        let screen = S::create(ui)?;
        let core = NodeCore::new(ui.clone(), S::NAME);
        for c in screen.children() {
            core.add_child(c)?;
        }
        Ok(Self {
            inner: Arc::new(ViewInner {
                core,
                screen,
                binding: OnceLock::new(),
                presenter: Mutex::new(PresenterSlot::Vacant),
                laid_out: Confined::new(ui.clone(), None),
            }),
        })
    }

    /// Set the context and transition service. A view is bound exactly once.
    #[track_caller]
    pub fn bind(&self, context: Arc<dyn ApplicationContext>, transitions: TransitionService) {
        if self
            .inner
            .binding
            .set(Binding {
                context,
                transitions,
            })
            .is_err()
        {
            error::precondition(format!("{} view is already bound", S::NAME));
        }
        debug!(view = S::NAME, "bound");
    }

    /// Has the view been bound?
    pub fn is_bound(&self) -> bool {
        self.inner.binding.get().is_some()
    }

    /// The binding, or a precondition violation.
    #[track_caller]
    fn binding(&self) -> &Binding {
        match self.inner.binding.get() {
            Some(b) => b,
            None => error::precondition(format!("{} view is not bound", S::NAME)),
        }
    }

    /// The shared application context. Panics if the view is unbound.
    #[track_caller]
    pub fn context(&self) -> &Arc<dyn ApplicationContext> {
        &self.binding().context
    }

    /// The shared transition service. Panics if the view is unbound.
    #[track_caller]
    pub fn transition_service(&self) -> &TransitionService {
        &self.binding().transitions
    }

    /// Run `f` on the presenter slot with the lock held.
    fn slot<R>(&self, f: impl FnOnce(&mut PresenterSlot) -> R) -> R {
        let mut slot = self
            .inner
            .presenter
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut slot)
    }

    /// Hand the view its presenter. A retired view drops the presenter at
    /// once: nothing can reach a superseded view any more.
    pub fn set_presenter(&self, presenter: Presenter) {
        let (dropped, retired) = self.slot(|s| {
            if matches!(s, PresenterSlot::Retired) {
                return (Some(presenter), true);
            }
            match mem::replace(s, PresenterSlot::Held(presenter)) {
                PresenterSlot::Held(old) => (Some(old), false),
                _ => (None, false),
            }
        });
        if retired {
            warn!(view = S::NAME, "presenter arrived after the view was retired");
        } else {
            debug!(view = S::NAME, "presenter set");
        }
        // Presenters may deregister handlers when dropped, so never drop one
        // with the slot locked.
        drop(dropped);
    }

    /// Drop the presenter, if any. Calling this again is a no-op.
    pub fn clear_presenter(&self) {
        let old = self.slot(|s| {
            if matches!(s, PresenterSlot::Held(_)) {
                mem::replace(s, PresenterSlot::Vacant)
            } else {
                PresenterSlot::Vacant
            }
        });
        if matches!(old, PresenterSlot::Held(_)) {
            debug!(view = S::NAME, "presenter cleared");
        }
    }

    /// Mark the view superseded and drop its presenter.
    fn retire(&self) {
        let old = self.slot(|s| mem::replace(s, PresenterSlot::Retired));
        debug!(view = S::NAME, "retired");
        drop(old);
    }

    /// Does the view currently own a presenter?
    pub fn has_presenter(&self) -> bool {
        self.slot(|s| matches!(s, PresenterSlot::Held(_)))
    }

    /// Has the view been superseded?
    pub fn is_retired(&self) -> bool {
        self.slot(|s| matches!(s, PresenterSlot::Retired))
    }

    /// Borrow the presenter as a concrete type. Returns `None` if there is no
    /// presenter or it is of another type. `f` runs with the slot locked and
    /// must not call back into this view's presenter methods.
    pub fn with_presenter<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.slot(|s| match s {
            PresenterSlot::Held(p) => p.downcast_ref::<T>().map(f),
            _ => None,
        })
    }

    /// Supersede this view with `next`: bind `next` with this view's context
    /// and transition service, queue the swap, then drop this view's
    /// presenter. The presenter is gone when this returns, whether or not the
    /// swap has run.
    #[track_caller]
    pub fn transition_to<T: Screen>(&self, next: &View<T>) -> Result<()> {
        let b = self.binding();
        next.bind(b.context.clone(), b.transitions.clone());
        b.transitions.transition(next.hosted())?;
        self.retire();
        debug!(from = S::NAME, to = T::NAME, "transitioned");
        Ok(())
    }

    /// Lay the view out at `size`, from any thread.
    pub fn set_size(&self, size: Size) -> Result<()> {
        let inner = self.inner.clone();
        self.inner.core.ui().run_sync(move || inner.layout_here(size))?
    }

    /// The last size the view was laid out at. Panics if the view has never
    /// been laid out.
    #[track_caller]
    pub fn size(&self) -> Result<Size> {
        match self.inner.laid_out.sync(|s| *s)? {
            Some(s) => Ok(s),
            None => error::precondition(format!("{} view has not been laid out", S::NAME)),
        }
    }

    /// The per-screen behaviour.
    pub fn screen(&self) -> &S {
        &self.inner.screen
    }

    /// The view's scene node state.
    pub fn core(&self) -> &NodeCore {
        &self.inner.core
    }

    /// The view as a scene node.
    pub fn node(&self) -> NodeRef {
        self.inner.clone()
    }

    /// The view as the host sees it.
    pub fn hosted(&self) -> Arc<dyn HostedView> {
        self.inner.clone()
    }

    /// The view as an event sink for other nodes.
    pub fn input_target(&self) -> Arc<dyn InputTarget> {
        self.inner.clone()
    }

    /// Are these the same view?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S: Screen> SceneNode for ViewInner<S> {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn input_target(&self) -> Option<&dyn InputTarget> {
        self.screen.interaction().map(|_| self as &dyn InputTarget)
    }
}

impl<S: Screen> InputTarget for ViewInner<S> {
    fn handle_input(&self, input: &PointerInput) {
        if let Some(i) = self.screen.interaction() {
            i.deliver(input, self.core.scene_origin_here());
        }
    }
}

impl<S: Screen> HostedView for ViewInner<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn into_node(self: Arc<Self>) -> NodeRef {
        self
    }

    fn layout_here(&self, size: Size) -> Result<()> {
        self.laid_out.with(|s| *s = Some(size));
        self.core.with(|s| s.size = size);
        debug!(view = S::NAME, w = size.w, h = size.h, "layout");
        self.screen.layout(size)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        panic::{self, AssertUnwindSafe},
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{
        testing::{dummyctx::DummyContext, harness::Harness},
        ui::UiLoop,
    };

    /// A screen with no widgets that counts layouts.
    struct Blank {
        /// Layout count.
        layouts: AtomicUsize,
    }

    impl Screen for Blank {
        const NAME: &'static str = "blank";

        fn create(_ui: &UiHandle) -> Result<Self> {
            Ok(Self {
                layouts: AtomicUsize::new(0),
            })
        }

        fn children(&self) -> Vec<NodeRef> {
            vec![]
        }

        fn layout(&self, _size: Size) -> Result<()> {
            self.layouts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// A presenter that records when it is dropped.
    struct Tracked(Arc<AtomicUsize>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn double_bind_panics() -> Result<()> {
        let h = Harness::new()?;
        let v = View::<Blank>::new(&h.ui())?;
        v.bind(DummyContext::shared(), h.scene.transition_service());
        let r = panic::catch_unwind(AssertUnwindSafe(|| {
            v.bind(DummyContext::shared(), h.scene.transition_service())
        }));
        assert!(r.is_err());
        Ok(())
    }

    #[test]
    fn unbound_context_panics() -> Result<()> {
        let ui = UiLoop::new();
        let v = View::<Blank>::new(&ui.handle())?;
        assert!(!v.is_bound());
        let r = panic::catch_unwind(AssertUnwindSafe(|| {
            v.context();
        }));
        assert!(r.is_err());
        Ok(())
    }

    #[test]
    fn size_before_layout_panics() -> Result<()> {
        let ui = UiLoop::new();
        let v = View::<Blank>::new(&ui.handle())?;
        assert!(panic::catch_unwind(AssertUnwindSafe(|| v.size())).is_err());
        v.set_size(Size::new(10.0, 20.0))?;
        assert_eq!(v.size()?, Size::new(10.0, 20.0));
        assert_eq!(v.screen().layouts.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn presenter_slot() -> Result<()> {
        let ui = UiLoop::new();
        let v = View::<Blank>::new(&ui.handle())?;
        let drops = Arc::new(AtomicUsize::new(0));
        v.set_presenter(Box::new(Tracked(drops.clone())));
        assert!(v.has_presenter());
        assert_eq!(v.with_presenter(|t: &Tracked| t.0.load(Ordering::SeqCst)), Some(0));
        assert_eq!(v.with_presenter(|_: &String| ()), None);
        v.set_presenter(Box::new(Tracked(drops.clone())));
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        v.clear_presenter();
        v.clear_presenter();
        assert!(!v.has_presenter());
        assert_eq!(drops.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[test]
    fn transition_clears_before_attach() -> Result<()> {
        let h = Harness::new()?;
        let ctx = DummyContext::shared();
        let a = View::<Blank>::new(&h.ui())?;
        a.bind(ctx.clone(), h.scene.transition_service());
        let drops = Arc::new(AtomicUsize::new(0));
        a.set_presenter(Box::new(Tracked(drops.clone())));

        let b = View::<Blank>::new(&h.ui())?;
        a.transition_to(&b)?;
        // Nothing has been drained, so the swap has not happened yet.
        assert!(!a.has_presenter());
        assert!(a.is_retired());
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(b.context(), &ctx));
        assert!(b.transition_service().ptr_eq(a.transition_service()));
        assert_eq!(h.scene.current_view_name()?, None);
        h.drain()?;
        assert_eq!(h.scene.current_view_name()?, Some("blank"));

        // Late presenters for a retired view are dropped on arrival.
        a.set_presenter(Box::new(Tracked(drops.clone())));
        assert!(!a.has_presenter());
        assert_eq!(drops.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
