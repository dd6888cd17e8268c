use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{error::Result, geom::Size, node::NodeRef, ui::UiHandle};

/// The face a view shows to whatever hosts it.
pub trait HostedView: Send + Sync + 'static {
    /// Diagnostic name of the screen.
    fn name(&self) -> &'static str;

    /// The view as a scene node.
    fn into_node(self: Arc<Self>) -> NodeRef;

    /// Lay the view out at `size`. UI thread only.
    fn layout_here(&self, size: Size) -> Result<()>;
}

/// The host's swap function.
type TransitionFn = dyn Fn(Arc<dyn HostedView>) + Send + Sync;

/// Swaps the hosted view. Stateless apart from the host function it wraps,
/// and shared by every view.
#[derive(Clone)]
pub struct TransitionService {
    /// Loop the swap runs on.
    ui: UiHandle,
    /// The host's swap function.
    f: Arc<TransitionFn>,
}

impl fmt::Debug for TransitionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TransitionService")
    }
}

impl TransitionService {
    /// Wrap the host's swap function.
    pub fn new(ui: UiHandle, f: impl Fn(Arc<dyn HostedView>) + Send + Sync + 'static) -> Self {
        Self { ui, f: Arc::new(f) }
    }

    /// Queue a swap to `view` on the UI thread. This always returns before
    /// the swap happens, whichever thread calls it.
    pub fn transition(&self, view: Arc<dyn HostedView>) -> Result<()> {
        debug!(view = view.name(), "transition queued");
        let f = self.f.clone();
        self.ui.post(move || f(view))
    }

    /// Do two services wrap the same host function?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}
