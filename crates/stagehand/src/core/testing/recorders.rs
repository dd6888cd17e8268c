use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use crate::handler::{ClickHandler, DragEvent, DragHandler, LayoutHandler};

/// Counts clicks.
#[derive(Debug, Default)]
pub struct ClickRecorder {
    /// Clicks seen.
    count: AtomicUsize,
}

impl ClickRecorder {
    /// A fresh recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Clicks seen so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ClickHandler for ClickRecorder {
    fn on_click(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Phase of a recorded drag callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    /// `on_drag_start`.
    Start,
    /// `on_drag_move`.
    Move,
    /// `on_drag_end`.
    End,
}

/// Records every drag callback.
#[derive(Debug, Default)]
pub struct DragRecorder {
    /// Callbacks seen, in order.
    events: Mutex<Vec<(DragPhase, DragEvent)>>,
}

impl DragRecorder {
    /// A fresh recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Callbacks seen so far.
    pub fn events(&self) -> Vec<(DragPhase, DragEvent)> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Phases seen so far.
    pub fn phases(&self) -> Vec<DragPhase> {
        self.events().into_iter().map(|(p, _)| p).collect()
    }

    /// Record one callback.
    fn push(&self, phase: DragPhase, e: &DragEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push((phase, *e));
        }
    }
}

impl DragHandler for DragRecorder {
    fn on_drag_start(&self, e: &DragEvent) {
        self.push(DragPhase::Start, e);
    }

    fn on_drag_move(&self, e: &DragEvent) {
        self.push(DragPhase::Move, e);
    }

    fn on_drag_end(&self, e: &DragEvent) {
        self.push(DragPhase::End, e);
    }
}

/// Records every layout size.
#[derive(Debug, Default)]
pub struct LayoutRecorder {
    /// Sizes seen, in order.
    sizes: Mutex<Vec<(i64, i64)>>,
}

impl LayoutRecorder {
    /// A fresh recorder.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Sizes seen so far.
    pub fn sizes(&self) -> Vec<(i64, i64)> {
        self.sizes.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl LayoutHandler for LayoutRecorder {
    fn on_layout(&self, width: i64, height: i64) {
        if let Ok(mut s) = self.sizes.lock() {
            s.push((width, height));
        }
    }
}
