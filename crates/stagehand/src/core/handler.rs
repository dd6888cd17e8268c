//! Capability interfaces implemented by presenters and invoked by the
//! presentation layer.
//!
//! Handlers are identified by reference, never by value: the same handler
//! added twice is two registry members, and removal goes through the
//! [`HandlerRegistration`](crate::registration::HandlerRegistration) minted at
//! add time.

use crate::geom::Point;

/// Receives clicks on an interactive node.
pub trait ClickHandler: Send + Sync + 'static {
    /// The node was clicked.
    fn on_click(&self);
}

impl<F> ClickHandler for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn on_click(&self) {
        self()
    }
}

/// Coordinates carried by every drag callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragEvent {
    /// Position relative to the top-left of the window, Y running down.
    pub global: Point,
    /// Position relative to the node's own origin, Y running down into the
    /// node's content.
    pub local: Point,
}

impl DragEvent {
    /// Construct an event from raw coordinates.
    pub fn new(global_x: f64, global_y: f64, local_x: f64, local_y: f64) -> Self {
        Self {
            global: Point::new(global_x, global_y),
            local: Point::new(local_x, local_y),
        }
    }
}

/// Receives the phases of a pointer drag over an interactive node.
pub trait DragHandler: Send + Sync + 'static {
    /// The pointer went down.
    fn on_drag_start(&self, e: &DragEvent);
    /// The pointer moved while down.
    fn on_drag_move(&self, e: &DragEvent);
    /// The pointer was released or the gesture was cancelled.
    fn on_drag_end(&self, e: &DragEvent);
}

/// Boxed drag phase callback.
type DragFn = Box<dyn Fn(&DragEvent) + Send + Sync>;

/// Adapts up to three closures into a [`DragHandler`]. Phases without a
/// closure are ignored.
#[derive(Default)]
pub struct DragFns {
    /// Start callback.
    start: Option<DragFn>,
    /// Move callback.
    moved: Option<DragFn>,
    /// End callback.
    end: Option<DragFn>,
}

impl DragFns {
    /// A handler that ignores every phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start callback.
    pub fn on_start(mut self, f: impl Fn(&DragEvent) + Send + Sync + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    /// Set the move callback.
    pub fn on_move(mut self, f: impl Fn(&DragEvent) + Send + Sync + 'static) -> Self {
        self.moved = Some(Box::new(f));
        self
    }

    /// Set the end callback.
    pub fn on_end(mut self, f: impl Fn(&DragEvent) + Send + Sync + 'static) -> Self {
        self.end = Some(Box::new(f));
        self
    }
}

impl DragHandler for DragFns {
    fn on_drag_start(&self, e: &DragEvent) {
        if let Some(f) = &self.start {
            f(e)
        }
    }

    fn on_drag_move(&self, e: &DragEvent) {
        if let Some(f) = &self.moved {
            f(e)
        }
    }

    fn on_drag_end(&self, e: &DragEvent) {
        if let Some(f) = &self.end {
            f(e)
        }
    }
}

/// Receives the hosting size whenever a view is laid out.
pub trait LayoutHandler: Send + Sync + 'static {
    /// The view was laid out at `width` x `height`.
    fn on_layout(&self, width: i64, height: i64);
}

impl<F> LayoutHandler for F
where
    F: Fn(i64, i64) + Send + Sync + 'static,
{
    fn on_layout(&self, width: i64, height: i64) {
        self(width, height)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::Result;

    #[test]
    fn closures_are_handlers() -> Result<()> {
        let log = Arc::new(Mutex::new(vec![]));
        let l = log.clone();
        let click: Box<dyn ClickHandler> =
            Box::new(move || l.lock().unwrap().push("click".to_string()));
        let l = log.clone();
        let layout: Box<dyn LayoutHandler> =
            Box::new(move |w: i64, h: i64| l.lock().unwrap().push(format!("{w}x{h}")));
        click.on_click();
        layout.on_layout(640, 480);
        assert_eq!(*log.lock().unwrap(), vec!["click", "640x480"]);
        Ok(())
    }

    #[test]
    fn drag_fns_route_phases() -> Result<()> {
        let log = Arc::new(Mutex::new(vec![]));
        let (a, b) = (log.clone(), log.clone());
        let h = DragFns::new()
            .on_start(move |e| a.lock().unwrap().push(("start", e.local.y)))
            .on_end(move |e| b.lock().unwrap().push(("end", e.local.y)));
        let e = DragEvent::new(1.0, 2.0, 3.0, 4.0);
        h.on_drag_start(&e);
        h.on_drag_move(&e);
        h.on_drag_end(&e);
        assert_eq!(*log.lock().unwrap(), vec![("start", 4.0), ("end", 4.0)]);
        Ok(())
    }
}
