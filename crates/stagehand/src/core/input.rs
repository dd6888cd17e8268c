//! Raw pointer ingress and its translation into drag and click events.
//!
//! Three coordinate spaces are in play:
//!
//! - **native**: what the host platform reports, with its origin either at
//!   the top-left or the bottom-left of the window.
//! - **global**: window coordinates with the origin at the top-left and Y
//!   running down. This is what handlers see as the global position.
//! - **scene**: the scene graph's space. The origin is the top-left of the
//!   window and Y runs up, so everything on screen has negative Y.
//!
//! Handlers also get a **local** position: relative to the receiving node's
//! origin with Y negated, so positive Y runs down into the node.

use std::sync::{Arc, Weak};

use crate::{
    confined::Confined,
    error::Result,
    geom::Point,
    handler::{ClickHandler, DragEvent, DragHandler},
    registration::HandlerRegistration,
    registry::HandlerRegistry,
    ui::UiHandle,
};

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Pointer pressed or touch began.
    Down,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released.
    Up,
    /// The platform abandoned the gesture.
    Cancel,
}

/// Where the host platform puts the window origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeOrigin {
    /// Origin at the top-left, Y running down. Typical for touch platforms.
    #[default]
    TopLeft,
    /// Origin at the bottom-left, Y running up. Typical for desktop windows.
    BottomLeft,
}

/// A pointer event as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointer {
    /// Gesture phase.
    pub phase: PointerPhase,
    /// Native X.
    pub x: f64,
    /// Native Y.
    pub y: f64,
}

impl RawPointer {
    /// Construct a raw event.
    pub fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self { phase, x, y }
    }
}

/// A pointer event translated into window and scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Gesture phase.
    pub phase: PointerPhase,
    /// Window position, origin top-left, Y down.
    pub global: Point,
    /// Scene position, origin top-left, Y up.
    pub scene: Point,
}

impl PointerInput {
    /// Translate a raw event. `window_height` is only consulted for
    /// bottom-left origins.
    pub fn from_raw(raw: RawPointer, origin: NativeOrigin, window_height: f64) -> Self {
        let global = match origin {
            NativeOrigin::TopLeft => Point::new(raw.x, raw.y),
            NativeOrigin::BottomLeft => Point::new(raw.x, window_height - raw.y),
        };
        Self {
            phase: raw.phase,
            global,
            scene: global.flip_y(),
        }
    }

    /// Position relative to a node whose origin is at `node_origin` in scene
    /// space, with Y negated.
    pub fn local_in(&self, node_origin: Point) -> Point {
        (self.scene - node_origin).flip_y()
    }

    /// The drag event a node at `node_origin` receives.
    pub fn drag_event(&self, node_origin: Point) -> DragEvent {
        DragEvent {
            global: self.global,
            local: self.local_in(node_origin),
        }
    }
}

/// Something that can receive translated pointer input on the UI thread.
pub trait InputTarget: Send + Sync + 'static {
    /// Handle one pointer event.
    fn handle_input(&self, input: &PointerInput);
}

/// Click and drag registries for one interactive node, plus its optional
/// event sink.
pub struct Interaction {
    /// Click handlers.
    clicks: HandlerRegistry<dyn ClickHandler>,
    /// Drag handlers.
    drags: HandlerRegistry<dyn DragHandler>,
    /// Receives every event before this node's own handlers. Held weakly so a
    /// node can name an ancestor as its sink.
    sink: Confined<Option<Weak<dyn InputTarget>>>,
}

impl Interaction {
    /// Empty registries owned by the loop behind `ui`.
    pub fn new(ui: UiHandle) -> Self {
        Self {
            clicks: HandlerRegistry::new(ui.clone()),
            drags: HandlerRegistry::new(ui.clone()),
            sink: Confined::new(ui, None),
        }
    }

    /// Register a click handler.
    pub fn add_click_handler(&self, h: Arc<dyn ClickHandler>) -> Result<HandlerRegistration> {
        self.clicks.add(h)
    }

    /// Register a drag handler.
    pub fn add_drag_handler(&self, h: Arc<dyn DragHandler>) -> Result<HandlerRegistration> {
        self.drags.add(h)
    }

    /// The click registry.
    pub fn clicks(&self) -> &HandlerRegistry<dyn ClickHandler> {
        &self.clicks
    }

    /// The drag registry.
    pub fn drags(&self) -> &HandlerRegistry<dyn DragHandler> {
        &self.drags
    }

    /// Forward every event to `sink` before handling it here. `None` removes
    /// the sink.
    pub fn set_event_sink(&self, sink: Option<&Arc<dyn InputTarget>>) -> Result<()> {
        let sink = sink.map(Arc::downgrade);
        self.sink.sync(move |s| *s = sink)
    }

    /// Deliver one event on the UI thread. The sink goes first, then drag
    /// handlers, then click handlers on release.
    #[track_caller]
    pub fn deliver(&self, input: &PointerInput, node_origin: Point) {
        let sink = self.sink.with(|s| s.as_ref().and_then(Weak::upgrade));
        if let Some(sink) = sink {
            sink.handle_input(input);
        }
        let e = input.drag_event(node_origin);
        match input.phase {
            PointerPhase::Down => {
                self.drags.dispatch_here(|h| h.on_drag_start(&e));
            }
            PointerPhase::Move => {
                self.drags.dispatch_here(|h| h.on_drag_move(&e));
            }
            PointerPhase::Up => {
                self.drags.dispatch_here(|h| h.on_drag_end(&e));
                self.clicks.dispatch_here(|h| h.on_click());
            }
            PointerPhase::Cancel => {
                self.drags.dispatch_here(|h| h.on_drag_end(&e));
            }
        }
    }
}
