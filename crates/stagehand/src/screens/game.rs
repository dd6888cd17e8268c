use std::sync::Arc;

use tracing::debug;

use crate::{
    error::Result,
    geom::Size,
    handler::{DragHandler, LayoutHandler},
    input::{InputTarget, Interaction},
    node::NodeRef,
    registration::HandlerRegistration,
    registry::HandlerRegistry,
    ui::UiHandle,
    view::{Screen, View},
    widgets::Sprite,
};

/// The game board. Sprites are created on demand by the presenter, and the
/// whole view area reports drags once a drag handler is registered.
pub struct GameScreen {
    /// Drag handlers for the view area.
    interaction: Interaction,
    /// Layout handlers.
    layouts: HandlerRegistry<dyn LayoutHandler>,
}

impl Screen for GameScreen {
    const NAME: &'static str = "game";

    fn create(ui: &UiHandle) -> Result<Self> {
        Ok(Self {
            interaction: Interaction::new(ui.clone()),
            layouts: HandlerRegistry::new(ui.clone()),
        })
    }

    fn children(&self) -> Vec<NodeRef> {
        vec![]
    }

    fn layout(&self, size: Size) -> Result<()> {
        let (w, h) = (size.w as i64, size.h as i64);
        self.layouts.dispatch_here(|l| l.on_layout(w, h));
        Ok(())
    }

    fn interaction(&self) -> Option<&Interaction> {
        Some(&self.interaction)
    }
}

impl View<GameScreen> {
    /// Create a sprite stacked above every sprite created before it, in this
    /// or any other game view, and attach it to this view.
    pub fn create_sprite(&self) -> Result<Sprite> {
        let sprite = Sprite::new(self.core().ui());
        let (view, node) = (self.node(), sprite.node());
        let ui = self.core().ui();
        let stacking = ui.clone();
        let z = ui.run_sync(move || {
            let z = stacking.next_z();
            node.core().with(|s| s.z = z);
            view.core().add_child_here(node);
            z
        })?;
        debug!(z, "sprite created");
        Ok(sprite)
    }

    /// Register a drag handler for the view area. The view starts taking
    /// input.
    pub fn add_drag_handler(&self, h: Arc<dyn DragHandler>) -> Result<HandlerRegistration> {
        self.core().sync(|s| s.interactive = true)?;
        self.screen().interaction.add_drag_handler(h)
    }

    /// Forward view-area input to `sink` before handling it here.
    pub fn set_event_sink(&self, sink: Option<&Arc<dyn InputTarget>>) -> Result<()> {
        self.screen().interaction.set_event_sink(sink)
    }

    /// Register a layout handler. It is called with the integer hosting size
    /// on every layout.
    pub fn add_layout_handler(&self, h: Arc<dyn LayoutHandler>) -> Result<HandlerRegistration> {
        self.screen().layouts.add(h)
    }

    /// The layout handler registry.
    pub fn layout_handlers(&self) -> &HandlerRegistry<dyn LayoutHandler> {
        &self.screen().layouts
    }
}
