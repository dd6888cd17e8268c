use std::sync::Arc;

use crate::{
    confined::Confined,
    error::Result,
    geom::{Point, Rect, Size},
    handler::ClickHandler,
    input::{InputTarget, Interaction, PointerInput},
    node::{NodeCore, NodeRef, SceneNode},
    registration::HandlerRegistration,
    style::Color,
    ui::UiHandle,
    widgets::HasText,
};

/// Visual state of a button.
struct Look {
    /// Label text.
    text: String,
    /// Label font size.
    font_size: f64,
    /// Label colour.
    text_color: Color,
    /// Shape fill.
    fill: Color,
    /// Shape, centred on the button's position.
    shape: Rect,
}

/// Shared body of a [`Button`].
struct Inner {
    /// Scene node.
    core: NodeCore,
    /// Visual state.
    look: Confined<Look>,
    /// Click handlers and event sink.
    interaction: Interaction,
}

impl Inner {
    /// Apply a new size on the UI thread. Repeating the current size does
    /// nothing.
    fn resize_here(&self, size: Size) {
        let changed = self.core.with(|s| {
            let changed = s.size != size;
            s.size = size;
            changed
        });
        if changed {
            self.look.with(|l| {
                l.shape = Rect::centered(Point::zero(), size);
                l.font_size = size.h / 4.0;
                l.text_color = Color::DarkGrey;
            });
        }
    }
}

/// A rectangular push button with a centred label. Clicks fire when the
/// pointer is released.
#[derive(Clone)]
pub struct Button {
    /// Shared body.
    inner: Arc<Inner>,
}

impl Button {
    /// A button with no size, label or handlers.
    pub fn new(ui: &UiHandle, name: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: NodeCore::build(ui.clone(), name, |s| s.interactive = true),
                look: Confined::new(
                    ui.clone(),
                    Look {
                        text: String::new(),
                        font_size: 0.0,
                        text_color: Color::DarkGrey,
                        fill: Color::Clear,
                        shape: Rect::default(),
                    },
                ),
                interaction: Interaction::new(ui.clone()),
            }),
        }
    }

    /// Resize the button. The shape stays centred and the label font is a
    /// quarter of the height.
    pub fn set_size(&self, size: Size) -> Result<()> {
        let inner = self.inner.clone();
        self.inner.core.ui().run_sync(move || inner.resize_here(size))
    }

    /// Current size.
    pub fn size(&self) -> Result<Size> {
        self.inner.core.sync(|s| s.size)
    }

    /// Move the button's centre.
    pub fn set_position(&self, p: Point) -> Result<()> {
        self.inner.core.sync(move |s| s.position = p)
    }

    /// Current centre.
    pub fn position(&self) -> Result<Point> {
        self.inner.core.sync(|s| s.position)
    }

    /// Change the shape fill.
    pub fn set_fill_color(&self, c: Color) -> Result<()> {
        self.inner.look.sync(move |l| l.fill = c)
    }

    /// Current shape fill.
    pub fn fill_color(&self) -> Result<Color> {
        self.inner.look.sync(|l| l.fill)
    }

    /// Current label colour.
    pub fn text_color(&self) -> Result<Color> {
        self.inner.look.sync(|l| l.text_color)
    }

    /// Current label font size.
    pub fn font_size(&self) -> Result<f64> {
        self.inner.look.sync(|l| l.font_size)
    }

    /// Current shape, relative to the button's centre.
    pub fn shape(&self) -> Result<Rect> {
        self.inner.look.sync(|l| l.shape)
    }

    /// Register a click handler.
    pub fn add_click_handler(&self, h: Arc<dyn ClickHandler>) -> Result<HandlerRegistration> {
        self.inner.interaction.add_click_handler(h)
    }

    /// Forward input to `sink` before handling it here.
    pub fn set_event_sink(&self, sink: Option<&Arc<dyn InputTarget>>) -> Result<()> {
        self.inner.interaction.set_event_sink(sink)
    }

    /// The button as a scene node.
    pub fn node(&self) -> NodeRef {
        self.inner.clone()
    }
}

impl HasText for Button {
    fn set_text(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        self.inner.look.post(move |l| l.text = text)
    }

    fn text(&self) -> Result<String> {
        self.inner.look.sync(|l| l.text.clone())
    }
}

impl SceneNode for Inner {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn hit_area(&self) -> Rect {
        Rect::centered(Point::zero(), self.core.with(|s| s.size))
    }

    fn input_target(&self) -> Option<&dyn InputTarget> {
        Some(self)
    }
}

impl InputTarget for Inner {
    fn handle_input(&self, input: &PointerInput) {
        self.interaction.deliver(input, self.core.scene_origin_here());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiLoop;

    #[test]
    fn size_drives_shape_and_font() -> Result<()> {
        let ui = UiLoop::new();
        let b = Button::new(&ui.handle(), "start");
        b.set_size(Size::new(200.0, 120.0))?;
        assert_eq!(b.font_size()?, 30.0);
        assert_eq!(b.shape()?, Rect::new(Point::new(-100.0, 60.0), Size::new(200.0, 120.0)));
        b.set_fill_color(Color::Cyan)?;
        assert_eq!(b.fill_color()?, Color::Cyan);
        Ok(())
    }

    #[test]
    fn text_is_queued() -> Result<()> {
        let ui = UiLoop::new();
        let b = Button::new(&ui.handle(), "start");
        b.set_text("New Game")?;
        assert_eq!(b.text()?, "");
        ui.run_pending()?;
        assert_eq!(b.text()?, "New Game");
        Ok(())
    }
}
