use std::{sync::Arc, time::Duration};

use tracing::trace;

use crate::{
    confined::Confined,
    error::Result,
    geom::{Point, Size},
    handler::{ClickHandler, DragHandler},
    input::{InputTarget, Interaction, PointerInput},
    node::{NodeCore, NodeRef, SceneNode},
    registration::HandlerRegistration,
    texture::TextureRef,
    ui::UiHandle,
    widgets::{HasMutableLocation, HasMutableSize, HasMutableVisibility},
};

/// The most recent geometry change requested of a sprite. Drawing the
/// in-between frames is the host's business; the scene holds the end state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Resize to a target extent.
    Resize {
        /// Target size.
        to: Size,
        /// Animation length.
        duration: Duration,
    },
    /// Move to a target position in parent space.
    Move {
        /// Target position.
        to: Point,
        /// Animation length.
        duration: Duration,
    },
}

/// Sprite-specific state.
#[derive(Default)]
struct Look {
    /// Current texture.
    texture: Option<TextureRef>,
    /// Last requested motion.
    motion: Option<Motion>,
}

/// Shared body of a [`Sprite`].
struct Inner {
    /// Scene node.
    core: NodeCore,
    /// Texture and motion.
    look: Confined<Look>,
    /// Click and drag handlers.
    interaction: Interaction,
}

/// A textured rectangle anchored at its top-left corner.
#[derive(Clone)]
pub struct Sprite {
    /// Shared body.
    inner: Arc<Inner>,
}

impl Sprite {
    /// An empty, zero-sized sprite. It takes input once a handler is added.
    pub fn new(ui: &UiHandle) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: NodeCore::new(ui.clone(), "sprite"),
                look: Confined::new(ui.clone(), Look::default()),
                interaction: Interaction::new(ui.clone()),
            }),
        }
    }

    /// Queue a texture change. The sprite adopts the texture's size.
    pub fn set_texture(&self, texture: TextureRef) -> Result<()> {
        let inner = self.inner.clone();
        self.inner.core.ui().post(move || {
            let size = Size::new(texture.width() as f64, texture.height() as f64);
            inner.look.with(|l| l.texture = Some(texture));
            inner.core.with(|s| s.size = size);
        })
    }

    /// Current texture.
    pub fn texture(&self) -> Result<Option<TextureRef>> {
        self.inner.look.sync(|l| l.texture.clone())
    }

    /// Last requested motion.
    pub fn motion(&self) -> Result<Option<Motion>> {
        self.inner.look.sync(|l| l.motion)
    }

    /// Stacking index.
    pub fn z(&self) -> Result<i64> {
        self.inner.core.sync(|s| s.z)
    }

    /// Position of the top-left corner in parent space.
    pub fn position(&self) -> Result<Point> {
        self.inner.core.sync(|s| s.position)
    }

    /// Current size.
    pub fn size(&self) -> Result<Size> {
        self.inner.core.sync(|s| s.size)
    }

    /// Is the sprite shown?
    pub fn is_visible(&self) -> Result<bool> {
        self.inner.core.sync(|s| s.visible)
    }

    /// Register a click handler. The sprite starts taking input.
    pub fn add_click_handler(&self, h: Arc<dyn ClickHandler>) -> Result<HandlerRegistration> {
        self.inner.core.sync(|s| s.interactive = true)?;
        self.inner.interaction.add_click_handler(h)
    }

    /// Register a drag handler. The sprite starts taking input.
    pub fn add_drag_handler(&self, h: Arc<dyn DragHandler>) -> Result<HandlerRegistration> {
        self.inner.core.sync(|s| s.interactive = true)?;
        self.inner.interaction.add_drag_handler(h)
    }

    /// Forward input to `sink` before handling it here.
    pub fn set_event_sink(&self, sink: Option<&Arc<dyn InputTarget>>) -> Result<()> {
        self.inner.interaction.set_event_sink(sink)
    }

    /// The sprite as a scene node.
    pub fn node(&self) -> NodeRef {
        self.inner.clone()
    }

    /// Underlying scene state.
    pub fn core(&self) -> &NodeCore {
        &self.inner.core
    }
}

impl HasMutableSize for Sprite {
    fn set_size_animated(&self, size: Size, duration: Duration) -> Result<()> {
        let inner = self.inner.clone();
        self.inner.core.ui().post(move || {
            inner.core.with(|s| s.size = size);
            inner.look.with(|l| l.motion = Some(Motion::Resize { to: size, duration }));
        })
    }
}

impl HasMutableLocation for Sprite {
    fn set_location_animated(&self, left: f64, top: f64, duration: Duration) -> Result<()> {
        let to = Point::new(left, -top);
        trace!(left, top, "sprite move");
        let inner = self.inner.clone();
        self.inner.core.ui().post(move || {
            inner.core.with(|s| s.position = to);
            inner.look.with(|l| l.motion = Some(Motion::Move { to, duration }));
        })
    }
}

impl HasMutableVisibility for Sprite {
    fn set_visible(&self, visible: bool) -> Result<()> {
        self.inner.core.post(move |s| s.visible = visible)
    }
}

impl SceneNode for Inner {
    fn core(&self) -> &NodeCore {
        &self.core
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
    use crate::{testing::dummyctx::StubTexture, ui::UiLoop};

    #[test]
    fn queued_geometry() -> Result<()> {
        let ui = UiLoop::new();
        let s = Sprite::new(&ui.handle());
        s.set_location(10.0, 20.0)?;
        s.set_size_animated(Size::new(30.0, 40.0), Duration::from_millis(250))?;
        assert_eq!(s.position()?, Point::zero());
        ui.run_pending()?;
        assert_eq!(s.position()?, Point::new(10.0, -20.0));
        assert_eq!(s.size()?, Size::new(30.0, 40.0));
        assert_eq!(
            s.motion()?,
            Some(Motion::Resize {
                to: Size::new(30.0, 40.0),
                duration: Duration::from_millis(250)
            })
        );
        Ok(())
    }

    #[test]
    fn texture_sets_size() -> Result<()> {
        let ui = UiLoop::new();
        let s = Sprite::new(&ui.handle());
        s.set_texture(Arc::new(StubTexture::new("card", 64, 96)))?;
        assert!(s.texture()?.is_none());
        ui.run_pending()?;
        assert!(s.texture()?.is_some());
        assert_eq!(s.size()?, Size::new(64.0, 96.0));
        s.set_visible(false)?;
        ui.run_pending()?;
        assert!(!s.is_visible()?);
        Ok(())
    }
}
