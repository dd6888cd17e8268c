use std::sync::Arc;

use crate::{
    confined::Confined,
    error::Result,
    geom::{Point, Rect, Size},
    node::{NodeCore, NodeRef, SceneNode},
    style::Color,
    ui::UiHandle,
    widgets::{HasIntValue, HasText},
};

/// Layout of the bar's parts for one outer size. All rectangles are relative
/// to the bar's centre.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarGeometry {
    /// Outer frame.
    pub frame: Rect,
    /// Inset area holding the label and the track.
    pub interior: Size,
    /// The grey track the bar runs along.
    pub track: Rect,
    /// Left end of the bar, on its bottom edge.
    pub bar_origin: Point,
    /// Width of the bar at 100%.
    pub max_bar_width: f64,
    /// Height of the bar.
    pub bar_height: f64,
    /// Centre of the label.
    pub label_position: Point,
    /// Label font size.
    pub font_size: f64,
}

impl BarGeometry {
    /// Lay out the parts for an outer `size`.
    pub fn for_size(size: Size) -> Self {
        let interior = Size::new(0.95 * size.w, size.h - 0.05 * size.w);
        let track_size = Size::new(interior.w, interior.h / 3.0);
        let bar_height = track_size.h / 3.0;
        let max_bar_width = interior.w - bar_height * 2.0;
        let track_bottom = -interior.h * 1.5 / 3.0;
        Self {
            frame: Rect::centered(Point::zero(), size),
            interior,
            track: Rect::new(
                Point::new(-interior.w / 2.0, track_bottom + track_size.h),
                track_size,
            ),
            bar_origin: Point::new(-max_bar_width / 2.0, -(interior.h * 3.5 / 9.0)),
            max_bar_width,
            bar_height,
            label_position: Point::new(0.0, interior.h / 6.0),
            font_size: interior.h / 4.0,
        }
    }

    /// The bar's rectangle at `value` percent.
    pub fn bar(&self, value: i64) -> Rect {
        let w = self.max_bar_width * value as f64 / 100.0;
        Rect::new(
            Point::new(self.bar_origin.x, self.bar_origin.y + self.bar_height),
            Size::new(w, self.bar_height),
        )
    }
}

/// Mutable state of a progress bar.
struct BarState {
    /// Current geometry.
    geometry: BarGeometry,
    /// Current value, 0 to 100.
    value: i64,
    /// The filled part of the track.
    bar: Rect,
    /// Label text.
    text: String,
}

/// Shared body of a [`ProgressBar`].
struct Inner {
    /// Scene node.
    core: NodeCore,
    /// Bar state.
    state: Confined<BarState>,
}

/// A horizontal progress bar with a label above the track. The bar takes
/// pointer input so that nothing behind it does, but has no handlers.
#[derive(Clone)]
pub struct ProgressBar {
    /// Shared body.
    inner: Arc<Inner>,
}

impl ProgressBar {
    /// Fill colour of the track.
    pub const TRACK_COLOR: Color = Color::LightGrey;
    /// Fill colour of the bar.
    pub const BAR_COLOR: Color = Color::DarkGrey;
    /// Label colour.
    pub const TEXT_COLOR: Color = Color::LightGrey;

    /// An empty bar with no size.
    pub fn new(ui: &UiHandle, name: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                core: NodeCore::build(ui.clone(), name, |s| s.interactive = true),
                state: Confined::new(
                    ui.clone(),
                    BarState {
                        geometry: BarGeometry::default(),
                        value: 0,
                        bar: Rect::default(),
                        text: String::new(),
                    },
                ),
            }),
        }
    }

    /// Resize the bar. The current value is redrawn at the new size.
    pub fn set_size(&self, size: Size) -> Result<()> {
        let inner = self.inner.clone();
        self.inner.core.ui().run_sync(move || {
            inner.core.with(|s| s.size = size);
            inner.state.with(|st| {
                st.geometry = BarGeometry::for_size(size);
                st.bar = st.geometry.bar(st.value);
            });
        })
    }

    /// Move the bar's centre.
    pub fn set_position(&self, p: Point) -> Result<()> {
        self.inner.core.sync(move |s| s.position = p)
    }

    /// Current centre.
    pub fn position(&self) -> Result<Point> {
        self.inner.core.sync(|s| s.position)
    }

    /// Current geometry.
    pub fn geometry(&self) -> Result<BarGeometry> {
        self.inner.state.sync(|st| st.geometry)
    }

    /// The filled part of the track.
    pub fn bar(&self) -> Result<Rect> {
        self.inner.state.sync(|st| st.bar)
    }

    /// The bar as a scene node.
    pub fn node(&self) -> NodeRef {
        self.inner.clone()
    }
}

impl HasIntValue for ProgressBar {
    /// Queue a new value. Values outside 0 to 100 are clamped.
    fn set_int_value(&self, value: i64) -> Result<()> {
        let value = value.clamp(0, 100);
        self.inner.state.post(move |st| {
            st.value = value;
            st.bar = st.geometry.bar(value);
        })
    }

    fn int_value(&self) -> Result<i64> {
        self.inner.state.sync(|st| st.value)
    }
}

impl HasText for ProgressBar {
    fn set_text(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        self.inner.state.post(move |st| st.text = text)
    }

    fn text(&self) -> Result<String> {
        self.inner.state.sync(|st| st.text.clone())
    }
}

impl SceneNode for Inner {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn hit_area(&self) -> Rect {
        Rect::centered(Point::zero(), self.core.with(|s| s.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiLoop;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn geometry() -> Result<()> {
        let g = BarGeometry::for_size(Size::new(200.0, 100.0));
        assert!(close(g.interior.w, 190.0));
        assert!(close(g.interior.h, 90.0));
        assert!(close(g.track.size.h, 30.0));
        assert!(close(g.track.top(), -15.0));
        assert!(close(g.bar_height, 10.0));
        assert!(close(g.max_bar_width, 170.0));
        assert!(close(g.bar_origin.x, -85.0));
        assert!(close(g.bar_origin.y, -35.0));
        assert!(close(g.label_position.y, 15.0));
        assert!(close(g.font_size, 22.5));
        let bar = g.bar(50);
        assert!(close(bar.size.w, 85.0));
        assert!(close(bar.bottom(), -35.0));
        Ok(())
    }

    #[test]
    fn value_is_queued_and_survives_resize() -> Result<()> {
        let ui = UiLoop::new();
        let p = ProgressBar::new(&ui.handle(), "progress");
        p.set_size(Size::new(200.0, 100.0))?;
        p.set_int_value(40)?;
        p.set_text("Loading...")?;
        assert_eq!(p.int_value()?, 0);
        ui.run_pending()?;
        assert_eq!(p.int_value()?, 40);
        assert_eq!(p.text()?, "Loading...");
        assert!(close(p.bar()?.size.w, 68.0));
        p.set_size(Size::new(400.0, 200.0))?;
        assert!(close(p.bar()?.size.w, p.geometry()?.max_bar_width * 0.4));
        p.set_int_value(250)?;
        ui.run_pending()?;
        assert_eq!(p.int_value()?, 100);
        Ok(())
    }
}
