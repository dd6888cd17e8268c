use crate::{Point, Size};

/// A rectangle in scene units, described by its top-left corner and extent.
///
/// Because scene Y runs up, the rectangle covers `origin.y - size.h ..=
/// origin.y` vertically.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent.
    pub size: Size,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// A rectangle of `size` centred on `center`.
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            Point::new(center.x - size.w / 2.0, center.y + size.h / 2.0),
            size,
        )
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.origin.x
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.origin.x + self.size.w
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.origin.y
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.origin.y - self.size.h
    }

    /// Does the rectangle contain `p`? Edges are inclusive.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y <= self.top() && p.y >= self.bottom()
    }

    /// Shift the rectangle by an offset.
    pub fn shift(&self, by: Point) -> Self {
        Self::new(self.origin + by, self.size)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::Result;

    #[test]
    fn contains() -> Result<()> {
        let r = Rect::new(Point::new(10.0, -10.0), Size::new(20.0, 5.0));
        assert!(r.contains(Point::new(10.0, -10.0)));
        assert!(r.contains(Point::new(30.0, -15.0)));
        assert!(r.contains(Point::new(20.0, -12.0)));
        assert!(!r.contains(Point::new(20.0, -9.0)));
        assert!(!r.contains(Point::new(31.0, -12.0)));
        assert!(!r.contains(Point::new(20.0, -16.0)));
        Ok(())
    }

    #[test]
    fn centered() -> Result<()> {
        let r = Rect::centered(Point::zero(), Size::new(4.0, 2.0));
        assert_eq!(r.origin, Point::new(-2.0, 1.0));
        assert!(r.contains(Point::zero()));
        assert_eq!(r.shift(Point::new(1.0, 1.0)).origin, Point::new(-1.0, 2.0));
        Ok(())
    }

    proptest! {
        #[test]
        fn centre_is_inside(x in -10_000i32..10_000, y in -10_000i32..10_000, w in 0u32..1000, h in 0u32..1000) {
            let c = Point::new(f64::from(x), f64::from(y));
            prop_assert!(Rect::centered(c, Size::new(f64::from(w), f64::from(h))).contains(c));
        }
    }
}
