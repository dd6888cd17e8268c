use std::ops::{Add, Neg, Sub};

/// A location in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The origin.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Is this the origin?
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// The same point with the Y axis flipped.
    pub fn flip_y(&self) -> Self {
        Self::new(self.x, -self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from(v: (f64, f64)) -> Self {
        Self::new(v.0, v.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;

    #[test]
    fn arithmetic() -> Result<()> {
        let p: Point = (3.0, 4.0).into();
        assert_eq!(Point::zero() + p, p);
        assert_eq!(p - p, Point::zero());
        assert_eq!(-p, Point::new(-3.0, -4.0));
        assert_eq!(p.flip_y(), Point::new(3.0, -4.0));
        assert!(!p.is_zero());
        Ok(())
    }
}
