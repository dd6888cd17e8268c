use crate::{Error, Result};

/// A width/height extent. Both dimensions are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Size {
    /// Construct a size without validation. Callers that take sizes from the
    /// outside world should use [`Size::try_new`].
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Construct a size, rejecting negative or non-finite dimensions.
    pub fn try_new(w: f64, h: f64) -> Result<Self> {
        if !w.is_finite() || !h.is_finite() {
            return Err(Error::NonFiniteSize { w, h });
        }
        if w < 0.0 || h < 0.0 {
            return Err(Error::NegativeSize { w, h });
        }
        Ok(Self { w, h })
    }

    /// Is either dimension zero?
    pub fn is_empty(&self) -> bool {
        self.w == 0.0 || self.h == 0.0
    }

    /// Width divided by height, or zero for an empty extent.
    pub fn aspect_ratio(&self) -> f64 {
        if self.h == 0.0 { 0.0 } else { self.w / self.h }
    }

    /// Scale both dimensions.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.w * factor, self.h * factor)
    }
}

impl From<(f64, f64)> for Size {
    #[inline]
    fn from(v: (f64, f64)) -> Self {
        Self::new(v.0, v.1)
    }
}
