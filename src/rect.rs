//! Normalized and pixel-space rectangles.
//!
//! A [`NormalizedRect`] describes the tag area as fractions of the image size,
//! so one rectangle works for every resolution. [`NormalizedRect::to_pixels`]
//! turns it into a [`PixelRect`] for a concrete image.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

const FIELD_NAMES: [&str; 4] = ["left", "top", "right", "bottom"];

/// Rectangle with coordinates normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    /// Left edge as a fraction of image width.
    pub left: f64,
    /// Top edge as a fraction of image height.
    pub top: f64,
    /// Right edge as a fraction of image width.
    pub right: f64,
    /// Bottom edge as a fraction of image height.
    pub bottom: f64,
}

impl Default for NormalizedRect {
    /// Top-right corner region, about 25% of the width and 10% of the height.
    fn default() -> Self {
        Self {
            left: 0.74,
            top: 0.02,
            right: 0.99,
            bottom: 0.12,
        }
    }
}

impl NormalizedRect {
    /// Create a rectangle, checking every coordinate lies in `[0, 1]`.
    ///
    /// The edges are not required to be ordered; [`to_pixels`](Self::to_pixels)
    /// swaps them as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RectOutOfRange`] naming the first offending field.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        for (field, value) in FIELD_NAMES.into_iter().zip([left, top, right, bottom]) {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::RectOutOfRange { field, value });
            }
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Convert to pixel bounds for an image of `width` x `height`.
    ///
    /// Each coordinate is scaled, rounded half-to-even and clamped into the
    /// image independently, then the pairs are put back in order.
    #[must_use]
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let left = scale(self.left, width);
        let top = scale(self.top, height);
        let right = scale(self.right, width);
        let bottom = scale(self.bottom, height);

        PixelRect {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(fraction: f64, dimension: u32) -> u32 {
    let dim = f64::from(dimension);
    // NaN saturates to 0 in the cast.
    (fraction * dim).round_ties_even().clamp(0.0, dim) as u32
}

impl FromStr for NormalizedRect {
    type Err = Error;

    /// Parse `"left,top,right,bottom"`, e.g. `"0.74,0.02,0.99,0.12"`.
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(Error::RectFieldCount { found: parts.len() });
        }

        let mut values = [0.0_f64; 4];
        for ((slot, part), field) in values.iter_mut().zip(&parts).zip(FIELD_NAMES) {
            *slot = part.parse().map_err(|_| Error::RectNotANumber {
                field,
                value: (*part).to_string(),
            })?;
        }

        let [left, top, right, bottom] = values;
        Self::new(left, top, right, bottom)
    }
}

impl fmt::Display for NormalizedRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.right, self.bottom)
    }
}

/// Rectangle in image pixel space.
///
/// `right` and `bottom` are exclusive bounds for sampling purposes, so an
/// image-sized rect is `(0, 0, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// Left edge, in `[0, width]`.
    pub left: u32,
    /// Top edge, in `[0, height]`.
    pub top: u32,
    /// Right edge, in `[left, width]`.
    pub right: u32,
    /// Bottom edge, in `[top, height]`.
    pub bottom: u32,
}

impl PixelRect {
    /// Horizontal extent in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Vertical extent in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Grow outward by `margin` on every side, clamped to a `width` x `height` image.
    #[must_use]
    pub fn expand(&self, margin: u32, width: u32, height: u32) -> Self {
        Self {
            left: self.left.saturating_sub(margin),
            top: self.top.saturating_sub(margin),
            right: self.right.saturating_add(margin).min(width),
            bottom: self.bottom.saturating_add(margin).min(height),
        }
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left, self.top, self.right, self.bottom
        )
    }
}
