//! Background color estimation around a target rectangle.
//!
//! The fill color is the per-channel median of a thin ring of pixels just
//! outside the rectangle. Channels are sorted independently, so the result can
//! be a color that never occurs in the sample.

use image::{GenericImageView, Rgb, RgbImage};
use tracing::debug;

use crate::rect::PixelRect;

/// Color returned when no background can be sampled.
pub const FALLBACK_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Ring thickness for an image: about 0.5% of the shorter side, at least 1px.
#[must_use]
pub fn ring_margin(width: u32, height: u32) -> u32 {
    (width.min(height) / 200).max(1)
}

/// Border strips between `rect` and its expanded sampling bounds.
///
/// Returns up to four non-empty strips in the order above, below, left, right.
/// The above and below strips span the full expanded width, so they own the
/// corners.
#[must_use]
pub fn ring_strips(rect: PixelRect, width: u32, height: u32) -> Vec<PixelRect> {
    let ring = rect.expand(ring_margin(width, height), width, height);

    let candidates = [
        PixelRect {
            left: ring.left,
            top: ring.top,
            right: ring.right,
            bottom: rect.top,
        },
        PixelRect {
            left: ring.left,
            top: rect.bottom,
            right: ring.right,
            bottom: ring.bottom,
        },
        PixelRect {
            left: ring.left,
            top: rect.top,
            right: rect.left,
            bottom: rect.bottom,
        },
        PixelRect {
            left: rect.right,
            top: rect.top,
            right: ring.right,
            bottom: rect.bottom,
        },
    ];

    candidates.into_iter().filter(|s| !s.is_empty()).collect()
}

/// Collect the ring pixels, or `None` when `rect` does not fit in the image.
fn ring_pixels(image: &RgbImage, rect: PixelRect) -> Option<Vec<Rgb<u8>>> {
    let (width, height) = image.dimensions();
    if rect.left > rect.right
        || rect.top > rect.bottom
        || rect.right > width
        || rect.bottom > height
    {
        return None;
    }

    let mut pixels = Vec::new();
    for strip in ring_strips(rect, width, height) {
        let view = image.view(strip.left, strip.top, strip.width(), strip.height());
        pixels.extend(view.pixels().map(|(_, _, px)| px));
    }
    Some(pixels)
}

/// Per-channel median of a non-empty pixel sample.
///
/// Uses the upper middle element (`len / 2`) for even-sized samples.
///
/// # Panics
///
/// Panics if `pixels` is empty.
#[must_use]
pub fn per_channel_median(pixels: &[Rgb<u8>]) -> Rgb<u8> {
    let mid = pixels.len() / 2;
    let mut out = [0u8; 3];
    let mut channel = Vec::with_capacity(pixels.len());
    for (ch, slot) in out.iter_mut().enumerate() {
        channel.clear();
        channel.extend(pixels.iter().map(|px| px[ch]));
        channel.sort_unstable();
        *slot = channel[mid];
    }
    Rgb(out)
}

/// Estimate the background color around `rect`.
///
/// Never fails: an empty ring or a rectangle outside the image yields
/// [`FALLBACK_COLOR`].
#[must_use]
pub fn compute_fill_color(image: &RgbImage, rect: PixelRect) -> Rgb<u8> {
    match ring_pixels(image, rect) {
        Some(pixels) if !pixels.is_empty() => {
            let color = per_channel_median(&pixels);
            debug!(samples = pixels.len(), ?color, "sampled background");
            color
        }
        Some(_) => {
            debug!(%rect, "sampling ring is empty, using white");
            FALLBACK_COLOR
        }
        None => {
            debug!(%rect, "rectangle outside image, using white");
            FALLBACK_COLOR
        }
    }
}
