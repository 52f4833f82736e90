//! Overlay scaling, placement geometry, and alpha compositing.
//!
//! Watermarks are applied via forward alpha blending:
//! `out = alpha * overlay + (1 - alpha) * base`
//!
//! The overlay is first resized relative to the base image, then centered
//! on the requested anchor. Placements that stick out past the top or left
//! edge are shifted back inside without shrinking; overhang past the
//! bottom or right edge is simply not painted.

use image::imageops::{self, FilterType};
use image::{RgbImage, RgbaImage};

use crate::error::{Error, Result};
use crate::locate::Coord;

/// The resized overlay is this fraction of the shorter base side wide.
const OVERLAY_FRACTION: u32 = 8;

/// Placement rectangle in row/column order, half-open on both axes.
///
/// Coordinates are signed so a rectangle centered near an edge can be
/// represented before clamping pulls it back inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// First painted row.
    pub top: i64,
    /// First painted column.
    pub left: i64,
    /// One past the last painted row.
    pub bottom: i64,
    /// One past the last painted column.
    pub right: i64,
}

impl Rect {
    /// Rectangle of `width` x `height` centered on `center`, with integer
    /// halves rounding toward the top-left.
    #[must_use]
    pub fn from_center(center: Coord, width: u32, height: u32) -> Self {
        let top = i64::from(center.row) - i64::from(height / 2);
        let left = i64::from(center.col) - i64::from(width / 2);
        Self {
            top,
            left,
            bottom: top + i64::from(height),
            right: left + i64::from(width),
        }
    }

    /// Shift the rectangle so it starts at or after row 0 and column 0.
    ///
    /// Each axis that starts negative is translated inward by exactly the
    /// overshoot, preserving the rectangle's size. Applying this twice is
    /// a no-op.
    #[must_use]
    pub fn clamped_to_origin(mut self) -> Self {
        if self.top < 0 {
            self.bottom -= self.top;
            self.top = 0;
        }
        if self.left < 0 {
            self.right -= self.left;
            self.left = 0;
        }
        self
    }

    /// Rectangle width in pixels.
    #[must_use]
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Rectangle height in pixels.
    #[must_use]
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }
}

/// Target size for an overlay placed on a base image.
///
/// The overlay is scaled to one eighth of the shorter base side in width,
/// with height following the overlay's aspect ratio. All arithmetic is
/// integer, rounding down, so tiny base images can produce a zero-size
/// target; [`composite`] rejects that case.
///
/// # Panics
///
/// Panics if `overlay_width` is zero.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn scaled_overlay_size(
    base_width: u32,
    base_height: u32,
    overlay_width: u32,
    overlay_height: u32,
) -> (u32, u32) {
    let side = base_width.min(base_height) / OVERLAY_FRACTION;
    let height = u64::from(side) * u64::from(overlay_height) / u64::from(overlay_width);
    (side, height as u32)
}

/// Resize `overlay` relative to `base` and blend it in, centered on `center`.
///
/// The overlay is scaled per [`scaled_overlay_size`] with bilinear
/// filtering, centered on the anchor, shifted inside the top and left
/// edges, and alpha-blended pixel by pixel. Fully transparent overlay
/// pixels leave the base untouched bit for bit; fully opaque pixels
/// replace it. The returned rectangle is the region actually painted:
/// shifted inside the top and left edges, truncated at the bottom and
/// right, so both corners always lie within the base image.
///
/// # Errors
///
/// Returns [`Error::EmptyImage`] if the overlay has no pixels or the
/// scaled target collapses to zero in either dimension, and
/// [`Error::PlacementOutsideImage`] if the shifted rectangle starts at or
/// past the bottom or right edge of the base.
pub fn composite(base: &mut RgbImage, overlay: &RgbaImage, center: Coord) -> Result<Rect> {
    let (ow, oh) = overlay.dimensions();
    if ow == 0 || oh == 0 {
        return Err(Error::EmptyImage {
            width: ow,
            height: oh,
        });
    }

    let (bw, bh) = base.dimensions();
    let (tw, th) = scaled_overlay_size(bw, bh, ow, oh);
    if tw == 0 || th == 0 {
        return Err(Error::EmptyImage {
            width: tw,
            height: th,
        });
    }
    let resized = imageops::resize(overlay, tw, th, FilterType::Triangle);

    let rect = Rect::from_center(center, tw, th).clamped_to_origin();
    let y_end = rect.bottom.min(i64::from(bh));
    let x_end = rect.right.min(i64::from(bw));
    if rect.top >= y_end || rect.left >= x_end {
        return Err(Error::PlacementOutsideImage {
            top: rect.top,
            left: rect.left,
            bottom: rect.bottom,
            right: rect.right,
            width: bw,
            height: bh,
        });
    }

    let rect = Rect {
        bottom: y_end,
        right: x_end,
        ..rect
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x0, y0) = (rect.left as u32, rect.top as u32);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (paint_w, paint_h) = (rect.width() as u32, rect.height() as u32);

    for dy in 0..paint_h {
        for dx in 0..paint_w {
            let ov = resized.get_pixel(dx, dy);
            // Zero alpha needs no blend and must not disturb the base.
            if ov[3] == 0 {
                continue;
            }
            let alpha = f32::from(ov[3]) / 255.0;
            let inv_alpha = 1.0 - alpha;

            let px = base.get_pixel_mut(x0 + dx, y0 + dy);
            for ch in 0..3 {
                let blended = alpha * f32::from(ov[ch]) + inv_alpha * f32::from(px[ch]);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    px[ch] = blended.clamp(0.0, 255.0) as u8;
                }
            }
        }
    }

    Ok(rect)
}
