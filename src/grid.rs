//! Owned single-channel `f32` grid in row-major layout.
//!
//! Backs the energy map produced by [`crate::energy::forward_energy`] and
//! provides the two numeric primitives the placement search needs: a
//! large-kernel Gaussian smoothing pass and a global-minimum location
//! search. Energy values range well past 1.0, which rules out the display
//! oriented blur in `image::imageops` (it clamps `f32` samples to the
//! [0, 1] pixel range), so the smoothing is a separable convolution over
//! the raw values.

use image::{GrayImage, Luma};

/// Side length of the smoothing kernel, in samples.
///
/// A tuned constant, not derived from the image size. Grids smaller than
/// the kernel fold the border reflection repeatedly, so results on inputs
/// under ~110 px are less stable than on full-size photographs.
const SMOOTH_KERNEL_SIZE: usize = 109;

/// Gaussian sigma used for energy smoothing.
const SMOOTH_SIGMA: f32 = 4.0;

/// A `height` x `width` grid of `f32` scalars, row-major, stride == width.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyGrid {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl EnergyGrid {
    /// Construct a zero-initialized grid of size `width` x `height`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Construct a grid from row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    #[must_use]
    pub fn from_raw(width: usize, height: usize, data: Vec<f32>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "grid data must be width * height samples"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Grid width in samples.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in samples.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at column `x`, row `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Row `y` as a slice.
    #[must_use]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// All samples, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Smooth the grid with a fixed 109x109 Gaussian and return the result.
    ///
    /// Separable convolution with reflect-101 border extrapolation (the
    /// border mirrors without repeating the edge sample). Dimensions are
    /// preserved; a uniform grid is a fixed point. Grids narrower or
    /// shorter than the kernel remain well-defined but fold the reflection
    /// several times, so placement on very small images is less consistent.
    #[must_use]
    pub fn smoothed(&self) -> Self {
        let mut tmp = Self::new(self.width, self.height);
        let mut out = Self::new(self.width, self.height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        let taps = gaussian_taps(SMOOTH_KERNEL_SIZE, SMOOTH_SIGMA);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            tmp.data
                .par_chunks_mut(self.width)
                .enumerate()
                .for_each(|(y, row)| smooth_row(self.row(y), row, &taps));
            out.data
                .par_chunks_mut(self.width)
                .enumerate()
                .for_each(|(y, row)| smooth_column_into(&tmp, y, row, &taps));
        }

        #[cfg(not(feature = "parallel"))]
        {
            for (y, row) in tmp.data.chunks_mut(self.width).enumerate() {
                smooth_row(self.row(y), row, &taps);
            }
            for (y, row) in out.data.chunks_mut(self.width).enumerate() {
                smooth_column_into(&tmp, y, row, &taps);
            }
        }

        out
    }

    /// Location of the global minimum as `(x, y)`, column first.
    ///
    /// Scans row-major; the first occurrence of the minimum wins, so the
    /// result is deterministic even on grids full of ties. Note the native
    /// order is column-then-row; convert through
    /// [`crate::locate::Coord::from_xy`] before indexing rows.
    ///
    /// # Panics
    ///
    /// Panics if the grid is empty.
    #[must_use]
    pub fn min_location(&self) -> (usize, usize) {
        assert!(!self.data.is_empty(), "minimum of an empty grid");
        let mut best = f32::INFINITY;
        let mut best_idx = 0usize;
        for (i, &v) in self.data.iter().enumerate() {
            if v < best {
                best = v;
                best_idx = i;
            }
        }
        (best_idx % self.width, best_idx / self.width)
    }

    /// Render the grid as an 8-bit grayscale image, scaled so the maximum
    /// value maps to 255. An all-zero grid renders black.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn to_gray_image(&self) -> GrayImage {
        let max = self.data.iter().fold(0.0_f32, |m, &v| m.max(v));
        let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let v = self.get(x as usize, y as usize) * scale;
            Luma([v.round().clamp(0.0, 255.0) as u8])
        })
    }
}

/// Normalized 1-D Gaussian taps of the given size.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn gaussian_taps(size: usize, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as isize;
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (0..size)
        .map(|k| {
            let d = (k as isize - radius) as f32;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Reflect-101 index extrapolation: `-1 -> 1`, `len -> len - 2`.
///
/// Iterates until the index lands inside `[0, len)`, which handles
/// kernels wider than the grid.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
fn reflect_101(mut idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = (len - 1) as isize;
    while idx < 0 || idx > last {
        if idx < 0 {
            idx = -idx;
        } else {
            idx = 2 * last - idx;
        }
    }
    idx as usize
}

#[allow(clippy::cast_possible_wrap)]
fn smooth_row(src: &[f32], dst: &mut [f32], taps: &[f32]) {
    let radius = (taps.len() / 2) as isize;
    let len = src.len();
    for (x, out) in dst.iter_mut().enumerate() {
        let mut acc = 0.0_f32;
        for (k, &tap) in taps.iter().enumerate() {
            let idx = reflect_101(x as isize + k as isize - radius, len);
            acc += tap * src[idx];
        }
        *out = acc;
    }
}

/// Vertical pass: accumulate the taps row by row so each source row is
/// read contiguously.
#[allow(clippy::cast_possible_wrap)]
fn smooth_column_into(src: &EnergyGrid, y: usize, dst: &mut [f32], taps: &[f32]) {
    let radius = (taps.len() / 2) as isize;
    for (k, &tap) in taps.iter().enumerate() {
        let sy = reflect_101(y as isize + k as isize - radius, src.height);
        let row = src.row(sy);
        for (out, &v) in dst.iter_mut().zip(row) {
            *out += tap * v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_101_mirrors_without_edge_repeat() {
        assert_eq!(reflect_101(0, 5), 0);
        assert_eq!(reflect_101(4, 5), 4);
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
    }

    #[test]
    fn reflect_101_folds_repeatedly_for_short_rows() {
        assert_eq!(reflect_101(-6, 3), 2);
        assert_eq!(reflect_101(7, 3), 1);
        assert_eq!(reflect_101(54, 3), 2);
        // Degenerate single-sample axis always resolves to 0.
        assert_eq!(reflect_101(-13, 1), 0);
        assert_eq!(reflect_101(40, 1), 0);
    }

    #[test]
    fn gaussian_taps_are_normalized_and_symmetric() {
        let taps = gaussian_taps(109, 4.0);
        assert_eq!(taps.len(), 109);
        let sum: f32 = taps.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "taps should sum to 1, got {sum}");
        for k in 0..54 {
            assert_eq!(taps[k], taps[108 - k], "tap {k} should mirror");
        }
        let center = taps[54];
        assert!(taps.iter().all(|&t| t <= center));
    }

    #[test]
    fn min_location_returns_first_occurrence_in_scan_order() {
        let grid = EnergyGrid::from_raw(3, 2, vec![3.0, 1.0, 9.0, 1.0, 2.0, 1.0]);
        assert_eq!(grid.min_location(), (1, 0));
    }

    #[test]
    fn min_location_of_uniform_grid_is_origin() {
        let grid = EnergyGrid::new(10, 600);
        assert_eq!(grid.min_location(), (0, 0));
    }

    #[test]
    fn smoothed_preserves_dimensions() {
        let grid = EnergyGrid::new(23, 17);
        let out = grid.smoothed();
        assert_eq!(out.width(), 23);
        assert_eq!(out.height(), 17);
    }

    #[test]
    fn smoothed_zero_grid_stays_zero() {
        let grid = EnergyGrid::new(16, 16);
        let out = grid.smoothed();
        assert!(out.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn smoothed_uniform_grid_stays_uniform() {
        let grid = EnergyGrid::from_raw(8, 6, vec![40.0; 8 * 6]);
        let out = grid.smoothed();
        for &v in out.as_slice() {
            assert!((v - 40.0).abs() < 1e-2, "expected ~40, got {v}");
        }
    }

    #[test]
    fn smoothed_impulse_is_symmetric_and_conserves_mass() {
        let mut data = vec![0.0_f32; 200 * 200];
        data[100 * 200 + 100] = 1.0;
        let grid = EnergyGrid::from_raw(200, 200, data);
        let out = grid.smoothed();

        // Kernel radius 54 keeps the response away from the borders.
        for d in 1..10 {
            assert_eq!(out.get(100 - d, 100), out.get(100 + d, 100));
            assert_eq!(out.get(100, 100 - d), out.get(100, 100 + d));
        }
        let mass: f32 = out.as_slice().iter().sum();
        assert!((mass - 1.0).abs() < 1e-3, "mass should be ~1, got {mass}");
        assert_eq!(out.min_location(), (0, 0), "far field should stay zero");
    }

    #[test]
    fn to_gray_image_normalizes_to_full_range() {
        let grid = EnergyGrid::from_raw(2, 2, vec![0.0, 2.0, 4.0, 8.0]);
        let img = grid.to_gray_image();
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
        assert_eq!(img.get_pixel(1, 0).0[0], 64);
        assert_eq!(img.get_pixel(0, 1).0[0], 128);
        assert_eq!(img.get_pixel(1, 1).0[0], 255);
    }

    #[test]
    fn to_gray_image_of_zero_grid_is_black() {
        let img = EnergyGrid::new(4, 3).to_gray_image();
        assert!(img.pixels().all(|p| p.0[0] == 0));
        assert_eq!(img.dimensions(), (4, 3));
    }
}
