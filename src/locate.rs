//! Quiet-zone search over a forward-energy map.
//!
//! Smooths the map with the fixed Gaussian from [`crate::grid`], takes the
//! global minimum, and nudges minima that hug the top or left border back
//! toward the interior so the overlay never sits flush against an edge.

use crate::grid::EnergyGrid;

/// A pixel position in row/column order.
///
/// The scan primitives in this crate report positions column-first, the
/// way raster loops iterate; everything that touches image rows wants
/// row-first. This type exists so the swap happens in exactly one place,
/// [`Coord::from_xy`], instead of at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Vertical offset from the top edge, in pixels.
    pub row: u32,
    /// Horizontal offset from the left edge, in pixels.
    pub col: u32,
}

impl Coord {
    /// Build a coordinate from a column-first `(x, y)` pair.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_xy(x: usize, y: usize) -> Self {
        Self {
            row: y as u32,
            col: x as u32,
        }
    }
}

/// Locate the visually quietest point of an energy map.
///
/// The map is smoothed, then scanned for its global minimum; ties resolve
/// to the first cell in row-major order. If the winning cell lies within
/// the guard margin of the top or left edge (one twentieth of the map
/// height), the anchor steps diagonally inward by the full margin on both
/// axes at once. The bottom and right edges are left to the placement
/// clamp downstream, and on very wide, short maps the diagonal step can
/// land past the right edge, which that clamp also absorbs.
///
/// # Panics
///
/// Panics if `energy` is empty.
#[must_use]
pub fn quiet_zone(energy: &EnergyGrid) -> Coord {
    let (x, y) = energy.smoothed().min_location();
    let mut anchor = Coord::from_xy(x, y);
    let radius = guard_radius(energy.height());
    if anchor.col < radius || anchor.row < radius {
        anchor.col += radius;
        anchor.row += radius;
    }
    anchor
}

#[allow(clippy::cast_possible_truncation)]
fn guard_radius(height: usize) -> u32 {
    (height / 20) as u32
}
