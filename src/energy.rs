//! Forward-energy map computation.
//!
//! Forward energy scores each pixel by the cost its removal would *create*:
//! the absolute intensity differences between the neighbors that would
//! become adjacent, accumulated along the cheapest vertical path from the
//! top of the image. Flat regions accumulate nothing, texture and edges
//! accumulate quickly, which makes the low end of the map a good proxy for
//! "visually quiet".

use image::RgbImage;

use crate::grid::EnergyGrid;

/// Compute the forward-energy map of `image`.
///
/// The map has one `f32` cell per pixel. Row 0 is all zeros; each later
/// cell holds the incremental cost of the cheapest of the three seam steps
/// (straight up, up-left, up-right) that reaches it. Columns wrap at the
/// left and right edges, and ties between steps resolve in up, left, right
/// order, so the map is fully deterministic.
#[must_use]
pub fn forward_energy(image: &RgbImage) -> EnergyGrid {
    let (w, h) = image.dimensions();
    let (w, h) = (w as usize, h as usize);
    let gray = grayscale(image);
    let mut energy = EnergyGrid::new(w, h);

    // Cumulative path cost of the previous row; row 0 starts at zero.
    let mut m_prev = vec![0.0_f32; w];
    let mut m_curr = vec![0.0_f32; w];

    for i in 1..h {
        let row = &gray[i * w..(i + 1) * w];
        let above = &gray[(i - 1) * w..i * w];
        let out = energy.row_mut(i);
        for (j, cell) in out.iter_mut().enumerate() {
            let jl = if j == 0 { w - 1 } else { j - 1 };
            let jr = if j + 1 == w { 0 } else { j + 1 };
            let l = row[jl];
            let r = row[jr];
            let u = above[j];

            let c_u = (r - l).abs();
            let c_l = (u - l).abs() + c_u;
            let c_r = (u - r).abs() + c_u;

            let t_u = m_prev[j] + c_u;
            let t_l = m_prev[jl] + c_l;
            let t_r = m_prev[jr] + c_r;

            // First minimum wins: up, then left, then right.
            let (total, cost) = if t_u <= t_l && t_u <= t_r {
                (t_u, c_u)
            } else if t_l <= t_r {
                (t_l, c_l)
            } else {
                (t_r, c_r)
            };
            m_curr[j] = total;
            *cell = cost;
        }
        std::mem::swap(&mut m_prev, &mut m_curr);
    }

    energy
}

/// Rec. 601 grayscale, rounded to whole 8-bit levels before promotion.
///
/// Rounding first keeps every downstream difference integer-valued, so
/// equal-energy regions compare exactly equal instead of drifting apart
/// by float noise.
fn grayscale(image: &RgbImage) -> Vec<f32> {
    image
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
            y.round()
        })
        .collect()
}
