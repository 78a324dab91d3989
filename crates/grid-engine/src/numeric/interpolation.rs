//! Bilinear interpolation over nullable cells.

use tracing::debug;

use super::NumericGrid;
use crate::error::Result;
use crate::structure::{Dimension, GridStructure};

/// Fractions below this are treated as lying exactly on a cell.
const EPSILON: f64 = 1e-4;

/// Bilinear interpolation at fractional cell coordinates `(i, j)`.
///
/// `data` is a 2D buffer with I varying fastest. On the last column (or row)
/// and at integer coordinates only the neighbours actually needed are read,
/// so the stored value comes back unchanged there. Returns `None` outside the
/// grid or when a needed neighbour is empty.
pub fn bilinear_interpolate(
    data: &[Option<f64>],
    i_count: usize,
    j_count: usize,
    i: f64,
    j: f64,
) -> Option<f64> {
    if i_count == 0 || j_count == 0 {
        return None;
    }
    if !i.is_finite() || !j.is_finite() || i < 0.0 || j < 0.0 {
        return None;
    }
    if i > (i_count - 1) as f64 || j > (j_count - 1) as f64 {
        return None;
    }

    let i0 = i.floor() as usize;
    let j0 = j.floor() as usize;
    let u = i - i0 as f64;
    let v = j - j0 as f64;
    let step_i = u > EPSILON && i0 + 1 < i_count;
    let step_j = v > EPSILON && j0 + 1 < j_count;

    let at = |ii: usize, jj: usize| data.get(jj * i_count + ii).copied().flatten();

    let v00 = at(i0, j0)?;
    let near = if step_i {
        v00 * (1.0 - u) + at(i0 + 1, j0)? * u
    } else {
        v00
    };
    if !step_j {
        return Some(near);
    }

    let v01 = at(i0, j0 + 1)?;
    let far = if step_i {
        v01 * (1.0 - u) + at(i0 + 1, j0 + 1)? * u
    } else {
        v01
    };
    Some(near * (1.0 - v) + far * v)
}

impl NumericGrid {
    /// Bilinear value at fractional `(i, j)` of a 2D grid.
    pub fn bilinear_at(&self, i: f64, j: f64) -> Result<Option<f64>> {
        self.require_dimension(Dimension::TwoD, "bilinear_at")?;
        Ok(bilinear_interpolate(
            self.cells(),
            self.i_count(),
            self.j_count(),
            i,
            j,
        ))
    }

    /// Resample a 2D grid to `dest_i x dest_j` cells, sampling bilinearly at
    /// `floor(dest * src_count / dest_count)` on each axis.
    ///
    /// The result keeps this grid's cell sizes and origin.
    pub fn bilinear_resample(&self, dest_i: usize, dest_j: usize) -> Result<NumericGrid> {
        self.require_dimension(Dimension::TwoD, "bilinear_resample")?;
        let s = self.structure();
        let structure = GridStructure::new_3d(s.sizes(), [dest_i, dest_j, 1], s.origin())?;
        let (ni, nj) = (self.i_count(), self.j_count());

        let mut cells = Vec::with_capacity(dest_i * dest_j);
        for dj in 0..dest_j {
            let sj = (dj * nj / dest_j) as f64;
            for di in 0..dest_i {
                let si = (di * ni / dest_i) as f64;
                cells.push(bilinear_interpolate(self.cells(), ni, nj, si, sj));
            }
        }
        debug!(from = %s, to = %structure, "Bilinear resample");
        NumericGrid::from_cells(structure, cells)
    }
}
