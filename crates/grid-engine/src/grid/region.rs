//! Sub-grid and point-set extraction by inclusive index ranges.
//!
//! Ranges are validated but never clamped. Every bound must lie inside the
//! grid, so a region is never larger than its source.

use serde::{Deserialize, Serialize};

use super::Grid;
use crate::cell::CellValue;
use crate::error::{GridError, Result};
use crate::index::SpatialIndex;
use crate::structure::Dimension;

/// Parallel sequences of indices and the values found at them, in flat order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block<T> {
    pub indices: Vec<SpatialIndex>,
    pub values: Vec<Option<T>>,
}

impl<T> Block<T> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(index, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&SpatialIndex, &Option<T>)> {
        self.indices.iter().zip(self.values.iter())
    }
}

/// Validated inclusive bounds on all three axes.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    lo: [i32; 3],
    hi: [i32; 3],
}

impl Bounds {
    fn counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for axis in 0..3 {
            counts[axis] = (i64::from(self.hi[axis]) - i64::from(self.lo[axis]) + 1) as usize;
        }
        counts
    }

    /// Every position in the range with I fastest, then J, then K.
    fn positions(&self) -> impl Iterator<Item = (i32, i32, i32)> {
        let Bounds { lo, hi } = *self;
        (lo[2]..=hi[2]).flat_map(move |k| {
            (lo[1]..=hi[1]).flat_map(move |j| (lo[0]..=hi[0]).map(move |i| (i, j, k)))
        })
    }
}

fn check_axis(axis: &str, lo: i32, hi: i32, count: usize, zero_slice_ok: bool) -> Result<()> {
    let zero_slice = zero_slice_ok && lo == 0 && hi == 0;
    if lo >= hi && !zero_slice {
        return Err(GridError::index_range(format!(
            "{axis}1 ({lo}) must be less than {axis}2 ({hi})"
        )));
    }
    if lo < 0 || i64::from(hi) >= count as i64 {
        return Err(GridError::index_range(format!(
            "{axis} range [{lo}, {hi}] exceeds the grid (0..{count})"
        )));
    }
    Ok(())
}

fn around(center: i32, radius: i32) -> (i32, i32) {
    (center.saturating_sub(radius), center.saturating_add(radius))
}

impl<T: CellValue> Grid<T> {
    /// Copy the inclusive 2D range `[i1, i2] x [j1, j2]` into a new grid.
    ///
    /// The new grid's origin is the reference point of cell `(i1, j1)`.
    pub fn region_by_range(&self, i1: i32, i2: i32, j1: i32, j2: i32) -> Result<Self> {
        self.require_dimension(Dimension::TwoD, "region_by_range")?;
        let bounds = self.bounds_2d(i1, i2, j1, j2)?;
        self.extract(bounds)
    }

    /// Copy the inclusive 3D range into a new grid. `k1 == k2 == 0` selects
    /// the bottom layer only.
    pub fn region_by_range_3d(
        &self,
        i1: i32,
        i2: i32,
        j1: i32,
        j2: i32,
        k1: i32,
        k2: i32,
    ) -> Result<Self> {
        self.require_dimension(Dimension::ThreeD, "region_by_range_3d")?;
        let bounds = self.bounds_3d([i1, j1, k1], [i2, j2, k2])?;
        self.extract(bounds)
    }

    /// Same as [`region_by_range`](Self::region_by_range) over
    /// `[i - i_radius, i + i_radius] x [j - j_radius, j + j_radius]`.
    pub fn region_by_center(&self, i: i32, i_radius: i32, j: i32, j_radius: i32) -> Result<Self> {
        let (i1, i2) = around(i, i_radius);
        let (j1, j2) = around(j, j_radius);
        self.region_by_range(i1, i2, j1, j2)
    }

    pub fn region_by_center_3d(
        &self,
        i: i32,
        i_radius: i32,
        j: i32,
        j_radius: i32,
        k: i32,
        k_radius: i32,
    ) -> Result<Self> {
        let (i1, i2) = around(i, i_radius);
        let (j1, j2) = around(j, j_radius);
        let (k1, k2) = around(k, k_radius);
        self.region_by_range_3d(i1, i2, j1, j2, k1, k2)
    }

    /// Collect the indices and values of a 2D range without building a grid.
    pub fn block_by_range(&self, i1: i32, i2: i32, j1: i32, j2: i32) -> Result<Block<T>> {
        self.require_dimension(Dimension::TwoD, "block_by_range")?;
        let bounds = self.bounds_2d(i1, i2, j1, j2)?;
        Ok(self.collect_block(bounds, |i, j, _| SpatialIndex::new_2d(i, j)))
    }

    pub fn block_by_range_3d(
        &self,
        i1: i32,
        i2: i32,
        j1: i32,
        j2: i32,
        k1: i32,
        k2: i32,
    ) -> Result<Block<T>> {
        self.require_dimension(Dimension::ThreeD, "block_by_range_3d")?;
        let bounds = self.bounds_3d([i1, j1, k1], [i2, j2, k2])?;
        Ok(self.collect_block(bounds, SpatialIndex::new_3d))
    }

    pub fn block_by_center(&self, i: i32, i_radius: i32, j: i32, j_radius: i32) -> Result<Block<T>> {
        let (i1, i2) = around(i, i_radius);
        let (j1, j2) = around(j, j_radius);
        self.block_by_range(i1, i2, j1, j2)
    }

    pub fn block_by_center_3d(
        &self,
        i: i32,
        i_radius: i32,
        j: i32,
        j_radius: i32,
        k: i32,
        k_radius: i32,
    ) -> Result<Block<T>> {
        let (i1, i2) = around(i, i_radius);
        let (j1, j2) = around(j, j_radius);
        let (k1, k2) = around(k, k_radius);
        self.block_by_range_3d(i1, i2, j1, j2, k1, k2)
    }

    fn bounds_2d(&self, i1: i32, i2: i32, j1: i32, j2: i32) -> Result<Bounds> {
        check_axis("I", i1, i2, self.i_count(), false)?;
        check_axis("J", j1, j2, self.j_count(), false)?;
        Ok(Bounds {
            lo: [i1, j1, 0],
            hi: [i2, j2, 0],
        })
    }

    fn bounds_3d(&self, lo: [i32; 3], hi: [i32; 3]) -> Result<Bounds> {
        check_axis("I", lo[0], hi[0], self.i_count(), false)?;
        check_axis("J", lo[1], hi[1], self.j_count(), false)?;
        check_axis("K", lo[2], hi[2], self.k_count(), true)?;
        Ok(Bounds { lo, hi })
    }

    fn extract(&self, bounds: Bounds) -> Result<Self> {
        let structure = self
            .structure
            .derive(bounds.counts(), (bounds.lo[0], bounds.lo[1], bounds.lo[2]))?;
        let cells = bounds
            .positions()
            .map(|(i, j, k)| self.read(self.structure.offset_of(i, j, k)))
            .collect();
        Self::from_cells(structure, cells)
    }

    fn collect_block(
        &self,
        bounds: Bounds,
        make_index: impl Fn(i32, i32, i32) -> SpatialIndex,
    ) -> Block<T> {
        let (indices, values) = bounds
            .positions()
            .map(|(i, j, k)| (make_index(i, j, k), self.read(self.structure.offset_of(i, j, k))))
            .unzip();
        Block { indices, values }
    }
}
