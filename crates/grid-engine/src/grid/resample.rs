//! Nearest-neighbour resampling and fixed-stride decimation.

use tracing::debug;

use super::Grid;
use crate::cell::CellValue;
use crate::error::Result;
use crate::structure::{Dimension, GridStructure};

/// Source index for destination index `dest` when mapping `src_count` cells
/// onto `dest_count` cells: `floor(dest * src_count / dest_count)`.
fn source_index(dest: usize, src_count: usize, dest_count: usize) -> i32 {
    (dest * src_count / dest_count) as i32
}

impl<T: CellValue> Grid<T> {
    /// Resample a 2D grid to `dest_i x dest_j` cells by nearest neighbour.
    ///
    /// The result keeps this grid's cell sizes and origin. Resampling to the
    /// current shape returns an equal grid.
    pub fn nearest_neighbor_resample(&self, dest_i: usize, dest_j: usize) -> Result<Self> {
        self.require_dimension(Dimension::TwoD, "nearest_neighbor_resample")?;
        let s = self.structure();
        let structure = GridStructure::new_3d(s.sizes(), [dest_i, dest_j, 1], s.origin())?;
        self.resample_into(structure)
    }

    /// Resample a 3D grid to `dest_i x dest_j x dest_k` cells by nearest
    /// neighbour.
    pub fn nearest_neighbor_resample_3d(
        &self,
        dest_i: usize,
        dest_j: usize,
        dest_k: usize,
    ) -> Result<Self> {
        self.require_dimension(Dimension::ThreeD, "nearest_neighbor_resample_3d")?;
        let s = self.structure();
        let structure = GridStructure::new_3d(s.sizes(), [dest_i, dest_j, dest_k], s.origin())?;
        self.resample_into(structure)
    }

    /// Keep every `(spacing + 1)`-th cell along each axis.
    ///
    /// Only decimates; a spacing of 0 copies the grid. Cell sizes grow by the
    /// stride so the physical extent is roughly preserved.
    pub fn resample_with_spacing(&self, spacing: usize) -> Result<Self> {
        let stride = spacing + 1;
        let counts = [
            self.i_count().div_ceil(stride),
            self.j_count().div_ceil(stride),
            self.k_count().div_ceil(stride),
        ];
        let scale = stride as f64;
        let k_scale = match self.dimension() {
            Dimension::TwoD => 1.0,
            Dimension::ThreeD => scale,
        };
        let structure = self.structure().rescaled(counts, [scale, scale, k_scale])?;

        let mut cells = Vec::with_capacity(structure.cell_count());
        for k in 0..structure.k_count() {
            for j in 0..structure.j_count() {
                for i in 0..structure.i_count() {
                    let offset = self.structure().offset_of(
                        (i * stride) as i32,
                        (j * stride) as i32,
                        (k * stride) as i32,
                    );
                    cells.push(offset.and_then(|o| self.cells[o]));
                }
            }
        }
        debug!(
            spacing,
            from = %self.structure(),
            to = %structure,
            "Decimated grid"
        );
        Self::from_cells(structure, cells)
    }

    fn resample_into(&self, structure: GridStructure) -> Result<Self> {
        let src = self.structure();
        let (ni, nj, nk) = (structure.i_count(), structure.j_count(), structure.k_count());
        let mut cells = Vec::with_capacity(structure.cell_count());
        for k in 0..nk {
            let sk = source_index(k, src.k_count(), nk);
            for j in 0..nj {
                let sj = source_index(j, src.j_count(), nj);
                for i in 0..ni {
                    let si = source_index(i, src.i_count(), ni);
                    cells.push(src.offset_of(si, sj, sk).and_then(|o| self.cells[o]));
                }
            }
        }
        debug!(
            from = %src,
            to = %structure,
            "Nearest-neighbour resample"
        );
        Self::from_cells(structure, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn ramp(ni: usize, nj: usize) -> Grid<i32> {
        let gs = GridStructure::simple_2d(ni, nj).unwrap();
        let cells = (0..(ni * nj) as i32).map(Some).collect();
        Grid::from_cells(gs, cells).unwrap()
    }

    #[test]
    fn test_same_shape_is_identity() {
        let mut grid = ramp(5, 3);
        grid.set_cell(2, 1, None).unwrap();
        assert_eq!(grid.nearest_neighbor_resample(5, 3).unwrap(), grid);
    }

    #[test]
    fn test_upsample_repeats_cells() {
        let grid = ramp(2, 2);
        let up = grid.nearest_neighbor_resample(4, 4).unwrap();
        assert_eq!(up.cell(0, 0).unwrap(), Some(0));
        assert_eq!(up.cell(1, 1).unwrap(), Some(0));
        assert_eq!(up.cell(2, 0).unwrap(), Some(1));
        assert_eq!(up.cell(3, 3).unwrap(), Some(3));
        assert_eq!(up.structure().i_size(), 1.0);
    }

    #[test]
    fn test_downsample_picks_floor_source() {
        let grid = ramp(6, 1);
        let down = grid.nearest_neighbor_resample(3, 1).unwrap();
        let values: Vec<_> = down.iter().collect();
        assert_eq!(values, vec![Some(0), Some(2), Some(4)]);
    }

    #[test]
    fn test_non_square_axes_not_swapped() {
        let grid = ramp(4, 2);
        let out = grid.nearest_neighbor_resample(2, 4).unwrap();
        assert_eq!((out.i_count(), out.j_count()), (2, 4));
        assert_eq!(out.cell(1, 3).unwrap(), Some(6));
    }

    #[test]
    fn test_resample_rejects_wrong_dimension_or_zero() {
        let deep: Grid<i32> = Grid::new(GridStructure::simple_3d(2, 2, 2).unwrap());
        assert!(matches!(
            deep.nearest_neighbor_resample(2, 2),
            Err(GridError::DimensionMismatch(_))
        ));
        assert!(ramp(2, 2).nearest_neighbor_resample_3d(2, 2, 2).is_err());
        assert!(ramp(2, 2).nearest_neighbor_resample(0, 2).is_err());
    }

    #[test]
    fn test_resample_3d() {
        let gs = GridStructure::simple_3d(2, 2, 2).unwrap();
        let grid = Grid::from_cells(gs, (0..8).map(Some).collect()).unwrap();
        let up = grid.nearest_neighbor_resample_3d(4, 4, 4).unwrap();
        assert_eq!(up.cell_3d(3, 3, 3).unwrap(), Some(7));
        assert_eq!(up.cell_3d(0, 0, 2).unwrap(), Some(4));
    }

    #[test]
    fn test_spacing_decimates() {
        let grid = ramp(5, 4);
        let out = grid.resample_with_spacing(1).unwrap();
        assert_eq!((out.i_count(), out.j_count()), (3, 2));
        assert_eq!(out.cell(1, 0).unwrap(), Some(2));
        assert_eq!(out.cell(2, 1).unwrap(), Some(14));
        assert_eq!(out.structure().i_size(), 2.0);
        assert_eq!(out.structure().origin_x(), 0.5);

        assert_eq!(grid.resample_with_spacing(0).unwrap(), grid);
    }

    #[test]
    fn test_flat_grid_keeps_layer_geometry() {
        let gs = GridStructure::new_3d([25.0, 25.0, 2.5], [4, 3, 1], [1000.0, 2000.0, -50.0]).unwrap();
        let grid: Grid<i32> = Grid::from_cells(gs, (0..12).map(Some).collect()).unwrap();

        let up = grid.nearest_neighbor_resample(8, 6).unwrap();
        assert_eq!(up.structure().k_size(), 2.5);
        assert_eq!(up.structure().origin_z(), -50.0);

        let sparse = grid.resample_with_spacing(1).unwrap();
        assert_eq!(sparse.structure().i_size(), 50.0);
        assert_eq!(sparse.structure().k_size(), 2.5);
        assert_eq!(sparse.structure().origin_z(), -50.0);
    }
}
