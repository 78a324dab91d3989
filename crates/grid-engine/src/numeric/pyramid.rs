//! Gaussian pyramid: 5x5 smoothing with factor-2 reduction and expansion.
//!
//! Both directions treat empty and out-of-grid cells as zero while
//! convolving, so values fall off towards the borders and around holes.
//! Expansion does not compensate for the inserted zeros: each 2x2 block of
//! `pyr_up` output sums to the source cell it came from, so a constant field
//! comes back at about a quarter of its level.

use tracing::debug;

use super::NumericGrid;
use crate::config::PyramidConfig;
use crate::error::Result;
use crate::structure::Dimension;

/// 5x5 Gaussian kernel, indexed `[dj][di]`.
pub const GAUSSIAN_KERNEL: [[f64; 5]; 5] = [
    [1.0, 4.0, 7.0, 4.0, 1.0],
    [4.0, 16.0, 26.0, 16.0, 4.0],
    [7.0, 26.0, 41.0, 26.0, 7.0],
    [4.0, 16.0, 26.0, 16.0, 4.0],
    [1.0, 4.0, 7.0, 4.0, 1.0],
];

/// Sum of [`GAUSSIAN_KERNEL`].
pub const KERNEL_WEIGHT: f64 = 273.0;

/// One level of a pyramid.
#[derive(Debug, Clone)]
pub struct PyramidLevel {
    /// Level index (0 = native).
    pub level: u32,
    /// Cell size factor relative to native (1, 2, 4, ...).
    pub scale: u32,
    pub grid: NumericGrid,
}

/// Convolve a 2D buffer with the Gaussian kernel. Empty and out-of-range
/// cells contribute zero.
fn convolve(data: &[Option<f64>], width: usize, height: usize) -> Vec<f64> {
    let mut out = vec![0.0; width * height];
    for j in 0..height {
        for i in 0..width {
            let mut sum = 0.0;
            for (kj, row) in GAUSSIAN_KERNEL.iter().enumerate() {
                let Some(sj) = (j + kj).checked_sub(2).filter(|&sj| sj < height) else {
                    continue;
                };
                for (ki, weight) in row.iter().enumerate() {
                    let Some(si) = (i + ki).checked_sub(2).filter(|&si| si < width) else {
                        continue;
                    };
                    if let Some(v) = data[sj * width + si] {
                        sum += v * weight;
                    }
                }
            }
            out[j * width + i] = sum / KERNEL_WEIGHT;
        }
    }
    out
}

impl NumericGrid {
    /// Smooth and halve a 2D grid.
    ///
    /// The result has `ceil(n / 2)` cells per axis, taken from the even
    /// source positions, and cell sizes doubled. Every cell is present.
    pub fn pyr_down(&self) -> Result<NumericGrid> {
        self.require_dimension(Dimension::TwoD, "pyr_down")?;
        let (ni, nj) = (self.i_count(), self.j_count());
        let smoothed = convolve(self.cells(), ni, nj);

        let (di, dj) = (ni.div_ceil(2), nj.div_ceil(2));
        let structure = self.structure().rescaled([di, dj, 1], [2.0, 2.0, 1.0])?;
        let mut cells = Vec::with_capacity(di * dj);
        for j in 0..dj {
            for i in 0..di {
                cells.push(Some(smoothed[2 * j * ni + 2 * i]));
            }
        }
        debug!(from = %self.structure(), to = %structure, "pyr_down");
        NumericGrid::from_cells(structure, cells)
    }

    /// Double a 2D grid and smooth it.
    ///
    /// Source cell `(i, j)` lands on `(2i, 2j)`, the cells in between start
    /// empty, and the whole expanded grid is convolved into a fresh buffer
    /// with the plain kernel weight. Cell sizes are halved.
    pub fn pyr_up(&self) -> Result<NumericGrid> {
        self.require_dimension(Dimension::TwoD, "pyr_up")?;
        let (ni, nj) = (self.i_count(), self.j_count());
        let (ui, uj) = (ni * 2, nj * 2);

        let mut expanded = vec![None; ui * uj];
        for j in 0..nj {
            for i in 0..ni {
                expanded[2 * j * ui + 2 * i] = self.cells()[j * ni + i];
            }
        }
        let smoothed = convolve(&expanded, ui, uj);

        let structure = self.structure().rescaled([ui, uj, 1], [0.5, 0.5, 1.0])?;
        debug!(from = %self.structure(), to = %structure, "pyr_up");
        NumericGrid::from_cells(structure, smoothed.into_iter().map(Some).collect())
    }

    /// Repeated [`pyr_down`](Self::pyr_down), starting with a copy of this
    /// grid as level 0.
    ///
    /// Stops before a level whose smaller side would drop below
    /// `config.min_dimension`, or once `config.max_levels` levels exist.
    pub fn pyramid(&self, config: &PyramidConfig) -> Result<Vec<PyramidLevel>> {
        self.require_dimension(Dimension::TwoD, "pyramid")?;
        let mut levels = vec![PyramidLevel {
            level: 0,
            scale: 1,
            grid: self.clone(),
        }];

        while levels.len() < config.max_levels {
            let Some(current) = levels.last() else { break };
            let (ni, nj) = (current.grid.i_count(), current.grid.j_count());
            let (next_i, next_j) = (ni.div_ceil(2), nj.div_ceil(2));
            if next_i.min(next_j) < config.min_dimension || (next_i, next_j) == (ni, nj) {
                break;
            }

            let next = PyramidLevel {
                level: current.level + 1,
                scale: current.scale * 2,
                grid: current.grid.pyr_down()?,
            };
            levels.push(next);
        }

        debug!(
            levels = levels.len(),
            base = %self.structure(),
            "Generated pyramid"
        );
        Ok(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::GridStructure;

    fn constant(ni: usize, nj: usize, value: f64) -> NumericGrid {
        let gs = GridStructure::simple_2d(ni, nj).unwrap();
        NumericGrid::from_cells(gs, vec![Some(value); ni * nj]).unwrap()
    }

    #[test]
    fn test_kernel_weight() {
        let total: f64 = GAUSSIAN_KERNEL.iter().flatten().sum();
        assert_eq!(total, KERNEL_WEIGHT);
    }

    #[test]
    fn test_pyr_down_shape_and_interior() {
        let grid = constant(9, 7, 3.0);
        let down = grid.pyr_down().unwrap();
        assert_eq!((down.i_count(), down.j_count()), (5, 4));
        assert_eq!(down.null_cell_count(), 0);
        assert_eq!(down.structure().i_size(), 2.0);

        // Source (4, 2) is at least two cells from every border.
        let interior = down.cell(2, 1).unwrap().unwrap();
        assert!((interior - 3.0).abs() < 1e-12);
        // Source corner loses the out-of-grid part of the kernel.
        let corner = down.cell(0, 0).unwrap().unwrap();
        assert!(corner < 3.0 && corner > 0.0);
    }

    #[test]
    fn test_pyr_down_treats_empty_as_zero() {
        let gs = GridStructure::simple_2d(5, 5).unwrap();
        let mut grid = NumericGrid::new(gs);
        grid.set_cell(2, 2, Some(273.0)).unwrap();
        let down = grid.pyr_down().unwrap();
        assert_eq!(down.cell(1, 1).unwrap(), Some(41.0));
        assert_eq!(down.cell(0, 0).unwrap(), Some(1.0));
        assert_eq!(down.cell(2, 0).unwrap(), Some(1.0));
    }

    #[test]
    fn test_pyr_up_shape_and_level() {
        let grid = constant(6, 6, 10.0);
        let up = grid.pyr_up().unwrap();
        assert_eq!((up.i_count(), up.j_count()), (12, 12));
        assert_eq!(up.structure().i_size(), 0.5);
        assert_eq!(up.null_cell_count(), 0);

        // Interior weights depend on the parity of the position.
        for (i, j, weight) in [(4, 4, 73.0), (5, 5, 64.0), (4, 5, 68.0), (7, 6, 68.0)] {
            let v = up.cell(i, j).unwrap().unwrap();
            assert!((v - 10.0 * weight / 273.0).abs() < 1e-12, "({i}, {j}) = {v}");
        }
    }

    #[test]
    fn test_down_then_up_keeps_shape_and_block_sums() {
        let c = 5.0;
        let grid = constant(16, 16, c);
        let round = grid.pyr_down().unwrap().pyr_up().unwrap();
        assert_eq!((round.i_count(), round.j_count()), (16, 16));
        assert_eq!(round.structure(), grid.structure());

        let block: f64 = [(4, 4), (5, 4), (4, 5), (5, 5)]
            .iter()
            .map(|&(i, j)| round.cell(i, j).unwrap().unwrap())
            .sum();
        assert!((block - c).abs() < 1e-12, "block sum {block}");

        for j in 4..12 {
            for i in 4..12 {
                let v = round.cell(i, j).unwrap().unwrap();
                assert!(v >= 0.2 * c && v <= 0.3 * c, "({i}, {j}) = {v}");
            }
        }
    }

    #[test]
    fn test_pyr_rejects_3d() {
        let grid = NumericGrid::new(GridStructure::simple_3d(4, 4, 2).unwrap());
        assert!(grid.pyr_down().is_err());
        assert!(grid.pyr_up().is_err());
        assert!(grid.pyramid(&PyramidConfig::default()).is_err());
    }

    #[test]
    fn test_pyramid_levels() {
        let grid = constant(16, 16, 1.0);
        let levels = grid.pyramid(&PyramidConfig::default()).unwrap();
        let shapes: Vec<_> = levels
            .iter()
            .map(|l| (l.level, l.scale, l.grid.i_count()))
            .collect();
        assert_eq!(shapes, vec![(0, 1, 16), (1, 2, 8), (2, 4, 4)]);
        assert_eq!(levels[0].grid, grid);

        let capped = grid
            .pyramid(&PyramidConfig {
                min_dimension: 1,
                max_levels: 2,
            })
            .unwrap();
        assert_eq!(capped.len(), 2);

        let all = grid
            .pyramid(&PyramidConfig {
                min_dimension: 1,
                max_levels: 100,
            })
            .unwrap();
        assert_eq!(all.last().map(|l| l.grid.i_count()), Some(1));
        assert_eq!(all.len(), 5);
    }
}
