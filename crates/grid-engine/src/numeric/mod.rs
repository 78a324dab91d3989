//! Floating-point grids: statistics, distances, interpolation and the
//! Gaussian pyramid.

mod interpolation;
mod pyramid;

pub use interpolation::bilinear_interpolate;
pub use pyramid::{PyramidLevel, GAUSSIAN_KERNEL, KERNEL_WEIGHT};

use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::structure::{Dimension, GridStructure};

/// Returned by [`NumericGrid::distance_by_code`] for unknown metric codes.
pub const UNSUPPORTED_DISTANCE: f64 = -1.0;

/// Distance between two grids, computed over cells present in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Sum of absolute differences.
    Manhattan,
    /// Square root of the sum of squared differences.
    Euclidean,
}

impl DistanceMetric {
    /// Map the legacy integer code (0 = Manhattan, 1 = Euclidean).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Manhattan),
            1 => Some(Self::Euclidean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A grid of `f64` cells.
///
/// Derefs to [`Grid<f64>`], so every generic grid operation is available;
/// operations that produce a new grid of the same kind are re-exposed here
/// returning `NumericGrid`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericGrid {
    grid: Grid<f64>,
}

impl NumericGrid {
    /// Create an all-empty grid.
    pub fn new(structure: GridStructure) -> Self {
        Self {
            grid: Grid::new(structure),
        }
    }

    /// Create a grid from a full buffer in flat order.
    pub fn from_cells(structure: GridStructure, cells: Vec<Option<f64>>) -> Result<Self> {
        Grid::from_cells(structure, cells).map(Self::from)
    }

    pub fn as_grid(&self) -> &Grid<f64> {
        &self.grid
    }

    pub fn into_inner(self) -> Grid<f64> {
        self.grid
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    /// Smallest present value, `None` when every cell is empty.
    pub fn min(&self) -> Option<f64> {
        self.grid.present_values().reduce(f64::min)
    }

    /// Largest present value, `None` when every cell is empty.
    pub fn max(&self) -> Option<f64> {
        self.grid.present_values().reduce(f64::max)
    }

    /// Mean of the present values, `None` when every cell is empty.
    pub fn average(&self) -> Option<f64> {
        let present = self.grid.count() - self.grid.null_cell_count();
        if present == 0 {
            return None;
        }
        Some(self.grid.present_values().sum::<f64>() / present as f64)
    }

    /// `max - min`, `None` when every cell is empty.
    pub fn range(&self) -> Option<f64> {
        Some(self.max()? - self.min()?)
    }

    // ------------------------------------------------------------------
    // Distance
    // ------------------------------------------------------------------

    /// Distance to a grid with the same cell counts. Cells empty in either
    /// grid are skipped.
    pub fn distance(&self, other: &NumericGrid, metric: DistanceMetric) -> Result<f64> {
        let (a, b) = (self.structure(), other.structure());
        if (a.i_count(), a.j_count(), a.k_count()) != (b.i_count(), b.j_count(), b.k_count()) {
            return Err(GridError::dimension_mismatch(format!(
                "distance needs equal cell counts, got {}x{}x{} and {}x{}x{}",
                a.i_count(),
                a.j_count(),
                a.k_count(),
                b.i_count(),
                b.j_count(),
                b.k_count()
            )));
        }

        let pairs = self
            .grid
            .iter()
            .zip(other.grid.iter())
            .filter_map(|(x, y)| Some((x?, y?)));
        let distance: f64 = match metric {
            DistanceMetric::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Euclidean => pairs.map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt(),
        };
        Ok(distance)
    }

    /// Distance selected by legacy integer code; unknown codes yield
    /// [`UNSUPPORTED_DISTANCE`].
    pub fn distance_by_code(&self, other: &NumericGrid, code: i32) -> Result<f64> {
        match DistanceMetric::from_code(code) {
            Some(metric) => self.distance(other, metric),
            None => Ok(UNSUPPORTED_DISTANCE),
        }
    }

    // ------------------------------------------------------------------
    // Array import / export
    // ------------------------------------------------------------------

    /// Build a 2D grid over unit cells from `columns[i][j]`.
    ///
    /// Every column must have the same length.
    pub fn from_columns(columns: &[Vec<Option<f64>>]) -> Result<Self> {
        let i_count = columns.len();
        let j_count = columns.first().map_or(0, Vec::len);
        if let Some((i, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != j_count) {
            return Err(GridError::dimension_mismatch(format!(
                "column {i} has {} values, expected {j_count}",
                col.len()
            )));
        }
        let mut cells = Vec::with_capacity(i_count * j_count);
        for j in 0..j_count {
            cells.extend(columns.iter().map(|col| col[j]));
        }
        Self::from_cells(GridStructure::simple_2d(i_count, j_count)?, cells)
    }

    /// Export a 2D grid as `columns[i][j]`.
    pub fn to_columns(&self) -> Result<Vec<Vec<Option<f64>>>> {
        self.grid.require_dimension(Dimension::TwoD, "to_columns")?;
        let (ni, nj) = (self.i_count(), self.j_count());
        let cells = self.grid.cells();
        Ok((0..ni)
            .map(|i| (0..nj).map(|j| cells[j * ni + i]).collect())
            .collect())
    }

    // ------------------------------------------------------------------
    // Grid operations returning NumericGrid
    // ------------------------------------------------------------------

    pub fn light_clone(&self) -> Self {
        self.grid.light_clone().into()
    }

    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    pub fn region_by_range(&self, i1: i32, i2: i32, j1: i32, j2: i32) -> Result<Self> {
        self.grid.region_by_range(i1, i2, j1, j2).map(Self::from)
    }

    pub fn region_by_center(&self, i: i32, i_radius: i32, j: i32, j_radius: i32) -> Result<Self> {
        self.grid
            .region_by_center(i, i_radius, j, j_radius)
            .map(Self::from)
    }

    pub fn nearest_neighbor_resample(&self, dest_i: usize, dest_j: usize) -> Result<Self> {
        self.grid
            .nearest_neighbor_resample(dest_i, dest_j)
            .map(Self::from)
    }

    pub fn reverse_up_down_2d(&self) -> Result<Self> {
        self.grid.reverse_up_down_2d().map(Self::from)
    }
}

impl From<Grid<f64>> for NumericGrid {
    fn from(grid: Grid<f64>) -> Self {
        Self { grid }
    }
}

impl From<NumericGrid> for Grid<f64> {
    fn from(grid: NumericGrid) -> Self {
        grid.grid
    }
}

impl Deref for NumericGrid {
    type Target = Grid<f64>;

    fn deref(&self) -> &Grid<f64> {
        &self.grid
    }
}

impl DerefMut for NumericGrid {
    fn deref_mut(&mut self) -> &mut Grid<f64> {
        &mut self.grid
    }
}

/// Table dump: one block per I (2D) or per K layer (3D), values with three
/// decimals separated by tabs, `null` for empty cells.
impl fmt::Display for NumericGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dimension() {
            Dimension::TwoD => {
                for i in 0..self.i_count() {
                    writeln!(f, "i={i}")?;
                    self.write_row(f, i, 0)?;
                    writeln!(f)?;
                }
            }
            Dimension::ThreeD => {
                for k in 0..self.k_count() {
                    writeln!(f, "k={k}")?;
                    for i in 0..self.i_count() {
                        self.write_row(f, i, k)?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}

impl NumericGrid {
    /// One table row: every J for a fixed I and K.
    fn write_row(&self, f: &mut fmt::Formatter<'_>, i: usize, k: usize) -> fmt::Result {
        for j in 0..self.j_count() {
            let offset = self.structure().offset_of(i as i32, j as i32, k as i32);
            match offset.and_then(|o| self.grid.cell_at(o)) {
                Some(v) => write!(f, "{v:.3}\t")?,
                None => write!(f, "null\t")?,
            }
        }
        writeln!(f)
    }
}
