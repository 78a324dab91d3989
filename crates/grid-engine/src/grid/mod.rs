//! Generic nullable-cell grid storage.
//!
//! A [`Grid`] owns one flat buffer of `Option<T>` laid out with I varying
//! fastest, then J, then K. Reads and writes outside the grid are lenient
//! (reads yield `None`, writes are dropped); using a 2D accessor on a 3D grid
//! or the reverse is an error.

mod region;
mod resample;

pub use region::Block;

use std::sync::Arc;

use crate::cell::CellValue;
use crate::error::{GridError, Result};
use crate::index::SpatialIndex;
use crate::numeric::NumericGrid;
use crate::structure::{Dimension, GridStructure};

/// Typed grid over a [`GridStructure`].
///
/// The number of empty cells is tracked on every write, so
/// [`null_cell_count`](Self::null_cell_count) never needs a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: CellValue> {
    structure: Arc<GridStructure>,
    cells: Vec<Option<T>>,
    null_count: usize,
}

impl<T: CellValue> Grid<T> {
    /// Create an all-empty grid.
    pub fn new(structure: GridStructure) -> Self {
        Self::with_shared_structure(Arc::new(structure))
    }

    /// Create an all-empty grid sharing an existing structure.
    pub fn with_shared_structure(structure: Arc<GridStructure>) -> Self {
        let count = structure.cell_count();
        Self {
            structure,
            cells: vec![None; count],
            null_count: count,
        }
    }

    /// Create a grid from a full buffer in flat order.
    pub fn from_cells(structure: GridStructure, cells: Vec<Option<T>>) -> Result<Self> {
        if cells.len() != structure.cell_count() {
            return Err(GridError::index_range(format!(
                "buffer holds {} cells but structure {} needs {}",
                cells.len(),
                structure,
                structure.cell_count()
            )));
        }
        let null_count = cells.iter().filter(|c| c.is_none()).count();
        Ok(Self {
            structure: Arc::new(structure),
            cells,
            null_count,
        })
    }

    pub fn structure(&self) -> &GridStructure {
        &self.structure
    }

    /// Shared handle to the structure, for building grids of the same shape.
    pub fn shared_structure(&self) -> Arc<GridStructure> {
        Arc::clone(&self.structure)
    }

    pub fn dimension(&self) -> Dimension {
        self.structure.dimension()
    }

    pub fn i_count(&self) -> usize {
        self.structure.i_count()
    }

    pub fn j_count(&self) -> usize {
        self.structure.j_count()
    }

    pub fn k_count(&self) -> usize {
        self.structure.k_count()
    }

    /// Total number of cells.
    pub fn count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells currently holding no value.
    pub fn null_cell_count(&self) -> usize {
        self.null_count
    }

    /// True when no cell holds a value.
    pub fn is_empty(&self) -> bool {
        self.null_count == self.cells.len()
    }

    /// Read-only view of the flat buffer.
    pub fn cells(&self) -> &[Option<T>] {
        &self.cells
    }

    /// Iterate cells in flat order.
    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.cells.iter().copied()
    }

    /// Iterate cells in flat order together with their index.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (SpatialIndex, Option<T>)> + '_ {
        let dimension = self.dimension();
        self.cells.iter().enumerate().map(move |(offset, cell)| {
            let (i, j, k) = self
                .structure
                .index_of_offset(offset)
                .unwrap_or((0, 0, 0));
            let index = match dimension {
                Dimension::TwoD => SpatialIndex::new_2d(i, j),
                Dimension::ThreeD => SpatialIndex::new_3d(i, j, k),
            };
            (index, *cell)
        })
    }

    /// Iterate the values of non-empty cells in flat order.
    pub fn present_values(&self) -> impl Iterator<Item = T> + '_ {
        self.cells.iter().filter_map(|c| *c)
    }

    // ------------------------------------------------------------------
    // Validity checks
    // ------------------------------------------------------------------

    pub fn is_index_valid(&self, i: i32, j: i32) -> bool {
        self.structure.contains(i, j, 0)
    }

    pub fn is_index_valid_3d(&self, i: i32, j: i32, k: i32) -> bool {
        self.structure.contains(i, j, k)
    }

    /// Check an index against the grid using the index's own dimensionality.
    pub fn is_spatial_index_valid(&self, index: &SpatialIndex) -> bool {
        match index.dimension() {
            Dimension::TwoD => self.is_index_valid(index.i(), index.j()),
            Dimension::ThreeD => self.is_index_valid_3d(index.i(), index.j(), index.k()),
        }
    }

    // ------------------------------------------------------------------
    // Cell access
    // ------------------------------------------------------------------

    /// Value at `(i, j)` of a 2D grid; `None` outside the grid.
    pub fn cell(&self, i: i32, j: i32) -> Result<Option<T>> {
        self.require_dimension(Dimension::TwoD, "cell")?;
        Ok(self.read(self.structure.offset_of(i, j, 0)))
    }

    /// Value at `(i, j, k)` of a 3D grid; `None` outside the grid.
    pub fn cell_3d(&self, i: i32, j: i32, k: i32) -> Result<Option<T>> {
        self.require_dimension(Dimension::ThreeD, "cell_3d")?;
        Ok(self.read(self.structure.offset_of(i, j, k)))
    }

    /// Value at a flat buffer offset; `None` past the end.
    pub fn cell_at(&self, offset: usize) -> Option<T> {
        self.cells.get(offset).copied().flatten()
    }

    /// Value at a spatial index of the grid's dimensionality.
    pub fn cell_by_index(&self, index: &SpatialIndex) -> Result<Option<T>> {
        match index.dimension() {
            Dimension::TwoD => self.cell(index.i(), index.j()),
            Dimension::ThreeD => self.cell_3d(index.i(), index.j(), index.k()),
        }
    }

    /// Write `(i, j)` of a 2D grid. Writes outside the grid are ignored.
    pub fn set_cell(&mut self, i: i32, j: i32, value: Option<T>) -> Result<()> {
        self.require_dimension(Dimension::TwoD, "set_cell")?;
        if let Some(offset) = self.structure.offset_of(i, j, 0) {
            self.write(offset, value);
        }
        Ok(())
    }

    /// Write `(i, j, k)` of a 3D grid. Writes outside the grid are ignored.
    pub fn set_cell_3d(&mut self, i: i32, j: i32, k: i32, value: Option<T>) -> Result<()> {
        self.require_dimension(Dimension::ThreeD, "set_cell_3d")?;
        if let Some(offset) = self.structure.offset_of(i, j, k) {
            self.write(offset, value);
        }
        Ok(())
    }

    /// Write at a flat buffer offset. Offsets past the end are ignored.
    pub fn set_cell_at(&mut self, offset: usize, value: Option<T>) {
        if offset < self.cells.len() {
            self.write(offset, value);
        }
    }

    /// Write at a spatial index of the grid's dimensionality.
    pub fn set_cell_by_index(&mut self, index: &SpatialIndex, value: Option<T>) -> Result<()> {
        match index.dimension() {
            Dimension::TwoD => self.set_cell(index.i(), index.j(), value),
            Dimension::ThreeD => self.set_cell_3d(index.i(), index.j(), index.k(), value),
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: Option<T>) {
        self.cells.fill(value);
        self.null_count = if value.is_some() { 0 } else { self.cells.len() };
    }

    /// Reset every cell to no value.
    pub fn clear(&mut self) {
        self.fill(None);
    }

    /// Rewrite every cell equal to `old` (including empty cells when `old`
    /// is `None`) to `new`.
    ///
    /// Returns the number of cells rewritten.
    pub fn replace(&mut self, old: Option<T>, new: Option<T>) -> usize {
        let mut replaced = 0;
        for offset in 0..self.cells.len() {
            if self.cells[offset] == old {
                self.write(offset, new);
                replaced += 1;
            }
        }
        replaced
    }

    // ------------------------------------------------------------------
    // Cloning
    // ------------------------------------------------------------------

    /// Same structure, every cell empty.
    pub fn light_clone(&self) -> Self {
        Self::with_shared_structure(self.shared_structure())
    }

    /// Same structure, every cell set to `value`.
    pub fn light_clone_filled(&self, value: Option<T>) -> Self {
        let mut grid = self.light_clone();
        grid.fill(value);
        grid
    }

    /// Same structure with a different cell type, every cell empty.
    pub fn light_clone_as<V: CellValue>(&self) -> Grid<V> {
        Grid::with_shared_structure(self.shared_structure())
    }

    /// Same structure with a different cell type, every cell set to `value`.
    pub fn light_clone_as_filled<V: CellValue>(&self, value: Option<V>) -> Grid<V> {
        let mut grid = self.light_clone_as::<V>();
        grid.fill(value);
        grid
    }

    /// Full copy of structure and values into a new buffer.
    pub fn deep_clone(&self) -> Self {
        self.clone()
    }

    /// Full copy with every present value converted by `convert`.
    ///
    /// Fails with a conversion error on the first value `convert` rejects;
    /// nothing is returned in that case.
    pub fn deep_clone_with<V, F>(&self, mut convert: F) -> Result<Grid<V>>
    where
        V: CellValue,
        F: FnMut(T) -> Option<V>,
    {
        let mut cells = Vec::with_capacity(self.cells.len());
        for (offset, cell) in self.cells.iter().enumerate() {
            let converted = match cell {
                Some(value) => Some(convert(*value).ok_or_else(|| {
                    GridError::conversion_failure(format!(
                        "cannot convert {} value {} at offset {} to {}",
                        T::TYPE_NAME,
                        value,
                        offset,
                        V::TYPE_NAME
                    ))
                })?),
                None => None,
            };
            cells.push(converted);
        }
        Ok(Grid {
            structure: self.shared_structure(),
            cells,
            null_count: self.null_count,
        })
    }

    /// Full copy converted through the cell codecs' checked numeric cast.
    pub fn deep_clone_as<V: CellValue>(&self) -> Result<Grid<V>> {
        self.deep_clone_with(|value| value.convert::<V>())
    }

    /// Full copy with an infallible per-value mapping.
    pub fn map_values<V, F>(&self, mut f: F) -> Grid<V>
    where
        V: CellValue,
        F: FnMut(T) -> V,
    {
        Grid {
            structure: self.shared_structure(),
            cells: self.cells.iter().map(|c| c.map(&mut f)).collect(),
            null_count: self.null_count,
        }
    }

    /// Copy into a numeric grid, widening every value to `f64`.
    pub fn to_numeric(&self) -> NumericGrid {
        NumericGrid::from(self.map_values(|v| v.to_f64()))
    }

    /// Flip a 2D grid vertically (row J becomes row `JCount - 1 - J`), turning
    /// Cartesian row order into screen row order.
    pub fn reverse_up_down_2d(&self) -> Result<Self> {
        self.require_dimension(Dimension::TwoD, "reverse_up_down_2d")?;
        let (ni, nj) = (self.i_count(), self.j_count());
        let mut cells = Vec::with_capacity(self.cells.len());
        for j in (0..nj).rev() {
            cells.extend_from_slice(&self.cells[j * ni..(j + 1) * ni]);
        }
        Ok(Self {
            structure: self.shared_structure(),
            cells,
            null_count: self.null_count,
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    pub(crate) fn require_dimension(&self, expected: Dimension, op: &str) -> Result<()> {
        let actual = self.dimension();
        if actual != expected {
            return Err(GridError::dimension_mismatch(format!(
                "{op} requires a {expected} grid, but the grid is {actual}"
            )));
        }
        Ok(())
    }

    fn read(&self, offset: Option<usize>) -> Option<T> {
        offset.and_then(|o| self.cells[o])
    }

    /// Store a value at a valid offset, keeping the null count in step.
    pub(crate) fn write(&mut self, offset: usize, value: Option<T>) {
        let slot = &mut self.cells[offset];
        match (slot.is_some(), value.is_some()) {
            (false, true) => self.null_count -= 1,
            (true, false) => self.null_count += 1,
            _ => {}
        }
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_grid() -> Grid<f64> {
        let gs = GridStructure::new_2d([1.0, 1.0], [3, 3], [0.5, 0.5]).unwrap();
        let cells = (1..=9).map(|v| Some(v as f64)).collect();
        Grid::from_cells(gs, cells).unwrap()
    }

    fn scan_nulls<T: CellValue>(grid: &Grid<T>) -> usize {
        grid.cells().iter().filter(|c| c.is_none()).count()
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid: Grid<f64> = Grid::new(GridStructure::simple_3d(2, 3, 4).unwrap());
        assert_eq!(grid.count(), 24);
        assert_eq!(grid.null_cell_count(), 24);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_row_major_fill_scenario() {
        let mut grid = scenario_grid();
        assert_eq!(grid.cell(1, 1).unwrap(), Some(5.0));
        assert_eq!(grid.cell(2, 0).unwrap(), Some(3.0));
        assert_eq!(grid.cell(0, 2).unwrap(), Some(7.0));
        assert_eq!(grid.null_cell_count(), 0);

        grid.set_cell(1, 1, None).unwrap();
        assert_eq!(grid.null_cell_count(), 1);

        grid.clear();
        assert_eq!(grid.null_cell_count(), 9);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_out_of_bounds_is_lenient() {
        let mut grid = scenario_grid();
        assert_eq!(grid.cell(-1, 0).unwrap(), None);
        assert_eq!(grid.cell(3, 0).unwrap(), None);
        assert_eq!(grid.cell_at(9), None);

        grid.set_cell(5, 5, Some(1.0)).unwrap();
        grid.set_cell(-1, 2, None).unwrap();
        grid.set_cell_at(100, None);
        assert_eq!(grid.null_cell_count(), 0);
    }

    #[test]
    fn test_wrong_dimension_accessor_errors() {
        let mut flat = scenario_grid();
        assert!(matches!(
            flat.cell_3d(0, 0, 0),
            Err(GridError::DimensionMismatch(_))
        ));
        assert!(flat.set_cell_3d(0, 0, 0, Some(1.0)).is_err());
        assert!(flat.cell_by_index(&SpatialIndex::new_3d(0, 0, 0)).is_err());

        let mut deep: Grid<i32> = Grid::new(GridStructure::simple_3d(2, 2, 2).unwrap());
        assert!(deep.cell(0, 0).is_err());
        assert!(deep.set_cell(0, 0, Some(1)).is_err());
        assert_eq!(deep.null_cell_count(), 8);
    }

    #[test]
    fn test_null_count_transitions() {
        let mut grid: Grid<i32> = Grid::new(GridStructure::simple_2d(2, 2).unwrap());
        grid.set_cell(0, 0, Some(1)).unwrap();
        assert_eq!(grid.null_cell_count(), 3);
        grid.set_cell(0, 0, Some(2)).unwrap();
        assert_eq!(grid.null_cell_count(), 3);
        grid.set_cell(0, 0, None).unwrap();
        assert_eq!(grid.null_cell_count(), 4);
        grid.set_cell(0, 0, None).unwrap();
        assert_eq!(grid.null_cell_count(), 4);
        assert_eq!(grid.null_cell_count(), scan_nulls(&grid));
    }

    #[test]
    fn test_null_count_matches_scan_after_mixed_writes() {
        let mut grid: Grid<f64> = Grid::new(GridStructure::simple_3d(4, 3, 2).unwrap());
        for step in 0..200i32 {
            let offset = ((step * 7) % 24) as usize;
            let value = if step % 3 == 0 { None } else { Some(step as f64) };
            match step % 3 {
                0 => grid.set_cell_at(offset, value),
                _ => {
                    let (i, j, k) = grid.structure().index_of_offset(offset).unwrap();
                    let index = SpatialIndex::new_3d(i, j, k);
                    grid.set_cell_by_index(&index, value).unwrap();
                }
            }
            assert_eq!(grid.null_cell_count(), scan_nulls(&grid));
        }
    }

    #[test]
    fn test_fill_sets_null_count() {
        let mut grid: Grid<u8> = Grid::new(GridStructure::simple_2d(3, 2).unwrap());
        grid.fill(Some(4));
        assert_eq!(grid.null_cell_count(), 0);
        assert!(grid.iter().all(|c| c == Some(4)));
        grid.fill(None);
        assert_eq!(grid.null_cell_count(), 6);
    }

    #[test]
    fn test_replace_updates_null_count() {
        let mut grid = scenario_grid();
        grid.set_cell(0, 0, None).unwrap();
        grid.set_cell(1, 0, None).unwrap();

        assert_eq!(grid.replace(None, Some(-1.0)), 2);
        assert_eq!(grid.null_cell_count(), 0);
        assert_eq!(grid.cell(0, 0).unwrap(), Some(-1.0));

        assert_eq!(grid.replace(Some(5.0), None), 1);
        assert_eq!(grid.null_cell_count(), 1);
        assert_eq!(grid.null_cell_count(), scan_nulls(&grid));
    }

    #[test]
    fn test_light_clones() {
        let grid = scenario_grid();
        let light = grid.light_clone();
        assert_eq!(light.structure(), grid.structure());
        assert!(light.is_empty());

        let filled = grid.light_clone_filled(Some(0.5));
        assert_eq!(filled.null_cell_count(), 0);
        assert!(filled.iter().all(|c| c == Some(0.5)));

        let typed: Grid<i32> = grid.light_clone_as_filled(Some(3));
        assert_eq!(typed.cell(2, 2).unwrap(), Some(3));
        assert!(grid.light_clone_as::<u8>().is_empty());
    }

    #[test]
    fn test_deep_clone_does_not_alias() {
        let grid = scenario_grid();
        let mut copy = grid.deep_clone();
        assert_eq!(copy, grid);
        copy.set_cell(0, 0, Some(100.0)).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap(), Some(1.0));
    }

    #[test]
    fn test_deep_clone_as_converts_or_fails() {
        let mut grid = scenario_grid();
        grid.set_cell(2, 2, None).unwrap();
        let ints = grid.deep_clone_as::<i32>().unwrap();
        assert_eq!(ints.cell(1, 1).unwrap(), Some(5));
        assert_eq!(ints.cell(2, 2).unwrap(), None);
        assert_eq!(ints.null_cell_count(), 1);

        grid.set_cell(0, 0, Some(0.5)).unwrap();
        let err = grid.deep_clone_as::<i32>().unwrap_err();
        assert!(matches!(err, GridError::ConversionFailure(_)));
    }

    #[test]
    fn test_deep_clone_with_custom_conversion() {
        let grid = scenario_grid();
        let parity = grid
            .deep_clone_with(|v| if v > 0.0 { Some((v as i32) % 2) } else { None })
            .unwrap();
        assert_eq!(parity.cell(0, 0).unwrap(), Some(1));
        assert_eq!(parity.cell(1, 0).unwrap(), Some(0));

        let rejected = grid.deep_clone_with(|v| if v < 9.0 { Some(v as u8) } else { None });
        assert!(rejected.is_err());
    }

    #[test]
    fn test_reverse_up_down() {
        let grid = scenario_grid();
        let flipped = grid.reverse_up_down_2d().unwrap();
        assert_eq!(flipped.cell(0, 0).unwrap(), Some(7.0));
        assert_eq!(flipped.cell(2, 2).unwrap(), Some(3.0));
        assert_eq!(flipped.cell(1, 1).unwrap(), Some(5.0));
        assert_eq!(flipped.reverse_up_down_2d().unwrap(), grid);

        let deep: Grid<f64> = Grid::new(GridStructure::simple_3d(2, 2, 2).unwrap());
        assert!(deep.reverse_up_down_2d().is_err());
    }

    #[test]
    fn test_iter_indexed_uses_grid_dimension() {
        let grid: Grid<i32> = Grid::new(GridStructure::simple_3d(2, 2, 2).unwrap());
        let indices: Vec<SpatialIndex> = grid.iter_indexed().map(|(idx, _)| idx).collect();
        assert_eq!(indices[0], SpatialIndex::new_3d(0, 0, 0));
        assert_eq!(indices[5], SpatialIndex::new_3d(1, 0, 1));
    }

    #[test]
    fn test_from_cells_length_check() {
        let gs = GridStructure::simple_2d(2, 2).unwrap();
        assert!(Grid::<f64>::from_cells(gs, vec![None; 3]).is_err());
    }

    #[test]
    fn test_to_numeric() {
        let mut grid: Grid<i32> = Grid::new(GridStructure::simple_2d(2, 1).unwrap());
        grid.set_cell(1, 0, Some(7)).unwrap();
        let numeric = grid.to_numeric();
        assert_eq!(numeric.cell(1, 0).unwrap(), Some(7.0));
        assert_eq!(numeric.null_cell_count(), 1);
    }
}
