//! Typed 2D/3D Grid Engine with GSLIB Persistence
//!
//! This crate stores geostatistical models as dense grids of nullable cells
//! and exchanges them as GSLIB text files. It provides:
//!
//! - **Geometry**: [`GridStructure`] with counts, sizes, extents and origin
//! - **Storage**: [`Grid<T>`] over a flat buffer, I varying fastest, with an
//!   always-current count of empty cells
//! - **Extraction**: sub-grids and point blocks by index range or center
//! - **Resampling**: nearest neighbour, fixed-stride decimation, bilinear
//! - **Numerics**: [`NumericGrid`] statistics, distances and a Gaussian pyramid
//!
//! # Architecture
//!
//! ```text
//! GridStructure ──► Grid<T: CellValue> ──► region / block / resample
//!                        │
//!                        ├─► GSLIB write / read / open
//!                        │
//!                        └─► NumericGrid (Grid<f64>)
//!                                 │
//!                                 ├─► min / max / average / distance
//!                                 └─► bilinear, pyr_down / pyr_up, pyramid
//! ```
//!
//! # Example
//!
//! ```
//! use grid_engine::{Grid, GridStructure};
//!
//! let gs = GridStructure::simple_2d(3, 3).unwrap();
//! let mut grid: Grid<f64> = Grid::new(gs);
//! grid.set_cell(1, 1, Some(5.0)).unwrap();
//!
//! assert_eq!(grid.cell(1, 1).unwrap(), Some(5.0));
//! assert_eq!(grid.null_cell_count(), 8);
//!
//! let numeric = grid.to_numeric();
//! assert_eq!(numeric.max(), Some(5.0));
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod gslib;
pub mod index;
pub mod numeric;
pub mod structure;

// Re-export commonly used types at crate root
pub use cell::CellValue;
pub use config::{GridEngineConfig, PyramidConfig, ResampleMethod};
pub use error::{GridError, Result};
pub use grid::{Block, Grid};
pub use gslib::GslibHeader;
pub use index::SpatialIndex;
pub use numeric::{
    bilinear_interpolate, DistanceMetric, NumericGrid, PyramidLevel, UNSUPPORTED_DISTANCE,
};
pub use structure::{Dimension, GridStructure};
