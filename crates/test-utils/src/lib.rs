//! Shared test utilities for the grid engine workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate float assertions
//! - Cell buffer generators
//! - GSLIB and structure string fixtures
//! - Temporary directory and path helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures, sequential_cells};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use generators::*;
pub use paths::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of an optional cell value against an expected value.
///
/// Fails if the cell is empty.
///
/// ```ignore
/// use test_utils::assert_cell_approx_eq;
///
/// assert_cell_approx_eq!(grid.cell(1, 1).unwrap(), 5.0, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_cell_approx_eq {
    ($cell:expr, $expected:expr, $epsilon:expr) => {{
        match $cell {
            Some(value) => $crate::assert_approx_eq!(value, $expected, $epsilon),
            None => panic!(
                "assertion failed: expected a value ≈ `{:?}`, found an empty cell",
                $expected
            ),
        }
    }};
}

/// Macro for approximate equality of coordinate triples, such as cell
/// centers.
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((1.0001, 2.0001, 0.5), (1.0, 2.0, 0.5), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr, $z1:expr), ($x2:expr, $y2:expr, $z2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
        $crate::assert_approx_eq!($z1, $z2, $epsilon);
    }};
}
