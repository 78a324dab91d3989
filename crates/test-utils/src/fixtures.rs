//! Common test fixtures for grid engine tests.
//!
//! Small GSLIB documents and compact structure strings covering the layouts
//! seen in real model exchange files.

/// Compact structure strings.
pub mod structures {
    /// 3x3 unit-cell 2D grid, origin at the first cell center.
    pub const SIMPLE_3X3: &str = "3 3 1,1 1 1,0.5 0.5 0.5,_2D";

    /// 4x3x2 3D grid with non-unit, non-square cells.
    pub const LAYERED_4X3X2: &str = "4 3 2,25 25 2.5,1000 2000 -50,_3D";

    /// Missing the origin group.
    pub const TRUNCATED: &str = "3 3 1,1 1 1,_2D";

    /// Unknown dimension token.
    pub const BAD_DIMENSION: &str = "3 3 1,1 1 1,0 0 0,_4D";
}

/// GSLIB documents.
pub mod gslib {
    /// 3x3 Double grid holding 1..9 with the center cell empty.
    pub const SIMPLE_3X3: &str = "\
grid{[Double][3 3 1,1 1 1,0.5 0.5 0.5,_2D]}
1
code
1
2
3
4
-99
6
7
8
9
";

    /// 2x2x2 Int32 facies grid.
    pub const FACIES_2X2X2: &str = "\
facies{[Int32][2 2 2,1 1 1,0.5 0.5 0.5,_3D]}
1
facies
0
1
1
2
-99
0
2
1
";

    /// Plain title without an embedded structure; four values.
    pub const PLAIN_TITLE: &str = "\
legacy model
1
porosity
0.12
0.25
-99
0.31
";

    /// Two values for a grid that needs more.
    pub const SHORT: &str = "\
grid{[Double][2 2 1,1 1 1,0.5 0.5 0.5,_2D]}
1
code
5
6
";

    /// Only two header lines.
    pub const TRUNCATED_HEADER: &str = "grid\n1\n";

    /// Non-numeric value on the fifth line.
    pub const BAD_VALUE: &str = "\
grid{[Double][2 1 1,1 1 1,0.5 0.5 0.5,_2D]}
1
code
1.5
porous
";
}

/// Null sentinels in common use.
pub mod sentinels {
    /// GSLIB convention used throughout the workspace.
    pub const DEFAULT: f64 = -99.0;

    /// Older Petrel-style exports.
    pub const PETREL: f64 = -999.25;
}
