//! Grid geometry: cell counts, cell sizes, extents and origin.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Dimensionality of a grid or spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "_2D")]
    TwoD,
    #[serde(rename = "_3D")]
    ThreeD,
}

impl Dimension {
    /// Token used by the compact structure string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoD => "_2D",
            Self::ThreeD => "_3D",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "_2D" => Ok(Self::TwoD),
            "_3D" => Ok(Self::ThreeD),
            other => Err(GridError::file_format(format!(
                "unknown dimension token '{other}'"
            ))),
        }
    }
}

/// Geometry shared by every grid of the same shape.
///
/// Extents are always derived from `count * size`; there is no way to set
/// them independently. Dimensionality is derived from `k_count`: a grid with a
/// single layer is 2D.
///
/// The compact string form (`Display` / `FromStr`) is
/// `"<I> <J> <K>,<ISize> <JSize> <KSize>,<Ox> <Oy> <Oz>,<_2D|_3D>"` and is what
/// GSLIB headers embed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GridStructure {
    i_count: usize,
    j_count: usize,
    k_count: usize,
    i_size: f64,
    j_size: f64,
    k_size: f64,
    i_extent: f64,
    j_extent: f64,
    k_extent: f64,
    origin_x: f64,
    origin_y: f64,
    origin_z: f64,
}

impl GridStructure {
    /// Create a 2D structure from cell sizes, cell counts and origin.
    pub fn new_2d(sizes: [f64; 2], counts: [usize; 2], origin: [f64; 2]) -> Result<Self> {
        Self::new_3d(
            [sizes[0], sizes[1], 1.0],
            [counts[0], counts[1], 1],
            [origin[0], origin[1], 0.5],
        )
    }

    /// Create a 2D structure whose counts are derived from requested extents.
    ///
    /// Counts are `ceil(extent / size)`, so the stored extent may be rounded
    /// up to a whole number of cells.
    pub fn from_extent_2d(sizes: [f64; 2], extents: [f64; 2], origin: [f64; 2]) -> Result<Self> {
        let counts = [
            count_for_extent("I", extents[0], sizes[0])?,
            count_for_extent("J", extents[1], sizes[1])?,
        ];
        Self::new_2d(sizes, counts, origin)
    }

    /// Create a 3D structure from cell sizes, cell counts and origin.
    pub fn new_3d(sizes: [f64; 3], counts: [usize; 3], origin: [f64; 3]) -> Result<Self> {
        for (axis, count) in ["I", "J", "K"].iter().zip(counts) {
            if count == 0 {
                return Err(GridError::invalid_structure(format!(
                    "{axis} count must be >= 1"
                )));
            }
        }
        for (axis, size) in ["I", "J", "K"].iter().zip(sizes) {
            check_size(axis, size)?;
        }
        // Cells are addressed with i32 indices and a usize flat offset.
        let addressable = counts.iter().all(|&n| i32::try_from(n).is_ok())
            && counts[0]
                .checked_mul(counts[1])
                .and_then(|n| n.checked_mul(counts[2]))
                .is_some();
        if !addressable {
            return Err(GridError::invalid_structure(format!(
                "cell counts {} x {} x {} are too large to address",
                counts[0], counts[1], counts[2]
            )));
        }

        Ok(Self {
            i_count: counts[0],
            j_count: counts[1],
            k_count: counts[2],
            i_size: sizes[0],
            j_size: sizes[1],
            k_size: sizes[2],
            i_extent: counts[0] as f64 * sizes[0],
            j_extent: counts[1] as f64 * sizes[1],
            k_extent: counts[2] as f64 * sizes[2],
            origin_x: origin[0],
            origin_y: origin[1],
            origin_z: origin[2],
        })
    }

    /// Create a 3D structure whose counts are derived from requested extents.
    pub fn from_extent_3d(sizes: [f64; 3], extents: [f64; 3], origin: [f64; 3]) -> Result<Self> {
        let counts = [
            count_for_extent("I", extents[0], sizes[0])?,
            count_for_extent("J", extents[1], sizes[1])?,
            count_for_extent("K", extents[2], sizes[2])?,
        ];
        Self::new_3d(sizes, counts, origin)
    }

    /// Unit cells with the origin at the center of the first cell.
    pub fn simple_2d(i_count: usize, j_count: usize) -> Result<Self> {
        Self::new_2d([1.0, 1.0], [i_count, j_count], [0.5, 0.5])
    }

    /// Unit cells with the origin at the center of the first cell.
    pub fn simple_3d(i_count: usize, j_count: usize, k_count: usize) -> Result<Self> {
        Self::new_3d([1.0, 1.0, 1.0], [i_count, j_count, k_count], [0.5, 0.5, 0.5])
    }

    pub fn dimension(&self) -> Dimension {
        if self.k_count == 1 {
            Dimension::TwoD
        } else {
            Dimension::ThreeD
        }
    }

    pub fn i_count(&self) -> usize {
        self.i_count
    }

    pub fn j_count(&self) -> usize {
        self.j_count
    }

    pub fn k_count(&self) -> usize {
        self.k_count
    }

    pub fn i_size(&self) -> f64 {
        self.i_size
    }

    pub fn j_size(&self) -> f64 {
        self.j_size
    }

    pub fn k_size(&self) -> f64 {
        self.k_size
    }

    pub fn i_extent(&self) -> f64 {
        self.i_extent
    }

    pub fn j_extent(&self) -> f64 {
        self.j_extent
    }

    pub fn k_extent(&self) -> f64 {
        self.k_extent
    }

    pub fn origin_x(&self) -> f64 {
        self.origin_x
    }

    pub fn origin_y(&self) -> f64 {
        self.origin_y
    }

    pub fn origin_z(&self) -> f64 {
        self.origin_z
    }

    /// Cell sizes as `[i, j, k]`.
    pub fn sizes(&self) -> [f64; 3] {
        [self.i_size, self.j_size, self.k_size]
    }

    /// Origin as `[x, y, z]`.
    pub fn origin(&self) -> [f64; 3] {
        [self.origin_x, self.origin_y, self.origin_z]
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.i_count * self.j_count * self.k_count
    }

    /// Check whether a cell index lies inside the grid.
    pub fn contains(&self, i: i32, j: i32, k: i32) -> bool {
        i >= 0
            && j >= 0
            && k >= 0
            && (i as usize) < self.i_count
            && (j as usize) < self.j_count
            && (k as usize) < self.k_count
    }

    /// Flat buffer offset of a cell, with I varying fastest.
    ///
    /// Returns `None` for indices outside the grid.
    pub fn offset_of(&self, i: i32, j: i32, k: i32) -> Option<usize> {
        if !self.contains(i, j, k) {
            return None;
        }
        let (i, j, k) = (i as usize, j as usize, k as usize);
        Some(k * self.j_count * self.i_count + j * self.i_count + i)
    }

    /// Inverse of [`offset_of`](Self::offset_of): `(i, j, k)` for a flat offset.
    pub fn index_of_offset(&self, offset: usize) -> Option<(i32, i32, i32)> {
        if offset >= self.cell_count() {
            return None;
        }
        let layer = self.i_count * self.j_count;
        let k = offset / layer;
        let rem = offset % layer;
        let j = rem / self.i_count;
        let i = rem % self.i_count;
        Some((i as i32, j as i32, k as i32))
    }

    /// Physical coordinate of a cell's reference point.
    pub fn cell_center(&self, i: i32, j: i32, k: i32) -> (f64, f64, f64) {
        (
            self.origin_x + i as f64 * self.i_size,
            self.origin_y + j as f64 * self.j_size,
            self.origin_z + k as f64 * self.k_size,
        )
    }

    /// Same sizes, new counts, origin moved to cell `(i, j, k)` of this structure.
    ///
    /// Used when carving a sub-grid out of an existing one.
    pub(crate) fn derive(&self, counts: [usize; 3], first_cell: (i32, i32, i32)) -> Result<Self> {
        let (x, y, z) = self.cell_center(first_cell.0, first_cell.1, first_cell.2);
        Self::new_3d(self.sizes(), counts, [x, y, z])
    }

    /// Same origin, new counts, sizes scaled so the physical extent is kept
    /// roughly constant. Used by decimation and pyramid steps.
    pub(crate) fn rescaled(&self, counts: [usize; 3], scale: [f64; 3]) -> Result<Self> {
        let sizes = [
            self.i_size * scale[0],
            self.j_size * scale[1],
            self.k_size * scale[2],
        ];
        Self::new_3d(sizes, counts, self.origin())
    }

    /// Encode as the compact string used in GSLIB headers.
    pub fn to_compact_string(&self) -> String {
        self.to_string()
    }

    /// Decode the compact string.
    ///
    /// The structure is rebuilt through the count-based constructor with all
    /// three groups kept, so single-layer structures keep their K size and
    /// origin. A dimension token that disagrees with the K count is an error.
    pub fn from_compact_string(s: &str) -> Result<Self> {
        let groups: Vec<&str> = s.trim().split(',').collect();
        if groups.len() != 4 {
            return Err(GridError::file_format(format!(
                "expected 4 comma-separated groups in structure string '{s}', found {}",
                groups.len()
            )));
        }

        let counts: [usize; 3] = parse_triplet(groups[0], "counts")?;
        let sizes: [f64; 3] = parse_triplet(groups[1], "sizes")?;
        let origin: [f64; 3] = parse_triplet(groups[2], "origin")?;
        let dimension: Dimension = groups[3].parse()?;

        let structure = Self::new_3d(sizes, counts, origin)?;
        if structure.dimension() != dimension {
            return Err(GridError::file_format(format!(
                "dimension token {dimension} contradicts K count {} in '{s}'",
                counts[2]
            )));
        }
        Ok(structure)
    }
}

impl fmt::Display for GridStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {},{} {} {},{} {} {},{}",
            self.i_count,
            self.j_count,
            self.k_count,
            self.i_size,
            self.j_size,
            self.k_size,
            self.origin_x,
            self.origin_y,
            self.origin_z,
            self.dimension()
        )
    }
}

impl FromStr for GridStructure {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_compact_string(s)
    }
}

impl TryFrom<String> for GridStructure {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_compact_string(&value)
    }
}

impl From<GridStructure> for String {
    fn from(gs: GridStructure) -> Self {
        gs.to_string()
    }
}

fn check_size(axis: &str, size: f64) -> Result<()> {
    if !size.is_finite() || size <= 0.0 {
        return Err(GridError::invalid_structure(format!(
            "{axis} cell size must be a positive number, got {size}"
        )));
    }
    Ok(())
}

fn count_for_extent(axis: &str, extent: f64, size: f64) -> Result<usize> {
    check_size(axis, size)?;
    if !extent.is_finite() || extent <= 0.0 {
        return Err(GridError::invalid_structure(format!(
            "{axis} extent must be a positive number, got {extent}"
        )));
    }
    Ok((extent / size).ceil() as usize)
}

fn parse_triplet<V: FromStr>(group: &str, what: &str) -> Result<[V; 3]>
where
    V: Copy,
{
    let fields: Vec<&str> = group.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(GridError::file_format(format!(
            "expected 3 {what} in '{group}', found {}",
            fields.len()
        )));
    }
    let mut parsed = Vec::with_capacity(3);
    for field in fields {
        let value = field
            .parse::<V>()
            .map_err(|_| GridError::file_format(format!("invalid {what} value '{field}'")))?;
        parsed.push(value);
    }
    Ok([parsed[0], parsed[1], parsed[2]])
}
