//! Dimension-tagged cell coordinates.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::structure::Dimension;

/// Token written in place of K for 2D indices in the short string form.
const NO_K: &str = "NAN";

/// Integer coordinate of a cell, tagged with its dimensionality.
///
/// K is 0 for 2D indices. Two indices are equal when their dimensionality and
/// their `(i, j, k)` triplet match; the optional `tag` and `value` payloads
/// are ignored by equality and hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialIndex {
    dimension: Dimension,
    i: i32,
    j: i32,
    k: i32,
    /// Free-form caller payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Scalar attached by callers that sample values at coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl SpatialIndex {
    pub fn new_2d(i: i32, j: i32) -> Self {
        Self {
            dimension: Dimension::TwoD,
            i,
            j,
            k: 0,
            tag: None,
            value: None,
        }
    }

    pub fn new_3d(i: i32, j: i32, k: i32) -> Self {
        Self {
            dimension: Dimension::ThreeD,
            i,
            j,
            k,
            tag: None,
            value: None,
        }
    }

    /// Attach a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Attach a scalar value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn i(&self) -> i32 {
        self.i
    }

    pub fn j(&self) -> i32 {
        self.j
    }

    pub fn k(&self) -> i32 {
        self.k
    }

    /// Unique code, `_2D_{I}_{J}` or `_3D_{I}_{J}_{K}`.
    pub fn uni_code(&self) -> String {
        match self.dimension {
            Dimension::TwoD => format!("_2D_{}_{}", self.i, self.j),
            Dimension::ThreeD => format!("_3D_{}_{}_{}", self.i, self.j, self.k),
        }
    }

    /// Translate by a 2D delta. The result is a 2D index.
    pub fn offset_2d(&self, di: i32, dj: i32) -> Self {
        Self::new_2d(self.i + di, self.j + dj)
    }

    /// Translate by a 3D delta. The result is a 3D index.
    pub fn offset_3d(&self, di: i32, dj: i32, dk: i32) -> Self {
        Self::new_3d(self.i + di, self.j + dj, self.k + dk)
    }

    /// Translate by another index of the same dimensionality.
    pub fn offset_by(&self, delta: &SpatialIndex) -> Result<Self> {
        self.add(delta)
    }

    /// Componentwise sum.
    pub fn add(&self, other: &SpatialIndex) -> Result<Self> {
        self.require_same_dimension(other, "add")?;
        Ok(self.combine(other, |a, b| a + b))
    }

    /// Componentwise difference.
    pub fn subtract(&self, other: &SpatialIndex) -> Result<Self> {
        self.require_same_dimension(other, "subtract")?;
        Ok(self.combine(other, |a, b| a - b))
    }

    /// Dimension-checked equality: comparing indices of different
    /// dimensionality is an error rather than `false`.
    pub fn equals_index(&self, other: &SpatialIndex) -> Result<bool> {
        self.require_same_dimension(other, "compare")?;
        Ok(self.i == other.i && self.j == other.j && self.k == other.k)
    }

    /// Short form `I:J:K`, with `NAN` as K for 2D indices.
    pub fn to_short_string(&self) -> String {
        match self.dimension {
            Dimension::TwoD => format!("{}:{}:{}", self.i, self.j, NO_K),
            Dimension::ThreeD => format!("{}:{}:{}", self.i, self.j, self.k),
        }
    }

    /// Parse the short form. A `NAN` K yields a 2D index with K = 0.
    pub fn from_short_string(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(GridError::conversion_failure(format!(
                "spatial index '{s}' must have the form I:J:K"
            )));
        }
        let i = parse_component(parts[0], s)?;
        let j = parse_component(parts[1], s)?;
        if parts[2].trim().eq_ignore_ascii_case(NO_K) {
            Ok(Self::new_2d(i, j))
        } else {
            Ok(Self::new_3d(i, j, parse_component(parts[2], s)?))
        }
    }

    fn require_same_dimension(&self, other: &SpatialIndex, op: &str) -> Result<()> {
        if self.dimension != other.dimension {
            return Err(GridError::dimension_mismatch(format!(
                "cannot {op} {} index {} and {} index {}",
                self.dimension,
                self.to_short_string(),
                other.dimension,
                other.to_short_string()
            )));
        }
        Ok(())
    }

    fn combine(&self, other: &SpatialIndex, op: impl Fn(i32, i32) -> i32) -> Self {
        match self.dimension {
            Dimension::TwoD => Self::new_2d(op(self.i, other.i), op(self.j, other.j)),
            Dimension::ThreeD => Self::new_3d(
                op(self.i, other.i),
                op(self.j, other.j),
                op(self.k, other.k),
            ),
        }
    }
}

fn parse_component(field: &str, whole: &str) -> Result<i32> {
    field.trim().parse::<i32>().map_err(|_| {
        GridError::conversion_failure(format!("invalid component '{field}' in spatial index '{whole}'"))
    })
}

impl PartialEq for SpatialIndex {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && self.i == other.i
            && self.j == other.j
            && self.k == other.k
    }
}

impl Eq for SpatialIndex {}

impl Hash for SpatialIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimension.hash(state);
        self.i.hash(state);
        self.j.hash(state);
        self.k.hash(state);
    }
}

impl fmt::Display for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_short_string())
    }
}

impl FromStr for SpatialIndex {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_short_string(s)
    }
}
