//! Error types for the grid engine.

use thiserror::Error;

/// Errors that can occur while building, querying or persisting grids.
#[derive(Error, Debug)]
pub enum GridError {
    /// A 2D operation was used with 3D data (or the other way round), or two
    /// grids that must agree on shape do not.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Region or block bounds are inverted, degenerate or entirely outside the grid.
    #[error("invalid index range: {0}")]
    IndexRange(String),

    /// A stored or parsed value could not be converted to the target cell type.
    #[error("conversion failed: {0}")]
    ConversionFailure(String),

    /// A GSLIB file or compact structure string is malformed.
    #[error("GSLIB format error: {0}")]
    FileFormat(String),

    /// Grid geometry is not usable (zero counts, non-positive cell sizes).
    #[error("invalid grid structure: {0}")]
    InvalidStructure(String),

    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GridError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Create an IndexRange error.
    pub fn index_range(msg: impl Into<String>) -> Self {
        Self::IndexRange(msg.into())
    }

    /// Create a ConversionFailure error.
    pub fn conversion_failure(msg: impl Into<String>) -> Self {
        Self::ConversionFailure(msg.into())
    }

    /// Create a FileFormat error.
    pub fn file_format(msg: impl Into<String>) -> Self {
        Self::FileFormat(msg.into())
    }

    /// Create an InvalidStructure error.
    pub fn invalid_structure(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }
}

/// Result type for grid engine operations.
pub type Result<T> = std::result::Result<T, GridError>;
