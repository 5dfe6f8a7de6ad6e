//! Error types for porescope.

use thiserror::Error;

/// The main error type for porescope operations.
#[derive(Error, Debug)]
pub enum PorescopeError {
    /// Too few points, or all points collinear/coplanar, for a convex hull.
    #[error("degenerate geometry for {points} points: {reason}")]
    DegenerateGeometry { points: usize, reason: String },

    /// A caller supplied an out-of-range parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A sample with the same id already exists in the group.
    #[error("sample '{sample_id}' already exists in group '{group}'")]
    DuplicateSample { group: String, sample_id: String },

    /// A required column is missing from a coordinate table.
    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// A table cell could not be parsed.
    #[error("parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PorescopeError {
    /// Shorthand for [`PorescopeError::DegenerateGeometry`].
    pub fn degenerate(points: usize, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            points,
            reason: reason.into(),
        }
    }

    /// Returns true for failures that a batch should absorb as missing values.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateGeometry { .. })
    }
}

/// A specialized Result type for porescope operations.
pub type Result<T> = std::result::Result<T, PorescopeError>;
