//! Error types for TerraDiff

use thiserror::Error;

/// Main error type for TerraDiff operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Image size {actual} bytes exceeds the {limit} byte limit")]
    ImageTooLarge { actual: u64, limit: u64 },

    #[error("Image dimensions {width}x{height} outside allowed range [{min}, {max}]")]
    DimensionOutOfRange {
        width: u32,
        height: u32,
        min: u32,
        max: u32,
    },

    #[error("Unsupported color format: {0}")]
    UnsupportedColorFormat(String),

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Rendering failed: {0}")]
    RenderFailed(String),

    #[error("Processing exceeded the {budget_secs:.2}s budget after {elapsed_secs:.2}s")]
    Timeout { elapsed_secs: f64, budget_secs: f64 },

    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error reports a caller policy violation (bad input)
    /// rather than a pipeline defect. Policy violations are suitable for
    /// user-facing messages and are never retried automatically.
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Error::InvalidImage(_)
                | Error::ImageTooLarge { .. }
                | Error::DimensionOutOfRange { .. }
                | Error::UnsupportedColorFormat(_)
        )
    }
}

/// Result type alias for TerraDiff operations
pub type Result<T> = std::result::Result<T, Error>;
