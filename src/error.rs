//! Structured error types for sheetgrid.
//!
//! Per-update problems (stale addresses, bad payloads) are not errors at this
//! level: the materializer drops them and records a [`DropReason`]. The
//! variants here are the failures a caller actually has to handle.
//!
//! [`DropReason`]: crate::materialize::DropReason

/// All errors that can occur while materializing or configuring a grid.
#[derive(Debug, thiserror::Error)]
pub enum SheetGridError {
    /// JSON (de)serialization error from serde_json.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An output payload could not be decoded into a cell value.
    #[error("Output decode failed: {0}")]
    Decode(String),

    /// A grid row does not have the grid's declared column count.
    #[error("Grid row {row} has {found} cells, expected {expected}")]
    GridShape {
        row: u32,
        expected: u32,
        found: usize,
    },

    /// Grid dimensions that cannot be represented.
    #[error("Invalid grid dimensions: {rows} x {cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Invalid configuration value.
    #[error("Config: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetGridError>;
