//! Grid-wide configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetGridError};

/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: f32 = 64.0;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

/// Width of the separator line drawn between two visible rows or columns
pub const GRIDLINE_WIDTH: f32 = 1.0;

/// Tunables shared by the materializer, layout and measurement cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Height of rows without an explicit size
    pub default_row_height: f32,
    /// Width of columns without an explicit size
    pub default_col_width: f32,
    /// Font family used when a cell does not name one
    pub default_font_family: String,
    /// Font size (px) used when a cell does not set one
    pub default_font_size: f32,
    /// Characters of a cell's text measured for overflow
    pub overflow_preview_chars: usize,
    /// Entries kept by the text measurement cache (0 disables it)
    pub measure_cache_capacity: usize,
    /// Horizontal padding added to measured overflow text
    pub cell_padding: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_col_width: DEFAULT_COL_WIDTH,
            default_font_family: "Arial".to_string(),
            default_font_size: 11.0,
            overflow_preview_chars: 256,
            measure_cache_capacity: 4096,
            cell_padding: 4.0,
        }
    }
}

impl GridConfig {
    /// Parse a config from JSON; missing keys take their defaults.
    ///
    /// # Errors
    /// Returns an error for malformed JSON or non-positive sizes.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that sizes are usable.
    ///
    /// # Errors
    /// Returns [`SheetGridError::Config`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !is_positive(self.default_row_height) {
            return Err(SheetGridError::Config(format!(
                "defaultRowHeight must be positive, got {}",
                self.default_row_height
            )));
        }
        if !is_positive(self.default_col_width) {
            return Err(SheetGridError::Config(format!(
                "defaultColWidth must be positive, got {}",
                self.default_col_width
            )));
        }
        if !is_positive(self.default_font_size) {
            return Err(SheetGridError::Config(format!(
                "defaultFontSize must be positive, got {}",
                self.default_font_size
            )));
        }
        Ok(())
    }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
