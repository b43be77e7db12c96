//! Wire types for the sparse cell-update stream.
//!
//! The stream addresses cells as `(col, row, sheetId)`, column first. The
//! grid is indexed row first. [`CellAddress::to_location`] is the only place
//! that translates between the two.

use serde::{Deserialize, Serialize};

use super::GridLocation;

/// Sheet identifier as carried on the wire.
pub type SheetId = u32;

/// Absolute cell address as sent by the update stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellAddress {
    pub col: u32,
    pub row: u32,
    pub sheet_id: SheetId,
}

impl CellAddress {
    pub const fn new(col: u32, row: u32, sheet_id: SheetId) -> Self {
        Self { col, row, sheet_id }
    }

    /// Wire `(col, row)` to grid `(row, col)`.
    pub const fn to_location(&self) -> GridLocation {
        GridLocation {
            row: self.row,
            col: self.col,
        }
    }

    /// Grid `(row, col)` back to a wire address on `sheet_id`.
    pub const fn from_location(location: GridLocation, sheet_id: SheetId) -> Self {
        Self {
            col: location.col,
            row: location.row,
            sheet_id,
        }
    }
}

/// One sparse cell update.
///
/// `outputs` and `attributes` stay untyped until the materializer decodes
/// them, so one malformed payload only drops its own update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellUpdate {
    pub address: Option<CellAddress>,
    /// Raw source text (formula or literal)
    pub code: Option<String>,
    /// Opaque output payload for the output decoder
    pub outputs: serde_json::Value,
    /// Attribute object; see [`CellAttributes`](super::CellAttributes)
    pub attributes: serde_json::Value,
}

impl CellUpdate {
    pub fn new(address: CellAddress) -> Self {
        Self {
            address: Some(address),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_outputs(mut self, outputs: serde_json::Value) -> Self {
        self.outputs = outputs;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: serde_json::Value) -> Self {
        self.attributes = attributes;
        self
    }
}
