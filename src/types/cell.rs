use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use super::{Borders, CellAttributes};

/// In-memory cell address. Row first, unlike the wire [`CellAddress`].
///
/// [`CellAddress`]: super::CellAddress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GridLocation {
    pub row: u32,
    pub col: u32,
}

impl GridLocation {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::cell_ref::format_cell_ref(self.row, self.col))
    }
}

/// Display value of a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text shown in the cell (numbers use Rust's shortest round-trip form).
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }
}

/// Opaque renderable handle produced by the output decoder.
///
/// The grid never looks inside; it is handed back to the renderer as-is.
pub type Viewer = Rc<serde_json::Value>;

/// Merge membership of a cell.
///
/// A cell is either outside any merge, the top-left root carrying the span,
/// or a member pointing back at its root. Holding this as one enum keeps a
/// cell from being both a root and a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeRole {
    #[default]
    None,
    Root { row_span: u32, col_span: u32 },
    Member(GridLocation),
}

/// A single materialized cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    /// Display value (`None` is null)
    pub value: Option<CellValue>,
    /// Raw source text (formula or literal) that produced `value`
    pub expression: Option<String>,
    /// Presentation and semantic attributes
    pub attributes: CellAttributes,
    /// Merge root / member state
    pub merge: MergeRole,
    /// Edges moved onto this cell from a neighbor. They are part of
    /// `attributes.borders` too, and survive rewrites of this cell until the
    /// neighbor drops its edge.
    pub received_borders: Borders,
    /// Trailing columns this cell's text spills into (overflow origin only)
    pub overflow_col_span: Option<u32>,
    /// Column of the overflow origin whose text covers this cell
    pub overflow_from_col: Option<u32>,
    /// Opaque renderable handle from the output decoder
    pub viewer: Option<Viewer>,
}

impl Cell {
    /// True when the cell holds a non-empty display value.
    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Row span if this cell is a merge root.
    pub fn row_span(&self) -> Option<u32> {
        match self.merge {
            MergeRole::Root { row_span, .. } => Some(row_span),
            _ => None,
        }
    }

    /// Column span if this cell is a merge root.
    pub fn col_span(&self) -> Option<u32> {
        match self.merge {
            MergeRole::Root { col_span, .. } => Some(col_span),
            _ => None,
        }
    }

    /// Root address if this cell is covered by someone else's merge.
    pub fn merged_into(&self) -> Option<GridLocation> {
        match self.merge {
            MergeRole::Member(root) => Some(root),
            _ => None,
        }
    }

    pub fn is_merge_root(&self) -> bool {
        matches!(self.merge, MergeRole::Root { .. })
    }

    pub fn is_merged(&self) -> bool {
        !matches!(self.merge, MergeRole::None)
    }

    /// Text used for overflow measurement and display.
    pub fn display_text(&self) -> String {
        self.value
            .as_ref()
            .map(CellValue::display_text)
            .unwrap_or_default()
    }
}
