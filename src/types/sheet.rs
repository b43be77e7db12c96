use serde::{Deserialize, Serialize};

use crate::layout::SizeMap;

/// Sorted, de-duplicated set of hidden row or column indices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct HiddenIndices(Vec<u32>);

impl HiddenIndices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    /// Number of hidden indices strictly below `index`.
    pub fn count_below(&self, index: u32) -> usize {
        self.0.partition_point(|&h| h < index)
    }

    pub fn insert(&mut self, index: u32) -> bool {
        match self.0.binary_search(&index) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, index);
                true
            }
        }
    }

    pub fn remove(&mut self, index: u32) -> bool {
        match self.0.binary_search(&index) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<u32>> for HiddenIndices {
    fn from(mut v: Vec<u32>) -> Self {
        v.sort_unstable();
        v.dedup();
        Self(v)
    }
}

impl From<HiddenIndices> for Vec<u32> {
    fn from(h: HiddenIndices) -> Self {
        h.0
    }
}

impl FromIterator<u32> for HiddenIndices {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Per-sheet view configuration.
///
/// Changed by explicit user actions (hide, freeze, resize), never by cell
/// updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SheetAttributes {
    pub hidden_rows: HiddenIndices,
    pub hidden_cols: HiddenIndices,
    /// Number of frozen rows (0 = none)
    pub frozen_rows: u32,
    /// Number of frozen columns (0 = none)
    pub frozen_cols: u32,
    /// Persisted row heights
    pub row_sizes: SizeMap,
    /// Persisted column widths
    pub col_sizes: SizeMap,
    pub gridlines_hidden: bool,
}

impl SheetAttributes {
    pub fn is_row_hidden(&self, row: u32) -> bool {
        self.hidden_rows.contains(row)
    }

    pub fn is_col_hidden(&self, col: u32) -> bool {
        self.hidden_cols.contains(col)
    }
}
