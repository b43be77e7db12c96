//! Pre-computed layout data for a sheet.
//!
//! Positions are computed once per attribute change (hide/freeze/resize) so
//! that cell lookups and hit tests are O(log n). Cell content never affects
//! the layout.

use super::{AxisSizes, SizeMap};
use crate::config::{GridConfig, GRIDLINE_WIDTH};
use crate::types::{Cell, GridLocation, MergeRole, SheetAttributes};

/// Pre-computed layout data for a sheet
#[derive(Debug, Clone)]
pub struct SheetLayout {
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge)
    pub col_positions: Vec<f32>,
    /// Cumulative row positions (`row_positions[i]` = y of row i's top edge)
    pub row_positions: Vec<f32>,
    /// Column widths (0 for hidden columns)
    pub col_widths: Vec<f32>,
    /// Row heights (0 for hidden rows)
    pub row_heights: Vec<f32>,
    /// Number of rows
    pub n_rows: u32,
    /// Number of columns
    pub n_cols: u32,
    /// Number of frozen rows (0 = no frozen rows)
    pub frozen_rows: u32,
    /// Number of frozen columns (0 = no frozen columns)
    pub frozen_cols: u32,
}

/// Rectangle representing a cell's bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width of the cell
    pub width: f32,
    /// Height of the cell
    pub height: f32,
    /// True if this cell should be skipped (part of merge but not root)
    pub skip: bool,
}

/// Cumulative edge positions and per-index sizes for one axis.
fn axis_positions(count: u32, sizes: &AxisSizes<'_>) -> (Vec<f32>, Vec<f32>) {
    let mut positions = Vec::with_capacity(count as usize + 1);
    let mut extents = Vec::with_capacity(count as usize);
    let mut edge: f32 = 0.0;
    for index in 0..count {
        positions.push(edge);
        let size = sizes.visible_size(index);
        extents.push(size);
        if size > 0.0 {
            edge += size + GRIDLINE_WIDTH;
        }
    }
    positions.push(edge); // Final edge
    (positions, extents)
}

/// Index of the last edge at or before `pos`, if `pos` is inside the axis.
fn index_at(positions: &[f32], extents: &[f32], pos: f32) -> Option<u32> {
    let total = positions.last().copied().unwrap_or(0.0);
    if pos < 0.0 || pos >= total || extents.is_empty() {
        return None;
    }
    // Hidden entries share their edge with the next index; taking the last
    // matching edge lands on the visible one.
    let i = positions.partition_point(|&p| p <= pos).saturating_sub(1);
    let i = i.min(extents.len() - 1);
    u32::try_from(i).ok()
}

impl SheetLayout {
    /// Create a new layout from sheet attributes.
    ///
    /// `client_row_sizes` holds transient autosize results that have not yet
    /// been confirmed into `sheet.row_sizes`.
    pub fn new(
        n_rows: u32,
        n_cols: u32,
        sheet: &SheetAttributes,
        client_row_sizes: &SizeMap,
        config: &GridConfig,
    ) -> Self {
        let row_sizes = AxisSizes::new(
            &sheet.row_sizes,
            config.default_row_height,
            &sheet.hidden_rows,
        )
        .with_client_override(client_row_sizes);
        let col_sizes = AxisSizes::new(
            &sheet.col_sizes,
            config.default_col_width,
            &sheet.hidden_cols,
        );

        let (row_positions, row_heights) = axis_positions(n_rows, &row_sizes);
        let (col_positions, col_widths) = axis_positions(n_cols, &col_sizes);

        SheetLayout {
            col_positions,
            row_positions,
            col_widths,
            row_heights,
            n_rows,
            n_cols,
            frozen_rows: sheet.frozen_rows.min(n_rows),
            frozen_cols: sheet.frozen_cols.min(n_cols),
        }
    }

    /// Get cell bounds in sheet coordinates.
    ///
    /// A merge root covers its whole span; members are flagged `skip`.
    pub fn cell_rect(&self, location: GridLocation, cell: Option<&Cell>) -> CellRect {
        let GridLocation { row, col } = location;
        let x = self.col_positions.get(col as usize).copied().unwrap_or(0.0);
        let y = self.row_positions.get(row as usize).copied().unwrap_or(0.0);
        let w = self.col_widths.get(col as usize).copied().unwrap_or(0.0);
        let h = self.row_heights.get(row as usize).copied().unwrap_or(0.0);

        match cell.map(|c| c.merge) {
            Some(MergeRole::Member(_)) => CellRect {
                x,
                y,
                width: w,
                height: h,
                skip: true,
            },
            Some(MergeRole::Root { row_span, col_span }) => {
                self.span_rect(location, row_span, col_span)
            }
            _ => CellRect {
                x,
                y,
                width: w,
                height: h,
                skip: false,
            },
        }
    }

    /// Bounds of a `row_span x col_span` block starting at `location`.
    pub fn span_rect(&self, location: GridLocation, row_span: u32, col_span: u32) -> CellRect {
        let x = self
            .col_positions
            .get(location.col as usize)
            .copied()
            .unwrap_or(0.0);
        let y = self
            .row_positions
            .get(location.row as usize)
            .copied()
            .unwrap_or(0.0);
        let end_col = location.col.saturating_add(col_span).min(self.n_cols);
        let end_row = location.row.saturating_add(row_span).min(self.n_rows);
        let x2 = self.col_positions.get(end_col as usize).copied().unwrap_or(x);
        let y2 = self.row_positions.get(end_row as usize).copied().unwrap_or(y);
        CellRect {
            x,
            y,
            width: (x2 - x - GRIDLINE_WIDTH).max(0.0),
            height: (y2 - y - GRIDLINE_WIDTH).max(0.0),
            skip: false,
        }
    }

    /// Find row at y position (binary search)
    pub fn row_at_y(&self, y: f32) -> Option<u32> {
        index_at(&self.row_positions, &self.row_heights, y)
    }

    /// Find column at x position (binary search)
    pub fn col_at_x(&self, x: f32) -> Option<u32> {
        index_at(&self.col_positions, &self.col_widths, x)
    }

    /// Get total width of the sheet
    pub fn total_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    /// Get total height of the sheet
    pub fn total_height(&self) -> f32 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    /// Get column width at index (0 if hidden or out of range)
    pub fn col_width(&self, col: u32) -> f32 {
        self.col_widths.get(col as usize).copied().unwrap_or(0.0)
    }

    /// Get row height at index (0 if hidden or out of range)
    pub fn row_height(&self, row: u32) -> f32 {
        self.row_heights.get(row as usize).copied().unwrap_or(0.0)
    }

    /// Get the total height of frozen rows (returns 0 if no frozen rows)
    pub fn frozen_rows_height(&self) -> f32 {
        if self.frozen_rows == 0 {
            return 0.0;
        }
        self.row_positions
            .get(self.frozen_rows as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Get the total width of frozen columns (returns 0 if no frozen columns)
    pub fn frozen_cols_width(&self) -> f32 {
        if self.frozen_cols == 0 {
            return 0.0;
        }
        self.col_positions
            .get(self.frozen_cols as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
    use crate::layout::{get_offset_by_position, AxisSizes};
    use crate::types::HiddenIndices;

    fn layout(sheet: &SheetAttributes) -> SheetLayout {
        SheetLayout::new(10, 6, sheet, &SizeMap::new(), &GridConfig::default())
    }

    #[test]
    fn test_basic_layout() {
        let layout = layout(&SheetAttributes::default());
        assert_eq!(layout.n_rows, 10);
        assert_eq!(layout.n_cols, 6);
        assert_eq!(layout.total_width(), (DEFAULT_COL_WIDTH + 1.0) * 6.0);
        assert_eq!(layout.total_height(), (DEFAULT_ROW_HEIGHT + 1.0) * 10.0);
    }

    #[test]
    fn test_cell_rect() {
        let layout = layout(&SheetAttributes::default());
        let rect = layout.cell_rect(GridLocation::new(0, 0), None);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT);
        assert!(!rect.skip);

        let rect = layout.cell_rect(GridLocation::new(1, 2), None);
        assert_eq!(rect.x, (DEFAULT_COL_WIDTH + 1.0) * 2.0);
        assert_eq!(rect.y, DEFAULT_ROW_HEIGHT + 1.0);
    }

    #[test]
    fn test_merged_rect() {
        let layout = layout(&SheetAttributes::default());
        let root = Cell {
            merge: MergeRole::Root {
                row_span: 2,
                col_span: 2,
            },
            ..Cell::default()
        };
        let rect = layout.cell_rect(GridLocation::new(0, 0), Some(&root));
        assert!(!rect.skip);
        assert_eq!(rect.width, DEFAULT_COL_WIDTH * 2.0 + 1.0);
        assert_eq!(rect.height, DEFAULT_ROW_HEIGHT * 2.0 + 1.0);

        let member = Cell {
            merge: MergeRole::Member(GridLocation::new(0, 0)),
            ..Cell::default()
        };
        assert!(layout.cell_rect(GridLocation::new(1, 1), Some(&member)).skip);
    }

    #[test]
    fn test_positions_match_offset_function() {
        let sheet = SheetAttributes {
            hidden_cols: HiddenIndices::from(vec![1, 3]),
            col_sizes: [(2, 100.0)].into_iter().collect(),
            ..SheetAttributes::default()
        };
        let layout = layout(&sheet);
        let sizes = AxisSizes::new(&sheet.col_sizes, DEFAULT_COL_WIDTH, &sheet.hidden_cols);
        for col in 0..=6 {
            assert_eq!(
                layout.col_positions[col as usize],
                get_offset_by_position(col, &sizes)
            );
        }
    }

    #[test]
    fn test_hit_test_skips_hidden() {
        let sheet = SheetAttributes {
            hidden_cols: HiddenIndices::from(vec![1]),
            ..SheetAttributes::default()
        };
        let layout = layout(&sheet);
        assert_eq!(layout.col_at_x(0.0), Some(0));
        assert_eq!(layout.col_at_x(32.0), Some(0));
        assert_eq!(layout.col_at_x(DEFAULT_COL_WIDTH + 1.0), Some(2));
        assert_eq!(layout.col_at_x(-1.0), None);
        assert_eq!(layout.col_at_x(layout.total_width() + 5.0), None);
    }

    #[test]
    fn test_row_at_y() {
        let layout = layout(&SheetAttributes::default());
        let step = DEFAULT_ROW_HEIGHT + 1.0;
        assert_eq!(layout.row_at_y(0.0), Some(0));
        assert_eq!(layout.row_at_y(10.0), Some(0));
        assert_eq!(layout.row_at_y(step), Some(1));
        assert_eq!(layout.row_at_y(step * 2.5), Some(2));
    }

    #[test]
    fn test_frozen_extents_clamped() {
        let sheet = SheetAttributes {
            frozen_rows: 2,
            frozen_cols: 50,
            ..SheetAttributes::default()
        };
        let layout = layout(&sheet);
        assert_eq!(layout.frozen_cols, 6);
        assert_eq!(layout.frozen_rows_height(), (DEFAULT_ROW_HEIGHT + 1.0) * 2.0);
        assert_eq!(layout.frozen_cols_width(), layout.total_width());
    }
}
