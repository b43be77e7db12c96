//! Common test utilities and assertion helpers.
//!
//! Builders for update batches and pre-populated grids, plus assertions on
//! the grid invariants every materialization pass must keep.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use serde_json::{json, Value};
use sheetgrid::{
    CellAddress, CellUpdate, GridConfig, Grid, GridLocation, Materializer, MergeRole,
    SheetAttributes, SheetSelection,
};

pub const SHEET: u32 = 1;

// ============================================================================
// Builders
// ============================================================================

/// In-memory location, row first.
pub fn loc(row: u32, col: u32) -> GridLocation {
    GridLocation::new(row, col)
}

pub fn sel(r1: u32, c1: u32, r2: u32, c2: u32) -> SheetSelection {
    SheetSelection::new(loc(r1, c1), loc(r2, c2))
}

/// Update for the in-memory cell `(row, col)` on the test sheet.
pub fn update(row: u32, col: u32) -> CellUpdate {
    CellUpdate::new(CellAddress::new(col, row, SHEET))
}

/// Update carrying a text value.
pub fn text(row: u32, col: u32, s: &str) -> CellUpdate {
    update(row, col).with_outputs(json!(s))
}

/// Update carrying an attribute object.
pub fn attrs(row: u32, col: u32, attributes: Value) -> CellUpdate {
    update(row, col).with_attributes(attributes)
}

/// Update that makes `(row, col)` a merge root.
pub fn merge_root(row: u32, col: u32, row_span: u32, col_span: u32) -> CellUpdate {
    attrs(row, col, json!({ "rowSpan": row_span, "colSpan": col_span }))
}

pub fn materializer() -> Materializer {
    Materializer::new(SHEET, GridConfig::default())
}

/// Apply `batch` to `prev` with default sheet attributes.
pub fn apply(prev: &Grid, batch: &[CellUpdate]) -> Grid {
    apply_with(prev, &SheetAttributes::default(), batch)
}

pub fn apply_with(prev: &Grid, sheet: &SheetAttributes, batch: &[CellUpdate]) -> Grid {
    materializer()
        .materialize(prev, sheet, batch, false)
        .expect("batch should materialize")
        .grid
}

// ============================================================================
// Invariant assertions
// ============================================================================

/// Every back-reference points at a live root whose rectangle contains it,
/// every root's rectangle is fully populated with back-references, and no
/// two rectangles overlap.
pub fn assert_merges_consistent(grid: &Grid) {
    let mut owner = vec![None; (grid.n_rows() * grid.n_cols()) as usize];
    for (location, cell) in grid.cells() {
        if let MergeRole::Root { row_span, col_span } = cell.merge {
            assert!(row_span >= 1 && col_span >= 1);
            assert!(row_span > 1 || col_span > 1, "1x1 root at {location}");
            assert!(location.row + row_span <= grid.n_rows());
            assert!(location.col + col_span <= grid.n_cols());
            for r in location.row..location.row + row_span {
                for c in location.col..location.col + col_span {
                    let slot = &mut owner[(r * grid.n_cols() + c) as usize];
                    assert!(slot.is_none(), "merges overlap at {}", loc(r, c));
                    *slot = Some(location);
                    if (r, c) != (location.row, location.col) {
                        assert_eq!(
                            grid.get(loc(r, c)).unwrap().merge,
                            MergeRole::Member(location),
                            "member {} of {location}",
                            loc(r, c)
                        );
                    }
                }
            }
        }
    }
    for (location, cell) in grid.cells() {
        if let MergeRole::Member(root) = cell.merge {
            assert_eq!(
                owner[(location.row * grid.n_cols() + location.col) as usize],
                Some(root),
                "dangling back-reference at {location}"
            );
        }
    }
}

/// No cell holding a value is covered by someone else's overflow, and every
/// overflow back-reference resolves to a valid origin.
pub fn assert_overflow_consistent(grid: &Grid) {
    for (location, cell) in grid.cells() {
        if let Some(from) = cell.overflow_from_col {
            assert!(!cell.has_value(), "overflow covers content at {location}");
            assert_eq!(grid.overflow_origin(location), Some(loc(location.row, from)));
        }
        if let Some(span) = cell.overflow_col_span {
            assert!(location.col + span < grid.n_cols());
        }
    }
}

/// A shared edge is recorded on at most one of its two cells.
pub fn assert_borders_normalized(grid: &Grid) {
    for (location, cell) in grid.cells() {
        let borders = cell.attributes.borders;
        if borders.right {
            if let Some(next) = grid.get(loc(location.row, location.col + 1)) {
                assert!(
                    !next.attributes.borders.left,
                    "edge right of {location} recorded on both cells"
                );
            }
        }
        if borders.bottom {
            if let Some(below) = grid.get(loc(location.row + 1, location.col)) {
                assert!(
                    !below.attributes.borders.top,
                    "edge below {location} recorded on both cells"
                );
            }
        }
    }
}
