//! Tests for the sheet view: batches, attribute changes and layout upkeep.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{loc, merge_root, text, SHEET};
use sheetgrid::config::GRIDLINE_WIDTH;
use sheetgrid::layout::SizeMap;
use sheetgrid::{
    CellValue, Direction, DropReason, GridConfig, SheetAttributes, SheetGridError, SheetView,
};

fn view(rows: usize, cols: usize) -> SheetView {
    SheetView::new(SHEET, rows, cols, GridConfig::default()).unwrap()
}

fn span(view: &SheetView, row: u32, col: u32) -> Option<u32> {
    view.grid().get(loc(row, col)).unwrap().overflow_col_span
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

#[test]
fn test_new_view_is_empty() {
    let view = view(10, 4);
    assert_eq!(view.grid().n_rows(), 10);
    assert_eq!(view.grid().n_cols(), 4);
    assert_eq!(view.sheet_id(), SHEET);
    assert!(view.grid().cells().all(|(_, c)| !c.has_value()));
    assert_eq!(view.layout().total_height(), 10.0 * 21.0);
}

#[test]
fn test_rejects_bad_config() {
    let config = GridConfig {
        default_col_width: 0.0,
        ..GridConfig::default()
    };
    let err = SheetView::new(SHEET, 10, 10, config).unwrap_err();
    assert!(matches!(err, SheetGridError::Config(_)));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_rejects_oversized_grid() {
    let too_many = usize::try_from(u64::from(u32::MAX) + 1).unwrap();
    let err = SheetView::new(SHEET, too_many, 1, GridConfig::default()).unwrap_err();
    assert!(matches!(err, SheetGridError::InvalidDimensions { .. }));
}

// ============================================================================
// BATCHES
// ============================================================================

#[test]
fn test_apply_batch_reports_and_swaps() {
    let mut view = view(5, 5);
    let report = view
        .apply_batch(&[text(1, 1, "hello"), text(9, 9, "off grid")], false)
        .unwrap();
    assert_eq!(report.applied, 1);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(
        view.grid().get(loc(1, 1)).unwrap().value,
        Some(CellValue::Text("hello".into()))
    );
}

#[test]
fn test_apply_json_uses_wire_order() {
    let mut view = view(5, 5);
    let json = format!(
        r#"[{{"address": {{"col": 3, "row": 1, "sheetId": {SHEET}}}, "outputs": 42}}]"#
    );
    let report = view.apply_json(&json, false).unwrap();
    assert_eq!(report.applied, 1);
    assert_eq!(
        view.grid().get(loc(1, 3)).unwrap().value,
        Some(CellValue::Number(42.0))
    );
}

#[test]
fn test_bad_json_element_drops_alone() {
    let mut view = view(5, 5);
    let json = format!(
        r#"[
            {{"address": {{"col": 0, "row": 0, "sheetId": {SHEET}}}, "outputs": "good"}},
            {{"address": {{"col": -1, "row": 0, "sheetId": {SHEET}}}, "outputs": "bad"}},
            {{"address": {{"col": 1, "row": 0, "sheetId": 99}}, "outputs": "elsewhere"}}
        ]"#
    );
    let report = view.apply_json(&json, false).unwrap();
    assert_eq!(report.applied, 1);
    let dropped: Vec<_> = report.dropped.iter().map(|d| (d.index, d.reason.clone())).collect();
    assert_eq!(
        dropped,
        vec![(1, DropReason::OutOfRange), (2, DropReason::OtherSheet(99))]
    );
    assert_eq!(
        view.grid().get(loc(0, 0)).unwrap().value,
        Some(CellValue::Text("good".into()))
    );
}

#[test]
fn test_failed_batch_keeps_grid() {
    let mut view = view(5, 5);
    view.apply_batch(&[text(0, 0, "kept")], false).unwrap();
    let before = view.grid().clone();

    let err = view.apply_json("not json", false).unwrap_err();
    assert!(matches!(err, SheetGridError::Json(_)));
    assert_eq!(view.grid(), &before);
}

#[test]
fn test_resize_grid_drops_outside_cells() {
    let mut view = view(6, 6);
    view.apply_batch(&[text(0, 0, "a"), text(5, 5, "b"), merge_root(3, 3, 3, 3)], false)
        .unwrap();
    view.resize_grid(4, 4).unwrap();

    assert_eq!(view.grid().n_rows(), 4);
    assert_eq!(view.grid().n_cols(), 4);
    assert!(view.grid().get(loc(0, 0)).unwrap().has_value());
    assert!(view.grid().get(loc(5, 5)).is_none());
    assert_eq!(view.layout().n_cols, 4);
    common::assert_merges_consistent(view.grid());
}

// ============================================================================
// ATTRIBUTES AND LAYOUT
// ============================================================================

#[test]
fn test_hide_and_unhide_rows() {
    let mut view = view(10, 3);
    view.hide_rows(&[2, 3]);
    assert_eq!(view.layout().row_height(2), 0.0);
    assert_eq!(view.visible_row(5), 3);
    assert_eq!(view.global_row(3), 5);

    view.unhide_rows(&[2]);
    assert!(view.layout().row_height(2) > 0.0);
    assert_eq!(view.visible_row(5), 4);
}

#[test]
fn test_hidden_column_lengthens_overflow() {
    let mut view = view(2, 8);
    view.apply_batch(&[text(0, 0, &"x".repeat(20))], false).unwrap();
    assert_eq!(span(&view, 0, 0), Some(2));

    view.hide_cols(&[1]).unwrap();
    assert_eq!(span(&view, 0, 0), Some(3));
    assert_eq!(view.visible_col(3), 2);

    view.unhide_cols(&[1]).unwrap();
    assert_eq!(span(&view, 0, 0), Some(2));
}

#[test]
fn test_wider_column_absorbs_overflow() {
    let mut view = view(2, 8);
    view.apply_batch(&[text(0, 0, &"x".repeat(20))], false).unwrap();
    view.resize_col(0, Some(300.0)).unwrap();
    assert_eq!(span(&view, 0, 0), None);
    assert_eq!(view.layout().col_width(0), 300.0);

    view.resize_col(0, None).unwrap();
    assert_eq!(span(&view, 0, 0), Some(2));
}

#[test]
fn test_freeze_trims_overflow_at_boundary() {
    let mut view = view(4, 8);
    view.apply_batch(&[text(0, 0, &"x".repeat(20))], false).unwrap();
    view.freeze(1, 1).unwrap();
    assert_eq!(span(&view, 0, 0), None);
    assert_eq!(view.layout().frozen_rows, 1);
    assert_eq!(view.layout().frozen_cols, 1);

    view.freeze(0, 0).unwrap();
    assert_eq!(span(&view, 0, 0), Some(2));
}

#[test]
fn test_client_row_sizes_yield_to_persisted() {
    let mut view = view(10, 3);
    let client: SizeMap = [(3, 40.0), (4, 50.0)].into_iter().collect();
    view.set_client_row_sizes(&client);
    assert_eq!(view.layout().row_height(3), 40.0);

    let sheet = SheetAttributes {
        row_sizes: [(3, 30.0)].into_iter().collect(),
        ..SheetAttributes::default()
    };
    view.set_attributes(sheet).unwrap();
    assert_eq!(view.layout().row_height(3), 30.0);
    assert_eq!(view.layout().row_height(4), 50.0);
    assert!(!view.client_row_sizes().contains(3));

    // persisted rows ignore later client sizes
    view.set_client_row_sizes(&[(3, 80.0)].into_iter().collect());
    assert_eq!(view.layout().row_height(3), 30.0);
}

#[test]
fn test_resize_row_replaces_client_size() {
    let mut view = view(10, 3);
    view.set_client_row_sizes(&[(2, 44.0)].into_iter().collect());
    view.resize_row(2, Some(33.0));
    assert_eq!(view.layout().row_height(2), 33.0);
    assert!(view.client_row_sizes().is_empty());

    view.resize_row(2, None);
    assert_eq!(view.layout().row_height(2), view.config().default_row_height);
}

// ============================================================================
// VIEWPORT
// ============================================================================

#[test]
fn test_hit_test_with_frozen_panes() {
    let mut view = view(100, 40);
    view.freeze(1, 1).unwrap();
    view.set_scroll(65.0 + 10.0 * 65.0, 21.0 + 20.0 * 21.0);

    // inside the frozen corner
    assert_eq!(view.hit_test(5.0, 5.0), Some(loc(0, 0)));
    // just past the frozen band, first scrolled row/column
    let x = 65.0 + 1.0;
    let y = 21.0 + 1.0;
    assert_eq!(view.hit_test(x, y), Some(loc(21, 11)));
}

#[test]
fn test_scroll_is_clamped() {
    let mut view = view(10, 5);
    view.scroll_by(-100.0, -100.0);
    assert_eq!(view.viewport().scroll_x, 0.0);
    assert_eq!(view.viewport().scroll_y, 0.0);

    view.resize_viewport(100.0, 100.0);
    view.set_scroll(1.0e6, 1.0e6);
    let layout = view.layout();
    assert_eq!(view.viewport().scroll_x, layout.total_width() - 100.0);
    assert_eq!(view.viewport().scroll_y, layout.total_height() - 100.0);
    assert_eq!(layout.total_width(), 5.0 * (64.0 + GRIDLINE_WIDTH));
}

// ============================================================================
// SELECTION AND NAVIGATION
// ============================================================================

#[test]
fn test_navigation_through_view() {
    let mut view = view(10, 10);
    view.apply_batch(&[merge_root(2, 2, 2, 3), text(2, 8, "end")], false)
        .unwrap();

    let selected = view.expand_selection(common::sel(3, 3, 3, 3));
    assert_eq!(selected, common::sel(2, 2, 3, 4));

    assert_eq!(view.navigate(loc(2, 1), Direction::Right), loc(2, 2));
    assert_eq!(view.navigate(loc(2, 2), Direction::Right), loc(2, 5));
    assert_eq!(view.jump(loc(2, 5), Direction::Right), loc(2, 8));

    let extended = view.extend_selection(common::sel(3, 1, 3, 1), Direction::Right);
    assert_eq!(extended, common::sel(2, 1, 3, 4));
}
