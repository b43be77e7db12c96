//! Tests for the four-pane partition of the visible window.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{loc, merge_root, text, SHEET};
use sheetgrid::layout::SizeMap;
use sheetgrid::{
    partition_panes, Grid, GridConfig, PaneCache, PaneKind, SheetAttributes, SheetLayout,
    SheetView, Viewport,
};

fn view(rows: usize, cols: usize) -> SheetView {
    SheetView::new(SHEET, rows, cols, GridConfig::default()).unwrap()
}

// ============================================================================
// WINDOWS
// ============================================================================

#[test]
fn test_unfrozen_sheet_uses_main_only() {
    let mut view = view(100, 30);
    let panes = view.panes();
    assert!(panes.corner.is_empty());
    assert!(panes.frozen_rows.is_empty());
    assert!(panes.frozen_cols.is_empty());

    // 600px / 21px rows, 800px / 65px columns, both inclusive
    assert_eq!(panes.main.rows, Some((0, 28)));
    assert_eq!(panes.main.cols, Some((0, 12)));
    assert_eq!(panes.main.cells.len(), 29 * 13);
}

#[test]
fn test_frozen_bands_share_scrolling_windows() {
    let mut view = view(100, 30);
    view.freeze(2, 1).unwrap();
    let panes = view.panes();

    assert_eq!(panes.corner.rows, Some((0, 1)));
    assert_eq!(panes.corner.cols, Some((0, 0)));
    assert_eq!(panes.frozen_rows.rows, Some((0, 1)));
    assert_eq!(panes.frozen_rows.cols, panes.main.cols);
    assert_eq!(panes.frozen_cols.rows, panes.main.rows);
    assert_eq!(panes.main.row_offset, 2);
    assert_eq!(panes.main.col_offset, 1);

    for pane in panes.iter() {
        for cell in pane.cells.iter().filter(|c| !c.leading) {
            assert_eq!(
                sheetgrid::pane_kind(cell.location, 2, 1),
                pane.kind,
                "{} in {:?}",
                cell.location,
                pane.kind
            );
        }
    }
    assert_eq!(panes.pane(PaneKind::Corner).cells.len(), 2);
}

#[test]
fn test_frozen_bands_stay_put_when_scrolled() {
    let mut view = view(200, 60);
    view.freeze(1, 1).unwrap();
    view.set_scroll(500.0, 1000.0);
    let panes = view.panes();

    assert_eq!(panes.corner.rows, Some((0, 0)));
    assert_eq!(panes.frozen_rows.rows, Some((0, 0)));
    assert!(panes.main.row_offset > 1);
    assert!(panes.main.col_offset > 1);
    assert_eq!(panes.frozen_cols.row_offset, panes.main.row_offset);
}

#[test]
fn test_hidden_rows_are_not_emitted() {
    let mut view = view(20, 5);
    view.hide_rows(&[1, 2]);
    let panes = view.panes();
    assert!(panes.main.cells.iter().all(|c| c.location.row != 1 && c.location.row != 2));
    assert!(panes.main.cells.iter().any(|c| c.location.row == 3));
}

// ============================================================================
// LEADING CELLS
// ============================================================================

#[test]
fn test_merge_root_above_window_leads() {
    let mut view = view(100, 10);
    view.apply_batch(&[merge_root(0, 0, 10, 2)], false).unwrap();
    view.set_scroll(0.0, 5.0 * 21.0);
    let panes = view.panes();

    assert_eq!(panes.main.row_offset, 5);
    let first = &panes.main.cells[0];
    assert!(first.leading);
    assert_eq!(first.location, loc(0, 0));
    // merge covers ten rows of 21px, minus the trailing gridline
    assert_eq!(first.rect.height, 10.0 * 21.0 - 1.0);
    assert_eq!(panes.main.cells.iter().filter(|c| c.leading).count(), 1);

    // members never render on their own
    assert!(!panes
        .main
        .cells
        .iter()
        .any(|c| c.location == loc(5, 0) || c.location == loc(5, 1)));
}

#[test]
fn test_overflow_origin_left_of_window_leads() {
    let mut view = view(10, 30);
    view.apply_batch(&[text(3, 0, &"w".repeat(40))], false).unwrap();
    assert_eq!(view.grid().get(loc(3, 0)).unwrap().overflow_col_span, Some(4));

    view.set_scroll(2.0 * 65.0, 0.0);
    let panes = view.panes();
    assert_eq!(panes.main.col_offset, 2);

    let leading: Vec<_> = panes.main.cells.iter().filter(|c| c.leading).collect();
    assert_eq!(leading.len(), 1);
    assert_eq!(leading[0].location, loc(3, 0));
    let overflow = leading[0].overflow_rect.unwrap();
    assert_eq!(overflow.x, 0.0);
    assert_eq!(overflow.width, 5.0 * 65.0 - 1.0);
}

#[test]
fn test_in_window_root_is_not_leading() {
    let mut view = view(20, 10);
    view.apply_batch(&[merge_root(1, 1, 2, 2)], false).unwrap();
    let panes = view.panes();
    let root = panes.main.cells.iter().find(|c| c.location == loc(1, 1)).unwrap();
    assert!(!root.leading);
    assert!(panes.main.cells.iter().all(|c| !c.leading));
}

// ============================================================================
// CACHE
// ============================================================================

#[test]
fn test_cache_reused_across_frames() {
    let grid = Grid::new(50, 20);
    let layout = SheetLayout::new(
        50,
        20,
        &SheetAttributes::default(),
        &SizeMap::new(),
        &GridConfig::default(),
    );
    let viewport = Viewport::new();
    let mut cache = PaneCache::new();

    let first = partition_panes(&grid, &layout, &viewport, &mut cache).main.cells.len();
    let (hits, misses) = cache.stats();
    assert_eq!(hits, 0);
    assert!(misses > 0);
    assert_eq!(cache.len() as u64, misses);

    let second = partition_panes(&grid, &layout, &viewport, &mut cache).main.cells.len();
    assert_eq!(first, second);
    assert_eq!(cache.stats().0, misses);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats(), (0, 0));
}
