//! Merge-aware selection expansion.
//!
//! A selection must never cut through a merged block. Expansion grows the
//! rectangle until every merge it touches lies fully inside it.

use crate::grid::Grid;
use crate::types::{Cell, Direction, GridLocation, SelectionBounds, SheetSelection};

/// Root of the merge `cell` is a member of, if any.
pub fn get_root_cell_coords(cell: &Cell) -> Option<GridLocation> {
    cell.merged_into()
}

/// Cells on the edge of `bounds`, clipped to the grid.
///
/// A merge that intersects a rectangle without lying inside it always
/// crosses the rectangle's edge, so the edge is all that needs scanning.
fn perimeter(bounds: SelectionBounds, grid: &Grid) -> Vec<GridLocation> {
    if bounds.top >= grid.n_rows() || bounds.left >= grid.n_cols() {
        return Vec::new();
    }
    let top = bounds.top.min(grid.n_rows() - 1);
    let bottom = bounds.bottom.min(grid.n_rows() - 1);
    let left = bounds.left.min(grid.n_cols() - 1);
    let right = bounds.right.min(grid.n_cols() - 1);

    let mut cells = Vec::new();
    for col in left..=right {
        cells.push(GridLocation::new(top, col));
        if bottom != top {
            cells.push(GridLocation::new(bottom, col));
        }
    }
    for row in top.saturating_add(1)..bottom {
        cells.push(GridLocation::new(row, left));
        if right != left {
            cells.push(GridLocation::new(row, right));
        }
    }
    cells
}

fn expand_bounds(mut bounds: SelectionBounds, grid: &Grid) -> SelectionBounds {
    loop {
        let grown = perimeter(bounds, grid)
            .into_iter()
            .filter_map(|location| grid.merge_bounds(location))
            .fold(bounds, |acc, merge| acc.union(&merge));
        if grown == bounds {
            return bounds;
        }
        bounds = grown;
    }
}

/// Grow `selection` until no merge straddles its edge.
///
/// The result is normalized: `start` top-left, `end` bottom-right.
/// Expanding an already expanded selection returns it unchanged.
pub fn expand_to_merged_cells(selection: SheetSelection, grid: &Grid) -> SheetSelection {
    expand_bounds(selection.bounds(), grid).to_selection()
}

/// Expand `selection` after its moving corner stepped in `direction`.
///
/// If the cell at `end` belongs to a merge, the moving edge is pushed to the
/// merge's far side in that direction before the usual expansion. The
/// anchor stays on its side: on each axis, `start` keeps being the lesser
/// or greater corner as it was in `selection`.
pub fn expand_to_merged_cells_in_direction(
    selection: SheetSelection,
    grid: &Grid,
    direction: Direction,
) -> SheetSelection {
    let SheetSelection { start, mut end } = selection;
    if let Some(merge) = grid.merge_bounds(end) {
        match direction {
            Direction::Right => end.col = end.col.max(merge.right),
            Direction::Left => end.col = end.col.min(merge.left),
            Direction::Down => end.row = end.row.max(merge.bottom),
            Direction::Up => end.row = end.row.min(merge.top),
        }
    }

    let bounds = expand_bounds(SheetSelection::new(start, end).bounds(), grid);
    let (start_row, end_row) = if start.row <= end.row {
        (bounds.top, bounds.bottom)
    } else {
        (bounds.bottom, bounds.top)
    };
    let (start_col, end_col) = if start.col <= end.col {
        (bounds.left, bounds.right)
    } else {
        (bounds.right, bounds.left)
    };
    SheetSelection::new(
        GridLocation::new(start_row, start_col),
        GridLocation::new(end_row, end_col),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::MergeRole;

    fn merge(grid: &mut Grid, row: u32, col: u32, row_span: u32, col_span: u32) {
        let root = GridLocation::new(row, col);
        for r in row..row + row_span {
            for c in col..col + col_span {
                grid.get_mut(GridLocation::new(r, c)).unwrap().merge = if (r, c) == (row, col) {
                    MergeRole::Root { row_span, col_span }
                } else {
                    MergeRole::Member(root)
                };
            }
        }
    }

    fn sel(r1: u32, c1: u32, r2: u32, c2: u32) -> SheetSelection {
        SheetSelection::new(GridLocation::new(r1, c1), GridLocation::new(r2, c2))
    }

    #[test]
    fn test_root_coords() {
        let mut grid = Grid::new(3, 3);
        merge(&mut grid, 0, 0, 2, 2);
        assert_eq!(
            get_root_cell_coords(grid.get(GridLocation::new(1, 1)).unwrap()),
            Some(GridLocation::new(0, 0))
        );
        assert_eq!(get_root_cell_coords(grid.get(GridLocation::new(0, 0)).unwrap()), None);
        assert_eq!(get_root_cell_coords(grid.get(GridLocation::new(2, 2)).unwrap()), None);
    }

    #[test]
    fn test_selection_past_grid_is_unchanged() {
        let mut grid = Grid::new(5, 5);
        merge(&mut grid, 4, 0, 1, 3);
        assert_eq!(expand_to_merged_cells(sel(8, 0, 8, 0), &grid), sel(8, 0, 8, 0));
        assert_eq!(expand_to_merged_cells(sel(0, 7, 0, 9), &grid), sel(0, 7, 0, 9));
        // partly inside still sees the merge on the last row
        assert_eq!(expand_to_merged_cells(sel(4, 1, 8, 1), &grid), sel(4, 0, 8, 2));
    }

    #[test]
    fn test_chained_merges_reach_fixed_point() {
        let mut grid = Grid::new(10, 10);
        merge(&mut grid, 0, 1, 3, 1);
        merge(&mut grid, 2, 0, 3, 1);
        merge(&mut grid, 4, 1, 1, 3);
        let out = expand_to_merged_cells(sel(0, 0, 0, 1), &grid);
        assert_eq!(out, sel(0, 0, 4, 3));
        assert_eq!(expand_to_merged_cells(out, &grid), out);
    }

    #[test]
    fn test_interior_merge_ignored() {
        let mut grid = Grid::new(10, 10);
        merge(&mut grid, 2, 2, 2, 2);
        assert_eq!(expand_to_merged_cells(sel(0, 0, 6, 6), &grid), sel(0, 0, 6, 6));
    }

    #[test]
    fn test_direction_preserves_orientation() {
        let mut grid = Grid::new(10, 10);
        merge(&mut grid, 3, 2, 1, 3);
        // anchor right of the moving corner, moving left into the merge
        let out = expand_to_merged_cells_in_direction(sel(3, 6, 3, 4), &grid, Direction::Left);
        assert_eq!(out, sel(3, 6, 3, 2));
    }

    #[test]
    fn test_direction_pushes_moving_edge() {
        let mut grid = Grid::new(10, 10);
        merge(&mut grid, 4, 3, 1, 3);
        let out = expand_to_merged_cells_in_direction(sel(4, 1, 4, 3), &grid, Direction::Right);
        assert_eq!(out, sel(4, 1, 4, 5));
    }

    #[test]
    fn test_selection_past_grid_edge() {
        let grid = Grid::new(3, 3);
        assert_eq!(expand_to_merged_cells(sel(1, 1, 8, 8), &grid), sel(1, 1, 8, 8));
        assert_eq!(expand_to_merged_cells(sel(0, 0, 0, 0), &Grid::default()), sel(0, 0, 0, 0));
    }
}
