//! Keyboard navigation over the grid.
//!
//! Contains:
//! - Active-cell movement (arrow keys), skipping hidden rows/columns
//! - Selection extension (Shift+Arrow)
//! - Jump to the edge of a data region (Ctrl+Arrow)
//!
//! Moves are merge aware: stepping out of a merge leaves from its far edge,
//! and landing inside one lands on its root.

use crate::grid::Grid;
use crate::layout::nearest_visible;
use crate::selection::expand_to_merged_cells_in_direction;
use crate::types::{Direction, GridLocation, SheetAttributes, SheetSelection};

/// One visible step from `location` in `direction`, or `None` at the edge.
fn step(
    grid: &Grid,
    sheet: &SheetAttributes,
    location: GridLocation,
    direction: Direction,
) -> Option<GridLocation> {
    let GridLocation { row, col } = location;
    let horizontal = direction.is_horizontal();
    let forward = direction.is_forward();
    let (index, hidden, count) = if horizontal {
        (col, &sheet.hidden_cols, grid.n_cols())
    } else {
        (row, &sheet.hidden_rows, grid.n_rows())
    };
    let next = if forward {
        index.checked_add(1).filter(|&i| i < count)?
    } else {
        index.checked_sub(1)?
    };
    let landed = nearest_visible(next, hidden, count, forward)?;
    Some(if horizontal {
        GridLocation::new(row, landed)
    } else {
        GridLocation::new(landed, col)
    })
}

/// Far edge of the merge covering `location` in `direction`.
fn leave_merge(grid: &Grid, location: GridLocation, direction: Direction) -> GridLocation {
    let Some(merge) = grid.merge_bounds(location) else {
        return location;
    };
    match direction {
        Direction::Right => GridLocation::new(location.row, merge.right),
        Direction::Left => GridLocation::new(location.row, merge.left),
        Direction::Down => GridLocation::new(merge.bottom, location.col),
        Direction::Up => GridLocation::new(merge.top, location.col),
    }
}

fn land(grid: &Grid, location: GridLocation) -> GridLocation {
    grid.merge_bounds(location)
        .map_or(location, |merge| GridLocation::new(merge.top, merge.left))
}

/// Move the active cell one visible step.
///
/// Stays put at the grid edge or when everything beyond is hidden.
pub fn move_active_cell(
    grid: &Grid,
    sheet: &SheetAttributes,
    from: GridLocation,
    direction: Direction,
) -> GridLocation {
    let edge = leave_merge(grid, from, direction);
    step(grid, sheet, edge, direction).map_or(from, |next| land(grid, next))
}

/// Extend `selection` by moving its `end` corner one visible step.
///
/// The result is expanded so no merge is cut, keeping the anchor in place.
pub fn extend_selection(
    selection: SheetSelection,
    grid: &Grid,
    sheet: &SheetAttributes,
    direction: Direction,
) -> SheetSelection {
    let edge = leave_merge(grid, selection.end, direction);
    let Some(end) = step(grid, sheet, edge, direction) else {
        return selection;
    };
    expand_to_merged_cells_in_direction(SheetSelection::new(selection.start, end), grid, direction)
}

/// Excel-style Ctrl+Arrow target.
///
/// Inside a run of values, stops at the run's last value. From an empty
/// cell, or at a run's end, stops at the next value or the grid edge.
pub fn find_data_boundary(
    grid: &Grid,
    sheet: &SheetAttributes,
    from: GridLocation,
    direction: Direction,
) -> GridLocation {
    let filled = |location: GridLocation| grid.get(location).is_some_and(|c| c.has_value());

    let Some(peek) = step(grid, sheet, from, direction) else {
        return from;
    };
    let looking_for_value = !filled(from) || !filled(peek);

    let mut current = from;
    while let Some(next) = step(grid, sheet, current, direction) {
        if looking_for_value {
            current = next;
            if filled(next) {
                break;
            }
        } else {
            if !filled(next) {
                break;
            }
            current = next;
        }
    }
    land(grid, current)
}
