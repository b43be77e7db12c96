//! Merge root assignment.
//!
//! A merge root carries the span; every other cell in its rectangle points
//! back at it. Rectangles never overlap: when a newer merge overlaps an older
//! one, the older one is dissolved.

use crate::grid::Grid;
use crate::types::{Cell, GridLocation, MergeRole, SelectionBounds};

/// Make a requested span coherent in both axes.
///
/// A span given on one axis implies 1 on the other; a 0 span is treated as 1.
/// Returns `None` unless at least one axis is larger than 1.
pub fn normalize_span(row_span: Option<u32>, col_span: Option<u32>) -> Option<(u32, u32)> {
    if row_span.is_none() && col_span.is_none() {
        return None;
    }
    let rows = row_span.unwrap_or(1).max(1);
    let cols = col_span.unwrap_or(1).max(1);
    (rows > 1 || cols > 1).then_some((rows, cols))
}

/// Clamp a span so the rectangle stays inside the grid.
///
/// Returns `None` if nothing but the root itself is left.
pub fn clamp_span(
    location: GridLocation,
    span: (u32, u32),
    n_rows: u32,
    n_cols: u32,
) -> Option<(u32, u32)> {
    let rows = span.0.min(n_rows.saturating_sub(location.row)).max(1);
    let cols = span.1.min(n_cols.saturating_sub(location.col)).max(1);
    (rows > 1 || cols > 1).then_some((rows, cols))
}

fn rect(root: GridLocation, row_span: u32, col_span: u32) -> impl Iterator<Item = GridLocation> {
    let rows = root.row..root.row.saturating_add(row_span);
    rows.flat_map(move |r| {
        (root.col..root.col.saturating_add(col_span)).map(move |c| GridLocation::new(r, c))
    })
}

/// Undo the merge rooted at `root`: the root loses its span and every
/// member pointing at it loses its back-reference.
///
/// Returns the rows that were written. A no-op if `root` is not a root.
pub fn dissolve_merge(grid: &mut Grid, root: GridLocation) -> Vec<u32> {
    let Some(MergeRole::Root { row_span, col_span }) = grid.get(root).map(|c| c.merge) else {
        return Vec::new();
    };
    log::debug!("dissolving merge at {root} ({row_span}x{col_span})");

    let mut rows = Vec::new();
    for location in rect(root, row_span, col_span) {
        let Some(cell) = grid.get_mut(location) else {
            continue;
        };
        let owned = location == root || cell.merge == MergeRole::Member(root);
        if owned {
            cell.merge = MergeRole::None;
            if rows.last() != Some(&location.row) {
                rows.push(location.row);
            }
        }
    }
    rows
}

/// Write a decoded cell into the grid.
///
/// Overflow annotations already on the slot survive until the overflow
/// spanner recomputes them, and edges received from neighbors stay in the
/// cell's borders. A non-root write into a live merge keeps its
/// back-reference. A root that is rewritten with a different span, or
/// without one, has its old rectangle dissolved first.
pub fn write_cell(
    grid: &mut Grid,
    location: GridLocation,
    mut cell: Cell,
    span: Option<(u32, u32)>,
) -> Vec<u32> {
    let mut rows = vec![location.row];
    let Some(previous) = grid.get(location) else {
        return Vec::new();
    };
    let previous_merge = previous.merge;
    let previous_overflow = (previous.overflow_col_span, previous.overflow_from_col);
    let received = previous.received_borders;
    let live_member = grid.merge_bounds(location).is_some();

    cell.merge = match (previous_merge, span) {
        (MergeRole::Root { row_span, col_span }, Some(new)) if new == (row_span, col_span) => {
            MergeRole::Root { row_span, col_span }
        }
        (MergeRole::Root { .. }, _) => {
            rows.extend(dissolve_merge(grid, location));
            span.map_or(MergeRole::None, |(row_span, col_span)| MergeRole::Root {
                row_span,
                col_span,
            })
        }
        (MergeRole::Member(root), None) if live_member => MergeRole::Member(root),
        (MergeRole::Member(root), Some((row_span, col_span))) => {
            // New root inside an older merge: the older one goes.
            rows.extend(dissolve_merge(grid, root));
            MergeRole::Root { row_span, col_span }
        }
        (_, Some((row_span, col_span))) => MergeRole::Root { row_span, col_span },
        (_, None) => MergeRole::None,
    };
    (cell.overflow_col_span, cell.overflow_from_col) = previous_overflow;
    cell.attributes.borders = cell.attributes.borders.union(received);
    cell.received_borders = received;

    if let Some(slot) = grid.get_mut(location) {
        *slot = cell;
    }
    rows
}

fn bounds(root: GridLocation, row_span: u32, col_span: u32) -> SelectionBounds {
    SelectionBounds {
        top: root.row,
        left: root.col,
        bottom: root.row.saturating_add(row_span.saturating_sub(1)),
        right: root.col.saturating_add(col_span.saturating_sub(1)),
    }
}

/// Point every non-root cell of each root's rectangle back at the root.
///
/// `roots` is in batch order. Later roots win: an earlier root from the same
/// batch whose rectangle overlaps a later one is dissolved, as is any older
/// merge already in the grid that a root's rectangle overlaps. A root that
/// was overwritten later in the batch is skipped. Returns the rows written.
pub fn assign_merges(grid: &mut Grid, roots: &[(GridLocation, u32, u32)]) -> Vec<u32> {
    let mut rows = Vec::new();
    let mut assigned: Vec<(GridLocation, SelectionBounds)> = Vec::new();

    for &(root, row_span, col_span) in roots.iter().rev() {
        let expected = MergeRole::Root { row_span, col_span };
        if grid.get(root).map(|c| c.merge) != Some(expected)
            || assigned.iter().any(|(r, _)| *r == root)
        {
            continue;
        }
        let rect_bounds = bounds(root, row_span, col_span);
        if assigned.iter().any(|(_, b)| b.intersects(&rect_bounds)) {
            rows.extend(dissolve_merge(grid, root));
            continue;
        }

        // Older merges overlapping this rectangle
        let mut overlapping: Vec<GridLocation> = Vec::new();
        for location in rect(root, row_span, col_span) {
            if location == root {
                continue;
            }
            let other = match grid.get(location).map(|c| c.merge) {
                Some(MergeRole::Root { .. }) => Some(location),
                Some(MergeRole::Member(other)) if other != root => Some(other),
                _ => None,
            };
            if let Some(other) = other {
                if !overlapping.contains(&other) {
                    overlapping.push(other);
                }
            }
        }
        for other in overlapping {
            rows.extend(dissolve_merge(grid, other));
        }

        for location in rect(root, row_span, col_span) {
            if location == root {
                continue;
            }
            if let Some(cell) = grid.get_mut(location) {
                cell.merge = MergeRole::Member(root);
                if rows.last() != Some(&location.row) {
                    rows.push(location.row);
                }
            }
        }
        assigned.push((root, rect_bounds));
    }
    rows
}
