//! Border ownership normalization.
//!
//! Two adjacent cells share an edge. After a pass, that edge is recorded on
//! at most one of them: a right border moves to the right neighbor's left
//! side, a bottom border to the lower neighbor's top side.

use std::collections::BTreeMap;

use crate::grid::Grid;
use crate::types::{Borders, GridLocation, SheetAttributes};

/// Edge changes queued for one neighbor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct PendingEdges {
    add: Borders,
    retract: Borders,
}

/// Border flags queued for cells during a batch, applied after all writes.
///
/// For each target the last request per edge wins: a later retraction
/// cancels an earlier add and the other way round.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PendingBorders(BTreeMap<GridLocation, PendingEdges>);

impl PendingBorders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `flags` for `target`, unioned with anything already queued.
    pub fn queue(&mut self, target: GridLocation, flags: Borders) {
        let entry = self.0.entry(target).or_default();
        entry.add = entry.add.union(flags);
        entry.retract = entry.retract.difference(flags);
    }

    /// Queue removal of edges `target` received from a neighbor.
    pub fn retract(&mut self, target: GridLocation, flags: Borders) {
        let entry = self.0.entry(target).or_default();
        entry.retract = entry.retract.union(flags);
        entry.add = entry.add.difference(flags);
    }

    /// Flags queued for addition at `target`.
    pub fn get(&self, target: GridLocation) -> Option<Borders> {
        self.0
            .get(&target)
            .map(|edges| edges.add)
            .filter(|add| !add.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merge queued flags into the target cells' borders.
    ///
    /// A retraction only clears edges the target received, never ones it
    /// declared itself. Returns the rows whose cells changed.
    pub fn apply(self, grid: &mut Grid) -> Vec<u32> {
        let mut rows = Vec::new();
        for (target, edges) in self.0 {
            let Some(cell) = grid.get_mut(target) else {
                continue;
            };
            let cleared = edges.retract.intersection(cell.received_borders);
            let borders = cell.attributes.borders.difference(cleared).union(edges.add);
            let received = cell.received_borders.difference(cleared).union(edges.add);
            if borders == cell.attributes.borders && received == cell.received_borders {
                continue;
            }
            cell.attributes.borders = borders;
            cell.received_borders = received;
            if rows.last() != Some(&target.row) {
                rows.push(target.row);
            }
        }
        rows
    }
}

/// The cells past a block's right and bottom edges, inside the grid.
fn edge_neighbors(
    location: GridLocation,
    row_span: u32,
    col_span: u32,
    n_rows: u32,
    n_cols: u32,
) -> (Vec<GridLocation>, Vec<GridLocation>) {
    let GridLocation { row, col } = location;
    let row_end = row.saturating_add(row_span.max(1)).min(n_rows);
    let col_end = col.saturating_add(col_span.max(1)).min(n_cols);
    let right = if col_end < n_cols {
        (row..row_end).map(|r| GridLocation::new(r, col_end)).collect()
    } else {
        Vec::new()
    };
    let below = if row_end < n_rows {
        (col..col_end).map(|c| GridLocation::new(row_end, c)).collect()
    } else {
        Vec::new()
    };
    (right, below)
}

/// Rewrite a cell's borders so shared edges live on the neighbor.
///
/// `row_span`/`col_span` are the cell's merge extent (1 for plain cells), so
/// the neighbor of a merged block is the cell past its far edge. A neighbor
/// must be inside the grid and not hidden; otherwise the flag stays put.
#[allow(clippy::too_many_arguments)]
pub fn normalize_borders(
    borders: &mut Borders,
    location: GridLocation,
    row_span: u32,
    col_span: u32,
    sheet: &SheetAttributes,
    n_rows: u32,
    n_cols: u32,
    pending: &mut PendingBorders,
) {
    let (right, below) = edge_neighbors(location, row_span, col_span, n_rows, n_cols);

    if borders.right {
        if let Some(first) = right.first() {
            if !sheet.is_col_hidden(first.col) {
                borders.right = false;
                for &target in &right {
                    pending.queue(target, Borders { left: true, ..Borders::NONE });
                }
            }
        }
    }

    if borders.bottom {
        if let Some(first) = below.first() {
            if !sheet.is_row_hidden(first.row) {
                borders.bottom = false;
                for &target in &below {
                    pending.queue(target, Borders { top: true, ..Borders::NONE });
                }
            }
        }
    }
}

/// Take back edges this cell may have moved onto its neighbors earlier.
///
/// `declared` is the cell's border set before normalization; for each of
/// right and bottom it does not carry, the neighbors past that edge lose the
/// matching received edge.
pub fn retract_borders(
    declared: Borders,
    location: GridLocation,
    row_span: u32,
    col_span: u32,
    n_rows: u32,
    n_cols: u32,
    pending: &mut PendingBorders,
) {
    let (right, below) = edge_neighbors(location, row_span, col_span, n_rows, n_cols);
    if !declared.right {
        for target in right {
            pending.retract(target, Borders { left: true, ..Borders::NONE });
        }
    }
    if !declared.bottom {
        for target in below {
            pending.retract(target, Borders { top: true, ..Borders::NONE });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::HiddenIndices;

    fn right_bottom() -> Borders {
        Borders {
            right: true,
            bottom: true,
            ..Borders::NONE
        }
    }

    #[test]
    fn test_moves_right_and_bottom() {
        let mut borders = right_bottom();
        let mut pending = PendingBorders::new();
        normalize_borders(
            &mut borders,
            GridLocation::new(0, 0),
            1,
            1,
            &SheetAttributes::default(),
            5,
            5,
            &mut pending,
        );
        assert!(borders.is_empty());
        assert!(pending.get(GridLocation::new(0, 1)).unwrap().left);
        assert!(pending.get(GridLocation::new(1, 0)).unwrap().top);
    }

    #[test]
    fn test_grid_edge_keeps_flags() {
        let mut borders = right_bottom();
        let mut pending = PendingBorders::new();
        normalize_borders(
            &mut borders,
            GridLocation::new(4, 4),
            1,
            1,
            &SheetAttributes::default(),
            5,
            5,
            &mut pending,
        );
        assert_eq!(borders, right_bottom());
        assert!(pending.is_empty());
    }

    #[test]
    fn test_hidden_neighbor_keeps_flag() {
        let sheet = SheetAttributes {
            hidden_cols: HiddenIndices::from(vec![1]),
            ..SheetAttributes::default()
        };
        let mut borders = right_bottom();
        let mut pending = PendingBorders::new();
        normalize_borders(
            &mut borders,
            GridLocation::new(0, 0),
            1,
            1,
            &sheet,
            5,
            5,
            &mut pending,
        );
        assert!(borders.right);
        assert!(!borders.bottom);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_merged_block_edges() {
        let mut borders = right_bottom();
        let mut pending = PendingBorders::new();
        normalize_borders(
            &mut borders,
            GridLocation::new(1, 1),
            2,
            3,
            &SheetAttributes::default(),
            10,
            10,
            &mut pending,
        );
        assert!(borders.is_empty());
        // right edge of a 2-row block lands on both rows of column 4
        assert!(pending.get(GridLocation::new(1, 4)).unwrap().left);
        assert!(pending.get(GridLocation::new(2, 4)).unwrap().left);
        // bottom edge lands on row 3, columns 1..=3
        for c in 1..=3 {
            assert!(pending.get(GridLocation::new(3, c)).unwrap().top);
        }
        assert_eq!(pending.len(), 5);
    }

    #[test]
    fn test_queued_flags_union() {
        let mut pending = PendingBorders::new();
        let target = GridLocation::new(2, 2);
        pending.queue(target, Borders { left: true, ..Borders::NONE });
        pending.queue(target, Borders { top: true, ..Borders::NONE });
        let flags = pending.get(target).unwrap();
        assert!(flags.left && flags.top);

        let mut grid = Grid::new(3, 3);
        grid.get_mut(target).unwrap().attributes.borders.bottom = true;
        let rows = pending.apply(&mut grid);
        assert_eq!(rows, vec![2]);
        let cell = grid.get(target).unwrap();
        let b = cell.attributes.borders;
        assert!(b.left && b.top && b.bottom);
        assert!(cell.received_borders.left && cell.received_borders.top);
        assert!(!cell.received_borders.bottom);
    }

    #[test]
    fn test_retract_clears_only_received_edges() {
        let target = GridLocation::new(0, 1);
        let mut grid = Grid::new(2, 2);
        {
            let cell = grid.get_mut(target).unwrap();
            cell.attributes.borders = Borders::parse("border-left border-top");
            cell.received_borders = Borders::parse("border-left");
        }
        let mut pending = PendingBorders::new();
        pending.retract(target, Borders::parse("border-left border-top"));
        assert_eq!(pending.get(target), None);
        assert_eq!(pending.apply(&mut grid), vec![0]);

        let cell = grid.get(target).unwrap();
        assert_eq!(cell.attributes.borders, Borders::parse("border-top"));
        assert!(cell.received_borders.is_empty());
    }

    #[test]
    fn test_later_request_wins() {
        let target = GridLocation::new(1, 1);
        let left = Borders { left: true, ..Borders::NONE };
        let mut pending = PendingBorders::new();
        pending.queue(target, left);
        pending.retract(target, left);
        assert_eq!(pending.get(target), None);
        pending.queue(target, left);
        assert_eq!(pending.get(target), Some(left));
    }

    #[test]
    fn test_retract_targets_missing_edges() {
        let mut pending = PendingBorders::new();
        retract_borders(
            Borders::parse("border-right"),
            GridLocation::new(0, 0),
            1,
            2,
            4,
            4,
            &mut pending,
        );
        // right is declared, so only the two cells below the block are hit
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.get(GridLocation::new(1, 0)), None);

        // cells that never received an edge are left alone
        let mut grid = Grid::new(4, 4);
        assert!(pending.apply(&mut grid).is_empty());
    }
}
