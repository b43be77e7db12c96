//! Dense grid model.
//!
//! Rows are reference counted. Cloning a grid shares every row; writing
//! through [`Grid::row_mut`] copies only that row. A row that a batch did not
//! touch is therefore the same allocation before and after the batch, and
//! renderers can use [`Grid::row_ptr_eq`] for change detection.

use std::rc::Rc;

use crate::error::{Result, SheetGridError};
use crate::types::{Cell, GridLocation, MergeRole, SelectionBounds};

/// Dense `n_rows x n_cols` grid of cells addressed by global `(row, col)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Rc<Vec<Cell>>>,
    n_cols: u32,
}

impl Grid {
    /// Empty grid of the given size.
    pub fn new(n_rows: u32, n_cols: u32) -> Self {
        let empty = Rc::new(vec![Cell::default(); n_cols as usize]);
        Self {
            rows: (0..n_rows).map(|_| Rc::clone(&empty)).collect(),
            n_cols,
        }
    }

    /// Grid from host-provided rows, e.g. a snapshot.
    ///
    /// Rows are not checked against `n_cols` here; the materializer rejects a
    /// ragged grid with [`SheetGridError::GridShape`].
    pub fn from_rows(n_cols: u32, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            rows: rows.into_iter().map(Rc::new).collect(),
            n_cols,
        }
    }

    pub fn n_rows(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    pub fn n_cols(&self) -> u32 {
        self.n_cols
    }

    pub fn contains(&self, location: GridLocation) -> bool {
        location.row < self.n_rows() && location.col < self.n_cols
    }

    /// Check every row has exactly `n_cols` cells.
    ///
    /// # Errors
    /// Returns [`SheetGridError::GridShape`] for the first ragged row.
    pub fn check_shape(&self) -> Result<()> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.n_cols as usize {
                return Err(SheetGridError::GridShape {
                    row: u32::try_from(i).unwrap_or(u32::MAX),
                    expected: self.n_cols,
                    found: row.len(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, location: GridLocation) -> Option<&Cell> {
        self.rows
            .get(location.row as usize)
            .and_then(|row| row.get(location.col as usize))
    }

    pub fn row(&self, row: u32) -> Option<&[Cell]> {
        self.rows.get(row as usize).map(|r| r.as_slice())
    }

    /// True when `row` is the same allocation in both grids.
    pub fn row_ptr_eq(&self, other: &Grid, row: u32) -> bool {
        match (self.rows.get(row as usize), other.rows.get(row as usize)) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Mutable access to a row, copying it first if it is shared.
    pub(crate) fn row_mut(&mut self, row: u32) -> Option<&mut Vec<Cell>> {
        self.rows.get_mut(row as usize).map(Rc::make_mut)
    }

    pub(crate) fn get_mut(&mut self, location: GridLocation) -> Option<&mut Cell> {
        self.row_mut(location.row)
            .and_then(|row| row.get_mut(location.col as usize))
    }

    /// Iterate `(location, cell)` over every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (GridLocation, &Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            let r = u32::try_from(r).unwrap_or(u32::MAX);
            row.iter().enumerate().map(move |(c, cell)| {
                (
                    GridLocation::new(r, u32::try_from(c).unwrap_or(u32::MAX)),
                    cell,
                )
            })
        })
    }

    /// Merge rectangle covering `location`, validated against the root.
    ///
    /// Returns `None` for unmerged cells and for back-references whose root
    /// no longer covers them.
    pub fn merge_bounds(&self, location: GridLocation) -> Option<SelectionBounds> {
        let cell = self.get(location)?;
        let root = match cell.merge {
            MergeRole::None => return None,
            MergeRole::Root { .. } => location,
            MergeRole::Member(root) => root,
        };
        let MergeRole::Root { row_span, col_span } = self.get(root)?.merge else {
            return None;
        };
        let bounds = SelectionBounds {
            top: root.row,
            left: root.col,
            bottom: root.row.saturating_add(row_span.saturating_sub(1)),
            right: root.col.saturating_add(col_span.saturating_sub(1)),
        };
        bounds.contains(location).then_some(bounds)
    }

    /// Origin of the overflow covering `location`, if the pointer is valid.
    ///
    /// A back-reference to a cell that is not an origin, or whose span does
    /// not reach this column, is treated as not overflown.
    pub fn overflow_origin(&self, location: GridLocation) -> Option<GridLocation> {
        let from = self.get(location)?.overflow_from_col?;
        if from >= location.col {
            return None;
        }
        let origin = GridLocation::new(location.row, from);
        let span = self.get(origin)?.overflow_col_span?;
        (location.col <= from.saturating_add(span)).then_some(origin)
    }

    /// Copy of this grid with new dimensions.
    ///
    /// Cells outside the new bounds are dropped; merges and overflow spans
    /// that now cross the edge are clamped.
    #[must_use]
    pub fn resized(&self, n_rows: u32, n_cols: u32) -> Grid {
        let mut rows: Vec<Rc<Vec<Cell>>> = Vec::with_capacity(n_rows as usize);
        for r in 0..n_rows {
            match self.rows.get(r as usize) {
                Some(row) if n_cols == self.n_cols => rows.push(Rc::clone(row)),
                Some(row) => {
                    let mut cells: Vec<Cell> =
                        row.iter().take(n_cols as usize).cloned().collect();
                    cells.resize(n_cols as usize, Cell::default());
                    rows.push(Rc::new(cells));
                }
                None => rows.push(Rc::new(vec![Cell::default(); n_cols as usize])),
            }
        }
        let mut grid = Grid { rows, n_cols };
        grid.clamp_annotations();
        grid
    }

    fn clamp_annotations(&mut self) {
        let n_rows = self.n_rows();
        let n_cols = self.n_cols;
        for r in 0..n_rows {
            let needs_fix = self.row(r).is_some_and(|row| {
                row.iter().enumerate().any(|(c, cell)| {
                    let c = u32::try_from(c).unwrap_or(u32::MAX);
                    match cell.merge {
                        MergeRole::Root { row_span, col_span } => {
                            r.saturating_add(row_span) > n_rows || c.saturating_add(col_span) > n_cols
                        }
                        MergeRole::Member(root) => root.row >= n_rows || root.col >= n_cols,
                        MergeRole::None => {
                            cell.overflow_col_span.is_some_and(|s| c.saturating_add(s) >= n_cols)
                        }
                    }
                })
            });
            if !needs_fix {
                continue;
            }
            let Some(row) = self.row_mut(r) else { continue };
            for (c, cell) in row.iter_mut().enumerate() {
                let c = u32::try_from(c).unwrap_or(u32::MAX);
                match cell.merge {
                    MergeRole::Root { row_span, col_span } => {
                        let row_span = row_span.min(n_rows - r);
                        let col_span = col_span.min(n_cols - c);
                        cell.merge = if row_span > 1 || col_span > 1 {
                            MergeRole::Root { row_span, col_span }
                        } else {
                            MergeRole::None
                        };
                    }
                    MergeRole::Member(root) if root.row >= n_rows || root.col >= n_cols => {
                        cell.merge = MergeRole::None;
                    }
                    _ => {}
                }
                if let Some(span) = cell.overflow_col_span {
                    let span = span.min(n_cols - 1 - c);
                    cell.overflow_col_span = (span > 0).then_some(span);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    #[test]
    fn test_new_grid_shape() {
        let grid = Grid::new(3, 4);
        assert_eq!(grid.n_rows(), 3);
        assert_eq!(grid.n_cols(), 4);
        assert!(grid.check_shape().is_ok());
        assert!(grid.get(GridLocation::new(2, 3)).is_some());
        assert!(grid.get(GridLocation::new(3, 0)).is_none());
    }

    #[test]
    fn test_copy_on_write_rows() {
        let mut grid = Grid::new(3, 3);
        let before = grid.clone();
        grid.get_mut(GridLocation::new(1, 1)).unwrap().value = Some(CellValue::Number(1.0));
        assert!(grid.row_ptr_eq(&before, 0));
        assert!(!grid.row_ptr_eq(&before, 1));
        assert!(grid.row_ptr_eq(&before, 2));
        assert!(!before.get(GridLocation::new(1, 1)).unwrap().has_value());
    }

    #[test]
    fn test_ragged_grid_rejected() {
        let grid = Grid::from_rows(2, vec![vec![Cell::default(); 2], vec![Cell::default(); 1]]);
        let err = grid.check_shape().unwrap_err();
        assert!(matches!(
            err,
            SheetGridError::GridShape {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_dangling_overflow_pointer() {
        let mut grid = Grid::new(1, 4);
        grid.get_mut(GridLocation::new(0, 2)).unwrap().overflow_from_col = Some(0);
        // cell 0 is not an origin
        assert_eq!(grid.overflow_origin(GridLocation::new(0, 2)), None);

        grid.get_mut(GridLocation::new(0, 0)).unwrap().overflow_col_span = Some(2);
        assert_eq!(
            grid.overflow_origin(GridLocation::new(0, 2)),
            Some(GridLocation::new(0, 0))
        );

        // self-reference is never valid
        grid.get_mut(GridLocation::new(0, 3)).unwrap().overflow_from_col = Some(3);
        assert_eq!(grid.overflow_origin(GridLocation::new(0, 3)), None);
    }

    #[test]
    fn test_merge_bounds_validates_root() {
        let mut grid = Grid::new(4, 4);
        grid.get_mut(GridLocation::new(1, 1)).unwrap().merge = MergeRole::Member(GridLocation::new(0, 0));
        assert_eq!(grid.merge_bounds(GridLocation::new(1, 1)), None);

        grid.get_mut(GridLocation::new(0, 0)).unwrap().merge = MergeRole::Root {
            row_span: 2,
            col_span: 2,
        };
        let b = grid.merge_bounds(GridLocation::new(1, 1)).unwrap();
        assert_eq!((b.top, b.left, b.bottom, b.right), (0, 0, 1, 1));
    }

    #[test]
    fn test_resize_clamps_merges() {
        let mut grid = Grid::new(4, 4);
        grid.get_mut(GridLocation::new(2, 2)).unwrap().merge = MergeRole::Root {
            row_span: 2,
            col_span: 2,
        };
        for (r, c) in [(2, 3), (3, 2), (3, 3)] {
            grid.get_mut(GridLocation::new(r, c)).unwrap().merge =
                MergeRole::Member(GridLocation::new(2, 2));
        }
        let small = grid.resized(3, 4);
        assert_eq!(small.n_rows(), 3);
        assert_eq!(
            small.get(GridLocation::new(2, 2)).unwrap().merge,
            MergeRole::Root {
                row_span: 1,
                col_span: 2
            }
        );
        let smaller = grid.resized(3, 3);
        assert_eq!(smaller.get(GridLocation::new(2, 2)).unwrap().merge, MergeRole::None);
        assert!(smaller.check_shape().is_ok());
    }
}
