//! Pane partition for windowed rendering.
//!
//! With frozen rows and columns the sheet renders as four panes:
//!
//! ```text
//! +--------+-------------+
//! | Corner | FrozenRows  |
//! +--------+-------------+
//! | Frozen | Main        |
//! | Cols   |             |
//! +--------+-------------+
//! ```
//!
//! Each pane covers a window of global rows and columns. Only the cells in
//! that window are handed to the renderer, plus any merge root or overflow
//! origin that sits outside the window but paints into it.

use std::collections::HashMap;

use crate::grid::Grid;
use crate::layout::{CellRect, SheetLayout, Viewport};
use crate::types::{Cell, GridLocation};

/// Which of the four panes a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneKind {
    /// Scrolls in both axes
    Main,
    /// Pinned at the top; scrolls horizontally
    FrozenRows,
    /// Pinned at the left; scrolls vertically
    FrozenCols,
    /// Pinned in both axes
    Corner,
}

/// Pane of a cell, from its global coordinates and the frozen counts.
pub fn pane_kind(location: GridLocation, frozen_rows: u32, frozen_cols: u32) -> PaneKind {
    match (location.row < frozen_rows, location.col < frozen_cols) {
        (true, true) => PaneKind::Corner,
        (true, false) => PaneKind::FrozenRows,
        (false, true) => PaneKind::FrozenCols,
        (false, false) => PaneKind::Main,
    }
}

/// One cell handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct PaneCell<'g> {
    pub location: GridLocation,
    /// Bounds in sheet coordinates; a merge root covers its whole span
    pub rect: CellRect,
    /// Bounds of the text including overflowed columns, for overflow origins
    pub overflow_rect: Option<CellRect>,
    pub cell: &'g Cell,
    /// True for a root/origin outside the window that paints into it
    pub leading: bool,
}

/// One of the four panes.
#[derive(Debug, Clone)]
pub struct Pane<'g> {
    pub kind: PaneKind,
    /// Leading cells first, then the window in row-major order
    pub cells: Vec<PaneCell<'g>>,
    /// First global row of the window
    pub row_offset: u32,
    /// First global column of the window
    pub col_offset: u32,
    /// Inclusive window, `None` when the pane is empty
    pub rows: Option<(u32, u32)>,
    pub cols: Option<(u32, u32)>,
    /// Screen origin of the pane
    pub x: f32,
    pub y: f32,
}

impl Pane<'_> {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The four panes of one frame.
#[derive(Debug, Clone)]
pub struct PaneSet<'g> {
    pub main: Pane<'g>,
    pub frozen_rows: Pane<'g>,
    pub frozen_cols: Pane<'g>,
    pub corner: Pane<'g>,
}

impl<'g> PaneSet<'g> {
    pub fn pane(&self, kind: PaneKind) -> &Pane<'g> {
        match kind {
            PaneKind::Main => &self.main,
            PaneKind::FrozenRows => &self.frozen_rows,
            PaneKind::FrozenCols => &self.frozen_cols,
            PaneKind::Corner => &self.corner,
        }
    }

    /// Panes in paint order: scrolling content first, corner last.
    pub fn iter(&self) -> impl Iterator<Item = &Pane<'g>> {
        [&self.main, &self.frozen_rows, &self.frozen_cols, &self.corner].into_iter()
    }
}

/// Memo of which off-window cell paints into a window edge cell.
///
/// Valid for one grid only; the owner clears it whenever the grid changes.
#[derive(Debug, Default, Clone)]
pub struct PaneCache {
    owners: HashMap<GridLocation, Option<GridLocation>>,
    hits: u64,
    misses: u64,
}

impl PaneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.owners.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// `(hits, misses)` since the last [`clear`](Self::clear).
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Merge root or overflow origin painting over `location`, if it is not
    /// `location` itself.
    fn owner(&mut self, grid: &Grid, location: GridLocation) -> Option<GridLocation> {
        if let Some(&owner) = self.owners.get(&location) {
            self.hits += 1;
            return owner;
        }
        self.misses += 1;
        let owner = grid
            .merge_bounds(location)
            .map(|b| GridLocation::new(b.top, b.left))
            .filter(|&root| root != location)
            .or_else(|| grid.overflow_origin(location));
        self.owners.insert(location, owner);
        owner
    }
}

/// Window of one axis: `(frozen, scrolling)`, each inclusive.
fn axis_windows(frozen: u32, scrolling: Option<(u32, u32)>) -> (Option<(u32, u32)>, Option<(u32, u32)>) {
    let frozen = frozen.checked_sub(1).map(|last| (0, last));
    let scrolling = scrolling.filter(|&(start, end)| start <= end && start >= frozen.map_or(0, |f| f.1 + 1));
    (frozen, scrolling)
}

fn pane_cell<'g>(
    grid: &'g Grid,
    layout: &SheetLayout,
    location: GridLocation,
    leading: bool,
) -> Option<PaneCell<'g>> {
    let cell = grid.get(location)?;
    let overflow_rect = cell
        .overflow_col_span
        .map(|span| layout.span_rect(location, 1, span.saturating_add(1)));
    Some(PaneCell {
        location,
        rect: layout.cell_rect(location, Some(cell)),
        overflow_rect,
        cell,
        leading,
    })
}

fn build_pane<'g>(
    kind: PaneKind,
    grid: &'g Grid,
    layout: &SheetLayout,
    rows: Option<(u32, u32)>,
    cols: Option<(u32, u32)>,
    origin: (f32, f32),
    cache: &mut PaneCache,
) -> Pane<'g> {
    let mut pane = Pane {
        kind,
        cells: Vec::new(),
        row_offset: rows.map_or(0, |r| r.0),
        col_offset: cols.map_or(0, |c| c.0),
        rows,
        cols,
        x: origin.0,
        y: origin.1,
    };
    let (Some((r0, r1)), Some((c0, c1))) = (rows, cols) else {
        return pane;
    };

    // Off-window owners can only reach in across the top row or left column.
    let edge = (c0..=c1)
        .map(|c| GridLocation::new(r0, c))
        .chain((r0.saturating_add(1)..=r1).map(|r| GridLocation::new(r, c0)));
    let mut leading: Vec<GridLocation> = Vec::new();
    for location in edge {
        let Some(owner) = cache.owner(grid, location) else {
            continue;
        };
        let outside = owner.row < r0 || owner.col < c0;
        if outside && !leading.contains(&owner) {
            leading.push(owner);
        }
    }
    pane.cells
        .extend(leading.into_iter().filter_map(|owner| pane_cell(grid, layout, owner, true)));

    for r in r0..=r1 {
        if layout.row_height(r) <= 0.0 {
            continue;
        }
        for c in c0..=c1 {
            if layout.col_width(c) <= 0.0 {
                continue;
            }
            let location = GridLocation::new(r, c);
            if let Some(cell) = pane_cell(grid, layout, location, false) {
                if !cell.rect.skip {
                    pane.cells.push(cell);
                }
            }
        }
    }
    pane
}

/// Split the visible part of `grid` into the four panes.
///
/// The frozen panes always show the leading rows/columns; the scrolling
/// windows come from `viewport`. Pane origins are in screen pixels.
pub fn partition_panes<'g>(
    grid: &'g Grid,
    layout: &SheetLayout,
    viewport: &Viewport,
    cache: &mut PaneCache,
) -> PaneSet<'g> {
    let (frozen_rows, scroll_rows) = axis_windows(layout.frozen_rows, viewport.visible_rows(layout));
    let (frozen_cols, scroll_cols) = axis_windows(layout.frozen_cols, viewport.visible_cols(layout));

    let left = layout.frozen_cols_width() * viewport.scale;
    let top = layout.frozen_rows_height() * viewport.scale;

    PaneSet {
        main: build_pane(PaneKind::Main, grid, layout, scroll_rows, scroll_cols, (left, top), cache),
        frozen_rows: build_pane(
            PaneKind::FrozenRows,
            grid,
            layout,
            frozen_rows,
            scroll_cols,
            (left, 0.0),
            cache,
        ),
        frozen_cols: build_pane(
            PaneKind::FrozenCols,
            grid,
            layout,
            scroll_rows,
            frozen_cols,
            (0.0, top),
            cache,
        ),
        corner: build_pane(
            PaneKind::Corner,
            grid,
            layout,
            frozen_rows,
            frozen_cols,
            (0.0, 0.0),
            cache,
        ),
    }
}
