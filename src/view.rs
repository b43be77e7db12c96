//! Sheet view: the single owner of one sheet's grid state.
//!
//! Holds the current [`Grid`], the sheet attributes, transient client row
//! sizes, the computed layout and viewport, and the pane cache. Cell updates
//! go through [`SheetView::apply_batch`]; the grid is only replaced once a
//! batch has materialized successfully, so a failed batch leaves the view
//! exactly as it was.
//!
//! Attribute changes (hide, freeze, resize) rebuild the layout. Those that
//! change column widths also re-run overflow spanning, since spans depend
//! on widths; cell values are never touched by them.

use crate::config::GridConfig;
use crate::error::{Result, SheetGridError};
use crate::grid::Grid;
use crate::layout::{self, SheetLayout, SizeMap, Viewport};
use crate::materialize::{parse_update_batch, BatchReport, Materializer, OutputDecoder};
use crate::measure::TextMeasurer;
use crate::navigation;
use crate::panes::{partition_panes, PaneCache, PaneSet};
use crate::selection;
use crate::types::{
    CellUpdate, Direction, GridLocation, SheetAttributes, SheetId, SheetSelection,
};

fn dimensions(n_rows: usize, n_cols: usize) -> Result<(u32, u32)> {
    match (u32::try_from(n_rows), u32::try_from(n_cols)) {
        (Ok(rows), Ok(cols)) => Ok((rows, cols)),
        _ => Err(SheetGridError::InvalidDimensions {
            rows: n_rows,
            cols: n_cols,
        }),
    }
}

/// One sheet's grid, layout and view state.
#[derive(Debug)]
pub struct SheetView {
    grid: Grid,
    sheet: SheetAttributes,
    client_row_sizes: SizeMap,
    layout: SheetLayout,
    viewport: Viewport,
    pane_cache: PaneCache,
    materializer: Materializer,
}

impl SheetView {
    /// Empty `n_rows x n_cols` sheet.
    ///
    /// # Errors
    /// Returns [`SheetGridError::Config`] for an invalid config and
    /// [`SheetGridError::InvalidDimensions`] if a dimension exceeds `u32`.
    pub fn new(sheet_id: SheetId, n_rows: usize, n_cols: usize, config: GridConfig) -> Result<Self> {
        config.validate()?;
        let (n_rows, n_cols) = dimensions(n_rows, n_cols)?;
        let sheet = SheetAttributes::default();
        let client_row_sizes = SizeMap::new();
        let layout = SheetLayout::new(n_rows, n_cols, &sheet, &client_row_sizes, &config);
        let mut viewport = Viewport::new();
        viewport.clamp_scroll(&layout);
        Ok(Self {
            grid: Grid::new(n_rows, n_cols),
            sheet,
            client_row_sizes,
            layout,
            viewport,
            pane_cache: PaneCache::new(),
            materializer: Materializer::new(sheet_id, config),
        })
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: Box<dyn OutputDecoder>) -> Self {
        self.materializer = self.materializer.with_decoder(decoder);
        self
    }

    #[must_use]
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.materializer = self.materializer.with_measurer(measurer);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn sheet(&self) -> &SheetAttributes {
        &self.sheet
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn client_row_sizes(&self) -> &SizeMap {
        &self.client_row_sizes
    }

    pub fn sheet_id(&self) -> SheetId {
        self.materializer.sheet_id()
    }

    pub fn config(&self) -> &GridConfig {
        self.materializer.config()
    }

    // =========================================================================
    // Cell updates
    // =========================================================================

    /// Materialize `batch` and swap in the resulting grid.
    ///
    /// # Errors
    /// If the batch is skipped as a whole the previous grid stays current and
    /// the error is returned.
    pub fn apply_batch(&mut self, batch: &[CellUpdate], full_update: bool) -> Result<BatchReport> {
        self.pane_cache.clear();
        let materialized = self
            .materializer
            .materialize(&self.grid, &self.sheet, batch, full_update)?;
        self.grid = materialized.grid;
        Ok(materialized.report)
    }

    /// [`apply_batch`](Self::apply_batch) for a JSON array of updates.
    ///
    /// Elements that do not decode are dropped like any other bad update;
    /// report indexes refer to positions in the JSON array.
    ///
    /// # Errors
    /// Returns [`SheetGridError::Json`] if the text is not a JSON array.
    pub fn apply_json(&mut self, json: &str, full_update: bool) -> Result<BatchReport> {
        let batch = parse_update_batch(json)?;
        let report = self.apply_batch(&batch.updates, full_update)?;
        Ok(batch.into_report(report))
    }

    /// Recompute overflow for every row without changing any cell.
    fn reflow(&mut self) -> Result<()> {
        self.apply_batch(&[], true).map(|_| ())
    }

    /// Resize the grid, dropping cells outside the new bounds.
    ///
    /// # Errors
    /// Returns [`SheetGridError::InvalidDimensions`] if a dimension exceeds `u32`.
    pub fn resize_grid(&mut self, n_rows: usize, n_cols: usize) -> Result<()> {
        let (n_rows, n_cols) = dimensions(n_rows, n_cols)?;
        self.grid = self.grid.resized(n_rows, n_cols);
        self.rebuild_layout();
        self.reflow()
    }

    // =========================================================================
    // Sheet attributes
    // =========================================================================

    fn rebuild_layout(&mut self) {
        self.layout = SheetLayout::new(
            self.grid.n_rows(),
            self.grid.n_cols(),
            &self.sheet,
            &self.client_row_sizes,
            self.materializer.config(),
        );
        self.viewport.clamp_scroll(&self.layout);
    }

    /// Replace the sheet attributes wholesale, e.g. from a server snapshot.
    ///
    /// # Errors
    /// Propagates a failed overflow pass.
    pub fn set_attributes(&mut self, sheet: SheetAttributes) -> Result<()> {
        self.sheet = sheet;
        let persisted: Vec<u32> = self.sheet.row_sizes.iter().map(|(i, _)| i).collect();
        for row in persisted {
            self.client_row_sizes.remove(row);
        }
        self.rebuild_layout();
        self.reflow()
    }

    pub fn hide_rows(&mut self, rows: &[u32]) {
        for &row in rows {
            self.sheet.hidden_rows.insert(row);
        }
        self.rebuild_layout();
    }

    pub fn unhide_rows(&mut self, rows: &[u32]) {
        for &row in rows {
            self.sheet.hidden_rows.remove(row);
        }
        self.rebuild_layout();
    }

    /// # Errors
    /// Propagates a failed overflow pass.
    pub fn hide_cols(&mut self, cols: &[u32]) -> Result<()> {
        for &col in cols {
            self.sheet.hidden_cols.insert(col);
        }
        self.rebuild_layout();
        self.reflow()
    }

    /// # Errors
    /// Propagates a failed overflow pass.
    pub fn unhide_cols(&mut self, cols: &[u32]) -> Result<()> {
        for &col in cols {
            self.sheet.hidden_cols.remove(col);
        }
        self.rebuild_layout();
        self.reflow()
    }

    /// Freeze the first `rows` rows and `cols` columns.
    ///
    /// # Errors
    /// Propagates a failed overflow pass.
    pub fn freeze(&mut self, rows: u32, cols: u32) -> Result<()> {
        let cols_changed = self.sheet.frozen_cols != cols;
        self.sheet.frozen_rows = rows;
        self.sheet.frozen_cols = cols;
        self.rebuild_layout();
        if cols_changed {
            self.reflow()?;
        }
        Ok(())
    }

    /// Persist a row height. `None` restores the default.
    pub fn resize_row(&mut self, row: u32, height: Option<f32>) {
        match height {
            Some(h) => {
                self.sheet.row_sizes.insert(row, h);
            }
            None => {
                self.sheet.row_sizes.remove(row);
            }
        }
        self.client_row_sizes.remove(row);
        self.rebuild_layout();
    }

    /// Persist a column width. `None` restores the default.
    ///
    /// # Errors
    /// Propagates a failed overflow pass.
    pub fn resize_col(&mut self, col: u32, width: Option<f32>) -> Result<()> {
        match width {
            Some(w) => {
                self.sheet.col_sizes.insert(col, w);
            }
            None => {
                self.sheet.col_sizes.remove(col);
            }
        }
        self.rebuild_layout();
        self.reflow()
    }

    /// Record autosized row heights that the server has not confirmed yet.
    ///
    /// Rows that already have a persisted height are ignored.
    pub fn set_client_row_sizes(&mut self, sizes: &SizeMap) {
        for (row, height) in sizes.iter() {
            if !self.sheet.row_sizes.contains(row) {
                self.client_row_sizes.insert(row, height);
            }
        }
        self.rebuild_layout();
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32) {
        self.viewport.scroll_by(delta_x, delta_y, &self.layout);
    }

    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.viewport.set_scroll(x, y, &self.layout);
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
        self.viewport.clamp_scroll(&self.layout);
    }

    /// Four-pane partition of the current viewport.
    pub fn panes(&mut self) -> PaneSet<'_> {
        partition_panes(&self.grid, &self.layout, &self.viewport, &mut self.pane_cache)
    }

    /// Cell under a screen point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<GridLocation> {
        layout::hit_test(&self.layout, &self.viewport, x, y)
    }

    pub fn visible_row(&self, row: u32) -> u32 {
        layout::global_to_visible(row, &self.sheet.hidden_rows, Some(self.grid.n_rows()))
    }

    pub fn visible_col(&self, col: u32) -> u32 {
        layout::global_to_visible(col, &self.sheet.hidden_cols, Some(self.grid.n_cols()))
    }

    pub fn global_row(&self, visible_row: u32) -> u32 {
        layout::visible_to_global(visible_row, &self.sheet.hidden_rows)
    }

    pub fn global_col(&self, visible_col: u32) -> u32 {
        layout::visible_to_global(visible_col, &self.sheet.hidden_cols)
    }

    // =========================================================================
    // Selection and navigation
    // =========================================================================

    pub fn expand_selection(&self, selection: SheetSelection) -> SheetSelection {
        selection::expand_to_merged_cells(selection, &self.grid)
    }

    pub fn navigate(&self, from: GridLocation, direction: Direction) -> GridLocation {
        navigation::move_active_cell(&self.grid, &self.sheet, from, direction)
    }

    pub fn extend_selection(&self, selection: SheetSelection, direction: Direction) -> SheetSelection {
        navigation::extend_selection(selection, &self.grid, &self.sheet, direction)
    }

    pub fn jump(&self, from: GridLocation, direction: Direction) -> GridLocation {
        navigation::find_data_boundary(&self.grid, &self.sheet, from, direction)
    }
}
