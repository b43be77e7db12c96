//! Grid materialization.
//!
//! Folds a batch of sparse [`CellUpdate`]s into a new [`Grid`]. The previous
//! grid is never modified: the batch works on a copy-on-write clone, so rows
//! the batch does not touch stay shared with the previous grid.
//!
//! A pass runs in this order:
//! 1. filter and decode each update, merging derived attributes
//! 2. normalize its merge span and border ownership, taking back edges
//!    the cell no longer declares
//! 3. write the cell
//! 4. apply queued neighbor borders, then assign merge back-references
//! 5. recompute overflow for the touched rows (or all rows on a full update)

pub mod batch;
pub mod borders;
pub mod decode;
pub mod merge;
pub mod overflow;

use std::collections::BTreeSet;

pub use batch::{parse_update_batch, ParsedBatch};
pub use borders::{normalize_borders, retract_borders, PendingBorders};
pub use decode::{DecodedOutput, JsonOutputDecoder, OutputDecoder};
pub use merge::{assign_merges, clamp_span, dissolve_merge, normalize_span};
pub use overflow::{span_overflow, OverflowContext};

use crate::config::GridConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::measure::{CachedMeasurer, MonospaceMeasurer, TextMeasurer};
use crate::types::{
    Cell, CellAddress, CellAttributes, CellUpdate, GridLocation, SheetAttributes, SheetId,
};

/// Why an update was left out of a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DropReason {
    #[error("update has no address")]
    MissingAddress,
    #[error("update addresses sheet {0}")]
    OtherSheet(SheetId),
    #[error("address is outside the grid")]
    OutOfRange,
    #[error("undecodable update: {0}")]
    Decode(String),
}

/// One update that was not applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedUpdate {
    /// Position of the update in the batch
    pub index: usize,
    pub address: Option<CellAddress>,
    pub reason: DropReason,
}

/// What a materialization pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Number of updates written
    pub applied: usize,
    pub dropped: Vec<DroppedUpdate>,
    /// Rows written by cell writes, border moves and merge changes, ascending
    pub touched_rows: Vec<u32>,
}

/// Output of [`Materializer::materialize`].
#[derive(Debug, Clone)]
pub struct Materialized {
    pub grid: Grid,
    pub report: BatchReport,
}

struct PreparedUpdate {
    location: GridLocation,
    cell: Cell,
    span: Option<(u32, u32)>,
}

/// Folds update batches into grids for one sheet.
pub struct Materializer {
    sheet_id: SheetId,
    config: GridConfig,
    decoder: Box<dyn OutputDecoder>,
    measurer: Box<dyn TextMeasurer>,
}

impl Materializer {
    /// Materializer for `sheet_id` with the JSON decoder and a cached
    /// monospace measurer.
    pub fn new(sheet_id: SheetId, config: GridConfig) -> Self {
        let measurer = CachedMeasurer::new(MonospaceMeasurer::default(), config.measure_cache_capacity);
        Self {
            sheet_id,
            config,
            decoder: Box::new(JsonOutputDecoder),
            measurer: Box::new(measurer),
        }
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: Box<dyn OutputDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Use a host measurer, wrapped in the width cache.
    #[must_use]
    pub fn with_measurer(mut self, measurer: Box<dyn TextMeasurer>) -> Self {
        self.measurer = Box::new(CachedMeasurer::new(
            measurer,
            self.config.measure_cache_capacity,
        ));
        self
    }

    pub fn sheet_id(&self) -> SheetId {
        self.sheet_id
    }

    pub fn set_sheet_id(&mut self, sheet_id: SheetId) {
        self.sheet_id = sheet_id;
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Fold `batch` into a copy of `prev`.
    ///
    /// Updates that are unaddressed, for another sheet, out of range or
    /// undecodable are dropped and reported; the rest of the batch still
    /// applies. With `full_update` every row's overflow is recomputed, not
    /// just the touched ones.
    ///
    /// # Errors
    /// Returns [`SheetGridError::GridShape`](crate::SheetGridError::GridShape)
    /// if `prev` has a ragged row. Nothing is applied in that case.
    pub fn materialize(
        &mut self,
        prev: &Grid,
        sheet: &SheetAttributes,
        batch: &[CellUpdate],
        full_update: bool,
    ) -> Result<Materialized> {
        if let Err(e) = prev.check_shape() {
            log::warn!("skipping batch of {} updates: {e}", batch.len());
            return Err(e);
        }

        let n_rows = prev.n_rows();
        let n_cols = prev.n_cols();
        let mut grid = prev.clone();
        let mut report = BatchReport::default();
        let mut touched = BTreeSet::new();
        let mut pending = PendingBorders::new();
        let mut roots = Vec::new();

        for (index, update) in batch.iter().enumerate() {
            let PreparedUpdate {
                location,
                mut cell,
                span,
            } = match self.prepare(update, n_rows, n_cols) {
                Ok(prepared) => prepared,
                Err(reason) => {
                    log::debug!("dropping update {index}: {reason}");
                    report.dropped.push(DroppedUpdate {
                        index,
                        address: update.address,
                        reason,
                    });
                    continue;
                }
            };

            let (row_span, col_span) = span.unwrap_or((1, 1));
            // a member's edges belong to its root
            let covered = span.is_none()
                && grid.get(location).and_then(Cell::merged_into).is_some()
                && grid.merge_bounds(location).is_some();
            if !covered {
                retract_borders(
                    cell.attributes.borders,
                    location,
                    row_span,
                    col_span,
                    n_rows,
                    n_cols,
                    &mut pending,
                );
            }
            normalize_borders(
                &mut cell.attributes.borders,
                location,
                row_span,
                col_span,
                sheet,
                n_rows,
                n_cols,
                &mut pending,
            );
            touched.extend(merge::write_cell(&mut grid, location, cell, span));
            if let Some((row_span, col_span)) = span {
                roots.push((location, row_span, col_span));
            }
            report.applied += 1;
        }

        touched.extend(pending.apply(&mut grid));
        touched.extend(assign_merges(&mut grid, &roots));

        let scope: Vec<u32> = if full_update {
            (0..n_rows).collect()
        } else {
            touched.iter().copied().collect()
        };
        let ctx = OverflowContext {
            sheet,
            config: &self.config,
        };
        span_overflow(&mut grid, &scope, &ctx, self.measurer.as_mut());

        report.touched_rows = touched.into_iter().collect();
        Ok(Materialized { grid, report })
    }

    fn prepare(
        &self,
        update: &CellUpdate,
        n_rows: u32,
        n_cols: u32,
    ) -> std::result::Result<PreparedUpdate, DropReason> {
        let address = update.address.ok_or(DropReason::MissingAddress)?;
        if address.sheet_id != self.sheet_id {
            return Err(DropReason::OtherSheet(address.sheet_id));
        }
        let location = address.to_location();
        if location.row >= n_rows || location.col >= n_cols {
            return Err(DropReason::OutOfRange);
        }

        let mut attributes = CellAttributes::from_value(&update.attributes)
            .map_err(|e| DropReason::Decode(e.to_string()))?;
        let decoded = self
            .decoder
            .decode(&update.outputs)
            .map_err(|e| DropReason::Decode(e.to_string()))?;
        attributes.merge_derived(decoded.added_attributes);
        for (key, value) in decoded.added_fields {
            attributes.extra.entry(key).or_insert(value);
        }

        let span = normalize_span(attributes.row_span.take(), attributes.col_span.take())
            .and_then(|span| clamp_span(location, span, n_rows, n_cols));

        Ok(PreparedUpdate {
            location,
            cell: Cell {
                value: decoded.value,
                expression: update.code.clone(),
                attributes,
                viewer: decoded.viewer,
                ..Cell::default()
            },
            span,
        })
    }
}

impl std::fmt::Debug for Materializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Materializer")
            .field("sheet_id", &self.sheet_id)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
