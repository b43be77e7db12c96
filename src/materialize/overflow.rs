//! Overflow spanning.
//!
//! Text in an overflow-mode cell that is wider than its column spills into
//! the empty cells to its right. The origin records how many trailing
//! columns it covers; each covered cell records the origin's column.
//!
//! A span is trimmed, in order, at the grid's last column, at the frozen
//! boundary when the origin sits inside the frozen columns, and at the
//! first neighbor holding a value or belonging to a merge.

use crate::config::GridConfig;
use crate::grid::Grid;
use crate::layout::AxisSizes;
use crate::measure::{FontDescriptor, TextMeasurer};
use crate::types::{Cell, SheetAttributes, WrapMode};

/// Inputs shared by every row of an overflow pass.
pub struct OverflowContext<'a> {
    pub sheet: &'a SheetAttributes,
    pub config: &'a GridConfig,
}

impl OverflowContext<'_> {
    fn col_sizes(&self) -> AxisSizes<'_> {
        AxisSizes::new(
            &self.sheet.col_sizes,
            self.config.default_col_width,
            &self.sheet.hidden_cols,
        )
    }
}

/// Overflow annotations planned for one row, indexed by column.
#[derive(Debug, Clone, PartialEq, Default)]
struct RowPlan {
    spans: Vec<Option<u32>>,
    from: Vec<Option<u32>>,
}

fn is_origin_candidate(cell: &Cell, col: u32, sheet: &SheetAttributes) -> bool {
    cell.attributes.wrap_mode() == WrapMode::Overflow
        && !sheet.is_col_hidden(col)
        && cell.has_value()
        && !cell.is_merged()
}

fn blocks_overflow(cell: &Cell) -> bool {
    cell.has_value() || cell.is_merged()
}

/// Largest span the grid edge and the frozen boundary allow for an origin.
fn span_limit(col: u32, n_cols: u32, frozen_cols: u32) -> u32 {
    let to_edge = n_cols.saturating_sub(1).saturating_sub(col);
    if col < frozen_cols {
        to_edge.min(frozen_cols - 1 - col)
    } else {
        to_edge
    }
}

fn plan_row(
    cells: &[Cell],
    ctx: &OverflowContext<'_>,
    measurer: &mut dyn TextMeasurer,
) -> RowPlan {
    let n_cols = u32::try_from(cells.len()).unwrap_or(u32::MAX);
    let frozen_cols = ctx.sheet.frozen_cols.min(n_cols);
    let sizes = ctx.col_sizes();
    let mut plan = RowPlan {
        spans: vec![None; cells.len()],
        from: vec![None; cells.len()],
    };

    for (col, cell) in (0..n_cols).zip(cells) {
        if !is_origin_candidate(cell, col, ctx.sheet) {
            continue;
        }
        let limit = span_limit(col, n_cols, frozen_cols);
        if limit == 0 {
            continue;
        }

        let font = FontDescriptor::from_attributes(&cell.attributes, ctx.config);
        let preview: String = cell
            .display_text()
            .chars()
            .take(ctx.config.overflow_preview_chars)
            .collect();
        let width = measurer.measure(&font, &preview) + ctx.config.cell_padding;
        let mut remaining = width - sizes.visible_size(col);

        let mut span = 0u32;
        while remaining > 0.0 && span < limit {
            let next = col + span + 1;
            match cells.get(next as usize) {
                Some(neighbor) if !blocks_overflow(neighbor) => {}
                _ => break,
            }
            remaining -= sizes.visible_size(next);
            span += 1;
        }
        if span == 0 {
            continue;
        }

        log::trace!("overflow at col {col} spans {span} columns");
        if let Some(slot) = plan.spans.get_mut(col as usize) {
            *slot = Some(span);
        }
        for consumed in col + 1..=col + span {
            if let Some(slot) = plan.from.get_mut(consumed as usize) {
                *slot = Some(col);
            }
        }
    }
    plan
}

fn row_matches(cells: &[Cell], plan: &RowPlan) -> bool {
    cells
        .iter()
        .zip(plan.spans.iter().zip(&plan.from))
        .all(|(cell, (span, from))| cell.overflow_col_span == *span && cell.overflow_from_col == *from)
}

/// Recompute overflow annotations for `rows`.
///
/// Every annotation in a scoped row is recomputed from scratch, so stale
/// spans and back-references disappear. Rows whose annotations come out
/// unchanged are left untouched (not copied). Returns the rows rewritten.
pub fn span_overflow(
    grid: &mut Grid,
    rows: &[u32],
    ctx: &OverflowContext<'_>,
    measurer: &mut dyn TextMeasurer,
) -> Vec<u32> {
    let mut rewritten = Vec::new();
    for &row in rows {
        let Some(cells) = grid.row(row) else {
            continue;
        };
        let plan = plan_row(cells, ctx, measurer);
        if row_matches(cells, &plan) {
            continue;
        }
        let Some(cells) = grid.row_mut(row) else {
            continue;
        };
        for (cell, (span, from)) in cells.iter_mut().zip(plan.spans.into_iter().zip(plan.from)) {
            cell.overflow_col_span = span;
            cell.overflow_from_col = from;
        }
        rewritten.push(row);
    }
    rewritten
}
