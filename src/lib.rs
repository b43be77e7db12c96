//! sheetgrid - layout and materialization engine for spreadsheet grids
//!
//! Folds a sparse stream of cell updates into a dense grid model and keeps
//! the facts a windowed renderer needs:
//! - Global <-> visible index mapping around hidden rows/columns
//! - Row/column size resolution and pixel layout with frozen panes
//! - Merge roots and back-references, kept disjoint
//! - Border ownership between neighboring cells
//! - Text overflow into empty neighbors
//! - Merge-aware selection expansion and keyboard navigation
//! - A four-pane partition of the visible window
//!
//! # Usage
//!
//! ```
//! use sheetgrid::{CellAddress, CellUpdate, GridConfig, GridLocation, SheetView};
//! use serde_json::json;
//!
//! let mut view = SheetView::new(0, 100, 26, GridConfig::default())?;
//! let report = view.apply_batch(
//!     &[CellUpdate::new(CellAddress::new(0, 0, 0))
//!         .with_outputs(json!("Quarterly totals"))
//!         .with_attributes(json!({ "colSpan": 3 }))],
//!     false,
//! )?;
//! assert_eq!(report.applied, 1);
//! let root = view.grid().get(GridLocation::new(0, 0)).map(|c| c.col_span());
//! assert_eq!(root, Some(Some(3)));
//! # Ok::<(), sheetgrid::SheetGridError>(())
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod materialize;
pub mod measure;
pub mod navigation;
pub mod panes;
pub mod selection;
pub mod types;
pub mod view;

pub use config::GridConfig;
pub use error::{Result, SheetGridError};
pub use grid::Grid;
pub use layout::{SheetLayout, Viewport};
pub use materialize::{
    parse_update_batch, BatchReport, DropReason, DroppedUpdate, Materialized, Materializer,
    ParsedBatch,
};
pub use panes::{pane_kind, partition_panes, Pane, PaneCache, PaneKind, PaneSet};
pub use selection::{
    expand_to_merged_cells, expand_to_merged_cells_in_direction, get_root_cell_coords,
};
pub use types::*;
pub use view::SheetView;
