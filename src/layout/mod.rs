//! Coordinate mapping, size resolution and viewport management.
//!
//! This module handles:
//! - Global <-> visible index mapping around hidden rows/columns
//! - Resolving row/column sizes from sparse maps
//! - Pre-computing cell positions for O(log n) hit testing
//! - Viewport state (scroll position, visible range)

mod index_map;
mod sheet_layout;
mod sizes;
mod viewport;

pub use index_map::{
    get_offset_by_position, global_to_visible, nearest_visible, visible_count, visible_to_global,
};
pub use sheet_layout::{CellRect, SheetLayout};
pub use sizes::{resolve_size, AxisSizes, SizeMap};
pub use viewport::{hit_test, Viewport};
