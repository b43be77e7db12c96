//! Viewport state management for scrolling, zoom and hit testing.

use super::SheetLayout;
use crate::types::GridLocation;

/// Viewport state - represents the visible area of the spreadsheet
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Horizontal scroll position in sheet coordinates
    pub scroll_x: f32,
    /// Vertical scroll position in sheet coordinates
    pub scroll_y: f32,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
    /// Zoom scale factor (1.0 = 100%)
    pub scale: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 800.0,
            height: 600.0,
            scale: 1.0,
        }
    }

    /// Get visible scrollable row range (inclusive) based on current scroll position.
    ///
    /// Returns `None` when the sheet has no rows.
    pub fn visible_rows(&self, layout: &SheetLayout) -> Option<(u32, u32)> {
        let last = layout.n_rows.checked_sub(1)?;
        let frozen_height = layout.frozen_rows_height();
        let scrollable_height = (self.height / self.scale - frozen_height).max(0.0);

        let start_y = self.scroll_y.max(frozen_height);
        let start = layout.row_at_y(start_y).unwrap_or(last);
        let end = layout
            .row_at_y(start_y + scrollable_height)
            .unwrap_or(last);
        Some((start.max(layout.frozen_rows).min(last), end.min(last)))
    }

    /// Get visible scrollable column range (inclusive) based on current scroll position.
    ///
    /// Returns `None` when the sheet has no columns.
    pub fn visible_cols(&self, layout: &SheetLayout) -> Option<(u32, u32)> {
        let last = layout.n_cols.checked_sub(1)?;
        let frozen_width = layout.frozen_cols_width();
        let scrollable_width = (self.width / self.scale - frozen_width).max(0.0);

        let start_x = self.scroll_x.max(frozen_width);
        let start = layout.col_at_x(start_x).unwrap_or(last);
        let end = layout.col_at_x(start_x + scrollable_width).unwrap_or(last);
        Some((start.max(layout.frozen_cols).min(last), end.min(last)))
    }

    /// Clamp scroll position to valid range.
    ///
    /// For frozen panes, scroll positions are relative to the frozen region:
    /// scroll_x starts at the frozen column boundary, scroll_y at the frozen
    /// row boundary.
    pub fn clamp_scroll(&mut self, layout: &SheetLayout) {
        let frozen_width = layout.frozen_cols_width();
        let frozen_height = layout.frozen_rows_height();

        let scrollable_width = layout.total_width() - frozen_width;
        let scrollable_height = layout.total_height() - frozen_height;
        let viewport_content_width = self.width / self.scale - frozen_width;
        let viewport_content_height = self.height / self.scale - frozen_height;

        let max_x = frozen_width + (scrollable_width - viewport_content_width).max(0.0);
        let max_y = frozen_height + (scrollable_height - viewport_content_height).max(0.0);

        self.scroll_x = self.scroll_x.clamp(frozen_width, max_x);
        self.scroll_y = self.scroll_y.clamp(frozen_height, max_y);
    }

    /// Scroll by delta amounts
    pub fn scroll_by(&mut self, delta_x: f32, delta_y: f32, layout: &SheetLayout) {
        self.scroll_x += delta_x;
        self.scroll_y += delta_y;
        self.clamp_scroll(layout);
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f32, y: f32, layout: &SheetLayout) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.clamp_scroll(layout);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

/// Find the cell under a screen point.
///
/// Points inside the frozen band resolve against the unscrolled layout;
/// everything else is offset by the scroll position.
pub fn hit_test(layout: &SheetLayout, viewport: &Viewport, x: f32, y: f32) -> Option<GridLocation> {
    let content_x = x / viewport.scale;
    let content_y = y / viewport.scale;
    let frozen_width = layout.frozen_cols_width();
    let frozen_height = layout.frozen_rows_height();

    let col = if content_x < frozen_width {
        layout.col_at_x(content_x)
    } else {
        layout.col_at_x(content_x - frozen_width + viewport.scroll_x)
    };
    let row = if content_y < frozen_height {
        layout.row_at_y(content_y)
    } else {
        layout.row_at_y(content_y - frozen_height + viewport.scroll_y)
    };

    match (row, col) {
        (Some(row), Some(col)) => Some(GridLocation::new(row, col)),
        _ => None,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::layout::SizeMap;
    use crate::types::SheetAttributes;

    fn frozen_layout(frozen_rows: u32, frozen_cols: u32) -> SheetLayout {
        let sheet = SheetAttributes {
            frozen_rows,
            frozen_cols,
            ..SheetAttributes::default()
        };
        SheetLayout::new(1000, 100, &sheet, &SizeMap::new(), &GridConfig::default())
    }

    #[test]
    fn test_visible_rows_at_origin() {
        let layout = frozen_layout(0, 0);
        let viewport = Viewport::new();
        let (start, end) = viewport.visible_rows(&layout).unwrap();
        assert_eq!(start, 0);
        // 600px / 21px per row
        assert_eq!(end, 28);
    }

    #[test]
    fn test_visible_rows_start_after_frozen() {
        let layout = frozen_layout(3, 0);
        let mut viewport = Viewport::new();
        viewport.clamp_scroll(&layout);
        assert_eq!(viewport.scroll_y, layout.frozen_rows_height());
        let (start, _) = viewport.visible_rows(&layout).unwrap();
        assert_eq!(start, 3);
    }

    #[test]
    fn test_clamp_scroll_max() {
        let layout = frozen_layout(0, 0);
        let mut viewport = Viewport::new();
        viewport.set_scroll(1.0e9, 1.0e9, &layout);
        assert_eq!(viewport.scroll_x, layout.total_width() - viewport.width);
        assert_eq!(viewport.scroll_y, layout.total_height() - viewport.height);
    }

    #[test]
    fn test_hit_test_frozen_and_scrolled() {
        let layout = frozen_layout(1, 1);
        let mut viewport = Viewport::new();
        viewport.set_scroll(
            layout.frozen_cols_width() + 65.0 * 10.0,
            layout.frozen_rows_height() + 21.0 * 20.0,
            &layout,
        );

        // Frozen corner ignores scroll
        assert_eq!(hit_test(&layout, &viewport, 5.0, 5.0), Some(GridLocation::new(0, 0)));
        // Just past the frozen band: first scrolled-in cell
        assert_eq!(
            hit_test(&layout, &viewport, 66.0, 22.0),
            Some(GridLocation::new(21, 11))
        );
        // Frozen column, scrolled row
        assert_eq!(
            hit_test(&layout, &viewport, 5.0, 22.0),
            Some(GridLocation::new(21, 0))
        );
    }

    #[test]
    fn test_empty_layout_has_no_visible_range() {
        let layout = SheetLayout::new(
            0,
            0,
            &SheetAttributes::default(),
            &SizeMap::new(),
            &GridConfig::default(),
        );
        assert!(Viewport::new().visible_rows(&layout).is_none());
        assert!(Viewport::new().visible_cols(&layout).is_none());
    }
}
