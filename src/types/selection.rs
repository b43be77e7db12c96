use serde::{Deserialize, Serialize};

use super::GridLocation;

/// Cardinal direction for keyboard navigation and selection extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// True for left/right.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when moving towards higher indices.
    pub fn is_forward(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

/// Rectangular selection defined by two corners in global coordinates.
///
/// `start` is the anchor and `end` the moving corner. The corners are not
/// ordered; use [`SheetSelection::bounds`] before any rectangle math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetSelection {
    pub start: GridLocation,
    pub end: GridLocation,
}

impl SheetSelection {
    pub fn new(start: GridLocation, end: GridLocation) -> Self {
        Self { start, end }
    }

    /// Single-cell selection
    pub fn cell(location: GridLocation) -> Self {
        Self {
            start: location,
            end: location,
        }
    }

    /// Get normalized bounds (min/max)
    pub fn bounds(&self) -> SelectionBounds {
        SelectionBounds {
            top: self.start.row.min(self.end.row),
            left: self.start.col.min(self.end.col),
            bottom: self.start.row.max(self.end.row),
            right: self.start.col.max(self.end.col),
        }
    }

    /// Selection with `start` at the top-left and `end` at the bottom-right.
    #[must_use]
    pub fn normalized(&self) -> Self {
        self.bounds().to_selection()
    }

    pub fn contains(&self, location: GridLocation) -> bool {
        self.bounds().contains(location)
    }
}

/// Normalized, inclusive rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionBounds {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl SelectionBounds {
    pub fn contains(&self, location: GridLocation) -> bool {
        (self.top..=self.bottom).contains(&location.row)
            && (self.left..=self.right).contains(&location.col)
    }

    pub fn intersects(&self, other: &SelectionBounds) -> bool {
        self.top <= other.bottom
            && other.top <= self.bottom
            && self.left <= other.right
            && other.left <= self.right
    }

    /// True when `other` lies entirely inside this rectangle.
    pub fn contains_bounds(&self, other: &SelectionBounds) -> bool {
        self.top <= other.top
            && self.left <= other.left
            && self.bottom >= other.bottom
            && self.right >= other.right
    }

    /// Smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &SelectionBounds) -> SelectionBounds {
        SelectionBounds {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            bottom: self.bottom.max(other.bottom),
            right: self.right.max(other.right),
        }
    }

    pub fn to_selection(self) -> SheetSelection {
        SheetSelection {
            start: GridLocation::new(self.top, self.left),
            end: GridLocation::new(self.bottom, self.right),
        }
    }
}
