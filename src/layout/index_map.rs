//! Global <-> visible index mapping.
//!
//! A *global* index counts every row (or column), hidden or not. A *visible*
//! index counts only the ones on screen. Hit testing and windowed rendering
//! work in visible space; the grid is addressed in global space.

use super::AxisSizes;
use crate::config::GRIDLINE_WIDTH;
use crate::types::HiddenIndices;

fn hidden_len(hidden: &HiddenIndices) -> u32 {
    u32::try_from(hidden.len()).unwrap_or(u32::MAX)
}

/// Visible position of `global_index`.
///
/// Subtracts the number of hidden indices strictly below it. A hidden index
/// still maps to the position it would occupy if shown; check membership
/// separately when that matters.
///
/// When `bound` is given and lies below `global_index`, the index is past the
/// known range and the result is `bound - hidden.len()` instead.
pub fn global_to_visible(global_index: u32, hidden: &HiddenIndices, bound: Option<u32>) -> u32 {
    if let Some(bound) = bound {
        if bound < global_index {
            return bound.saturating_sub(hidden_len(hidden));
        }
    }
    let below = u32::try_from(hidden.count_below(global_index)).unwrap_or(u32::MAX);
    global_index.saturating_sub(below)
}

/// Global index of the `visible_index`-th visible position.
///
/// Walks the sorted hidden set, bumping the candidate once for every hidden
/// index at or below it. Past the end of the sheet this extrapolates rather
/// than failing.
pub fn visible_to_global(visible_index: u32, hidden: &HiddenIndices) -> u32 {
    let mut global = visible_index;
    for h in hidden.iter() {
        if h <= global {
            global = global.saturating_add(1);
        } else {
            break;
        }
    }
    global
}

/// Pixel offset of the leading edge of `position`.
///
/// Sums the size of every visible index before `position`, plus one
/// separator per boundary. Hidden indices contribute nothing.
pub fn get_offset_by_position(position: u32, sizes: &AxisSizes<'_>) -> f32 {
    let mut offset = 0.0;
    for index in 0..position {
        if sizes.hidden.contains(index) {
            continue;
        }
        offset += sizes.resolve(index) + GRIDLINE_WIDTH;
    }
    offset
}

/// Number of visible indices among the first `total`.
pub fn visible_count(total: u32, hidden: &HiddenIndices) -> u32 {
    let below = u32::try_from(hidden.count_below(total)).unwrap_or(u32::MAX);
    total.saturating_sub(below)
}

/// Nearest visible index at or after `index` (forward) or at or before it,
/// within `0..total`. `None` if every candidate in that direction is hidden.
pub fn nearest_visible(index: u32, hidden: &HiddenIndices, total: u32, forward: bool) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let mut i = index.min(total - 1);
    loop {
        if !hidden.contains(i) {
            return Some(i);
        }
        if forward {
            i += 1;
            if i >= total {
                return None;
            }
        } else {
            i = i.checked_sub(1)?;
        }
    }
}
