//! Utilities for A1-style cell references.
//!
//! Used for display and diagnostics only; the update stream always carries
//! numeric addresses.

/// Column label for a 0-indexed column: 0 -> "A", 25 -> "Z", 26 -> "AA".
pub fn column_label(col: u32) -> String {
    let mut n = u64::from(col) + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        // rem < 26, fits in u8
        label.push(b'A' + u8::try_from(rem).unwrap_or(0));
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Format a 0-indexed `(row, col)` as "A1".
pub fn format_cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", column_label(col), u64::from(row) + 1)
}
