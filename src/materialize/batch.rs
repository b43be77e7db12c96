//! JSON update batches.
//!
//! A batch is decoded element by element: an element that does not decode
//! into a [`CellUpdate`] is dropped and reported like any other bad update,
//! and the rest of the batch still applies.

use serde::Deserialize;
use serde_json::Value;

use super::{BatchReport, DropReason, DroppedUpdate};
use crate::error::Result;
use crate::types::{CellAddress, CellUpdate};

/// A decoded batch: the updates that parsed, and the elements that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBatch {
    pub updates: Vec<CellUpdate>,
    /// Index in the original array of each entry of `updates`
    positions: Vec<usize>,
    pub rejected: Vec<DroppedUpdate>,
}

impl ParsedBatch {
    /// Fold a report for [`updates`](Self::updates) back onto the original
    /// array: drop indexes are remapped and rejected elements merged in,
    /// ordered by index.
    pub fn into_report(self, mut report: BatchReport) -> BatchReport {
        for dropped in &mut report.dropped {
            if let Some(&position) = self.positions.get(dropped.index) {
                dropped.index = position;
            }
        }
        report.dropped.extend(self.rejected);
        report.dropped.sort_by_key(|d| d.index);
        report
    }
}

/// Why an element could not be read as an update.
fn rejection(element: &Value, error: &serde_json::Error) -> DropReason {
    let Some(address) = element.get("address").filter(|a| !a.is_null()) else {
        return DropReason::Decode(error.to_string());
    };
    if CellAddress::deserialize(address).is_ok() {
        return DropReason::Decode(error.to_string());
    }
    // integral but not a u32
    let out_of_range = |key: &str| {
        address.get(key).is_some_and(|v| {
            (v.is_i64() || v.is_u64()) && v.as_u64().and_then(|n| u32::try_from(n).ok()).is_none()
        })
    };
    if out_of_range("col") || out_of_range("row") {
        DropReason::OutOfRange
    } else {
        DropReason::Decode(error.to_string())
    }
}

/// Parse a JSON array of updates.
///
/// # Errors
/// Returns [`SheetGridError::Json`](crate::SheetGridError::Json) if the text
/// is not a JSON array. Elements that fail to decode are not errors; they
/// land in [`ParsedBatch::rejected`].
pub fn parse_update_batch(json: &str) -> Result<ParsedBatch> {
    let elements: Vec<Value> = serde_json::from_str(json)?;
    let mut batch = ParsedBatch::default();
    for (index, element) in elements.iter().enumerate() {
        match CellUpdate::deserialize(element) {
            Ok(update) => {
                batch.updates.push(update);
                batch.positions.push(index);
            }
            Err(e) => {
                let reason = rejection(element, &e);
                log::debug!("dropping update {index}: {reason}");
                batch.rejected.push(DroppedUpdate {
                    index,
                    address: None,
                    reason,
                });
            }
        }
    }
    Ok(batch)
}
