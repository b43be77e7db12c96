//! Row/column size resolution.
//!
//! Sizes are stored sparsely; anything not in the map falls back to the axis
//! default. Lookups never insert.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::HiddenIndices;

/// Sparse index -> pixel size map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SizeMap(BTreeMap<u32, f32>);

impl SizeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: u32) -> Option<f32> {
        self.0.get(&index).copied()
    }

    pub fn insert(&mut self, index: u32, size: f32) -> Option<f32> {
        self.0.insert(index, size)
    }

    pub fn remove(&mut self, index: u32) -> Option<f32> {
        self.0.remove(&index)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0.contains_key(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.0.iter().map(|(&i, &s)| (i, s))
    }
}

impl FromIterator<(u32, f32)> for SizeMap {
    fn from_iter<I: IntoIterator<Item = (u32, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Size at `index`, or `default_size` when the map has no entry.
pub fn resolve_size(index: u32, sizes: &SizeMap, default_size: f32) -> f32 {
    sizes.get(index).unwrap_or(default_size)
}

/// Size resolver for one axis.
///
/// Precedence is persisted size, then the transient client override (set
/// while an autosize is waiting for the server), then the default.
#[derive(Debug, Clone, Copy)]
pub struct AxisSizes<'a> {
    pub persisted: &'a SizeMap,
    pub client_override: Option<&'a SizeMap>,
    pub default_size: f32,
    pub hidden: &'a HiddenIndices,
}

impl<'a> AxisSizes<'a> {
    pub fn new(persisted: &'a SizeMap, default_size: f32, hidden: &'a HiddenIndices) -> Self {
        Self {
            persisted,
            client_override: None,
            default_size,
            hidden,
        }
    }

    #[must_use]
    pub fn with_client_override(mut self, client_override: &'a SizeMap) -> Self {
        self.client_override = Some(client_override);
        self
    }

    /// Declared size, ignoring hidden state.
    pub fn resolve(&self, index: u32) -> f32 {
        self.persisted
            .get(index)
            .or_else(|| self.client_override.and_then(|c| c.get(index)))
            .unwrap_or(self.default_size)
    }

    /// Rendered size: 0 for hidden indices.
    pub fn visible_size(&self, index: u32) -> f32 {
        if self.hidden.contains(index) {
            0.0
        } else {
            self.resolve(index)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_size_fallback() {
        let sizes: SizeMap = [(2, 40.0)].into_iter().collect();
        assert_eq!(resolve_size(2, &sizes, 20.0), 40.0);
        assert_eq!(resolve_size(3, &sizes, 20.0), 20.0);
        // lookups do not populate the map
        assert_eq!(sizes.len(), 1);
    }

    #[test]
    fn test_client_override_precedence() {
        let persisted: SizeMap = [(1, 30.0)].into_iter().collect();
        let client: SizeMap = [(1, 50.0), (2, 45.0)].into_iter().collect();
        let hidden = HiddenIndices::from(vec![3]);
        let sizes = AxisSizes::new(&persisted, 20.0, &hidden).with_client_override(&client);

        assert_eq!(sizes.resolve(1), 30.0);
        assert_eq!(sizes.resolve(2), 45.0);
        assert_eq!(sizes.resolve(4), 20.0);
        assert_eq!(sizes.resolve(3), 20.0);
        assert_eq!(sizes.visible_size(3), 0.0);
    }
}
