//! Text measurement surface.
//!
//! The overflow spanner needs rendered text widths but has no font
//! rasterizer of its own. Hosts plug one in through [`TextMeasurer`];
//! [`CachedMeasurer`] memoizes results with an insertion-order LRU, since the
//! same strings are measured on every batch that touches their row.

use std::collections::{HashMap, VecDeque};

use crate::config::GridConfig;
use crate::types::CellAttributes;

/// Font used to render a cell's text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    /// Size in pixels
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl FontDescriptor {
    /// Font for a cell, falling back to the configured defaults.
    pub fn from_attributes(attributes: &CellAttributes, config: &GridConfig) -> Self {
        Self {
            family: attributes
                .font_family
                .clone()
                .unwrap_or_else(|| config.default_font_family.clone()),
            size: attributes.font_size.unwrap_or(config.default_font_size),
            bold: attributes.bold.unwrap_or(false),
            italic: attributes.italic.unwrap_or(false),
        }
    }

    /// CSS font shorthand, e.g. `"italic bold 11px Arial"`.
    pub fn css(&self) -> String {
        let mut s = String::new();
        if self.italic {
            s.push_str("italic ");
        }
        if self.bold {
            s.push_str("bold ");
        }
        s.push_str(&format!("{}px {}", self.size, self.family));
        s
    }
}

/// Returns the rendered width of `text` in pixels.
pub trait TextMeasurer {
    fn measure(&mut self, font: &FontDescriptor, text: &str) -> f32;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&mut self, font: &FontDescriptor, text: &str) -> f32 {
        (**self).measure(font, text)
    }
}

/// Fixed-advance measurer: every character is `size * advance` wide.
///
/// Deterministic, so headless hosts and tests get stable overflow spans.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    /// Character advance as a fraction of the font size
    pub advance: f32,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&mut self, font: &FontDescriptor, text: &str) -> f32 {
        let chars = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        f32::from(chars) * font.size * self.advance
    }
}

/// Memoizing wrapper around another measurer.
///
/// Entries are evicted oldest-first once `capacity` is exceeded; lookups do
/// not promote. A capacity of 0 disables caching.
pub struct CachedMeasurer<M> {
    inner: M,
    widths: HashMap<(String, String), f32>,
    order: VecDeque<(String, String)>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    pub fn new(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            widths: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// `(hits, misses)` since creation or the last [`clear`](Self::clear).
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.widths.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn remember(&mut self, key: (String, String), width: f32) {
        if self.capacity == 0 || self.widths.contains_key(&key) {
            return;
        }
        self.widths.insert(key.clone(), width);
        self.order.push_back(key);
        while self.widths.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.widths.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedMeasurer<M> {
    fn measure(&mut self, font: &FontDescriptor, text: &str) -> f32 {
        let key = (font.css(), text.to_string());
        if let Some(&width) = self.widths.get(&key) {
            self.hits += 1;
            return width;
        }
        self.misses += 1;
        let width = self.inner.measure(font, text);
        self.remember(key, width);
        width
    }
}
