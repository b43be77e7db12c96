//! Cell attribute set.
//!
//! The wire format is an open JSON object; here every known key is a typed
//! field so consumers can match on it exhaustively. Keys we do not know are
//! kept verbatim in [`CellAttributes::extra`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Border edges declared on a cell.
///
/// On the wire this is a space-separated class list such as
/// `"border-right border-bottom"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Borders {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Borders {
    pub const NONE: Borders = Borders {
        top: false,
        right: false,
        bottom: false,
        left: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Union of two edge sets.
    #[must_use]
    pub fn union(self, other: Borders) -> Borders {
        Borders {
            top: self.top || other.top,
            right: self.right || other.right,
            bottom: self.bottom || other.bottom,
            left: self.left || other.left,
        }
    }

    #[must_use]
    pub fn intersection(self, other: Borders) -> Borders {
        Borders {
            top: self.top && other.top,
            right: self.right && other.right,
            bottom: self.bottom && other.bottom,
            left: self.left && other.left,
        }
    }

    /// Edges of `self` not in `other`.
    #[must_use]
    pub fn difference(self, other: Borders) -> Borders {
        Borders {
            top: self.top && !other.top,
            right: self.right && !other.right,
            bottom: self.bottom && !other.bottom,
            left: self.left && !other.left,
        }
    }

    /// Parse a class list. Unknown tokens are ignored.
    pub fn parse(s: &str) -> Borders {
        let mut borders = Borders::NONE;
        for token in s.split_whitespace() {
            match token {
                "border-top" => borders.top = true,
                "border-right" => borders.right = true,
                "border-bottom" => borders.bottom = true,
                "border-left" => borders.left = true,
                "border-all" => {
                    borders = Borders {
                        top: true,
                        right: true,
                        bottom: true,
                        left: true,
                    }
                }
                _ => {}
            }
        }
        borders
    }
}

impl fmt::Display for Borders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(4);
        if self.top {
            parts.push("border-top");
        }
        if self.right {
            parts.push("border-right");
        }
        if self.bottom {
            parts.push("border-bottom");
        }
        if self.left {
            parts.push("border-left");
        }
        f.write_str(&parts.join(" "))
    }
}

impl Serialize for Borders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Borders {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.map_or(Borders::NONE, |s| Borders::parse(&s)))
    }
}

/// How text that does not fit its column is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapMode {
    /// Spill into empty neighbors to the right
    #[default]
    Overflow,
    /// Wrap onto multiple lines
    Wrap,
    /// Cut at the cell edge
    Clip,
}

/// Typed cell attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellAttributes {
    #[serde(rename = "border", skip_serializing_if = "Borders::is_empty")]
    pub borders: Borders,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<WrapMode>,
    /// Requested merge height; consumed by the materializer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
    /// Requested merge width; consumed by the materializer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    /// Number/date format code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Free-form keys outside the known set
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CellAttributes {
    /// Parse the attribute object carried by an update. `null` is empty.
    pub fn from_value(value: &serde_json::Value) -> crate::error::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }

    /// Effective wrap mode (unset means overflow).
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap.unwrap_or_default()
    }

    /// Fold decoder-derived attributes into the update's own.
    ///
    /// Rendering-only keys (`format`, `textAlign`, `color`) take the derived
    /// value. Every other key keeps the update's value and only falls back to
    /// the derived one when unset.
    pub fn merge_derived(&mut self, derived: CellAttributes) {
        let CellAttributes {
            borders,
            background_color,
            color,
            font_family,
            font_size,
            bold,
            italic,
            underline,
            strike,
            text_align,
            vertical_align,
            wrap,
            row_span,
            col_span,
            protected,
            format,
            extra,
        } = derived;

        // Rendering-only: derived wins
        if format.is_some() {
            self.format = format;
        }
        if text_align.is_some() {
            self.text_align = text_align;
        }
        if color.is_some() {
            self.color = color;
        }

        // Update-carried wins
        if self.borders.is_empty() {
            self.borders = borders;
        }
        fill(&mut self.background_color, background_color);
        fill(&mut self.font_family, font_family);
        fill(&mut self.font_size, font_size);
        fill(&mut self.bold, bold);
        fill(&mut self.italic, italic);
        fill(&mut self.underline, underline);
        fill(&mut self.strike, strike);
        fill(&mut self.vertical_align, vertical_align);
        fill(&mut self.wrap, wrap);
        fill(&mut self.row_span, row_span);
        fill(&mut self.col_span, col_span);
        fill(&mut self.protected, protected);
        for (key, value) in extra {
            self.extra.entry(key).or_insert(value);
        }
    }
}

fn fill<T>(slot: &mut Option<T>, fallback: Option<T>) {
    if slot.is_none() {
        *slot = fallback;
    }
}
