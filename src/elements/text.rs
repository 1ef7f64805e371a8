//! Text spans and individual glyphs.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

/// A run of text with its bounding box, as produced by a text extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Bounding box of the run
    pub bbox: Rect,
    /// Raw text, untrimmed
    pub text: String,
}

impl TextSpan {
    /// Create a span from a bounding box and its text.
    pub fn new(bbox: Rect, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }

    /// Create a span from `(x0, y0, x1, y1)` bounds.
    pub fn from_bounds(x0: f64, y0: f64, x1: f64, y1: f64, text: impl Into<String>) -> Self {
        Self::new(Rect::from_points(x0, y0, x1, y1), text)
    }

    /// Center of the bounding box; the point used for containment tests.
    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}

/// A single character with its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glyph {
    /// Bounding box of the glyph
    pub bbox: Rect,
    /// The character
    #[serde(rename = "char")]
    pub ch: char,
}

impl Glyph {
    /// Create a glyph.
    pub fn new(bbox: Rect, ch: char) -> Self {
        Self { bbox, ch }
    }

    /// Whether the glyph is an ASCII decimal digit.
    pub fn is_digit(&self) -> bool {
        self.ch.is_ascii_digit()
    }

    /// Center of the glyph box.
    pub fn center(&self) -> Point {
        self.bbox.center()
    }
}
