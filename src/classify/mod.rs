//! Symbol classification.
//!
//! Two independent recognisers turn page content into [`ClassifiedRecord`]s:
//!
//! - [`weld`]: text matched to a box is tested against an ordered list of
//!   weld identifier patterns.
//! - [`angle`]: a tiny closed curve is read as a degree sign and grouped
//!   with the digit glyphs next to it.
//!
//! Both emit the same record type so downstream consumers see one stream.

pub mod angle;
pub mod weld;

pub use angle::AngleGrouper;
pub use weld::{classify_matches, WeldClassifier, WeldPatterns};

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// What a record was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolKind {
    /// Boxed text matching a weld identifier pattern
    Weld,
    /// Digits grouped with a degree sign
    Angle,
    /// Boxed text matching no pattern (lenient mode)
    Plain,
    /// Boxed text matching no pattern (strict mode)
    Rejected,
}

impl SymbolKind {
    /// Upper-case name, as written to annotations and labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Weld => "WELD",
            SymbolKind::Angle => "ANGLE",
            SymbolKind::Plain => "PLAIN",
            SymbolKind::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry a record was recognised from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RecordGeometry {
    /// Text inside a symbol box
    Box {
        /// The containing box
        rect_bbox: Rect,
    },
    /// Numeral next to a degree sign
    Angle {
        /// The degree-sign circle
        circle_bbox: Rect,
        /// Union of the digit glyph boxes
        number_bbox: Rect,
    },
}

/// One recognised symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    /// Text as it should be shown ("W12", "45°")
    pub text: String,
    /// Recognised kind
    pub kind: SymbolKind,
    /// Text bounds; for angles, the union of circle and numeral
    pub text_bbox: Rect,
    /// Parsed value: the normalized weld identifier, or the angle numeral
    /// without the degree sign
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Source geometry
    #[serde(flatten)]
    pub geometry: RecordGeometry,
}

impl ClassifiedRecord {
    /// The rectangle to highlight for this record.
    ///
    /// The containing box for boxed text, the combined circle and numeral
    /// bounds for angles.
    pub fn highlight_rect(&self) -> Rect {
        match self.geometry {
            RecordGeometry::Box { rect_bbox } => rect_bbox,
            RecordGeometry::Angle { .. } => self.text_bbox,
        }
    }
}
