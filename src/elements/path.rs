//! Vector path records.
//!
//! A drawing walker reports each painted path with its bounding box and the
//! kind of segments it is built from. The locator only needs enough to tell
//! a tiny closed curve (a degree sign) from ordinary drawing geometry.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Dominant segment type of a vector path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathKind {
    /// Straight line segments (`l`)
    Line,
    /// An axis-aligned rectangle (`re`)
    Rectangle,
    /// A general quadrilateral (`qu`)
    Quad,
    /// Bezier curve segments (`c`)
    Curve,
}

impl PathKind {
    /// Parse the one- or two-letter item codes used by drawing walkers, or
    /// the full lowercase name.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "l" | "line" => Some(PathKind::Line),
            "re" | "rectangle" => Some(PathKind::Rectangle),
            "qu" | "quad" => Some(PathKind::Quad),
            "c" | "curve" => Some(PathKind::Curve),
            _ => None,
        }
    }
}

/// A painted vector path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorPath {
    /// Bounding box of the path
    pub bbox: Rect,
    /// Segment type
    pub kind: PathKind,
    /// Whether the path returns to its start point
    pub closed: bool,
}

impl VectorPath {
    /// Create a closed path of the given kind.
    pub fn new(bbox: Rect, kind: PathKind) -> Self {
        Self {
            bbox,
            kind,
            closed: true,
        }
    }

    /// Mark the path as open.
    pub fn open(mut self) -> Self {
        self.closed = false;
        self
    }

    /// Closed and curved: the shape a circle glyph has.
    pub fn is_closed_curve(&self) -> bool {
        self.closed && self.kind == PathKind::Curve
    }
}
