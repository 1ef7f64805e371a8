//! Rectangle annotation requests for a document writer.

use serde::{Deserialize, Serialize};

use super::AnnotationSink;
use crate::classify::SymbolKind;
use crate::error::Result;
use crate::geometry::Rect;

/// Annotation color in one of the document color spaces.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "space", content = "components", rename_all = "lowercase")]
pub enum AnnotationColor {
    /// No color (transparent)
    #[default]
    None,
    /// Grayscale (1 component)
    Gray(f32),
    /// RGB color (3 components)
    Rgb(f32, f32, f32),
}

impl AnnotationColor {
    /// Create red color.
    pub fn red() -> Self {
        Self::Rgb(1.0, 0.0, 0.0)
    }

    /// Create blue color.
    pub fn blue() -> Self {
        Self::Rgb(0.0, 0.0, 1.0)
    }

    /// Create orange color.
    pub fn orange() -> Self {
        Self::Rgb(1.0, 0.5, 0.0)
    }

    /// Mid gray.
    pub fn gray() -> Self {
        Self::Gray(0.5)
    }
}

/// Annotation stroke color for each symbol kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPalette {
    /// Weld identifier boxes
    pub weld: AnnotationColor,
    /// Angle readings
    pub angle: AnnotationColor,
    /// Boxed text matching no pattern
    pub plain: AnnotationColor,
    /// Rejected boxed text (strict mode)
    pub rejected: AnnotationColor,
}

impl Default for AnnotationPalette {
    fn default() -> Self {
        Self {
            weld: AnnotationColor::red(),
            angle: AnnotationColor::blue(),
            plain: AnnotationColor::gray(),
            rejected: AnnotationColor::orange(),
        }
    }
}

impl AnnotationPalette {
    /// Stroke color for `kind`.
    pub fn color(&self, kind: SymbolKind) -> AnnotationColor {
        match kind {
            SymbolKind::Weld => self.weld,
            SymbolKind::Angle => self.angle,
            SymbolKind::Plain => self.plain,
            SymbolKind::Rejected => self.rejected,
        }
    }
}

/// A request to draw a rectangle annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectAnnotation {
    /// Annotated area
    pub rect: Rect,
    /// Border color
    pub stroke: AnnotationColor,
    /// Border width
    pub line_width: f32,
    /// Popup text
    pub contents: String,
    /// Kind of the annotated record
    pub kind: SymbolKind,
}

/// Collects annotation requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationList {
    /// Requests in emission order
    pub annotations: Vec<RectAnnotation>,
}

impl AnnotationList {
    /// Serialize the collected requests as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.annotations)?)
    }
}

impl AnnotationSink for AnnotationList {
    fn annotate(&mut self, annotation: RectAnnotation) {
        self.annotations.push(annotation);
    }
}
