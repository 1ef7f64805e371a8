//! Hand-off of classified records to drawing and document collaborators.
//!
//! The emitter does no geometry. For each record it issues overlay draw
//! commands (outline, center marker, label) to an [`OverlaySink`] and a
//! rectangle annotation to an [`AnnotationSink`]. Sinks decide what drawing
//! means: [`CommandList`] and [`AnnotationList`] simply collect,
//! [`SvgOverlay`] writes SVG, and `PixmapOverlay` (feature `rendering`)
//! paints onto a page image.
//!
//! ## Example
//!
//! ```
//! use weldmark::classify::{ClassifiedRecord, RecordGeometry, SymbolKind};
//! use weldmark::emit::{AnnotationList, CommandList, ResultEmitter};
//! use weldmark::geometry::Rect;
//!
//! let record = ClassifiedRecord {
//!     text: "W12".to_string(),
//!     kind: SymbolKind::Weld,
//!     text_bbox: Rect::from_points(40.0, 5.0, 60.0, 15.0),
//!     value: Some("W12".to_string()),
//!     geometry: RecordGeometry::Box { rect_bbox: Rect::new(0.0, 0.0, 100.0, 20.0) },
//! };
//! let mut overlay = CommandList::default();
//! let mut annotations = AnnotationList::default();
//! ResultEmitter::default().emit(&[record], &mut overlay, &mut annotations);
//! assert_eq!(overlay.commands.len(), 3);
//! assert_eq!(annotations.annotations.len(), 1);
//! ```

pub mod annotation;
pub mod overlay;

pub use annotation::{AnnotationColor, AnnotationList, AnnotationPalette, RectAnnotation};
#[cfg(feature = "rendering")]
pub use overlay::PixmapOverlay;
pub use overlay::{CommandList, DrawCommand, KindColors, Rgba, SvgOverlay};

use crate::classify::ClassifiedRecord;
use crate::error::Result;
use crate::geometry::Point;

/// Receiver of overlay draw commands.
pub trait OverlaySink {
    /// Handle one command.
    fn draw(&mut self, command: DrawCommand);
}

/// Receiver of rectangle annotation requests.
pub trait AnnotationSink {
    /// Handle one annotation.
    fn annotate(&mut self, annotation: RectAnnotation);
}

/// Options for record emission.
#[derive(Debug, Clone)]
pub struct EmitterOptions {
    /// Overlay colors per kind
    pub colors: KindColors,
    /// Annotation stroke colors per kind
    pub palette: AnnotationPalette,
    /// Radius of the center marker
    pub marker_radius: f64,
    /// Distance the label baseline sits above the rectangle's top edge
    pub label_offset: f64,
    /// Annotation border width
    pub line_width: f32,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        Self {
            colors: KindColors::default(),
            palette: AnnotationPalette::default(),
            marker_radius: 3.0,
            label_offset: 5.0,
            line_width: 1.0,
        }
    }
}

/// Turns records into overlay commands and annotation requests.
#[derive(Debug, Clone, Default)]
pub struct ResultEmitter {
    options: EmitterOptions,
}

impl ResultEmitter {
    /// Create an emitter with the given options.
    pub fn new(options: EmitterOptions) -> Self {
        Self { options }
    }

    /// Send every record to both sinks, in record order.
    pub fn emit(
        &self,
        records: &[ClassifiedRecord],
        overlay: &mut dyn OverlaySink,
        annotations: &mut dyn AnnotationSink,
    ) {
        self.emit_overlay(records, overlay);
        self.emit_annotations(records, annotations);
    }

    /// Outline, center marker and label for each record.
    pub fn emit_overlay(&self, records: &[ClassifiedRecord], sink: &mut dyn OverlaySink) {
        for record in records {
            let rect = record.highlight_rect();
            let stroke = self.options.colors.stroke(record.kind);
            sink.draw(DrawCommand::Rect {
                rect,
                stroke,
                fill: self.options.colors.fill(record.kind),
            });
            sink.draw(DrawCommand::CenterMarker {
                center: rect.center(),
                radius: self.options.marker_radius,
                color: stroke,
            });
            sink.draw(DrawCommand::Label {
                text: record.text.clone(),
                anchor: Point::new(rect.left(), rect.top() - self.options.label_offset),
                color: stroke,
            });
        }
    }

    /// One rectangle annotation per record.
    pub fn emit_annotations(&self, records: &[ClassifiedRecord], sink: &mut dyn AnnotationSink) {
        for record in records {
            sink.annotate(RectAnnotation {
                rect: record.highlight_rect(),
                stroke: self.options.palette.color(record.kind),
                line_width: self.options.line_width,
                contents: record.text.clone(),
                kind: record.kind,
            });
        }
    }
}

/// Serialize records as a pretty-printed JSON array.
pub fn records_to_json(records: &[ClassifiedRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
