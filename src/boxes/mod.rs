//! Rectangle detection: from raw drawing geometry to clean symbol boxes.
//!
//! Two box sources produce the same [`Rect`] output:
//!
//! - [`LineBoxSource`]: detected line segments are bucketed into horizontal
//!   and vertical sets ([`lines`]), every pair of horizontals is intersected
//!   with every pair of verticals ([`reconstruct`]), and the resulting
//!   quadrilaterals are filtered ([`filter`]).
//! - [`ContourBoxSource`]: closed contours traced from an edge map are
//!   simplified and kept when they reduce to a convex quadrilateral
//!   ([`contours`]).
//!
//! Both run their output through the same [`BoxFilter`].

pub mod contours;
pub mod filter;
pub mod lines;
#[cfg(feature = "raster")]
#[cfg_attr(docsrs, doc(cfg(feature = "raster")))]
pub mod raster;
pub mod reconstruct;

pub use contours::{quad_bounding_rect, Contour, ContourBoxSource, ContourDetector};
pub use filter::{dedup_rects, BoxFilter};
pub use lines::{classify_lines, ClassifiedLines};
pub use reconstruct::{BoxCandidate, BoxReconstructor, ReconstructionStats};

use serde::{Deserialize, Serialize};

use crate::config::LocatorConfig;
use crate::geometry::{LineSegment, Rect};

/// A producer of filtered symbol rectangles.
///
/// Implementations own no page state beyond the geometry they were built on,
/// so the same configuration can drive any number of pages.
pub trait BoxSource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Produce the filtered rectangles and the counters behind them.
    fn detect(&self, config: &LocatorConfig) -> (Vec<Rect>, BoxStats);

    /// Produce the filtered rectangles for this geometry.
    fn rectangles(&self, config: &LocatorConfig) -> Vec<Rect> {
        self.detect(config).0
    }
}

/// What a box source saw and skipped on one page.
///
/// Degenerate geometry is never an error; it is counted here instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxStats {
    /// Diagonal, zero-length or non-finite segments
    pub discarded_lines: usize,
    /// Line quadruples with a missing corner
    pub degenerate_quadruples: usize,
    /// Contours that did not simplify to a convex quadrilateral
    pub rejected_contours: usize,
    /// Quadrilaterals before filtering
    pub candidates: usize,
    /// Rectangles after filtering
    pub boxes: usize,
}

/// Boxes reconstructed from line segments.
#[derive(Debug, Clone, Copy)]
pub struct LineBoxSource<'a> {
    segments: &'a [LineSegment],
}

impl<'a> LineBoxSource<'a> {
    /// Wrap a page's detected line segments.
    pub fn new(segments: &'a [LineSegment]) -> Self {
        Self { segments }
    }
}

impl BoxSource for LineBoxSource<'_> {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn detect(&self, config: &LocatorConfig) -> (Vec<Rect>, BoxStats) {
        let lines = classify_lines(self.segments, config.lines.angle_tolerance_deg);
        let (candidates, reconstruction) =
            BoxReconstructor::new(config.reconstruction.clone()).reconstruct_with_stats(&lines);
        let rects = BoxFilter::new(config.filter.clone()).apply(&candidates);
        log::debug!(
            "line source: {} segments -> {} candidates -> {} boxes",
            self.segments.len(),
            candidates.len(),
            rects.len()
        );
        let stats = BoxStats {
            discarded_lines: lines.discarded,
            degenerate_quadruples: reconstruction.degenerate,
            rejected_contours: 0,
            candidates: candidates.len(),
            boxes: rects.len(),
        };
        (rects, stats)
    }
}
