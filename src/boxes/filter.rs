//! Reduction of box candidates to a clean working set.
//!
//! Rules run in a fixed order: area floor, size envelope, then duplicate
//! collapsing. Reconstruction emits the same physical box once per line
//! quadruple that closes it (a border split in two segments closes it
//! twice), so the dedup step is explicit and configurable instead of hidden
//! inside reconstruction.

use std::collections::HashSet;

use super::reconstruct::BoxCandidate;
use crate::config::{BoxFilterConfig, DedupPolicy};
use crate::geometry::Rect;

/// Applies [`BoxFilterConfig`] to candidates or rectangles.
#[derive(Debug, Clone)]
pub struct BoxFilter {
    config: BoxFilterConfig,
}

impl BoxFilter {
    /// Create a filter with the given settings.
    pub fn new(config: BoxFilterConfig) -> Self {
        Self { config }
    }

    /// Filter reconstructed quadrilaterals.
    ///
    /// The area rule uses the quadrilateral's own area; the envelope and
    /// dedup rules use its bounding rectangle, which is what is returned.
    pub fn apply(&self, candidates: &[BoxCandidate]) -> Vec<Rect> {
        let sized: Vec<Rect> = candidates
            .iter()
            .filter(|c| c.area >= self.config.min_area)
            .map(BoxCandidate::bounding_rect)
            .filter(|r| self.fits_envelope(r))
            .collect();
        dedup_rects(&sized, self.config.dedup)
    }

    /// Filter rectangles that came straight from a contour source.
    pub fn apply_rects(&self, rects: &[Rect]) -> Vec<Rect> {
        let sized: Vec<Rect> = rects
            .iter()
            .filter(|r| r.area() >= self.config.min_area && self.fits_envelope(r))
            .copied()
            .collect();
        dedup_rects(&sized, self.config.dedup)
    }

    fn fits_envelope(&self, rect: &Rect) -> bool {
        self.config
            .envelope
            .map_or(true, |envelope| envelope.contains(rect))
    }
}

/// Collapse rectangles that are the same under `policy`.
///
/// The first occurrence of each rectangle is kept and input order is
/// preserved, which makes the operation idempotent.
///
/// # Examples
///
/// ```
/// use weldmark::boxes::dedup_rects;
/// use weldmark::config::DedupPolicy;
/// use weldmark::geometry::Rect;
///
/// let rects = [
///     Rect::new(0.0, 0.0, 100.0, 20.0),
///     Rect::new(0.2, -0.3, 100.1, 20.0),
///     Rect::new(0.0, 40.0, 100.0, 20.0),
/// ];
/// let unique = dedup_rects(&rects, DedupPolicy::RoundedBounds { grid: 1.0 });
/// assert_eq!(unique, vec![rects[0], rects[2]]);
/// assert_eq!(dedup_rects(&rects, DedupPolicy::Keep).len(), 3);
/// ```
pub fn dedup_rects(rects: &[Rect], policy: DedupPolicy) -> Vec<Rect> {
    match policy {
        DedupPolicy::Keep => rects.to_vec(),
        DedupPolicy::RoundedBounds { grid } => {
            let mut seen = HashSet::new();
            rects
                .iter()
                .filter(|r| seen.insert(r.snapped_bounds(grid)))
                .copied()
                .collect()
        },
    }
}
