//! Box reconstruction from horizontal and vertical lines.
//!
//! Drawn boxes rarely come out of line detection as four segments that meet
//! exactly: corners are broken, edges overshoot, and one border may be split
//! into several pieces. Instead of chaining segments, every line is extended
//! far past its endpoints and each pair of horizontals is closed against each
//! pair of verticals. This overproduces on purpose; [`super::filter`] trims
//! the result.

use serde::{Deserialize, Serialize};

use super::lines::ClassifiedLines;
use crate::config::ReconstructionConfig;
use crate::geometry::{intersection, polygon_area, ExtendedLine, Point, Rect};

/// A quadrilateral closed by two horizontal and two vertical lines.
///
/// Corners run h1∩v1 → h1∩v2 → h2∩v2 → h2∩v1, which never self-intersects
/// for a pair of roughly horizontal and a pair of roughly vertical lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCandidate {
    /// Integer corner points in winding order
    pub corners: [(i32, i32); 4],
    /// Enclosed area (shoelace)
    pub area: f64,
}

impl BoxCandidate {
    /// Build a candidate from its corners, computing the enclosed area.
    pub fn from_corners(corners: [(i32, i32); 4]) -> Self {
        let points = corners.map(|(x, y)| Point::new(f64::from(x), f64::from(y)));
        Self {
            corners,
            area: polygon_area(&points),
        }
    }

    /// Corners as floating-point points.
    pub fn points(&self) -> [Point; 4] {
        self.corners
            .map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
    }

    /// Axis-aligned bounding rectangle of the corners.
    pub fn bounding_rect(&self) -> Rect {
        let (mut x0, mut y0) = self.corners[0];
        let (mut x1, mut y1) = self.corners[0];
        for &(x, y) in &self.corners[1..] {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        Rect::from_points(f64::from(x0), f64::from(y0), f64::from(x1), f64::from(y1))
    }
}

/// Enumerates box candidates from classified lines.
///
/// # Complexity
///
/// Every unordered pair of horizontals is combined with every unordered pair
/// of verticals: O(H²·V²) quadruples. Line counts on a drawing page are in
/// the tens, which keeps this in the low millions at worst. With
/// [`ReconstructionConfig::prune`] the H×V intersections are computed once
/// and a quadruple is abandoned at its first missing corner; the accepted set
/// and its order are identical either way.
#[derive(Debug, Clone)]
pub struct BoxReconstructor {
    config: ReconstructionConfig,
}

impl BoxReconstructor {
    /// Create a reconstructor with the given settings.
    pub fn new(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Enumerate candidates whose area reaches `min_area`.
    ///
    /// Quadruples with a parallel or near-parallel pair, or a corner outside
    /// the integer range, are skipped silently.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::boxes::{classify_lines, BoxReconstructor};
    /// use weldmark::config::ReconstructionConfig;
    /// use weldmark::geometry::LineSegment;
    ///
    /// let lines = classify_lines(
    ///     &[
    ///         LineSegment::new(0.0, 0.0, 100.0, 0.0),
    ///         LineSegment::new(0.0, 20.0, 100.0, 20.0),
    ///         LineSegment::new(0.0, 0.0, 0.0, 20.0),
    ///         LineSegment::new(100.0, 0.0, 100.0, 20.0),
    ///     ],
    ///     10.0,
    /// );
    /// let boxes = BoxReconstructor::new(ReconstructionConfig::default()).reconstruct(&lines);
    /// assert_eq!(boxes.len(), 1);
    /// assert_eq!(boxes[0].corners, [(0, 0), (100, 0), (100, 20), (0, 20)]);
    /// assert_eq!(boxes[0].area, 2000.0);
    /// ```
    pub fn reconstruct(&self, lines: &ClassifiedLines) -> Vec<BoxCandidate> {
        self.reconstruct_with_stats(lines).0
    }

    /// Like [`reconstruct`](Self::reconstruct), also reporting how many
    /// quadruples were examined and why the rest were skipped.
    pub fn reconstruct_with_stats(
        &self,
        lines: &ClassifiedLines,
    ) -> (Vec<BoxCandidate>, ReconstructionStats) {
        let reach = self.config.reach();
        let horizontal: Vec<ExtendedLine> =
            lines.horizontal.iter().map(|l| l.extend(reach)).collect();
        let vertical: Vec<ExtendedLine> = lines.vertical.iter().map(|l| l.extend(reach)).collect();

        let mut stats = ReconstructionStats {
            quadruples: pairs(horizontal.len()) * pairs(vertical.len()),
            ..Default::default()
        };
        let candidates = if self.config.prune {
            self.reconstruct_pruned(&horizontal, &vertical, &mut stats)
        } else {
            self.reconstruct_exhaustive(&horizontal, &vertical, &mut stats)
        };
        // Every quadruple that did not close is missing at least one corner
        stats.degenerate = stats.quadruples - candidates.len() - stats.too_small;

        if stats.degenerate > 0 {
            log::debug!(
                "skipped {} of {} quadruples with a parallel line pair",
                stats.degenerate,
                stats.quadruples
            );
        }
        log::trace!(
            "reconstructed {} candidates from {}h x {}v lines",
            candidates.len(),
            horizontal.len(),
            vertical.len()
        );
        (candidates, stats)
    }

    fn reconstruct_exhaustive(
        &self,
        horizontal: &[ExtendedLine],
        vertical: &[ExtendedLine],
        stats: &mut ReconstructionStats,
    ) -> Vec<BoxCandidate> {
        let eps = self.config.determinant_epsilon;
        let mut out = Vec::new();

        for (i, h1) in horizontal.iter().enumerate() {
            for h2 in &horizontal[i + 1..] {
                for (k, v1) in vertical.iter().enumerate() {
                    for v2 in &vertical[k + 1..] {
                        let corners = (
                            intersection(h1, v1, eps),
                            intersection(h1, v2, eps),
                            intersection(h2, v2, eps),
                            intersection(h2, v1, eps),
                        );
                        if let (Some(p1), Some(p2), Some(p3), Some(p4)) = corners {
                            self.accept([p1, p2, p3, p4], &mut out, stats);
                        }
                    }
                }
            }
        }
        out
    }

    fn reconstruct_pruned(
        &self,
        horizontal: &[ExtendedLine],
        vertical: &[ExtendedLine],
        stats: &mut ReconstructionStats,
    ) -> Vec<BoxCandidate> {
        let eps = self.config.determinant_epsilon;
        let table: Vec<Vec<Option<(i32, i32)>>> = horizontal
            .iter()
            .map(|h| vertical.iter().map(|v| intersection(h, v, eps)).collect())
            .collect();

        let mut out = Vec::new();
        for i in 0..horizontal.len() {
            for j in (i + 1)..horizontal.len() {
                for k in 0..vertical.len() {
                    let (Some(p1), Some(p4)) = (table[i][k], table[j][k]) else {
                        continue;
                    };
                    for l in (k + 1)..vertical.len() {
                        let (Some(p2), Some(p3)) = (table[i][l], table[j][l]) else {
                            continue;
                        };
                        self.accept([p1, p2, p3, p4], &mut out, stats);
                    }
                }
            }
        }
        out
    }

    fn accept(
        &self,
        corners: [(i32, i32); 4],
        out: &mut Vec<BoxCandidate>,
        stats: &mut ReconstructionStats,
    ) {
        let candidate = BoxCandidate::from_corners(corners);
        if candidate.area >= self.config.min_area {
            out.push(candidate);
        } else {
            stats.too_small += 1;
        }
    }
}

/// Counters from one reconstruction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    /// Horizontal-pair × vertical-pair combinations examined
    pub quadruples: usize,
    /// Quadruples with a missing corner (parallel pair or out-of-range point)
    pub degenerate: usize,
    /// Closed quadrilaterals below `min_area`
    pub too_small: usize,
}

fn pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::classify_lines;
    use crate::geometry::LineSegment;

    fn reconstruct(segments: &[LineSegment], prune: bool) -> Vec<BoxCandidate> {
        let config = ReconstructionConfig {
            prune,
            ..Default::default()
        };
        BoxReconstructor::new(config).reconstruct(&classify_lines(segments, 10.0))
    }

    /// A 3×2 grid of lines: rows at y=0,20,60 and columns at x=0,100.
    fn grid() -> Vec<LineSegment> {
        vec![
            LineSegment::new(0.0, 0.0, 100.0, 0.0),
            LineSegment::new(0.0, 20.0, 100.0, 20.0),
            LineSegment::new(0.0, 60.0, 100.0, 60.0),
            LineSegment::new(0.0, 0.0, 0.0, 60.0),
            LineSegment::new(100.0, 0.0, 100.0, 60.0),
        ]
    }

    #[test]
    fn test_reach_does_not_change_candidates() {
        // Borders stop short of each other
        let segments = vec![
            LineSegment::new(10.0, 0.0, 90.0, 0.0),
            LineSegment::new(10.0, 20.0, 90.0, 20.0),
            LineSegment::new(0.0, 4.0, 0.0, 16.0),
            LineSegment::new(100.0, 4.0, 100.0, 16.0),
        ];
        let lines = classify_lines(&segments, 10.0);
        let run = |page_extent: f64, extension_factor: f64| {
            BoxReconstructor::new(ReconstructionConfig {
                page_extent,
                extension_factor,
                ..Default::default()
            })
            .reconstruct(&lines)
        };
        let near = run(1.0, 0.01);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].bounding_rect(), Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(run(10_000.0, 2.0), near);
    }

    #[test]
    fn test_candidate_from_corners() {
        let c = BoxCandidate::from_corners([(0, 0), (100, 0), (100, 20), (0, 20)]);
        assert_eq!(c.area, 2000.0);
        assert_eq!(c.bounding_rect(), Rect::new(0.0, 0.0, 100.0, 20.0));
    }

    #[test]
    fn test_grid_produces_every_row_combination() {
        let boxes = reconstruct(&grid(), true);
        let areas: Vec<f64> = boxes.iter().map(|b| b.area).collect();
        // rows (0,20), (0,60), (20,60) against the single column pair
        assert_eq!(areas, vec![2000.0, 6000.0, 4000.0]);
    }

    #[test]
    fn test_broken_corners_are_closed() {
        // Edges stop short of each other by several units
        let segs = vec![
            LineSegment::new(5.0, 0.0, 95.0, 0.0),
            LineSegment::new(3.0, 20.0, 90.0, 20.0),
            LineSegment::new(0.0, 4.0, 0.0, 16.0),
            LineSegment::new(100.0, 2.0, 100.0, 18.0),
        ];
        let boxes = reconstruct(&segs, true);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].corners, [(0, 0), (100, 0), (100, 20), (0, 20)]);
    }

    #[test]
    fn test_min_area_threshold() {
        let segs = vec![
            LineSegment::new(0.0, 0.0, 20.0, 0.0),
            LineSegment::new(0.0, 10.0, 20.0, 10.0),
            LineSegment::new(0.0, 0.0, 0.0, 10.0),
            LineSegment::new(20.0, 0.0, 20.0, 10.0),
        ];
        // 200 < 500
        assert!(reconstruct(&segs, true).is_empty());

        let config = ReconstructionConfig {
            min_area: 200.0,
            ..Default::default()
        };
        let boxes = BoxReconstructor::new(config).reconstruct(&classify_lines(&segs, 10.0));
        assert_eq!(boxes.len(), 1);
    }

    #[test]
    fn test_single_horizontal_yields_nothing() {
        let segs = vec![
            LineSegment::new(0.0, 0.0, 100.0, 0.0),
            LineSegment::new(0.0, 0.0, 0.0, 50.0),
            LineSegment::new(100.0, 0.0, 100.0, 50.0),
        ];
        assert!(reconstruct(&segs, true).is_empty());
        assert!(reconstruct(&segs, false).is_empty());
    }

    #[test]
    fn test_pruned_matches_exhaustive() {
        let mut segs = grid();
        segs.push(LineSegment::new(40.0, -5.0, 41.0, 70.0));
        segs.push(LineSegment::new(-10.0, 33.0, 120.0, 35.0));
        assert_eq!(reconstruct(&segs, true), reconstruct(&segs, false));
    }

    #[test]
    fn test_stats_account_for_every_quadruple() {
        let mut segs = grid();
        // A second copy of the right column closes zero-area boxes
        segs.push(LineSegment::new(100.0, 0.0, 100.0, 60.0));
        let config = ReconstructionConfig {
            min_area: 3000.0,
            ..Default::default()
        };
        let lines = classify_lines(&segs, 10.0);
        let (boxes, stats) = BoxReconstructor::new(config).reconstruct_with_stats(&lines);
        // 3 row pairs x 3 column pairs
        assert_eq!(stats.quadruples, 9);
        assert_eq!(stats.degenerate, 0);
        // The 2000-area row pair twice, plus the three zero-width boxes
        assert_eq!(stats.too_small, 5);
        assert_eq!(boxes.len(), 4);
    }

    #[test]
    fn test_out_of_range_corner_is_degenerate() {
        let segs = vec![
            LineSegment::new(0.0, 0.0, 100.0, 0.0),
            LineSegment::new(0.0, 3.0e9, 100.0, 3.0e9),
            LineSegment::new(0.0, 0.0, 0.0, 20.0),
            LineSegment::new(100.0, 0.0, 100.0, 20.0),
        ];
        let lines = classify_lines(&segs, 10.0);
        let (boxes, stats) =
            BoxReconstructor::new(ReconstructionConfig::default()).reconstruct_with_stats(&lines);
        assert!(boxes.is_empty());
        assert_eq!(stats.quadruples, 1);
        assert_eq!(stats.degenerate, 1);
    }

    #[test]
    fn test_slightly_skewed_lines_close_a_box() {
        let segs = vec![
            LineSegment::new(0.0, 0.0, 100.0, 2.0),
            LineSegment::new(0.0, 30.0, 100.0, 31.0),
            LineSegment::new(0.0, 0.0, 1.0, 30.0),
            LineSegment::new(100.0, 0.0, 99.0, 30.0),
        ];
        let boxes = reconstruct(&segs, true);
        assert_eq!(boxes.len(), 1);
        let rect = boxes[0].bounding_rect();
        assert!(rect.width >= 98.0 && rect.width <= 101.0);
        assert!(rect.height >= 28.0 && rect.height <= 32.0);
    }
}
