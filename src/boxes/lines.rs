//! Horizontal/vertical bucketing of detected line segments.

use crate::geometry::{LineSegment, Orientation};

/// Segments split by orientation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedLines {
    /// Segments within tolerance of 0°/180°
    pub horizontal: Vec<LineSegment>,
    /// Segments within tolerance of ±90°
    pub vertical: Vec<LineSegment>,
    /// Diagonal, zero-length or non-finite segments
    pub discarded: usize,
}

/// Partition segments into horizontal and vertical sets.
///
/// Input order is preserved inside each set. Zero-length and non-finite
/// segments have no direction and are discarded along with diagonals.
///
/// # Examples
///
/// ```
/// use weldmark::boxes::classify_lines;
/// use weldmark::geometry::LineSegment;
///
/// let lines = classify_lines(
///     &[
///         LineSegment::new(0.0, 0.0, 100.0, 2.0),
///         LineSegment::new(0.0, 0.0, 1.0, 50.0),
///         LineSegment::new(0.0, 0.0, 30.0, 30.0),
///     ],
///     10.0,
/// );
/// assert_eq!(lines.horizontal.len(), 1);
/// assert_eq!(lines.vertical.len(), 1);
/// assert_eq!(lines.discarded, 1);
/// ```
pub fn classify_lines(segments: &[LineSegment], tolerance_deg: f64) -> ClassifiedLines {
    let mut out = ClassifiedLines::default();
    for seg in segments {
        match seg.orientation(tolerance_deg) {
            Some(Orientation::Horizontal) => out.horizontal.push(*seg),
            Some(Orientation::Vertical) => out.vertical.push(*seg),
            Some(Orientation::Other) | None => out.discarded += 1,
        }
    }
    if out.discarded > 0 {
        log::debug!(
            "line classifier: {} horizontal, {} vertical, {} discarded",
            out.horizontal.len(),
            out.vertical.len(),
            out.discarded
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_preserves_order() {
        let segs = [
            LineSegment::new(0.0, 5.0, 10.0, 5.0),
            LineSegment::new(3.0, 0.0, 3.0, 9.0),
            LineSegment::new(10.0, 8.0, 0.0, 8.0),
            LineSegment::new(7.0, 9.0, 7.0, 0.0),
        ];
        let lines = classify_lines(&segs, 10.0);
        assert_eq!(lines.horizontal, vec![segs[0], segs[2]]);
        assert_eq!(lines.vertical, vec![segs[1], segs[3]]);
        assert_eq!(lines.discarded, 0);
    }

    #[test]
    fn test_degenerate_segments_discarded_not_errors() {
        let segs = [
            LineSegment::new(4.0, 4.0, 4.0, 4.0),
            LineSegment::new(f64::INFINITY, 0.0, 1.0, 0.0),
            LineSegment::new(0.0, 0.0, 10.0, 7.0),
        ];
        let lines = classify_lines(&segs, 10.0);
        assert!(lines.horizontal.is_empty());
        assert!(lines.vertical.is_empty());
        assert_eq!(lines.discarded, 3);
    }

    #[test]
    fn test_tolerance_is_configurable() {
        // ~14° off horizontal
        let seg = [LineSegment::new(0.0, 0.0, 100.0, 25.0)];
        assert_eq!(classify_lines(&seg, 10.0).discarded, 1);
        assert_eq!(classify_lines(&seg, 15.0).horizontal.len(), 1);
    }
}
