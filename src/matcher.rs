//! Containment matching of text spans against symbol boxes.
//!
//! A span belongs to a box when the center of the span's bounding box lies
//! inside the box, edges included. The matcher is a plain relational join:
//! a span inside nested or overlapping boxes matches each of them, and
//! choosing between them is left to classification (see
//! [`crate::config::TieBreak`]).

use serde::{Deserialize, Serialize};

use crate::elements::TextSpan;
use crate::geometry::Rect;

/// One span paired with one containing box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Index of `span` in the span list given to the matcher
    pub span_index: usize,
    /// The matched span
    pub span: TextSpan,
    /// The containing box
    pub rect: Rect,
    /// Index of `rect` in the box list given to the matcher
    pub rect_index: usize,
}

/// Pair every span with every box containing its center.
///
/// Output is ordered by span, then by box index. O(spans × boxes).
///
/// # Examples
///
/// ```
/// use weldmark::elements::TextSpan;
/// use weldmark::geometry::Rect;
/// use weldmark::matcher::match_spans;
///
/// let spans = [TextSpan::from_bounds(40.0, 5.0, 60.0, 15.0, "W12")];
/// let rects = [Rect::new(0.0, 0.0, 100.0, 20.0), Rect::new(200.0, 0.0, 50.0, 20.0)];
/// let matches = match_spans(&spans, &rects);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].rect_index, 0);
/// ```
pub fn match_spans(spans: &[TextSpan], rects: &[Rect]) -> Vec<Match> {
    let mut matches = Vec::new();
    for (span_index, span) in spans.iter().enumerate() {
        let center = span.center();
        for (rect_index, rect) in rects.iter().enumerate() {
            if rect.contains_point(&center) {
                matches.push(Match {
                    span_index,
                    span: span.clone(),
                    rect: *rect,
                    rect_index,
                });
            }
        }
    }
    log::trace!(
        "matched {} of {} spans against {} boxes",
        matches.len(),
        spans.len(),
        rects.len()
    );
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_on_edge_matches() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        // Center (100, 10) sits on the right edge
        let on_edge = TextSpan::from_bounds(95.0, 5.0, 105.0, 15.0, "W3");
        // Center (0, 0) is the top-left corner
        let on_corner = TextSpan::from_bounds(-5.0, -5.0, 5.0, 5.0, "W4");
        let matches = match_spans(&[on_edge, on_corner], &[rect]);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_overlap_without_center_inside_does_not_match() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        // Span overlaps the box but its center (110, 10) is outside
        let span = TextSpan::from_bounds(90.0, 0.0, 130.0, 20.0, "W5");
        assert!(match_spans(&[span], &[rect]).is_empty());
    }

    #[test]
    fn test_nested_boxes_all_retained() {
        let outer = Rect::new(0.0, 0.0, 200.0, 100.0);
        let inner = Rect::new(50.0, 30.0, 100.0, 40.0);
        let span = TextSpan::from_bounds(90.0, 45.0, 110.0, 55.0, "W7");
        let matches = match_spans(&[span], &[outer, inner]);
        let indices: Vec<usize> = matches.iter().map(|m| m.rect_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_output_ordered_by_span_then_rect() {
        let rects = [Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(0.0, 0.0, 50.0, 50.0)];
        let spans = [
            TextSpan::from_bounds(70.0, 70.0, 80.0, 80.0, "A"),
            TextSpan::from_bounds(10.0, 10.0, 20.0, 20.0, "B"),
        ];
        let order: Vec<(String, usize)> = match_spans(&spans, &rects)
            .into_iter()
            .map(|m| (m.span.text, m.rect_index))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A".to_string(), 0),
                ("B".to_string(), 0),
                ("B".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(match_spans(&[], &[Rect::new(0.0, 0.0, 1.0, 1.0)]).is_empty());
        assert!(match_spans(&[TextSpan::from_bounds(0.0, 0.0, 1.0, 1.0, "x")], &[]).is_empty());
    }
}
