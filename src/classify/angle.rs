//! Angle readings from degree signs.
//!
//! Vector drawings often typeset "45°" as two digit glyphs followed by a
//! tiny stroked circle rather than a degree character. The grouper finds
//! those circles and reads the digits around them.
//!
//! This is a proximity heuristic, not OCR: any digit inside the search window
//! is taken as part of the numeral, and a dimension value printed close to a
//! degree sign will be merged into it.

use super::{ClassifiedRecord, RecordGeometry, SymbolKind};
use crate::config::AngleConfig;
use crate::elements::{Glyph, VectorPath};
use crate::geometry::Rect;

/// Groups degree-sign circles with neighbouring digit glyphs.
#[derive(Debug, Clone)]
pub struct AngleGrouper {
    config: AngleConfig,
}

impl AngleGrouper {
    /// Create a grouper with the given settings.
    pub fn new(config: AngleConfig) -> Self {
        Self { config }
    }

    /// Whether a path is small and round enough to be a degree sign.
    pub fn is_degree_circle(&self, path: &VectorPath) -> bool {
        let size = self.config.min_circle_size..=self.config.max_circle_size;
        path.is_closed_curve() && size.contains(&path.bbox.width) && size.contains(&path.bbox.height)
    }

    /// Produce one `Angle` record per degree sign that has digits nearby.
    ///
    /// Records follow the order of `paths`.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::classify::AngleGrouper;
    /// use weldmark::config::AngleConfig;
    /// use weldmark::elements::{Glyph, PathKind, VectorPath};
    /// use weldmark::geometry::Rect;
    ///
    /// let circle = VectorPath::new(Rect::from_points(10.0, 10.0, 12.0, 12.0), PathKind::Curve);
    /// let glyphs = [
    ///     Glyph::new(Rect::from_points(-4.0, 9.0, 0.0, 15.0), '4'),
    ///     Glyph::new(Rect::from_points(1.0, 9.0, 5.0, 15.0), '5'),
    /// ];
    /// let records = AngleGrouper::new(AngleConfig::default()).group(&[circle], &glyphs);
    /// assert_eq!(records[0].text, "45°");
    /// ```
    pub fn group(&self, paths: &[VectorPath], glyphs: &[Glyph]) -> Vec<ClassifiedRecord> {
        let records: Vec<ClassifiedRecord> = paths
            .iter()
            .filter(|p| self.is_degree_circle(p))
            .filter_map(|p| self.read_circle(&p.bbox, glyphs))
            .collect();
        log::debug!("grouped {} angle readings", records.len());
        records
    }

    fn accepts(&self, ch: char) -> bool {
        ch.is_ascii_digit() || (self.config.allow_decimal_point && ch == '.')
    }

    fn read_circle(&self, circle: &Rect, glyphs: &[Glyph]) -> Option<ClassifiedRecord> {
        let center = circle.center();
        let mut near: Vec<&Glyph> = glyphs
            .iter()
            .filter(|g| self.accepts(g.ch))
            .filter(|g| {
                let c = g.center();
                (c.x - center.x).abs() <= self.config.window_dx
                    && (c.y - center.y).abs() <= self.config.window_dy
            })
            .collect();

        if !near.iter().any(|g| g.is_digit()) {
            log::trace!("degree sign at ({}, {}) has no digits nearby", center.x, center.y);
            return None;
        }

        // sort_by is stable: glyphs sharing an x keep input order
        near.sort_by(|a, b| a.bbox.x.total_cmp(&b.bbox.x));

        let numeral: String = near.iter().map(|g| g.ch).collect();
        let number_bbox = near[1..]
            .iter()
            .fold(near[0].bbox, |acc, g| acc.union(&g.bbox));

        Some(ClassifiedRecord {
            text: format!("{}°", numeral),
            kind: SymbolKind::Angle,
            text_bbox: circle.union(&number_bbox),
            value: Some(numeral),
            geometry: RecordGeometry::Angle {
                circle_bbox: *circle,
                number_bbox,
            },
        })
    }
}

impl Default for AngleGrouper {
    fn default() -> Self {
        Self::new(AngleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::PathKind;
    use proptest::prelude::*;

    fn circle() -> VectorPath {
        VectorPath::new(Rect::from_points(10.0, 10.0, 12.0, 12.0), PathKind::Curve)
    }

    fn glyph(x: f64, ch: char) -> Glyph {
        Glyph::new(Rect::from_points(x, 9.0, x + 3.0, 15.0), ch)
    }

    #[test]
    fn test_digits_read_left_to_right() {
        let grouper = AngleGrouper::default();
        // Glyphs arrive right-to-left
        let records = grouper.group(&[circle()], &[glyph(13.0, '0'), glyph(6.0, '3')]);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.text, "30°");
        assert_eq!(r.kind, SymbolKind::Angle);
        assert_eq!(r.value.as_deref(), Some("30"));
        match r.geometry {
            RecordGeometry::Angle {
                circle_bbox,
                number_bbox,
            } => {
                assert_eq!(circle_bbox, circle().bbox);
                assert_eq!(number_bbox, Rect::from_points(6.0, 9.0, 16.0, 15.0));
            },
            other => panic!("unexpected geometry {:?}", other),
        }
        assert_eq!(r.text_bbox, Rect::from_points(6.0, 9.0, 16.0, 15.0));
    }

    #[test]
    fn test_no_digits_no_record() {
        let grouper = AngleGrouper::default();
        assert!(grouper.group(&[circle()], &[]).is_empty());
        assert!(grouper.group(&[circle()], &[glyph(6.0, 'A')]).is_empty());
    }

    #[test]
    fn test_window_bounds() {
        let grouper = AngleGrouper::default();
        // Circle center is (11, 11); a glyph centered 45 units away is out
        let far = Glyph::new(Rect::from_points(54.0, 9.0, 58.0, 13.0), '7');
        assert!(grouper.group(&[circle()], &[far]).is_empty());

        // Centered exactly 40 units right and 20 units down: inside
        let edge = Glyph::new(Rect::from_points(49.0, 29.0, 53.0, 33.0), '7');
        assert_eq!(grouper.group(&[circle()], &[edge]).len(), 1);
    }

    #[test]
    fn test_circle_size_envelope() {
        let grouper = AngleGrouper::default();
        let big = VectorPath::new(Rect::from_points(0.0, 0.0, 20.0, 20.0), PathKind::Curve);
        let open = circle().open();
        let square = VectorPath::new(circle().bbox, PathKind::Rectangle);
        let glyphs = [glyph(6.0, '9')];
        assert!(grouper.group(&[big, open, square], &glyphs).is_empty());
    }

    #[test]
    fn test_decimal_point() {
        let glyphs = [glyph(-6.0, '1'), glyph(-2.0, '2'), glyph(1.0, '.'), glyph(4.0, '5')];
        let strict = AngleGrouper::default().group(&[circle()], &glyphs);
        assert_eq!(strict[0].text, "125°");

        let grouper = AngleGrouper::new(AngleConfig {
            allow_decimal_point: true,
            ..Default::default()
        });
        assert_eq!(grouper.group(&[circle()], &glyphs)[0].text, "12.5°");
        // A lone point is not a reading
        assert!(grouper.group(&[circle()], &[glyph(6.0, '.')]).is_empty());
    }

    #[test]
    fn test_one_record_per_circle() {
        let second = VectorPath::new(Rect::from_points(210.0, 10.0, 212.0, 12.0), PathKind::Curve);
        let glyphs = [glyph(6.0, '3'), glyph(200.0, '9'), glyph(204.0, '0')];
        let texts: Vec<String> = AngleGrouper::default()
            .group(&[circle(), second], &glyphs)
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["3°".to_string(), "90°".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_numeral_independent_of_input_order(
            digits in proptest::collection::vec(0u32..10, 1..6),
            seed in any::<u64>(),
        ) {
            let glyphs: Vec<Glyph> = digits
                .iter()
                .enumerate()
                .map(|(i, d)| glyph(-20.0 + i as f64 * 4.0, char::from_digit(*d, 10).unwrap()))
                .collect();
            let expected: String = digits.iter().map(|d| char::from_digit(*d, 10).unwrap()).collect();

            let mut shuffled = glyphs.clone();
            let n = shuffled.len();
            let mut s = seed;
            for i in (1..n).rev() {
                s = s.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                shuffled.swap(i, (s >> 33) as usize % (i + 1));
            }

            let records = AngleGrouper::default().group(&[circle()], &shuffled);
            prop_assert_eq!(records.len(), 1);
            prop_assert_eq!(records[0].value.clone(), Some(expected));
        }
    }
}
