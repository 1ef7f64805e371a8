//! Rectangles from closed contours.
//!
//! When a page is only available as pixels, an edge detector and contour
//! tracer (see [`ContourDetector`]) turn it into closed outlines. An outline
//! is a symbol box candidate when it simplifies to a convex quadrilateral.

use serde::{Deserialize, Serialize};

use super::filter::BoxFilter;
use super::{BoxSource, BoxStats};
use crate::config::LocatorConfig;
use crate::geometry::{approximate_polygon, arc_length, is_convex, Point, Rect};

/// A closed polygonal outline, in tracing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contour {
    /// Outline points; the last point connects back to the first
    pub points: Vec<Point>,
}

impl Contour {
    /// Wrap traced points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Perimeter including the closing edge.
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.points, true)
    }
}

/// Edge-detection collaborator producing closed contours from an image.
pub trait ContourDetector {
    /// Image type the detector consumes.
    type Image: ?Sized;

    /// Trace the closed contours of `image`.
    fn detect(&self, image: &Self::Image) -> Vec<Contour>;
}

/// Bounding rectangle of a contour that simplifies to a convex quadrilateral.
///
/// The simplification tolerance is `epsilon_fraction` of the perimeter.
/// Returns `None` for anything else: triangles, circles, concave or
/// self-intersecting outlines.
///
/// # Examples
///
/// ```
/// use weldmark::boxes::{quad_bounding_rect, Contour};
/// use weldmark::geometry::{Point, Rect};
///
/// let contour = Contour::new(vec![
///     Point::new(10.0, 10.0),
///     Point::new(60.0, 10.0),
///     Point::new(110.0, 10.0),
///     Point::new(110.0, 40.0),
///     Point::new(10.0, 40.0),
/// ]);
/// assert_eq!(quad_bounding_rect(&contour, 0.02), Some(Rect::new(10.0, 10.0, 100.0, 30.0)));
/// ```
pub fn quad_bounding_rect(contour: &Contour, epsilon_fraction: f64) -> Option<Rect> {
    if contour.points.len() < 4 {
        return None;
    }
    let epsilon = epsilon_fraction * contour.perimeter();
    let poly = approximate_polygon(&contour.points, epsilon, true);
    if poly.len() != 4 || !is_convex(&poly) {
        return None;
    }
    Rect::bounding(&poly)
}

/// Boxes extracted from traced contours.
#[derive(Debug, Clone, Copy)]
pub struct ContourBoxSource<'a> {
    contours: &'a [Contour],
}

impl<'a> ContourBoxSource<'a> {
    /// Wrap a page's contours.
    pub fn new(contours: &'a [Contour]) -> Self {
        Self { contours }
    }
}

impl BoxSource for ContourBoxSource<'_> {
    fn name(&self) -> &'static str {
        "contours"
    }

    fn detect(&self, config: &LocatorConfig) -> (Vec<Rect>, BoxStats) {
        let quads: Vec<Rect> = self
            .contours
            .iter()
            .filter_map(|c| quad_bounding_rect(c, config.contours.epsilon_fraction))
            .collect();
        let rects = BoxFilter::new(config.filter.clone()).apply_rects(&quads);
        log::debug!(
            "contour source: {} contours -> {} quadrilaterals -> {} boxes",
            self.contours.len(),
            quads.len(),
            rects.len()
        );
        let stats = BoxStats {
            rejected_contours: self.contours.len() - quads.len(),
            candidates: quads.len(),
            boxes: rects.len(),
            ..Default::default()
        };
        (rects, stats)
    }
}
