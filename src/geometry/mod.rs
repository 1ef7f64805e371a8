//! Geometric primitives for symbol detection.
//!
//! This module provides the point and rectangle types shared by every stage
//! of the locator, plus the polygon helpers used by box reconstruction and
//! contour simplification.
//!
//! Coordinates are `f64`: line extension multiplies page coordinates by
//! several thousand before intersecting, which `f32` cannot carry.

mod polygon;
mod segment;

pub use polygon::{approximate_polygon, arc_length, is_convex, polygon_area};
pub use segment::{intersection, ExtendedLine, LineSegment, Orientation};

use serde::{Deserialize, Serialize};

/// A location in page units (points) or image units (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position, growing rightwards
    pub x: f64,
    /// Vertical position, growing downwards
    pub y: f64,
}

impl Point {
    /// Point at `(x, y)`.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned box: symbol boxes, span and glyph bounds, path extents.
///
/// Stored as origin plus size; `y` grows downwards, so `(x, y)` is the
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Rect {
    /// Box with its top-left corner at `(x, y)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 20.0);
    /// ```
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box spanning `x0..x1` horizontally and `y0..y1` vertically.
    ///
    /// This is how collaborators report bounds. Inverted bounds give a
    /// negative size, which input validation rejects.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty slice.
    pub fn bounding(points: &[Point]) -> Option<Rect> {
        let first = points.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        Some(Rect::from_points(x0, y0, x1, y1))
    }

    /// Smallest x.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Largest x.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Smallest y.
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Largest y.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Midpoint of the box.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::geometry::Rect;
    ///
    /// let center = Rect::new(0.0, 0.0, 100.0, 20.0).center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 10.0);
    /// ```
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Whether `p` lies inside the box, edges and corners included.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::geometry::{Point, Rect};
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
    /// assert!(rect.contains_point(&Point::new(100.0, 20.0)));
    /// assert!(!rect.contains_point(&Point::new(100.5, 10.0)));
    /// ```
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Whether the two boxes share any point; touching edges count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_points(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Width times height.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Bounds `(x0, y0, x1, y1)` snapped to multiples of `grid`.
    ///
    /// Used as the identity of a rectangle when deduplicating.
    pub fn snapped_bounds(&self, grid: f64) -> (i64, i64, i64, i64) {
        let snap = |v: f64| (v / grid).round() as i64;
        (snap(self.left()), snap(self.top()), snap(self.right()), snap(self.bottom()))
    }
}

/// Straight-line distance between two points.
pub fn euclidean_distance(p1: &Point, p2: &Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let cell = Rect::new(0.0, 0.0, 100.0, 20.0);
        assert!(cell.intersects(&Rect::new(90.0, 10.0, 20.0, 20.0)));
        assert!(cell.intersects(&Rect::new(100.0, 20.0, 5.0, 5.0))); // corner touch
        assert!(cell.intersects(&Rect::new(40.0, 5.0, 20.0, 10.0)));
        assert!(!cell.intersects(&Rect::new(0.0, 20.5, 100.0, 20.0)));
        assert!(!Rect::new(101.0, 0.0, 5.0, 5.0).intersects(&cell));
    }

    #[test]
    fn test_span_bounds_and_edges() {
        // Span bounds as a collaborator reports them
        let r = Rect::from_points(40.0, 5.0, 60.0, 15.0);
        assert_eq!(r, Rect::new(40.0, 5.0, 20.0, 10.0));
        assert_eq!((r.left(), r.top(), r.right(), r.bottom()), (40.0, 5.0, 60.0, 15.0));
        assert_eq!(r.center(), Point::new(50.0, 10.0));
    }

    #[test]
    fn test_rect_bounding() {
        let points = [
            Point::new(5.0, 9.0),
            Point::new(-1.0, 3.0),
            Point::new(4.0, 12.0),
        ];
        let r = Rect::bounding(&points).unwrap();
        assert_eq!(r, Rect::from_points(-1.0, 3.0, 5.0, 12.0));
        assert!(Rect::bounding(&[]).is_none());
    }

    #[test]
    fn test_rect_contains_point_inclusive_edges() {
        let r = Rect::new(0.0, 0.0, 100.0, 20.0);
        // Edge case: every edge and corner counts as inside
        assert!(r.contains_point(&Point::new(0.0, 10.0)));
        assert!(r.contains_point(&Point::new(100.0, 10.0)));
        assert!(r.contains_point(&Point::new(50.0, 0.0)));
        assert!(r.contains_point(&Point::new(50.0, 20.0)));
        assert!(r.contains_point(&Point::new(0.0, 0.0)));
        assert!(r.contains_point(&Point::new(100.0, 20.0)));
        assert!(!r.contains_point(&Point::new(-0.01, 10.0)));
        assert!(!r.contains_point(&Point::new(50.0, 20.01)));
    }

    #[test]
    fn test_union_of_degree_circle_and_numeral() {
        let circle = Rect::from_points(10.0, 10.0, 12.0, 12.0);
        let numeral = Rect::from_points(2.0, 9.0, 9.0, 15.0);
        let both = circle.union(&numeral);
        assert_eq!(both, Rect::from_points(2.0, 9.0, 12.0, 15.0));
        assert_eq!(both.area(), 60.0);
    }

    #[test]
    fn test_snapped_bounds() {
        let a = Rect::new(10.2, 19.8, 100.1, 20.0);
        let b = Rect::new(9.9, 20.1, 100.0, 19.9);
        assert_eq!(a.snapped_bounds(1.0), b.snapped_bounds(1.0));
        assert_ne!(a.snapped_bounds(0.1), b.snapped_bounds(0.1));
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&Point::new(0.0, 0.0), &Point::new(3.0, 4.0)), 5.0);
        assert_eq!(euclidean_distance(&Point::new(-2.0, 7.0), &Point::new(-2.0, 7.0)), 0.0);
    }
}
