//! Line segments, their extension to long rays, and pairwise intersection.

use serde::{Deserialize, Serialize};

use super::Point;

/// Axis orientation of a segment relative to a degree tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Within tolerance of 0° or 180°
    Horizontal,
    /// Within tolerance of 90° or -90°
    Vertical,
    /// Anything else (diagonals)
    Other,
}

/// A detected line segment from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    /// Start x
    pub x1: f64,
    /// Start y
    pub y1: f64,
    /// End x
    pub x2: f64,
    /// End y
    pub y2: f64,
}

impl LineSegment {
    /// Create a segment from its two endpoints.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Euclidean length of the segment.
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// Signed angle of the direction vector in degrees, in `(-180, 180]`.
    ///
    /// Returns `None` for zero-length or non-finite segments, whose direction
    /// is undefined.
    pub fn angle_degrees(&self) -> Option<f64> {
        if !self.is_finite() || self.length() == 0.0 {
            return None;
        }
        Some((self.y2 - self.y1).atan2(self.x2 - self.x1).to_degrees())
    }

    /// Classify the segment against the axes.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::geometry::{LineSegment, Orientation};
    ///
    /// let seg = LineSegment::new(0.0, 0.0, 100.0, 3.0);
    /// assert_eq!(seg.orientation(10.0), Some(Orientation::Horizontal));
    /// assert_eq!(LineSegment::new(5.0, 5.0, 5.0, 5.0).orientation(10.0), None);
    /// ```
    pub fn orientation(&self, tolerance_deg: f64) -> Option<Orientation> {
        let angle = self.angle_degrees()?;
        let orientation = if angle.abs() < tolerance_deg || angle.abs() > 180.0 - tolerance_deg {
            Orientation::Horizontal
        } else if (angle - 90.0).abs() < tolerance_deg || (angle + 90.0).abs() < tolerance_deg {
            Orientation::Vertical
        } else {
            Orientation::Other
        };
        Some(orientation)
    }

    /// Push both endpoints outward by `reach` units along the segment's direction.
    ///
    /// A zero-length segment is returned unchanged; it never intersects anything.
    pub fn extend(&self, reach: f64) -> ExtendedLine {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return ExtendedLine {
                start: Point::new(self.x1, self.y1),
                end: Point::new(self.x2, self.y2),
            };
        }
        let ux = (self.x2 - self.x1) / len;
        let uy = (self.y2 - self.y1) / len;
        ExtendedLine {
            start: Point::new(self.x1 - ux * reach, self.y1 - uy * reach),
            end: Point::new(self.x2 + ux * reach, self.y2 + uy * reach),
        }
    }
}

/// A segment stretched far past its endpoints.
///
/// Only lives while boxes are being reconstructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedLine {
    /// First endpoint after extension
    pub start: Point,
    /// Second endpoint after extension
    pub end: Point,
}

impl ExtendedLine {
    fn length(&self) -> f64 {
        (self.end.x - self.start.x).hypot(self.end.y - self.start.y)
    }
}

/// Intersect the infinite lines through two extended segments.
///
/// Solves the 2×2 system through its determinant. When the determinant is
/// within `epsilon` of zero, relative to the product of the two lengths (so
/// `epsilon` bounds the sine of the angle between the lines), the lines are
/// treated as parallel and no point is returned. The intersection is rounded
/// to integer coordinates; results that are not finite or do not fit in
/// `i32` are rejected as well.
///
/// # Examples
///
/// ```
/// use weldmark::geometry::{intersection, LineSegment};
///
/// let h = LineSegment::new(0.0, 20.0, 100.0, 20.0).extend(1000.0);
/// let v = LineSegment::new(30.0, 0.0, 30.0, 5.0).extend(1000.0);
/// assert_eq!(intersection(&h, &v, 1e-6), Some((30, 20)));
///
/// let h2 = LineSegment::new(0.0, 40.0, 100.0, 40.0).extend(1000.0);
/// assert_eq!(intersection(&h, &h2, 1e-6), None);
/// ```
pub fn intersection(a: &ExtendedLine, b: &ExtendedLine, epsilon: f64) -> Option<(i32, i32)> {
    let (x1, y1, x2, y2) = (a.start.x, a.start.y, a.end.x, a.end.y);
    let (x3, y3, x4, y4) = (b.start.x, b.start.y, b.end.x, b.end.y);

    let scale = a.length() * b.length();
    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if scale.is_nan() || scale <= 0.0 || denom.abs() <= epsilon * scale {
        return None;
    }

    let cross_a = x1 * y2 - y1 * x2;
    let cross_b = x3 * y4 - y3 * x4;
    let px = (cross_a * (x3 - x4) - (x1 - x2) * cross_b) / denom;
    let py = (cross_a * (y3 - y4) - (y1 - y2) * cross_b) / denom;

    let (px, py) = (px.round(), py.round());
    let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
    if !range.contains(&px) || !range.contains(&py) {
        return None;
    }
    Some((px as i32, py as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_buckets() {
        let tol = 10.0;
        assert_eq!(
            LineSegment::new(0.0, 0.0, 10.0, 0.0).orientation(tol),
            Some(Orientation::Horizontal)
        );
        // Reversed direction is still horizontal (angle 180°)
        assert_eq!(
            LineSegment::new(10.0, 0.0, 0.0, 1.0).orientation(tol),
            Some(Orientation::Horizontal)
        );
        assert_eq!(
            LineSegment::new(0.0, 0.0, 0.0, 10.0).orientation(tol),
            Some(Orientation::Vertical)
        );
        assert_eq!(
            LineSegment::new(0.0, 10.0, 1.0, 0.0).orientation(tol),
            Some(Orientation::Vertical)
        );
        assert_eq!(
            LineSegment::new(0.0, 0.0, 10.0, 10.0).orientation(tol),
            Some(Orientation::Other)
        );
    }

    #[test]
    fn test_orientation_tolerance_boundary() {
        let angle = 10.5f64.to_radians();
        let seg = LineSegment::new(0.0, 0.0, angle.cos() * 100.0, angle.sin() * 100.0);
        assert_eq!(seg.orientation(10.0), Some(Orientation::Other));
        assert_eq!(seg.orientation(11.0), Some(Orientation::Horizontal));
    }

    #[test]
    fn test_zero_length_and_nan_have_no_orientation() {
        assert_eq!(LineSegment::new(3.0, 3.0, 3.0, 3.0).orientation(10.0), None);
        assert_eq!(LineSegment::new(f64::NAN, 0.0, 1.0, 0.0).orientation(10.0), None);
    }

    #[test]
    fn test_extend_keeps_direction() {
        let ext = LineSegment::new(10.0, 5.0, 20.0, 5.0).extend(100.0);
        assert_eq!(ext.start, Point::new(-90.0, 5.0));
        assert_eq!(ext.end, Point::new(120.0, 5.0));
    }

    #[test]
    fn test_intersection_of_perpendicular_lines() {
        let h = LineSegment::new(0.0, 0.0, 100.0, 0.0).extend(20_000.0);
        let v = LineSegment::new(100.0, 0.0, 100.0, 20.0).extend(20_000.0);
        assert_eq!(intersection(&h, &v, 1e-6), Some((100, 0)));
    }

    #[test]
    fn test_intersection_beyond_segment_endpoints() {
        // The vertical segment stops well short of the horizontal one
        let h = LineSegment::new(0.0, 50.0, 10.0, 50.0).extend(20_000.0);
        let v = LineSegment::new(500.0, 0.0, 500.0, 5.0).extend(20_000.0);
        assert_eq!(intersection(&h, &v, 1e-6), Some((500, 50)));
    }

    #[test]
    fn test_parallel_and_near_parallel_lines() {
        let a = LineSegment::new(0.0, 0.0, 100.0, 0.0).extend(20_000.0);
        let b = LineSegment::new(0.0, 10.0, 100.0, 10.0).extend(20_000.0);
        assert_eq!(intersection(&a, &b, 1e-6), None);

        // Collinear
        let c = LineSegment::new(200.0, 0.0, 300.0, 0.0).extend(20_000.0);
        assert_eq!(intersection(&a, &c, 1e-6), None);

        // sin(angle) ≈ 1e-7, below epsilon
        let d = LineSegment::new(0.0, 10.0, 1_000.0, 10.0001).extend(20_000.0);
        assert_eq!(intersection(&a, &d, 1e-6), None);
    }

    #[test]
    fn test_zero_length_never_intersects() {
        let a = LineSegment::new(0.0, 0.0, 100.0, 0.0).extend(20_000.0);
        let p = LineSegment::new(5.0, 5.0, 5.0, 5.0).extend(20_000.0);
        assert_eq!(intersection(&a, &p, 1e-6), None);
    }
}
