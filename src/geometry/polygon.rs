//! Polygon measures and Douglas-Peucker simplification.

use super::{euclidean_distance, Point};

/// Enclosed area of a simple polygon (shoelace formula, absolute value).
///
/// # Examples
///
/// ```
/// use weldmark::geometry::{polygon_area, Point};
///
/// let square = [
///     Point::new(0.0, 0.0),
///     Point::new(100.0, 0.0),
///     Point::new(100.0, 20.0),
///     Point::new(0.0, 20.0),
/// ];
/// assert_eq!(polygon_area(&square), 2000.0);
/// ```
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    (twice / 2.0).abs()
}

/// Length of a polyline, including the closing edge when `closed`.
pub fn arc_length(points: &[Point], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let open: f64 = points
        .windows(2)
        .map(|w| euclidean_distance(&w[0], &w[1]))
        .sum();
    if closed {
        open + euclidean_distance(&points[points.len() - 1], &points[0])
    } else {
        open
    }
}

/// Whether a polygon is strictly convex.
///
/// Every turn must go the same way; a zero-length edge or a straight angle
/// disqualifies the polygon.
pub fn is_convex(points: &[Point]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let cross = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if cross == 0.0 {
            return false;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

/// Simplify a polyline with the Douglas-Peucker algorithm.
///
/// Points farther than `epsilon` from the chord of their span are kept. For
/// a `closed` contour the ring is split at two mutually distant points (for
/// a rectangle, opposite corners) and both halves are simplified, so the
/// result does not depend on where the contour tracer started.
pub fn approximate_polygon(points: &[Point], epsilon: f64, closed: bool) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    if !closed {
        return simplify_open(points, epsilon);
    }

    let a = farthest_from(points, &points[0]);
    let b = farthest_from(points, &points[a]);
    if a == b {
        return vec![points[a]];
    }
    let (lo, hi) = (a.min(b), a.max(b));

    let first = simplify_open(&points[lo..=hi], epsilon);
    let mut wrap: Vec<Point> = points[hi..].to_vec();
    wrap.extend_from_slice(&points[..=lo]);
    let second = simplify_open(&wrap, epsilon);

    let mut ring = first;
    // Both halves share their endpoints; drop the duplicates
    ring.extend_from_slice(&second[1..second.len() - 1]);
    ring
}

fn farthest_from(points: &[Point], origin: &Point) -> usize {
    let mut best = 0;
    let mut best_dist = -1.0;
    for (i, p) in points.iter().enumerate() {
        let d = euclidean_distance(origin, p);
        if d > best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn simplify_open(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end - start <= 1 {
            continue;
        }

        let mut max_dist = 0.0;
        let mut max_index = start;
        for i in (start + 1)..end {
            let dist = perpendicular_distance(&points[i], &points[start], &points[end]);
            if dist > max_dist {
                max_dist = dist;
                max_index = i;
            }
        }

        if max_dist > epsilon {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn perpendicular_distance(point: &Point, start: &Point, end: &Point) -> f64 {
    let a = end.y - start.y;
    let b = start.x - end.x;
    let c = end.x * start.y - start.x * end.y;

    let norm = a.hypot(b);
    if norm == 0.0 {
        return euclidean_distance(point, start);
    }
    (a * point.x + b * point.y + c).abs() / norm
}
