//! 2D geometry utilities for plan editing.
//!
//! Pure functions shared by area detection, wall splitting, and the merge
//! operation: distances, segment intersection, projection, and polygon
//! measures.

use super::{Point2, EPSILON};

/// Determinant threshold below which two segments count as parallel.
const PARALLEL_EPSILON: f64 = 1e-4;

// =============================================================================
// Point Operations
// =============================================================================

/// Compute squared distance between two 2D points.
#[inline]
pub fn distance_squared(p1: Point2, p2: Point2) -> f64 {
    let dx = p2[0] - p1[0];
    let dy = p2[1] - p1[1];
    dx * dx + dy * dy
}

/// Compute distance between two 2D points.
#[inline]
pub fn distance(p1: Point2, p2: Point2) -> f64 {
    distance_squared(p1, p2).sqrt()
}

/// Linear interpolation between two 2D points.
#[inline]
pub fn lerp(p1: Point2, p2: Point2, t: f64) -> Point2 {
    [p1[0] + t * (p2[0] - p1[0]), p1[1] + t * (p2[1] - p1[1])]
}

/// True when both coordinates differ by at most `tolerance`.
#[inline]
pub fn within_box(p1: Point2, p2: Point2, tolerance: f64) -> bool {
    (p1[0] - p2[0]).abs() <= tolerance && (p1[1] - p2[1]).abs() <= tolerance
}

/// Snap a coordinate to the nearest multiple of `step`. Halfway values
/// round up, towards positive infinity.
#[inline]
pub fn round_to_grid(value: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return value;
    }
    (value / step + 0.5).floor() * step
}

// =============================================================================
// Line Segment Operations
// =============================================================================

/// Find parameter t where point projects onto the line through a segment.
/// Returns t such that point ≈ start + t * (end - start).
pub fn project_point_on_line(start: Point2, end: Point2, point: Point2) -> f64 {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    let len_sq = dx * dx + dy * dy;

    if len_sq < EPSILON * EPSILON {
        return 0.0;
    }

    ((point[0] - start[0]) * dx + (point[1] - start[1]) * dy) / len_sq
}

/// Compute closest point on a segment to a given point.
pub fn closest_point_on_segment(start: Point2, end: Point2, point: Point2) -> Point2 {
    let t = project_point_on_line(start, end, point).clamp(0.0, 1.0);
    lerp(start, end, t)
}

/// Distance from a point to the closest point of a segment.
pub fn point_to_segment_distance(start: Point2, end: Point2, point: Point2) -> f64 {
    distance(point, closest_point_on_segment(start, end, point))
}

/// Intersection point of two segments `p1-p2` and `p3-p4`.
///
/// Parallel and coincident segments have no intersection. Touching at an
/// endpoint counts (t and u are accepted on the closed interval [0, 1]).
pub fn segment_intersection(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    let denom = (p1[0] - p2[0]) * (p3[1] - p4[1]) - (p1[1] - p2[1]) * (p3[0] - p4[0]);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t = ((p1[0] - p3[0]) * (p3[1] - p4[1]) - (p1[1] - p3[1]) * (p3[0] - p4[0])) / denom;
    let u = -((p1[0] - p2[0]) * (p1[1] - p3[1]) - (p1[1] - p2[1]) * (p1[0] - p3[0])) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(lerp(p1, p2, t))
    } else {
        None
    }
}

// =============================================================================
// Polygon Operations
// =============================================================================

/// Signed area of a polygon using the Shoelace formula.
///
/// With y pointing down, a positive result is the winding that area
/// detection produces for bounded faces.
pub fn polygon_signed_area(vertices: &[Point2]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += vertices[i][0] * vertices[j][1];
        area -= vertices[j][0] * vertices[i][1];
    }
    area / 2.0
}

/// Absolute area of a polygon.
pub fn polygon_area(vertices: &[Point2]) -> f64 {
    polygon_signed_area(vertices).abs()
}

// =============================================================================
// Tests
// =============================================================================
