use crate::contour::Contour;
use crate::geom::utils::{normalize, sign};
use crate::geom::{EdgeColor, EdgeSegment, Point, Vector};
use crate::shape::Shape;

use crate::geom::arrayvec::ArrayVec;

/// Parameters for [`Shape::normalize_with_options`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct NormalizeOptions {
    /// Edges whose control points all lie within this distance of their start are
    /// removed, and gaps between consecutive edges up to this size are closed by
    /// moving the start of the next edge.
    ///
    /// Default value: `NormalizeOptions::DEFAULT_TOLERANCE`.
    pub tolerance: f64,

    /// Reverse contours so that outer contours have winding `1` and holes winding `-1`.
    ///
    /// Default value: `false`.
    pub orient_contours: bool,
}

impl NormalizeOptions {
    /// Default tolerance.
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    pub const DEFAULT: Self = NormalizeOptions {
        tolerance: Self::DEFAULT_TOLERANCE,
        orient_contours: false,
    };

    #[inline]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[inline]
    pub const fn with_orient_contours(mut self, orient: bool) -> Self {
        self.orient_contours = orient;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// Joins whose directions have a dot product below this minus one are convergent.
const CORNER_DOT_EPSILON: f64 = 0.000001;
// Moves the control points a bit more than necessary to absorb rounding errors.
const DECONVERGE_OVERSHOOT: f64 = 1.11111111111111111;

impl Shape {
    /// Repairs the shape so that it can be used by the generators.
    ///
    /// Equivalent to `normalize_with_options(&NormalizeOptions::DEFAULT)`.
    pub fn normalize(&mut self) {
        self.normalize_with_options(&NormalizeOptions::DEFAULT);
    }

    /// Repairs the shape so that it can be used by the generators.
    ///
    /// For each contour, in order:
    ///
    /// 1. edges with non-finite coordinates are removed,
    /// 2. degenerate edges are removed, unless the contour has nothing else,
    /// 3. gaps between consecutive edges are closed,
    /// 4. a contour made of a single edge is split in three,
    /// 5. joins where the outline turns back on itself are pushed apart so that the
    ///    two edges can be told apart by their distances.
    ///
    /// Finally, contours are oriented if requested. Normalizing a normalized shape
    /// does not change it.
    pub fn normalize_with_options(&mut self, options: &NormalizeOptions) {
        let mut repairs = 0;
        for contour in &mut self.contours {
            repairs += normalize_contour(contour, options.tolerance);
        }

        if repairs > 0 {
            log::debug!("normalize: {} repairs in {} contours", repairs, self.contours.len());
        }

        if options.orient_contours {
            self.orient_contours();
        }
    }
}

// Returns the number of changes.
fn normalize_contour(contour: &mut Contour, tolerance: f64) -> usize {
    let initial_len = contour.edges.len();
    contour.edges.retain(EdgeSegment::is_finite);
    if contour.edges.iter().any(|edge| !edge.is_degenerate(tolerance)) {
        contour.edges.retain(|edge| !edge.is_degenerate(tolerance));
    }
    let mut repairs = initial_len - contour.edges.len();

    repairs += close_gaps(contour, tolerance);

    if contour.edges.len() == 1 {
        let parts = contour.edges[0].split_in_thirds();
        contour.edges.clear();
        contour.edges.extend_from_slice(&parts);
        repairs += 1;
    }

    repairs + deconverge_joins(contour)
}

fn close_gaps(contour: &mut Contour, tolerance: f64) -> usize {
    let mut repairs = 0;
    let mut i = 0;
    while i < contour.edges.len() {
        let next = (i + 1) % contour.edges.len();
        let end = contour.edges[i].end();
        let start = contour.edges[next].start();
        let gap = (start - end).length();
        if gap > tolerance {
            // A linear edge is inserted and skipped over.
            let bridge = EdgeSegment::linear(end, start, EdgeColor::White);
            contour.edges.insert(i + 1, bridge);
            repairs += 1;
            i += 1;
        } else if start != end {
            contour.edges[next].move_start_point(end);
            repairs += 1;
        }
        i += 1;
    }

    repairs
}

fn deconverge_joins(contour: &mut Contour) -> usize {
    let n = contour.edges.len();
    if n < 2 {
        return 0;
    }

    let mut repairs = 0;
    let mut prev = n - 1;
    for i in 0..n {
        let prev_dir = normalize(contour.edges[prev].direction(1.0));
        let cur_dir = normalize(contour.edges[i].direction(0.0));
        if prev_dir.dot(cur_dir) < CORNER_DOT_EPSILON - 1.0 {
            let e = CORNER_DOT_EPSILON - 1.0;
            let factor = DECONVERGE_OVERSHOOT * (1.0 - e * e).sqrt() / e;
            let mut axis = normalize(cur_dir - prev_dir) * factor;
            if convergent_curve_ordering(&contour.edges[prev], &contour.edges[i]) < 0 {
                axis = -axis;
            }
            deconverge_edge(&mut contour.edges[prev], 1, vector_orthogonal(axis, true));
            deconverge_edge(&mut contour.edges[i], 0, vector_orthogonal(axis, false));
            repairs += 1;
        }
        prev = i;
    }

    repairs
}

fn vector_orthogonal(v: Vector, polarity: bool) -> Vector {
    if polarity {
        Vector::new(-v.y, v.x)
    } else {
        Vector::new(v.y, -v.x)
    }
}

// Nudges the control point next to the start (0) or end (1) of a curved edge
// sideways. Quadratic edges are converted to cubic ones first. Linear edges cannot
// be bent and are left as is.
fn deconverge_edge(edge: &mut EdgeSegment, end: u8, offset: Vector) {
    edge.convert_to_cubic();
    if let crate::geom::Curve::Cubic(cubic) = &mut edge.curve {
        if end == 0 {
            cubic.ctrl1 += offset * (cubic.ctrl1 - cubic.from).length();
        } else {
            cubic.ctrl2 += offset * (cubic.ctrl2 - cubic.to).length();
        }
    }
}

// Control points with the ones that don't bend the curve removed.
fn simplified_control_points(edge: &EdgeSegment) -> ArrayVec<Point, 4> {
    let mut points = edge.control_points();
    if points.len() == 4
        && (points[1] == points[0] || points[1] == points[3])
        && (points[2] == points[0] || points[2] == points[3])
    {
        points.drain(1..3);
    }
    if points.len() == 3 && (points[1] == points[0] || points[1] == points[2]) {
        points.remove(1);
    }
    if points.len() == 2 && points[0] == points[1] {
        points.pop();
    }

    points
}

// Derivative terms of a curve leaving `corner` through `points`, the control points
// after the corner ordered by increasing distance along the curve.
fn leaving_terms(corner: Point, points: &[Point]) -> (Vector, Vector, Vector) {
    let order = points.len();
    let mut d1 = Vector::zero();
    let mut d2 = Vector::zero();
    let mut d3 = Vector::zero();
    if order >= 1 {
        d1 = points[0] - corner;
    }
    if order >= 2 {
        d2 = points[1] - points[0] - d1;
    }
    if order >= 3 {
        d3 = points[2] - points[1] - (points[1] - points[0]) - d2;
        d2 *= 3.0;
    }
    d1 *= order as f64;

    (d1, d2, d3)
}

/// Which of two curves meeting at a convergent join lies on which side near the join.
///
/// Looks at the first non-vanishing derivative of the cross product between the
/// vectors from the corner to the point at parameter `t` along each curve away from
/// the corner. Returns `1`, `-1` or `0` when the curves can't be told apart.
fn convergent_curve_ordering(before: &EdgeSegment, after: &EdgeSegment) -> i32 {
    let corner = after.start();
    if before.end() != corner {
        return 0;
    }

    // The control points of both curves, away from the corner.
    let mut a_points = simplified_control_points(before);
    let b_points = simplified_control_points(after);
    a_points.pop();
    if a_points.is_empty() || b_points.len() < 2 {
        return 0;
    }
    a_points.reverse();

    let (mut a1, mut a2, mut a3) = leaving_terms(corner, &a_points);
    let (mut b1, mut b2, mut b3) = leaving_terms(corner, &b_points[1..]);

    let zero = Vector::zero();
    if a1 != zero && b1 != zero {
        let a_len = a1.length();
        let b_len = b1.length();
        let candidates = [
            a_len * a1.cross(b2) + b_len * a2.cross(b1),
            a_len * a_len * a1.cross(b3) + a_len * b_len * a2.cross(b2) + b_len * b_len * a3.cross(b1),
            a_len * a2.cross(b3) + b_len * a3.cross(b2),
        ];
        return first_sign(&candidates).unwrap_or_else(|| sign(a3.cross(b3)));
    }

    let mut s = 1;
    if a1 != zero {
        // Degenerate after the corner: swap the curves and flip the result.
        core::mem::swap(&mut a1, &mut b1);
        core::mem::swap(&mut a2, &mut b2);
        core::mem::swap(&mut a3, &mut b3);
        s = -1;
    }

    if b1 != zero {
        let candidates = [
            a3.cross(b1),
            a2.cross(b2),
            a3.cross(b2),
            a2.cross(b3),
        ];
        return s * first_sign(&candidates).unwrap_or_else(|| sign(a3.cross(b3)));
    }

    let d = a2.length().sqrt() * a2.cross(b3) + b2.length().sqrt() * a3.cross(b2);
    if d != 0.0 {
        return sign(d);
    }

    sign(a3.cross(b3))
}

fn first_sign(candidates: &[f64]) -> Option<i32> {
    candidates.iter().find(|d| **d != 0.0).map(|d| sign(*d))
}

#[cfg(test)]
use crate::contour::polygon;
#[cfg(test)]
use crate::geom::point;

#[test]
fn close_small_and_large_gaps() {
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    contour.add_edge(EdgeSegment::linear(point(0.0, 0.0), point(0.0, 1.0), EdgeColor::White));
    // Small gap.
    contour.add_edge(EdgeSegment::linear(
        point(0.0, 1.0 + 1e-12),
        point(1.0, 1.0),
        EdgeColor::White,
    ));
    // Large gap, and the contour isn't closed.
    contour.add_edge(EdgeSegment::linear(point(1.0, 0.5), point(1.0, 0.0), EdgeColor::White));

    assert!(!shape.validate());
    shape.normalize();
    assert!(shape.validate());

    let edges = &shape.contours[0].edges;
    assert_eq!(edges.len(), 5);
    assert_eq!(edges[1].start(), point(0.0, 1.0));
    assert_eq!(edges[2].start(), point(1.0, 1.0));
    assert_eq!(edges[2].end(), point(1.0, 0.5));
    assert_eq!(edges[4].start(), point(1.0, 0.0));
    assert_eq!(edges[4].end(), point(0.0, 0.0));
}

#[test]
fn drop_broken_edges() {
    let mut shape = Shape::new();
    let mut contour = polygon(&[point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0)]);
    contour.edges.insert(
        1,
        EdgeSegment::linear(point(0.0, 1.0), point(0.0, 1.0), EdgeColor::White),
    );
    contour.edges.insert(
        2,
        EdgeSegment::linear(point(0.0, 1.0), point(f64::NAN, 1.0), EdgeColor::White),
    );
    shape.add_contour(contour);

    shape.normalize();
    assert!(shape.validate());
    assert_eq!(shape.contours[0].edges.len(), 3);
    assert!(shape.contours[0].edges.iter().all(|e| e.is_finite()));
}

#[test]
fn split_single_edge_contour() {
    let mut shape = Shape::new();
    shape.add_empty_contour().add_edge(EdgeSegment::cubic(
        point(0.0, 0.0),
        point(-2.0, 3.0),
        point(2.0, 3.0),
        point(0.0, 0.0),
        EdgeColor::White,
    ));

    shape.normalize();
    assert_eq!(shape.contours[0].edges.len(), 3);
    assert!(shape.validate());
}

#[test]
fn normalize_is_idempotent() {
    let mut shape = Shape::new();
    // A spike: the outline goes up and comes back down along the same line.
    shape.add_empty_contour().edges.extend_from_slice(&[
        EdgeSegment::linear(point(0.0, 0.0), point(2.0, 0.0), EdgeColor::White),
        EdgeSegment::quadratic(point(2.0, 0.0), point(2.0, 3.0), point(1.0, 4.0), EdgeColor::White),
        EdgeSegment::quadratic(point(1.0, 4.0), point(0.5, 4.5), point(0.0, 5.0), EdgeColor::White),
        EdgeSegment::quadratic(point(0.0, 5.0), point(0.5, 4.5), point(0.25, 2.0), EdgeColor::White),
        EdgeSegment::linear(point(0.25, 2.0), point(0.0, 0.0), EdgeColor::White),
    ]);

    shape.normalize();
    let once = shape.clone();
    shape.normalize();
    assert_eq!(shape, once);

    // The convergent join at the tip was pushed apart.
    let edges = &once.contours[0].edges;
    let incoming = normalize(edges[2].direction(1.0));
    let outgoing = normalize(edges[3].direction(0.0));
    assert!(incoming.dot(outgoing) >= CORNER_DOT_EPSILON - 1.0);
    assert_eq!(edges[3].start(), point(0.0, 5.0));
}

#[test]
fn curve_ordering() {
    // Two curves leaving the same corner towards +x, one bending up, one bending down.
    let corner = point(0.0, 0.0);
    let before = EdgeSegment::quadratic(point(2.0, 1.0), point(1.0, 0.0), corner, EdgeColor::White);
    let after = EdgeSegment::quadratic(corner, point(1.0, 0.0), point(2.0, -1.0), EdgeColor::White);
    let ordering = convergent_curve_ordering(&before, &after);
    assert_ne!(ordering, 0);

    let mirrored_before =
        EdgeSegment::quadratic(point(2.0, -1.0), point(1.0, 0.0), corner, EdgeColor::White);
    let mirrored_after =
        EdgeSegment::quadratic(corner, point(1.0, 0.0), point(2.0, 1.0), EdgeColor::White);
    assert_eq!(convergent_curve_ordering(&mirrored_before, &mirrored_after), -ordering);

    // Not joined.
    let apart = EdgeSegment::linear(point(5.0, 5.0), point(6.0, 6.0), EdgeColor::White);
    assert_eq!(convergent_curve_ordering(&apart, &after), 0);
}
