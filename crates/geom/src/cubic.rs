use crate::bounds::Bounds;
use crate::math::{Point, Vector};
use crate::signed_distance::SignedDistance;
use crate::utils::{non_zero_sign, solve_cubic, solve_quadratic};
use crate::ScanlineIntersections;

use core::mem::swap;
use core::ops::Range;

/// Number of evenly spaced starting points of the nearest point search, minus one.
pub const CUBIC_SEARCH_STARTS: u32 = 4;
/// Maximum number of Newton iterations per starting point.
pub const CUBIC_SEARCH_STEPS: u32 = 16;
/// The search stops once a Newton step moves t by less than this.
pub const CUBIC_SEARCH_TOLERANCE: f64 = 1e-9;

/// A 2d curve segment defined by four points: the beginning of the segment, two control
/// points and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)³ * from + 3 * (1 - t)² * t * ctrl1 + 3 * t² * (1 - t) * ctrl2 + t³ * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct CubicSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CubicSegment {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        let p12 = self.ctrl1.lerp(self.ctrl2, t);
        self.from
            .lerp(self.ctrl1, t)
            .lerp(p12, t)
            .lerp(p12.lerp(self.ctrl2.lerp(self.to, t), t), t)
    }

    /// The tangent of the curve at t.
    ///
    /// At an endpoint where the derivative vanishes because a control point
    /// coincides with it, the direction towards the next distinct control point is
    /// returned.
    pub fn direction(&self, t: f64) -> Vector {
        let a = self.ctrl1 - self.from;
        let b = self.ctrl2 - self.ctrl1;
        let c = self.to - self.ctrl2;
        let tangent = a.lerp(b, t).lerp(b.lerp(c, t), t);
        if tangent == Vector::zero() {
            if t == 0.0 {
                return self.ctrl2 - self.from;
            }
            if t == 1.0 {
                return self.to - self.ctrl1;
            }
        }

        tangent
    }

    /// The rate of change of the tangent at t.
    pub fn direction_change(&self, t: f64) -> Vector {
        let a = self.ctrl1 - self.from;
        let b = self.ctrl2 - self.ctrl1;
        let c = self.to - self.ctrl2;
        (b - a).lerp(c - b, t)
    }

    /// Swap the beginning and the end of the segment.
    pub fn flip(&mut self) {
        swap(&mut self.from, &mut self.to);
        swap(&mut self.ctrl1, &mut self.ctrl2);
    }

    /// Return the curve inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<f64>) -> Self {
        let (t0, t1) = (t_range.start, t_range.end);
        let from = self.sample(t0);
        let to = self.sample(t1);

        // The derivative is a quadratic curve over the control polygon's sides.
        let d0 = self.ctrl1 - self.from;
        let d1 = self.ctrl2 - self.ctrl1;
        let d2 = self.to - self.ctrl2;
        let derivative = |t: f64| d0.lerp(d1, t).lerp(d1.lerp(d2, t), t);

        let dt = t1 - t0;
        let ctrl1 = from + derivative(t0) * dt;
        let ctrl2 = to - derivative(t1) * dt;

        CubicSegment {
            from,
            ctrl1,
            ctrl2,
            to,
        }
    }

    /// Signed distance from `origin` to the curve, and the parameter of the nearest
    /// point.
    ///
    /// The nearest point is searched with Newton iterations started from evenly
    /// spaced parameters. As for quadratic curves, the parameter is extrapolated
    /// beyond `[0, 1]` when an endpoint wins.
    pub fn signed_distance(&self, origin: Point) -> (SignedDistance, f64) {
        let qa = self.from - origin;
        let ab = self.ctrl1 - self.from;
        let br = self.ctrl2 - self.ctrl1 - ab;
        let as_ = (self.to - self.ctrl2) - (self.ctrl2 - self.ctrl1) - br;

        let start_dir = self.direction(0.0);
        let mut min_distance = non_zero_sign(start_dir.cross(qa)) * qa.length();
        let mut param = -qa.dot(start_dir) / start_dir.square_length();

        let end_dir = self.direction(1.0);
        let to_end = self.to - origin;
        let end_distance = to_end.length();
        if end_distance < min_distance.abs() {
            min_distance = non_zero_sign(end_dir.cross(to_end)) * end_distance;
            param = (end_dir - to_end).dot(end_dir) / end_dir.square_length();
        }

        let offset = |t: f64| qa + ab * (3.0 * t) + br * (3.0 * t * t) + as_ * (t * t * t);
        let first_derivative = |t: f64| ab * 3.0 + br * (6.0 * t) + as_ * (3.0 * t * t);
        let second_derivative = |t: f64| br * 6.0 + as_ * (6.0 * t);
        let newton_step = |t: f64, qe: Vector, d1: Vector| {
            t - qe.dot(d1) / (d1.dot(d1) + qe.dot(second_derivative(t)))
        };

        for i in 0..=CUBIC_SEARCH_STARTS {
            let mut t = i as f64 / CUBIC_SEARCH_STARTS as f64;
            let mut qe = offset(t);
            let mut d1 = first_derivative(t);
            let mut improved_t = newton_step(t, qe, d1);
            if !(improved_t > 0.0 && improved_t < 1.0) {
                continue;
            }

            let mut remaining_steps = CUBIC_SEARCH_STEPS;
            loop {
                let step = (improved_t - t).abs();
                t = improved_t;
                qe = offset(t);
                d1 = first_derivative(t);
                remaining_steps -= 1;
                if remaining_steps == 0 || step < CUBIC_SEARCH_TOLERANCE {
                    break;
                }
                improved_t = newton_step(t, qe, d1);
                if !(improved_t > 0.0 && improved_t < 1.0) {
                    break;
                }
            }

            let distance = qe.length();
            if distance < min_distance.abs() {
                min_distance = non_zero_sign(d1.cross(qe)) * distance;
                param = t;
            }
        }

        let distance = if (0.0..=1.0).contains(&param) {
            SignedDistance::perpendicular(min_distance)
        } else if param < 0.5 {
            SignedDistance::at_endpoint(min_distance, start_dir, qa)
        } else {
            SignedDistance::at_endpoint(min_distance, end_dir, to_end)
        };

        (distance, param)
    }

    /// Intersections with the horizontal line at `y`, ordered along the curve.
    ///
    /// Follows the same conventions as
    /// [`QuadraticSegment::scanline_intersections`](crate::QuadraticSegment::scanline_intersections),
    /// with up to three crossings.
    pub fn scanline_intersections(&self, y: f64) -> ScanlineIntersections {
        let (p0, p1, p2, p3) = (self.from, self.ctrl1, self.ctrl2, self.to);
        let mut result = ScanlineIntersections::new();
        let mut next_dy = if y > p0.y { 1 } else { -1 };
        let mut pending_x = p0.x;

        if p0.y == y {
            let leaves_upward = p0.y < p1.y
                || (p0.y == p1.y && (p0.y < p2.y || (p0.y == p2.y && p0.y < p3.y)));
            if leaves_upward {
                result.push((pending_x, 1));
            } else {
                next_dy = 1;
            }
        }

        let ab = p1 - p0;
        let br = p2 - p1 - ab;
        let as_ = (p3 - p2) - (p2 - p1) - br;
        let mut roots = solve_cubic(as_.y, 3.0 * br.y, 3.0 * ab.y, p0.y - y);
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
        for t in roots {
            if result.len() >= 3 {
                break;
            }
            if (0.0..=1.0).contains(&t) {
                pending_x = p0.x + 3.0 * t * ab.x + 3.0 * t * t * br.x + t * t * t * as_.x;
                let slope = ab.y + 2.0 * t * br.y + t * t * as_.y;
                if f64::from(next_dy) * slope >= 0.0 {
                    result.push((pending_x, next_dy));
                    next_dy = -next_dy;
                }
            }
        }

        if p3.y == y {
            if next_dy > 0 {
                if let Some((x, _)) = result.pop() {
                    pending_x = x;
                    next_dy = -1;
                }
            }
            let ends_below = p3.y < p2.y
                || (p3.y == p2.y && (p3.y < p1.y || (p3.y == p1.y && p3.y < p0.y)));
            if ends_below && result.len() < 3 {
                pending_x = p3.x;
                if next_dy < 0 {
                    result.push((pending_x, -1));
                    next_dy = 1;
                }
            }
        }

        let end_dy = if y >= p3.y { 1 } else { -1 };
        if next_dy != end_dy && result.pop().is_none() {
            if (p3.y - y).abs() < (p0.y - y).abs() {
                pending_x = p3.x;
            }
            result.push((pending_x, next_dy));
        }

        result
    }

    /// Grow `bounds` to contain the curve, including its extrema.
    pub fn bound(&self, bounds: &mut Bounds) {
        bounds.include(self.from);
        bounds.include(self.to);

        let a0 = self.ctrl1 - self.from;
        let a1 = (self.ctrl2 - self.ctrl1 - a0) * 2.0;
        let a2 = self.to.to_vector() - self.ctrl2.to_vector() * 3.0 + self.ctrl1.to_vector() * 3.0
            - self.from.to_vector();
        for t in solve_quadratic(a2.x, a1.x, a0.x)
            .into_iter()
            .chain(solve_quadratic(a2.y, a1.y, a0.y))
        {
            if t > 0.0 && t < 1.0 {
                bounds.include(self.sample(t));
            }
        }
    }

    /// Move the beginning of the curve, translating the first control point along.
    pub fn move_start_point(&mut self, to: Point) {
        self.ctrl1 += to - self.from;
        self.from = to;
    }

    /// Move the end of the curve, translating the second control point along.
    pub fn move_end_point(&mut self, to: Point) {
        self.ctrl2 += to - self.to;
        self.to = to;
    }
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn s_curve() -> CubicSegment {
    CubicSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 2.0),
        ctrl2: point(3.0, -1.0),
        to: point(3.0, 1.0),
    }
}

#[cfg(test)]
fn brute_force_distance(curve: &CubicSegment, origin: Point) -> f64 {
    let mut best = f64::MAX;
    for i in 0..=10_000 {
        let p = curve.sample(i as f64 / 10_000.0);
        best = best.min((p - origin).length());
    }
    best
}

#[test]
fn cubic_signed_distance_matches_sampling() {
    let curve = s_curve();
    let origins = [
        point(1.0, 1.0),
        point(2.0, 0.0),
        point(1.5, 0.3),
        point(-1.0, 0.5),
        point(4.0, 2.0),
        point(1.5, -3.0),
    ];

    for &origin in &origins {
        let (d, _) = curve.signed_distance(origin);
        let expected = brute_force_distance(&curve, origin);
        assert!(
            (d.distance.abs() - expected).abs() < 1e-3,
            "{:?}: {:?} != {:?}",
            origin,
            d,
            expected
        );
    }
}

#[test]
fn cubic_signed_distance_line_like() {
    // A straight cubic behaves like a line segment.
    let curve = CubicSegment {
        from: point(0.0, 0.0),
        ctrl1: point(1.0, 0.0),
        ctrl2: point(2.0, 0.0),
        to: point(3.0, 0.0),
    };

    let (d, t) = curve.signed_distance(point(1.5, 1.0));
    assert!((d.distance + 1.0).abs() < 1e-9, "{:?}", d);
    assert!((t - 0.5).abs() < 1e-6);
    assert_eq!(d.dot, 1.0);

    let (d, t) = curve.signed_distance(point(1.5, -2.0));
    assert!((d.distance - 2.0).abs() < 1e-9, "{:?}", d);
    assert!((t - 0.5).abs() < 1e-6);

    let (d, t) = curve.signed_distance(point(-1.0, 0.0));
    assert!((d.distance.abs() - 1.0).abs() < 1e-9);
    assert!(t < 0.0);
}

#[test]
fn cubic_scanline() {
    let curve = s_curve();

    // The s curve crosses y = 0.5 three times.
    let hits = curve.scanline_intersections(0.5);
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].1, 1);
    assert_eq!(hits[1].1, -1);
    assert_eq!(hits[2].1, 1);
    for &(x, _) in &hits {
        assert!(x >= 0.0 && x <= 3.0);
    }

    assert!(curve.scanline_intersections(5.0).is_empty());
    assert!(curve.scanline_intersections(-5.0).is_empty());
}

#[test]
fn cubic_bounds() {
    let curve = s_curve();
    let mut bounds = Bounds::EMPTY;
    curve.bound(&mut bounds);

    let mut expected = Bounds::EMPTY;
    for i in 0..=10_000 {
        expected.include(curve.sample(i as f64 / 10_000.0));
    }

    assert!(bounds.left <= expected.left && bounds.left > expected.left - 1e-6);
    assert!(bounds.bottom <= expected.bottom && bounds.bottom > expected.bottom - 1e-6);
    assert!(bounds.right >= expected.right && bounds.right < expected.right + 1e-6);
    assert!(bounds.top >= expected.top && bounds.top < expected.top + 1e-6);
}

#[test]
fn cubic_split_range() {
    let curve = s_curve();
    let parts = [
        curve.split_range(0.0..0.25),
        curve.split_range(0.25..0.75),
        curve.split_range(0.75..1.0),
    ];

    assert_eq!(parts[0].from, curve.from);
    assert_eq!(parts[0].to, parts[1].from);
    assert_eq!(parts[1].to, parts[2].from);
    assert_eq!(parts[2].to, curve.to);
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!((parts[1].sample(t) - curve.sample(0.25 + t * 0.5)).length() < 1e-12);
    }
}

#[test]
fn cubic_directions() {
    // Control points on the endpoints.
    let curve = CubicSegment {
        from: point(0.0, 0.0),
        ctrl1: point(0.0, 0.0),
        ctrl2: point(1.0, 1.0),
        to: point(2.0, 0.0),
    };
    assert_eq!(curve.direction(0.0), point(1.0, 1.0) - point(0.0, 0.0));

    let mut flipped = s_curve();
    flipped.flip();
    let (a, b) = (s_curve(), flipped);
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!((a.sample(t) - b.sample(1.0 - t)).length() < 1e-12);
    }
}
