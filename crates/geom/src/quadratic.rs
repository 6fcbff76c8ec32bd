use crate::bounds::Bounds;
use crate::cubic::CubicSegment;
use crate::math::{Point, Vector};
use crate::signed_distance::SignedDistance;
use crate::utils::{non_zero_sign, solve_cubic, solve_quadratic};
use crate::ScanlineIntersections;

use core::mem::swap;
use core::ops::Range;

/// A 2d curve segment defined by three points: the beginning of the segment, a control
/// point and the end of the segment.
///
/// The curve is defined by equation:
/// ```∀ t ∈ [0..1],  P(t) = (1 - t)² * from + 2 * (1 - t) * t * ctrl + t² * to```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct QuadraticSegment {
    pub from: Point,
    pub ctrl: Point,
    pub to: Point,
}

impl QuadraticSegment {
    /// Sample the curve at t (expecting t between 0 and 1).
    pub fn sample(&self, t: f64) -> Point {
        self.from.lerp(self.ctrl, t).lerp(self.ctrl.lerp(self.to, t), t)
    }

    /// The tangent of the curve at t.
    ///
    /// When the control point coincides with an endpoint the derivative vanishes
    /// there, and the chord is returned instead.
    pub fn direction(&self, t: f64) -> Vector {
        let tangent = (self.ctrl - self.from).lerp(self.to - self.ctrl, t);
        if tangent == Vector::zero() {
            return self.to - self.from;
        }

        tangent
    }

    /// The rate of change of the tangent, which is constant for a quadratic curve.
    #[inline]
    pub fn direction_change(&self) -> Vector {
        (self.to - self.ctrl) - (self.ctrl - self.from)
    }

    /// Swap the beginning and the end of the segment.
    #[inline]
    pub fn flip(&mut self) {
        swap(&mut self.from, &mut self.to);
    }

    /// Return the curve inside a given range of t.
    ///
    /// This is equivalent to splitting at the range's end points.
    pub fn split_range(&self, t_range: Range<f64>) -> Self {
        let t0 = t_range.start;
        let t1 = t_range.end;

        let from = self.sample(t0);
        let to = self.sample(t1);
        let ctrl = from + (self.ctrl - self.from).lerp(self.to - self.ctrl, t0) * (t1 - t0);

        QuadraticSegment { from, ctrl, to }
    }

    /// Elevate this curve to a third order bézier.
    pub fn to_cubic(&self) -> CubicSegment {
        CubicSegment {
            from: self.from,
            ctrl1: self.from.lerp(self.ctrl, 2.0 / 3.0),
            ctrl2: self.ctrl.lerp(self.to, 1.0 / 3.0),
            to: self.to,
        }
    }

    /// Signed distance from `origin` to the curve, and the parameter of the nearest
    /// point.
    ///
    /// The parameter is extrapolated beyond `[0, 1]` along the end tangents when the
    /// nearest point is an endpoint that the curve leaves or enters away from
    /// `origin`.
    pub fn signed_distance(&self, origin: Point) -> (SignedDistance, f64) {
        let qa = self.from - origin;
        let ab = self.ctrl - self.from;
        let br = self.to - self.ctrl - ab;

        // The nearest points are where (P(t) - origin) · P'(t) = 0.
        let a = br.dot(br);
        let b = 3.0 * ab.dot(br);
        let c = 2.0 * ab.dot(ab) + qa.dot(br);
        let d = qa.dot(ab);
        let roots = solve_cubic(a, b, c, d);

        let start_dir = self.direction(0.0);
        let mut min_distance = non_zero_sign(start_dir.cross(qa)) * qa.length();
        let mut param = -qa.dot(start_dir) / start_dir.square_length();

        let end_dir = self.direction(1.0);
        let to_end = self.to - origin;
        let end_distance = to_end.length();
        if end_distance < min_distance.abs() {
            min_distance = non_zero_sign(end_dir.cross(to_end)) * end_distance;
            param = (origin - self.ctrl).dot(end_dir) / end_dir.square_length();
        }

        for t in roots {
            if t > 0.0 && t < 1.0 {
                let qe = qa + ab * (2.0 * t) + br * (t * t);
                let distance = qe.length();
                if distance <= min_distance.abs() {
                    min_distance = non_zero_sign((ab + br * t).cross(qe)) * distance;
                    param = t;
                }
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
    /// Each crossing is reported once with the vertical direction of the curve at
    /// that point. Tangential contacts and crossings at the endpoints are resolved
    /// so that the directions alternate and the last one matches the side of `y` the
    /// curve ends on.
    pub fn scanline_intersections(&self, y: f64) -> ScanlineIntersections {
        let mut result = ScanlineIntersections::new();
        let mut next_dy = if y > self.from.y { 1 } else { -1 };
        let mut pending_x = self.from.x;

        if self.from.y == y {
            if self.from.y < self.ctrl.y || (self.from.y == self.ctrl.y && self.from.y < self.to.y) {
                result.push((pending_x, 1));
            } else {
                next_dy = 1;
            }
        }

        let ab = self.ctrl - self.from;
        let br = self.to - self.ctrl - ab;
        let mut roots = solve_quadratic(br.y, 2.0 * ab.y, self.from.y - y);
        if roots.len() == 2 && roots[0] > roots[1] {
            roots.swap(0, 1);
        }
        for t in roots {
            if result.len() >= 2 {
                break;
            }
            if (0.0..=1.0).contains(&t) {
                pending_x = self.from.x + 2.0 * t * ab.x + t * t * br.x;
                if f64::from(next_dy) * (ab.y + t * br.y) >= 0.0 {
                    result.push((pending_x, next_dy));
                    next_dy = -next_dy;
                }
            }
        }

        if self.to.y == y {
            if next_dy > 0 {
                if let Some((x, _)) = result.pop() {
                    pending_x = x;
                    next_dy = -1;
                }
            }
            let ends_below = self.to.y < self.ctrl.y
                || (self.to.y == self.ctrl.y && self.to.y < self.from.y);
            if ends_below && result.len() < 2 {
                pending_x = self.to.x;
                if next_dy < 0 {
                    result.push((pending_x, -1));
                    next_dy = 1;
                }
            }
        }

        let end_dy = if y >= self.to.y { 1 } else { -1 };
        if next_dy != end_dy {
            if result.pop().is_none() {
                if (self.to.y - y).abs() < (self.from.y - y).abs() {
                    pending_x = self.to.x;
                }
                result.push((pending_x, next_dy));
            }
        }

        result
    }

    /// Grow `bounds` to contain the curve, including its extrema.
    pub fn bound(&self, bounds: &mut Bounds) {
        bounds.include(self.from);
        bounds.include(self.to);

        let bot = (self.ctrl - self.from) - (self.to - self.ctrl);
        if bot.x != 0.0 {
            let t = (self.ctrl.x - self.from.x) / bot.x;
            if t > 0.0 && t < 1.0 {
                bounds.include(self.sample(t));
            }
        }
        if bot.y != 0.0 {
            let t = (self.ctrl.y - self.from.y) / bot.y;
            if t > 0.0 && t < 1.0 {
                bounds.include(self.sample(t));
            }
        }
    }

    /// Move the beginning of the curve, adjusting the control point so that the
    /// tangent at the other end is kept.
    pub fn move_start_point(&mut self, to: Point) {
        let original_start_dir = self.from - self.ctrl;
        let original_ctrl = self.ctrl;

        let denominator = (self.from - self.ctrl).cross(self.to - self.ctrl);
        if denominator != 0.0 {
            let factor = (self.from - self.ctrl).cross(to - self.from) / denominator;
            self.ctrl += (self.to - self.ctrl) * factor;
        }
        self.from = to;

        if original_start_dir.dot(self.from - self.ctrl) < 0.0 {
            self.ctrl = original_ctrl;
        }
    }

    /// Move the end of the curve, adjusting the control point so that the tangent at
    /// the beginning is kept.
    pub fn move_end_point(&mut self, to: Point) {
        let original_end_dir = self.to - self.ctrl;
        let original_ctrl = self.ctrl;

        let denominator = (self.to - self.ctrl).cross(self.from - self.ctrl);
        if denominator != 0.0 {
            let factor = (self.to - self.ctrl).cross(to - self.to) / denominator;
            self.ctrl += (self.from - self.ctrl) * factor;
        }
        self.to = to;

        if original_end_dir.dot(self.to - self.ctrl) < 0.0 {
            self.ctrl = original_ctrl;
        }
    }
}

#[cfg(test)]
use crate::math::point;

#[cfg(test)]
fn arch() -> QuadraticSegment {
    QuadraticSegment {
        from: point(0.0, 0.0),
        ctrl: point(1.0, 2.0),
        to: point(2.0, 0.0),
    }
}

#[test]
fn quadratic_signed_distance() {
    let curve = arch();

    // The apex is at (1, 1), right below the origin.
    let (d, t) = curve.signed_distance(point(1.0, 3.0));
    assert!((d.distance + 2.0).abs() < 1e-9, "{:?}", d);
    assert!((t - 0.5).abs() < 1e-9);
    assert_eq!(d.dot, 1.0);

    // Inside the arch, the nearest points are on the flanks at t = 0.25 and 0.75.
    let (d, t) = curve.signed_distance(point(1.0, 0.25));
    assert!((d.distance - 0.5f64.sqrt()).abs() < 1e-9, "{:?}", d);
    assert!((t - 0.25).abs() < 1e-9 || (t - 0.75).abs() < 1e-9);

    // Nearest to the end point.
    let (d, t) = curve.signed_distance(point(3.0, -1.0));
    assert!((d.distance.abs() - 2.0f64.sqrt()).abs() < 1e-9);
    assert!(t > 1.0);
}

#[test]
fn quadratic_matches_sampling() {
    let curve = arch();
    let origin = point(0.3, 1.7);

    let mut best = f64::MAX;
    for i in 0..=1000 {
        let p = curve.sample(i as f64 / 1000.0);
        best = best.min((p - origin).length());
    }

    let (d, _) = curve.signed_distance(origin);
    assert!(d.distance.abs() <= best + 1e-9);
    assert!(d.distance.abs() >= best - 1e-3);
}

#[test]
fn quadratic_scanline() {
    let curve = arch();

    let hits = curve.scanline_intersections(0.5);
    assert_eq!(hits.len(), 2);
    assert!(hits[0].0 < hits[1].0);
    assert_eq!(hits[0].1, 1);
    assert_eq!(hits[1].1, -1);

    // Above the apex.
    assert!(curve.scanline_intersections(1.5).is_empty());

    // The curve leaves and comes back to y = 0: both ends are crossings.
    let hits = curve.scanline_intersections(0.0);
    assert_eq!(hits.as_slice(), &[(0.0, 1), (2.0, -1)]);
}

#[test]
fn quadratic_bounds() {
    let mut bounds = Bounds::EMPTY;
    arch().bound(&mut bounds);
    assert_eq!(bounds, Bounds::new(0.0, 0.0, 2.0, 1.0));
}

#[test]
fn quadratic_split_range() {
    let curve = arch();
    let first = curve.split_range(0.0..0.5);
    let second = curve.split_range(0.5..1.0);

    assert_eq!(first.from, curve.from);
    assert_eq!(second.to, curve.to);
    assert_eq!(first.to, second.from);
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!((first.sample(t) - curve.sample(t * 0.5)).length() < 1e-12);
        assert!((second.sample(t) - curve.sample(0.5 + t * 0.5)).length() < 1e-12);
    }
}

#[test]
fn quadratic_move_endpoints() {
    let mut curve = arch();
    curve.move_start_point(point(0.0, 0.1));
    assert_eq!(curve.from, point(0.0, 0.1));
    // The tangent at the end is kept.
    assert!((curve.to - curve.ctrl).cross(arch().to - arch().ctrl).abs() < 1e-12);

    let mut curve = arch();
    curve.move_end_point(point(2.1, 0.0));
    assert_eq!(curve.to, point(2.1, 0.0));
    assert!((curve.ctrl - curve.from).cross(arch().ctrl - arch().from).abs() < 1e-12);
}

#[test]
fn quadratic_to_cubic() {
    let curve = arch();
    let cubic = curve.to_cubic();
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!((cubic.sample(t) - curve.sample(t)).length() < 1e-12);
    }
}
