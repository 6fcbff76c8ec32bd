use crate::bounds::Bounds;
use crate::math::{Point, Vector};
use crate::signed_distance::SignedDistance;
use crate::utils::{mix, non_zero_sign, sign};
use crate::ScanlineIntersections;

use core::mem::swap;
use core::ops::Range;

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f64) -> Point {
        self.from.lerp(self.to, t)
    }

    /// Sample the x coordinate of the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn x(&self, t: f64) -> f64 {
        mix(self.from.x, self.to.x, t)
    }

    /// The tangent of the segment, which does not depend on t.
    #[inline]
    pub fn direction(&self) -> Vector {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Swap the beginning and the end of the segment.
    #[inline]
    pub fn flip(&mut self) {
        swap(&mut self.from, &mut self.to);
    }

    /// Return the sub-segment inside a given range of t.
    pub fn split_range(&self, t_range: Range<f64>) -> Self {
        LineSegment {
            from: self.sample(t_range.start),
            to: self.sample(t_range.end),
        }
    }

    /// Signed distance from `origin` to the segment, and the parameter of the
    /// nearest point along the infinite line that carries it.
    pub fn signed_distance(&self, origin: Point) -> (SignedDistance, f64) {
        let aq = origin - self.from;
        let ab = self.to - self.from;
        let param = aq.dot(ab) / ab.square_length();
        let nearest_end = if param > 0.5 { self.to } else { self.from };
        let eq = nearest_end - origin;
        let endpoint_distance = eq.length();

        if param > 0.0 && param < 1.0 {
            let ortho_distance = aq.cross(ab) / ab.length();
            if ortho_distance.abs() < endpoint_distance {
                return (SignedDistance::perpendicular(ortho_distance), param);
            }
        }

        let distance = non_zero_sign(aq.cross(ab)) * endpoint_distance;
        (SignedDistance::at_endpoint(distance, ab, eq), param)
    }

    /// Intersections with the horizontal line at `y`.
    ///
    /// The segment covers the half-open interval `[min(from.y, to.y), max(from.y, to.y))`
    /// whatever its direction, so a downward segment reports `to` and not `from`.
    pub fn scanline_intersections(&self, y: f64) -> ScanlineIntersections {
        let mut result = ScanlineIntersections::new();
        if (y >= self.from.y && y < self.to.y) || (y >= self.to.y && y < self.from.y) {
            let t = (y - self.from.y) / (self.to.y - self.from.y);
            result.push((self.x(t), sign(self.to.y - self.from.y)));
        }

        result
    }

    pub fn bound(&self, bounds: &mut Bounds) {
        bounds.include(self.from);
        bounds.include(self.to);
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn line_signed_distance() {
    let segment = LineSegment {
        from: point(0.0, 0.0),
        to: point(2.0, 0.0),
    };

    // Interior, left of the direction of travel.
    let (d, t) = segment.signed_distance(point(1.0, 1.0));
    assert_eq!(d, SignedDistance::perpendicular(-1.0));
    assert_eq!(t, 0.5);

    // Interior, right of the direction of travel.
    let (d, _) = segment.signed_distance(point(0.5, -2.0));
    assert_eq!(d.distance, 2.0);

    // Past the end: distance to the endpoint.
    let (d, t) = segment.signed_distance(point(5.0, 4.0));
    assert!((d.distance.abs() - 5.0).abs() < 1e-12);
    assert!(t > 1.0);
    assert!(d.dot < 1.0);

    // Before the beginning, exactly on the supporting line.
    let (d, t) = segment.signed_distance(point(-1.0, 0.0));
    assert_eq!(d.distance.abs(), 1.0);
    assert!(d.dot.abs() < 1e-12);
    assert_eq!(t, -0.5);
}

#[test]
fn line_scanline() {
    let up = LineSegment {
        from: point(0.0, 0.0),
        to: point(2.0, 2.0),
    };

    assert_eq!(up.scanline_intersections(1.0).as_slice(), &[(1.0, 1)]);
    assert_eq!(up.scanline_intersections(0.0).as_slice(), &[(0.0, 1)]);
    assert!(up.scanline_intersections(2.0).is_empty());
    assert!(up.scanline_intersections(-1.0).is_empty());

    let mut down = up;
    down.flip();
    assert_eq!(down.scanline_intersections(1.0).as_slice(), &[(1.0, -1)]);
    assert!(down.scanline_intersections(2.0).is_empty());
    assert_eq!(down.scanline_intersections(0.0).as_slice(), &[(0.0, -1)]);

    let horizontal = LineSegment {
        from: point(0.0, 1.0),
        to: point(3.0, 1.0),
    };
    assert!(horizontal.scanline_intersections(1.0).is_empty());
}

#[test]
fn line_scanline_half_open_range() {
    // Two chained downward segments: the shared endpoint belongs to the
    // lower end of each segment's y range.
    let upper = LineSegment {
        from: point(0.0, 4.0),
        to: point(1.0, 2.0),
    };
    let lower = LineSegment {
        from: point(1.0, 2.0),
        to: point(2.0, 0.0),
    };

    assert!(upper.scanline_intersections(4.0).is_empty());
    assert_eq!(upper.scanline_intersections(2.0).as_slice(), &[(1.0, -1)]);
    assert!(lower.scanline_intersections(2.0).is_empty());
    assert_eq!(lower.scanline_intersections(0.0).as_slice(), &[(2.0, -1)]);
}

#[test]
fn line_length_and_direction() {
    let segment = LineSegment {
        from: point(1.0, 1.0),
        to: point(4.0, 5.0),
    };
    assert_eq!(segment.direction(), Vector::new(3.0, 4.0));
    assert_eq!(segment.length(), 5.0);

    let mut reversed = segment;
    reversed.flip();
    assert_eq!(reversed.direction(), -segment.direction());
    assert_eq!(reversed.length(), 5.0);
}

#[test]
fn line_split_range() {
    let segment = LineSegment {
        from: point(0.0, 0.0),
        to: point(3.0, 6.0),
    };
    let middle = segment.split_range(1.0 / 3.0..2.0 / 3.0);
    assert!((middle.from - point(1.0, 2.0)).length() < 1e-12);
    assert!((middle.to - point(2.0, 4.0)).length() < 1e-12);
    assert_eq!(segment.split_range(0.0..1.0), segment);
}
