use crate::math::Vector;
use crate::utils::normalize;

/// Signed distance from a point to an edge, with a tie-breaker.
///
/// `distance` is the euclidean distance to the nearest point of the edge, signed
/// according to the side of the edge the point is on.
///
/// `dot` measures how squarely the edge faces the point, between 0 and 1. It only
/// matters when the nearest point is one of the edge's endpoints: a point near the
/// vertex shared by two edges is at the same distance from both of them, and the
/// edge whose tangent is most perpendicular to the direction of the point owns it.
/// When the nearest point is inside the edge, `dot` is 1.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SignedDistance {
    pub distance: f64,
    pub dot: f64,
}

impl SignedDistance {
    /// Farther than any other distance.
    pub const INFINITE: Self = SignedDistance {
        distance: -f64::MAX,
        dot: 0.0,
    };

    #[inline]
    pub const fn new(distance: f64, dot: f64) -> Self {
        SignedDistance { distance, dot }
    }

    /// A distance measured orthogonally to the edge.
    #[inline]
    pub const fn perpendicular(distance: f64) -> Self {
        SignedDistance { distance, dot: 1.0 }
    }

    /// A distance to one of the endpoints of an edge.
    ///
    /// `direction` is the tangent of the edge at this endpoint and `offset` the
    /// vector between the endpoint and the point the distance is measured from.
    #[inline]
    pub fn at_endpoint(distance: f64, direction: Vector, offset: Vector) -> Self {
        SignedDistance {
            distance,
            dot: normalize(direction).cross(normalize(offset)).abs(),
        }
    }

    /// Returns true if `self` should be preferred over `other`.
    ///
    /// Smaller absolute distances win, and among equal absolute distances the larger
    /// `dot` wins. NaN distances never win.
    #[inline]
    pub fn closer_than(&self, other: &SignedDistance) -> bool {
        let a = self.distance.abs();
        let b = other.distance.abs();
        a < b || (a == b && self.dot > other.dot)
    }

    /// Same as `closer_than`, but absolute distances within `tolerance` of each other
    /// are considered equal and decided by `dot`.
    ///
    /// A tolerance of zero (or less) is the exact comparison.
    #[inline]
    pub fn closer_than_within(&self, other: &SignedDistance, tolerance: f64) -> bool {
        if !(tolerance > 0.0) {
            return self.closer_than(other);
        }

        let a = self.distance.abs();
        let b = other.distance.abs();
        if (a - b).abs() <= tolerance {
            return self.dot > other.dot;
        }

        a < b
    }
}

impl Default for SignedDistance {
    fn default() -> Self {
        SignedDistance::INFINITE
    }
}

#[test]
fn distance_ordering() {
    let near = SignedDistance::new(-1.0, 0.2);
    let far = SignedDistance::new(2.0, 1.0);
    assert!(near.closer_than(&far));
    assert!(!far.closer_than(&near));
    assert!(near.closer_than(&SignedDistance::INFINITE));

    // Same absolute distance, the edge that faces the point wins.
    let facing = SignedDistance::new(1.0, 0.9);
    let oblique = SignedDistance::new(-1.0, 0.1);
    assert!(facing.closer_than(&oblique));
    assert!(!oblique.closer_than(&facing));
    assert!(!facing.closer_than(&facing));

    let nan = SignedDistance::new(f64::NAN, 1.0);
    assert!(!nan.closer_than(&far));
    assert!(!nan.closer_than(&SignedDistance::INFINITE));
}

#[test]
fn distance_ordering_with_tolerance() {
    let a = SignedDistance::new(1.0, 0.1);
    let b = SignedDistance::new(1.0 + 1e-7, 0.9);
    assert!(a.closer_than(&b));
    assert!(!a.closer_than_within(&b, 1e-6));
    assert!(b.closer_than_within(&a, 1e-6));
    assert!(a.closer_than_within(&b, 0.0));
}

#[test]
fn endpoint_dot() {
    use crate::math::vector;

    let facing = SignedDistance::at_endpoint(1.0, vector(1.0, 0.0), vector(0.0, 3.0));
    assert!((facing.dot - 1.0).abs() < 1e-12);
    let aligned = SignedDistance::at_endpoint(1.0, vector(1.0, 0.0), vector(-2.0, 0.0));
    assert!(aligned.dot.abs() < 1e-12);
}
