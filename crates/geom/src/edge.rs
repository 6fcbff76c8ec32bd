use crate::bounds::Bounds;
use crate::cubic::CubicSegment;
use crate::edge_color::EdgeColor;
use crate::error::{MsdfError, MsdfResult};
use crate::line::LineSegment;
use crate::math::{Point, Vector};
use crate::quadratic::QuadraticSegment;
use crate::signed_distance::SignedDistance;
use crate::utils::normalize;
use crate::{ScanlineIntersections, ONE_THIRD, TWO_THIRDS};

use arrayvec::ArrayVec;
use core::convert::TryFrom;

/// The degree of an edge segment.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum EdgeType {
    Linear = 1,
    Quadratic = 2,
    Cubic = 3,
}

impl EdgeType {
    /// Number of control points, endpoints included.
    #[inline]
    pub fn control_point_count(self) -> usize {
        self as usize + 1
    }
}

impl TryFrom<u8> for EdgeType {
    type Error = MsdfError;
    fn try_from(value: u8) -> MsdfResult<Self> {
        match value {
            1 => Ok(EdgeType::Linear),
            2 => Ok(EdgeType::Quadratic),
            3 => Ok(EdgeType::Cubic),
            _ => Err(MsdfError::InvalidArgument("unknown edge type")),
        }
    }
}

/// The geometry of an edge segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Curve {
    Linear(LineSegment),
    Quadratic(QuadraticSegment),
    Cubic(CubicSegment),
}

macro_rules! dispatch {
    ($curve:expr, $segment:ident => $body:expr) => {
        match $curve {
            Curve::Linear($segment) => $body,
            Curve::Quadratic($segment) => $body,
            Curve::Cubic($segment) => $body,
        }
    };
}

/// A colored line segment, quadratic or cubic bézier curve.
///
/// Edges are the building blocks of contours. The color selects the distance field
/// channels the edge contributes to.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct EdgeSegment {
    pub curve: Curve,
    pub color: EdgeColor,
}

impl EdgeSegment {
    pub fn linear(from: Point, to: Point, color: EdgeColor) -> Self {
        EdgeSegment {
            curve: Curve::Linear(LineSegment { from, to }),
            color,
        }
    }

    pub fn quadratic(from: Point, ctrl: Point, to: Point, color: EdgeColor) -> Self {
        EdgeSegment {
            curve: Curve::Quadratic(QuadraticSegment { from, ctrl, to }),
            color,
        }
    }

    pub fn cubic(from: Point, ctrl1: Point, ctrl2: Point, to: Point, color: EdgeColor) -> Self {
        EdgeSegment {
            curve: Curve::Cubic(CubicSegment {
                from,
                ctrl1,
                ctrl2,
                to,
            }),
            color,
        }
    }

    /// Creates an edge from its two, three or four control points.
    pub fn from_control_points(points: &[Point], color: EdgeColor) -> MsdfResult<Self> {
        match *points {
            [from, to] => Ok(EdgeSegment::linear(from, to, color)),
            [from, ctrl, to] => Ok(EdgeSegment::quadratic(from, ctrl, to, color)),
            [from, ctrl1, ctrl2, to] => Ok(EdgeSegment::cubic(from, ctrl1, ctrl2, to, color)),
            _ => Err(MsdfError::InvalidArgument(
                "an edge has two to four control points",
            )),
        }
    }

    #[inline]
    pub fn edge_type(&self) -> EdgeType {
        match self.curve {
            Curve::Linear(..) => EdgeType::Linear,
            Curve::Quadratic(..) => EdgeType::Quadratic,
            Curve::Cubic(..) => EdgeType::Cubic,
        }
    }

    /// The control points, endpoints included, in order.
    pub fn control_points(&self) -> ArrayVec<Point, 4> {
        let mut points = ArrayVec::new();
        match self.curve {
            Curve::Linear(s) => {
                points.push(s.from);
                points.push(s.to);
            }
            Curve::Quadratic(s) => {
                points.push(s.from);
                points.push(s.ctrl);
                points.push(s.to);
            }
            Curve::Cubic(s) => {
                points.push(s.from);
                points.push(s.ctrl1);
                points.push(s.ctrl2);
                points.push(s.to);
            }
        }

        points
    }

    #[inline]
    pub fn start(&self) -> Point {
        dispatch!(&self.curve, s => s.from)
    }

    #[inline]
    pub fn end(&self) -> Point {
        dispatch!(&self.curve, s => s.to)
    }

    /// The point at parameter t.
    #[inline]
    pub fn point(&self, t: f64) -> Point {
        dispatch!(&self.curve, s => s.sample(t))
    }

    /// The tangent at parameter t, not normalized.
    pub fn direction(&self, t: f64) -> Vector {
        match &self.curve {
            Curve::Linear(s) => s.direction(),
            Curve::Quadratic(s) => s.direction(t),
            Curve::Cubic(s) => s.direction(t),
        }
    }

    /// The change of the tangent at parameter t.
    pub fn direction_change(&self, t: f64) -> Vector {
        match &self.curve {
            Curve::Linear(..) => Vector::zero(),
            Curve::Quadratic(s) => s.direction_change(),
            Curve::Cubic(s) => s.direction_change(t),
        }
    }

    /// Signed distance from `origin` to the edge, and the parameter of the nearest
    /// point (possibly outside of `[0, 1]`, see
    /// [`distance_to_perpendicular_distance`](Self::distance_to_perpendicular_distance)).
    #[inline]
    pub fn signed_distance(&self, origin: Point) -> (SignedDistance, f64) {
        dispatch!(&self.curve, s => s.signed_distance(origin))
    }

    /// Turns a distance to one of the endpoints into the distance to the line that
    /// extends the edge along its tangent at that endpoint.
    ///
    /// Only applies when `param` lies outside of `[0, 1]`, `origin` is beyond the
    /// endpoint along the tangent, and the extended line is not farther than the
    /// endpoint itself.
    pub fn distance_to_perpendicular_distance(
        &self,
        distance: &mut SignedDistance,
        origin: Point,
        param: f64,
    ) {
        let (endpoint, dir, beyond) = if param < 0.0 {
            (self.start(), normalize(self.direction(0.0)), -1.0)
        } else if param > 1.0 {
            (self.end(), normalize(self.direction(1.0)), 1.0)
        } else {
            return;
        };

        let aq = origin - endpoint;
        if beyond * aq.dot(dir) > 0.0 {
            let perpendicular_distance = aq.cross(dir);
            if perpendicular_distance.abs() <= distance.distance.abs() {
                *distance = SignedDistance::perpendicular(perpendicular_distance);
            }
        }
    }

    /// Intersections with the horizontal line at `y` as `(x, direction)` pairs.
    #[inline]
    pub fn scanline_intersections(&self, y: f64) -> ScanlineIntersections {
        dispatch!(&self.curve, s => s.scanline_intersections(y))
    }

    /// Grow `bounds` to contain the edge.
    #[inline]
    pub fn bound(&self, bounds: &mut Bounds) {
        dispatch!(&self.curve, s => s.bound(bounds))
    }

    /// Grow `bounds` to contain all control points, which also contain the edge.
    pub fn fast_bound(&self, bounds: &mut Bounds) {
        for p in self.control_points() {
            bounds.include(p);
        }
    }

    /// Flip the direction of the edge.
    #[inline]
    pub fn reverse(&mut self) {
        dispatch!(&mut self.curve, s => s.flip())
    }

    /// Move the start point, keeping the edge's tangent at its other end.
    pub fn move_start_point(&mut self, to: Point) {
        match &mut self.curve {
            Curve::Linear(s) => s.from = to,
            Curve::Quadratic(s) => s.move_start_point(to),
            Curve::Cubic(s) => s.move_start_point(to),
        }
    }

    /// Move the end point, keeping the edge's tangent at its other end.
    pub fn move_end_point(&mut self, to: Point) {
        match &mut self.curve {
            Curve::Linear(s) => s.to = to,
            Curve::Quadratic(s) => s.move_end_point(to),
            Curve::Cubic(s) => s.move_end_point(to),
        }
    }

    /// Split the edge at t = 1/3 and t = 2/3. All parts keep the edge's color.
    pub fn split_in_thirds(&self) -> [EdgeSegment; 3] {
        let color = self.color;
        let part = |range: core::ops::Range<f64>| EdgeSegment {
            curve: match &self.curve {
                Curve::Linear(s) => Curve::Linear(s.split_range(range)),
                Curve::Quadratic(s) => Curve::Quadratic(s.split_range(range)),
                Curve::Cubic(s) => Curve::Cubic(s.split_range(range)),
            },
            color,
        };

        let mut parts = [
            part(0.0..ONE_THIRD),
            part(ONE_THIRD..TWO_THIRDS),
            part(TWO_THIRDS..1.0),
        ];
        // Make the junctions exact.
        let (first_end, second_end) = (parts[0].end(), parts[1].end());
        parts[1].set_start(first_end);
        parts[2].set_start(second_end);

        parts
    }

    /// Elevate a quadratic edge to a cubic one. Other edges are left untouched.
    pub fn convert_to_cubic(&mut self) {
        if let Curve::Quadratic(s) = self.curve {
            self.curve = Curve::Cubic(s.to_cubic());
        }
    }

    /// Returns true if all control points have finite coordinates.
    pub fn is_finite(&self) -> bool {
        self.control_points()
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Returns true if all control points are within `tolerance` of the start point.
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        let start = self.start();
        self.control_points()
            .iter()
            .all(|p| (*p - start).length() <= tolerance)
    }

    fn set_start(&mut self, p: Point) {
        dispatch!(&mut self.curve, s => s.from = p)
    }
}

#[cfg(test)]
use crate::math::point;

#[test]
fn edge_from_control_points() {
    let points = [
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, 1.0),
        point(3.0, 0.0),
    ];

    let line = EdgeSegment::from_control_points(&points[..2], EdgeColor::Red).unwrap();
    assert_eq!(line.edge_type(), EdgeType::Linear);
    let quad = EdgeSegment::from_control_points(&points[..3], EdgeColor::Red).unwrap();
    assert_eq!(quad.edge_type(), EdgeType::Quadratic);
    let cubic = EdgeSegment::from_control_points(&points, EdgeColor::Red).unwrap();
    assert_eq!(cubic.edge_type(), EdgeType::Cubic);
    assert_eq!(cubic.control_points().as_slice(), &points[..]);
    assert_eq!(cubic.start(), points[0]);
    assert_eq!(cubic.end(), points[3]);

    assert!(EdgeSegment::from_control_points(&points[..1], EdgeColor::Red).is_err());
    assert_eq!(EdgeType::try_from(2), Ok(EdgeType::Quadratic));
    assert!(EdgeType::try_from(4).is_err());
}

#[test]
fn split_edges_in_thirds() {
    let edges = [
        EdgeSegment::linear(point(0.0, 0.0), point(3.0, 3.0), EdgeColor::Cyan),
        EdgeSegment::quadratic(
            point(0.0, 0.0),
            point(1.0, 2.0),
            point(3.0, 0.0),
            EdgeColor::Magenta,
        ),
        EdgeSegment::cubic(
            point(0.0, 0.0),
            point(0.0, 2.0),
            point(3.0, -1.0),
            point(3.0, 1.0),
            EdgeColor::Yellow,
        ),
    ];

    for edge in &edges {
        let parts = edge.split_in_thirds();
        assert_eq!(parts[0].start(), edge.start());
        assert_eq!(parts[0].end(), parts[1].start());
        assert_eq!(parts[1].end(), parts[2].start());
        assert_eq!(parts[2].end(), edge.end());
        for part in &parts {
            assert_eq!(part.color, edge.color);
            assert_eq!(part.edge_type(), edge.edge_type());
        }
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let p = parts[1].point(t);
            let expected = edge.point((1.0 + t) / 3.0);
            assert!((p - expected).length() < 1e-9);
        }
    }
}

#[test]
fn extended_endpoint_distance() {
    let edge = EdgeSegment::linear(point(0.0, 0.0), point(1.0, 0.0), EdgeColor::White);

    // Beyond the end, slightly below the supporting line.
    let origin = point(3.0, -0.5);
    let (mut distance, param) = edge.signed_distance(origin);
    assert!(param > 1.0);
    assert!(distance.distance.abs() > 2.0);
    edge.distance_to_perpendicular_distance(&mut distance, origin, param);
    assert_eq!(distance, SignedDistance::perpendicular(0.5));

    // Interior points are left alone.
    let origin = point(0.5, 1.0);
    let (mut distance, param) = edge.signed_distance(origin);
    let before = distance;
    edge.distance_to_perpendicular_distance(&mut distance, origin, param);
    assert_eq!(distance, before);
}

#[test]
fn reverse_edges() {
    let mut edge = EdgeSegment::cubic(
        point(0.0, 0.0),
        point(1.0, 2.0),
        point(2.0, 2.0),
        point(3.0, 0.0),
        EdgeColor::Cyan,
    );
    let original = edge;
    edge.reverse();
    assert_eq!(edge.start(), original.end());
    assert_eq!(edge.end(), original.start());
    assert_eq!(edge.color, original.color);
    edge.reverse();
    assert_eq!(edge, original);
}

#[test]
fn degenerate_and_finite_edges() {
    let point_like = EdgeSegment::quadratic(
        point(1.0, 1.0),
        point(1.0, 1.0 + 1e-12),
        point(1.0, 1.0),
        EdgeColor::White,
    );
    assert!(point_like.is_degenerate(1e-9));
    assert!(!EdgeSegment::linear(point(0.0, 0.0), point(1.0, 0.0), EdgeColor::White)
        .is_degenerate(1e-9));

    let broken = EdgeSegment::linear(point(0.0, f64::NAN), point(1.0, 0.0), EdgeColor::White);
    assert!(!broken.is_finite());
    assert!(point_like.is_finite());
}

#[test]
fn quadratic_to_cubic_edge() {
    let mut edge = EdgeSegment::quadratic(
        point(0.0, 0.0),
        point(1.0, 2.0),
        point(2.0, 0.0),
        EdgeColor::Green,
    );
    let original = edge;
    edge.convert_to_cubic();
    assert_eq!(edge.edge_type(), EdgeType::Cubic);
    assert_eq!(edge.color, EdgeColor::Green);
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        assert!((edge.point(t) - original.point(t)).length() < 1e-12);
    }
}
