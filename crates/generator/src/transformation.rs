use crate::shape::geom::{point, vector, DistanceRange, Point, Vector};

/// Maps shape coordinates to bitmap coordinates: `bitmap = shape * scale + translate`,
/// per axis.
///
/// `translate` is expressed in bitmap units. Vectors are only scaled.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Projection {
    pub scale: Vector,
    pub translate: Vector,
}

impl Projection {
    #[inline]
    pub fn new(scale: Vector, translate: Vector) -> Self {
        Projection { scale, translate }
    }

    #[inline]
    pub fn identity() -> Self {
        Projection::new(vector(1.0, 1.0), Vector::zero())
    }

    #[inline]
    pub fn project(&self, p: Point) -> Point {
        point(self.project_x(p.x), self.project_y(p.y))
    }

    #[inline]
    pub fn unproject(&self, p: Point) -> Point {
        point(self.unproject_x(p.x), self.unproject_y(p.y))
    }

    #[inline]
    pub fn project_vector(&self, v: Vector) -> Vector {
        vector(v.x * self.scale.x, v.y * self.scale.y)
    }

    #[inline]
    pub fn unproject_vector(&self, v: Vector) -> Vector {
        vector(v.x / self.scale.x, v.y / self.scale.y)
    }

    #[inline]
    pub fn project_x(&self, x: f64) -> f64 {
        x * self.scale.x + self.translate.x
    }

    #[inline]
    pub fn project_y(&self, y: f64) -> f64 {
        y * self.scale.y + self.translate.y
    }

    #[inline]
    pub fn unproject_x(&self, x: f64) -> f64 {
        (x - self.translate.x) / self.scale.x
    }

    #[inline]
    pub fn unproject_y(&self, y: f64) -> f64 {
        (y - self.translate.y) / self.scale.y
    }

    /// The projection from bitmap coordinates back to shape coordinates.
    pub fn inverse(&self) -> Self {
        Projection {
            scale: vector(1.0 / self.scale.x, 1.0 / self.scale.y),
            translate: vector(
                -self.translate.x / self.scale.x,
                -self.translate.y / self.scale.y,
            ),
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::identity()
    }
}

/// Maps distances to output values: `output = distance * scale + translate`.
///
/// A difference between two distances (a delta) is only scaled.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DistanceMapping {
    pub scale: f64,
    pub translate: f64,
}

impl DistanceMapping {
    #[inline]
    pub fn new(scale: f64, translate: f64) -> Self {
        DistanceMapping { scale, translate }
    }

    #[inline]
    pub fn identity() -> Self {
        DistanceMapping::new(1.0, 0.0)
    }

    /// Maps `range.lower` to 0 and `range.upper` to 1.
    pub fn from_range(range: DistanceRange) -> Self {
        let scale = 1.0 / range.width();
        DistanceMapping {
            scale,
            translate: -range.lower * scale,
        }
    }

    #[inline]
    pub fn map(&self, distance: f64) -> f64 {
        distance * self.scale + self.translate
    }

    #[inline]
    pub fn map_delta(&self, delta: f64) -> f64 {
        delta * self.scale
    }

    pub fn inverse(&self) -> Self {
        DistanceMapping {
            scale: 1.0 / self.scale,
            translate: -self.translate / self.scale,
        }
    }
}

impl Default for DistanceMapping {
    fn default() -> Self {
        DistanceMapping::identity()
    }
}

/// Where the shape lands in the bitmap and how distances are stored.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SdfTransformation {
    pub projection: Projection,
    pub distance_mapping: DistanceMapping,
}

impl SdfTransformation {
    #[inline]
    pub fn new(projection: Projection, distance_mapping: DistanceMapping) -> Self {
        SdfTransformation {
            projection,
            distance_mapping,
        }
    }

    /// A uniform `scale` and a `translate` in bitmap units. Distances within `range`,
    /// in shape units, are mapped to `[0, 1]`.
    pub fn from_scale(scale: f64, translate: Vector, range: DistanceRange) -> Self {
        SdfTransformation {
            projection: Projection::new(vector(scale, scale), translate),
            distance_mapping: DistanceMapping::from_range(range),
        }
    }

    #[inline]
    pub fn project(&self, p: Point) -> Point {
        self.projection.project(p)
    }

    #[inline]
    pub fn unproject(&self, p: Point) -> Point {
        self.projection.unproject(p)
    }

    #[inline]
    pub fn project_vector(&self, v: Vector) -> Vector {
        self.projection.project_vector(v)
    }

    #[inline]
    pub fn unproject_vector(&self, v: Vector) -> Vector {
        self.projection.unproject_vector(v)
    }

    #[inline]
    pub fn map(&self, distance: f64) -> f64 {
        self.distance_mapping.map(distance)
    }

    #[inline]
    pub fn map_delta(&self, delta: f64) -> f64 {
        self.distance_mapping.map_delta(delta)
    }
}

#[test]
fn projection_round_trip() {
    let projection = Projection::new(vector(2.0, 4.0), vector(0.5, -1.0));
    let p = point(3.0, 1.5);
    assert_eq!(projection.project(p), point(6.5, 5.0));
    assert_eq!(projection.unproject(projection.project(p)), p);
    assert_eq!(projection.project_vector(vector(1.0, 1.0)), vector(2.0, 4.0));
    assert_eq!(projection.unproject_vector(vector(2.0, 4.0)), vector(1.0, 1.0));

    let inverse = projection.inverse();
    assert_eq!(inverse.project(point(6.5, 5.0)), p);
    assert_eq!(inverse.inverse(), projection);
}

#[test]
fn distance_mapping() {
    let mapping = DistanceMapping::from_range(DistanceRange::new(-4.0, 4.0));
    assert_eq!(mapping.map(-4.0), 0.0);
    assert_eq!(mapping.map(0.0), 0.5);
    assert_eq!(mapping.map(4.0), 1.0);
    assert_eq!(mapping.map_delta(2.0), 0.25);
    assert_eq!(mapping.inverse().map(0.5), 0.0);
    assert_eq!(mapping.inverse().inverse(), mapping);

    let transformation = SdfTransformation::from_scale(
        2.0,
        vector(1.0, 1.0),
        DistanceRange::symmetrical(2.0),
    );
    assert_eq!(transformation.unproject(point(3.0, 5.0)), point(1.0, 2.0));
    assert_eq!(transformation.map(1.0), 1.0);
}
