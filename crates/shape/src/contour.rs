use crate::geom::utils::normalize_or_zero;
use crate::geom::{Bounds, EdgeSegment, MsdfError, MsdfResult, Vector};

/// A closed sequence of edges.
///
/// Once the contour is normalized, the end of every edge is the start of the next one
/// and the end of the last edge is the start of the first.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Contour {
    pub edges: Vec<EdgeSegment>,
}

impl Contour {
    pub fn new() -> Self {
        Contour { edges: Vec::new() }
    }

    pub fn with_edges(edges: Vec<EdgeSegment>) -> Self {
        Contour { edges }
    }

    #[inline]
    pub fn add_edge(&mut self, edge: EdgeSegment) {
        self.edges.push(edge);
    }

    pub fn edge(&self, index: usize) -> MsdfResult<&EdgeSegment> {
        MsdfError::check_index(index, self.edges.len())?;
        Ok(&self.edges[index])
    }

    pub fn edge_mut(&mut self, index: usize) -> MsdfResult<&mut EdgeSegment> {
        MsdfError::check_index(index, self.edges.len())?;
        Ok(&mut self.edges[index])
    }

    /// Inserts an edge at `index`, which may be equal to the number of edges.
    pub fn insert_edge(&mut self, index: usize, edge: EdgeSegment) -> MsdfResult<()> {
        MsdfError::check_index(index, self.edges.len() + 1)?;
        self.edges.insert(index, edge);
        Ok(())
    }

    pub fn remove_edge(&mut self, index: usize) -> MsdfResult<EdgeSegment> {
        MsdfError::check_index(index, self.edges.len())?;
        Ok(self.edges.remove(index))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Iterates over the edges along with the previous and the next edge of the
    /// contour, wrapping around.
    pub fn edge_triples(
        &self,
    ) -> impl Iterator<Item = (&EdgeSegment, &EdgeSegment, &EdgeSegment)> + '_ {
        let n = self.edges.len();
        (0..n).map(move |i| {
            (
                &self.edges[(i + n - 1) % n],
                &self.edges[i],
                &self.edges[(i + 1) % n],
            )
        })
    }

    /// Grow `bounds` to contain the contour.
    pub fn bound(&self, bounds: &mut Bounds) {
        for edge in &self.edges {
            edge.bound(bounds);
        }
    }

    /// Grow `bounds` to contain the miters of the contour stroked with half-width
    /// `border`.
    ///
    /// Only the vertices that turn in the direction given by `polarity` get a miter,
    /// and miters are cut at `miter_limit` times the border.
    pub fn bound_miters(&self, bounds: &mut Bounds, border: f64, miter_limit: f64, polarity: i32) {
        let last = match self.edges.last() {
            Some(edge) => edge,
            None => return,
        };

        let mut prev_dir = normalize_or_zero(last.direction(1.0));
        for edge in &self.edges {
            let dir = -normalize_or_zero(edge.direction(0.0));
            if f64::from(polarity) * prev_dir.cross(dir) >= 0.0 {
                let mut miter_length = miter_limit;
                let q = 0.5 * (1.0 - prev_dir.dot(dir));
                if q > 0.0 {
                    miter_length = (1.0 / q.sqrt()).min(miter_limit);
                }
                let miter = edge.start() + normalize_or_zero(prev_dir + dir) * (border * miter_length);
                bounds.include(miter);
            }
            prev_dir = normalize_or_zero(edge.direction(1.0));
        }
    }

    /// The orientation of the contour: `1` if it runs clockwise (with the y axis
    /// pointing up), `-1` if it runs counter-clockwise and `0` if it is empty or
    /// encloses no area.
    ///
    /// Computed from the signed area of the polygon formed by all control points. With
    /// this convention, distances are positive inside of contours of winding `1`.
    pub fn winding(&self) -> i32 {
        let first = match self.edges.first() {
            Some(edge) => edge.start(),
            None => return 0,
        };

        let mut area = 0.0;
        let mut v0 = Vector::zero();
        for edge in &self.edges {
            for p in edge.control_points().iter().skip(1) {
                let v1 = *p - first;
                area += v0.cross(v1);
                v0 = v1;
            }
        }

        if area < 0.0 {
            1
        } else if area > 0.0 {
            -1
        } else {
            0
        }
    }

    /// Reverses the direction of the contour, which negates its winding.
    pub fn reverse(&mut self) {
        self.edges.reverse();
        for edge in &mut self.edges {
            edge.reverse();
        }
    }
}

#[cfg(test)]
use crate::geom::{point, EdgeColor, Point};

#[cfg(test)]
pub(crate) fn polygon(points: &[Point]) -> Contour {
    let mut contour = Contour::new();
    for i in 0..points.len() {
        contour.add_edge(EdgeSegment::linear(
            points[i],
            points[(i + 1) % points.len()],
            EdgeColor::White,
        ));
    }
    contour
}

#[test]
fn contour_winding() {
    // Clockwise with y up.
    let mut square = polygon(&[
        point(0.0, 0.0),
        point(0.0, 1.0),
        point(1.0, 1.0),
        point(1.0, 0.0),
    ]);
    assert_eq!(square.winding(), 1);
    square.reverse();
    assert_eq!(square.winding(), -1);
    assert_eq!(square.edges[0].start(), point(0.0, 0.0));
    assert_eq!(square.edges[0].end(), point(1.0, 0.0));

    assert_eq!(Contour::new().winding(), 0);

    // A single quadratic edge closed on itself.
    let mut drop = Contour::new();
    drop.add_edge(EdgeSegment::quadratic(
        point(0.0, 0.0),
        point(5.0, 5.0),
        point(0.0, 0.0),
        EdgeColor::White,
    ));
    assert_eq!(drop.winding(), 0);

    let flat = polygon(&[point(0.0, 0.0), point(1.0, 0.0), point(2.0, 0.0)]);
    assert_eq!(flat.winding(), 0);
}

#[test]
fn contour_edges_access() {
    let mut contour = polygon(&[point(0.0, 0.0), point(0.0, 1.0), point(1.0, 1.0)]);
    assert_eq!(contour.len(), 3);
    assert!(contour.edge(2).is_ok());
    assert_eq!(
        contour.edge(3).err(),
        Some(crate::MsdfError::OutOfBounds { index: 3, len: 3 })
    );
    assert!(contour.edge_mut(5).is_err());
    assert!(contour.remove_edge(3).is_err());
    assert!(contour
        .insert_edge(5, EdgeSegment::linear(point(0.0, 0.0), point(1.0, 0.0), EdgeColor::Red))
        .is_err());

    let removed = contour.remove_edge(0).unwrap();
    assert_eq!(removed.start(), point(0.0, 0.0));
    contour.insert_edge(0, removed).unwrap();
    assert_eq!(contour.edges[0].start(), point(0.0, 0.0));

    let triples: Vec<_> = contour.edge_triples().collect();
    assert_eq!(triples.len(), 3);
    assert_eq!(triples[0].0, &contour.edges[2]);
    assert_eq!(triples[2].2, &contour.edges[0]);
}

#[test]
fn contour_bounds_and_miters() {
    let triangle = polygon(&[point(0.0, 0.0), point(1.0, 2.0), point(2.0, 0.0)]);

    let mut bounds = Bounds::EMPTY;
    triangle.bound(&mut bounds);
    assert_eq!(bounds, Bounds::new(0.0, 0.0, 2.0, 2.0));

    // Miters stick out of the triangle at its vertices.
    let mut mitered = bounds;
    triangle.bound_miters(&mut mitered, 0.5, 4.0, 1);
    triangle.bound_miters(&mut mitered, 0.5, 4.0, -1);
    assert!(mitered.top > bounds.top + 0.5);
    assert!(mitered.left < bounds.left - 0.5);
    assert!(mitered.right > bounds.right + 0.5);

    // The miter limit caps the length.
    let mut capped = bounds;
    triangle.bound_miters(&mut capped, 0.5, 1.0, 1);
    triangle.bound_miters(&mut capped, 0.5, 1.0, -1);
    assert!(capped.top <= bounds.top + 0.5 + 1e-9);
}
