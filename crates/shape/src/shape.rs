use crate::contour::Contour;
use crate::geom::{Bounds, EdgeSegment, MsdfError, MsdfResult};
use crate::normalize::NormalizeOptions;
use crate::scanline::Scanline;

/// A vector outline: an ordered list of contours.
///
/// Contours of winding `1` add to the shape, contours of winding `-1` carve holes in
/// it (see [`Contour::winding`]).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Shape {
    pub contours: Vec<Contour>,
    /// Set when the y axis of the shape points down. The generators then fill the
    /// bitmap rows in reverse order.
    pub inverse_y_axis: bool,
}

impl Shape {
    pub fn new() -> Self {
        Shape {
            contours: Vec::new(),
            inverse_y_axis: false,
        }
    }

    #[inline]
    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    /// Adds an empty contour and returns it to be populated.
    pub fn add_empty_contour(&mut self) -> &mut Contour {
        self.contours.push(Contour::new());
        let last = self.contours.len() - 1;
        &mut self.contours[last]
    }

    pub fn contour(&self, index: usize) -> MsdfResult<&Contour> {
        MsdfError::check_index(index, self.contours.len())?;
        Ok(&self.contours[index])
    }

    pub fn contour_mut(&mut self, index: usize) -> MsdfResult<&mut Contour> {
        MsdfError::check_index(index, self.contours.len())?;
        Ok(&mut self.contours[index])
    }

    pub fn remove_contour(&mut self, index: usize) -> MsdfResult<Contour> {
        MsdfError::check_index(index, self.contours.len())?;
        Ok(self.contours.remove(index))
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    /// Iterates over all edges along with the previous and next edges of their contour.
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeSegment, &EdgeSegment, &EdgeSegment)> + '_ {
        self.contours.iter().flat_map(|contour| contour.edge_triples())
    }

    /// Checks that every contour is closed and that all coordinates are finite.
    ///
    /// [`normalize`](Self::normalize) turns any shape into a valid one.
    pub fn validate(&self) -> bool {
        let tolerance = NormalizeOptions::DEFAULT_TOLERANCE;
        for contour in &self.contours {
            let mut corner = match contour.edges.last() {
                Some(edge) => edge.end(),
                None => continue,
            };
            for edge in &contour.edges {
                if !edge.is_finite() || (edge.start() - corner).length() > tolerance {
                    return false;
                }
                corner = edge.end();
            }
        }

        true
    }

    /// Grow `bounds` to contain the shape.
    pub fn bound(&self, bounds: &mut Bounds) {
        for contour in &self.contours {
            contour.bound(bounds);
        }
    }

    /// Grow `bounds` to contain the miters of the shape stroked with half-width
    /// `border`. See [`Contour::bound_miters`].
    pub fn bound_miters(&self, bounds: &mut Bounds, border: f64, miter_limit: f64, polarity: i32) {
        for contour in &self.contours {
            contour.bound_miters(bounds, border, miter_limit, polarity);
        }
    }

    /// Bounds of the shape, grown by `border` on every side and by the miters when
    /// `miter_limit` is positive.
    ///
    /// Starts from huge inverted bounds, so that the result of an empty shape is
    /// still usable in arithmetic.
    pub fn get_bounds(&self, border: f64, miter_limit: f64, polarity: i32) -> Bounds {
        const LARGE_VALUE: f64 = 1e240;
        let mut bounds = Bounds::new(LARGE_VALUE, LARGE_VALUE, -LARGE_VALUE, -LARGE_VALUE);
        self.bound(&mut bounds);
        if border > 0.0 {
            bounds.inflate(border);
            if miter_limit > 0.0 {
                self.bound_miters(&mut bounds, border, miter_limit, polarity);
            }
        }

        bounds
    }

    /// Computes the intersections of the shape with the horizontal line at `y`.
    ///
    /// The scanline's storage is reused.
    pub fn scanline(&self, scanline: &mut Scanline, y: f64) {
        scanline.clear();
        for contour in &self.contours {
            for edge in &contour.edges {
                for (x, direction) in edge.scanline_intersections(y) {
                    scanline.push(x, direction);
                }
            }
        }
        scanline.preprocess();
    }
}

#[cfg(test)]
use crate::contour::polygon;
#[cfg(test)]
use crate::geom::{point, EdgeColor};
#[cfg(test)]
use crate::scanline::FillRule;

#[cfg(test)]
fn square_with_hole() -> Shape {
    let mut shape = Shape::new();
    shape.add_contour(polygon(&[
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(10.0, 10.0),
        point(10.0, 0.0),
    ]));
    shape.add_contour(polygon(&[
        point(3.0, 3.0),
        point(6.0, 3.0),
        point(6.0, 6.0),
        point(3.0, 6.0),
    ]));
    shape
}

#[test]
fn shape_scanline() {
    let shape = square_with_hole();
    assert_eq!(shape.contours[0].winding(), 1);
    assert_eq!(shape.contours[1].winding(), -1);

    let mut scanline = Scanline::new();
    shape.scanline(&mut scanline, 4.5);
    assert_eq!(scanline.intersections().len(), 4);
    assert!(scanline.filled(1.0, FillRule::NonZero));
    assert!(!scanline.filled(4.0, FillRule::NonZero));
    assert!(scanline.filled(8.0, FillRule::NonZero));
    assert!(!scanline.filled(11.0, FillRule::NonZero));
    assert!(!scanline.filled(-1.0, FillRule::NonZero));

    // The storage is reset between rows.
    shape.scanline(&mut scanline, 1.0);
    assert_eq!(scanline.intersections().len(), 2);
    assert!(scanline.filled(4.0, FillRule::NonZero));
}

#[test]
fn shape_bounds() {
    let shape = square_with_hole();
    assert_eq!(shape.get_bounds(0.0, 0.0, 0), Bounds::new(0.0, 0.0, 10.0, 10.0));
    assert_eq!(shape.get_bounds(1.0, 0.0, 0), Bounds::new(-1.0, -1.0, 11.0, 11.0));

    // The miters of square corners end at the corners of the grown bounds.
    let mitered = shape.get_bounds(1.0, 2.0, 1);
    assert!((mitered.left + 1.0).abs() < 1e-9, "{:?}", mitered);
    assert!((mitered.top - 11.0).abs() < 1e-9, "{:?}", mitered);

    let empty = Shape::new().get_bounds(0.0, 0.0, 0);
    assert!(empty.left > empty.right);
}

#[test]
fn shape_validation() {
    let mut shape = square_with_hole();
    assert!(shape.validate());
    assert_eq!(shape.edge_count(), 8);
    assert_eq!(shape.edges().count(), 8);

    shape.add_empty_contour();
    assert!(shape.validate());

    shape
        .add_empty_contour()
        .add_edge(EdgeSegment::linear(point(0.0, 0.0), point(1.0, 0.0), EdgeColor::White));
    assert!(!shape.validate());
    assert!(shape.remove_contour(3).is_ok());
    assert!(shape.remove_contour(3).is_err());
    assert!(shape.contour(2).is_ok());
    assert!(shape.contour_mut(4).is_err());

    shape.contours[0].edges[0] =
        EdgeSegment::linear(point(0.0, f64::NAN), point(0.0, 10.0), EdgeColor::White);
    assert!(!shape.validate());
}
