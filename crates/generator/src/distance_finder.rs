use crate::contour_combiners::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
use crate::edge_selectors::EdgeSelector;
use crate::shape::geom::Point;
use crate::shape::Shape;

/// Computes the distance from arbitrary points to a shape.
///
/// The finder owns its combiner and selectors, so a finder per thread is needed to
/// query the same shape in parallel.
#[derive(Clone, Debug)]
pub struct ShapeDistanceFinder<'l, C> {
    shape: &'l Shape,
    combiner: C,
}

impl<'l, C: ContourCombiner> ShapeDistanceFinder<'l, C> {
    pub fn new(shape: &'l Shape, combiner: C) -> Self {
        ShapeDistanceFinder { shape, combiner }
    }

    #[inline]
    pub fn shape(&self) -> &'l Shape {
        self.shape
    }

    pub fn distance(&mut self, origin: Point) -> <C::Selector as EdgeSelector>::Distance {
        self.combiner.reset(origin);
        for (i, contour) in self.shape.contours.iter().enumerate() {
            if contour.is_empty() {
                continue;
            }
            let selector = self.combiner.edge_selector(i);
            for (prev, edge, next) in contour.edge_triples() {
                selector.add_edge(prev, edge, next);
            }
        }

        self.combiner.distance()
    }
}

impl<'l, S: EdgeSelector> ShapeDistanceFinder<'l, SimpleContourCombiner<S>> {
    /// A finder that treats the shape as a single contour.
    pub fn simple(shape: &'l Shape, selector: S) -> Self {
        ShapeDistanceFinder::new(shape, SimpleContourCombiner::new(selector))
    }
}

impl<'l, S: EdgeSelector> ShapeDistanceFinder<'l, OverlappingContourCombiner<S>> {
    /// A finder that resolves overlapping contours.
    pub fn overlapping(shape: &'l Shape, selector: S) -> Self {
        ShapeDistanceFinder::new(shape, OverlappingContourCombiner::new(shape, selector))
    }
}

/// Distance from `origin` to `shape` with a single contour evaluation, for one-off
/// queries.
pub fn one_shot_distance<S: EdgeSelector>(shape: &Shape, selector: S, origin: Point) -> S::Distance {
    ShapeDistanceFinder::simple(shape, selector).distance(origin)
}

#[cfg(test)]
use crate::edge_selectors::{MultiDistanceSelector, PerpendicularDistanceSelector, TrueDistanceSelector};
#[cfg(test)]
use crate::shape::geom::{point, EdgeColor, EdgeSegment};

#[cfg(test)]
fn diamond() -> Shape {
    // Clockwise with y up.
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    let corners = [point(0.0, -2.0), point(-2.0, 0.0), point(0.0, 2.0), point(2.0, 0.0)];
    let colors = [EdgeColor::Magenta, EdgeColor::Yellow, EdgeColor::Magenta, EdgeColor::Yellow];
    for i in 0..4 {
        contour.add_edge(EdgeSegment::linear(corners[i], corners[(i + 1) % 4], colors[i]));
    }
    shape.add_empty_contour();
    shape
}

#[test]
fn finder_distances() {
    let shape = diamond();
    assert_eq!(shape.contours[0].winding(), 1);

    let mut finder = ShapeDistanceFinder::simple(&shape, TrueDistanceSelector::default());
    assert!((finder.distance(point(0.0, 0.0)) - 2f64.sqrt()).abs() < 1e-12);
    assert!((finder.distance(point(4.0, 0.0)) + 2.0).abs() < 1e-12);
    assert!(finder.shape().contours.len() == 2);

    let mut finder = ShapeDistanceFinder::overlapping(&shape, PerpendicularDistanceSelector::default());
    assert!((finder.distance(point(0.0, 0.0)) - 2f64.sqrt()).abs() < 1e-12);
    // Beyond the right corner, the pseudo-distance extends the sides.
    assert!((finder.distance(point(4.0, 0.0)) + 2f64.sqrt()).abs() < 1e-12);

    let multi = one_shot_distance(&shape, MultiDistanceSelector::default(), point(0.0, 0.0));
    assert!((multi.r - 2f64.sqrt()).abs() < 1e-12);
}
