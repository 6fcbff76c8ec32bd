//! Contour combiners decide how the distances to the contours of a shape add up.

use crate::edge_selectors::{DistanceValue, EdgeSelector};
use crate::shape::geom::Point;
use crate::shape::Shape;

/// Routes the edges of each contour to an [`EdgeSelector`] and combines the results.
pub trait ContourCombiner: Send {
    type Selector: EdgeSelector;

    /// Starts over at a new point.
    fn reset(&mut self, origin: Point);

    /// The selector that receives the edges of contour `contour`.
    fn edge_selector(&mut self, contour: usize) -> &mut Self::Selector;

    fn distance(&self) -> <Self::Selector as EdgeSelector>::Distance;
}

/// Treats the whole shape as a single contour.
///
/// Only correct for shapes whose contours don't overlap.
#[derive(Clone, Debug)]
pub struct SimpleContourCombiner<S> {
    selector: S,
}

impl<S: EdgeSelector> SimpleContourCombiner<S> {
    pub fn new(selector: S) -> Self {
        SimpleContourCombiner { selector }
    }
}

impl<S: EdgeSelector> ContourCombiner for SimpleContourCombiner<S> {
    type Selector = S;

    fn reset(&mut self, origin: Point) {
        self.selector.reset(origin);
    }

    fn edge_selector(&mut self, _contour: usize) -> &mut S {
        &mut self.selector
    }

    fn distance(&self) -> S::Distance {
        self.selector.distance()
    }
}

/// Evaluates each contour separately and combines them according to their winding,
/// so that overlapping contours produce the distance field of their union.
#[derive(Clone, Debug)]
pub struct OverlappingContourCombiner<S> {
    origin: Point,
    windings: Vec<i32>,
    selectors: Vec<S>,
    prototype: S,
}

impl<S: EdgeSelector> OverlappingContourCombiner<S> {
    /// `selector` is cloned for every contour of `shape`.
    pub fn new(shape: &Shape, selector: S) -> Self {
        OverlappingContourCombiner {
            origin: Point::origin(),
            windings: shape.contours.iter().map(|c| c.winding()).collect(),
            selectors: vec![selector.clone(); shape.contours.len()],
            prototype: selector,
        }
    }

    fn empty_selector(&self) -> S {
        let mut selector = self.prototype.clone();
        selector.reset(self.origin);
        selector
    }
}

impl<S: EdgeSelector> ContourCombiner for OverlappingContourCombiner<S> {
    type Selector = S;

    fn reset(&mut self, origin: Point) {
        self.origin = origin;
        for selector in &mut self.selectors {
            selector.reset(origin);
        }
    }

    fn edge_selector(&mut self, contour: usize) -> &mut S {
        &mut self.selectors[contour]
    }

    fn distance(&self) -> S::Distance {
        let mut shape_selector = self.empty_selector();
        let mut inner_selector = self.empty_selector();
        let mut outer_selector = self.empty_selector();

        for (selector, &winding) in self.selectors.iter().zip(&self.windings) {
            let distance = selector.distance().resolve();
            shape_selector.merge(selector);
            if winding > 0 && distance >= 0.0 {
                inner_selector.merge(selector);
            }
            if winding < 0 && distance <= 0.0 {
                outer_selector.merge(selector);
            }
        }

        let shape_distance = shape_selector.distance();
        let inner_distance = inner_selector.distance();
        let outer_distance = outer_selector.distance();
        let inner = inner_distance.resolve();
        let outer = outer_distance.resolve();

        let (mut distance, winding) = if inner >= 0.0 && inner.abs() <= outer.abs() {
            // Inside of a positive contour: keep the contour boundary that is nearest
            // while still closer than the outer boundary.
            let mut distance = inner_distance;
            for (selector, &winding) in self.selectors.iter().zip(&self.windings) {
                if winding > 0 {
                    let contour_distance = selector.distance();
                    let d = contour_distance.resolve();
                    if d.abs() < outer.abs() && d > distance.resolve() {
                        distance = contour_distance;
                    }
                }
            }
            (distance, 1)
        } else if outer <= 0.0 && outer.abs() < inner.abs() {
            let mut distance = outer_distance;
            for (selector, &winding) in self.selectors.iter().zip(&self.windings) {
                if winding < 0 {
                    let contour_distance = selector.distance();
                    let d = contour_distance.resolve();
                    if d.abs() < inner.abs() && d < distance.resolve() {
                        distance = contour_distance;
                    }
                }
            }
            (distance, -1)
        } else {
            return shape_distance;
        };

        // Contours of the opposite winding that cut through the chosen one.
        for (selector, &contour_winding) in self.selectors.iter().zip(&self.windings) {
            if contour_winding != winding {
                let contour_distance = selector.distance();
                let d = contour_distance.resolve();
                let current = distance.resolve();
                if d * current >= 0.0 && d.abs() < current.abs() {
                    distance = contour_distance;
                }
            }
        }

        if distance.resolve() == shape_distance.resolve() {
            distance = shape_distance;
        }

        distance
    }
}

#[cfg(test)]
use crate::edge_selectors::TrueDistanceSelector;
#[cfg(test)]
use crate::shape::geom::{point, EdgeColor, EdgeSegment};
#[cfg(test)]
use crate::shape::Contour;

#[cfg(test)]
fn rectangle(left: f64, bottom: f64, right: f64, top: f64) -> Contour {
    // Clockwise with y up.
    let corners = [
        point(left, bottom),
        point(left, top),
        point(right, top),
        point(right, bottom),
    ];
    Contour::with_edges(
        (0..4)
            .map(|i| EdgeSegment::linear(corners[i], corners[(i + 1) % 4], EdgeColor::White))
            .collect(),
    )
}

#[cfg(test)]
fn combined_distance<C: ContourCombiner>(combiner: &mut C, shape: &Shape, origin: Point) -> f64 {
    combiner.reset(origin);
    for (i, contour) in shape.contours.iter().enumerate() {
        let selector = combiner.edge_selector(i);
        for (prev, edge, next) in contour.edge_triples() {
            selector.add_edge(prev, edge, next);
        }
    }
    combiner.distance().resolve()
}

#[test]
fn overlapping_rectangles() {
    // Two rectangles overlapping on [2, 4] x [0, 4].
    let mut shape = Shape::new();
    shape.add_contour(rectangle(0.0, 0.0, 4.0, 4.0));
    shape.add_contour(rectangle(2.0, 0.0, 6.0, 4.0));

    let mut simple = SimpleContourCombiner::new(TrueDistanceSelector::default());
    let mut overlapping = OverlappingContourCombiner::new(&shape, TrueDistanceSelector::default());

    // Inside of the union, next to the hidden side of the second rectangle. The simple
    // combiner stops at the hidden side, the overlapping one keeps the deepest contour.
    let p = point(2.5, 2.0);
    assert!((combined_distance(&mut simple, &shape, p) - 0.5).abs() < 1e-12);
    assert!((combined_distance(&mut overlapping, &shape, p) - 1.5).abs() < 1e-12);

    // Outside, both agree.
    let p = point(7.0, 2.0);
    assert!((combined_distance(&mut simple, &shape, p) + 1.0).abs() < 1e-12);
    assert!((combined_distance(&mut overlapping, &shape, p) + 1.0).abs() < 1e-12);
}

#[test]
fn overlapping_hole() {
    // A square with a counter-clockwise hole.
    let mut shape = Shape::new();
    shape.add_contour(rectangle(0.0, 0.0, 6.0, 6.0));
    let mut hole = rectangle(2.0, 2.0, 4.0, 4.0);
    hole.reverse();
    shape.add_contour(hole);
    assert_eq!(shape.contours[1].winding(), -1);

    let mut overlapping = OverlappingContourCombiner::new(&shape, TrueDistanceSelector::default());
    assert!((combined_distance(&mut overlapping, &shape, point(3.0, 3.0)) + 1.0).abs() < 1e-12);
    assert!((combined_distance(&mut overlapping, &shape, point(1.0, 3.0)) - 1.0).abs() < 1e-12);
    assert!((combined_distance(&mut overlapping, &shape, point(-1.0, 3.0)) + 1.0).abs() < 1e-12);
}
