use crate::geom::utils::mix;
use crate::shape::Shape;

use core::cmp::Ordering;

// Irrational, so that the probe line is unlikely to hit a vertex.
const PROBE_RATIO: f64 = 0.6180339887498949;

struct ContourCrossing {
    x: f64,
    direction: i32,
    contour: usize,
}

impl Shape {
    /// Reverses the contours that run the wrong way, so that outer contours end up
    /// with winding `1` and holes with winding `-1`.
    ///
    /// The orientation of each contour is voted along a horizontal line through it:
    /// crossings of the whole shape are sorted by x, and a contour is positive when it
    /// goes up at its crossings of even rank and down at the odd ones. Coincident
    /// crossings are ambiguous and don't vote.
    pub fn orient_contours(&mut self) {
        let mut orientations = vec![0i32; self.contours.len()];
        let mut crossings: Vec<ContourCrossing> = Vec::new();

        for i in 0..self.contours.len() {
            if orientations[i] != 0 {
                continue;
            }
            let y = match probe_y(self, i) {
                Some(y) => y,
                None => continue,
            };

            for (contour_index, contour) in self.contours.iter().enumerate() {
                for edge in &contour.edges {
                    for (x, direction) in edge.scanline_intersections(y) {
                        crossings.push(ContourCrossing {
                            x,
                            direction,
                            contour: contour_index,
                        });
                    }
                }
            }

            crossings.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
            for j in 1..crossings.len() {
                if crossings[j].x == crossings[j - 1].x {
                    crossings[j].direction = 0;
                    crossings[j - 1].direction = 0;
                }
            }

            for (rank, crossing) in crossings.iter().enumerate() {
                if crossing.direction != 0 {
                    let odd = rank & 1 == 1;
                    let upward = crossing.direction > 0;
                    orientations[crossing.contour] += if odd != upward { 1 } else { -1 };
                }
            }
            crossings.clear();
        }

        let mut reversed = 0;
        for (contour, orientation) in self.contours.iter_mut().zip(orientations) {
            if orientation < 0 {
                contour.reverse();
                reversed += 1;
            }
        }

        if reversed > 0 {
            log::debug!("orient_contours: reversed {} contours", reversed);
        }
    }
}

// A y value that crosses the contour, away from its vertices.
fn probe_y(shape: &Shape, contour_index: usize) -> Option<f64> {
    let edges = &shape.contours[contour_index].edges;
    let y0 = edges.first()?.point(0.0).y;

    let mut y1 = y0;
    for edge in edges {
        if y0 != y1 {
            break;
        }
        y1 = edge.point(1.0).y;
    }
    // All endpoints are on a horizontal line.
    for edge in edges {
        if y0 != y1 {
            break;
        }
        y1 = edge.point(PROBE_RATIO).y;
    }

    Some(mix(y0, y1, PROBE_RATIO))
}

#[cfg(test)]
use crate::contour::polygon;
#[cfg(test)]
use crate::geom::point;

#[test]
fn orient_nested_contours() {
    let mut shape = Shape::new();
    // Outer square, counter-clockwise (wrong).
    shape.add_contour(polygon(&[
        point(0.0, 0.0),
        point(10.0, 0.0),
        point(10.0, 10.0),
        point(0.0, 10.0),
    ]));
    // Hole, clockwise (wrong).
    shape.add_contour(polygon(&[
        point(3.0, 3.0),
        point(3.0, 7.0),
        point(7.0, 7.0),
        point(7.0, 3.0),
    ]));
    // Island in the hole, already clockwise.
    shape.add_contour(polygon(&[
        point(4.0, 4.0),
        point(4.0, 6.0),
        point(6.0, 6.0),
        point(6.0, 4.0),
    ]));

    assert_eq!(shape.contours[0].winding(), -1);
    assert_eq!(shape.contours[1].winding(), 1);
    assert_eq!(shape.contours[2].winding(), 1);

    shape.orient_contours();

    assert_eq!(shape.contours[0].winding(), 1);
    assert_eq!(shape.contours[1].winding(), -1);
    assert_eq!(shape.contours[2].winding(), 1);

    // Already oriented: nothing changes.
    let oriented = shape.clone();
    shape.orient_contours();
    assert_eq!(shape, oriented);
}

#[test]
fn orient_separate_contours() {
    let mut shape = Shape::new();
    shape.add_contour(polygon(&[point(0.0, 0.0), point(2.0, 0.0), point(1.0, 2.0)]));
    shape.add_contour(polygon(&[point(5.0, 0.0), point(6.0, 2.0), point(7.0, 0.0)]));
    shape.add_empty_contour();

    shape.orient_contours();
    assert_eq!(shape.contours[0].winding(), 1);
    assert_eq!(shape.contours[1].winding(), 1);
    assert!(shape.contours[2].is_empty());
}
