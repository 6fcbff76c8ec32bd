use crate::shape::geom::EdgeColor;
use crate::shape::Shape;
use crate::utils::{color_teardrop, find_corners, init_color, switch_color, teardrop_colors, Seed};

/// Assigns colors to the edges of the shape so that the two edges of every corner
/// share exactly one channel.
///
/// The color switches at every corner. A join is a corner when the direction turns by
/// more than `angle_threshold` radians (or by a right angle or more whatever the
/// threshold). `seed` drives the choice among the valid colors.
pub fn edge_coloring_simple(shape: &mut Shape, angle_threshold: f64, seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut seed = Seed::new(seed);
    let mut color = init_color(&mut seed);
    let mut corner_count = 0;

    for contour in &mut shape.contours {
        if contour.is_empty() {
            continue;
        }

        let corners = find_corners(contour, cross_threshold);
        corner_count += corners.len();

        match corners.len() {
            0 => {
                switch_color(&mut color, &mut seed, EdgeColor::Black);
                for edge in &mut contour.edges {
                    edge.color = color;
                }
            }
            1 => {
                let colors = teardrop_colors(&mut color, &mut seed);
                color_teardrop(contour, corners[0], colors);
            }
            _ => {
                let start = corners[0];
                let edge_count = contour.edges.len();
                let mut spline = 0;
                switch_color(&mut color, &mut seed, EdgeColor::Black);
                let initial_color = color;
                for i in 0..edge_count {
                    let index = (start + i) % edge_count;
                    if spline + 1 < corners.len() && corners[spline + 1] == index {
                        spline += 1;
                        // The last spline meets the first one at the starting corner.
                        let banned = if spline == corners.len() - 1 {
                            initial_color
                        } else {
                            EdgeColor::Black
                        };
                        switch_color(&mut color, &mut seed, banned);
                    }
                    contour.edges[index].color = color;
                }
            }
        }
    }

    log::debug!(
        "edge_coloring_simple: {} contours, {} corners",
        shape.contours.len(),
        corner_count
    );
}

#[cfg(test)]
use crate::shape::geom::{point, EdgeSegment};
#[cfg(test)]
use crate::shape::Contour;

#[cfg(test)]
fn square() -> Shape {
    let corners = [point(0.0, 0.0), point(0.0, 4.0), point(4.0, 4.0), point(4.0, 0.0)];
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    for i in 0..4 {
        contour.add_edge(EdgeSegment::linear(corners[i], corners[(i + 1) % 4], EdgeColor::White));
    }
    shape
}

#[test]
fn simple_square() {
    for seed in 0..16 {
        let mut shape = square();
        edge_coloring_simple(&mut shape, 3.0, seed);
        let edges = &shape.contours[0].edges;
        for i in 0..4 {
            let a = edges[i].color;
            let b = edges[(i + 1) % 4].color;
            assert_eq!(a.channel_count(), 2);
            assert_eq!((a & b).channel_count(), 1, "seed {}: {:?} {:?}", seed, a, b);
        }
    }
}

#[test]
fn simple_smooth_contour() {
    let mut shape = Shape::new();
    let mut circle = Contour::new();
    let k = 0.5522847498;
    circle.add_edge(EdgeSegment::cubic(
        point(1.0, 0.0),
        point(1.0, -k),
        point(k, -1.0),
        point(0.0, -1.0),
        EdgeColor::White,
    ));
    circle.add_edge(EdgeSegment::cubic(
        point(0.0, -1.0),
        point(-k, -1.0),
        point(-1.0, -k),
        point(-1.0, 0.0),
        EdgeColor::White,
    ));
    circle.add_edge(EdgeSegment::cubic(
        point(-1.0, 0.0),
        point(-1.0, k),
        point(-k, 1.0),
        point(0.0, 1.0),
        EdgeColor::White,
    ));
    circle.add_edge(EdgeSegment::cubic(
        point(0.0, 1.0),
        point(k, 1.0),
        point(1.0, k),
        point(1.0, 0.0),
        EdgeColor::White,
    ));
    shape.add_contour(circle);

    edge_coloring_simple(&mut shape, 3.0, 0);
    let first = shape.contours[0].edges[0].color;
    assert_eq!(first.channel_count(), 2);
    assert!(shape.contours[0].edges.iter().all(|e| e.color == first));
}

#[test]
fn simple_is_deterministic() {
    let mut a = square();
    let mut b = square();
    edge_coloring_simple(&mut a, 3.0, 42);
    edge_coloring_simple(&mut b, 3.0, 42);
    assert_eq!(a, b);
}
