use crate::*;

use msdf::coloring::{color_edges, ColoringOptions, ColoringStrategy};
use msdf::generator::{DistanceMapping, Projection};
use msdf::geom::utils::normalize;
use msdf::geom::{point, vector, DistanceRange, EdgeColor, EdgeSegment};
use msdf::shape::{Contour, Shape};

const STRATEGIES: [ColoringStrategy; 3] = [
    ColoringStrategy::Simple,
    ColoringStrategy::InkTrap,
    ColoringStrategy::ByDistance,
];

fn shapes_to_repair() -> Vec<Shape> {
    let mut shapes = random_polygons(1, 16);

    // Open contour, closed by a bridge.
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    contour.add_edge(EdgeSegment::linear(point(0.0, 0.0), point(4.0, 0.0), EdgeColor::White));
    contour.add_edge(EdgeSegment::linear(point(4.0, 0.0), point(4.0, 4.0), EdgeColor::White));
    contour.add_edge(EdgeSegment::linear(point(4.0, 4.0), point(0.0, 4.0), EdgeColor::White));
    shapes.push(shape);

    // A gap below the tolerance and a degenerate edge.
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    contour.add_edge(EdgeSegment::linear(point(0.0, 0.0), point(0.0, 3.0), EdgeColor::White));
    contour.add_edge(EdgeSegment::linear(point(0.0, 3.0), point(0.0, 3.0), EdgeColor::White));
    contour.add_edge(EdgeSegment::linear(point(1e-10, 3.0), point(3.0, 0.0), EdgeColor::White));
    contour.add_edge(EdgeSegment::linear(point(3.0, 0.0), point(0.0, 0.0), EdgeColor::White));
    shapes.push(shape);

    // A closed curve made of a single edge.
    let mut shape = Shape::new();
    shape.add_empty_contour().add_edge(EdgeSegment::cubic(
        point(0.0, 0.0),
        point(3.0, 3.0),
        point(-3.0, 3.0),
        point(0.0, 0.0),
        EdgeColor::White,
    ));
    shapes.push(shape);

    shapes.push(shield());
    shapes
}

#[test]
fn normalize_is_idempotent() {
    init_logger();
    for mut shape in shapes_to_repair() {
        shape.normalize();
        assert!(shape.validate(), "{:?}", shape);

        let mut again = shape.clone();
        again.normalize();
        assert_eq!(again, shape);
    }
}

#[test]
fn normalize_splits_single_edges() {
    let mut shapes = shapes_to_repair();
    let mut teardrop = shapes.remove(shapes.len() - 2);
    teardrop.normalize();
    assert_eq!(teardrop.contours[0].len(), 3);
    assert_eq!(teardrop.contours[0].edges[0].start(), point(0.0, 0.0));
    assert_eq!(teardrop.contours[0].edges[2].end(), point(0.0, 0.0));
}

#[test]
fn winding_of_simple_contours() {
    for shape in random_polygons(2, 32) {
        let mut contour: Contour = shape.contours[0].clone();
        assert_eq!(contour.winding(), 1);
        contour.reverse();
        assert_eq!(contour.winding(), -1);
        contour.reverse();
        assert_eq!(contour, shape.contours[0]);
    }

    assert_eq!(square().contours[0].winding(), -1);
    assert_eq!(l_shape().contours[0].winding(), 1);
    assert_eq!(shield().contours[0].winding(), 1);
    assert_eq!(Contour::new().winding(), 0);
}

#[test]
fn orient_contours() {
    let mut shape = square();
    shape.orient_contours();
    assert_eq!(shape.contours[0].winding(), 1);

    // The hole of a ring keeps running the other way.
    let mut ring = polygon(&[point(0.0, 0.0), point(0.0, 6.0), point(6.0, 6.0), point(6.0, 0.0)]);
    add_polygon(&mut ring, &[point(2.0, 2.0), point(2.0, 4.0), point(4.0, 4.0), point(4.0, 2.0)]);
    ring.orient_contours();
    assert_eq!(ring.contours[0].winding(), 1);
    assert_eq!(ring.contours[1].winding(), -1);
}

#[test]
fn projection_inverse() {
    let projection = Projection::new(vector(2.0, 0.5), vector(3.0, -1.0));
    assert_eq!(projection.inverse().inverse(), projection);
    assert_eq!(projection.inverse(), Projection::new(vector(0.5, 2.0), vector(-1.5, 2.0)));

    for &p in &[point(0.0, 0.0), point(1.25, -7.5), point(-3.3, 0.1)] {
        let q = projection.unproject(projection.project(p));
        assert!((q - p).length() < 1e-12, "{:?} {:?}", p, q);
    }

    let v = vector(3.0, 4.0);
    assert_eq!(projection.project_vector(v), vector(6.0, 2.0));
    assert_eq!(projection.unproject_vector(projection.project_vector(v)), v);
}

#[test]
fn distance_mapping_inverse() {
    let mapping = DistanceMapping::from_range(DistanceRange::symmetrical(4.0));
    assert_eq!(mapping, DistanceMapping::new(0.25, 0.5));
    assert_eq!(mapping.inverse(), DistanceMapping::new(4.0, -2.0));
    assert_eq!(mapping.inverse().inverse(), mapping);

    assert_eq!(mapping.map(-2.0), 0.0);
    assert_eq!(mapping.map(0.0), 0.5);
    assert_eq!(mapping.map(2.0), 1.0);
    assert_eq!(mapping.map_delta(1.0), 0.25);
    for &d in &[-3.0, -0.1, 0.0, 1.7] {
        assert!((mapping.inverse().map(mapping.map(d)) - d).abs() < 1e-12);
    }
}

fn is_corner(prev: &EdgeSegment, edge: &EdgeSegment, cross_threshold: f64) -> bool {
    let a = normalize(prev.direction(1.0));
    let b = normalize(edge.direction(0.0));
    a.dot(b) <= 0.0 || a.cross(b).abs() > cross_threshold
}

#[test]
fn coloring_corner_rule() {
    init_logger();
    let cross_threshold = ColoringOptions::DEFAULT_ANGLE_THRESHOLD.sin();
    let mut shapes = random_polygons(3, 24);
    shapes.push(l_shape());
    shapes.push(shield());

    for &strategy in &STRATEGIES {
        for (seed, shape) in shapes.iter().enumerate() {
            let mut shape = shape.clone();
            shape.normalize();
            let options = ColoringOptions::DEFAULT
                .with_strategy(strategy)
                .with_seed(seed as u64);
            color_edges(&mut shape, &options);

            for contour in &shape.contours {
                for (prev, edge, _) in contour.edge_triples() {
                    assert_ne!(edge.color, EdgeColor::Black);
                    if is_corner(prev, edge, cross_threshold) {
                        assert_eq!(
                            (prev.color & edge.color).channel_count(),
                            1,
                            "{:?} seed {}: {:?} -> {:?}",
                            strategy,
                            seed,
                            prev.color,
                            edge.color,
                        );
                    } else {
                        assert_eq!(prev.color, edge.color, "{:?} seed {}", strategy, seed);
                    }
                }
            }
        }
    }
}

#[test]
fn coloring_is_deterministic() {
    let shapes = random_polygons(4, 8);
    for &strategy in &STRATEGIES {
        for seed in 0..4 {
            let options = ColoringOptions::DEFAULT
                .with_strategy(strategy)
                .with_seed(seed);
            for shape in &shapes {
                let mut a = shape.clone();
                let mut b = shape.clone();
                color_edges(&mut a, &options);
                color_edges(&mut b, &options);
                assert_eq!(a, b);
            }
        }
    }
}

#[test]
fn random_polygons_are_seeded() {
    init_logger();
    let shapes = random_polygons(5, 16);
    assert_eq!(shapes.len(), 16);
    assert_eq!(shapes, random_polygons(5, 16));
    assert_ne!(shapes, random_polygons(6, 16));

    for shape in &shapes {
        assert!(shape.validate());
        assert_eq!(shape.contours.len(), 1);
        assert!((3..12).contains(&shape.edge_count()));
        assert_eq!(shape.contours[0].winding(), 1);
    }
}
