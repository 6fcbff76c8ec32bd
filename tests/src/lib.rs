//! Shapes shared by the integration tests and the benchmarks.

use msdf::generator::BitmapMut;
use msdf::geom::{point, EdgeColor, EdgeSegment, Point};
use msdf::shape::Shape;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(test)]
mod fields;
#[cfg(test)]
mod shapes;

/// Enables the logs of the generators in tests. Can be called more than once.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A closed polygon made of linear edges.
pub fn polygon(points: &[Point]) -> Shape {
    let mut shape = Shape::new();
    add_polygon(&mut shape, points);
    shape
}

pub fn add_polygon(shape: &mut Shape, points: &[Point]) {
    let contour = shape.add_empty_contour();
    for i in 0..points.len() {
        let to = points[(i + 1) % points.len()];
        contour.add_edge(EdgeSegment::linear(points[i], to, EdgeColor::White));
    }
}

/// The square (0, 0) (4, 0) (4, 4) (0, 4), counter-clockwise.
pub fn square() -> Shape {
    polygon(&[
        point(0.0, 0.0),
        point(4.0, 0.0),
        point(4.0, 4.0),
        point(0.0, 4.0),
    ])
}

/// An L made of a vertical bar from (1, 1) to (3, 7) and a horizontal bar from
/// (1, 1) to (7, 3), clockwise.
pub fn l_shape() -> Shape {
    polygon(&[
        point(1.0, 1.0),
        point(1.0, 7.0),
        point(3.0, 7.0),
        point(3.0, 3.0),
        point(7.0, 3.0),
        point(7.0, 1.0),
    ])
}

/// Two clockwise squares that overlap between (3, 3) and (5, 5).
pub fn overlapping_squares() -> Shape {
    let mut shape = polygon(&[
        point(1.0, 1.0),
        point(1.0, 5.0),
        point(5.0, 5.0),
        point(5.0, 1.0),
    ]);
    add_polygon(
        &mut shape,
        &[
            point(3.0, 3.0),
            point(3.0, 7.0),
            point(7.0, 7.0),
            point(7.0, 3.0),
        ],
    );

    shape
}

/// A glyph-like outline mixing the three kinds of edges: a rounded shield.
pub fn shield() -> Shape {
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    contour.add_edge(EdgeSegment::linear(point(1.0, 7.0), point(7.0, 7.0), EdgeColor::White));
    contour.add_edge(EdgeSegment::quadratic(
        point(7.0, 7.0),
        point(7.5, 3.0),
        point(4.0, 0.5),
        EdgeColor::White,
    ));
    contour.add_edge(EdgeSegment::cubic(
        point(4.0, 0.5),
        point(2.0, 2.0),
        point(0.5, 4.0),
        point(1.0, 7.0),
        EdgeColor::White,
    ));

    shape
}

/// A star-shaped polygon with `3..max_vertices` clockwise vertices around (8, 8).
pub fn random_polygon(rng: &mut StdRng, max_vertices: usize) -> Shape {
    let n = rng.gen_range(3..max_vertices);
    let step = std::f64::consts::PI * 2.0 / n as f64;
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let angle = -step * (i as f64 + rng.gen_range(0.0..0.8));
        let radius = rng.gen_range(1.0..6.0);
        points.push(point(8.0 + radius * angle.cos(), 8.0 + radius * angle.sin()));
    }

    polygon(&points)
}

/// A seeded sequence of random polygons.
pub fn random_polygons(seed: u64, count: usize) -> Vec<Shape> {
    let mut rng = StdRng::seed_from_u64(seed);
    let shapes: Vec<Shape> = (0..count).map(|_| random_polygon(&mut rng, 12)).collect();
    log::debug!(
        "seed {}: {} random polygons, {} edges",
        seed,
        shapes.len(),
        shapes.iter().map(Shape::edge_count).sum::<usize>(),
    );

    shapes
}

/// Allocates the pixels of a `width` x `height` bitmap with `N` channels.
pub fn storage<const N: usize>(width: usize, height: usize) -> Vec<f32> {
    vec![0.0; width * height * N]
}

/// The median of the first three channels of every pixel.
pub fn medians<const N: usize>(bitmap: &BitmapMut<N>) -> Vec<f32> {
    bitmap
        .pixels()
        .chunks_exact(N)
        .map(|p| msdf::geom::utils::median(p[0], p[1], p[2]))
        .collect()
}
