//! Building blocks shared by the coloring heuristics.

use crate::shape::geom::utils::normalize;
use crate::shape::geom::{EdgeColor, EdgeSegment, Vector};
use crate::shape::Contour;

/// Number of pieces of the polyline used to estimate the length of an edge.
const EDGE_LENGTH_PRECISION: u32 = 4;

/// Deterministic source of choices, consumed from the low digits.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Seed(u64);

impl Seed {
    pub fn new(seed: u64) -> Self {
        Seed(seed)
    }

    /// Returns 0 or 1.
    pub fn extract2(&mut self) -> u64 {
        let v = self.0 & 1;
        self.0 >>= 1;
        v
    }

    /// Returns 0, 1 or 2.
    pub fn extract3(&mut self) -> u64 {
        let v = self.0 % 3;
        self.0 /= 3;
        v
    }
}

/// Returns true if the join between two unit directions is a corner.
#[inline]
pub(crate) fn is_corner(a: Vector, b: Vector, cross_threshold: f64) -> bool {
    a.dot(b) <= 0.0 || a.cross(b).abs() > cross_threshold
}

/// Indices of the edges that start at a corner.
pub(crate) fn find_corners(contour: &Contour, cross_threshold: f64) -> Vec<usize> {
    let mut corners = Vec::new();
    let mut prev_direction = match contour.edges.last() {
        Some(edge) => edge.direction(1.0),
        None => return corners,
    };

    for (index, edge) in contour.edges.iter().enumerate() {
        if is_corner(normalize(prev_direction), normalize(edge.direction(0.0)), cross_threshold) {
            corners.push(index);
        }
        prev_direction = edge.direction(1.0);
    }

    corners
}

pub(crate) fn init_color(seed: &mut Seed) -> EdgeColor {
    const COLORS: [EdgeColor; 3] = [EdgeColor::Cyan, EdgeColor::Magenta, EdgeColor::Yellow];
    COLORS[seed.extract3() as usize]
}

/// Moves to another two-channel color that shares exactly one channel with `color`.
///
/// If `color` shares a single channel with `banned`, the result is the color made of
/// the two other channels, so that it also shares exactly one channel with `banned`.
pub(crate) fn switch_color(color: &mut EdgeColor, seed: &mut Seed, banned: EdgeColor) {
    let combined = *color & banned;
    if combined.channel_count() == 1 {
        *color = combined ^ EdgeColor::White;
        return;
    }

    if *color == EdgeColor::Black || *color == EdgeColor::White {
        *color = init_color(seed);
        return;
    }

    let shifted = color.bits() << (1 + seed.extract2());
    *color = EdgeColor::from_bits_truncate(shifted | shifted >> 3);
}

/// Which third of a teardrop contour the `index`-th edge out of `count` falls in:
/// -1, 0 or 1.
pub(crate) fn symmetrical_trichotomy(index: usize, count: usize) -> i32 {
    (3.0 + 2.875 * index as f64 / (count - 1) as f64 - 1.4375 + 0.5) as i32 - 3
}

/// Length of the edge approximated with a short polyline.
pub(crate) fn estimate_edge_length(edge: &EdgeSegment) -> f64 {
    let mut length = 0.0;
    let mut prev = edge.point(0.0);
    for i in 1..=EDGE_LENGTH_PRECISION {
        let current = edge.point(i as f64 / EDGE_LENGTH_PRECISION as f64);
        length += (current - prev).length();
        prev = current;
    }

    length
}

/// Replaces the one or two edges of a contour with their thirds, starting with the
/// edge at `corner`.
pub(crate) fn split_short_contour(contour: &mut Contour, corner: usize) {
    let mut parts = Vec::with_capacity(6);
    let count = contour.edges.len();
    for i in 0..count {
        parts.extend_from_slice(&contour.edges[(corner + i) % count].split_in_thirds());
    }
    contour.edges = parts;
}

/// Colors a contour that has a single corner with three colors `(first, White,
/// last)`. Contours of one or two edges are split so that each color gets a part.
pub(crate) fn color_teardrop(contour: &mut Contour, corner: usize, colors: [EdgeColor; 3]) {
    let count = contour.edges.len();
    if count >= 3 {
        for i in 0..count {
            let third = symmetrical_trichotomy(i, count);
            contour.edges[(corner + i) % count].color = colors[(1 + third) as usize];
        }
        return;
    }

    split_short_contour(contour, corner);
    // Each color covers two parts of two edges, or one part of a single one.
    let per_color = count;
    for (i, edge) in contour.edges.iter_mut().enumerate() {
        edge.color = colors[i / per_color];
    }
}

/// The colors of a teardrop contour.
pub(crate) fn teardrop_colors(color: &mut EdgeColor, seed: &mut Seed) -> [EdgeColor; 3] {
    switch_color(color, seed, EdgeColor::Black);
    let first = *color;
    switch_color(color, seed, EdgeColor::Black);
    [first, EdgeColor::White, *color]
}

#[cfg(test)]
use crate::shape::geom::{point, vector};

#[test]
fn seed_digits() {
    let mut seed = Seed::new(0b101);
    assert_eq!(seed.extract2(), 1);
    assert_eq!(seed.extract2(), 0);
    assert_eq!(seed.extract2(), 1);
    assert_eq!(seed.extract2(), 0);

    let mut seed = Seed::new(7);
    assert_eq!(seed.extract3(), 1);
    assert_eq!(seed.extract3(), 2);
    assert_eq!(seed.extract3(), 0);
}

#[test]
fn switching_colors() {
    let mut seed = Seed::new(0);
    let mut color = EdgeColor::Cyan;
    switch_color(&mut color, &mut seed, EdgeColor::Black);
    assert_eq!(color, EdgeColor::Magenta);

    let mut seed = Seed::new(1);
    let mut color = EdgeColor::Cyan;
    switch_color(&mut color, &mut seed, EdgeColor::Black);
    assert_eq!(color, EdgeColor::Yellow);

    // Every switch keeps exactly one channel.
    for bits in [3u8, 5, 6].iter() {
        for s in 0..2 {
            let mut seed = Seed::new(s);
            let before = EdgeColor::from_bits_truncate(*bits);
            let mut color = before;
            switch_color(&mut color, &mut seed, EdgeColor::Black);
            assert_eq!(color.channel_count(), 2);
            assert_eq!((color & before).channel_count(), 1);
        }
    }

    // The banned color forces the complement of the shared channel.
    let mut color = EdgeColor::Cyan;
    switch_color(&mut color, &mut Seed::new(0), EdgeColor::Yellow);
    assert_eq!(color, EdgeColor::Magenta);

    let mut color = EdgeColor::White;
    switch_color(&mut color, &mut Seed::new(2), EdgeColor::Black);
    assert_eq!(color, EdgeColor::Yellow);
}

#[test]
fn corner_detection() {
    let threshold = 3.0f64.sin();
    assert!(is_corner(vector(1.0, 0.0), vector(0.0, 1.0), threshold));
    assert!(is_corner(vector(1.0, 0.0), vector(-1.0, 0.0), threshold));
    assert!(!is_corner(vector(1.0, 0.0), vector(1.0, 0.0), threshold));
    assert!(!is_corner(vector(1.0, 0.0), normalize(vector(1.0, 0.1)), threshold));
}

#[test]
fn trichotomy() {
    assert_eq!(symmetrical_trichotomy(0, 3), -1);
    assert_eq!(symmetrical_trichotomy(1, 3), 0);
    assert_eq!(symmetrical_trichotomy(2, 3), 1);
    let thirds: Vec<i32> = (0..7).map(|i| symmetrical_trichotomy(i, 7)).collect();
    assert_eq!(thirds, vec![-1, -1, 0, 0, 0, 1, 1]);
}

#[test]
fn edge_length_estimate() {
    let line = EdgeSegment::linear(point(0.0, 0.0), point(3.0, 4.0), EdgeColor::White);
    assert!((estimate_edge_length(&line) - 5.0).abs() < 1e-12);

    let arc = EdgeSegment::quadratic(
        point(0.0, 0.0),
        point(1.0, 1.0),
        point(2.0, 0.0),
        EdgeColor::White,
    );
    let length = estimate_edge_length(&arc);
    assert!(length > 2.0 && length < 2.0 * 2f64.sqrt());
}

#[test]
fn teardrop_with_two_edges() {
    let mut contour = Contour::new();
    contour.add_edge(EdgeSegment::quadratic(
        point(0.0, 0.0),
        point(2.0, 2.0),
        point(4.0, 0.0),
        EdgeColor::White,
    ));
    contour.add_edge(EdgeSegment::quadratic(
        point(4.0, 0.0),
        point(2.0, -2.0),
        point(0.0, 0.0),
        EdgeColor::White,
    ));

    let colors = [EdgeColor::Cyan, EdgeColor::White, EdgeColor::Magenta];
    color_teardrop(&mut contour, 1, colors);
    assert_eq!(contour.len(), 6);
    // The parts start at the corner.
    assert_eq!(contour.edges[0].start(), point(4.0, 0.0));
    let assigned: Vec<EdgeColor> = contour.edges.iter().map(|e| e.color).collect();
    assert_eq!(
        assigned,
        vec![
            EdgeColor::Cyan,
            EdgeColor::Cyan,
            EdgeColor::White,
            EdgeColor::White,
            EdgeColor::Magenta,
            EdgeColor::Magenta,
        ]
    );
}
