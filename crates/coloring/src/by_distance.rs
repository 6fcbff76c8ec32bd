use crate::shape::geom::{EdgeColor, EdgeSegment};
use crate::shape::Shape;
use crate::utils::{find_corners, split_short_contour, symmetrical_trichotomy, Seed};

use std::collections::VecDeque;

/// Number of steps when sampling an edge to measure its distance to another edge.
const EDGE_DISTANCE_PRECISION: u32 = 16;
/// Bound on the recoloring attempts when connecting two splines of the same color.
const MAX_RECOLOR_STEPS: usize = 16;
/// The lowest color in a bit set of allowed colors.
const FIRST_POSSIBLE_COLOR: [i32; 8] = [-1, 0, 1, 0, 2, 2, 1, 0];
const UNCOLORED: i32 = -1;
const SPLINE_COLORS: [EdgeColor; 3] = [EdgeColor::Yellow, EdgeColor::Cyan, EdgeColor::Magenta];

/// Symmetric adjacency matrix between splines.
struct SplineGraph {
    count: usize,
    adjacency: Vec<bool>,
}

impl SplineGraph {
    fn new(count: usize) -> Self {
        SplineGraph {
            count,
            adjacency: vec![false; count * count],
        }
    }

    fn set(&mut self, a: usize, b: usize, connected: bool) {
        self.adjacency[a * self.count + b] = connected;
        self.adjacency[b * self.count + a] = connected;
    }

    #[inline]
    fn connected(&self, a: usize, b: usize) -> bool {
        self.adjacency[a * self.count + b]
    }

    /// Bit set of the colors that no neighbour of `vertex` uses.
    fn possible_colors(&self, coloring: &[i32], vertex: usize) -> usize {
        let mut used = 0;
        for (i, &color) in coloring.iter().enumerate() {
            if color >= 0 && self.connected(vertex, i) {
                used |= 1 << color;
            }
        }
        7 & !used
    }

    /// Uncolors the neighbours of `vertex` that have its color, and queues them.
    fn uncolor_same_neighbors(&self, queue: &mut VecDeque<usize>, coloring: &mut [i32], vertex: usize) {
        for i in (vertex + 1..self.count).chain(0..vertex) {
            if self.connected(vertex, i) && coloring[i] == coloring[vertex] {
                coloring[i] = UNCOLORED;
                queue.push_back(i);
            }
        }
    }
}

fn color_mask(color: i32) -> usize {
    if color >= 0 {
        1 << color
    } else {
        0
    }
}

/// Greedy 3-coloring of a graph in which most vertices have at most two neighbours.
fn color_second_degree_graph(coloring: &mut [i32], graph: &SplineGraph, seed: &mut Seed) {
    for i in 0..graph.count {
        let mut possible = 7;
        for j in 0..i {
            if graph.connected(i, j) {
                possible &= !color_mask(coloring[j]);
            }
        }

        coloring[i] = match possible {
            1 => 0,
            2 => 1,
            3 => seed.extract2() as i32,
            4 => 2,
            5 => {
                if seed.extract2() == 0 {
                    2
                } else {
                    0
                }
            }
            6 => seed.extract2() as i32 + 1,
            7 => ((seed.extract3() as usize + i) % 3) as i32,
            _ => 0,
        };
    }
}

/// Connects `a` and `b`, recoloring the graph if they have the same color.
///
/// When no valid coloring is found within `MAX_RECOLOR_STEPS`, the connection is
/// dropped and the coloring is left unchanged.
fn try_add_edge(
    coloring: &mut [i32],
    graph: &mut SplineGraph,
    a: usize,
    b: usize,
    buffer: &mut Vec<i32>,
) -> bool {
    graph.set(a, b, true);
    if coloring[a] != coloring[b] {
        return true;
    }

    let b_possible = graph.possible_colors(coloring, b);
    if b_possible != 0 {
        coloring[b] = FIRST_POSSIBLE_COLOR[b_possible];
        return true;
    }

    buffer.clear();
    buffer.extend_from_slice(coloring);
    let mut queue = VecDeque::new();
    buffer[b] = FIRST_POSSIBLE_COLOR[7 & !color_mask(buffer[a])];
    graph.uncolor_same_neighbors(&mut queue, buffer, b);

    let mut step = 0;
    while step < MAX_RECOLOR_STEPS {
        let i = match queue.pop_front() {
            Some(i) => i,
            None => break,
        };

        let possible = graph.possible_colors(buffer, i);
        if possible != 0 {
            buffer[i] = FIRST_POSSIBLE_COLOR[possible];
            continue;
        }

        loop {
            buffer[i] = (step % 3) as i32;
            step += 1;
            if !(graph.connected(i, a) && buffer[i] == buffer[a]) {
                break;
            }
        }
        graph.uncolor_same_neighbors(&mut queue, buffer, i);
    }

    if !queue.is_empty() {
        graph.set(a, b, false);
        return false;
    }

    coloring.copy_from_slice(buffer);
    true
}

/// Smallest distance between two edges, sampled along both. Edges that share an
/// endpoint are at distance zero.
fn edge_to_edge_distance(a: &EdgeSegment, b: &EdgeSegment) -> f64 {
    let (a0, a1, b0, b1) = (a.start(), a.end(), b.start(), b.end());
    if a0 == b0 || a0 == b1 || a1 == b0 || a1 == b1 {
        return 0.0;
    }

    let step = 1.0 / EDGE_DISTANCE_PRECISION as f64;
    let mut min_distance = (b0 - a0).length();
    for i in 0..=EDGE_DISTANCE_PRECISION {
        let t = step * i as f64;
        let (d, _) = a.signed_distance(b.point(t));
        min_distance = min_distance.min(d.distance.abs());
        let (d, _) = b.signed_distance(a.point(t));
        min_distance = min_distance.min(d.distance.abs());
    }

    min_distance
}

/// Assigns colors to the edges of the shape so that splines that are close to each
/// other get different colors.
///
/// Each run of edges between two corners is a spline. Splines that touch are
/// connected first and 3-colored greedily. The other pairs are then connected by
/// increasing distance, recoloring the graph when needed, so that the closest
/// splines end up with different colors. All splines get one of the two-channel
/// colors, which guarantees that the two sides of a corner share exactly one
/// channel.
pub fn edge_coloring_by_distance(shape: &mut Shape, angle_threshold: f64, seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut seed = Seed::new(seed);

    // (contour, edge) of the colored edges, grouped by spline.
    let mut segments: Vec<(usize, usize)> = Vec::with_capacity(shape.edge_count());
    let mut spline_starts: Vec<usize> = Vec::new();

    for (ci, contour) in shape.contours.iter_mut().enumerate() {
        if contour.is_empty() {
            continue;
        }

        let corners = find_corners(contour, cross_threshold);
        let edge_count = contour.len();
        spline_starts.push(segments.len());

        match corners.len() {
            0 => {
                segments.extend((0..edge_count).map(|ei| (ci, ei)));
            }
            1 => {
                let corner = corners[0];
                if edge_count >= 3 {
                    for i in 0..edge_count {
                        if i == edge_count / 2 {
                            spline_starts.push(segments.len());
                        }
                        let index = (corner + i) % edge_count;
                        if symmetrical_trichotomy(i, edge_count) != 0 {
                            segments.push((ci, index));
                        } else {
                            contour.edges[index].color = EdgeColor::White;
                        }
                    }
                } else {
                    // One third of the parts on each side of a white middle.
                    split_short_contour(contour, corner);
                    let third = edge_count;
                    segments.extend((0..third).map(|ei| (ci, ei)));
                    for edge in &mut contour.edges[third..2 * third] {
                        edge.color = EdgeColor::White;
                    }
                    spline_starts.push(segments.len());
                    segments.extend((2 * third..3 * third).map(|ei| (ci, ei)));
                }
            }
            _ => {
                let start = corners[0];
                let mut spline = 0;
                for i in 0..edge_count {
                    let index = (start + i) % edge_count;
                    if spline + 1 < corners.len() && corners[spline + 1] == index {
                        spline_starts.push(segments.len());
                        spline += 1;
                    }
                    segments.push((ci, index));
                }
            }
        }
    }
    spline_starts.push(segments.len());

    let spline_count = spline_starts.len() - 1;
    if spline_count == 0 {
        return;
    }

    let edge = |segment: usize| {
        let (ci, ei) = segments[segment];
        &shape.contours[ci].edges[ei]
    };
    let spline_distance = |a: usize, b: usize| {
        let mut min_distance = f64::MAX;
        for ai in spline_starts[a]..spline_starts[a + 1] {
            for bi in spline_starts[b]..spline_starts[b + 1] {
                if min_distance == 0.0 {
                    return 0.0;
                }
                min_distance = min_distance.min(edge_to_edge_distance(edge(ai), edge(bi)));
            }
        }
        min_distance
    };

    let mut pairs: Vec<(f64, usize, usize)> =
        Vec::with_capacity(spline_count * (spline_count - 1) / 2);
    for i in 0..spline_count {
        for j in i + 1..spline_count {
            pairs.push((spline_distance(i, j), i, j));
        }
    }
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(core::cmp::Ordering::Equal));

    let mut graph = SplineGraph::new(spline_count);
    let touching = pairs.iter().take_while(|pair| pair.0 == 0.0).count();
    for &(_, a, b) in &pairs[..touching] {
        graph.set(a, b, true);
    }

    let mut coloring = vec![UNCOLORED; spline_count];
    color_second_degree_graph(&mut coloring, &graph, &mut seed);

    let mut buffer = Vec::with_capacity(spline_count);
    let mut dropped = 0;
    for &(_, a, b) in &pairs[touching..] {
        if !try_add_edge(&mut coloring, &mut graph, a, b, &mut buffer) {
            dropped += 1;
        }
    }

    for spline in 0..spline_count {
        let color = SPLINE_COLORS[coloring[spline].max(0) as usize];
        for &(ci, ei) in &segments[spline_starts[spline]..spline_starts[spline + 1]] {
            shape.contours[ci].edges[ei].color = color;
        }
    }

    log::debug!(
        "edge_coloring_by_distance: {} splines, {} touching pairs, {} pairs left apart",
        spline_count,
        touching,
        dropped
    );
}

#[cfg(test)]
use crate::shape::geom::{point, Point};
#[cfg(test)]
use crate::shape::Contour;

#[cfg(test)]
fn polygon(points: &[Point]) -> Contour {
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

#[cfg(test)]
fn two_squares() -> Shape {
    let mut shape = Shape::new();
    shape.add_contour(polygon(&[
        point(0.0, 0.0),
        point(0.0, 4.0),
        point(4.0, 4.0),
        point(4.0, 0.0),
    ]));
    shape.add_contour(polygon(&[
        point(5.0, 0.0),
        point(5.0, 4.0),
        point(9.0, 4.0),
        point(9.0, 0.0),
    ]));
    shape
}

#[test]
fn by_distance_squares() {
    for seed in 0..8 {
        let mut shape = two_squares();
        edge_coloring_by_distance(&mut shape, 3.0, seed);

        for contour in &shape.contours {
            for (prev, edge, _) in contour.edge_triples() {
                assert!(SPLINE_COLORS.contains(&edge.color));
                assert_ne!(prev.color, edge.color, "seed {}", seed);
            }
        }

        let mut again = two_squares();
        edge_coloring_by_distance(&mut again, 3.0, seed);
        assert_eq!(shape, again);
    }
}

#[test]
fn by_distance_teardrop() {
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    contour.add_edge(EdgeSegment::cubic(
        point(0.0, 0.0),
        point(3.0, 3.0),
        point(-3.0, 3.0),
        point(0.0, 0.0),
        EdgeColor::White,
    ));

    edge_coloring_by_distance(&mut shape, 3.0, 5);
    let edges = &shape.contours[0].edges;
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[1].color, EdgeColor::White);
    assert!(SPLINE_COLORS.contains(&edges[0].color));
    assert!(SPLINE_COLORS.contains(&edges[2].color));
    assert_ne!(edges[0].color, edges[2].color);
}

#[test]
fn graph_recoloring() {
    // A path 0 - 1 - 2 colored 0, 1, 0: connecting 0 and 2 recolors 2.
    let mut graph = SplineGraph::new(3);
    graph.set(0, 1, true);
    graph.set(1, 2, true);
    let mut coloring = vec![0, 1, 0];
    let mut buffer = Vec::new();
    assert!(try_add_edge(&mut coloring, &mut graph, 0, 2, &mut buffer));
    assert_eq!(coloring, vec![0, 1, 2]);
    assert!(graph.connected(2, 0));

    // A triangle can always be 3-colored, a complete graph of 4 vertices cannot.
    let mut graph = SplineGraph::new(4);
    let mut coloring = vec![0, 1, 2, 0];
    for &(a, b) in &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)] {
        graph.set(a, b, true);
    }
    assert!(!try_add_edge(&mut coloring, &mut graph, 0, 3, &mut buffer));
    assert!(!graph.connected(0, 3));
    assert_eq!(coloring, vec![0, 1, 2, 0]);
}

#[test]
fn distance_between_edges() {
    let a = EdgeSegment::linear(point(0.0, 0.0), point(4.0, 0.0), EdgeColor::White);
    let b = EdgeSegment::linear(point(1.0, 2.0), point(3.0, 2.0), EdgeColor::White);
    assert!((edge_to_edge_distance(&a, &b) - 2.0).abs() < 1e-12);

    let c = EdgeSegment::linear(point(4.0, 0.0), point(4.0, 5.0), EdgeColor::White);
    assert_eq!(edge_to_edge_distance(&a, &c), 0.0);
}
