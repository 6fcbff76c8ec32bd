use crate::shape::geom::utils::normalize;
use crate::shape::geom::EdgeColor;
use crate::shape::Shape;
use crate::utils::{
    color_teardrop, estimate_edge_length, init_color, is_corner, switch_color, teardrop_colors,
    Seed,
};

struct Corner {
    index: usize,
    // Length of the spline that ends at this corner.
    prev_spline_length: f64,
    minor: bool,
    color: EdgeColor,
}

/// Same as [`edge_coloring_simple`](crate::edge_coloring_simple), but short splines
/// between two longer ones (the notches of ink traps) don't count as color changes
/// of their own.
///
/// When a contour has more than three corners, the corner that opens a spline shorter
/// than the splines before and after it is *minor*. The colors are switched at the
/// major corners only, and the short spline gets the two channels that its neighbours
/// don't share.
pub fn edge_coloring_ink_trap(shape: &mut Shape, angle_threshold: f64, seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut seed = Seed::new(seed);
    let mut color = init_color(&mut seed);
    let mut corners: Vec<Corner> = Vec::new();
    let mut corner_count = 0;
    let mut minor_count = 0;

    for contour in &mut shape.contours {
        let mut prev_direction = match contour.edges.last() {
            Some(edge) => edge.direction(1.0),
            None => continue,
        };

        corners.clear();
        let mut spline_length = 0.0;
        for (index, edge) in contour.edges.iter().enumerate() {
            if is_corner(normalize(prev_direction), normalize(edge.direction(0.0)), cross_threshold) {
                corners.push(Corner {
                    index,
                    prev_spline_length: spline_length,
                    minor: false,
                    color: EdgeColor::Black,
                });
                spline_length = 0.0;
            }
            spline_length += estimate_edge_length(edge);
            prev_direction = edge.direction(1.0);
        }
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
                color_teardrop(contour, corners[0].index, colors);
            }
            n => {
                let mut major_count = n;
                if n > 3 {
                    // The spline before the first corner wraps around the contour.
                    corners[0].prev_spline_length += spline_length;
                    for i in 0..n {
                        let next = corners[(i + 1) % n].prev_spline_length;
                        if corners[i].prev_spline_length > next
                            && next < corners[(i + 2) % n].prev_spline_length
                        {
                            corners[i].minor = true;
                            major_count -= 1;
                        }
                    }
                }
                minor_count += n - major_count;

                let mut initial_color = EdgeColor::Black;
                for corner in corners.iter_mut().filter(|c| !c.minor) {
                    major_count -= 1;
                    let banned = if major_count == 0 {
                        initial_color
                    } else {
                        EdgeColor::Black
                    };
                    switch_color(&mut color, &mut seed, banned);
                    corner.color = color;
                    if initial_color == EdgeColor::Black {
                        initial_color = color;
                    }
                }

                for i in 0..n {
                    if corners[i].minor {
                        let next_color = corners[(i + 1) % n].color;
                        corners[i].color = (color & next_color) ^ EdgeColor::White;
                    } else {
                        color = corners[i].color;
                    }
                }

                let start = corners[0].index;
                let edge_count = contour.edges.len();
                let mut spline = 0;
                color = corners[0].color;
                for i in 0..edge_count {
                    let index = (start + i) % edge_count;
                    if spline + 1 < n && corners[spline + 1].index == index {
                        spline += 1;
                        color = corners[spline].color;
                    }
                    contour.edges[index].color = color;
                }
            }
        }
    }

    log::debug!(
        "edge_coloring_ink_trap: {} contours, {} corners ({} minor)",
        shape.contours.len(),
        corner_count,
        minor_count
    );
}

#[cfg(test)]
use crate::shape::geom::{point, EdgeSegment, Point};
#[cfg(test)]
use crate::shape::Contour;

#[cfg(test)]
fn polygon_shape(points: &[Point]) -> Shape {
    let mut contour = Contour::new();
    for i in 0..points.len() {
        contour.add_edge(EdgeSegment::linear(
            points[i],
            points[(i + 1) % points.len()],
            EdgeColor::White,
        ));
    }
    let mut shape = Shape::new();
    shape.add_contour(contour);
    shape
}

#[cfg(test)]
fn assert_corner_rule(shape: &Shape) {
    for contour in &shape.contours {
        for (prev, edge, _) in contour.edge_triples() {
            assert_eq!(edge.color.channel_count(), 2, "{:?}", edge.color);
            assert_eq!((prev.color & edge.color).channel_count(), 1);
        }
    }
}

#[test]
fn ink_trap_notch() {
    // A long bar with a small notch cut in its top side.
    let points = [
        point(0.0, 0.0),
        point(0.0, 10.0),
        point(9.0, 10.0),
        point(9.0, 9.5),
        point(10.0, 9.5),
        point(10.0, 10.0),
        point(20.0, 10.0),
        point(20.0, 0.0),
    ];

    for seed in 0..8 {
        let mut shape = polygon_shape(&points);
        edge_coloring_ink_trap(&mut shape, 3.0, seed);
        assert_corner_rule(&shape);

        // The short walls of the notch take the channels their neighbours don't share.
        let edges = &shape.contours[0].edges;
        assert_eq!(edges[2].color, (edges[1].color & edges[3].color) ^ EdgeColor::White);
        assert_eq!(edges[4].color, (edges[3].color & edges[5].color) ^ EdgeColor::White);
    }
}

#[test]
fn ink_trap_triangle() {
    let mut shape = polygon_shape(&[point(0.0, 0.0), point(1.0, 2.0), point(2.0, 0.0)]);
    edge_coloring_ink_trap(&mut shape, 3.0, 3);
    assert_corner_rule(&shape);
}
