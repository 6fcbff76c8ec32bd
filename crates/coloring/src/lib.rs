#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Edge coloring for multi-channel signed distance fields.
//!
//! This crate is reexported in `msdf` as `msdf::coloring`.
//!
//! # Overview.
//!
//! A multi-channel distance field stores three distances per pixel, one per color
//! channel, each computed from the edges whose [`EdgeColor`](shape::geom::EdgeColor)
//! contains the channel. Sampling the median of the three channels reconstructs the
//! sharp corners of the outline, provided that the two edges meeting at every corner
//! share exactly one channel.
//!
//! The heuristics of this crate assign such colors:
//!
//! - [`edge_coloring_simple`] switches colors at every corner.
//! - [`edge_coloring_ink_trap`] doesn't switch at the corners of short notches.
//! - [`edge_coloring_by_distance`] gives different colors to splines that are close
//!   to each other, which avoids artifacts where parts of the outline almost touch.
//!
//! A join is a corner when the direction of the outline turns by more than the angle
//! threshold. Contours without corners get a single color, contours with a single
//! corner (teardrops) are split in three colors. All heuristics are deterministic: the
//! choices among equally valid colors are driven by an explicit seed.
//!
//! # Examples
//!
//! ```
//! use msdf_coloring::{color_edges, ColoringOptions, ColoringStrategy};
//! use msdf_coloring::shape::Shape;
//! use msdf_coloring::shape::geom::{point, EdgeColor, EdgeSegment};
//!
//! let mut shape = Shape::new();
//! let contour = shape.add_empty_contour();
//! contour.add_edge(EdgeSegment::linear(point(0.0, 0.0), point(1.0, 2.0), EdgeColor::White));
//! contour.add_edge(EdgeSegment::linear(point(1.0, 2.0), point(2.0, 0.0), EdgeColor::White));
//! contour.add_edge(EdgeSegment::linear(point(2.0, 0.0), point(0.0, 0.0), EdgeColor::White));
//!
//! color_edges(&mut shape, &ColoringOptions::DEFAULT.with_strategy(ColoringStrategy::InkTrap));
//!
//! let edges = &shape.contours[0].edges;
//! for i in 0..3 {
//!     let shared = edges[i].color & edges[(i + 1) % 3].color;
//!     assert_eq!(shared.channel_count(), 1);
//! }
//! ```

pub use msdf_shape as shape;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

mod by_distance;
mod ink_trap;
mod simple;
mod utils;

pub use crate::by_distance::edge_coloring_by_distance;
pub use crate::ink_trap::edge_coloring_ink_trap;
pub use crate::simple::edge_coloring_simple;

use crate::shape::Shape;

/// The coloring heuristic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum ColoringStrategy {
    /// See [`edge_coloring_simple`].
    Simple,
    /// See [`edge_coloring_ink_trap`].
    InkTrap,
    /// See [`edge_coloring_by_distance`].
    ByDistance,
}

impl Default for ColoringStrategy {
    fn default() -> Self {
        ColoringStrategy::Simple
    }
}

/// Parameters for [`color_edges`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct ColoringOptions {
    /// Default value: `ColoringOptions::DEFAULT_STRATEGY`.
    pub strategy: ColoringStrategy,

    /// Maximum turn in radians of a join that is not a corner.
    ///
    /// Joins that turn by a right angle or more are always corners.
    ///
    /// Default value: `ColoringOptions::DEFAULT_ANGLE_THRESHOLD`.
    pub angle_threshold: f64,

    /// Drives the choice among the valid colors. The same seed always produces the
    /// same colors.
    ///
    /// Default value: `0`.
    pub seed: u64,
}

impl ColoringOptions {
    pub const DEFAULT_STRATEGY: ColoringStrategy = ColoringStrategy::Simple;
    pub const DEFAULT_ANGLE_THRESHOLD: f64 = 3.0;

    pub const DEFAULT: Self = ColoringOptions {
        strategy: Self::DEFAULT_STRATEGY,
        angle_threshold: Self::DEFAULT_ANGLE_THRESHOLD,
        seed: 0,
    };

    #[inline]
    pub const fn with_strategy(mut self, strategy: ColoringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[inline]
    pub const fn with_angle_threshold(mut self, angle_threshold: f64) -> Self {
        self.angle_threshold = angle_threshold;
        self
    }

    #[inline]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for ColoringOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Colors the edges of the shape with the heuristic selected in the options.
pub fn color_edges(shape: &mut Shape, options: &ColoringOptions) {
    let ColoringOptions {
        strategy,
        angle_threshold,
        seed,
    } = *options;

    match strategy {
        ColoringStrategy::Simple => edge_coloring_simple(shape, angle_threshold, seed),
        ColoringStrategy::InkTrap => edge_coloring_ink_trap(shape, angle_threshold, seed),
        ColoringStrategy::ByDistance => edge_coloring_by_distance(shape, angle_threshold, seed),
    }
}

#[test]
fn coloring_options() {
    let options = ColoringOptions::default()
        .with_strategy(ColoringStrategy::ByDistance)
        .with_angle_threshold(1.0)
        .with_seed(7);
    assert_eq!(options.strategy, ColoringStrategy::ByDistance);
    assert_eq!(options.angle_threshold, 1.0);
    assert_eq!(options.seed, 7);
    assert_eq!(ColoringOptions::default(), ColoringOptions::DEFAULT);
}
