#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::needless_range_loop)]

//! Signed distance field generators.
//!
//! This crate is reexported in `msdf` as `msdf::generator`.
//!
//! # Overview.
//!
//! The generators sample the distance from the center of every pixel of a bitmap to
//! a [`Shape`](shape::Shape), and store it in the bitmap through a
//! [`DistanceMapping`]:
//!
//! - [`generate_sdf`] stores the true signed distance in a single channel,
//! - [`generate_psdf`] stores the pseudo-distance, which extends the edges past their
//!   endpoints,
//! - [`generate_msdf`] stores one pseudo-distance per color channel, computed from
//!   the edges whose color contains the channel (see `msdf_coloring`),
//! - [`generate_mtsdf`] does the same and adds the true distance as a fourth channel.
//!
//! Where the shape lands in the bitmap is described by a [`Projection`], bundled
//! with the distance mapping in an [`SdfTransformation`]. Bitmaps are caller-owned
//! `f32` buffers viewed through [`BitmapMut`] and [`BitmapRef`]. Rows are computed in
//! parallel with rayon.
//!
//! The multi-channel generators run an [error correction](msdf_error_correction)
//! pass that removes the artifacts caused by interpolating the channels
//! independently, configured with [`ErrorCorrectionConfig`].
//!
//! # Examples
//!
//! ```
//! use msdf_generator::*;
//! use msdf_generator::shape::Shape;
//! use msdf_generator::shape::geom::{point, vector, DistanceRange, EdgeColor, EdgeSegment};
//!
//! // A 4x4 square, clockwise with the y axis up.
//! let corners = [point(0.0, 0.0), point(0.0, 4.0), point(4.0, 4.0), point(4.0, 0.0)];
//! let colors = [EdgeColor::Magenta, EdgeColor::Yellow, EdgeColor::Magenta, EdgeColor::Yellow];
//! let mut shape = Shape::new();
//! let contour = shape.add_empty_contour();
//! for i in 0..4 {
//!     contour.add_edge(EdgeSegment::linear(corners[i], corners[(i + 1) % 4], colors[i]));
//! }
//!
//! // One pixel per unit with a border of two pixels. Distances in [-2, 2] map to [0, 1].
//! let transformation =
//!     SdfTransformation::from_scale(1.0, vector(2.0, 2.0), DistanceRange::symmetrical(4.0));
//!
//! let mut pixels = vec![0.0; 8 * 8 * 3];
//! let mut bitmap = BitmapMut::<3>::new(&mut pixels, 8, 8)?;
//! generate_msdf(&mut bitmap, &shape, &transformation, &MsdfGeneratorConfig::DEFAULT)?;
//!
//! let [r, g, b] = bitmap.pixel(4, 4);
//! let median = r.max(g).min(r.min(g).max(b));
//! assert!(median > 0.5);
//! # Ok::<(), msdf_generator::shape::MsdfError>(())
//! ```

pub use msdf_shape as shape;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

mod bitmap;
mod config;
mod contour_combiners;
mod distance_finder;
mod edge_selectors;
mod error_correction;
mod generate;
mod sign_correction;
mod transformation;

#[doc(inline)]
pub use crate::bitmap::{BitmapMut, BitmapRef};
#[doc(inline)]
pub use crate::config::{
    DistanceCheckMode, ErrorCorrectionConfig, ErrorCorrectionMode, GeneratorConfig,
    MsdfGeneratorConfig,
};
#[doc(inline)]
pub use crate::contour_combiners::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
#[doc(inline)]
pub use crate::distance_finder::{one_shot_distance, ShapeDistanceFinder};
#[doc(inline)]
pub use crate::edge_selectors::{
    DistanceValue, EdgeSelector, MultiAndTrueDistance, MultiAndTrueDistanceSelector,
    MultiDistance, MultiDistanceSelector, PerpendicularDistanceSelector, TrueDistanceSelector,
};
#[doc(inline)]
pub use crate::error_correction::{msdf_error_correction, msdf_error_correction_with_scratch};
#[doc(inline)]
pub use crate::generate::{
    generate_msdf, generate_msdf_with_scratch, generate_mtsdf, generate_mtsdf_with_scratch,
    generate_psdf, generate_sdf,
};
#[doc(inline)]
pub use crate::sign_correction::distance_sign_correction;
#[doc(inline)]
pub use crate::transformation::{DistanceMapping, Projection, SdfTransformation};

pub use crate::shape::{MsdfError, MsdfResult};
