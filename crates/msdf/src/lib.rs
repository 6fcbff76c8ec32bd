#![deny(bare_trait_objects)]

//! Multi-channel signed distance field generation for vector shapes.
//!
//! # Crates
//!
//! This meta-crate (`msdf`) reexports the following sub-crates for convenience:
//!
//! * **msdf_geom** - Edge segments, signed distances, bounds and numeric helpers.
//! * **msdf_shape** - Contours and shapes, normalization, windings and scanlines.
//! * **msdf_coloring** - Edge coloring heuristics for multi-channel fields.
//! * **msdf_generator** - The SDF, pseudo-SDF, MSDF and MTSDF generators and the
//!   error correction.
//!
//! Each `msdf_<name>` crate is reexported as a `<name>` module in `msdf`. For example:
//!
//! ```ignore
//! extern crate msdf_generator;
//! use msdf_generator::generate_msdf;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate msdf;
//! use msdf::generator::generate_msdf;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! # Examples
//!
//! ## Generating the MSDF of a glyph-like shape
//!
//! A shape is made of closed contours. Before generating a multi-channel field, the
//! shape is normalized and its edges are colored so that the two edges meeting at
//! every corner share exactly one channel.
//!
//! ```
//! use msdf::coloring::{color_edges, ColoringOptions};
//! use msdf::generator::{generate_msdf, BitmapMut, MsdfGeneratorConfig, SdfTransformation};
//! use msdf::geom::{point, vector, DistanceRange, EdgeColor, EdgeSegment};
//! use msdf::shape::Shape;
//!
//! // A triangle with a curved side.
//! let mut shape = Shape::new();
//! let contour = shape.add_empty_contour();
//! contour.add_edge(EdgeSegment::linear(point(0.0, 0.0), point(4.0, 8.0), EdgeColor::White));
//! contour.add_edge(EdgeSegment::quadratic(
//!     point(4.0, 8.0),
//!     point(9.0, 6.0),
//!     point(8.0, 0.0),
//!     EdgeColor::White,
//! ));
//! contour.add_edge(EdgeSegment::linear(point(8.0, 0.0), point(0.0, 0.0), EdgeColor::White));
//!
//! shape.normalize();
//! color_edges(&mut shape, &ColoringOptions::DEFAULT);
//!
//! // 2 pixels per unit, with a border of 4 pixels.
//! let transformation =
//!     SdfTransformation::from_scale(2.0, vector(4.0, 4.0), DistanceRange::symmetrical(2.0));
//! let (width, height) = (28, 24);
//! let mut pixels = vec![0.0; width * height * 3];
//! let mut bitmap = BitmapMut::<3>::new(&mut pixels, width, height)?;
//! generate_msdf(&mut bitmap, &shape, &transformation, &MsdfGeneratorConfig::DEFAULT)?;
//! # Ok::<(), msdf::geom::MsdfError>(())
//! ```

pub extern crate msdf_coloring;
pub extern crate msdf_generator;
pub extern crate msdf_geom;
pub extern crate msdf_shape;

pub use msdf_coloring as coloring;
pub use msdf_generator as generator;
pub use msdf_geom as geom;
pub use msdf_shape as shape;

pub use msdf_geom::{MsdfError, MsdfResult};
