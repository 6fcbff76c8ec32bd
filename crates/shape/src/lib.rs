#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]

//! Vector outlines made of colored edge segments.
//!
//! This crate is reexported in `msdf` as `msdf::shape`.
//!
//! # Overview.
//!
//! A [`Shape`] is an ordered list of closed [`Contour`]s, each an ordered list of
//! [`EdgeSegment`](geom::EdgeSegment)s where the end of every edge is the start of the next
//! one. This crate provides:
//!
//! - building and editing shapes and contours,
//! - repairing them with [`Shape::normalize`] (gaps, degenerate edges, single-edge
//!   contours and convergent joins),
//! - bounds, with optional miters for stroked outlines,
//! - contour windings and [`Shape::orient_contours`],
//! - horizontal [`Scanline`]s and the [`FillRule`]s used to decide whether a point is
//!   inside of the shape.
//!
//! # Examples
//!
//! ```
//! use msdf_shape::{Contour, FillRule, Scanline, Shape};
//! use msdf_shape::geom::{point, EdgeColor, EdgeSegment};
//!
//! let corners = [point(0.0, 0.0), point(0.0, 4.0), point(4.0, 4.0), point(4.0, 0.0)];
//! let mut contour = Contour::new();
//! for i in 0..4 {
//!     contour.add_edge(EdgeSegment::linear(corners[i], corners[(i + 1) % 4], EdgeColor::White));
//! }
//!
//! let mut shape = Shape::new();
//! shape.add_contour(contour);
//! shape.normalize();
//! assert!(shape.validate());
//! assert_eq!(shape.contours[0].winding(), 1);
//!
//! let mut scanline = Scanline::new();
//! shape.scanline(&mut scanline, 2.0);
//! assert!(scanline.filled(2.0, FillRule::NonZero));
//! assert!(!scanline.filled(5.0, FillRule::NonZero));
//! ```

pub use msdf_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

mod contour;
mod normalize;
mod orientation;
mod scanline;
mod shape;

#[doc(inline)]
pub use crate::contour::Contour;
#[doc(inline)]
pub use crate::normalize::NormalizeOptions;
#[doc(inline)]
pub use crate::scanline::{FillRule, Intersection, Scanline};
#[doc(inline)]
pub use crate::shape::Shape;

pub use msdf_geom::{MsdfError, MsdfResult};
