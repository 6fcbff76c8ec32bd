#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::many_single_char_names)]

//! Geometric primitives for signed distance field generation, on top of euclid.
//!
//! This crate is reexported in `msdf` as `msdf::geom`.
//!
//! # Overview.
//!
//! This crate implements the maths to work with:
//!
//! - line segments, quadratic and cubic bézier curves tagged with an [`EdgeColor`],
//! - the signed distance from a point to one of these curves, with the tie-break
//!   used to decide which of two adjacent edges owns a point near their junction,
//! - the intersections of a curve with a horizontal line, for scanline fills,
//! - bounds, distance ranges and the polynomial solvers the rest relies on.
//!
//! # Coordinates and signs.
//!
//! Shape space uses `f64` coordinates (see the [`math`] module).
//!
//! The sign of a distance follows the orientation of the edge: points on the right
//! of the direction of travel (with the y axis pointing up) are positive. A contour
//! that runs clockwise with y up therefore has positive distances inside.
//!
//! # Tie-breaks.
//!
//! When two edges are at the same distance from a point (typically a point close to
//! the vertex they share), the one that faces the point most squarely wins. This is
//! captured by [`SignedDistance::dot`], see [`SignedDistance::closer_than`].

pub use arrayvec;
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
extern crate serde;

mod bounds;
pub mod cubic;
mod edge;
mod edge_color;
mod error;
pub mod line;
pub mod math;
pub mod quadratic;
mod signed_distance;
pub mod utils;

#[doc(inline)]
pub use crate::bounds::{Bounds, DistanceRange};
#[doc(inline)]
pub use crate::cubic::CubicSegment;
#[doc(inline)]
pub use crate::edge::{Curve, EdgeSegment, EdgeType};
#[doc(inline)]
pub use crate::edge_color::EdgeColor;
#[doc(inline)]
pub use crate::error::{MsdfError, MsdfResult};
#[doc(inline)]
pub use crate::line::LineSegment;
pub use crate::math::{point, vector, Point, Vector};
#[doc(inline)]
pub use crate::quadratic::QuadraticSegment;
#[doc(inline)]
pub use crate::signed_distance::SignedDistance;

/// Intersections of a curve with a horizontal line: `(x, direction)` pairs where the
/// direction is `1` if the curve goes up at the intersection and `-1` if it goes down.
pub type ScanlineIntersections = arrayvec::ArrayVec<(f64, i32), 3>;

pub(crate) const ONE_THIRD: f64 = 1.0 / 3.0;
pub(crate) const TWO_THIRDS: f64 = 2.0 / 3.0;
