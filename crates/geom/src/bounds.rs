use crate::math::{point, Box2D, Point};

use core::ops::{Div, Mul};

/// An axis-aligned box given by its four sides, with the y axis pointing up.
///
/// Bounds are typically accumulated: start from [`Bounds::EMPTY`] and
/// [`include`](Bounds::include) points. Once at least one point is included,
/// `left <= right` and `bottom <= top`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Bounds {
    /// Bounds that contain nothing.
    pub const EMPTY: Self = Bounds {
        left: f64::INFINITY,
        bottom: f64::INFINITY,
        right: f64::NEG_INFINITY,
        top: f64::NEG_INFINITY,
    };

    #[inline]
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Bounds {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Returns true if no point was included yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.left <= self.right && self.bottom <= self.top)
    }

    /// Grow the bounds so that they contain `p`.
    #[inline]
    pub fn include(&mut self, p: Point) {
        if p.x < self.left {
            self.left = p.x;
        }
        if p.y < self.bottom {
            self.bottom = p.y;
        }
        if p.x > self.right {
            self.right = p.x;
        }
        if p.y > self.top {
            self.top = p.y;
        }
    }

    /// Grow the bounds by `amount` on every side.
    #[inline]
    pub fn inflate(&mut self, amount: f64) {
        self.left -= amount;
        self.bottom -= amount;
        self.right += amount;
        self.top += amount;
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Converts to a euclid box, or `None` if the bounds are empty.
    pub fn to_box2d(&self) -> Option<Box2D> {
        if self.is_empty() {
            return None;
        }

        Some(Box2D {
            min: point(self.left, self.bottom),
            max: point(self.right, self.top),
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::EMPTY
    }
}

/// An ordered `(lower, upper)` pair of distances.
///
/// Typically the window of signed distances that is mapped onto the `[0, 1]`
/// output range of a distance field.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct DistanceRange {
    pub lower: f64,
    pub upper: f64,
}

impl DistanceRange {
    #[inline]
    pub const fn new(lower: f64, upper: f64) -> Self {
        DistanceRange { lower, upper }
    }

    /// A range of the given width centered on zero.
    #[inline]
    pub fn symmetrical(width: f64) -> Self {
        DistanceRange {
            lower: -0.5 * width,
            upper: 0.5 * width,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Mul<f64> for DistanceRange {
    type Output = Self;
    #[inline]
    fn mul(self, factor: f64) -> Self {
        DistanceRange::new(self.lower * factor, self.upper * factor)
    }
}

impl Div<f64> for DistanceRange {
    type Output = Self;
    #[inline]
    fn div(self, divisor: f64) -> Self {
        DistanceRange::new(self.lower / divisor, self.upper / divisor)
    }
}

#[test]
fn accumulate_bounds() {
    let mut bounds = Bounds::EMPTY;
    assert!(bounds.is_empty());
    assert_eq!(bounds.to_box2d(), None);

    bounds.include(point(1.0, 2.0));
    assert!(!bounds.is_empty());
    assert_eq!(bounds, Bounds::new(1.0, 2.0, 1.0, 2.0));

    bounds.include(point(-1.0, 5.0));
    bounds.include(point(0.0, 0.0));
    assert_eq!(bounds, Bounds::new(-1.0, 0.0, 1.0, 5.0));
    assert_eq!(bounds.width(), 2.0);
    assert_eq!(bounds.height(), 5.0);

    bounds.inflate(1.0);
    assert_eq!(bounds, Bounds::new(-2.0, -1.0, 2.0, 6.0));
}

#[test]
fn symmetrical_range() {
    let range = DistanceRange::symmetrical(4.0);
    assert_eq!(range, DistanceRange::new(-2.0, 2.0));
    assert_eq!(range.width(), 4.0);
    assert_eq!(range * 0.5, DistanceRange::new(-1.0, 1.0));
    assert_eq!(range / 2.0, DistanceRange::new(-1.0, 1.0));
}
