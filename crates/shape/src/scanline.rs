use core::cmp::Ordering;

/// The fill rule defines how to determine what is inside and what is outside of the shape.
///
/// See the SVG specification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum FillRule {
    NonZero,
    EvenOdd,
    /// Inside where the winding number is strictly positive.
    Positive,
    /// Inside where the winding number is strictly negative.
    Negative,
}

impl FillRule {
    #[inline]
    pub fn is_in(&self, winding_number: i32) -> bool {
        match *self {
            FillRule::NonZero => winding_number != 0,
            FillRule::EvenOdd => winding_number % 2 != 0,
            FillRule::Positive => winding_number > 0,
            FillRule::Negative => winding_number < 0,
        }
    }

    #[inline]
    pub fn is_out(&self, winding_number: i32) -> bool {
        !self.is_in(winding_number)
    }
}

impl Default for FillRule {
    fn default() -> Self {
        FillRule::NonZero
    }
}

/// A crossing between a horizontal line and the outline of a shape.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Intersection {
    pub x: f64,
    /// The direction of the crossing (`1` upward, `-1` downward). Once stored in a
    /// [`Scanline`], the running sum of all directions up to and including this one.
    pub direction: i32,
}

/// The crossings of a horizontal line with a shape, sorted by x.
///
/// The winding number at any x of the line is the sum of the directions of the
/// crossings on its left. Intersections are stored with their running sums so that
/// it is found with a binary search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scanline {
    intersections: Vec<Intersection>,
}

impl Scanline {
    pub fn new() -> Self {
        Scanline {
            intersections: Vec::new(),
        }
    }

    /// Replaces the intersections with `intersections`, whose directions are the
    /// individual crossing directions.
    pub fn set_intersections(&mut self, intersections: Vec<Intersection>) {
        self.intersections = intersections;
        self.preprocess();
    }

    /// The intersections, with running sums as directions.
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub(crate) fn clear(&mut self) {
        self.intersections.clear();
    }

    pub(crate) fn push(&mut self, x: f64, direction: i32) {
        self.intersections.push(Intersection { x, direction });
    }

    pub(crate) fn preprocess(&mut self) {
        self.intersections
            .sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
        let mut total = 0;
        for intersection in &mut self.intersections {
            total += intersection.direction;
            intersection.direction = total;
        }
    }

    /// Number of intersections at or on the left of `x`.
    pub fn count_intersections(&self, x: f64) -> usize {
        self.intersections.partition_point(|i| i.x <= x)
    }

    /// The winding number at `x`. Intersections at exactly `x` count as passed.
    pub fn sum_intersections(&self, x: f64) -> i32 {
        match self.count_intersections(x) {
            0 => 0,
            n => self.intersections[n - 1].direction,
        }
    }

    /// Returns true if `x` is inside of the shape according to `fill_rule`.
    #[inline]
    pub fn filled(&self, x: f64, fill_rule: FillRule) -> bool {
        fill_rule.is_in(self.sum_intersections(x))
    }

    /// Length of the parts of `[x_from, x_to]` where `a` and `b` are both filled or
    /// both empty.
    pub fn overlap(a: &Scanline, b: &Scanline, x_from: f64, x_to: f64, fill_rule: FillRule) -> f64 {
        let mut walk_a = FillWalk::new(a, x_to, fill_rule);
        let mut walk_b = FillWalk::new(b, x_to, fill_rule);

        while walk_a.next_x < x_from || walk_b.next_x < x_from {
            let x_next = walk_a.next_x.min(walk_b.next_x);
            walk_a.advance_at(x_next);
            walk_b.advance_at(x_next);
        }

        let mut total = 0.0;
        let mut x = x_from;
        while walk_a.next_x < x_to || walk_b.next_x < x_to {
            let x_next = walk_a.next_x.min(walk_b.next_x);
            if walk_a.inside == walk_b.inside {
                total += x_next - x;
            }
            walk_a.advance_at(x_next);
            walk_b.advance_at(x_next);
            x = x_next;
        }
        if walk_a.inside == walk_b.inside {
            total += x_to - x;
        }

        total
    }
}

// Steps through the fill status of a scanline from left to right.
struct FillWalk<'l> {
    intersections: &'l [Intersection],
    index: usize,
    next_x: f64,
    end: f64,
    inside: bool,
    fill_rule: FillRule,
}

impl<'l> FillWalk<'l> {
    fn new(scanline: &'l Scanline, end: f64, fill_rule: FillRule) -> Self {
        let intersections = scanline.intersections();
        FillWalk {
            intersections,
            index: 0,
            next_x: intersections.first().map_or(end, |i| i.x),
            end,
            inside: false,
            fill_rule,
        }
    }

    fn advance_at(&mut self, x: f64) {
        if self.next_x != x || self.index >= self.intersections.len() {
            return;
        }

        self.inside = self.fill_rule.is_in(self.intersections[self.index].direction);
        self.index += 1;
        self.next_x = self
            .intersections
            .get(self.index)
            .map_or(self.end, |i| i.x);
    }
}

#[cfg(test)]
fn scanline(crossings: &[(f64, i32)]) -> Scanline {
    let mut scanline = Scanline::new();
    scanline.set_intersections(
        crossings
            .iter()
            .map(|&(x, direction)| Intersection { x, direction })
            .collect(),
    );
    scanline
}

#[test]
fn fill_rules() {
    assert!(FillRule::NonZero.is_in(2));
    assert!(FillRule::NonZero.is_out(0));
    assert!(FillRule::EvenOdd.is_in(-1));
    assert!(FillRule::EvenOdd.is_out(2));
    assert!(FillRule::Positive.is_in(1));
    assert!(FillRule::Positive.is_out(-1));
    assert!(FillRule::Negative.is_in(-2));
    assert!(FillRule::Negative.is_out(0));
}

#[test]
fn scanline_sums() {
    // Unsorted input: an outer contour from 0 to 10 and a hole from 3 to 6.
    let line = scanline(&[(6.0, 1), (0.0, 1), (10.0, -1), (3.0, -1)]);

    let xs: Vec<f64> = line.intersections().iter().map(|i| i.x).collect();
    assert_eq!(xs, vec![0.0, 3.0, 6.0, 10.0]);

    assert_eq!(line.count_intersections(-1.0), 0);
    assert_eq!(line.count_intersections(0.0), 1);
    assert_eq!(line.count_intersections(4.0), 2);
    assert_eq!(line.sum_intersections(-1.0), 0);
    assert_eq!(line.sum_intersections(1.0), 1);
    assert_eq!(line.sum_intersections(4.0), 0);
    assert_eq!(line.sum_intersections(7.0), 1);
    assert_eq!(line.sum_intersections(11.0), 0);

    assert!(line.filled(1.0, FillRule::NonZero));
    assert!(!line.filled(4.0, FillRule::NonZero));
    assert!(!line.filled(20.0, FillRule::NonZero));

    let empty = Scanline::new();
    assert!(!empty.filled(0.0, FillRule::NonZero));
    assert_eq!(empty.count_intersections(0.0), 0);
}

#[test]
fn scanline_overlap() {
    let a = scanline(&[(0.0, 1), (10.0, -1)]);
    let b = scanline(&[(5.0, 1), (10.0, -1)]);

    // Both empty on [-5, 0], a only on [0, 5], both filled on [5, 10], both empty on [10, 15].
    let overlap = Scanline::overlap(&a, &b, -5.0, 15.0, FillRule::NonZero);
    assert_eq!(overlap, 15.0);
    assert_eq!(Scanline::overlap(&a, &a, -5.0, 15.0, FillRule::NonZero), 20.0);

    // Starting the window in the middle of the lines.
    assert_eq!(Scanline::overlap(&a, &b, 2.0, 8.0, FillRule::NonZero), 3.0);
}
