//! Edge selectors reduce the distances from a point to a set of edges into the value
//! stored in a pixel.

use crate::shape::geom::utils::{median, normalize_or_zero};
use crate::shape::geom::{EdgeSegment, Point, SignedDistance, Vector};
use crate::transformation::DistanceMapping;

/// The value an [`EdgeSelector`] produces for a point: one distance per channel.
pub trait DistanceValue: Copy + Send {
    /// Number of channels written by [`store`](Self::store).
    const CHANNELS: usize;

    /// A value that is farther than any other.
    fn infinite() -> Self;

    /// The single distance this value stands for. For multi-channel values, the
    /// median of the color channels.
    fn resolve(&self) -> f64;

    /// Flips the sign of the value if it disagrees with `inside`. Values that resolve
    /// to exactly zero are left unchanged.
    fn fix_sign(&mut self, inside: bool);

    /// Writes the mapped channels to the first `CHANNELS` values of `pixel`.
    fn store(&self, mapping: &DistanceMapping, pixel: &mut [f32]);
}

#[inline]
fn disagrees(distance: f64, inside: bool) -> bool {
    distance != 0.0 && (distance > 0.0) != inside
}

impl DistanceValue for f64 {
    const CHANNELS: usize = 1;

    #[inline]
    fn infinite() -> Self {
        -f64::MAX
    }

    #[inline]
    fn resolve(&self) -> f64 {
        *self
    }

    #[inline]
    fn fix_sign(&mut self, inside: bool) {
        if disagrees(*self, inside) {
            *self = -*self;
        }
    }

    #[inline]
    fn store(&self, mapping: &DistanceMapping, pixel: &mut [f32]) {
        pixel[0] = mapping.map(*self) as f32;
    }
}

/// Distances of the red, green and blue channels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MultiDistance {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl DistanceValue for MultiDistance {
    const CHANNELS: usize = 3;

    #[inline]
    fn infinite() -> Self {
        MultiDistance {
            r: -f64::MAX,
            g: -f64::MAX,
            b: -f64::MAX,
        }
    }

    #[inline]
    fn resolve(&self) -> f64 {
        median(self.r, self.g, self.b)
    }

    fn fix_sign(&mut self, inside: bool) {
        if disagrees(self.resolve(), inside) {
            self.r = -self.r;
            self.g = -self.g;
            self.b = -self.b;
        }
    }

    fn store(&self, mapping: &DistanceMapping, pixel: &mut [f32]) {
        pixel[0] = mapping.map(self.r) as f32;
        pixel[1] = mapping.map(self.g) as f32;
        pixel[2] = mapping.map(self.b) as f32;
    }
}

/// Distances of the color channels, plus the true distance in `a`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MultiAndTrueDistance {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl DistanceValue for MultiAndTrueDistance {
    const CHANNELS: usize = 4;

    #[inline]
    fn infinite() -> Self {
        MultiAndTrueDistance {
            r: -f64::MAX,
            g: -f64::MAX,
            b: -f64::MAX,
            a: -f64::MAX,
        }
    }

    #[inline]
    fn resolve(&self) -> f64 {
        median(self.r, self.g, self.b)
    }

    fn fix_sign(&mut self, inside: bool) {
        if disagrees(self.resolve(), inside) {
            self.r = -self.r;
            self.g = -self.g;
            self.b = -self.b;
        }
        if disagrees(self.a, inside) {
            self.a = -self.a;
        }
    }

    fn store(&self, mapping: &DistanceMapping, pixel: &mut [f32]) {
        pixel[0] = mapping.map(self.r) as f32;
        pixel[1] = mapping.map(self.g) as f32;
        pixel[2] = mapping.map(self.b) as f32;
        pixel[3] = mapping.map(self.a) as f32;
    }
}

/// Accumulates the edges around a point and selects the distance to store.
///
/// Selectors are reset for each point, fed with every edge of the shape (along with
/// the previous and next edges of its contour) and then queried.
pub trait EdgeSelector: Clone + Send + Sync {
    type Distance: DistanceValue;

    /// Starts over at a new point.
    fn reset(&mut self, origin: Point);

    fn add_edge(&mut self, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment);

    /// Takes into account the edges seen by another selector reset at the same point.
    fn merge(&mut self, other: &Self);

    fn distance(&self) -> Self::Distance;

    /// The distance to the nearest edge seen so far.
    fn true_distance(&self) -> SignedDistance;
}

/// Selects the distance to the nearest edge.
#[derive(Copy, Clone, Debug)]
pub struct TrueDistanceSelector {
    origin: Point,
    min_distance: SignedDistance,
    tie_tolerance: f64,
}

impl TrueDistanceSelector {
    /// See [`GeneratorConfig::tie_tolerance`](crate::GeneratorConfig::tie_tolerance).
    pub fn new(tie_tolerance: f64) -> Self {
        TrueDistanceSelector {
            origin: Point::origin(),
            min_distance: SignedDistance::INFINITE,
            tie_tolerance,
        }
    }
}

impl Default for TrueDistanceSelector {
    fn default() -> Self {
        TrueDistanceSelector::new(0.0)
    }
}

impl EdgeSelector for TrueDistanceSelector {
    type Distance = f64;

    fn reset(&mut self, origin: Point) {
        self.origin = origin;
        self.min_distance = SignedDistance::INFINITE;
    }

    fn add_edge(&mut self, _prev: &EdgeSegment, edge: &EdgeSegment, _next: &EdgeSegment) {
        let (distance, _) = edge.signed_distance(self.origin);
        if distance.closer_than_within(&self.min_distance, self.tie_tolerance) {
            self.min_distance = distance;
        }
    }

    fn merge(&mut self, other: &Self) {
        if other
            .min_distance
            .closer_than_within(&self.min_distance, self.tie_tolerance)
        {
            self.min_distance = other.min_distance;
        }
    }

    fn distance(&self) -> f64 {
        self.min_distance.distance
    }

    fn true_distance(&self) -> SignedDistance {
        self.min_distance
    }
}

/// Replaces `distance` with the distance to the line through an endpoint along
/// `edge_dir` when the point is beyond the endpoint and the line is closer.
fn perpendicular_distance(distance: &mut f64, ep: Vector, edge_dir: Vector) -> bool {
    let ts = ep.dot(edge_dir);
    if ts > 0.0 {
        let perpendicular = ep.cross(edge_dir);
        if perpendicular.abs() < distance.abs() {
            *distance = perpendicular;
            return true;
        }
    }

    false
}

/// The position of a point relative to the endpoints of an edge.
///
/// The domain of an endpoint is bounded by the bisector of the join with the
/// adjacent edge: `start_domain > 0` means the point lies on the side of the
/// bisector that belongs to this edge, before its start.
struct EndpointDomains {
    to_start: Vector,
    to_end: Vector,
    start_dir: Vector,
    end_dir: Vector,
    start_domain: f64,
    end_domain: f64,
}

impl EndpointDomains {
    fn new(origin: Point, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment) -> Self {
        let to_start = origin - edge.start();
        let to_end = origin - edge.end();
        let start_dir = normalize_or_zero(edge.direction(0.0));
        let end_dir = normalize_or_zero(edge.direction(1.0));
        let prev_dir = normalize_or_zero(prev.direction(1.0));
        let next_dir = normalize_or_zero(next.direction(0.0));
        EndpointDomains {
            to_start,
            to_end,
            start_dir,
            end_dir,
            start_domain: to_start.dot(normalize_or_zero(prev_dir + start_dir)),
            end_domain: -to_end.dot(normalize_or_zero(end_dir + next_dir)),
        }
    }

    /// The perpendicular distances beyond the start and the end of the edge, when
    /// the point is in their domain and they improve on `distance`.
    fn perpendicular_distances(&self, distance: f64) -> (Option<f64>, Option<f64>) {
        let mut before_start = None;
        let mut after_end = None;
        if self.start_domain > 0.0 {
            let mut pd = distance;
            if perpendicular_distance(&mut pd, self.to_start, -self.start_dir) {
                before_start = Some(-pd);
            }
        }
        if self.end_domain > 0.0 {
            let mut pd = distance;
            if perpendicular_distance(&mut pd, self.to_end, self.end_dir) {
                after_end = Some(pd);
            }
        }

        (before_start, after_end)
    }
}

/// State shared by the perpendicular distance selectors, for one channel.
#[derive(Copy, Clone, Debug)]
struct PerpendicularChannel {
    min_true_distance: SignedDistance,
    min_negative_perpendicular: f64,
    min_positive_perpendicular: f64,
    near_edge: Option<EdgeSegment>,
    near_edge_param: f64,
}

impl PerpendicularChannel {
    const EMPTY: Self = PerpendicularChannel {
        min_true_distance: SignedDistance::INFINITE,
        min_negative_perpendicular: -f64::MAX,
        min_positive_perpendicular: f64::MAX,
        near_edge: None,
        near_edge_param: 0.0,
    };

    fn add_true_distance(
        &mut self,
        edge: &EdgeSegment,
        distance: SignedDistance,
        param: f64,
        tie_tolerance: f64,
    ) {
        if distance.closer_than_within(&self.min_true_distance, tie_tolerance) {
            self.min_true_distance = distance;
            self.near_edge = Some(*edge);
            self.near_edge_param = param;
        }
    }

    fn add_perpendicular_distance(&mut self, distance: f64) {
        if distance <= 0.0 && distance > self.min_negative_perpendicular {
            self.min_negative_perpendicular = distance;
        }
        if distance >= 0.0 && distance < self.min_positive_perpendicular {
            self.min_positive_perpendicular = distance;
        }
    }

    fn add_perpendicular_distances(&mut self, distances: (Option<f64>, Option<f64>)) {
        if let Some(d) = distances.0 {
            self.add_perpendicular_distance(d);
        }
        if let Some(d) = distances.1 {
            self.add_perpendicular_distance(d);
        }
    }

    fn merge(&mut self, other: &Self, tie_tolerance: f64) {
        if other
            .min_true_distance
            .closer_than_within(&self.min_true_distance, tie_tolerance)
        {
            self.min_true_distance = other.min_true_distance;
            self.near_edge = other.near_edge;
            self.near_edge_param = other.near_edge_param;
        }
        if other.min_negative_perpendicular > self.min_negative_perpendicular {
            self.min_negative_perpendicular = other.min_negative_perpendicular;
        }
        if other.min_positive_perpendicular < self.min_positive_perpendicular {
            self.min_positive_perpendicular = other.min_positive_perpendicular;
        }
    }

    fn compute_distance(&self, origin: Point) -> f64 {
        let mut min_distance = if self.min_true_distance.distance < 0.0 {
            self.min_negative_perpendicular
        } else {
            self.min_positive_perpendicular
        };

        if let Some(edge) = &self.near_edge {
            let mut distance = self.min_true_distance;
            edge.distance_to_perpendicular_distance(&mut distance, origin, self.near_edge_param);
            if distance.distance.abs() < min_distance.abs() {
                min_distance = distance.distance;
            }
        }

        min_distance
    }
}

/// Selects the pseudo-distance: the distance to the nearest edge, where edges are
/// extended past their endpoints along their tangents within the domain of these
/// endpoints.
#[derive(Copy, Clone, Debug)]
pub struct PerpendicularDistanceSelector {
    origin: Point,
    channel: PerpendicularChannel,
    tie_tolerance: f64,
}

impl PerpendicularDistanceSelector {
    /// See [`GeneratorConfig::tie_tolerance`](crate::GeneratorConfig::tie_tolerance).
    pub fn new(tie_tolerance: f64) -> Self {
        PerpendicularDistanceSelector {
            origin: Point::origin(),
            channel: PerpendicularChannel::EMPTY,
            tie_tolerance,
        }
    }
}

impl Default for PerpendicularDistanceSelector {
    fn default() -> Self {
        PerpendicularDistanceSelector::new(0.0)
    }
}

impl EdgeSelector for PerpendicularDistanceSelector {
    type Distance = f64;

    fn reset(&mut self, origin: Point) {
        self.origin = origin;
        self.channel = PerpendicularChannel::EMPTY;
    }

    fn add_edge(&mut self, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment) {
        let (distance, param) = edge.signed_distance(self.origin);
        self.channel
            .add_true_distance(edge, distance, param, self.tie_tolerance);

        let domains = EndpointDomains::new(self.origin, prev, edge, next);
        self.channel
            .add_perpendicular_distances(domains.perpendicular_distances(distance.distance));
    }

    fn merge(&mut self, other: &Self) {
        self.channel.merge(&other.channel, self.tie_tolerance);
    }

    fn distance(&self) -> f64 {
        self.channel.compute_distance(self.origin)
    }

    fn true_distance(&self) -> SignedDistance {
        self.channel.min_true_distance
    }
}

/// Selects one pseudo-distance per color channel, each from the edges whose color
/// contains that channel.
#[derive(Copy, Clone, Debug)]
pub struct MultiDistanceSelector {
    origin: Point,
    r: PerpendicularChannel,
    g: PerpendicularChannel,
    b: PerpendicularChannel,
    tie_tolerance: f64,
}

impl MultiDistanceSelector {
    /// See [`GeneratorConfig::tie_tolerance`](crate::GeneratorConfig::tie_tolerance).
    pub fn new(tie_tolerance: f64) -> Self {
        MultiDistanceSelector {
            origin: Point::origin(),
            r: PerpendicularChannel::EMPTY,
            g: PerpendicularChannel::EMPTY,
            b: PerpendicularChannel::EMPTY,
            tie_tolerance,
        }
    }

    fn multi_distance(&self) -> MultiDistance {
        MultiDistance {
            r: self.r.compute_distance(self.origin),
            g: self.g.compute_distance(self.origin),
            b: self.b.compute_distance(self.origin),
        }
    }
}

impl Default for MultiDistanceSelector {
    fn default() -> Self {
        MultiDistanceSelector::new(0.0)
    }
}

impl EdgeSelector for MultiDistanceSelector {
    type Distance = MultiDistance;

    fn reset(&mut self, origin: Point) {
        self.origin = origin;
        self.r = PerpendicularChannel::EMPTY;
        self.g = PerpendicularChannel::EMPTY;
        self.b = PerpendicularChannel::EMPTY;
    }

    fn add_edge(&mut self, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment) {
        let (distance, param) = edge.signed_distance(self.origin);
        let color = edge.color;
        let tolerance = self.tie_tolerance;
        if color.has_red() {
            self.r.add_true_distance(edge, distance, param, tolerance);
        }
        if color.has_green() {
            self.g.add_true_distance(edge, distance, param, tolerance);
        }
        if color.has_blue() {
            self.b.add_true_distance(edge, distance, param, tolerance);
        }

        let domains = EndpointDomains::new(self.origin, prev, edge, next);
        let perpendicular = domains.perpendicular_distances(distance.distance);
        if color.has_red() {
            self.r.add_perpendicular_distances(perpendicular);
        }
        if color.has_green() {
            self.g.add_perpendicular_distances(perpendicular);
        }
        if color.has_blue() {
            self.b.add_perpendicular_distances(perpendicular);
        }
    }

    fn merge(&mut self, other: &Self) {
        self.r.merge(&other.r, self.tie_tolerance);
        self.g.merge(&other.g, self.tie_tolerance);
        self.b.merge(&other.b, self.tie_tolerance);
    }

    fn distance(&self) -> MultiDistance {
        self.multi_distance()
    }

    fn true_distance(&self) -> SignedDistance {
        let mut distance = self.r.min_true_distance;
        for channel in &[&self.g, &self.b] {
            if channel
                .min_true_distance
                .closer_than_within(&distance, self.tie_tolerance)
            {
                distance = channel.min_true_distance;
            }
        }

        distance
    }
}

/// Same as [`MultiDistanceSelector`], with the true distance as a fourth channel.
#[derive(Copy, Clone, Debug, Default)]
pub struct MultiAndTrueDistanceSelector {
    multi: MultiDistanceSelector,
}

impl MultiAndTrueDistanceSelector {
    /// See [`GeneratorConfig::tie_tolerance`](crate::GeneratorConfig::tie_tolerance).
    pub fn new(tie_tolerance: f64) -> Self {
        MultiAndTrueDistanceSelector {
            multi: MultiDistanceSelector::new(tie_tolerance),
        }
    }
}

impl EdgeSelector for MultiAndTrueDistanceSelector {
    type Distance = MultiAndTrueDistance;

    #[inline]
    fn reset(&mut self, origin: Point) {
        self.multi.reset(origin);
    }

    #[inline]
    fn add_edge(&mut self, prev: &EdgeSegment, edge: &EdgeSegment, next: &EdgeSegment) {
        self.multi.add_edge(prev, edge, next);
    }

    #[inline]
    fn merge(&mut self, other: &Self) {
        self.multi.merge(&other.multi);
    }

    fn distance(&self) -> MultiAndTrueDistance {
        let multi = self.multi.multi_distance();
        MultiAndTrueDistance {
            r: multi.r,
            g: multi.g,
            b: multi.b,
            a: self.multi.true_distance().distance,
        }
    }

    #[inline]
    fn true_distance(&self) -> SignedDistance {
        self.multi.true_distance()
    }
}

#[cfg(test)]
use crate::shape::geom::{point, EdgeColor};

#[cfg(test)]
fn feed<S: EdgeSelector>(selector: &mut S, edges: &[EdgeSegment]) {
    let n = edges.len();
    for i in 0..n {
        selector.add_edge(&edges[(i + n - 1) % n], &edges[i], &edges[(i + 1) % n]);
    }
}

#[cfg(test)]
fn square_edges(color: EdgeColor) -> Vec<EdgeSegment> {
    // Clockwise with y up: positive inside.
    let corners = [point(0.0, 0.0), point(0.0, 4.0), point(4.0, 4.0), point(4.0, 0.0)];
    (0..4)
        .map(|i| EdgeSegment::linear(corners[i], corners[(i + 1) % 4], color))
        .collect()
}

#[test]
fn true_distance_selector() {
    let edges = square_edges(EdgeColor::White);
    let mut selector = TrueDistanceSelector::default();

    selector.reset(point(1.0, 2.0));
    feed(&mut selector, &edges);
    assert!((selector.distance() - 1.0).abs() < 1e-12);

    selector.reset(point(-3.0, 2.0));
    feed(&mut selector, &edges);
    assert!((selector.distance() + 3.0).abs() < 1e-12);

    // Outside of a corner: the distance to the vertex.
    selector.reset(point(-3.0, -4.0));
    feed(&mut selector, &edges);
    assert!((selector.distance() + 5.0).abs() < 1e-12);
}

#[test]
fn perpendicular_distance_selector() {
    let edges = square_edges(EdgeColor::White);
    let mut selector = PerpendicularDistanceSelector::default();

    // Outside of a corner, the pseudo-distance extends the nearest edge.
    selector.reset(point(-3.0, -4.0));
    feed(&mut selector, &edges);
    assert!((selector.distance() + 4.0).abs() < 1e-12, "{}", selector.distance());
    assert!((selector.true_distance().distance + 5.0).abs() < 1e-12);

    selector.reset(point(2.0, 3.0));
    feed(&mut selector, &edges);
    assert!((selector.distance() - 1.0).abs() < 1e-12);
}

#[test]
fn multi_distance_selector() {
    // One edge per channel pair around a square corner at the origin.
    let edges = vec![
        EdgeSegment::linear(point(0.0, 0.0), point(0.0, 4.0), EdgeColor::Yellow),
        EdgeSegment::linear(point(0.0, 4.0), point(4.0, 4.0), EdgeColor::Yellow),
        EdgeSegment::linear(point(4.0, 4.0), point(4.0, 0.0), EdgeColor::Yellow),
        EdgeSegment::linear(point(4.0, 0.0), point(0.0, 0.0), EdgeColor::Cyan),
    ];
    let mut selector = MultiDistanceSelector::default();
    selector.reset(point(-1.0, -2.0));
    feed(&mut selector, &edges);
    let distance = selector.distance();

    // The red channel only sees the left side, extended downwards.
    assert!((distance.r + 1.0).abs() < 1e-12, "{:?}", distance);
    // The blue channel only sees the bottom side, extended leftwards.
    assert!((distance.b + 2.0).abs() < 1e-12, "{:?}", distance);
    // Green sees both. The bottom side faces the point more squarely at the shared
    // corner and wins the tie.
    assert!((distance.g + 2.0).abs() < 1e-12, "{:?}", distance);
    assert!((selector.true_distance().distance + 5f64.sqrt()).abs() < 1e-12);

    let mut mtsdf = MultiAndTrueDistanceSelector::default();
    mtsdf.reset(point(-1.0, -2.0));
    feed(&mut mtsdf, &edges);
    let distance = mtsdf.distance();
    assert!((distance.a + 5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn selector_merge() {
    let edges = square_edges(EdgeColor::White);
    let origin = point(1.0, 3.5);
    let mut a = PerpendicularDistanceSelector::default();
    let mut b = PerpendicularDistanceSelector::default();
    a.reset(origin);
    b.reset(origin);
    a.add_edge(&edges[3], &edges[0], &edges[1]);
    b.add_edge(&edges[0], &edges[1], &edges[2]);
    a.merge(&b);
    assert!((a.distance() - 0.5).abs() < 1e-12);
}

#[test]
fn distance_values() {
    let mapping = DistanceMapping::new(0.5, 0.5);
    let mut pixel = [0.0f32; 4];

    let mut d = 2.0f64;
    d.fix_sign(false);
    assert_eq!(d, -2.0);
    d.store(&mapping, &mut pixel);
    assert_eq!(pixel[0], -0.5);

    let mut multi = MultiAndTrueDistance {
        r: 1.0,
        g: -3.0,
        b: 2.0,
        a: 0.5,
    };
    assert_eq!(multi.resolve(), 1.0);
    multi.fix_sign(true);
    assert_eq!(multi.r, 1.0);
    multi.fix_sign(false);
    assert_eq!((multi.r, multi.g, multi.b, multi.a), (-1.0, 3.0, -2.0, -0.5));
    multi.store(&mapping, &mut pixel);
    assert_eq!(pixel, [0.0, 2.0, -0.5, 0.25]);
}
