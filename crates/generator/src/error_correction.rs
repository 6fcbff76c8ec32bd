//! Detection and removal of the interpolation artifacts of multi-channel distance
//! fields.
//!
//! Sampling a multi-channel field interpolates each channel on its own before taking
//! the median. Between two texels, the median of the interpolated channels can stray
//! far from both texels' medians where two channels cross, which shows up as spots or
//! notches along the edges of the rendered shape. Texels that cause such artifacts
//! are flattened: all of their channels are set to their median, which turns them
//! into plain distance texels.

use crate::bitmap::{BitmapMut, BitmapRef};
use crate::config::{DistanceCheckMode, ErrorCorrectionConfig, ErrorCorrectionMode, MsdfGeneratorConfig};
use crate::contour_combiners::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
use crate::distance_finder::ShapeDistanceFinder;
use crate::edge_selectors::PerpendicularDistanceSelector;
use crate::generate::sample_row;
use crate::shape::geom::utils::{median, mix, solve_quadratic};
use crate::shape::geom::{point, vector, MsdfError, MsdfResult, Point, Vector};
use crate::shape::Shape;
use crate::transformation::{DistanceMapping, SdfTransformation};

use rayon::prelude::*;

/// The texel must be flattened.
const ERROR: u8 = 1;
/// The texel carries an edge or a corner of the shape.
const PROTECTED: u8 = 2;

const CANDIDATE: u8 = 1;
const ARTIFACT: u8 = 2;

/// Channel crossings closer than this to a texel are ignored: channels are often
/// equal at the texels themselves.
const ARTIFACT_T_EPSILON: f64 = 0.01;
const PROTECTION_RADIUS_TOLERANCE: f64 = 1.001;

/// Flattens the texels of `sdf` that cause interpolation artifacts, according to
/// `config.error_correction`.
///
/// `sdf` must have three or four channels; only the first three are considered.
pub fn msdf_error_correction<const N: usize>(
    sdf: &mut BitmapMut<N>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &MsdfGeneratorConfig,
) -> MsdfResult<()> {
    msdf_error_correction_with_scratch(sdf, shape, transformation, config, &mut Vec::new())
}

/// Same as [`msdf_error_correction`], reusing `scratch` for the per-texel flags.
pub fn msdf_error_correction_with_scratch<const N: usize>(
    sdf: &mut BitmapMut<N>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &MsdfGeneratorConfig,
    scratch: &mut Vec<u8>,
) -> MsdfResult<()> {
    if N < 3 {
        return Err(MsdfError::InvalidArgument(
            "error correction needs a multi-channel bitmap",
        ));
    }

    let ec_config = &config.error_correction;
    if ec_config.mode == ErrorCorrectionMode::Disabled {
        return Ok(());
    }

    let width = sdf.width();
    let height = sdf.height();
    scratch.clear();
    scratch.resize(width * height, 0);

    {
        let mut ec = ErrorCorrection::new(&mut scratch[..], width, height, transformation, ec_config);
        let bitmap = sdf.as_ref();

        match ec_config.mode {
            ErrorCorrectionMode::Disabled | ErrorCorrectionMode::Indiscriminate => {}
            ErrorCorrectionMode::EdgePriority => {
                ec.protect_corners(shape);
                ec.protect_edges(bitmap);
            }
            ErrorCorrectionMode::EdgeOnly => ec.protect_all(),
        }

        let check_mode = ec_config.distance_check_mode;
        if check_mode == DistanceCheckMode::DoNotCheck
            || (check_mode == DistanceCheckMode::CheckAtEdge
                && ec_config.mode != ErrorCorrectionMode::EdgeOnly)
        {
            ec.find_errors(bitmap);
            if check_mode == DistanceCheckMode::CheckAtEdge {
                ec.protect_all();
            }
        }

        if check_mode == DistanceCheckMode::AlwaysCheck || check_mode == DistanceCheckMode::CheckAtEdge {
            let tie_tolerance = config.generator.tie_tolerance;
            if config.generator.overlap_support {
                ec.find_errors_with_distance_check(bitmap, shape, || {
                    OverlappingContourCombiner::new(shape, PerpendicularDistanceSelector::new(tie_tolerance))
                });
            } else {
                ec.find_errors_with_distance_check(bitmap, shape, || {
                    SimpleContourCombiner::new(PerpendicularDistanceSelector::new(tie_tolerance))
                });
            }
        }
    }

    let corrected = apply(sdf, scratch);
    log::trace!("error correction: {} of {} texels flattened", corrected, width * height);

    Ok(())
}

/// Sets the color channels of every texel flagged with `ERROR` to their median.
fn apply<const N: usize>(sdf: &mut BitmapMut<N>, stencil: &[u8]) -> usize {
    let mut count = 0;
    for (flags, texel) in stencil.iter().zip(sdf.pixels_mut().chunks_exact_mut(N)) {
        if flags & ERROR != 0 {
            let m = median(texel[0], texel[1], texel[2]);
            texel[0] = m;
            texel[1] = m;
            texel[2] = m;
            count += 1;
        }
    }

    count
}

#[inline]
fn texel<const N: usize>(sdf: &BitmapRef<N>, x: usize, y: usize) -> [f32; 3] {
    let offset = (y * sdf.width() + x) * N;
    let pixels = sdf.pixels();
    [pixels[offset], pixels[offset + 1], pixels[offset + 2]]
}

#[inline]
fn texel_median(t: &[f32; 3]) -> f32 {
    median(t[0], t[1], t[2])
}

/// The expected change of the mapped distance between adjacent texels.
#[derive(Copy, Clone, Debug)]
struct Spans {
    horizontal: f64,
    vertical: f64,
    diagonal: f64,
}

impl Spans {
    fn new(transformation: &SdfTransformation, ratio: f64) -> Self {
        let unit = transformation.map_delta(1.0);
        let length = |v: Vector| ratio * transformation.unproject_vector(v).length();
        Spans {
            horizontal: length(vector(unit, 0.0)),
            vertical: length(vector(0.0, unit)),
            diagonal: length(vector(unit, unit)),
        }
    }
}

struct ErrorCorrection<'l> {
    stencil: &'l mut [u8],
    width: usize,
    height: usize,
    transformation: &'l SdfTransformation,
    config: &'l ErrorCorrectionConfig,
    /// The value of the edge in the bitmap.
    edge: f32,
}

impl<'l> ErrorCorrection<'l> {
    fn new(
        stencil: &'l mut [u8],
        width: usize,
        height: usize,
        transformation: &'l SdfTransformation,
        config: &'l ErrorCorrectionConfig,
    ) -> Self {
        for flags in stencil.iter_mut() {
            *flags = 0;
        }
        ErrorCorrection {
            stencil,
            width,
            height,
            transformation,
            config,
            edge: transformation.map(0.0) as f32,
        }
    }

    #[inline]
    fn flags_mut(&mut self, x: usize, y: usize) -> &mut u8 {
        &mut self.stencil[y * self.width + x]
    }

    fn protect_all(&mut self) {
        for flags in self.stencil.iter_mut() {
            *flags |= PROTECTED;
        }
    }

    /// Protects the four texels around each corner, where the color changes between
    /// two consecutive edges.
    fn protect_corners(&mut self, shape: &Shape) {
        let w = self.width as isize;
        let h = self.height as isize;
        for contour in &shape.contours {
            let mut prev = match contour.edges.last() {
                Some(edge) => edge,
                None => continue,
            };
            for edge in &contour.edges {
                let common = prev.color & edge.color;
                prev = edge;
                if common.channel_count() > 1 {
                    continue;
                }

                let p = self.transformation.project(edge.start());
                let l = (p.x - 0.5).floor() as isize;
                let mut b = (p.y - 0.5).floor() as isize;
                if shape.inverse_y_axis {
                    b = h - b - 2;
                }
                let r = l + 1;
                let t = b + 1;
                if l < w && b < h && r >= 0 && t >= 0 {
                    for &(x, y) in &[(l, b), (r, b), (l, t), (r, t)] {
                        if x >= 0 && x < w && y >= 0 && y < h {
                            *self.flags_mut(x as usize, y as usize) |= PROTECTED;
                        }
                    }
                }
            }
        }
    }

    /// Protects the texels whose extreme channels carry an edge of the shape between
    /// them and one of their neighbours.
    fn protect_edges<const N: usize>(&mut self, sdf: BitmapRef<N>) {
        let unit = self.transformation.map_delta(1.0);
        let radius = |v: Vector| {
            (PROTECTION_RADIUS_TOLERANCE * self.transformation.unproject_vector(v).length()) as f32
        };
        let h_radius = radius(vector(unit, 0.0));
        let v_radius = radius(vector(0.0, unit));
        let d_radius = radius(vector(unit, unit));
        let edge = self.edge;
        let (w, h) = (self.width, self.height);

        let protect_pair = |ec: &mut Self, radius: f32, (ax, ay): (usize, usize), (bx, by): (usize, usize)| {
            let a = texel(&sdf, ax, ay);
            let b = texel(&sdf, bx, by);
            let am = texel_median(&a);
            let bm = texel_median(&b);
            if (am - edge).abs() + (bm - edge).abs() < radius {
                let mask = edge_between_texels(&a, &b, edge);
                protect_extreme_channels(ec.flags_mut(ax, ay), &a, am, mask);
                protect_extreme_channels(ec.flags_mut(bx, by), &b, bm, mask);
            }
        };

        for y in 0..h {
            for x in 0..w.saturating_sub(1) {
                protect_pair(self, h_radius, (x, y), (x + 1, y));
            }
        }
        for y in 0..h.saturating_sub(1) {
            for x in 0..w {
                protect_pair(self, v_radius, (x, y), (x, y + 1));
            }
        }
        for y in 0..h.saturating_sub(1) {
            for x in 0..w.saturating_sub(1) {
                protect_pair(self, d_radius, (x, y), (x + 1, y + 1));
                protect_pair(self, d_radius, (x + 1, y), (x, y + 1));
            }
        }
    }

    /// Flags the texels that cause artifacts, judging from the bitmap alone.
    fn find_errors<const N: usize>(&mut self, sdf: BitmapRef<N>) {
        let spans = Spans::new(self.transformation, self.config.min_deviation_ratio);
        let edge = self.edge;
        let width = self.width;

        self.stencil
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, flags) in row.iter_mut().enumerate() {
                    let mut classifier = BaseArtifactClassifier {
                        span: 0.0,
                        protected: *flags & PROTECTED != 0,
                        edge,
                    };
                    if texel_has_artifact(&mut classifier, &sdf, x, y, &spans) {
                        *flags |= ERROR;
                    }
                }
            });
    }

    /// Flags the texels that cause artifacts, checking the candidates against the
    /// exact distance of the shape.
    fn find_errors_with_distance_check<C, F, const N: usize>(
        &mut self,
        sdf: BitmapRef<N>,
        shape: &Shape,
        make_combiner: F,
    ) where
        C: ContourCombiner<Selector = PerpendicularDistanceSelector>,
        F: Fn() -> C + Send + Sync,
    {
        let spans = Spans::new(self.transformation, self.config.min_deviation_ratio);
        let edge = self.edge;
        let width = self.width;
        let height = self.height;
        let transformation = self.transformation;
        let min_improve_ratio = self.config.min_improve_ratio;

        self.stencil
            .par_chunks_mut(width)
            .enumerate()
            .for_each_init(
                || ShapeDistanceChecker {
                    base: BaseArtifactClassifier {
                        span: 0.0,
                        protected: false,
                        edge,
                    },
                    finder: ShapeDistanceFinder::new(shape, make_combiner()),
                    sdf,
                    mapping: transformation.distance_mapping,
                    texel_size: transformation.unproject_vector(vector(1.0, 1.0)),
                    y_direction: if shape.inverse_y_axis { -1.0 } else { 1.0 },
                    min_improve_ratio,
                    direction: Vector::zero(),
                    shape_coord: Point::origin(),
                    sdf_coord: Point::origin(),
                    msd: [0.0; 3],
                },
                |checker, (row, flags_row)| {
                    let y = sample_row(shape, row, height) as f64 + 0.5;
                    for (x, flags) in flags_row.iter_mut().enumerate() {
                        if *flags & ERROR != 0 {
                            continue;
                        }
                        checker.shape_coord = transformation.unproject(point(x as f64 + 0.5, y));
                        checker.sdf_coord = point(x as f64 + 0.5, row as f64 + 0.5);
                        checker.msd = texel(&sdf, x, row);
                        checker.base.protected = *flags & PROTECTED != 0;
                        if texel_has_artifact(checker, &sdf, x, row, &spans) {
                            *flags |= ERROR;
                        }
                    }
                },
            );
    }
}

/// Returns the bit mask of the channels that carry an edge between texels `a` and `b`.
fn edge_between_texels(a: &[f32; 3], b: &[f32; 3], edge: f32) -> u8 {
    let mut mask = 0;
    for channel in 0..3 {
        // Where the channel crosses the edge.
        let t = (a[channel] - edge) as f64 / (a[channel] - b[channel]) as f64;
        if t > 0.0 && t < 1.0 {
            let c = [
                mix(a[0] as f64, b[0] as f64, t),
                mix(a[1] as f64, b[1] as f64, t),
                mix(a[2] as f64, b[2] as f64, t),
            ];
            // Only an edge if the crossing channel is the median there.
            if median(c[0], c[1], c[2]) == c[channel] {
                mask |= 1 << channel;
            }
        }
    }

    mask
}

/// Protects the texel if one of its channels in `mask` is not its median.
fn protect_extreme_channels(flags: &mut u8, msd: &[f32; 3], m: f32, mask: u8) {
    if (0..3).any(|channel| mask & (1 << channel) != 0 && msd[channel] != m) {
        *flags |= PROTECTED;
    }
}

/// Decides whether an interpolated median is an artifact.
trait ArtifactClassifier {
    fn base(&self) -> &BaseArtifactClassifier;

    /// Prepares the classifier for the neighbour in `direction` (in texels), whose
    /// values may differ by up to `span` from the current texel's.
    fn look_towards(&mut self, direction: Vector, span: f64);

    /// Returns true if the median `m` interpolated at `t` is an artifact, given the
    /// flags of the range tests.
    fn evaluate(&mut self, t: f64, m: f32, flags: u8) -> bool;
}

/// Classifies artifacts from the contents of the bitmap only.
#[derive(Copy, Clone, Debug)]
struct BaseArtifactClassifier {
    span: f64,
    protected: bool,
    edge: f32,
}

impl BaseArtifactClassifier {
    /// Tests the median `xm` interpolated at `xt` between medians `am` at `at` and
    /// `bm` at `bt`.
    fn range_test(&self, at: f64, bt: f64, xt: f64, am: f32, bm: f32, xm: f32) -> u8 {
        let edge = self.edge;
        // Protected texels only care about fill inversions.
        let inverted = (am > edge && bm > edge && xm <= edge) || (am < edge && bm < edge && xm >= edge);
        if inverted || (!self.protected && median(am, bm, xm) != xm) {
            let ax_span = (xt - at) * self.span;
            let bx_span = (bt - xt) * self.span;
            let (am, bm, xm) = (am as f64, bm as f64, xm as f64);
            let in_range = xm >= am - ax_span
                && xm <= am + ax_span
                && xm >= bm - bx_span
                && xm <= bm + bx_span;
            if !in_range {
                return CANDIDATE | ARTIFACT;
            }
            return CANDIDATE;
        }

        0
    }
}

impl ArtifactClassifier for BaseArtifactClassifier {
    #[inline]
    fn base(&self) -> &BaseArtifactClassifier {
        self
    }

    #[inline]
    fn look_towards(&mut self, _direction: Vector, span: f64) {
        self.span = span;
    }

    #[inline]
    fn evaluate(&mut self, _t: f64, _m: f32, flags: u8) -> bool {
        flags & ARTIFACT != 0
    }
}

/// Confirms the artifact candidates by comparing the interpolated values with and
/// without correction against the exact distance of the shape.
struct ShapeDistanceChecker<'l, C, const N: usize> {
    base: BaseArtifactClassifier,
    finder: ShapeDistanceFinder<'l, C>,
    sdf: BitmapRef<'l, N>,
    mapping: DistanceMapping,
    /// The size of a texel in shape units.
    texel_size: Vector,
    y_direction: f64,
    min_improve_ratio: f64,
    direction: Vector,
    /// The current texel's center, in shape and bitmap coordinates.
    shape_coord: Point,
    sdf_coord: Point,
    msd: [f32; 3],
}

impl<'l, C, const N: usize> ArtifactClassifier for ShapeDistanceChecker<'l, C, N>
where
    C: ContourCombiner<Selector = PerpendicularDistanceSelector>,
{
    #[inline]
    fn base(&self) -> &BaseArtifactClassifier {
        &self.base
    }

    #[inline]
    fn look_towards(&mut self, direction: Vector, span: f64) {
        self.base.span = span;
        self.direction = direction;
    }

    fn evaluate(&mut self, t: f64, _m: f32, flags: u8) -> bool {
        if flags & CANDIDATE == 0 {
            return false;
        }
        if flags & ARTIFACT != 0 {
            return true;
        }

        let t_vector = self.direction * t;
        // What is interpolated there now.
        let old = self.sdf.interpolate(self.sdf_coord + t_vector);
        // What would be interpolated there if the current texel was flattened.
        let weight = (1.0 - t_vector.x.abs()) * (1.0 - t_vector.y.abs());
        let flat = texel_median(&self.msd) as f64;
        let mut new = [0.0f32; 3];
        for i in 0..3 {
            new[i] = (old[i] as f64 + weight * (flat - self.msd[i] as f64)) as f32;
        }

        let old_psd = median(old[0], old[1], old[2]);
        let new_psd = median(new[0], new[1], new[2]);
        let offset = vector(
            t_vector.x * self.texel_size.x,
            t_vector.y * self.texel_size.y * self.y_direction,
        );
        let ref_psd = self.mapping.map(self.finder.distance(self.shape_coord + offset)) as f32;

        self.min_improve_ratio * ((new_psd - ref_psd).abs() as f64) < (old_psd - ref_psd).abs() as f64
    }
}

/// Returns the median of the linear interpolation of `a` and `b` at `t`.
fn interpolated_median(a: &[f32; 3], b: &[f32; 3], t: f64) -> f32 {
    median(
        mix(a[0] as f64, b[0] as f64, t),
        mix(a[1] as f64, b[1] as f64, t),
        mix(a[2] as f64, b[2] as f64, t),
    ) as f32
}

/// Returns the median of the quadratic `a + l·t + q·t²`, per channel.
fn interpolated_median_quadratic(a: &[f32; 3], l: &[f32; 3], q: &[f32; 3], t: f64) -> f32 {
    let channel = |i: usize| t * (t * q[i] as f64 + l[i] as f64) + a[i] as f64;
    median(channel(0), channel(1), channel(2)) as f32
}

/// Checks the point between `a` and `b` where two channels, whose differences are
/// `da` at `a` and `db` at `b`, are equal.
fn has_linear_artifact_inner<A: ArtifactClassifier>(
    classifier: &mut A,
    am: f32,
    bm: f32,
    a: &[f32; 3],
    b: &[f32; 3],
    da: f32,
    db: f32,
) -> bool {
    let t = da as f64 / (da - db) as f64;
    if t > ARTIFACT_T_EPSILON && t < 1.0 - ARTIFACT_T_EPSILON {
        let xm = interpolated_median(a, b, t);
        let flags = classifier.base().range_test(0.0, 1.0, t, am, bm, xm);
        return classifier.evaluate(t, xm, flags);
    }

    false
}

/// Checks the points along the diagonal between `a` and `d` where two channels are
/// equal. Along the diagonal, the bilinear interpolation is the quadratic
/// `a + l·t + q·t²`, whose extremes per channel are at `t_ex`.
#[allow(clippy::too_many_arguments)]
fn has_diagonal_artifact_inner<A: ArtifactClassifier>(
    classifier: &mut A,
    am: f32,
    dm: f32,
    a: &[f32; 3],
    l: &[f32; 3],
    q: &[f32; 3],
    da: f32,
    dbc: f32,
    dd: f32,
    t_ex0: f64,
    t_ex1: f64,
) -> bool {
    let roots = solve_quadratic((dd - dbc + da) as f64, (dbc - da - da) as f64, da as f64);
    for &t in &roots {
        if !(t > ARTIFACT_T_EPSILON && t < 1.0 - ARTIFACT_T_EPSILON) {
            continue;
        }

        let xm = interpolated_median_quadratic(a, l, q, t);
        let mut flags = classifier.base().range_test(0.0, 1.0, t, am, dm, xm);
        // Also test against the medians at the extremes of the channels.
        for &t_ex in &[t_ex0, t_ex1] {
            if t_ex > 0.0 && t_ex < 1.0 {
                let mut t_end = [0.0, 1.0];
                let mut em = [am, dm];
                let side = (t_ex > t) as usize;
                t_end[side] = t_ex;
                em[side] = interpolated_median_quadratic(a, l, q, t_ex);
                flags |= classifier.base().range_test(t_end[0], t_end[1], t, em[0], em[1], xm);
            }
        }

        if classifier.evaluate(t, xm, flags) {
            return true;
        }
    }

    false
}

/// Checks for an artifact between horizontally or vertically adjacent texels.
fn has_linear_artifact<A: ArtifactClassifier>(
    classifier: &mut A,
    am: f32,
    a: &[f32; 3],
    b: &[f32; 3],
) -> bool {
    let edge = classifier.base().edge;
    let bm = texel_median(b);
    // Only the texel farther from the edge is flagged.
    (am - edge).abs() >= (bm - edge).abs()
        && (has_linear_artifact_inner(classifier, am, bm, a, b, a[1] - a[0], b[1] - b[0])
            || has_linear_artifact_inner(classifier, am, bm, a, b, a[2] - a[1], b[2] - b[1])
            || has_linear_artifact_inner(classifier, am, bm, a, b, a[0] - a[2], b[0] - b[2]))
}

/// Checks for an artifact between diagonally adjacent texels `a` and `d`, with `b`
/// and `c` on the other diagonal.
fn has_diagonal_artifact<A: ArtifactClassifier>(
    classifier: &mut A,
    am: f32,
    a: &[f32; 3],
    b: &[f32; 3],
    c: &[f32; 3],
    d: &[f32; 3],
) -> bool {
    let edge = classifier.base().edge;
    let dm = texel_median(d);
    if (am - edge).abs() < (dm - edge).abs() {
        return false;
    }

    let abc = [a[0] - b[0] - c[0], a[1] - b[1] - c[1], a[2] - b[2] - c[2]];
    let l = [-a[0] - abc[0], -a[1] - abc[1], -a[2] - abc[2]];
    let q = [d[0] + abc[0], d[1] + abc[1], d[2] + abc[2]];
    let t_ex = [
        -0.5 * l[0] as f64 / q[0] as f64,
        -0.5 * l[1] as f64 / q[1] as f64,
        -0.5 * l[2] as f64 / q[2] as f64,
    ];

    has_diagonal_artifact_inner(
        classifier,
        am,
        dm,
        a,
        &l,
        &q,
        a[1] - a[0],
        b[1] - b[0] + c[1] - c[0],
        d[1] - d[0],
        t_ex[0],
        t_ex[1],
    ) || has_diagonal_artifact_inner(
        classifier,
        am,
        dm,
        a,
        &l,
        &q,
        a[2] - a[1],
        b[2] - b[1] + c[2] - c[1],
        d[2] - d[1],
        t_ex[1],
        t_ex[2],
    ) || has_diagonal_artifact_inner(
        classifier,
        am,
        dm,
        a,
        &l,
        &q,
        a[0] - a[2],
        b[0] - b[2] + c[0] - c[2],
        d[0] - d[2],
        t_ex[2],
        t_ex[0],
    )
}

/// Returns true if interpolating texel `(x, y)` with any of its eight neighbours
/// produces an artifact.
fn texel_has_artifact<A: ArtifactClassifier, const N: usize>(
    classifier: &mut A,
    sdf: &BitmapRef<N>,
    x: usize,
    y: usize,
    spans: &Spans,
) -> bool {
    let c = texel(sdf, x, y);
    let cm = texel_median(&c);
    let has_left = x > 0;
    let has_bottom = y > 0;
    let has_right = x + 1 < sdf.width();
    let has_top = y + 1 < sdf.height();

    let l = if has_left { Some(texel(sdf, x - 1, y)) } else { None };
    let b = if has_bottom { Some(texel(sdf, x, y - 1)) } else { None };
    let r = if has_right { Some(texel(sdf, x + 1, y)) } else { None };
    let t = if has_top { Some(texel(sdf, x, y + 1)) } else { None };

    let linear = [
        (l, vector(-1.0, 0.0), spans.horizontal),
        (b, vector(0.0, -1.0), spans.vertical),
        (r, vector(1.0, 0.0), spans.horizontal),
        (t, vector(0.0, 1.0), spans.vertical),
    ];
    for (neighbour, direction, span) in &linear {
        if let Some(n) = neighbour {
            classifier.look_towards(*direction, *span);
            if has_linear_artifact(classifier, cm, &c, n) {
                return true;
            }
        }
    }

    let diagonals = [
        (&l, &b, -1isize, -1isize),
        (&r, &b, 1, -1),
        (&l, &t, -1, 1),
        (&r, &t, 1, 1),
    ];
    for &(h, v, dx, dy) in &diagonals {
        if let (Some(h), Some(v)) = (h, v) {
            let d = texel(sdf, (x as isize + dx) as usize, (y as isize + dy) as usize);
            classifier.look_towards(vector(dx as f64, dy as f64), spans.diagonal);
            if has_diagonal_artifact(classifier, cm, &c, h, v, &d) {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
use crate::shape::geom::{DistanceRange, EdgeColor, EdgeSegment};
#[cfg(test)]
use crate::transformation::Projection;

#[cfg(test)]
fn wide_range_transformation() -> SdfTransformation {
    // A distance of one texel only changes the value by 0.05.
    SdfTransformation::new(
        Projection::identity(),
        DistanceMapping::from_range(DistanceRange::symmetrical(20.0)),
    )
}

#[cfg(test)]
fn correct(pixels: &mut [f32], mode: ErrorCorrectionMode) -> Vec<u8> {
    let mut bitmap = BitmapMut::<3>::new(pixels, 2, 1).unwrap();
    let config = MsdfGeneratorConfig::DEFAULT.with_error_correction(
        ErrorCorrectionConfig::DEFAULT
            .with_mode(mode)
            .with_distance_check_mode(DistanceCheckMode::DoNotCheck),
    );
    let mut scratch = vec![7; 11];
    msdf_error_correction_with_scratch(
        &mut bitmap,
        &Shape::new(),
        &wide_range_transformation(),
        &config,
        &mut scratch,
    )
    .unwrap();
    scratch
}

#[test]
fn flatten_clashing_channels() {
    // The red and green channels cross halfway, where the median drops to 0.8, far
    // below what the medians of both texels allow.
    let texels = [1.0f32, 0.6, 0.9, 0.6, 1.0, 0.9];

    let mut pixels = texels;
    let stencil = correct(&mut pixels, ErrorCorrectionMode::Indiscriminate);
    assert_eq!(stencil, vec![ERROR, ERROR]);
    assert_eq!(pixels, [0.9; 6]);

    // Not a fill inversion: protected texels are kept.
    let mut pixels = texels;
    let stencil = correct(&mut pixels, ErrorCorrectionMode::EdgeOnly);
    assert_eq!(stencil, vec![PROTECTED, PROTECTED]);
    assert_eq!(pixels, texels);

    let mut pixels = texels;
    correct(&mut pixels, ErrorCorrectionMode::Disabled);
    assert_eq!(pixels, texels);
}

#[test]
fn flatten_fill_inversion() {
    // Halfway, the median drops to the edge level although both texels are inside.
    let texels = [1.0f32, 0.0, 0.9, 0.0, 1.0, 0.9];
    let mut pixels = texels;
    let stencil = correct(&mut pixels, ErrorCorrectionMode::EdgeOnly);
    assert_eq!(stencil, vec![ERROR | PROTECTED, ERROR | PROTECTED]);
    assert_eq!(pixels, [0.9; 6]);
}

#[test]
fn consistent_texels_are_kept() {
    let texels = [0.2f32, 0.3, 0.4, 0.3, 0.4, 0.5];
    let mut pixels = texels;
    let stencil = correct(&mut pixels, ErrorCorrectionMode::Indiscriminate);
    assert_eq!(stencil, vec![0, 0]);
    assert_eq!(pixels, texels);
}

#[test]
fn single_channel_is_rejected() {
    let mut pixels = [0.0f32; 4];
    let mut bitmap = BitmapMut::<1>::new(&mut pixels, 2, 2).unwrap();
    assert!(msdf_error_correction(
        &mut bitmap,
        &Shape::new(),
        &wide_range_transformation(),
        &MsdfGeneratorConfig::DEFAULT,
    )
    .is_err());
}

#[test]
fn corner_protection() {
    let corners = [point(0.0, 0.0), point(4.0, 0.0), point(4.0, 4.0), point(0.0, 4.0)];
    let colors = [EdgeColor::Magenta, EdgeColor::Yellow, EdgeColor::Magenta, EdgeColor::Yellow];
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    for i in 0..4 {
        contour.add_edge(EdgeSegment::linear(corners[i], corners[(i + 1) % 4], colors[i]));
    }

    let transformation = SdfTransformation::default();
    let config = ErrorCorrectionConfig::DEFAULT;
    let mut stencil = vec![0; 64];
    let mut ec = ErrorCorrection::new(&mut stencil, 8, 8, &transformation, &config);
    ec.protect_corners(&shape);

    let protected: Vec<(usize, usize)> = (0..64)
        .filter(|&i| stencil[i] & PROTECTED != 0)
        .map(|i| (i % 8, i / 8))
        .collect();
    assert_eq!(
        protected,
        vec![(0, 0), (3, 0), (4, 0), (0, 3), (3, 3), (4, 3), (0, 4), (3, 4), (4, 4)]
    );
}
