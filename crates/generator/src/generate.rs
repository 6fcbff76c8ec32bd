use crate::bitmap::BitmapMut;
use crate::config::{GeneratorConfig, MsdfGeneratorConfig};
use crate::contour_combiners::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
use crate::distance_finder::ShapeDistanceFinder;
use crate::edge_selectors::{
    DistanceValue, EdgeSelector, MultiAndTrueDistanceSelector, MultiDistanceSelector,
    PerpendicularDistanceSelector, TrueDistanceSelector,
};
use crate::error_correction::msdf_error_correction_with_scratch;
use crate::shape::geom::{point, MsdfError, MsdfResult};
use crate::shape::{FillRule, Scanline, Shape};
use crate::transformation::SdfTransformation;

use rayon::prelude::*;

/// Rejects the shapes the generators can't handle.
pub(crate) fn check_shape(shape: &Shape) -> MsdfResult<()> {
    if shape.edge_count() == 0 {
        log::warn!("rejecting a shape without edges");
        return Err(MsdfError::InvalidArgument("shape has no edges"));
    }
    if !shape.validate() {
        log::warn!("rejecting a shape with open contours or non-finite coordinates");
        return Err(MsdfError::InvalidArgument("invalid shape"));
    }

    Ok(())
}

/// The row of the sampled pixel centers stored in bitmap row `row`.
#[inline]
pub(crate) fn sample_row(shape: &Shape, row: usize, height: usize) -> usize {
    if shape.inverse_y_axis {
        height - 1 - row
    } else {
        row
    }
}

fn generate_distance_field<S, const N: usize>(
    output: &mut BitmapMut<N>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &GeneratorConfig,
    selector: S,
) where
    S: EdgeSelector,
{
    debug_assert!(<S::Distance as DistanceValue>::CHANNELS <= N);

    if config.overlap_support {
        let make_combiner = || OverlappingContourCombiner::new(shape, selector.clone());
        compute_rows(output, shape, transformation, make_combiner, true);
    } else {
        let make_combiner = || SimpleContourCombiner::new(selector.clone());
        compute_rows(output, shape, transformation, make_combiner, false);
    }
}

fn compute_rows<C, F, const N: usize>(
    output: &mut BitmapMut<N>,
    shape: &Shape,
    transformation: &SdfTransformation,
    make_combiner: F,
    fix_signs: bool,
) where
    C: ContourCombiner,
    F: Fn() -> C + Send + Sync,
{
    let width = output.width();
    let height = output.height();
    let mapping = transformation.distance_mapping;

    output
        .pixels_mut()
        .par_chunks_mut(width * N)
        .enumerate()
        .for_each_init(
            || (ShapeDistanceFinder::new(shape, make_combiner()), Scanline::new()),
            |(finder, scanline), (row, pixels)| {
                let y = sample_row(shape, row, height) as f64 + 0.5;
                if fix_signs {
                    shape.scanline(scanline, transformation.projection.unproject_y(y));
                }
                for (x, pixel) in pixels.chunks_exact_mut(N).enumerate() {
                    let p = transformation.unproject(point(x as f64 + 0.5, y));
                    let mut distance = finder.distance(p);
                    if fix_signs {
                        distance.fix_sign(scanline.filled(p.x, FillRule::NonZero));
                    }
                    distance.store(&mapping, pixel);
                }
            },
        );
}

/// Generates a conventional single-channel signed distance field.
pub fn generate_sdf(
    output: &mut BitmapMut<1>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &GeneratorConfig,
) -> MsdfResult<()> {
    check_shape(shape)?;
    log::debug!(
        "generate_sdf: {}x{}, {} edges, overlap support: {}",
        output.width(),
        output.height(),
        shape.edge_count(),
        config.overlap_support,
    );

    let selector = TrueDistanceSelector::new(config.tie_tolerance);
    generate_distance_field(output, shape, transformation, config, selector);

    Ok(())
}

/// Generates a single-channel signed pseudo-distance field.
///
/// Past the endpoints of the edges, the distance is measured to the extension of
/// the edges along their tangents, which keeps the field straight near corners.
pub fn generate_psdf(
    output: &mut BitmapMut<1>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &GeneratorConfig,
) -> MsdfResult<()> {
    check_shape(shape)?;
    log::debug!(
        "generate_psdf: {}x{}, {} edges, overlap support: {}",
        output.width(),
        output.height(),
        shape.edge_count(),
        config.overlap_support,
    );

    let selector = PerpendicularDistanceSelector::new(config.tie_tolerance);
    generate_distance_field(output, shape, transformation, config, selector);

    Ok(())
}

/// Generates a multi-channel signed distance field.
///
/// The edges of the shape must be colored beforehand, see `msdf_coloring`.
pub fn generate_msdf(
    output: &mut BitmapMut<3>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &MsdfGeneratorConfig,
) -> MsdfResult<()> {
    generate_msdf_with_scratch(output, shape, transformation, config, &mut Vec::new())
}

/// Same as [`generate_msdf`], reusing `scratch` for the error correction.
pub fn generate_msdf_with_scratch(
    output: &mut BitmapMut<3>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &MsdfGeneratorConfig,
    scratch: &mut Vec<u8>,
) -> MsdfResult<()> {
    check_shape(shape)?;
    log::debug!(
        "generate_msdf: {}x{}, {} edges, overlap support: {}, error correction: {:?}/{:?}",
        output.width(),
        output.height(),
        shape.edge_count(),
        config.generator.overlap_support,
        config.error_correction.mode,
        config.error_correction.distance_check_mode,
    );

    let selector = MultiDistanceSelector::new(config.generator.tie_tolerance);
    generate_distance_field(output, shape, transformation, &config.generator, selector);

    msdf_error_correction_with_scratch(output, shape, transformation, config, scratch)
}

/// Generates a multi-channel signed distance field with the true distance in the
/// fourth channel.
pub fn generate_mtsdf(
    output: &mut BitmapMut<4>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &MsdfGeneratorConfig,
) -> MsdfResult<()> {
    generate_mtsdf_with_scratch(output, shape, transformation, config, &mut Vec::new())
}

/// Same as [`generate_mtsdf`], reusing `scratch` for the error correction.
pub fn generate_mtsdf_with_scratch(
    output: &mut BitmapMut<4>,
    shape: &Shape,
    transformation: &SdfTransformation,
    config: &MsdfGeneratorConfig,
    scratch: &mut Vec<u8>,
) -> MsdfResult<()> {
    check_shape(shape)?;
    log::debug!(
        "generate_mtsdf: {}x{}, {} edges, overlap support: {}, error correction: {:?}/{:?}",
        output.width(),
        output.height(),
        shape.edge_count(),
        config.generator.overlap_support,
        config.error_correction.mode,
        config.error_correction.distance_check_mode,
    );

    let selector = MultiAndTrueDistanceSelector::new(config.generator.tie_tolerance);
    generate_distance_field(output, shape, transformation, &config.generator, selector);

    msdf_error_correction_with_scratch(output, shape, transformation, config, scratch)
}

#[cfg(test)]
use crate::shape::geom::{vector, DistanceRange, EdgeColor, EdgeSegment};
#[cfg(test)]
use crate::transformation::{DistanceMapping, Projection};

#[cfg(test)]
fn square(size: f64) -> Shape {
    // (0,0)-(size,0)-(size,size)-(0,size), counter-clockwise with y up.
    let corners = [
        point(0.0, 0.0),
        point(size, 0.0),
        point(size, size),
        point(0.0, size),
    ];
    let colors = [EdgeColor::Magenta, EdgeColor::Yellow, EdgeColor::Magenta, EdgeColor::Yellow];
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    for i in 0..4 {
        contour.add_edge(EdgeSegment::linear(corners[i], corners[(i + 1) % 4], colors[i]));
    }
    shape
}

#[cfg(test)]
fn unit_transformation() -> SdfTransformation {
    SdfTransformation::new(Projection::identity(), DistanceMapping::identity())
}

#[test]
fn sdf_of_a_square() {
    // The square runs counter-clockwise: without overlap support, the inside is
    // negative, with it the fill decides.
    let shape = square(4.0);
    let mut pixels = vec![0.0f32; 64];
    let mut bitmap = BitmapMut::<1>::new(&mut pixels, 8, 8).unwrap();

    generate_sdf(&mut bitmap, &shape, &unit_transformation(), &GeneratorConfig::DEFAULT).unwrap();
    for y in 0..8 {
        for x in 0..8 {
            let d = bitmap.pixel(x, y)[0];
            assert_eq!(d > 0.0, x < 4 && y < 4, "({}, {}): {}", x, y, d);
        }
    }
    assert_eq!(bitmap.pixel(1, 1), [1.5]);
    assert_eq!(bitmap.pixel(5, 1), [-1.5]);

    let config = GeneratorConfig::DEFAULT.with_overlap_support(false);
    generate_sdf(&mut bitmap, &shape, &unit_transformation(), &config).unwrap();
    assert_eq!(bitmap.pixel(1, 1), [-1.5]);
    assert_eq!(bitmap.pixel(5, 1), [1.5]);
}

#[test]
fn inverse_y_axis() {
    let mut shape = square(4.0);
    shape.inverse_y_axis = true;
    let mut pixels = vec![0.0f32; 64];
    let mut bitmap = BitmapMut::<1>::new(&mut pixels, 8, 8).unwrap();

    generate_psdf(&mut bitmap, &shape, &unit_transformation(), &GeneratorConfig::DEFAULT).unwrap();
    assert!(bitmap.pixel(1, 7)[0] > 0.0);
    assert!(bitmap.pixel(1, 0)[0] < 0.0);
}

#[test]
fn msdf_of_a_square() {
    let shape = square(4.0);
    let transformation =
        SdfTransformation::from_scale(2.0, vector(4.0, 4.0), DistanceRange::symmetrical(2.0));
    let mut pixels = vec![0.0f32; 16 * 16 * 3];
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 16, 16).unwrap();

    generate_msdf(&mut bitmap, &shape, &transformation, &MsdfGeneratorConfig::DEFAULT).unwrap();

    // The square covers pixels [4, 12) on both axes.
    for y in 0..16 {
        for x in 0..16 {
            let [r, g, b] = bitmap.pixel(x, y);
            let inside = (4..12).contains(&x) && (4..12).contains(&y);
            let m = crate::shape::geom::utils::median(r, g, b);
            assert_eq!(m > 0.5, inside, "({}, {}): {:?}", x, y, [r, g, b]);
        }
    }

    let mut pixels = vec![0.0f32; 16 * 16 * 4];
    let mut bitmap = BitmapMut::<4>::new(&mut pixels, 16, 16).unwrap();
    generate_mtsdf(&mut bitmap, &shape, &transformation, &MsdfGeneratorConfig::DEFAULT).unwrap();
    // Pixel (7, 7) samples (1.75, 1.75), 1.75 units inside.
    let [_, _, _, a] = bitmap.pixel(7, 7);
    assert!((a - 1.375).abs() < 1e-6, "{}", a);
    let [_, _, _, a] = bitmap.pixel(1, 7);
    assert!((a + 0.125).abs() < 1e-6, "{}", a);
}

#[test]
fn invalid_shapes() {
    let mut pixels = vec![0.0f32; 4];
    let mut bitmap = BitmapMut::<1>::new(&mut pixels, 2, 2).unwrap();
    let config = GeneratorConfig::DEFAULT;

    let mut shape = Shape::new();
    shape.add_empty_contour();
    assert_eq!(
        generate_sdf(&mut bitmap, &shape, &unit_transformation(), &config),
        Err(MsdfError::InvalidArgument("shape has no edges"))
    );

    let mut open = Shape::new();
    open.add_empty_contour().add_edge(EdgeSegment::linear(
        point(0.0, 0.0),
        point(1.0, 0.0),
        EdgeColor::White,
    ));
    assert!(generate_sdf(&mut bitmap, &open, &unit_transformation(), &config).is_err());
}

#[test]
fn colored_l_shape_medians() {
    use msdf_coloring::{color_edges, ColoringOptions};

    // Clockwise L, inside is positive.
    let corners = [
        point(1.0, 1.0),
        point(1.0, 7.0),
        point(3.0, 7.0),
        point(3.0, 3.0),
        point(7.0, 3.0),
        point(7.0, 1.0),
    ];
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    for i in 0..corners.len() {
        let to = corners[(i + 1) % corners.len()];
        contour.add_edge(EdgeSegment::linear(corners[i], to, EdgeColor::White));
    }
    shape.normalize();
    color_edges(&mut shape, &ColoringOptions::DEFAULT);

    let transformation =
        SdfTransformation::from_scale(8.0, vector(0.0, 0.0), DistanceRange::symmetrical(1.0));
    let mut reference = vec![0.0f32; 64 * 64];
    let mut bitmap = BitmapMut::<1>::new(&mut reference, 64, 64).unwrap();
    generate_sdf(&mut bitmap, &shape, &transformation, &GeneratorConfig::DEFAULT).unwrap();

    let mut pixels = vec![0.0f32; 64 * 64 * 3];
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 64, 64).unwrap();
    generate_msdf(&mut bitmap, &shape, &transformation, &MsdfGeneratorConfig::DEFAULT).unwrap();

    // Right inside of the convex corners, the two edges cover all three channels.
    for &(x, y) in &[(8, 8), (55, 8), (8, 55), (23, 55), (55, 23)] {
        let [r, g, b] = bitmap.pixel(x, y);
        let m = crate::shape::geom::utils::median(r, g, b);
        let d = reference[y * 64 + x];
        assert!((d - 0.5625).abs() < 1e-5, "({}, {}): {}", x, y, d);
        assert!((m - d).abs() < 1e-4, "({}, {}): {} {}", x, y, m, d);
    }

    for y in 0..64 {
        for x in 0..64 {
            let [r, g, b] = bitmap.pixel(x, y);
            let m = crate::shape::geom::utils::median(r, g, b);
            assert_eq!(m > 0.5, reference[y * 64 + x] > 0.5, "({}, {})", x, y);
        }
    }
}
