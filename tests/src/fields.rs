use crate::*;

use msdf::coloring::{color_edges, ColoringOptions};
use msdf::generator::*;
use msdf::geom::{point, vector, DistanceRange, MsdfError};
use msdf::shape::{FillRule, Shape};

fn prepare(mut shape: Shape) -> Shape {
    shape.normalize();
    color_edges(&mut shape, &ColoringOptions::DEFAULT);
    shape
}

// One pixel per unit, distances stored as is.
fn identity() -> SdfTransformation {
    SdfTransformation::default()
}

// 8 pixels per unit, distances in [-0.5, 0.5] stored in [0, 1].
fn eighth_of_unit() -> SdfTransformation {
    SdfTransformation::from_scale(8.0, vector(0.0, 0.0), DistanceRange::symmetrical(1.0))
}

fn sdf(shape: &Shape, transformation: &SdfTransformation, size: usize) -> Vec<f32> {
    let mut pixels = storage::<1>(size, size);
    let mut bitmap = BitmapMut::<1>::new(&mut pixels, size, size).unwrap();
    generate_sdf(&mut bitmap, shape, transformation, &GeneratorConfig::DEFAULT).unwrap();
    pixels
}

#[test]
fn square_sign_flips_at_the_boundary() {
    init_logger();
    let shape = prepare(square());
    let inside = |x: usize, y: usize| x < 4 && y < 4;

    let mut pixels = storage::<1>(8, 8);
    let mut bitmap = BitmapMut::<1>::new(&mut pixels, 8, 8).unwrap();
    generate_sdf(&mut bitmap, &shape, &identity(), &GeneratorConfig::DEFAULT).unwrap();
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(bitmap.pixel(x, y)[0] > 0.0, inside(x, y), "sdf ({}, {})", x, y);
        }
    }
    assert_eq!(bitmap.pixel(3, 3), [0.5]);
    assert_eq!(bitmap.pixel(4, 3), [-0.5]);

    generate_psdf(&mut bitmap, &shape, &identity(), &GeneratorConfig::DEFAULT).unwrap();
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(bitmap.pixel(x, y)[0] > 0.0, inside(x, y), "psdf ({}, {})", x, y);
        }
    }

    let mut pixels = storage::<3>(8, 8);
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 8, 8).unwrap();
    generate_msdf(&mut bitmap, &shape, &identity(), &MsdfGeneratorConfig::DEFAULT).unwrap();
    for (i, median) in medians(&bitmap).into_iter().enumerate() {
        assert_eq!(median > 0.0, inside(i % 8, i / 8), "msdf ({}, {})", i % 8, i / 8);
    }

    let mut pixels = storage::<4>(8, 8);
    let mut bitmap = BitmapMut::<4>::new(&mut pixels, 8, 8).unwrap();
    generate_mtsdf(&mut bitmap, &shape, &identity(), &MsdfGeneratorConfig::DEFAULT).unwrap();
    for (i, median) in medians(&bitmap).into_iter().enumerate() {
        let (x, y) = (i % 8, i / 8);
        assert_eq!(median > 0.0, inside(x, y), "mtsdf ({}, {})", x, y);
        assert_eq!(bitmap.pixel(x, y)[3] > 0.0, inside(x, y), "mtsdf alpha ({}, {})", x, y);
    }
}

#[test]
fn l_shape_corners() {
    init_logger();
    let shape = prepare(l_shape());
    let transformation = eighth_of_unit();
    let reference = sdf(&shape, &transformation, 64);

    let mut pixels = storage::<3>(64, 64);
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 64, 64).unwrap();
    generate_msdf(&mut bitmap, &shape, &transformation, &MsdfGeneratorConfig::DEFAULT).unwrap();
    let medians = medians(&bitmap);

    // The pixels right inside of the convex corners.
    for &(x, y) in &[(8, 8), (55, 8), (8, 55), (23, 55), (55, 23)] {
        let i = y * 64 + x;
        assert!((reference[i] - 0.5625).abs() < 1e-5, "({}, {}): {}", x, y, reference[i]);
        assert!(
            (medians[i] - reference[i]).abs() < 1e-4,
            "({}, {}): {} {}",
            x,
            y,
            medians[i],
            reference[i],
        );
    }

    for (i, (median, distance)) in medians.iter().zip(&reference).enumerate() {
        assert_eq!(*median > 0.5, *distance > 0.5, "({}, {})", i % 64, i / 64);
    }
}

#[test]
fn true_distance_channel() {
    let shape = prepare(l_shape());
    let transformation = eighth_of_unit();
    let reference = sdf(&shape, &transformation, 64);

    let mut pixels = storage::<4>(64, 64);
    let mut bitmap = BitmapMut::<4>::new(&mut pixels, 64, 64).unwrap();
    generate_mtsdf(&mut bitmap, &shape, &transformation, &MsdfGeneratorConfig::DEFAULT).unwrap();

    for (alpha, distance) in bitmap.pixels().chunks_exact(4).map(|p| p[3]).zip(&reference) {
        assert!((alpha - distance).abs() < 1e-6, "{} {}", alpha, distance);
    }
}

#[test]
fn error_correction_reduces_deviation() {
    init_logger();
    let shape = prepare(overlapping_squares());
    let transformation =
        SdfTransformation::from_scale(4.0, vector(0.0, 0.0), DistanceRange::symmetrical(2.0));
    let reference = sdf(&shape, &transformation, 32);

    let deviations = |error_correction: ErrorCorrectionConfig| {
        let config = MsdfGeneratorConfig::DEFAULT
            .with_overlap_support(true)
            .with_error_correction(error_correction);
        let mut pixels = storage::<3>(32, 32);
        let mut bitmap = BitmapMut::<3>::new(&mut pixels, 32, 32).unwrap();
        generate_msdf(&mut bitmap, &shape, &transformation, &config).unwrap();

        bitmap
            .pixels()
            .chunks_exact(3)
            .zip(&reference)
            .map(|(texel, distance)| {
                texel
                    .iter()
                    .map(|c| (c - distance).abs())
                    .fold(0.0f32, f32::max)
            })
            .collect::<Vec<f32>>()
    };

    let raw = deviations(ErrorCorrectionConfig::disabled());
    let corrected = deviations(
        ErrorCorrectionConfig::DEFAULT.with_mode(ErrorCorrectionMode::Indiscriminate),
    );

    for (i, (after, before)) in corrected.iter().zip(&raw).enumerate() {
        assert!(after <= before, "({}, {}): {} > {}", i % 32, i / 32, after, before);
    }
    let max = |values: &[f32]| values.iter().cloned().fold(0.0f32, f32::max);
    assert!(max(&corrected) <= max(&raw));
}

#[test]
fn sign_correction_of_reversed_contours() {
    let shape = prepare(square());
    let config = MsdfGeneratorConfig::DEFAULT.with_overlap_support(false);
    let mut pixels = storage::<3>(8, 8);
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 8, 8).unwrap();
    generate_msdf(&mut bitmap, &shape, &identity(), &config).unwrap();

    // Counter-clockwise, so the inside is negative without overlap support.
    assert!(medians(&bitmap)[8 + 1] < 0.0);

    distance_sign_correction(&mut bitmap, &shape, &identity(), FillRule::NonZero).unwrap();
    for (i, median) in medians(&bitmap).into_iter().enumerate() {
        assert_eq!(median > 0.0, i % 8 < 4 && i / 8 < 4, "({}, {})", i % 8, i / 8);
    }
}

#[test]
fn inverse_y_axis_mirrors_rows() {
    let mut shape = prepare(shield());
    let transformation =
        SdfTransformation::from_scale(2.0, vector(0.0, 0.0), DistanceRange::symmetrical(2.0));
    let upright = sdf(&shape, &transformation, 16);

    shape.inverse_y_axis = true;
    let mirrored = sdf(&shape, &transformation, 16);

    for y in 0..16 {
        assert_eq!(&mirrored[y * 16..(y + 1) * 16], &upright[(15 - y) * 16..(16 - y) * 16]);
    }
}

#[test]
fn one_shot_queries() {
    let shape = prepare(l_shape());
    let d = one_shot_distance(&shape, TrueDistanceSelector::default(), point(2.0, 2.0));
    assert!((d - 1.0).abs() < 1e-12);

    // Outside of the bottom right corner, closer to the vertical edge's extension.
    let d = one_shot_distance(&shape, TrueDistanceSelector::default(), point(8.5, 0.0));
    assert!((d + 3.25f64.sqrt()).abs() < 1e-12);

    let d = one_shot_distance(&shape, PerpendicularDistanceSelector::default(), point(8.5, 0.0));
    assert!((d + 1.5).abs() < 1e-12);
}

#[test]
fn invalid_inputs() {
    let empty = Shape::new();
    let mut pixels = storage::<3>(4, 4);
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 4, 4).unwrap();
    assert!(matches!(
        generate_msdf(&mut bitmap, &empty, &identity(), &MsdfGeneratorConfig::DEFAULT),
        Err(MsdfError::InvalidArgument(_))
    ));

    let mut too_short = vec![0.0f32; 10];
    assert!(BitmapMut::<3>::new(&mut too_short, 4, 4).is_err());

    let mut single = storage::<1>(4, 4);
    let mut bitmap = BitmapMut::<1>::new(&mut single, 4, 4).unwrap();
    let shape = prepare(square());
    assert!(matches!(
        msdf_error_correction(&mut bitmap, &shape, &identity(), &MsdfGeneratorConfig::DEFAULT),
        Err(MsdfError::InvalidArgument(_))
    ));
}
