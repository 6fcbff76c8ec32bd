extern crate msdf;
extern crate msdf_tests;
#[macro_use]
extern crate criterion;

use criterion::Criterion;
use msdf::coloring::{color_edges, ColoringOptions, ColoringStrategy};
use msdf::generator::*;
use msdf::geom::{vector, DistanceRange};
use msdf::shape::Shape;
use msdf_tests::*;

use std::hint::black_box;

const SIZE: usize = 64;

fn prepared(mut shape: Shape) -> Shape {
    shape.normalize();
    color_edges(&mut shape, &ColoringOptions::DEFAULT);
    shape
}

fn transformation() -> SdfTransformation {
    SdfTransformation::from_scale(4.0, vector(0.0, 0.0), DistanceRange::symmetrical(1.0))
}

fn sdf(bench: &mut Criterion) {
    let shape = prepared(shield());
    let mut pixels = storage::<1>(SIZE, SIZE);
    bench.bench_function("sdf 64x64", |b| {
        b.iter(|| {
            let mut bitmap = BitmapMut::<1>::new(&mut pixels, SIZE, SIZE).unwrap();
            generate_sdf(&mut bitmap, &shape, &transformation(), &GeneratorConfig::DEFAULT).unwrap();
            black_box(bitmap.pixel(SIZE / 2, SIZE / 2));
        })
    });
}

fn msdf_error_correction_modes(bench: &mut Criterion) {
    let shape = prepared(overlapping_squares());
    let mut pixels = storage::<3>(SIZE, SIZE);
    let mut scratch = Vec::new();
    let modes = [
        ("msdf 64x64 no correction", ErrorCorrectionConfig::disabled()),
        ("msdf 64x64 edge priority", ErrorCorrectionConfig::DEFAULT),
        (
            "msdf 64x64 always check",
            ErrorCorrectionConfig::DEFAULT.with_distance_check_mode(DistanceCheckMode::AlwaysCheck),
        ),
    ];

    for &(name, error_correction) in &modes {
        let config = MsdfGeneratorConfig::DEFAULT.with_error_correction(error_correction);
        bench.bench_function(name, |b| {
            b.iter(|| {
                let mut bitmap = BitmapMut::<3>::new(&mut pixels, SIZE, SIZE).unwrap();
                generate_msdf_with_scratch(&mut bitmap, &shape, &transformation(), &config, &mut scratch)
                    .unwrap();
                black_box(bitmap.pixel(SIZE / 2, SIZE / 2));
            })
        });
    }
}

fn mtsdf(bench: &mut Criterion) {
    let shape = prepared(l_shape());
    let mut pixels = storage::<4>(SIZE, SIZE);
    bench.bench_function("mtsdf 64x64", |b| {
        b.iter(|| {
            let mut bitmap = BitmapMut::<4>::new(&mut pixels, SIZE, SIZE).unwrap();
            generate_mtsdf(&mut bitmap, &shape, &transformation(), &MsdfGeneratorConfig::DEFAULT)
                .unwrap();
            black_box(bitmap.pixel(SIZE / 2, SIZE / 2));
        })
    });
}

fn coloring(bench: &mut Criterion) {
    let shapes = random_polygons(7, 32);
    for &(name, strategy) in &[
        ("coloring simple", ColoringStrategy::Simple),
        ("coloring ink trap", ColoringStrategy::InkTrap),
        ("coloring by distance", ColoringStrategy::ByDistance),
    ] {
        let options = ColoringOptions::DEFAULT.with_strategy(strategy);
        bench.bench_function(name, |b| {
            b.iter(|| {
                for shape in &shapes {
                    let mut shape = shape.clone();
                    color_edges(&mut shape, &options);
                    black_box(&shape);
                }
            })
        });
    }
}

criterion_group!(generate, sdf, msdf_error_correction_modes, mtsdf);
criterion_group!(colors, coloring);
criterion_main!(generate, colors);
