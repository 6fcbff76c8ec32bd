use crate::bitmap::BitmapMut;
use crate::generate::{check_shape, sample_row};
use crate::shape::geom::utils::median;
use crate::shape::geom::MsdfResult;
use crate::shape::{FillRule, Scanline, Shape};
use crate::transformation::SdfTransformation;

use rayon::prelude::*;

const MISMATCH: i8 = -1;
const AMBIGUOUS: i8 = 0;
const MATCH: i8 = 1;

#[inline]
fn pixel_distance(pixel: &[f32]) -> f32 {
    if pixel.len() >= 3 {
        median(pixel[0], pixel[1], pixel[2])
    } else {
        pixel[0]
    }
}

/// Reflects the distance channels of `pixel` around `zero`.
#[inline]
fn flip(pixel: &mut [f32], zero: f32) {
    let channels = pixel.len().min(3);
    for value in &mut pixel[..channels] {
        *value = zero + zero - *value;
    }
}

/// Makes the sign of every pixel of `sdf` agree with `fill_rule` applied to the
/// shape at the pixel center.
///
/// Values above the mapped zero distance are inside. Pixels that disagree are
/// reflected around the zero level. Pixels that sit exactly at the zero level are
/// flipped when most of their neighbours had to be. The fourth channel of a
/// four-channel bitmap is checked on its own.
pub fn distance_sign_correction<const N: usize>(
    sdf: &mut BitmapMut<N>,
    shape: &Shape,
    transformation: &SdfTransformation,
    fill_rule: FillRule,
) -> MsdfResult<()> {
    check_shape(shape)?;

    let width = sdf.width();
    let height = sdf.height();
    let zero = transformation.map(0.0) as f32;
    let projection = transformation.projection;
    let mut matches = vec![AMBIGUOUS; width * height];

    sdf.pixels_mut()
        .par_chunks_mut(width * N)
        .zip(matches.par_chunks_mut(width))
        .enumerate()
        .for_each_init(Scanline::new, |scanline, (row, (pixels, row_matches))| {
            let y = sample_row(shape, row, height) as f64 + 0.5;
            shape.scanline(scanline, projection.unproject_y(y));
            for (x, (pixel, matched)) in pixels.chunks_exact_mut(N).zip(row_matches).enumerate() {
                let fill = scanline.filled(projection.unproject_x(x as f64 + 0.5), fill_rule);
                let sd = pixel_distance(pixel);
                if sd != zero {
                    if (sd > zero) != fill {
                        flip(pixel, zero);
                        *matched = MISMATCH;
                    } else {
                        *matched = MATCH;
                    }
                }
                if N >= 4 && (pixel[3] > zero) != fill {
                    pixel[3] = zero + zero - pixel[3];
                }
            }
        });

    if !matches.contains(&AMBIGUOUS) {
        return Ok(());
    }

    // Rows are mirrored when the y axis is inverted, which preserves neighbourhoods.
    let mut flipped = 0;
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            if matches[i] != AMBIGUOUS {
                continue;
            }
            let mut neighbours = 0;
            if x > 0 {
                neighbours += matches[i - 1] as i32;
            }
            if x + 1 < width {
                neighbours += matches[i + 1] as i32;
            }
            if y > 0 {
                neighbours += matches[i - width] as i32;
            }
            if y + 1 < height {
                neighbours += matches[i + width] as i32;
            }
            if neighbours < 0 {
                flip(sdf.pixel_mut(x, y), zero);
                flipped += 1;
            }
        }
    }
    log::trace!("sign correction: {} ambiguous pixels flipped", flipped);

    Ok(())
}

#[cfg(test)]
use crate::config::GeneratorConfig;
#[cfg(test)]
use crate::generate::generate_sdf;
#[cfg(test)]
use crate::shape::geom::{point, DistanceRange, EdgeColor, EdgeSegment};
#[cfg(test)]
use crate::transformation::{DistanceMapping, Projection};

#[cfg(test)]
fn polygon(points: &[(f64, f64)]) -> Shape {
    let mut shape = Shape::new();
    let contour = shape.add_empty_contour();
    for i in 0..points.len() {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % points.len()];
        contour.add_edge(EdgeSegment::linear(point(x0, y0), point(x1, y1), EdgeColor::White));
    }
    shape
}

#[test]
fn fix_inverted_square() {
    // Counter-clockwise: negative inside.
    let shape = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let transformation = SdfTransformation::default();
    let mut pixels = vec![0.0f32; 64];
    let mut bitmap = BitmapMut::<1>::new(&mut pixels, 8, 8).unwrap();

    let config = GeneratorConfig::DEFAULT.with_overlap_support(false);
    generate_sdf(&mut bitmap, &shape, &transformation, &config).unwrap();
    assert_eq!(bitmap.pixel(1, 1), [-1.5]);

    distance_sign_correction(&mut bitmap, &shape, &transformation, FillRule::NonZero).unwrap();
    assert_eq!(bitmap.pixel(1, 1), [1.5]);
    assert_eq!(bitmap.pixel(5, 1), [-1.5]);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(bitmap.pixel(x, y)[0] > 0.0, x < 4 && y < 4);
        }
    }
}

#[test]
fn flip_ambiguous_pixels() {
    // Clockwise, every pixel center is inside.
    let shape = polygon(&[(0.0, 0.0), (0.0, 1.0), (3.0, 1.0), (3.0, 0.0)]);
    let transformation = SdfTransformation::new(
        Projection::identity(),
        DistanceMapping::from_range(DistanceRange::symmetrical(2.0)),
    );
    let mut pixels = vec![0.25f32, 0.25, 0.25, 0.2, 0.5, 0.9, 0.25, 0.25, 0.25];
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 3, 1).unwrap();

    distance_sign_correction(&mut bitmap, &shape, &transformation, FillRule::NonZero).unwrap();
    assert_eq!(bitmap.pixel(0, 0), [0.75; 3]);
    assert_eq!(bitmap.pixel(2, 0), [0.75; 3]);
    // Both neighbours were flipped, so is the pixel on the zero level.
    let middle = bitmap.pixel(1, 0);
    assert!((middle[0] - 0.8).abs() < 1e-6);
    assert_eq!(middle[1], 0.5);
    assert!((middle[2] - 0.1).abs() < 1e-6);
}

#[test]
fn fix_true_distance_channel() {
    let shape = polygon(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
    let transformation = SdfTransformation::default();
    let mut pixels = vec![0.5f32, 0.5, 0.5, -0.5];
    let mut bitmap = BitmapMut::<4>::new(&mut pixels, 1, 1).unwrap();

    distance_sign_correction(&mut bitmap, &shape, &transformation, FillRule::NonZero).unwrap();
    assert_eq!(bitmap.pixel(0, 0), [0.5, 0.5, 0.5, 0.5]);
}
