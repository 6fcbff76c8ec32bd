//! Views over caller-owned pixel buffers.
//!
//! Pixels are stored row-major, `N` consecutive `f32` channels per pixel, starting
//! with the bottom row when the shape's y axis points up (see
//! [`Shape::inverse_y_axis`](crate::shape::Shape::inverse_y_axis)).

use crate::shape::geom::utils::mix;
use crate::shape::geom::{MsdfError, MsdfResult, Point};

use core::slice::ChunksExactMut;

fn check_dimensions<const N: usize>(len: usize, width: usize, height: usize) -> MsdfResult<()> {
    if N != 1 && N != 3 && N != 4 {
        return Err(MsdfError::InvalidArgument("unsupported channel count"));
    }
    if width == 0 || height == 0 {
        return Err(MsdfError::InvalidArgument("empty bitmap"));
    }
    match width.checked_mul(height).and_then(|n| n.checked_mul(N)) {
        Some(required) if required <= len => Ok(()),
        _ => Err(MsdfError::InvalidArgument("pixel buffer too small")),
    }
}

/// A mutable view over an `N`-channel bitmap.
#[derive(Debug)]
pub struct BitmapMut<'l, const N: usize> {
    pixels: &'l mut [f32],
    width: usize,
    height: usize,
}

impl<'l, const N: usize> BitmapMut<'l, N> {
    /// Returns `InvalidArgument` if `N` is not 1, 3 or 4, if a dimension is zero or
    /// if `pixels` holds less than `width * height * N` values. Extra values are
    /// ignored.
    pub fn new(pixels: &'l mut [f32], width: usize, height: usize) -> MsdfResult<Self> {
        check_dimensions::<N>(pixels.len(), width, height)?;
        Ok(BitmapMut {
            pixels: &mut pixels[..width * height * N],
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; N] {
        self.as_ref().pixel(x, y)
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        debug_assert!(x < self.width && y < self.height);
        let offset = (y * self.width + x) * N;
        &mut self.pixels[offset..offset + N]
    }

    /// Iterates over the rows, from `y = 0` up.
    #[inline]
    pub fn rows_mut(&mut self) -> ChunksExactMut<'_, f32> {
        self.pixels.chunks_exact_mut(self.width * N)
    }

    #[inline]
    pub fn pixels(&self) -> &[f32] {
        &*self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut *self.pixels
    }

    #[inline]
    pub fn as_ref(&self) -> BitmapRef<'_, N> {
        BitmapRef {
            pixels: &*self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

/// A read-only view over an `N`-channel bitmap.
#[derive(Copy, Clone, Debug)]
pub struct BitmapRef<'l, const N: usize> {
    pixels: &'l [f32],
    width: usize,
    height: usize,
}

impl<'l, const N: usize> BitmapRef<'l, N> {
    /// See [`BitmapMut::new`].
    pub fn new(pixels: &'l [f32], width: usize, height: usize) -> MsdfResult<Self> {
        check_dimensions::<N>(pixels.len(), width, height)?;
        Ok(BitmapRef {
            pixels: &pixels[..width * height * N],
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &'l [f32] {
        self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; N] {
        debug_assert!(x < self.width && y < self.height);
        let offset = (y * self.width + x) * N;
        let mut pixel = [0.0; N];
        pixel.copy_from_slice(&self.pixels[offset..offset + N]);
        pixel
    }

    /// Bilinear interpolation at `pos`, in pixel units. Pixel centers are at
    /// half-integer coordinates and positions outside of the bitmap take the value of
    /// the nearest border.
    pub fn interpolate(&self, pos: Point) -> [f32; N] {
        let x = pos.x - 0.5;
        let y = pos.y - 0.5;
        let left = x.floor();
        let bottom = y.floor();
        let lr = (x - left) as f32;
        let bt = (y - bottom) as f32;

        let clamp = |n: f64, max: usize| -> usize {
            if n <= 0.0 {
                0
            } else {
                (n as usize).min(max)
            }
        };
        let l = clamp(left, self.width - 1);
        let r = clamp(left + 1.0, self.width - 1);
        let b = clamp(bottom, self.height - 1);
        let t = clamp(bottom + 1.0, self.height - 1);

        let (lb, rb, lt, rt) = (
            self.pixel(l, b),
            self.pixel(r, b),
            self.pixel(l, t),
            self.pixel(r, t),
        );
        let mut output = [0.0; N];
        for i in 0..N {
            output[i] = mix(mix(lb[i], rb[i], lr), mix(lt[i], rt[i], lr), bt);
        }

        output
    }
}

#[test]
fn bitmap_dimensions() {
    let mut pixels = vec![0.0f32; 12];
    assert!(BitmapMut::<3>::new(&mut pixels, 2, 2).is_ok());
    assert!(BitmapMut::<4>::new(&mut pixels, 2, 2).is_err());
    assert!(BitmapMut::<2>::new(&mut pixels, 2, 3).is_err());
    assert!(BitmapMut::<1>::new(&mut pixels, 0, 3).is_err());
    assert!(BitmapMut::<1>::new(&mut pixels, usize::MAX, 3).is_err());
    assert_eq!(
        BitmapRef::<4>::new(&pixels, 2, 2).err(),
        Some(MsdfError::InvalidArgument("pixel buffer too small"))
    );

    // Extra values are left out of the view.
    let bitmap = BitmapMut::<1>::new(&mut pixels, 3, 3).unwrap();
    assert_eq!(bitmap.pixels().len(), 9);
}

#[test]
fn bitmap_access() {
    let mut pixels = vec![0.0f32; 18];
    let mut bitmap = BitmapMut::<3>::new(&mut pixels, 3, 2).unwrap();
    bitmap.pixel_mut(2, 1).copy_from_slice(&[1.0, 2.0, 3.0]);
    assert_eq!(bitmap.pixel(2, 1), [1.0, 2.0, 3.0]);
    assert_eq!(bitmap.rows_mut().count(), 2);
    for (y, row) in bitmap.rows_mut().enumerate() {
        row[0] = y as f32;
    }
    assert_eq!(bitmap.pixel(0, 1), [1.0, 0.0, 0.0]);
    assert_eq!(pixels[9..12], [1.0, 0.0, 0.0]);
}

#[test]
fn bitmap_interpolation() {
    use crate::shape::geom::point;

    let pixels = [0.0f32, 1.0, 2.0, 3.0];
    let bitmap = BitmapRef::<1>::new(&pixels, 2, 2).unwrap();
    assert_eq!(bitmap.interpolate(point(0.5, 0.5)), [0.0]);
    assert_eq!(bitmap.interpolate(point(1.5, 1.5)), [3.0]);
    assert_eq!(bitmap.interpolate(point(1.0, 0.5)), [0.5]);
    assert_eq!(bitmap.interpolate(point(1.0, 1.0)), [1.5]);
    // Clamped outside.
    assert_eq!(bitmap.interpolate(point(-3.0, 0.5)), [0.0]);
    assert_eq!(bitmap.interpolate(point(5.0, 5.0)), [3.0]);
}
