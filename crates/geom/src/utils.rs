//! Numeric helpers: interpolation, medians, signs and polynomial roots.

use crate::math::{vector, Vector};
use arrayvec::ArrayVec;
use num_traits::Float;

use core::f64::consts::PI;

#[inline]
pub fn min_max<S: Float>(a: S, b: S) -> (S, S) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Returns the median of three values.
#[inline]
pub fn median<S: Float>(a: S, b: S, c: S) -> S {
    a.min(b).max(a.max(b).min(c))
}

/// Linear interpolation between `a` and `b`, exact at both ends.
#[inline]
pub fn mix<S: Float>(a: S, b: S, t: S) -> S {
    (S::one() - t) * a + t * b
}

/// Returns `1.0` for strictly positive values and `-1.0` otherwise.
#[inline]
pub fn non_zero_sign(n: f64) -> f64 {
    if n > 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Returns `1`, `0` or `-1`.
#[inline]
pub fn sign(n: f64) -> i32 {
    (n > 0.0) as i32 - (n < 0.0) as i32
}

/// Returns the unit vector pointing in the direction of `v`.
///
/// A zero vector has no direction; `(0, 1)` is returned in that case so that the
/// result can always be used in dot and cross products.
#[inline]
pub fn normalize(v: Vector) -> Vector {
    let len = v.length();
    if len == 0.0 {
        return vector(0.0, 1.0);
    }

    v / len
}

/// Same as `normalize` but a zero vector stays zero.
#[inline]
pub fn normalize_or_zero(v: Vector) -> Vector {
    let len = v.length();
    if len == 0.0 {
        return Vector::zero();
    }

    v / len
}

/// Real roots of `a·x² + b·x + c = 0`, in no particular order.
///
/// Degrades to the linear equation when `a` is zero or negligible compared to `b`.
/// The degenerate identity `0 = 0` has no isolated root and yields an empty set.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> ArrayVec<f64, 2> {
    let mut roots = ArrayVec::new();

    if a == 0.0 || b.abs() > 1e12 * a.abs() {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let sqrt_discriminant = discriminant.sqrt();
        roots.push((-b + sqrt_discriminant) / (2.0 * a));
        roots.push((-b - sqrt_discriminant) / (2.0 * a));
    } else if discriminant == 0.0 {
        roots.push(-b / (2.0 * a));
    }

    roots
}

// Roots of x³ + a·x² + b·x + c.
fn solve_cubic_normed(a: f64, b: f64, c: f64) -> ArrayVec<f64, 3> {
    let mut roots = ArrayVec::new();

    let a2 = a * a;
    let q = (a2 - 3.0 * b) / 9.0;
    let r = (a * (2.0 * a2 - 9.0 * b) + 27.0 * c) / 54.0;
    let r2 = r * r;
    let q3 = q * q * q;
    let a_3 = a / 3.0;

    if r2 < q3 {
        let theta = (r / q3.sqrt()).max(-1.0).min(1.0).acos();
        let m = -2.0 * q.sqrt();
        roots.push(m * (theta / 3.0).cos() - a_3);
        roots.push(m * ((theta + 2.0 * PI) / 3.0).cos() - a_3);
        roots.push(m * ((theta - 2.0 * PI) / 3.0).cos() - a_3);
    } else {
        let sign = if r < 0.0 { 1.0 } else { -1.0 };
        let u = sign * (r.abs() + (r2 - q3).sqrt()).powf(1.0 / 3.0);
        let v = if u == 0.0 { 0.0 } else { q / u };
        roots.push((u + v) - a_3);
        if u == v || (u - v).abs() < 1e-12 * (u + v).abs() {
            roots.push(-0.5 * (u + v) - a_3);
        }
    }

    roots
}

/// Real roots of `a·x³ + b·x² + c·x + d = 0`, in no particular order.
///
/// When `b / a` is large the cubic term only adds numerical noise, so the
/// equation is solved as a quadratic instead.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> ArrayVec<f64, 3> {
    if a != 0.0 {
        let bn = b / a;
        if bn.abs() < 1e6 {
            return solve_cubic_normed(bn, c / a, d / a);
        }
    }

    solve_quadratic(b, c, d).into_iter().collect()
}

#[cfg(test)]
fn assert_roots(mut roots: ArrayVec<f64, 3>, expected: &[f64], epsilon: f64) {
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(roots.len(), expected.len(), "{:?} != {:?}", roots, expected);
    for (root, expected) in roots.iter().zip(expected) {
        assert!((root - expected).abs() <= epsilon, "{:?} != {:?}", roots, expected);
    }
}

#[test]
fn quadratic_polynomial() {
    let roots = solve_quadratic(1.0, -3.0, 2.0).into_iter().collect();
    assert_roots(roots, &[1.0, 2.0], 1e-12);

    // Linear fallback.
    let roots = solve_quadratic(0.0, 2.0, -1.0).into_iter().collect();
    assert_roots(roots, &[0.5], 1e-12);

    // Double root.
    let roots = solve_quadratic(1.0, -2.0, 1.0).into_iter().collect();
    assert_roots(roots, &[1.0], 1e-12);

    assert!(solve_quadratic(1.0, 0.0, 1.0).is_empty());
    assert!(solve_quadratic(0.0, 0.0, 0.0).is_empty());
    assert!(solve_quadratic(0.0, 0.0, 1.0).is_empty());
}

#[test]
fn cubic_polynomial() {
    assert_roots(solve_cubic(1.0, -6.0, 11.0, -6.0), &[1.0, 2.0, 3.0], 1e-9);
    assert_roots(solve_cubic(1.0, -2.0, -1.0, 2.0), &[-1.0, 1.0, 2.0], 1e-9);
    assert_roots(solve_cubic(-1.0, 1.0, -1.0, 1.0), &[1.0], 1e-9);
    assert_roots(solve_cubic(-2.0, 2.0, -1.0, 10.0), &[2.0], 1e-9);
    // Degenerate cubic term.
    assert_roots(solve_cubic(0.0, 1.0, -3.0, 2.0), &[1.0, 2.0], 1e-12);
}

#[test]
fn medians() {
    assert_eq!(median(1.0, 2.0, 3.0), 2.0);
    assert_eq!(median(3.0, 1.0, 2.0), 2.0);
    assert_eq!(median(2.0f32, 3.0, 1.0), 2.0);
    assert_eq!(median(-1.0, -1.0, 5.0), -1.0);
    assert_eq!(mix(2.0, 6.0, 1.0), 6.0);
    assert_eq!(mix(2.0, 6.0, 0.25), 3.0);
}
