//! Dense f64 vector helpers.
//!
//! Matrices in this crate are stored as a slice of equally long columns.

/// ドット積
/// d(a, b) = Σ(a_i * b_i)
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must be of the same length to compute dot product.");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub fn norm_sq(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum()
}

/// Euclidean norm, scaled by the largest magnitude so huge finite entries do
/// not overflow the sum of squares
pub fn norm(a: &[f64]) -> f64 {
    let max = max_abs(a);
    if max == 0.0 || !max.is_finite() {
        return max;
    }
    let scaled: f64 = a.iter().map(|x| (x / max) * (x / max)).sum();
    max * scaled.sqrt()
}

/// Largest magnitude in `a`, NaN if any entry is NaN
#[inline]
fn max_abs(a: &[f64]) -> f64 {
    a.iter()
        .fold(0.0f64, |m, x| if m.is_nan() || x.is_nan() { f64::NAN } else { m.max(x.abs()) })
}

/// Scale `a` to unit length in place, a zero vector stays zero.
/// Divides by the largest magnitude first, so any finite input has a finite result.
pub fn normalize(a: &mut [f64]) {
    let max = max_abs(a);
    if max == 0.0 || !max.is_finite() {
        return;
    }
    a.iter_mut().for_each(|x| *x /= max);
    let length = norm(a);
    a.iter_mut().for_each(|x| *x /= length);
}

/// y += alpha * x
#[inline]
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    debug_assert_eq!(x.len(), y.len());
    y.iter_mut().zip(x).for_each(|(y, x)| *y += alpha * x);
}

#[inline]
pub fn scale(a: &mut [f64], factor: f64) {
    a.iter_mut().for_each(|x| *x *= factor);
}

/// Coefficients of `v` on each orthonormal column of `basis`
#[inline]
pub fn project(basis: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    basis.iter().map(|b| dot(b, v)).collect()
}

/// `v - basis * basisᵀ * v` for an orthonormal `basis`
pub fn residual(basis: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    let mut out = v.to_vec();
    for (b, c) in basis.iter().zip(project(basis, v)) {
        axpy(-c, b, &mut out);
    }
    out
}
