//! Thin singular value decomposition by one-sided (Hestenes) Jacobi rotations.
//!
//! The input is a matrix stored as columns. Pairs of columns are rotated until
//! every pair is orthogonal; the column norms are then the singular values, the
//! normalized columns the left singular vectors, and the accumulated rotations
//! the right singular vectors. Accurate for the tall, narrow matrices a
//! term-by-example matrix produces.

use super::dense::{dot, norm, norm_sq, scale};

/// Upper bound on full sweeps over all column pairs
const MAX_SWEEPS: usize = 60;

/// Relative off-orthogonality below which a column pair is left alone
const ORTHOGONALITY_TOL: f64 = 1e-14;

#[derive(Debug, Clone)]
pub struct Svd {
    /// descending, length `min(rows, cols)`
    pub singular_values: Vec<f64>,
    /// left singular vectors for the numerically non-zero singular values
    pub u: Vec<Vec<f64>>,
    /// right singular vectors, paired with `u`
    pub v: Vec<Vec<f64>>,
}

impl Svd {
    /// Numerical rank
    pub fn rank(&self) -> usize {
        self.u.len()
    }
}

/// Decompose the `rows x columns.len()` matrix given by `columns`.
///
/// Returns `None` for non-finite input, ragged columns, or when the rotations
/// do not converge. Singular values of matrices close to `f64::MAX` may come
/// back infinite.
pub fn thin_svd(columns: &[Vec<f64>], rows: usize) -> Option<Svd> {
    let n = columns.len();
    if columns.iter().any(|c| c.len() != rows || c.iter().any(|x| !x.is_finite())) {
        return None;
    }

    // rotate in [-1, 1] so the squared norms stay finite, rescale at the end
    let magnitude = columns.iter().flatten().fold(0.0f64, |m, x| m.max(x.abs()));
    let mut work: Vec<Vec<f64>> = columns.to_vec();
    if magnitude > 0.0 {
        work.iter_mut().flatten().for_each(|x| *x /= magnitude);
    }
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|j| {
            let mut e = vec![0.0; n];
            e[j] = 1.0;
            e
        })
        .collect();

    let mut converged = n < 2;
    for _ in 0..MAX_SWEEPS {
        if converged {
            break;
        }
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                let alpha = norm_sq(&work[p]);
                let beta = norm_sq(&work[q]);
                let gamma = dot(&work[p], &work[q]);
                if gamma == 0.0 || gamma.abs() <= ORTHOGONALITY_TOL * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;
                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;
                rotate(&mut work, p, q, c, s);
                rotate(&mut v, p, q, c, s);
            }
        }
        converged = !rotated;
    }
    if !converged {
        return None;
    }

    let sigmas: Vec<f64> = work.iter().map(|c| norm(c)).collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| sigmas[b].total_cmp(&sigmas[a]));

    let sigma_max = order.first().map_or(0.0, |&j| sigmas[j]);
    let cutoff = sigma_max * f64::EPSILON * rows.max(n) as f64;

    let mut singular_values = Vec::with_capacity(n.min(rows));
    let mut u = Vec::new();
    let mut right = Vec::new();
    for &j in order.iter().take(n.min(rows)) {
        let sigma = sigmas[j];
        singular_values.push(sigma * magnitude);
        if sigma > cutoff {
            let mut col = std::mem::take(&mut work[j]);
            scale(&mut col, 1.0 / sigma);
            u.push(col);
            right.push(std::mem::take(&mut v[j]));
        }
    }

    Some(Svd {
        singular_values,
        u,
        v: right,
    })
}

/// Apply the plane rotation (c, s) to columns `p < q`
#[inline]
fn rotate(cols: &mut [Vec<f64>], p: usize, q: usize, c: f64, s: f64) {
    let (head, tail) = cols.split_at_mut(q);
    let (cp, cq) = (&mut head[p], &mut tail[0]);
    for (xp, xq) in cp.iter_mut().zip(cq.iter_mut()) {
        let a = *xp;
        let b = *xq;
        *xp = c * a - s * b;
        *xq = s * a + c * b;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(svd: &Svd, rows: usize, cols: usize) -> Vec<Vec<f64>> {
        let mut out = vec![vec![0.0; rows]; cols];
        for (k, (u, v)) in svd.u.iter().zip(&svd.v).enumerate() {
            let sigma = svd.singular_values[k];
            for j in 0..cols {
                for i in 0..rows {
                    out[j][i] += sigma * u[i] * v[j];
                }
            }
        }
        out
    }

    #[test]
    fn diagonal_matrix_is_sorted() {
        let cols = vec![vec![1.0, 0.0, 0.0], vec![0.0, 3.0, 0.0]];
        let svd = thin_svd(&cols, 3).unwrap();
        assert_eq!(svd.rank(), 2);
        assert!((svd.singular_values[0] - 3.0).abs() < 1e-12);
        assert!((svd.singular_values[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reconstructs_dense_matrix() {
        let cols = vec![
            vec![2.0, 1.0, 0.0, 4.0],
            vec![1.0, 3.0, 1.0, 0.0],
            vec![0.5, 0.0, 2.0, 1.0],
        ];
        let svd = thin_svd(&cols, 4).unwrap();
        assert_eq!(svd.rank(), 3);
        assert!(svd.singular_values.windows(2).all(|w| w[0] >= w[1]));
        let back = reconstruct(&svd, 4, 3);
        for (a, b) in cols.iter().flatten().zip(back.iter().flatten()) {
            assert!((a - b).abs() < 1e-10);
        }
        // left vectors are orthonormal
        for (i, a) in svd.u.iter().enumerate() {
            for (j, b) in svd.u.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot(a, b) - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn rank_deficient_columns_drop_from_basis() {
        let cols = vec![vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]];
        let svd = thin_svd(&cols, 3).unwrap();
        assert_eq!(svd.singular_values.len(), 2);
        assert_eq!(svd.rank(), 1);
        assert!(svd.singular_values[1].abs() < 1e-10);
    }

    #[test]
    fn rejects_non_finite_and_ragged_input() {
        assert!(thin_svd(&[vec![1.0, f64::NAN]], 2).is_none());
        assert!(thin_svd(&[vec![1.0, 2.0], vec![1.0]], 2).is_none());
    }

    #[test]
    fn huge_entries_are_still_orthogonalized() {
        let cols = vec![vec![1e200, 2e200, 3e200], vec![3e200, 1e200, 2e200]];
        let svd = thin_svd(&cols, 3).unwrap();
        let small = thin_svd(&[vec![1.0, 2.0, 3.0], vec![3.0, 1.0, 2.0]], 3).unwrap();
        assert_eq!(svd.rank(), 2);
        for (big, unit) in svd.singular_values.iter().zip(&small.singular_values) {
            assert!((big / 1e200 - unit).abs() < 1e-12);
        }
        assert!(dot(&svd.u[0], &svd.u[1]).abs() < 1e-12);
    }
}
