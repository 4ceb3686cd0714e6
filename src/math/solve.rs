//! Linear solves for the Newton step.
//!
//! Each Newton iteration of the logistic fit solves `H Δ = g` where `H` is the
//! (regularized) Hessian. `H` is symmetric positive definite in exact arithmetic,
//! so Cholesky is tried first. Raw, unscaled features (employee counts next to
//! one-hot indicators) can make `H` badly conditioned; in that case we fall back
//! to SVD with progressively looser tolerances.

use nalgebra::{DMatrix, DVector};

/// Iteration cap for the SVD fallback.
const SVD_MAX_ITER: usize = 1000;

/// Solve a symmetric positive (semi-)definite system.
///
/// Returns `None` if no finite solution can be found.
pub fn solve_spd(h: &DMatrix<f64>, g: &DVector<f64>) -> Option<DVector<f64>> {
    if let Some(chol) = h.clone().cholesky() {
        let x = chol.solve(g);
        if x.iter().all(|v| v.is_finite()) {
            return Some(x);
        }
    }

    if !h.iter().chain(g.iter()).all(|v| v.is_finite()) {
        return None;
    }
    let svd = h.clone().try_svd(true, true, f64::EPSILON, SVD_MAX_ITER)?;
    for &tol in &[1e-12, 1e-10, 1e-8, 1e-6] {
        if let Ok(x) = svd.solve(g, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_spd_system() {
        // [[4, 1], [1, 3]] x = [1, 2] -> x = [1/11, 7/11]
        let h = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
        let g = DVector::from_row_slice(&[1.0, 2.0]);
        let x = solve_spd(&h, &g).unwrap();
        assert!((x[0] - 1.0 / 11.0).abs() < 1e-12);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn singular_system_falls_back_to_svd() {
        // Rank-1 matrix: Cholesky fails, SVD gives the minimum-norm solution.
        let h = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let g = DVector::from_row_slice(&[2.0, 2.0]);
        let x = solve_spd(&h, &g).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-9);
        assert!((x[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_system_returns_none() {
        let h = DMatrix::from_row_slice(2, 2, &[f64::INFINITY, 1.0, 1.0, 3.0]);
        let g = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(solve_spd(&h, &g).is_none());
    }
}
