//! L2-regularized logistic regression fitted by Newton's method (IRLS).
//!
//! Objective (intercept unpenalized, `λ = 1/C`):
//!
//! ```text
//! L(θ) = Σ_i [ ln(1 + e^{z_i}) - y_i z_i ] + (λ/2) Σ_j w_j²,   z_i = x_i·w + b
//! ```
//!
//! Each iteration solves `H Δ = ∇L` with `H = Xᵀ diag(μ(1-μ)) X + λI` and takes a
//! backtracking (Armijo) step along `-Δ`. Features are not rescaled, so the
//! Hessian can be poorly conditioned; `math::solve_spd` handles that.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LeadError, Result};
use crate::math::{log1p_exp, sigmoid, solve_spd};

/// Armijo sufficient-decrease constant.
const ARMIJO_C: f64 = 1e-4;

/// Maximum step halvings per iteration before giving up on the line search.
const MAX_HALVINGS: usize = 40;

/// Hyperparameters for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Inverse regularization strength.
    pub c: f64,
    /// Newton iteration budget.
    pub max_iter: usize,
    /// Stop once the predicted loss decrease (half the Newton decrement) falls below this.
    pub tol: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 200,
            tol: 1e-8,
        }
    }
}

/// Fitted classifier parameters and fit diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl LogisticModel {
    /// Linear predictor `x·w + b`.
    pub fn decision(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    /// Probability of the positive class.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.decision(row))
    }
}

/// Fit a logistic regression on a dense design matrix.
///
/// Non-convergence within `config.max_iter` is logged and recorded on the model,
/// not returned as an error.
pub fn fit_logistic(x: &DMatrix<f64>, y: &[bool], config: &LogisticConfig) -> Result<LogisticModel> {
    let n = x.nrows();
    let p = x.ncols();
    if n == 0 {
        return Err(LeadError::training("No rows to fit."));
    }
    if y.len() != n {
        return Err(LeadError::training(format!(
            "Label count {} does not match row count {n}.",
            y.len()
        )));
    }
    if !(config.c.is_finite() && config.c > 0.0) {
        return Err(LeadError::config("Regularization strength C must be finite and > 0."));
    }

    // Augment with an intercept column (last).
    let xa = x.clone().insert_column(p, 1.0);
    let yv = DVector::from_iterator(n, y.iter().map(|&v| if v { 1.0 } else { 0.0 }));
    let lambda = 1.0 / config.c;

    let mut theta = DVector::zeros(p + 1);
    let mut loss = objective(&xa, &yv, &theta, lambda);
    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iter {
        iterations += 1;

        let z = &xa * &theta;
        let mu = z.map(sigmoid);
        let weights = mu.map(|m| m * (1.0 - m));

        let mut grad = xa.transpose() * (&mu - &yv);
        let mut hess = weighted_gram(&xa, &weights);
        for j in 0..p {
            grad[j] += lambda * theta[j];
            hess[(j, j)] += lambda;
        }

        // Very large feature values can overflow x² in the Hessian.
        if !(grad.iter().all(|v| v.is_finite()) && hess.iter().all(|v| v.is_finite())) {
            warn!(iteration = iterations, "non-finite gradient or Hessian; stopping early");
            break;
        }

        let Some(delta) = solve_spd(&hess, &grad) else {
            warn!(iteration = iterations, "Newton system could not be solved; stopping early");
            break;
        };

        let decrement = grad.dot(&delta);
        if !decrement.is_finite() {
            warn!(iteration = iterations, "non-finite Newton decrement; stopping early");
            break;
        }
        if 0.5 * decrement <= config.tol {
            converged = true;
            break;
        }

        // Backtracking line search along -delta.
        let mut step = 1.0;
        let mut accepted = None;
        for _ in 0..MAX_HALVINGS {
            let candidate = &theta - &delta * step;
            let candidate_loss = objective(&xa, &yv, &candidate, lambda);
            if candidate_loss.is_finite() && candidate_loss <= loss - ARMIJO_C * step * decrement {
                accepted = Some((candidate, candidate_loss));
                break;
            }
            step *= 0.5;
        }

        let Some((next, next_loss)) = accepted else {
            // No descent possible at machine precision: we are at the optimum
            // for all practical purposes.
            converged = 0.5 * decrement <= config.tol.max(1e-6 * loss.abs().max(1.0));
            break;
        };

        debug!(iteration = iterations, loss = next_loss, step, "newton step");
        theta = next;
        loss = next_loss;
    }

    if !converged {
        warn!(
            max_iter = config.max_iter,
            iterations, "logistic regression did not converge; consider raising the iteration budget"
        );
    }

    Ok(LogisticModel {
        coefficients: theta.rows(0, p).iter().copied().collect(),
        intercept: theta[p],
        iterations,
        converged,
    })
}

fn objective(xa: &DMatrix<f64>, y: &DVector<f64>, theta: &DVector<f64>, lambda: f64) -> f64 {
    let z = xa * theta;
    let data: f64 = z.iter().zip(y.iter()).map(|(&zi, &yi)| log1p_exp(zi) - yi * zi).sum();
    let p = theta.len() - 1;
    let penalty: f64 = theta.rows(0, p).iter().map(|w| w * w).sum();
    data + 0.5 * lambda * penalty
}

/// `Xᵀ diag(w) X`.
fn weighted_gram(x: &DMatrix<f64>, w: &DVector<f64>) -> DMatrix<f64> {
    let mut xw = x.clone();
    for (i, mut row) in xw.row_iter_mut().enumerate() {
        row *= w[i];
    }
    x.transpose() * xw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_overlapping_one_dimensional_data() {
        // Positives mostly at larger x, with overlap so the optimum is interior.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let ys = [false, false, true, false, true, false, true, true];
        let x = DMatrix::from_column_slice(xs.len(), 1, &xs);

        let model = fit_logistic(&x, &ys, &LogisticConfig::default()).unwrap();
        assert!(model.converged);
        assert!(model.coefficients[0] > 0.0);
        assert!(model.predict_proba(&[7.0]) > model.predict_proba(&[0.0]));
    }

    #[test]
    fn separable_data_stays_finite_with_regularization() {
        let xs = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let ys = [false, false, false, true, true, true];
        let x = DMatrix::from_column_slice(xs.len(), 1, &xs);

        let model = fit_logistic(&x, &ys, &LogisticConfig::default()).unwrap();
        assert!(model.coefficients[0].is_finite());
        assert!(model.intercept.is_finite());
        assert!(model.predict_proba(&[12.0]) > 0.9);
        assert!(model.predict_proba(&[0.0]) < 0.1);
    }

    #[test]
    fn tiny_budget_reports_non_convergence() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [false, true, false, true, true, true];
        let x = DMatrix::from_column_slice(xs.len(), 1, &xs);

        let config = LogisticConfig {
            max_iter: 1,
            ..LogisticConfig::default()
        };
        let model = fit_logistic(&x, &ys, &config).unwrap();
        assert!(!model.converged);
        assert_eq!(model.iterations, 1);
    }

    #[test]
    fn overflowing_feature_stops_without_converging() {
        let xs = [1.0, 2.0, 1e200, 3.0, 4.0, 5.0];
        let ys = [false, true, false, true, false, true];
        let x = DMatrix::from_column_slice(xs.len(), 1, &xs);

        let model = fit_logistic(&x, &ys, &LogisticConfig::default()).unwrap();
        assert!(!model.converged);
        assert!(model.coefficients[0].is_finite());
        assert!(model.intercept.is_finite());
    }

    #[test]
    fn rejects_mismatched_labels() {
        let x = DMatrix::from_column_slice(2, 1, &[0.0, 1.0]);
        assert!(fit_logistic(&x, &[true], &LogisticConfig::default()).is_err());
    }

    #[test]
    fn probabilities_are_in_unit_interval() {
        let model = LogisticModel {
            coefficients: vec![1e6],
            intercept: 0.0,
            iterations: 0,
            converged: true,
        };
        assert!((0.0..=1.0).contains(&model.predict_proba(&[1e6])));
        assert!((0.0..=1.0).contains(&model.predict_proba(&[-1e6])));
    }
}
