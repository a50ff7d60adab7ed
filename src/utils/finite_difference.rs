//! Finite difference methods for numerical differentiation.
//!
//! This module provides the forward-difference Jacobian used when a problem
//! has no analytic derivatives, or when the optimizer is explicitly asked to
//! differentiate numerically.

use crate::error::{FitError, Result};
use crate::problem::Problem;
use ndarray::{Array1, Array2};

/// Default relative step size for finite differences (≈ sqrt of machine epsilon).
const DEFAULT_EPSILON: f64 = 1.4901161193847656e-8;

/// Compute the Jacobian matrix using forward finite differences.
///
/// The Jacobian is the matrix of partial derivatives of the residuals with
/// respect to the parameters: J[i,j] = ∂residual[i]/∂param[j].
///
/// The step for each parameter scales with its magnitude, so the
/// approximation behaves the same whichever pressure unit the affinity
/// constants are expressed in. A parameter sitting on its upper bound is
/// differenced backwards to stay inside the box.
///
/// # Arguments
///
/// * `problem` - The problem to evaluate
/// * `params` - The parameter values at which to evaluate the Jacobian
/// * `epsilon` - The relative step size for finite differences (optional)
///
/// # Returns
///
/// * `Result<Array2<f64>>` - The Jacobian matrix
pub fn jacobian<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    epsilon: Option<f64>,
) -> Result<Array2<f64>> {
    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    let n_params = params.len();
    let n_residuals = problem.residual_count();
    let bounds = problem.bounds();

    let residuals = problem.eval(params)?;

    if residuals.len() != n_residuals {
        return Err(FitError::InvalidInput(format!(
            "Expected {} residuals, got {}",
            n_residuals,
            residuals.len()
        )));
    }

    let mut jac = Array2::zeros((n_residuals, n_params));

    for j in 0..n_params {
        let mut params_perturbed = params.clone();

        // Adapt epsilon to parameter scale
        let param_j = params[j];
        let mut eps_j = if param_j.abs() > eps {
            param_j.abs() * eps
        } else {
            eps
        };

        if let Some(b) = bounds.get(j) {
            if b.has_upper_bound() && param_j + eps_j > b.max {
                eps_j = -eps_j;
            }
        }

        params_perturbed[j] += eps_j;

        let residuals_perturbed = problem.eval(&params_perturbed)?;

        for i in 0..n_residuals {
            jac[[i, j]] = (residuals_perturbed[i] - residuals[i]) / eps_j;
        }
    }

    Ok(jac)
}
