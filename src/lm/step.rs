//! Step calculation for the Levenberg-Marquardt algorithm.
//!
//! This module computes the damped Gauss-Newton step on the free parameters
//! of a box-constrained problem. Parameters held by the active set get a zero
//! step; the remaining ones solve
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr
//! ```
//!
//! Marquardt's diagonal scaling makes the step invariant to rescaling of
//! individual parameters.

use crate::error::{FitError, Result};
use crate::utils::matrix_convert::nalgebra_vec_to_ndarray;
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Diagonal entries are floored at this fraction of the largest one, so a
/// free parameter whose Jacobian column vanished still gets a solvable row.
const DIAGONAL_FLOOR: f64 = 1e-12;

/// Result of a Levenberg-Marquardt step calculation.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// The calculated step vector (zero for parameters in the active set)
    pub step: Array1<f64>,
}

/// Handles step calculation for the Levenberg-Marquardt algorithm.
pub struct LmStep;

impl LmStep {
    /// Calculates the Levenberg-Marquardt step for the free parameters.
    ///
    /// # Arguments
    ///
    /// * `j_t_j` - The JᵀJ matrix at the current position
    /// * `j_t_r` - The gradient Jᵀr at the current position
    /// * `active` - Mask of parameters pinned by their bounds
    /// * `lambda` - The damping parameter
    ///
    /// # Errors
    ///
    /// * `FitError::SingularJacobian` if no free parameter has a non-zero
    ///   Jacobian column, or the damped system cannot be factorized
    pub fn calculate_step(
        j_t_j: &Array2<f64>,
        j_t_r: &Array1<f64>,
        active: &[bool],
        lambda: f64,
    ) -> Result<StepResult> {
        let n = j_t_r.len();
        let free: Vec<usize> = (0..n).filter(|&i| !active[i]).collect();
        let mut step = Array1::zeros(n);

        if free.is_empty() {
            return Ok(StepResult { step });
        }

        let max_diag = free.iter().map(|&i| j_t_j[[i, i]]).fold(0.0, f64::max);
        if !(max_diag > 0.0) || !max_diag.is_finite() {
            return Err(FitError::SingularJacobian(
                "Jacobian columns of all free parameters vanish".to_string(),
            ));
        }
        let floor = max_diag * DIAGONAL_FLOOR;

        let m = free.len();
        let mut a = DMatrix::from_fn(m, m, |r, c| j_t_j[[free[r], free[c]]]);
        for k in 0..m {
            a[(k, k)] += lambda * a[(k, k)].max(floor);
        }
        let b = DVector::from_iterator(m, free.iter().map(|&i| -j_t_r[i]));

        let solution = LmStep::solve_cholesky(a, &b)?;
        for (k, &i) in free.iter().enumerate() {
            step[i] = solution[k];
        }

        Ok(StepResult { step })
    }

    /// Solves the linear system A * x = b using Cholesky decomposition.
    fn solve_cholesky(a: DMatrix<f64>, b: &DVector<f64>) -> Result<Array1<f64>> {
        let chol = a.cholesky().ok_or_else(|| {
            FitError::SingularJacobian(
                "Damped normal equations are not positive definite".to_string(),
            )
        })?;
        let x = chol.solve(b);

        if x.iter().any(|v| !v.is_finite()) {
            return Err(FitError::SingularJacobian(
                "Step computation produced non-finite values".to_string(),
            ));
        }

        Ok(nalgebra_vec_to_ndarray(&x))
    }

    /// Calculates the reduction in `Σr²` predicted by the linear model for a step.
    ///
    /// `‖r + Js‖² = ‖r‖² + 2·sᵀJᵀr + sᵀJᵀJs`, so the predicted reduction is
    /// `-(2·sᵀJᵀr + sᵀJᵀJs)`.
    pub fn predicted_reduction(j_t_j: &Array2<f64>, j_t_r: &Array1<f64>, step: &Array1<f64>) -> f64 {
        -(2.0 * step.dot(j_t_r) + step.dot(&j_t_j.dot(step)))
    }
}
