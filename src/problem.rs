//! Problem definition trait.
//!
//! This module defines the `Problem` trait, which represents a box-constrained
//! nonlinear least squares problem to be solved with the Levenberg-Marquardt
//! algorithm.

use crate::error::Result;
use crate::parameters::BoxBounds;
use ndarray::{Array1, Array2};

/// A trait representing a nonlinear least squares problem.
///
/// Residuals follow the `model - observed` convention, so the Jacobian of the
/// residuals equals the Jacobian of the model.
pub trait Problem {
    /// Evaluate the residuals at the given parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameter values at which to evaluate the residuals
    ///
    /// # Returns
    ///
    /// * A vector of residuals, or an error if the evaluation fails
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of residuals in the problem.
    fn residual_count(&self) -> usize;

    /// Box constraints on the parameters. Unbounded unless overridden.
    fn bounds(&self) -> BoxBounds {
        BoxBounds::unbounded(self.parameter_count())
    }

    /// Evaluate the Jacobian matrix at the given parameters.
    ///
    /// The default implementation uses forward finite differences.
    fn jacobian(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        crate::utils::finite_difference::jacobian(self, params, None)
    }

    /// Check if this problem provides a custom Jacobian implementation.
    ///
    /// If this returns false, the optimizer always differentiates numerically,
    /// whatever `DiffMethod` it was configured with.
    fn has_custom_jacobian(&self) -> bool {
        false
    }

    /// Evaluate the sum of squared residuals at the given parameters.
    fn eval_cost(&self, params: &Array1<f64>) -> Result<f64> {
        let residuals = self.eval(params)?;
        Ok(residuals.iter().map(|r| r.powi(2)).sum())
    }
}
