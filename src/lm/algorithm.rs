//! Implementation of the Levenberg-Marquardt algorithm.
//!
//! This module contains the core implementation of the box-constrained
//! Levenberg-Marquardt algorithm for nonlinear least-squares optimization.
//! Bounds are handled by projection: parameters pinned on a bound by the
//! gradient are held fixed for the step, the rest take a damped Gauss-Newton
//! step, and the trial point is projected back onto the box.

use log::{debug, info, warn};
use ndarray::{Array1, Array2};
use std::fmt;
use std::time::Instant;

use crate::error::{FitError, Result};
use crate::problem::Problem;
use crate::utils::finite_difference;

use super::config::{DiffMethod, LmConfig};
use super::convergence::{ConvergenceCriteria, ConvergenceStatus};
use super::step::LmStep;
use super::trust_region::TrustRegion;

/// Result of the Levenberg-Marquardt optimization.
#[derive(Debug, Clone)]
pub struct LmResult {
    /// Optimized parameter values
    pub params: Array1<f64>,

    /// Residuals (model - observed) at the solution
    pub residuals: Array1<f64>,

    /// Sum of squared residuals
    pub cost: f64,

    /// Number of accepted steps
    pub iterations: usize,

    /// Number of residual evaluations, including those spent on finite differences
    pub func_evals: usize,

    /// The criterion that ended the optimization
    pub status: ConvergenceStatus,

    /// A message describing the result
    pub message: String,

    /// The Jacobian matrix at the solution (if requested)
    pub jacobian: Option<Array2<f64>>,
}

impl LmResult {
    /// Whether the optimization converged.
    pub fn success(&self) -> bool {
        self.status.is_converged()
    }
}

impl fmt::Display for LmResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimization Result:")?;
        writeln!(f, "  Success: {}", self.success())?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Cost: {:.6e}", self.cost)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Function evaluations: {}", self.func_evals)?;
        writeln!(f, "  Parameters: {:?}", self.params)?;
        Ok(())
    }
}

/// The Levenberg-Marquardt optimizer.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    /// Configuration options
    config: LmConfig,
}

impl LevenbergMarquardt {
    /// Create a new Levenberg-Marquardt optimizer with default configuration.
    pub fn new() -> Self {
        Self {
            config: LmConfig::default(),
        }
    }

    /// Create a new Levenberg-Marquardt optimizer with the given configuration.
    pub fn with_config(config: LmConfig) -> Self {
        Self { config }
    }

    /// The configuration this optimizer runs with.
    pub fn config(&self) -> &LmConfig {
        &self.config
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the tolerance for relative change in cost.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.config.ftol = ftol;
        self
    }

    /// Set the tolerance for relative change in parameter values.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.config.xtol = xtol;
        self
    }

    /// Set the tolerance for the scaled projected gradient.
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.config.gtol = gtol;
        self
    }

    /// Set the initial value for the damping parameter.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.initial_lambda = lambda;
        self
    }

    /// Set the method used for calculating the Jacobian.
    pub fn with_differentiation_method(mut self, method: DiffMethod) -> Self {
        self.config.diff_method = method;
        self
    }

    /// Set whether to calculate and return the Jacobian at the solution.
    pub fn with_calc_jacobian(mut self, calc_jacobian: bool) -> Self {
        self.config.calc_jacobian = calc_jacobian;
        self
    }

    /// Bound the wall-clock time of a single minimization.
    pub fn with_time_budget(mut self, budget: std::time::Duration) -> Self {
        self.config.time_budget = Some(budget);
        self
    }

    fn criteria(&self) -> ConvergenceCriteria {
        ConvergenceCriteria::new(
            self.config.xtol,
            self.config.ftol,
            self.config.gtol,
            self.config.max_iterations,
        )
    }

    /// Minimize the sum of squared residuals for the given problem, keeping
    /// every parameter inside `problem.bounds()`.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem to solve
    /// * `initial_params` - Initial guess for the parameter values; must lie inside the bounds
    ///
    /// # Errors
    ///
    /// * `FitError::InvalidInput` for a malformed guess or problem
    /// * `FitError::SingularJacobian` when no step can be computed
    /// * `FitError::FitDivergence` when the iteration or time budget runs out,
    ///   or the damping saturates without reducing the cost
    pub fn minimize<P: Problem + ?Sized>(
        &self,
        problem: &P,
        initial_params: Array1<f64>,
    ) -> Result<LmResult> {
        let n_params = problem.parameter_count();
        let n_residuals = problem.residual_count();
        if initial_params.len() != n_params {
            return Err(FitError::InvalidInput(format!(
                "Expected {} parameters, got {}",
                n_params,
                initial_params.len()
            )));
        }
        if n_residuals < n_params {
            return Err(FitError::InvalidInput(format!(
                "{} residuals cannot determine {} parameters",
                n_residuals, n_params
            )));
        }

        let bounds = problem.bounds();
        bounds.validate(&initial_params)?;

        let criteria = self.criteria();
        let started = Instant::now();
        let mut trust_region = TrustRegion::from_config(&self.config);

        let mut params = initial_params;
        let mut residuals = problem.eval(&params)?;
        let mut func_evals = 1;
        if residuals.len() != n_residuals || residuals.iter().any(|r| !r.is_finite()) {
            return Err(FitError::InvalidInput(
                "Residuals at the initial guess are not finite".to_string(),
            ));
        }
        let mut cost: f64 = residuals.iter().map(|r| r.powi(2)).sum();
        if !cost.is_finite() {
            return Err(FitError::InvalidInput(
                "Sum of squared residuals at the initial guess overflows".to_string(),
            ));
        }
        let mut iterations = 0;

        let status = 'outer: loop {
            if cost == 0.0 {
                break ConvergenceStatus::ExactFit;
            }

            let jacobian = self.compute_jacobian(problem, &params, &mut func_evals)?;
            let j_t_j = jacobian.t().dot(&jacobian);
            let gradient = jacobian.t().dot(&residuals);

            let active = bounds.active_set(&params, &gradient);
            if active.iter().all(|&a| a) {
                // Every parameter is pinned: a corner of the box is stationary
                break ConvergenceStatus::GradientConvergence;
            }

            if (0..n_params).all(|i| active[i] || j_t_j[[i, i]] == 0.0) {
                return Err(FitError::SingularJacobian(
                    "Jacobian columns of all free parameters vanish".to_string(),
                ));
            }

            let gradient_norm = scaled_gradient_norm(&j_t_j, &gradient, &active, cost);
            if gradient_norm < criteria.gtol {
                break ConvergenceStatus::GradientConvergence;
            }

            loop {
                if let Some(budget) = self.config.time_budget {
                    if started.elapsed() > budget {
                        break 'outer ConvergenceStatus::TimeBudgetExceeded;
                    }
                }

                let step = LmStep::calculate_step(&j_t_j, &gradient, &active, trust_region.lambda)?;
                let trial = bounds.project(&(&params + &step.step));
                let actual_step = &trial - &params;
                let predicted = LmStep::predicted_reduction(&j_t_j, &gradient, &actual_step);

                let trial_residuals = problem.eval(&trial)?;
                func_evals += 1;
                let trial_cost: f64 = trial_residuals.iter().map(|r| r.powi(2)).sum();
                let gain = TrustRegion::gain_ratio(cost, trial_cost, predicted);

                if trust_region.update_lambda(gain) {
                    iterations += 1;
                    let status = criteria.check(
                        &params,
                        &trial,
                        cost,
                        trial_cost,
                        gradient_norm,
                        iterations,
                    );
                    debug!(
                        "LM iteration {}: cost {:.6e} -> {:.6e}, gain {:.3}, lambda {:.3e}",
                        iterations, cost, trial_cost, gain, trust_region.lambda
                    );

                    params = trial;
                    residuals = trial_residuals;
                    cost = trial_cost;

                    if status.is_terminated() {
                        break 'outer status;
                    }
                    continue 'outer;
                }

                debug!(
                    "LM step rejected: cost {:.6e} -> {:.6e}, gain {:.3}, lambda {:.3e}",
                    cost, trial_cost, gain, trust_region.lambda
                );

                let status = criteria.check_rejected(&params, &trial, cost, predicted);
                if status.is_terminated() {
                    break 'outer status;
                }
                if trust_region.is_saturated() {
                    break 'outer ConvergenceStatus::DampingSaturated;
                }
            }
        };

        if !status.is_converged() {
            warn!(
                "LM terminated without convergence after {} iterations: {}",
                iterations,
                status.description()
            );
            return Err(FitError::FitDivergence(format!(
                "{} (after {} iterations, cost {:.6e})",
                status.description(),
                iterations,
                cost
            )));
        }

        info!(
            "LM converged after {} iterations ({} evaluations): {}, cost {:.6e}",
            iterations,
            func_evals,
            status.description(),
            cost
        );

        let jacobian = if self.config.calc_jacobian {
            Some(self.compute_jacobian(problem, &params, &mut func_evals)?)
        } else {
            None
        };

        Ok(LmResult {
            params,
            residuals,
            cost,
            iterations,
            func_evals,
            status,
            message: status.description(),
            jacobian,
        })
    }

    /// Evaluate the Jacobian with the configured differentiation method.
    fn compute_jacobian<P: Problem + ?Sized>(
        &self,
        problem: &P,
        params: &Array1<f64>,
        func_evals: &mut usize,
    ) -> Result<Array2<f64>> {
        let jacobian = match self.config.diff_method {
            DiffMethod::Analytical if problem.has_custom_jacobian() => problem.jacobian(params)?,
            _ => {
                *func_evals += params.len() + 1;
                finite_difference::jacobian(problem, params, None)?
            }
        };

        let expected = [problem.residual_count(), problem.parameter_count()];
        if jacobian.shape() != &expected {
            return Err(FitError::InvalidInput(format!(
                "Expected Jacobian of shape {:?}, got {:?}",
                expected,
                jacobian.shape()
            )));
        }
        if jacobian.iter().any(|v| !v.is_finite()) {
            return Err(FitError::FitDivergence(
                "Jacobian contains non-finite entries".to_string(),
            ));
        }

        Ok(jacobian)
    }
}

/// Largest cosine between the residual vector and a free Jacobian column.
///
/// This is the scale-free gradient test of MINPACK: it reaches zero exactly
/// when the residuals are orthogonal to every direction the free parameters
/// can move in.
fn scaled_gradient_norm(j_t_j: &Array2<f64>, gradient: &Array1<f64>, active: &[bool], cost: f64) -> f64 {
    let r_norm = cost.sqrt();
    gradient
        .iter()
        .enumerate()
        .filter(|(i, _)| !active[*i])
        .map(|(i, g)| {
            let column_norm = j_t_j[[i, i]].sqrt();
            if column_norm > 0.0 && r_norm > 0.0 {
                g.abs() / (column_norm * r_norm)
            } else {
                0.0
            }
        })
        .fold(0.0, f64::max)
}
