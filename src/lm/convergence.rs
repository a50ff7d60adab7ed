//! Convergence criteria for optimization algorithms.
//!
//! This module defines the criteria used to determine when an optimization
//! algorithm has converged to a solution. Every test is relative, so a fit
//! converges after the same iterations whether its affinity constants are
//! expressed per Pa or per bar.

use ndarray::Array1;

/// Possible convergence states for an optimization algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// The algorithm is still running.
    Running,

    /// The algorithm has converged due to a small parameter change.
    ParameterConvergence,

    /// The algorithm has converged due to a small function value change.
    FunctionValueConvergence,

    /// The algorithm has converged due to a small projected gradient.
    GradientConvergence,

    /// The residuals vanished exactly.
    ExactFit,

    /// The algorithm has terminated due to reaching the maximum number of iterations.
    MaxIterationsReached,

    /// The algorithm has terminated because its wall-clock budget ran out.
    TimeBudgetExceeded,

    /// The damping parameter hit its ceiling without any reduction in cost.
    DampingSaturated,
}

impl ConvergenceStatus {
    /// Returns true if the optimization has terminated (either converged or failed).
    pub fn is_terminated(&self) -> bool {
        !matches!(self, ConvergenceStatus::Running)
    }

    /// Returns true if the optimization has converged.
    pub fn is_converged(&self) -> bool {
        matches!(
            self,
            ConvergenceStatus::ParameterConvergence
                | ConvergenceStatus::FunctionValueConvergence
                | ConvergenceStatus::GradientConvergence
                | ConvergenceStatus::ExactFit
        )
    }

    /// Returns a description of the convergence status.
    pub fn description(&self) -> String {
        match self {
            ConvergenceStatus::Running => "Optimization is still running".to_string(),
            ConvergenceStatus::ParameterConvergence => {
                "Converged: small parameter change".to_string()
            }
            ConvergenceStatus::FunctionValueConvergence => {
                "Converged: small function value change".to_string()
            }
            ConvergenceStatus::GradientConvergence => "Converged: small gradient".to_string(),
            ConvergenceStatus::ExactFit => "Converged: residuals vanished".to_string(),
            ConvergenceStatus::MaxIterationsReached => {
                "Terminated: maximum iterations reached".to_string()
            }
            ConvergenceStatus::TimeBudgetExceeded => {
                "Terminated: time budget exceeded".to_string()
            }
            ConvergenceStatus::DampingSaturated => {
                "Terminated: damping saturated without reducing cost".to_string()
            }
        }
    }
}

/// Criteria for determining when an optimization algorithm has converged.
#[derive(Debug, Clone)]
pub struct ConvergenceCriteria {
    /// Tolerance for relative change in parameter values.
    pub xtol: f64,

    /// Tolerance for relative change in function value.
    pub ftol: f64,

    /// Tolerance for the scaled projected gradient.
    pub gtol: f64,

    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            xtol: 1e-10,
            ftol: 1e-10,
            gtol: 1e-12,
            max_iterations: 200,
        }
    }
}

impl ConvergenceCriteria {
    /// Creates a new set of convergence criteria with the given tolerances.
    pub fn new(xtol: f64, ftol: f64, gtol: f64, max_iterations: usize) -> Self {
        Self {
            xtol,
            ftol,
            gtol,
            max_iterations,
        }
    }

    /// Largest per-parameter relative change between two iterates.
    ///
    /// A parameter that did not move contributes zero, even when it sits at zero.
    pub fn relative_change(params: &Array1<f64>, new_params: &Array1<f64>) -> f64 {
        new_params
            .iter()
            .zip(params.iter())
            .map(|(&a, &b)| {
                let delta = (a - b).abs();
                if delta == 0.0 {
                    0.0
                } else {
                    delta / a.abs().max(b.abs())
                }
            })
            .fold(0.0, f64::max)
    }

    /// Checks whether the optimization has converged after an accepted step.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameter values before the step
    /// * `new_params` - The parameter values after the step
    /// * `cost` - The cost before the step
    /// * `new_cost` - The cost after the step
    /// * `gradient_norm` - The scaled norm of the projected gradient
    /// * `iterations` - The number of iterations so far
    pub fn check(
        &self,
        params: &Array1<f64>,
        new_params: &Array1<f64>,
        cost: f64,
        new_cost: f64,
        gradient_norm: f64,
        iterations: usize,
    ) -> ConvergenceStatus {
        if new_cost == 0.0 {
            return ConvergenceStatus::ExactFit;
        }

        if gradient_norm < self.gtol {
            return ConvergenceStatus::GradientConvergence;
        }

        if Self::relative_change(params, new_params) < self.xtol {
            return ConvergenceStatus::ParameterConvergence;
        }

        let cost_change = (cost - new_cost).abs() / cost.max(f64::MIN_POSITIVE);
        if cost_change < self.ftol {
            return ConvergenceStatus::FunctionValueConvergence;
        }

        if iterations >= self.max_iterations {
            return ConvergenceStatus::MaxIterationsReached;
        }

        ConvergenceStatus::Running
    }

    /// Checks whether a rejected step was already below the resolution of the
    /// parameters, meaning the current point cannot be improved further.
    pub fn check_rejected(
        &self,
        params: &Array1<f64>,
        trial_params: &Array1<f64>,
        cost: f64,
        predicted_reduction: f64,
    ) -> ConvergenceStatus {
        if Self::relative_change(params, trial_params) < self.xtol {
            return ConvergenceStatus::ParameterConvergence;
        }

        if predicted_reduction.abs() <= self.ftol * cost {
            return ConvergenceStatus::FunctionValueConvergence;
        }

        ConvergenceStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_convergence_criteria() {
        let criteria = ConvergenceCriteria::default();

        // Parameter convergence
        let params = array![1.0, 2.0, 3.0];
        let new_params = array![1.0 + 1e-12, 2.0, 3.0 - 1e-12];
        let status = criteria.check(&params, &new_params, 10.0, 9.9, 0.1, 50);
        assert_eq!(status, ConvergenceStatus::ParameterConvergence);

        // Function value convergence
        let new_params = array![1.1, 2.1, 3.1];
        let status = criteria.check(&params, &new_params, 10.0, 10.0 - 1e-10, 0.1, 50);
        assert_eq!(status, ConvergenceStatus::FunctionValueConvergence);

        // Gradient convergence
        let status = criteria.check(&params, &new_params, 10.0, 9.0, 1e-13, 50);
        assert_eq!(status, ConvergenceStatus::GradientConvergence);

        // Exact fit
        let status = criteria.check(&params, &new_params, 10.0, 0.0, 0.1, 50);
        assert_eq!(status, ConvergenceStatus::ExactFit);

        // Max iterations
        let status = criteria.check(&params, &new_params, 10.0, 9.0, 0.1, 200);
        assert_eq!(status, ConvergenceStatus::MaxIterationsReached);

        // Still running
        let status = criteria.check(&params, &new_params, 10.0, 9.0, 0.1, 50);
        assert_eq!(status, ConvergenceStatus::Running);
    }

    #[test]
    fn test_relative_change_is_scale_free() {
        // Same relative move on parameters five orders of magnitude apart
        let small = ConvergenceCriteria::relative_change(&array![2.0, 2e-5], &array![2.0, 2.2e-5]);
        let large = ConvergenceCriteria::relative_change(&array![2.0, 2.0], &array![2.0, 2.2]);
        assert!((small - large).abs() < 1e-12);

        // Parameters pinned at zero do not count
        assert_eq!(
            ConvergenceCriteria::relative_change(&array![0.0, 1.0], &array![0.0, 1.0]),
            0.0
        );
    }

    #[test]
    fn test_check_rejected() {
        let criteria = ConvergenceCriteria::default();
        let params = array![1.0, 1.0];

        let status = criteria.check_rejected(&params, &array![1.0 + 1e-14, 1.0], 1.0, 0.5);
        assert_eq!(status, ConvergenceStatus::ParameterConvergence);

        let status = criteria.check_rejected(&params, &array![1.5, 1.0], 1.0, 1e-12);
        assert_eq!(status, ConvergenceStatus::FunctionValueConvergence);

        let status = criteria.check_rejected(&params, &array![1.5, 1.0], 1.0, 0.5);
        assert_eq!(status, ConvergenceStatus::Running);
    }

    #[test]
    fn test_convergence_status_methods() {
        assert!(!ConvergenceStatus::Running.is_terminated());
        assert!(ConvergenceStatus::ParameterConvergence.is_terminated());
        assert!(ConvergenceStatus::MaxIterationsReached.is_terminated());
        assert!(ConvergenceStatus::DampingSaturated.is_terminated());

        assert!(!ConvergenceStatus::Running.is_converged());
        assert!(ConvergenceStatus::ExactFit.is_converged());
        assert!(ConvergenceStatus::GradientConvergence.is_converged());
        assert!(!ConvergenceStatus::MaxIterationsReached.is_converged());
        assert!(!ConvergenceStatus::TimeBudgetExceeded.is_converged());
    }
}
