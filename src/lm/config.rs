//! Configuration options for the Levenberg-Marquardt algorithm.
//!
//! This module defines the configuration options and parameter settings for the
//! Levenberg-Marquardt algorithm: convergence tolerances, damping control,
//! differentiation method and the resource budget of a single fit.

use std::time::Duration;

/// Method for calculating the Jacobian matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffMethod {
    /// Use finite differences to approximate the Jacobian
    FiniteDifference,

    /// Use the analytical Jacobian provided by the problem implementation,
    /// falling back to finite differences when the problem has none
    #[default]
    Analytical,
}

/// Configuration options for the Levenberg-Marquardt algorithm.
#[derive(Debug, Clone)]
pub struct LmConfig {
    /// Maximum number of iterations. Default: 200
    pub max_iterations: usize,

    /// Tolerance for relative change in cost. Default: 1e-10
    pub ftol: f64,

    /// Tolerance for relative change in parameter values. Default: 1e-10
    pub xtol: f64,

    /// Tolerance for the scaled projected gradient. Default: 1e-12
    pub gtol: f64,

    /// Initial value for the damping parameter. Default: 1e-3
    pub initial_lambda: f64,

    /// Factor by which to increase lambda. Default: 10.0
    pub lambda_up_factor: f64,

    /// Factor by which to decrease lambda. Default: 0.1
    pub lambda_down_factor: f64,

    /// Minimum value for lambda. Default: 1e-12
    pub min_lambda: f64,

    /// Maximum value for lambda. Default: 1e12
    pub max_lambda: f64,

    /// Method to use for calculating the Jacobian. Default: Analytical
    pub diff_method: DiffMethod,

    /// Whether to calculate and return the Jacobian at the solution. Default: false
    pub calc_jacobian: bool,

    /// Wall-clock budget for one minimization. Default: none
    pub time_budget: Option<Duration>,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-10,
            xtol: 1e-10,
            gtol: 1e-12,
            initial_lambda: 1e-3,
            lambda_up_factor: 10.0,
            lambda_down_factor: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            diff_method: DiffMethod::default(),
            calc_jacobian: false,
            time_budget: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LmConfig::default();
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.diff_method, DiffMethod::Analytical);
        assert!(config.time_budget.is_none());
        assert!(config.min_lambda < config.initial_lambda);
        assert!(config.initial_lambda < config.max_lambda);
    }
}
