//! # Uncertainty Calculation
//!
//! This module provides functionality for judging fitted parameter estimates
//! from nonlinear least-squares optimization results. It includes:
//!
//! - The coefficient of determination R² and the chi-square statistics
//! - Covariance matrix estimation from Jacobian matrices
//! - Standard error and correlation calculation for parameter estimates
//!
//! The definitions follow lmfit-py, so reported values can be compared
//! directly against fits made there.

mod covariance;
mod statistics;

pub use covariance::{
    calculate_correlation, calculate_covariance, standard_errors_from_covariance,
};

pub use statistics::{aic, bic, chi_square, r_squared, reduced_chi_square, FitStatistics};

use ndarray::{Array1, Array2};

/// Parameter uncertainties derived from the Jacobian at a solution.
#[derive(Debug, Clone)]
pub struct UncertaintyResult {
    /// Covariance matrix for the parameters
    pub covariance: Array2<f64>,
    /// Standard errors for each parameter, in parameter order
    pub standard_errors: Array1<f64>,
    /// Correlation matrix derived from covariance
    pub correlation: Array2<f64>,
}

impl UncertaintyResult {
    /// Estimate uncertainties from the Jacobian at the solution and the fit statistics.
    ///
    /// Returns `None` without degrees of freedom or when `JᵀJ` is singular.
    pub fn from_jacobian(jacobian: &Array2<f64>, stats: &FitStatistics) -> Option<Self> {
        let redchi = stats.redchi?;
        let covariance = calculate_covariance(jacobian, redchi)?;
        let standard_errors = standard_errors_from_covariance(&covariance);
        let correlation = calculate_correlation(&covariance);

        Some(Self {
            covariance,
            standard_errors,
            correlation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn test_uncertainty_from_jacobian() {
        let jacobian = arr2(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
        let stats = FitStatistics::from_residuals(&[0.1, -0.1, 0.1], 2);

        let result = UncertaintyResult::from_jacobian(&jacobian, &stats).unwrap();

        // J^T J = [[2, 1], [1, 2]], inverse = [[2, -1], [-1, 2]] / 3
        let redchi = stats.redchi.unwrap();
        assert_relative_eq!(result.covariance[[0, 0]], redchi * 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(result.standard_errors[1], (redchi * 2.0 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(result.correlation[[0, 1]], -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_no_degrees_of_freedom() {
        let jacobian = arr2(&[[1.0, 0.0], [0.0, 1.0]]);
        let stats = FitStatistics::from_residuals(&[0.1, -0.1], 2);
        assert!(UncertaintyResult::from_jacobian(&jacobian, &stats).is_none());
    }
}
