//! # Covariance Matrix Calculations
//!
//! This module provides functions for calculating and manipulating covariance
//! matrices from Jacobian matrices in nonlinear least-squares optimization.

use crate::utils::matrix_convert::{nalgebra_to_ndarray, ndarray_to_nalgebra};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Smallest squared Cholesky pivot of the scaled normal matrix accepted as full rank.
const RANK_TOLERANCE: f64 = 1e-12;

/// Calculate covariance matrix from Jacobian matrix.
///
/// For nonlinear least-squares problems, the covariance matrix is estimated as:
///   covar = redchi * inv(J^T * J)
/// where:
///   - J is the Jacobian matrix
///   - redchi is the reduced chi-square (chi^2 / dof)
///
/// Returns `None` when `J^T * J` is not invertible; the fit itself can still
/// be valid, its parameters just have no finite uncertainty estimate.
pub fn calculate_covariance(jacobian: &Array2<f64>, redchi: f64) -> Option<Array2<f64>> {
    let jtj = ndarray_to_nalgebra(&jacobian.t().dot(jacobian));
    let n = jtj.nrows();

    // Unit-diagonal scaling keeps the rank test independent of parameter units
    let scale: Vec<f64> = (0..n).map(|i| jtj[(i, i)].sqrt()).collect();
    if scale.iter().any(|&s| !(s > 0.0) || !s.is_finite()) {
        return None;
    }
    let scaled = DMatrix::from_fn(n, n, |i, j| jtj[(i, j)] / (scale[i] * scale[j]));

    let chol = scaled.cholesky()?;
    let l = chol.l();
    if (0..n).any(|i| l[(i, i)] * l[(i, i)] < RANK_TOLERANCE) {
        return None;
    }

    let inverse = chol.inverse();
    let covar = DMatrix::from_fn(n, n, |i, j| inverse[(i, j)] / (scale[i] * scale[j]) * redchi);
    if covar.iter().any(|v| !v.is_finite()) {
        return None;
    }

    Some(nalgebra_to_ndarray(&covar))
}

/// Calculate correlation matrix from covariance matrix.
///
/// The correlation matrix is calculated as:
///   correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])
pub fn calculate_correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            return 1.0;
        }
        let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
        if denom > 0.0 {
            covar[[i, j]] / denom
        } else {
            0.0
        }
    })
}

/// Extract standard errors from the covariance matrix.
///
/// Standard errors are the square roots of the diagonal elements
/// of the covariance matrix.
pub fn standard_errors_from_covariance(covar: &Array2<f64>) -> Array1<f64> {
    covar.diag().mapv(|v| if v > 0.0 { v.sqrt() } else { 0.0 })
}
