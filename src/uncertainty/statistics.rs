//! Goodness-of-fit statistics.
//!
//! The coefficient of determination plus the chi-square family of
//! statistics lmfit reports with every fit.

use crate::error::{FitError, Result};
use serde::{Deserialize, Serialize};

/// Computes the coefficient of determination R² between observed and predicted values.
///
/// ```math
/// R² = 1 - SS_res / SS_tot
/// where
///   SS_res = Σ (y_i - y_fit_i)²
///   SS_tot = Σ (y_i - y_mean)²
/// ```
///
/// # Errors
///
/// * `FitError::InvalidInput` if the sequences are empty or of different length
/// * `FitError::DegenerateSeries` if the observed series is constant, which
///   leaves R² undefined
///
/// # Example
///
/// ```rust
/// use langmuir_fit::uncertainty::r_squared;
///
/// let y = [1.0, 2.0, 3.0];
/// assert_eq!(r_squared(&y, &y).unwrap(), 1.0);
/// assert!(r_squared(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0]).is_err());
/// ```
pub fn r_squared(observed: &[f64], predicted: &[f64]) -> Result<f64> {
    if observed.len() != predicted.len() {
        return Err(FitError::InvalidInput(format!(
            "Expected {} predicted values, got {}",
            observed.len(),
            predicted.len()
        )));
    }
    if observed.is_empty() {
        return Err(FitError::InvalidInput(
            "Cannot compute R² of an empty series".to_string(),
        ));
    }

    let mean = observed.iter().sum::<f64>() / observed.len() as f64;

    let mut ss_total = 0.0;
    let mut ss_residual = 0.0;
    for (&y, &y_fit) in observed.iter().zip(predicted) {
        ss_total += (y - mean).powi(2);
        ss_residual += (y - y_fit).powi(2);
    }

    if !ss_total.is_finite() || !ss_residual.is_finite() {
        return Err(FitError::InvalidInput(
            "Sums of squares overflow or are not finite".to_string(),
        ));
    }

    let constant = observed.iter().all(|&y| y == observed[0]);
    if constant || ss_total == 0.0 {
        return Err(FitError::DegenerateSeries(format!(
            "Observed series has no variance (all values equal {})",
            observed[0]
        )));
    }

    Ok(1.0 - ss_residual / ss_total)
}

/// Sum of squared residuals.
pub fn chi_square(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r * r).sum()
}

/// Chi-square divided by the degrees of freedom `ndata - nvarys`.
///
/// Returns `None` when there are no degrees of freedom left.
pub fn reduced_chi_square(chisqr: f64, ndata: usize, nvarys: usize) -> Option<f64> {
    if ndata > nvarys {
        Some(chisqr / (ndata - nvarys) as f64)
    } else {
        None
    }
}

/// Akaike information criterion, `n·ln(χ²/n) + 2·k`.
pub fn aic(chisqr: f64, ndata: usize, nvarys: usize) -> f64 {
    let n = ndata as f64;
    n * (chisqr / n).max(f64::MIN_POSITIVE).ln() + 2.0 * nvarys as f64
}

/// Bayesian information criterion, `n·ln(χ²/n) + ln(n)·k`.
pub fn bic(chisqr: f64, ndata: usize, nvarys: usize) -> f64 {
    let n = ndata as f64;
    n * (chisqr / n).max(f64::MIN_POSITIVE).ln() + n.ln() * nvarys as f64
}

/// Summary statistics of a converged fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStatistics {
    /// Number of observations fitted
    pub ndata: usize,
    /// Number of fitted parameters
    pub nvarys: usize,
    /// Sum of squared residuals
    pub chisqr: f64,
    /// Reduced chi-square, absent without degrees of freedom
    pub redchi: Option<f64>,
    /// Akaike information criterion
    pub aic: f64,
    /// Bayesian information criterion
    pub bic: f64,
}

impl FitStatistics {
    /// Compute every statistic from the residuals of a fit.
    pub fn from_residuals(residuals: &[f64], nvarys: usize) -> Self {
        let ndata = residuals.len();
        let chisqr = chi_square(residuals);
        Self {
            ndata,
            nvarys,
            chisqr,
            redchi: reduced_chi_square(chisqr, ndata, nvarys),
            aic: aic(chisqr, ndata, nvarys),
            bic: bic(chisqr, ndata, nvarys),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_r_squared_perfect() {
        let y = [0.3, 1.2, 2.0, 2.4];
        assert_eq!(r_squared(&y, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_r_squared_value() {
        let y = [1.0, 2.0, 3.0];
        let y_fit = [1.0, 2.0, 4.0];
        // SS_res = 1, SS_tot = 2
        assert_relative_eq!(r_squared(&y, &y_fit).unwrap(), 0.5);

        // A worse-than-mean prediction goes negative
        let y_fit = [3.0, 2.0, 1.0];
        assert_relative_eq!(r_squared(&y, &y_fit).unwrap(), -3.0);
    }

    #[test]
    fn test_r_squared_degenerate() {
        let err = r_squared(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0]).unwrap_err();
        assert!(matches!(err, FitError::DegenerateSeries(_)));

        // Constant values whose mean is inexact still count as degenerate
        let err = r_squared(&[0.1, 0.1, 0.1], &[0.0, 0.1, 0.2]).unwrap_err();
        assert!(matches!(err, FitError::DegenerateSeries(_)));
    }

    #[test]
    fn test_r_squared_invalid() {
        assert!(matches!(
            r_squared(&[1.0, 2.0], &[1.0]),
            Err(FitError::InvalidInput(_))
        ));
        assert!(matches!(r_squared(&[], &[]), Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn test_r_squared_overflow() {
        let observed = [1e200, 2e200, 3e200];
        let err = r_squared(&observed, &[1.0, 1.0, 1.0]).unwrap_err();
        assert!(matches!(err, FitError::InvalidInput(_)));

        let err = r_squared(&[1.0, 2.0, 3.0], &[1.0, 2.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, FitError::InvalidInput(_)));
    }

    #[test]
    fn test_fit_statistics() {
        let residuals = [0.1, -0.1, 0.2, -0.2];
        let stats = FitStatistics::from_residuals(&residuals, 2);

        assert_eq!(stats.ndata, 4);
        assert_relative_eq!(stats.chisqr, 0.1, epsilon = 1e-12);
        assert_relative_eq!(stats.redchi.unwrap(), 0.05, epsilon = 1e-12);
        assert_relative_eq!(stats.aic, 4.0 * (0.025f64).ln() + 4.0, epsilon = 1e-12);
        assert_relative_eq!(stats.bic, 4.0 * (0.025f64).ln() + 2.0 * 4f64.ln(), epsilon = 1e-12);

        assert!(reduced_chi_square(1.0, 2, 2).is_none());
    }
}
