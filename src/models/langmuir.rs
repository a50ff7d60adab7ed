//! Langmuir adsorption isotherms.
//!
//! The single-site Langmuir isotherm is defined as:
//!
//! q(P) = qmax * K * P / (1 + K * P)
//!
//! Where:
//! - qmax: the saturation capacity of the adsorbent
//! - K: the affinity constant, in reciprocal pressure units
//!
//! The dual-site form sums two independent site populations. Both are
//! non-decreasing in P for non-negative parameters and vanish at P = 0.

/// Fractional coverage `K·P / (1 + K·P)` of one site population.
#[inline]
pub fn coverage(pressure: f64, k: f64) -> f64 {
    let kp = k * pressure;
    kp / (1.0 + kp)
}

/// Single-site Langmuir isotherm.
#[inline]
pub fn single_site(pressure: f64, qmax: f64, k: f64) -> f64 {
    qmax * coverage(pressure, k)
}

/// Dual-site Langmuir isotherm.
#[inline]
pub fn dual_site(pressure: f64, qmax1: f64, k1: f64, qmax2: f64, k2: f64) -> f64 {
    single_site(pressure, qmax1, k1) + single_site(pressure, qmax2, k2)
}

/// Partial derivatives of [`single_site`] with respect to `(qmax, K)`.
///
/// ∂q/∂qmax = K·P / (1 + K·P)
/// ∂q/∂K    = qmax·P / (1 + K·P)²
#[inline]
pub fn single_site_gradient(pressure: f64, qmax: f64, k: f64) -> [f64; 2] {
    let denom = 1.0 + k * pressure;
    [coverage(pressure, k), qmax * pressure / (denom * denom)]
}

/// Partial derivatives of [`dual_site`] with respect to `(qmax1, K1, qmax2, K2)`.
#[inline]
pub fn dual_site_gradient(pressure: f64, qmax1: f64, k1: f64, qmax2: f64, k2: f64) -> [f64; 4] {
    let [d_qmax1, d_k1] = single_site_gradient(pressure, qmax1, k1);
    let [d_qmax2, d_k2] = single_site_gradient(pressure, qmax2, k2);
    [d_qmax1, d_k1, d_qmax2, d_k2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_pressure() {
        assert_eq!(single_site(0.0, 3.0, 0.2), 0.0);
        assert_eq!(dual_site(0.0, 1.0, 2.0, 3.0, 4.0), 0.0);
        assert_eq!(single_site(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_known_values() {
        // K·P = 1: half coverage
        assert_relative_eq!(single_site(5.0, 3.0, 0.2), 1.5);
        assert_relative_eq!(dual_site(1.0, 2.0, 1.0, 4.0, 3.0), 1.0 + 3.0);
    }

    #[test]
    fn test_saturation() {
        assert_relative_eq!(single_site(1e12, 2.5, 1.0), 2.5, epsilon = 1e-9);
        assert_relative_eq!(dual_site(1e12, 1.0, 1.0, 2.0, 0.5), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gradient_against_finite_difference() {
        let (p, qmax, k) = (2.0, 1.7, 0.4);
        let [d_qmax, d_k] = single_site_gradient(p, qmax, k);
        let h = 1e-7;

        let fd_qmax = (single_site(p, qmax + h, k) - single_site(p, qmax - h, k)) / (2.0 * h);
        let fd_k = (single_site(p, qmax, k + h) - single_site(p, qmax, k - h)) / (2.0 * h);
        assert_relative_eq!(d_qmax, fd_qmax, epsilon = 1e-7);
        assert_relative_eq!(d_k, fd_k, epsilon = 1e-7);

        let grad = dual_site_gradient(p, 1.0, 0.5, 2.0, 0.05);
        assert_relative_eq!(grad[0], coverage(p, 0.5));
        assert_relative_eq!(grad[3], 2.0 * p / (1.0 + 0.05 * p).powi(2));
    }
}
