//! Trust region implementation for the Levenberg-Marquardt algorithm.
//!
//! This module provides a trust region implementation that adapts the damping
//! parameter based on the agreement between predicted and actual reduction in cost.

use super::config::LmConfig;

/// Trust region implementation for the Levenberg-Marquardt algorithm.
#[derive(Debug, Clone)]
pub struct TrustRegion {
    /// Current value of the damping parameter
    pub lambda: f64,

    /// Minimum allowed value for the damping parameter
    pub lambda_min: f64,

    /// Maximum allowed value for the damping parameter
    pub lambda_max: f64,

    /// Factor to increase lambda by when step is rejected
    pub lambda_increase_factor: f64,

    /// Factor to decrease lambda by when step is accepted
    pub lambda_decrease_factor: f64,

    /// Minimum gain ratio required to accept a step
    pub min_gain_ratio: f64,

    /// Gain ratio above which lambda is decreased
    pub good_gain_ratio: f64,
}

impl Default for TrustRegion {
    fn default() -> Self {
        Self::from_config(&LmConfig::default())
    }
}

impl TrustRegion {
    /// Creates a new TrustRegion with default parameters.
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a trust region whose damping schedule follows the given configuration.
    pub fn from_config(config: &LmConfig) -> Self {
        Self {
            lambda: config.initial_lambda,
            lambda_min: config.min_lambda,
            lambda_max: config.max_lambda,
            lambda_increase_factor: config.lambda_up_factor,
            lambda_decrease_factor: config.lambda_down_factor,
            min_gain_ratio: 1e-4,
            good_gain_ratio: 0.75,
        }
    }

    /// Updates the damping parameter based on the gain ratio.
    ///
    /// Returns `true` when the step should be accepted.
    pub fn update_lambda(&mut self, gain_ratio: f64) -> bool {
        if gain_ratio > self.min_gain_ratio {
            if gain_ratio > self.good_gain_ratio {
                self.lambda = (self.lambda * self.lambda_decrease_factor).max(self.lambda_min);
            }
            true
        } else {
            self.lambda = (self.lambda * self.lambda_increase_factor).min(self.lambda_max);
            false
        }
    }

    /// Whether lambda has reached its ceiling.
    pub fn is_saturated(&self) -> bool {
        self.lambda >= self.lambda_max
    }

    /// Calculates the gain ratio between actual and predicted reduction.
    ///
    /// # Arguments
    ///
    /// * `current_cost` - The current cost function value
    /// * `new_cost` - The new cost function value after the step
    /// * `predicted_reduction` - The predicted reduction in cost
    pub fn gain_ratio(current_cost: f64, new_cost: f64, predicted_reduction: f64) -> f64 {
        let actual_reduction = current_cost - new_cost;

        if !new_cost.is_finite() {
            return f64::NEG_INFINITY;
        }

        if predicted_reduction <= 0.0 {
            if actual_reduction > 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            actual_reduction / predicted_reduction
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_ratio() {
        assert_eq!(TrustRegion::gain_ratio(10.0, 6.0, 4.0), 1.0);
        assert_eq!(TrustRegion::gain_ratio(10.0, 9.0, 4.0), 0.25);
        assert!(TrustRegion::gain_ratio(10.0, 12.0, 4.0) < 0.0);
        assert_eq!(TrustRegion::gain_ratio(10.0, f64::NAN, 4.0), f64::NEG_INFINITY);
        assert_eq!(TrustRegion::gain_ratio(10.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_update_lambda() {
        let mut tr = TrustRegion::new();
        let start = tr.lambda;

        // Very good step: accepted, lambda decreases
        assert!(tr.update_lambda(0.9));
        assert!(tr.lambda < start);

        // Mediocre step: accepted, lambda unchanged
        let before = tr.lambda;
        assert!(tr.update_lambda(0.5));
        assert_eq!(tr.lambda, before);

        // Bad step: rejected, lambda increases
        assert!(!tr.update_lambda(-1.0));
        assert!(tr.lambda > before);
    }

    #[test]
    fn test_saturation() {
        let mut tr = TrustRegion::from_config(&LmConfig {
            max_lambda: 1.0,
            ..LmConfig::default()
        });
        for _ in 0..5 {
            tr.update_lambda(0.0);
        }
        assert!(tr.is_saturated());
        assert_eq!(tr.lambda, 1.0);
    }
}
