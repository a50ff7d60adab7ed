//! Parameter bounds implementation
//!
//! This module provides the box constraints used by the projected
//! Levenberg-Marquardt solver. Every Langmuir parameter is bounded below by
//! zero and unbounded above, but the types here handle arbitrary boxes.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::{INFINITY, NEG_INFINITY};
use thiserror::Error;

/// Errors that can occur when working with parameter bounds
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundsError {
    #[error("Invalid bounds: min ({min}) must be less than max ({max})")]
    InvalidBounds { min: f64, max: f64 },

    #[error("Parameter value {value} is outside bounds: [{min}, {max}]")]
    ValueOutsideBounds { value: f64, min: f64, max: f64 },

    #[error("Non-finite parameter value is not allowed")]
    InfiniteValue,

    #[error("Expected {expected} parameter values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Represents the bounds constraints on a parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum allowed value for the parameter
    pub min: f64,

    /// Maximum allowed value for the parameter
    pub max: f64,
}

impl Serialize for Bounds {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Bounds", 2)?;

        // JSON has no infinities; an open side is written as null
        if self.min.is_infinite() && self.min.is_sign_negative() {
            state.serialize_field("min", &Option::<f64>::None)?;
        } else {
            state.serialize_field("min", &Some(self.min))?;
        }

        if self.max.is_infinite() && self.max.is_sign_positive() {
            state.serialize_field("max", &Option::<f64>::None)?;
        } else {
            state.serialize_field("max", &Some(self.max))?;
        }

        state.end()
    }
}

impl<'de> Deserialize<'de> for Bounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct BoundsHelper {
            #[serde(default)]
            min: Option<f64>,

            #[serde(default)]
            max: Option<f64>,
        }

        let helper = BoundsHelper::deserialize(deserializer)?;

        let min = helper.min.unwrap_or(NEG_INFINITY);
        let max = helper.max.unwrap_or(INFINITY);

        Bounds::new(min, max).map_err(serde::de::Error::custom)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: NEG_INFINITY,
            max: INFINITY,
        }
    }
}

impl Bounds {
    /// Create a new bounds constraint with min and max values
    ///
    /// # Examples
    ///
    /// ```
    /// use langmuir_fit::parameters::Bounds;
    ///
    /// let bounds = Bounds::new(0.0, 10.0).unwrap();
    /// assert_eq!(bounds.min, 0.0);
    /// assert_eq!(bounds.max, 10.0);
    /// ```
    pub fn new(min: f64, max: f64) -> Result<Self, BoundsError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(BoundsError::InvalidBounds { min, max });
        }

        Ok(Self { min, max })
    }

    /// Create an unbounded constraint (negative infinity to positive infinity)
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Create a bounds constraint with only a minimum value
    pub fn min_only(min: f64) -> Self {
        Self { min, max: INFINITY }
    }

    /// The `[0, ∞)` box every adsorption capacity and affinity constant lives in.
    pub fn non_negative() -> Self {
        Self::min_only(0.0)
    }

    /// Check if a value is within the bounds
    pub fn is_within_bounds(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check if the parameter is bounded from below
    pub fn has_lower_bound(&self) -> bool {
        self.min.is_finite()
    }

    /// Check if the parameter is bounded from above
    pub fn has_upper_bound(&self) -> bool {
        self.max.is_finite()
    }

    /// Clamp a value to be within the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Validate a single starting value against the bounds.
    pub fn check(&self, value: f64) -> Result<(), BoundsError> {
        if !value.is_finite() {
            return Err(BoundsError::InfiniteValue);
        }
        if !self.is_within_bounds(value) {
            return Err(BoundsError::ValueOutsideBounds {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Whether a parameter at `value` is pinned by the bound it sits on,
    /// given the gradient `gradient` of the cost with respect to it.
    ///
    /// A descent step moves along `-gradient`, so a parameter at its lower
    /// bound with a positive gradient (or at its upper bound with a negative
    /// one) cannot move and is held fixed for the step.
    pub fn is_active(&self, value: f64, gradient: f64) -> bool {
        (self.has_lower_bound() && value <= self.min && gradient > 0.0)
            || (self.has_upper_bound() && value >= self.max && gradient < 0.0)
    }
}

/// Per-parameter bounds for a whole parameter vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxBounds {
    bounds: Vec<Bounds>,
}

impl BoxBounds {
    /// Create a box from explicit per-parameter bounds.
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// `n` parameters, each bounded below by zero.
    pub fn non_negative(n: usize) -> Self {
        Self::new(vec![Bounds::non_negative(); n])
    }

    /// `n` parameters without any bound.
    pub fn unbounded(n: usize) -> Self {
        Self::new(vec![Bounds::unbounded(); n])
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Check that a parameter vector is finite, has the right length and lies in the box.
    pub fn validate(&self, params: &Array1<f64>) -> Result<(), BoundsError> {
        if params.len() != self.bounds.len() {
            return Err(BoundsError::LengthMismatch {
                expected: self.bounds.len(),
                actual: params.len(),
            });
        }
        for (bounds, &value) in self.bounds.iter().zip(params.iter()) {
            bounds.check(value)?;
        }
        Ok(())
    }

    /// Project a parameter vector onto the box.
    pub fn project(&self, params: &Array1<f64>) -> Array1<f64> {
        Array1::from_iter(
            params
                .iter()
                .zip(self.bounds.iter())
                .map(|(&value, bounds)| bounds.clamp(value)),
        )
    }

    /// Mask of parameters pinned by their bound for a step along `-gradient`.
    pub fn active_set(&self, params: &Array1<f64>, gradient: &Array1<f64>) -> Vec<bool> {
        self.bounds
            .iter()
            .zip(params.iter().zip(gradient.iter()))
            .map(|(bounds, (&value, &grad))| bounds.is_active(value, grad))
            .collect()
    }
}
