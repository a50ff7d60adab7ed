//! Pressure units and observation normalization.
//!
//! Observations arrive as raw `(pressure, quantity)` columns. Before fitting
//! they are cleaned (pairs with a missing value are dropped, order is kept)
//! and expressed in the pressure unit the affinity constants should carry.
//! Whatever unit `K` is fitted in must be the unit fed to the model at
//! prediction time; [`PressureUnit::convert`] and
//! [`crate::model::Isotherm::in_unit`] keep the two sides consistent.

use crate::error::{FitError, Result};
use log::warn;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pascals per bar.
pub const PASCALS_PER_BAR: f64 = 100_000.0;

/// Pressure unit of an observation set or of a fitted affinity constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressureUnit {
    #[serde(rename = "Pa")]
    Pascal,
    #[serde(rename = "bar")]
    Bar,
}

impl PressureUnit {
    /// Size of one unit, in pascals.
    pub fn pascals(self) -> f64 {
        match self {
            PressureUnit::Pascal => 1.0,
            PressureUnit::Bar => PASCALS_PER_BAR,
        }
    }

    /// Factor that turns a pressure in `self` into a pressure in `to`.
    pub fn factor_to(self, to: PressureUnit) -> f64 {
        if self == to {
            1.0
        } else {
            self.pascals() / to.pascals()
        }
    }

    /// Convert a pressure expressed in `self` into `to`.
    pub fn convert(self, pressure: f64, to: PressureUnit) -> f64 {
        match (self, to) {
            (PressureUnit::Pascal, PressureUnit::Bar) => pressure / PASCALS_PER_BAR,
            (PressureUnit::Bar, PressureUnit::Pascal) => pressure * PASCALS_PER_BAR,
            _ => pressure,
        }
    }

    /// Symbol used in labels and exported records.
    pub fn symbol(self) -> &'static str {
        match self {
            PressureUnit::Pascal => "Pa",
            PressureUnit::Bar => "bar",
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An ordered, validated set of `(pressure, quantity)` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    pressures: Array1<f64>,
    quantities: Array1<f64>,
    unit: PressureUnit,
    dropped: usize,
}

impl ObservationSet {
    /// Build an observation set from raw columns.
    ///
    /// Pairs where either value is NaN (a missing cell) are dropped and the
    /// remaining pairs keep their relative order.
    ///
    /// # Errors
    ///
    /// * `FitError::InvalidInput` if the columns differ in length, a value is
    ///   infinite, or a pressure is negative
    pub fn new(pressures: &[f64], quantities: &[f64], unit: PressureUnit) -> Result<Self> {
        if pressures.len() != quantities.len() {
            return Err(FitError::InvalidInput(format!(
                "Expected {} quantities to match the pressures, got {}",
                pressures.len(),
                quantities.len()
            )));
        }

        let mut kept_p = Vec::with_capacity(pressures.len());
        let mut kept_q = Vec::with_capacity(quantities.len());
        let mut dropped = 0;

        for (i, (&p, &q)) in pressures.iter().zip(quantities).enumerate() {
            if p.is_nan() || q.is_nan() {
                dropped += 1;
                continue;
            }
            if p.is_infinite() || q.is_infinite() {
                return Err(FitError::InvalidInput(format!(
                    "Observation {} is infinite: ({}, {})",
                    i, p, q
                )));
            }
            if p < 0.0 {
                return Err(FitError::InvalidInput(format!(
                    "Observation {} has negative pressure {}",
                    i, p
                )));
            }
            kept_p.push(p);
            kept_q.push(q);
        }

        if dropped > 0 {
            warn!(
                "Dropped {} of {} observations with missing values",
                dropped,
                pressures.len()
            );
        }

        Ok(Self {
            pressures: Array1::from_vec(kept_p),
            quantities: Array1::from_vec(kept_q),
            unit,
            dropped,
        })
    }

    pub fn pressures(&self) -> &Array1<f64> {
        &self.pressures
    }

    pub fn quantities(&self) -> &Array1<f64> {
        &self.quantities
    }

    pub fn unit(&self) -> PressureUnit {
        self.unit
    }

    /// Number of observations that survived filtering.
    pub fn len(&self) -> usize {
        self.pressures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressures.is_empty()
    }

    /// Number of pairs removed for missing values.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of distinct strictly positive pressures.
    ///
    /// Rows at zero pressure carry no information about any parameter, so
    /// this bounds the rank of the model Jacobian.
    pub fn distinct_positive_pressures(&self) -> usize {
        let mut positive: Vec<f64> = self.pressures.iter().copied().filter(|&p| p > 0.0).collect();
        positive.sort_by(|a, b| a.total_cmp(b));
        positive.dedup();
        positive.len()
    }

    /// The same observations with pressures expressed in `unit`.
    pub fn to_unit(&self, unit: PressureUnit) -> Self {
        Self {
            pressures: self.pressures.mapv(|p| self.unit.convert(p, unit)),
            quantities: self.quantities.clone(),
            unit,
            dropped: self.dropped,
        }
    }
}
