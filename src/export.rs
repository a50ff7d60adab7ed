//! Flat-record export of fit results.
//!
//! A [`FitRecord`] is the fitted parameters plus R², keyed by parameter
//! name. It can be written as JSON or as a two-row CSV (header row, value
//! row) into any `std::io::Write`.

use crate::model::{FitResult, Isotherm};
use crate::units::PressureUnit;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

/// Errors raised while writing a record.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Header of the R² column.
pub const R_SQUARED_COLUMN: &str = "R_squared";

/// Fitted parameters and R² of one fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitRecord {
    #[serde(flatten)]
    pub parameters: Isotherm,

    /// Unit the affinity constants are expressed in
    pub unit: PressureUnit,

    #[serde(rename = "R_squared")]
    pub r_squared: f64,
}

impl FitRecord {
    pub fn from_result(result: &FitResult) -> Self {
        Self {
            parameters: result.parameters,
            unit: result.unit,
            r_squared: result.r_squared,
        }
    }

    /// Like [`FitRecord::from_result`], with affinity constants re-expressed in `unit`.
    pub fn from_result_in(result: &FitResult, unit: PressureUnit) -> Self {
        Self {
            parameters: result.parameters_in(unit),
            unit,
            r_squared: result.r_squared,
        }
    }

    /// Column names in output order.
    pub fn headers(&self) -> Vec<&'static str> {
        let mut headers = self.parameters.parameter_names().to_vec();
        headers.push(R_SQUARED_COLUMN);
        headers
    }

    /// Values aligned with [`FitRecord::headers`].
    pub fn values(&self) -> Vec<f64> {
        let mut values = self.parameters.to_array().to_vec();
        values.push(self.r_squared);
        values
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write a header row and a value row.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), ExportError> {
        writeln!(writer, "{}", self.headers().join(","))?;
        let values: Vec<String> = self.values().iter().map(|v| v.to_string()).collect();
        writeln!(writer, "{}", values.join(","))?;
        writer.flush()?;
        Ok(())
    }
}
