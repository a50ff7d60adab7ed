//! # langmuir-fit
//!
//! `langmuir-fit` fits single- and dual-site Langmuir adsorption isotherms to
//! pressure/uptake observations with a box-constrained Levenberg-Marquardt
//! solver, and reports the goodness of fit.
//!
//! The library provides:
//! - Langmuir model functions with analytic derivatives
//! - A projected Levenberg-Marquardt solver for non-negative parameters
//! - R², chi-square statistics and parameter uncertainties similar to `lmfit-py`
//! - Pressure unit handling that keeps fitted affinity constants consistent
//! - Flat JSON/CSV export of fitted parameters
//!
//! ## Basic Usage
//!
//! ```
//! use langmuir_fit::{fit, ModelKind, PressureUnit};
//! use ndarray::array;
//!
//! let pressures = [0.1, 0.5, 1.0, 2.0, 5.0];
//! let uptake: Vec<f64> = pressures.iter().map(|p| 2.0 * 0.5 * p / (1.0 + 0.5 * p)).collect();
//!
//! let result = fit(
//!     ModelKind::SingleSite,
//!     &pressures,
//!     &uptake,
//!     &ModelKind::SingleSite.default_guess(PressureUnit::Bar),
//!     PressureUnit::Bar,
//! )
//! .unwrap();
//!
//! println!("{} (R² = {:.4})", result.parameters, result.r_squared);
//! ```

pub mod error;
pub mod export;
pub mod lm;
pub mod model;
pub mod models;
pub mod parameters;
pub mod problem;
pub mod uncertainty;
pub mod units;
pub mod utils;

pub use error::{FitError, Result};
pub use lm::LevenbergMarquardt;
pub use model::{fit, fit_batch, fit_observations, FitOptions, FitRequest, FitResult, Isotherm, ModelKind};
pub use problem::Problem;
pub use units::{ObservationSet, PressureUnit};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
