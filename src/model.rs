//! Isotherm models and the fitting entry points.
//!
//! This module ties the pieces together: an [`Isotherm`] is a parameterized
//! Langmuir model, [`IsothermProblem`] adapts it to the [`Problem`] trait so the
//! Levenberg-Marquardt solver can fit it, and [`fit`] runs the whole pipeline
//! from raw observation columns to a [`FitResult`] with R² and predictions.
//!
//! # Example
//!
//! ```
//! use langmuir_fit::model::{fit, ModelKind};
//! use langmuir_fit::units::PressureUnit;
//! use ndarray::array;
//!
//! let pressures = [0.0, 1.0, 2.0, 5.0, 10.0];
//! let quantities: Vec<f64> = pressures.iter().map(|p| 3.0 * 0.2 * p / (1.0 + 0.2 * p)).collect();
//!
//! let result = fit(
//!     ModelKind::SingleSite,
//!     &pressures,
//!     &quantities,
//!     &array![1.0, 1.0],
//!     PressureUnit::Pascal,
//! )
//! .unwrap();
//!
//! assert!(result.r_squared > 0.999_999);
//! ```

use crate::error::{FitError, Result};
use crate::lm::{ConvergenceStatus, LevenbergMarquardt, LmConfig};
use crate::models;
use crate::parameters::BoxBounds;
use crate::problem::Problem;
use crate::uncertainty::{r_squared, FitStatistics, UncertaintyResult};
use crate::units::{ObservationSet, PressureUnit};
use log::{debug, info};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The variant of Langmuir isotherm to fit, without parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    SingleSite,
    DualSite,
}

impl ModelKind {
    /// Number of fitted parameters.
    pub fn parameter_count(self) -> usize {
        self.parameter_names().len()
    }

    /// Parameter names in vector order.
    pub fn parameter_names(self) -> &'static [&'static str] {
        match self {
            ModelKind::SingleSite => &["qmax", "K"],
            ModelKind::DualSite => &["qmax1", "K1", "qmax2", "K2"],
        }
    }

    /// Starting point used when the caller has no better guess.
    ///
    /// Affinity constants fitted in pascals are orders of magnitude smaller
    /// than in bar, so the seed depends on the pressure unit.
    pub fn default_guess(self, unit: PressureUnit) -> Array1<f64> {
        let seed = match unit {
            PressureUnit::Bar => 1.0,
            PressureUnit::Pascal => 0.01,
        };
        Array1::from_elem(self.parameter_count(), seed)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::SingleSite => f.write_str("single-site Langmuir"),
            ModelKind::DualSite => f.write_str("dual-site Langmuir"),
        }
    }
}

/// A Langmuir isotherm with concrete parameter values.
///
/// Affinity constants are in reciprocal pressure units; which unit is not
/// stored here but travels alongside, e.g. in [`FitResult::unit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum Isotherm {
    SingleSite {
        qmax: f64,
        #[serde(rename = "K")]
        k: f64,
    },
    DualSite {
        qmax1: f64,
        #[serde(rename = "K1")]
        k1: f64,
        qmax2: f64,
        #[serde(rename = "K2")]
        k2: f64,
    },
}

impl Isotherm {
    /// Build an isotherm from a parameter vector in [`ModelKind::parameter_names`] order.
    ///
    /// # Errors
    ///
    /// * `FitError::InvalidInput` if the length does not match the model or a
    ///   value is negative or not finite
    pub fn from_params(kind: ModelKind, params: &Array1<f64>) -> Result<Self> {
        check_params(kind, params)?;
        Ok(match kind {
            ModelKind::SingleSite => Isotherm::SingleSite {
                qmax: params[0],
                k: params[1],
            },
            ModelKind::DualSite => Isotherm::DualSite {
                qmax1: params[0],
                k1: params[1],
                qmax2: params[2],
                k2: params[3],
            },
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Isotherm::SingleSite { .. } => ModelKind::SingleSite,
            Isotherm::DualSite { .. } => ModelKind::DualSite,
        }
    }

    pub fn parameter_names(&self) -> &'static [&'static str] {
        self.kind().parameter_names()
    }

    /// Parameter values in [`ModelKind::parameter_names`] order.
    pub fn to_array(&self) -> Array1<f64> {
        match *self {
            Isotherm::SingleSite { qmax, k } => Array1::from_vec(vec![qmax, k]),
            Isotherm::DualSite {
                qmax1,
                k1,
                qmax2,
                k2,
            } => Array1::from_vec(vec![qmax1, k1, qmax2, k2]),
        }
    }

    /// Adsorbed quantity at one pressure.
    pub fn eval(&self, pressure: f64) -> f64 {
        match *self {
            Isotherm::SingleSite { qmax, k } => models::single_site(pressure, qmax, k),
            Isotherm::DualSite {
                qmax1,
                k1,
                qmax2,
                k2,
            } => models::dual_site(pressure, qmax1, k1, qmax2, k2),
        }
    }

    /// Adsorbed quantity at each pressure.
    pub fn eval_array(&self, pressures: &Array1<f64>) -> Array1<f64> {
        pressures.mapv(|p| self.eval(p))
    }

    /// Limit of the isotherm as pressure grows without bound.
    pub fn saturation_capacity(&self) -> f64 {
        match *self {
            Isotherm::SingleSite { qmax, .. } => qmax,
            Isotherm::DualSite { qmax1, qmax2, .. } => qmax1 + qmax2,
        }
    }

    /// Re-express the affinity constants, fitted against pressures in `from`,
    /// for pressures given in `to`. Capacities are unchanged.
    pub fn in_unit(&self, from: PressureUnit, to: PressureUnit) -> Self {
        let factor = from.factor_to(to);
        match *self {
            Isotherm::SingleSite { qmax, k } => Isotherm::SingleSite {
                qmax,
                k: k / factor,
            },
            Isotherm::DualSite {
                qmax1,
                k1,
                qmax2,
                k2,
            } => Isotherm::DualSite {
                qmax1,
                k1: k1 / factor,
                qmax2,
                k2: k2 / factor,
            },
        }
    }
}

impl fmt::Display for Isotherm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind())?;
        for (i, (name, value)) in self
            .parameter_names()
            .iter()
            .zip(self.to_array().iter())
            .enumerate()
        {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {:.6e}", name, value)?;
        }
        write!(f, ")")
    }
}

fn check_params(kind: ModelKind, params: &Array1<f64>) -> Result<()> {
    if params.len() != kind.parameter_count() {
        return Err(FitError::InvalidInput(format!(
            "Expected {} parameters for the {} model, got {}",
            kind.parameter_count(),
            kind,
            params.len()
        )));
    }
    for (name, &value) in kind.parameter_names().iter().zip(params.iter()) {
        if !value.is_finite() {
            return Err(FitError::InvalidInput(format!(
                "Parameter {} is not finite: {}",
                name, value
            )));
        }
        if value < 0.0 {
            return Err(FitError::InvalidInput(format!(
                "Parameter {} must be non-negative, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

/// Least-squares problem for one isotherm against one observation set.
///
/// Residuals are `model - observed`; every parameter is bounded below by zero.
pub struct IsothermProblem {
    kind: ModelKind,
    pressures: Array1<f64>,
    quantities: Array1<f64>,
}

impl IsothermProblem {
    pub fn new(kind: ModelKind, observations: &ObservationSet) -> Self {
        Self {
            kind,
            pressures: observations.pressures().clone(),
            quantities: observations.quantities().clone(),
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    fn check_len(&self, params: &Array1<f64>) -> Result<()> {
        if params.len() != self.kind.parameter_count() {
            return Err(FitError::InvalidInput(format!(
                "Expected {} parameters, got {}",
                self.kind.parameter_count(),
                params.len()
            )));
        }
        Ok(())
    }
}

impl Problem for IsothermProblem {
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        self.check_len(params)?;
        let model: Array1<f64> = match self.kind {
            ModelKind::SingleSite => self
                .pressures
                .mapv(|p| models::single_site(p, params[0], params[1])),
            ModelKind::DualSite => self
                .pressures
                .mapv(|p| models::dual_site(p, params[0], params[1], params[2], params[3])),
        };
        Ok(model - &self.quantities)
    }

    fn parameter_count(&self) -> usize {
        self.kind.parameter_count()
    }

    fn residual_count(&self) -> usize {
        self.pressures.len()
    }

    fn bounds(&self) -> BoxBounds {
        BoxBounds::non_negative(self.kind.parameter_count())
    }

    fn jacobian(&self, params: &Array1<f64>) -> Result<Array2<f64>> {
        self.check_len(params)?;
        let mut jac = Array2::zeros((self.pressures.len(), self.kind.parameter_count()));

        for (mut row, &p) in jac.rows_mut().into_iter().zip(self.pressures.iter()) {
            match self.kind {
                ModelKind::SingleSite => {
                    let grad = models::single_site_gradient(p, params[0], params[1]);
                    row.assign(&Array1::from_vec(grad.to_vec()));
                }
                ModelKind::DualSite => {
                    let grad =
                        models::dual_site_gradient(p, params[0], params[1], params[2], params[3]);
                    row.assign(&Array1::from_vec(grad.to_vec()));
                }
            }
        }

        Ok(jac)
    }

    fn has_custom_jacobian(&self) -> bool {
        true
    }
}

/// Options for a single fit.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Solver settings. Default: `LmConfig::default()`
    pub config: LmConfig,

    /// Unit the affinity constants are fitted in. Default: the unit of the observations
    pub fit_unit: Option<PressureUnit>,

    /// Estimate covariance and standard errors at the solution. Default: true
    pub uncertainty: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            config: LmConfig::default(),
            fit_unit: None,
            uncertainty: true,
        }
    }
}

impl FitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_fit_unit(mut self, unit: PressureUnit) -> Self {
        self.fit_unit = Some(unit);
        self
    }

    pub fn with_uncertainty(mut self, uncertainty: bool) -> Self {
        self.uncertainty = uncertainty;
        self
    }
}

/// Outcome of a successful fit.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// The fitted isotherm
    pub parameters: Isotherm,

    /// Pressure unit the affinity constants are expressed in
    pub unit: PressureUnit,

    /// Coefficient of determination of the fit
    pub r_squared: f64,

    /// Model values at the fitted pressures
    pub predicted: Array1<f64>,

    /// Fitted pressures, in `unit`
    pub pressures: Array1<f64>,

    /// Observed quantities, aligned with `pressures`
    pub quantities: Array1<f64>,

    /// Number of accepted solver iterations
    pub iterations: usize,

    /// Why the solver stopped
    pub status: ConvergenceStatus,

    /// Chi-square and information criteria
    pub statistics: FitStatistics,

    /// Parameter uncertainties, when they could be estimated
    pub uncertainty: Option<UncertaintyResult>,
}

impl FitResult {
    /// Evaluate the fitted isotherm at pressures given in `unit`.
    pub fn predict(&self, pressures: &[f64], unit: PressureUnit) -> Array1<f64> {
        pressures
            .iter()
            .map(|&p| self.parameters.eval(unit.convert(p, self.unit)))
            .collect()
    }

    /// The fitted isotherm with affinity constants for pressures in `unit`.
    pub fn parameters_in(&self, unit: PressureUnit) -> Isotherm {
        self.parameters.in_unit(self.unit, unit)
    }

    /// Residuals `predicted - observed`.
    pub fn residuals(&self) -> Array1<f64> {
        &self.predicted - &self.quantities
    }

    pub fn covariance(&self) -> Option<&Array2<f64>> {
        self.uncertainty.as_ref().map(|u| &u.covariance)
    }

    pub fn standard_errors(&self) -> Option<&Array1<f64>> {
        self.uncertainty.as_ref().map(|u| &u.standard_errors)
    }
}

/// Fit an isotherm to raw observation columns.
///
/// Pressures are interpreted in `unit_mode`, which is also the unit the
/// fitted affinity constants carry. Pairs with a NaN in either column are
/// dropped before fitting.
///
/// # Errors
///
/// * `FitError::InvalidInput` for mismatched or invalid data, too few
///   observations, or a malformed initial guess
/// * `FitError::SingularJacobian` when the data cannot determine every parameter
/// * `FitError::FitDivergence` when the solver does not converge
/// * `FitError::DegenerateSeries` when the observed quantities have no variance
pub fn fit(
    kind: ModelKind,
    pressures: &[f64],
    quantities: &[f64],
    initial_guess: &Array1<f64>,
    unit_mode: PressureUnit,
) -> Result<FitResult> {
    let observations = ObservationSet::new(pressures, quantities, unit_mode)?;
    fit_observations(kind, &observations, initial_guess, &FitOptions::default())
}

/// Fit an isotherm to a prepared observation set.
///
/// When `options.fit_unit` differs from the unit of `observations`, the
/// pressures are converted first and `initial_guess` is read in the fit unit.
pub fn fit_observations(
    kind: ModelKind,
    observations: &ObservationSet,
    initial_guess: &Array1<f64>,
    options: &FitOptions,
) -> Result<FitResult> {
    check_params(kind, initial_guess)?;

    let observations = match options.fit_unit {
        Some(unit) if unit != observations.unit() => observations.to_unit(unit),
        _ => observations.clone(),
    };

    let n_params = kind.parameter_count();
    if observations.len() < n_params {
        return Err(FitError::InvalidInput(format!(
            "{} observations cannot determine the {} parameters of the {} model",
            observations.len(),
            n_params,
            kind
        )));
    }
    let distinct = observations.distinct_positive_pressures();
    if distinct < n_params {
        return Err(FitError::SingularJacobian(format!(
            "{} distinct positive pressures cannot determine {} parameters",
            distinct, n_params
        )));
    }

    debug!(
        "Fitting {} model to {} observations in {}",
        kind,
        observations.len(),
        observations.unit()
    );

    let problem = IsothermProblem::new(kind, &observations);
    let solver = LevenbergMarquardt::with_config(options.config.clone())
        .with_calc_jacobian(options.uncertainty);
    let solution = solver.minimize(&problem, initial_guess.clone())?;

    let parameters = Isotherm::from_params(kind, &solution.params)?;
    let predicted = parameters.eval_array(observations.pressures());
    let r2 = r_squared(
        &observations.quantities().to_vec(),
        &predicted.to_vec(),
    )?;

    let statistics = FitStatistics::from_residuals(&solution.residuals.to_vec(), n_params);
    let uncertainty = solution
        .jacobian
        .as_ref()
        .and_then(|jacobian| UncertaintyResult::from_jacobian(jacobian, &statistics));

    info!(
        "Fitted {} after {} iterations, R² = {:.6}",
        parameters, solution.iterations, r2
    );

    Ok(FitResult {
        parameters,
        unit: observations.unit(),
        r_squared: r2,
        predicted,
        pressures: observations.pressures().clone(),
        quantities: observations.quantities().clone(),
        iterations: solution.iterations,
        status: solution.status,
        statistics,
        uncertainty,
    })
}

/// One independent fit in a batch.
#[derive(Debug, Clone)]
pub struct FitRequest {
    pub kind: ModelKind,
    pub pressures: Vec<f64>,
    pub quantities: Vec<f64>,
    pub initial_guess: Array1<f64>,
    pub unit: PressureUnit,
    pub options: FitOptions,
}

impl FitRequest {
    /// A request seeded with [`ModelKind::default_guess`] for `unit`.
    pub fn new(kind: ModelKind, pressures: Vec<f64>, quantities: Vec<f64>, unit: PressureUnit) -> Self {
        Self {
            kind,
            pressures,
            quantities,
            initial_guess: kind.default_guess(unit),
            unit,
            options: FitOptions::default(),
        }
    }

    pub fn with_initial_guess(mut self, initial_guess: Array1<f64>) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    pub fn with_options(mut self, options: FitOptions) -> Self {
        self.options = options;
        self
    }

    /// Run this request on the current thread.
    pub fn run(&self) -> Result<FitResult> {
        let observations = ObservationSet::new(&self.pressures, &self.quantities, self.unit)?;
        fit_observations(self.kind, &observations, &self.initial_guess, &self.options)
    }
}

/// Fit independent requests in parallel. Results keep request order.
pub fn fit_batch(requests: &[FitRequest]) -> Vec<Result<FitResult>> {
    requests.par_iter().map(FitRequest::run).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn single_site_data(qmax: f64, k: f64, pressures: &[f64]) -> Vec<f64> {
        pressures
            .iter()
            .map(|&p| models::single_site(p, qmax, k))
            .collect()
    }

    #[test]
    fn test_model_kind() {
        assert_eq!(ModelKind::SingleSite.parameter_count(), 2);
        assert_eq!(ModelKind::DualSite.parameter_count(), 4);
        assert_eq!(ModelKind::DualSite.parameter_names()[3], "K2");
        assert_eq!(
            ModelKind::SingleSite.default_guess(PressureUnit::Bar),
            array![1.0, 1.0]
        );
        assert_eq!(
            ModelKind::DualSite.default_guess(PressureUnit::Pascal),
            array![0.01, 0.01, 0.01, 0.01]
        );
    }

    #[test]
    fn test_isotherm_from_params() {
        let iso = Isotherm::from_params(ModelKind::SingleSite, &array![3.0, 0.2]).unwrap();
        assert_eq!(iso, Isotherm::SingleSite { qmax: 3.0, k: 0.2 });
        assert_eq!(iso.to_array(), array![3.0, 0.2]);
        assert_relative_eq!(iso.eval(5.0), 1.5);

        assert!(matches!(
            Isotherm::from_params(ModelKind::DualSite, &array![1.0, 1.0]),
            Err(FitError::InvalidInput(_))
        ));
        assert!(matches!(
            Isotherm::from_params(ModelKind::SingleSite, &array![-1.0, 1.0]),
            Err(FitError::InvalidInput(_))
        ));
        assert!(matches!(
            Isotherm::from_params(ModelKind::SingleSite, &array![1.0, f64::NAN]),
            Err(FitError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_in_unit() {
        let bar = Isotherm::DualSite {
            qmax1: 2.0,
            k1: 1.0,
            qmax2: 1.0,
            k2: 0.05,
        };
        let pa = bar.in_unit(PressureUnit::Bar, PressureUnit::Pascal);

        assert_relative_eq!(pa.eval(150_000.0), bar.eval(1.5), epsilon = 1e-12);
        assert_eq!(pa.saturation_capacity(), 3.0);
        let back = pa.in_unit(PressureUnit::Pascal, PressureUnit::Bar);
        assert_relative_eq!(back.to_array()[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_problem_jacobian_matches_finite_difference() {
        let obs = ObservationSet::new(
            &[0.0, 0.5, 1.0, 2.0, 4.0],
            &[0.0, 0.6, 0.9, 1.3, 1.6],
            PressureUnit::Bar,
        )
        .unwrap();
        let problem = IsothermProblem::new(ModelKind::DualSite, &obs);
        let params = array![1.5, 0.8, 1.0, 0.1];

        let analytic = problem.jacobian(&params).unwrap();
        let numeric = crate::utils::finite_difference::jacobian(&problem, &params, None).unwrap();

        for (a, n) in analytic.iter().zip(numeric.iter()) {
            assert_relative_eq!(a, n, epsilon = 1e-6);
        }
        assert!(problem.has_custom_jacobian());
        assert_eq!(problem.bounds().len(), 4);
    }

    #[test]
    fn test_fit_exact_single_site() {
        let pressures = [0.0, 1.0, 2.0, 5.0, 10.0];
        let quantities = single_site_data(3.0, 0.2, &pressures);

        let result = fit(
            ModelKind::SingleSite,
            &pressures,
            &quantities,
            &array![1.0, 1.0],
            PressureUnit::Pascal,
        )
        .unwrap();

        let params = result.parameters.to_array();
        assert_relative_eq!(params[0], 3.0, epsilon = 1e-4);
        assert_relative_eq!(params[1], 0.2, epsilon = 1e-4);
        assert_relative_eq!(result.r_squared, 1.0, epsilon = 1e-10);
        assert_eq!(result.unit, PressureUnit::Pascal);
        assert_eq!(result.predicted.len(), 5);
        assert!(result.status.is_converged());
    }

    #[test]
    fn test_fit_rejects_bad_guess() {
        let pressures = [1.0, 2.0, 3.0];
        let quantities = [0.5, 0.7, 0.8];

        for guess in [array![1.0], array![-1.0, 1.0], array![f64::INFINITY, 1.0]] {
            let err = fit(
                ModelKind::SingleSite,
                &pressures,
                &quantities,
                &guess,
                PressureUnit::Bar,
            )
            .unwrap_err();
            assert!(matches!(err, FitError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_fit_too_few_distinct_pressures() {
        let err = fit(
            ModelKind::DualSite,
            &[0.0, 1.0, 1.0, 2.0],
            &[0.0, 0.5, 0.5, 0.7],
            &array![1.0, 1.0, 1.0, 1.0],
            PressureUnit::Bar,
        )
        .unwrap_err();
        assert!(matches!(err, FitError::SingularJacobian(_)));
    }

    #[test]
    fn test_fit_in_other_unit() {
        let bar = [0.5, 1.0, 2.0, 4.0, 8.0];
        let pa: Vec<f64> = bar.iter().map(|p| p * 1e5).collect();
        let quantities = single_site_data(2.0, 0.5, &bar);
        let observations = ObservationSet::new(&pa, &quantities, PressureUnit::Pascal).unwrap();

        let options = FitOptions::new().with_fit_unit(PressureUnit::Bar);
        let result =
            fit_observations(ModelKind::SingleSite, &observations, &array![1.0, 1.0], &options)
                .unwrap();

        assert_eq!(result.unit, PressureUnit::Bar);
        assert_relative_eq!(result.parameters.to_array()[1], 0.5, epsilon = 1e-6);
        assert_relative_eq!(
            result.parameters_in(PressureUnit::Pascal).to_array()[1],
            0.5e-5,
            epsilon = 1e-11
        );

        let predicted = result.predict(&[100_000.0], PressureUnit::Pascal);
        assert_relative_eq!(predicted[0], models::single_site(1.0, 2.0, 0.5), epsilon = 1e-6);
    }

    #[test]
    fn test_fit_batch_keeps_order() {
        let pressures = vec![0.1, 0.5, 1.0, 2.0, 5.0];
        let requests = vec![
            FitRequest::new(
                ModelKind::SingleSite,
                pressures.clone(),
                single_site_data(2.0, 0.5, &pressures),
                PressureUnit::Bar,
            ),
            FitRequest::new(
                ModelKind::SingleSite,
                pressures.clone(),
                vec![1.0; 5],
                PressureUnit::Bar,
            ),
            FitRequest::new(
                ModelKind::SingleSite,
                pressures.clone(),
                single_site_data(4.0, 2.0, &pressures),
                PressureUnit::Bar,
            ),
        ];

        let results = fit_batch(&requests);
        assert_eq!(results.len(), 3);
        assert_relative_eq!(
            results[0].as_ref().unwrap().parameters.saturation_capacity(),
            2.0,
            epsilon = 1e-6
        );
        assert!(results[1].is_err());
        assert_relative_eq!(
            results[2].as_ref().unwrap().parameters.saturation_capacity(),
            4.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_isotherm_serde() {
        let iso = Isotherm::SingleSite { qmax: 2.0, k: 0.5 };
        let json = serde_json::to_string(&iso).unwrap();
        assert_eq!(json, r#"{"model":"SingleSite","qmax":2.0,"K":0.5}"#);
        let back: Isotherm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iso);
    }
}
