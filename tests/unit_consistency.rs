//! Fits of the same measurements in pascals and in bar must agree.

use crate::test_helpers::{add_noise, single_site_uptake, standard_normal};
use approx::assert_relative_eq;
use langmuir_fit::model::{fit_observations, FitOptions};
use langmuir_fit::units::PASCALS_PER_BAR;
use langmuir_fit::{fit, ModelKind, ObservationSet, PressureUnit};
use ndarray::array;

fn raw_pascal_data() -> (Vec<f64>, Vec<f64>) {
    let pascals: Vec<f64> = [0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 6.0, 10.0]
        .iter()
        .map(|bar| bar * PASCALS_PER_BAR)
        .collect();
    let bar: Vec<f64> = pascals.iter().map(|p| p / PASCALS_PER_BAR).collect();
    let quantities = add_noise(
        &single_site_uptake(2.0, 0.5, &bar),
        &standard_normal(bar.len(), 11),
        1e-3,
    );
    (pascals, quantities)
}

#[test]
fn test_pascal_and_bar_fits_agree() {
    let (pascals, quantities) = raw_pascal_data();
    let bar: Vec<f64> = pascals
        .iter()
        .map(|&p| PressureUnit::Pascal.convert(p, PressureUnit::Bar))
        .collect();

    let in_pa = fit(
        ModelKind::SingleSite,
        &pascals,
        &quantities,
        &array![1.0, 1.0 / PASCALS_PER_BAR],
        PressureUnit::Pascal,
    )
    .unwrap();
    let in_bar = fit(
        ModelKind::SingleSite,
        &bar,
        &quantities,
        &array![1.0, 1.0],
        PressureUnit::Bar,
    )
    .unwrap();

    let k_pa = in_pa.parameters.to_array()[1];
    let k_bar = in_bar.parameters.to_array()[1];
    assert_relative_eq!(k_bar / k_pa, 1e5, max_relative = 1e-6);
    assert_relative_eq!(
        in_pa.parameters.to_array()[0],
        in_bar.parameters.to_array()[0],
        max_relative = 1e-6
    );
    assert_relative_eq!(in_pa.r_squared, in_bar.r_squared, epsilon = 1e-9);
}

#[test]
fn test_prediction_uses_fit_unit() {
    let (pascals, quantities) = raw_pascal_data();
    let observations = ObservationSet::new(&pascals, &quantities, PressureUnit::Pascal).unwrap();
    let options = FitOptions::new().with_fit_unit(PressureUnit::Bar);

    let result =
        fit_observations(ModelKind::SingleSite, &observations, &array![1.0, 1.0], &options)
            .unwrap();
    assert_eq!(result.unit, PressureUnit::Bar);

    let from_pa = result.predict(&[150_000.0, 300_000.0], PressureUnit::Pascal);
    let from_bar = result.predict(&[1.5, 3.0], PressureUnit::Bar);
    for (a, b) in from_pa.iter().zip(from_bar.iter()) {
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    let pa_isotherm = result.parameters_in(PressureUnit::Pascal);
    assert_relative_eq!(pa_isotherm.eval(150_000.0), from_bar[0], epsilon = 1e-12);
}
