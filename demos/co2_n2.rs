//! Fitting CO₂ and N₂ uptake columns of one measurement.
//!
//! The CO₂ column is fitted with the dual-site model and the N₂ column with
//! the single-site model. Pressures are recorded in Pa and fitted in bar.
//! Both fits run in parallel, and each result is written as a two-row CSV.

use langmuir_fit::export::FitRecord;
use langmuir_fit::models::{dual_site, single_site};
use langmuir_fit::{fit_batch, FitOptions, FitRequest, ModelKind, PressureUnit};
use ndarray::array;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::fs::File;
use std::io::BufWriter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("CO2 / N2 isotherm fitting example");
    println!("=================================\n");

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let noise = Normal::new(0.0, 2e-3)?;

    // Pressures in Pa, as exported by the measurement software
    let pressures: Vec<f64> = [0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 40.0]
        .iter()
        .map(|bar| bar * 1e5)
        .collect();

    // Synthetic uptake in mol/kg; affinity constants are per bar
    let co2: Vec<f64> = pressures
        .iter()
        .map(|&p| dual_site(p / 1e5, 2.0, 1.0, 1.0, 0.05) + noise.sample(&mut rng))
        .collect();
    let mut n2: Vec<f64> = pressures
        .iter()
        .map(|&p| single_site(p / 1e5, 0.8, 0.1) + noise.sample(&mut rng))
        .collect();
    // A missing cell is dropped before fitting
    n2[3] = f64::NAN;

    let options = FitOptions::new().with_fit_unit(PressureUnit::Bar);
    let requests = [
        FitRequest::new(ModelKind::DualSite, pressures.clone(), co2, PressureUnit::Pascal)
            .with_initial_guess(array![1.5, 0.8, 1.5, 0.1])
            .with_options(options.clone()),
        FitRequest::new(ModelKind::SingleSite, pressures, n2, PressureUnit::Pascal)
            .with_initial_guess(ModelKind::SingleSite.default_guess(PressureUnit::Bar))
            .with_options(options),
    ];

    let output_dir = std::env::temp_dir().join("langmuir_fit_results");
    std::fs::create_dir_all(&output_dir)?;

    for (gas, result) in ["CO2", "N2"].iter().zip(fit_batch(&requests)) {
        let result = result?;
        println!("{} fit: {}", gas, result.parameters);
        println!("  R² = {:.4}, iterations = {}", result.r_squared, result.iterations);
        if let Some(errors) = result.standard_errors() {
            println!("  standard errors: {:.3e}", errors);
        }

        let path = output_dir.join(format!("{}_fit_results.csv", gas));
        let record = FitRecord::from_result(&result);
        record.write_csv(BufWriter::new(File::create(&path)?))?;
        println!("  saved to {}\n", path.display());
    }

    Ok(())
}
