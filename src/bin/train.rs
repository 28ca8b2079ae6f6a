//! One-shot training entry point.
//!
//! Reads the feature table from the default data path, trains the price
//! model, prints the holdout metrics, and persists the model and scaler
//! artifacts. Paths are fixed; training failures terminate the run.

use tarifa::train::{train, TrainConfig};

fn main() {
    tracing_subscriber::fmt().init();

    let config = TrainConfig::default();
    match train(&config) {
        Ok(report) => {
            println!("Mean absolute error (MAE): {}", report.mae);
            println!("Root mean squared error (RMSE): {}", report.rmse);
            println!(
                "Persisted model to {} and scaler to {}",
                report.model_path.display(),
                report.scaler_path.display()
            );
        }
        Err(e) => {
            eprintln!("training failed: {e}");
            std::process::exit(1);
        }
    }
}
