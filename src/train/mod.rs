//! Training pipeline: select, encode, split, standardize, fit, score,
//! persist.
//!
//! Training is fail-fast: any I/O, parse, or fit failure propagates as an
//! error and nothing is persisted. There is no gating on the holdout
//! metrics; a run that reaches the scoring step always persists.

use std::fs;
use std::path::PathBuf;

use ndarray::Array1;

use crate::dataset::{read_listings, FeatureFrame, FeatureTable, TARGET_COLUMN};
use crate::error::{Result, TarifaError};
use crate::linear_model::LinearRegression;
use crate::metrics;
use crate::model_selection::train_test_split;
use crate::preprocessing::StandardScaler;

/// Default location of the training feature table.
pub const DEFAULT_DATA_PATH: &str = "data/dados_transformados.csv";
/// Default directory for persisted artifacts.
pub const DEFAULT_MODEL_DIR: &str = "models";
/// Model artifact file name within the model directory.
pub const MODEL_FILE: &str = "model.json";
/// Scaler artifact file name within the model directory.
pub const SCALER_FILE: &str = "scaler.json";

/// Training run parameters.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Path to the training feature table (CSV with a `price` column).
    pub data_path: PathBuf,
    /// Directory the model and scaler artifacts are written to.
    pub model_dir: PathBuf,
    /// Fraction of rows held out for scoring, in (0, 1).
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            test_fraction: 0.3,
            seed: 0,
        }
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// Mean absolute error on the holdout partition.
    pub mae: f64,
    /// Root mean squared error on the holdout partition.
    pub rmse: f64,
    /// Rows in the training partition.
    pub n_train: usize,
    /// Rows in the holdout partition.
    pub n_test: usize,
    /// Encoded feature count (numeric + one-hot indicators).
    pub n_features: usize,
    /// Where the model artifact was written.
    pub model_path: PathBuf,
    /// Where the scaler artifact was written.
    pub scaler_path: PathBuf,
}

/// Trains a price model and persists the model and scaler artifacts.
///
/// Reads the feature table, one-hot encodes the categorical columns, splits
/// off a seeded holdout, standardizes on the training partition only, fits
/// an OLS regressor, scores MAE/RMSE on the holdout, and writes both
/// artifacts to `config.model_dir` (created if absent, overwritten
/// wholesale).
///
/// # Errors
///
/// Returns an error if the table cannot be read, a row is missing the
/// `price` target, the split parameters are invalid, or fitting or
/// persisting fails.
pub fn train(config: &TrainConfig) -> Result<TrainReport> {
    let listings = read_listings(&config.data_path)?;

    let mut targets = Vec::with_capacity(listings.len());
    for listing in &listings {
        targets.push(listing.price.ok_or_else(|| TarifaError::MissingColumn {
            name: TARGET_COLUMN.to_string(),
        })?);
    }
    let y = Array1::from_vec(targets);

    let frame = FeatureTable::from_listings(&listings).one_hot();
    let n_features = frame.columns().len();

    let (x_train, x_test, y_train, y_test) =
        train_test_split(frame.matrix(), &y, config.test_fraction, Some(config.seed))?;

    // The scaler is fit on the training partition only and records the
    // encoded column names as the schema inference will align against.
    let train_frame = FeatureFrame::new(frame.columns().to_vec(), x_train)?;
    let mut scaler = StandardScaler::new();
    let x_train_scaled = scaler.fit_transform(&train_frame)?;
    let x_test_scaled = scaler.transform(&x_test)?;

    let mut model = LinearRegression::new();
    model.fit(&x_train_scaled, &y_train)?;

    let y_pred = model.predict(&x_test_scaled)?;
    let mae = metrics::mae(&y_pred, &y_test);
    let rmse = metrics::rmse(&y_pred, &y_test);
    tracing::info!(
        mae,
        rmse,
        n_train = y_train.len(),
        n_test = y_test.len(),
        n_features,
        "holdout error"
    );

    fs::create_dir_all(&config.model_dir)?;
    let model_path = config.model_dir.join(MODEL_FILE);
    let scaler_path = config.model_dir.join(SCALER_FILE);
    model.save(&model_path)?;
    scaler.save(&scaler_path)?;

    Ok(TrainReport {
        mae,
        rmse,
        n_train: y_train.len(),
        n_test: y_test.len(),
        n_features,
        model_path,
        scaler_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    const HEADER: &str = "latitude,longitude,minimo_noites,reviews_por_mes,\
numero_de_reviews,disponibilidade_365,room_type,bairro,bairro_group,price";

    fn write_training_csv(path: &std::path::Path, n: usize) {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for i in 0..n {
            let room = if i % 2 == 0 { "Private room" } else { "Entire home/apt" };
            let bairro = if i % 3 == 0 { "Midtown" } else { "Harlem" };
            let price = 50.0 + 10.0 * (i % 5) as f64 + if i % 2 == 0 { 0.0 } else { 40.0 };
            writeln!(
                csv,
                "40.{i},-73.{i},{},0.{},{},{},{room},{bairro},Manhattan,{price}",
                1 + i % 4,
                1 + i % 9,
                i % 50,
                100 + i % 200,
            )
            .expect("write row");
        }
        std::fs::write(path, csv).expect("write csv");
    }

    #[test]
    fn test_train_persists_artifacts_and_reports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_path = dir.path().join("listings.csv");
        write_training_csv(&data_path, 30);

        let config = TrainConfig {
            data_path,
            model_dir: dir.path().join("models"),
            ..TrainConfig::default()
        };
        let report = train(&config).expect("training succeeds");

        assert!(report.mae.is_finite());
        assert!(report.rmse.is_finite());
        assert!(report.rmse >= report.mae);
        assert_eq!(report.n_train + report.n_test, 30);
        assert!(report.model_path.exists());
        assert!(report.scaler_path.exists());
    }

    #[test]
    fn test_train_is_deterministic_for_fixed_seed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_path = dir.path().join("listings.csv");
        write_training_csv(&data_path, 30);

        let config = TrainConfig {
            data_path,
            model_dir: dir.path().join("models"),
            ..TrainConfig::default()
        };
        let first = train(&config).expect("training succeeds");
        let second = train(&config).expect("training succeeds");
        assert_eq!(first.mae, second.mae);
        assert_eq!(first.rmse, second.rmse);
    }

    #[test]
    fn test_train_missing_target_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data_path = dir.path().join("listings.csv");
        let csv = "latitude,longitude,minimo_noites,reviews_por_mes,\
numero_de_reviews,disponibilidade_365,room_type,bairro,bairro_group\n\
40.7,-73.9,1,0.5,10,100,Private room,Midtown,Manhattan\n\
40.8,-73.8,2,0.7,20,200,Entire home/apt,Harlem,Manhattan\n";
        std::fs::write(&data_path, csv).expect("write csv");

        let config = TrainConfig {
            data_path,
            model_dir: dir.path().join("models"),
            ..TrainConfig::default()
        };
        assert!(matches!(
            train(&config),
            Err(TarifaError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_train_missing_file_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = TrainConfig {
            data_path: dir.path().join("nope.csv"),
            model_dir: dir.path().join("models"),
            ..TrainConfig::default()
        };
        assert!(train(&config).is_err());
    }
}
