//! Tarifa: listing price regression over tabular features.
//!
//! Trains an OLS price model from a listing feature table and scores new
//! listings from a CSV batch or a single JSON record. The persisted scaler
//! carries the encoded training-time column schema, and inference aligns
//! its data-dependent one-hot columns against that schema before scoring —
//! the one contract in this system that is easy to get silently wrong.
//!
//! # Quick start
//!
//! ```no_run
//! use tarifa::inference::load_artifacts;
//! use tarifa::train::{train, TrainConfig};
//!
//! let report = train(&TrainConfig::default()).expect("training failed");
//! println!("MAE {:.2}  RMSE {:.2}", report.mae, report.rmse);
//!
//! let predictor = load_artifacts(&report.model_path, &report.scaler_path)
//!     .expect("artifacts just written");
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: CSV ingestion, the fixed column contract, one-hot
//!   encoding, and column alignment
//! - [`preprocessing`]: standardization and the training-time schema
//! - [`model_selection`]: seeded train/test splitting
//! - [`linear_model`]: OLS regression
//! - [`metrics`]: MAE, MSE, RMSE, R²
//! - [`train`]: the training pipeline (fail-fast)
//! - [`inference`]: batch and single-record prediction (sentinel on failure)

pub mod dataset;
pub mod error;
pub mod inference;
pub mod linear_model;
pub mod metrics;
pub mod model_selection;
pub mod prelude;
pub mod preprocessing;
pub mod train;
