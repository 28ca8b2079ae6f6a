//! Inference over persisted artifacts.
//!
//! Every public operation here converts failure into an absence sentinel
//! (`None`) after logging, instead of propagating: callers must check for
//! `None` and skip further processing for that item. Internal stages stay
//! `Result`-based and are caught at the public boundary.

use std::path::Path;

use serde_json::{Map, Value};

use crate::dataset::{FeatureTable, Listing};
use crate::error::Result;
use crate::linear_model::LinearRegression;
use crate::preprocessing::StandardScaler;

/// A loaded model/scaler pair ready to score listings.
///
/// Obtain one with [`load_artifacts`] (sentinel-style) or
/// [`Predictor::load`] (error-propagating).
#[derive(Debug, Clone)]
pub struct Predictor {
    model: LinearRegression,
    scaler: StandardScaler,
}

/// Loads the model and scaler artifacts, returning `None` on any failure.
///
/// Missing files, corrupt JSON, and unfitted artifacts are all reported via
/// a log message and collapse to `None`; callers must check before
/// predicting.
pub fn load_artifacts<P: AsRef<Path>, Q: AsRef<Path>>(
    model_path: P,
    scaler_path: Q,
) -> Option<Predictor> {
    match Predictor::load(model_path, scaler_path) {
        Ok(predictor) => Some(predictor),
        Err(e) => {
            tracing::error!(error = %e, "failed to load model artifacts");
            None
        }
    }
}

impl Predictor {
    /// Builds a predictor from an already-fitted model and scaler.
    ///
    /// # Errors
    ///
    /// Returns an error if either is unfitted.
    pub fn new(model: LinearRegression, scaler: StandardScaler) -> Result<Self> {
        // Force the fitted-state checks shared with the load path.
        let _ = scaler.expected_columns()?;
        if !model.is_fitted() {
            return Err(crate::error::TarifaError::NotFitted { what: "model" });
        }
        Ok(Self { model, scaler })
    }

    /// Loads the model and scaler artifacts from the given paths.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing or corrupt, or if either
    /// artifact is unfitted.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(model_path: P, scaler_path: Q) -> Result<Self> {
        let model = LinearRegression::load(model_path)?;
        let scaler = StandardScaler::load(scaler_path)?;
        Self::new(model, scaler)
    }

    /// Predicts a price for each listing row, in input order.
    ///
    /// The rows are one-hot encoded, aligned to the scaler's training-time
    /// column schema (zero-filling categories absent from this batch,
    /// silently dropping categories never seen during training),
    /// standardized, and fed to the model.
    ///
    /// Returns `None` (after logging) if any stage fails; no partial
    /// results are surfaced.
    pub fn predict_batch(&self, listings: &[Listing]) -> Option<Vec<f64>> {
        let table = FeatureTable::from_listings(listings);
        match self.predict_table(&table) {
            Ok(predictions) => Some(predictions),
            Err(e) => {
                tracing::error!(error = %e, "batch prediction failed");
                None
            }
        }
    }

    /// Predicts a price for a single JSON record.
    ///
    /// The record is restricted to the known input columns (extra keys are
    /// ignored; absent known fields are zero-filled during alignment) and
    /// then goes through the same path as a one-row batch.
    ///
    /// Returns `None` (after logging) if a field is mistyped or any
    /// downstream stage fails.
    pub fn predict_record(&self, record: &Map<String, Value>) -> Option<f64> {
        let result = FeatureTable::from_record(record)
            .and_then(|table| self.predict_table(&table));
        match result {
            Ok(predictions) => predictions.first().copied(),
            Err(e) => {
                tracing::error!(error = %e, "record prediction failed");
                None
            }
        }
    }

    /// Encode, align, standardize, predict.
    fn predict_table(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        let aligned = table.one_hot().align_to(self.scaler.expected_columns()?);
        let scaled = self.scaler.transform(aligned.matrix())?;
        let predictions = self.model.predict(&scaled)?;
        Ok(predictions.to_vec())
    }
}
