//! Feature standardization.
//!
//! [`StandardScaler`] transforms each column to zero mean and unit variance
//! using statistics captured at fit time. It also records the ordered column
//! names it was fitted on, which makes the persisted scaler the canonical
//! schema for inference: encoded input is aligned to
//! [`StandardScaler::expected_columns`] before being transformed.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::dataset::FeatureFrame;
use crate::error::{Result, TarifaError};

/// Columns with (population) standard deviation at or below this are left
/// unscaled: the standardized value is just the centered value.
const MIN_STD: f64 = 1e-12;

/// Standardizes features by removing the mean and scaling to unit variance.
///
/// The standard score of a sample x is `z = (x - mean) / std`, computed per
/// column with the population standard deviation (divide by n, like sklearn).
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use tarifa::dataset::FeatureFrame;
/// use tarifa::preprocessing::StandardScaler;
///
/// let frame = FeatureFrame::new(
///     vec!["x".to_string()],
///     array![[1.0], [2.0], [3.0]],
/// )
/// .unwrap();
///
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&frame).unwrap();
/// assert!(scaled.column(0).sum().abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Ordered column names seen during fit.
    feature_names: Option<Vec<String>>,
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f64>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f64>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new, unfitted `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            feature_names: None,
            mean: None,
            std: None,
        }
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Returns the ordered column names captured at fit time.
    ///
    /// This is the schema inference must align encoded input against.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted.
    pub fn expected_columns(&self) -> Result<&[String]> {
        self.feature_names
            .as_deref()
            .ok_or(TarifaError::NotFitted { what: "scaler" })
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f64] {
        self.mean
            .as_deref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f64] {
        self.std
            .as_deref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Computes per-column mean and standard deviation, recording the
    /// frame's column names as the expected schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame has zero rows.
    pub fn fit(&mut self, frame: &FeatureFrame) -> Result<()> {
        let x = frame.matrix();
        let (n_samples, n_features) = x.dim();

        if n_samples == 0 {
            return Err(TarifaError::InvalidParameter {
                param: "n_samples",
                value: "0".to_string(),
                constraint: "cannot fit a scaler with zero samples",
            });
        }

        let mut mean = vec![0.0; n_features];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..n_samples {
                sum += x[[i, j]];
            }
            *mean_j = sum / n_samples as f64;
        }

        let mut std = vec![0.0; n_features];
        for (j, std_j) in std.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for i in 0..n_samples {
                let diff = x[[i, j]] - mean[j];
                sum_sq += diff * diff;
            }
            // Population std (divide by n, not n-1), matching sklearn.
            *std_j = (sum_sq / n_samples as f64).sqrt();
        }

        self.feature_names = Some(frame.columns().to_vec());
        self.mean = Some(mean);
        self.std = Some(std);

        Ok(())
    }

    /// Standardizes the data using the fitted statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or the matrix width
    /// doesn't match the fitted feature count.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or(TarifaError::NotFitted { what: "scaler" })?;
        let std = self
            .std
            .as_ref()
            .ok_or(TarifaError::NotFitted { what: "scaler" })?;

        let (n_samples, n_features) = x.dim();
        if n_features != mean.len() {
            return Err(TarifaError::DimensionMismatch {
                expected: format!("{} features", mean.len()),
                actual: format!("{n_features} features"),
            });
        }

        let mut result = Array2::zeros((n_samples, n_features));
        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x[[i, j]] - mean[j];
                if std[j] > MIN_STD {
                    val /= std[j];
                }
                result[[i, j]] = val;
            }
        }

        Ok(result)
    }

    /// Fits the scaler and transforms the frame in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit_transform(&mut self, frame: &FeatureFrame) -> Result<Array2<f64>> {
        self.fit(frame)?;
        self.transform(frame.matrix())
    }

    /// Saves the fitted scaler as a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is unfitted or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if !self.is_fitted() {
            return Err(TarifaError::NotFitted { what: "scaler" });
        }
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Loads a fitted scaler from a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, the JSON is corrupt, or the
    /// artifact describes an unfitted scaler.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let scaler: Self = serde_json::from_reader(BufReader::new(file))?;
        if !scaler.is_fitted() || scaler.feature_names.is_none() || scaler.std.is_none() {
            return Err(TarifaError::NotFitted { what: "loaded scaler" });
        }
        Ok(scaler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn frame(columns: &[&str], data: Array2<f64>) -> FeatureFrame {
        FeatureFrame::new(columns.iter().map(|c| (*c).to_string()).collect(), data)
            .expect("matching width")
    }

    #[test]
    fn test_fit_captures_mean_std_and_names() {
        let f = frame(&["a", "b"], array![[0.0, 10.0], [2.0, 30.0]]);
        let mut scaler = StandardScaler::new();
        scaler.fit(&f).expect("fit succeeds");

        assert_eq!(
            scaler.expected_columns().expect("fitted"),
            ["a".to_string(), "b".to_string()].as_slice()
        );
        assert_abs_diff_eq!(scaler.mean()[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.mean()[1], 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.std()[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.std()[1], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_standardizes_columns() {
        let f = frame(&["a"], array![[1.0], [2.0], [3.0]]);
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&f).expect("fit_transform succeeds");

        let mean: f64 = scaled.column(0).sum() / 3.0;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-12);
        let var: f64 = scaled.column(0).iter().map(|v| v * v).sum::<f64>() / 3.0;
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_column_is_centered_not_scaled() {
        let f = frame(&["a"], array![[5.0], [5.0], [5.0]]);
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&f).expect("fit_transform succeeds");
        for &v in scaled.column(0).iter() {
            assert_abs_diff_eq!(v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_transform_rejects_width_mismatch() {
        let f = frame(&["a", "b"], array![[1.0, 2.0], [3.0, 4.0]]);
        let mut scaler = StandardScaler::new();
        scaler.fit(&f).expect("fit succeeds");

        let narrow = array![[1.0]];
        assert!(matches!(
            scaler.transform(&narrow),
            Err(TarifaError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_unfitted_transform_errors() {
        let scaler = StandardScaler::new();
        let x = array![[1.0]];
        assert!(matches!(
            scaler.transform(&x),
            Err(TarifaError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_fit_zero_rows_errors() {
        let f = frame(&["a"], Array2::zeros((0, 1)));
        let mut scaler = StandardScaler::new();
        assert!(scaler.fit(&f).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scaler.json");

        let f = frame(&["a", "b"], array![[0.0, 10.0], [2.0, 30.0]]);
        let mut scaler = StandardScaler::new();
        scaler.fit(&f).expect("fit succeeds");
        scaler.save(&path).expect("save succeeds");

        let loaded = StandardScaler::load(&path).expect("load succeeds");
        assert_eq!(loaded.expected_columns().expect("fitted"), scaler.expected_columns().expect("fitted"));
        assert_eq!(loaded.mean(), scaler.mean());
        assert_eq!(loaded.std(), scaler.std());
    }

    #[test]
    fn test_save_unfitted_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scaler = StandardScaler::new();
        assert!(scaler.save(dir.path().join("scaler.json")).is_err());
    }

    #[test]
    fn test_load_unfitted_artifact_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scaler.json");
        std::fs::write(
            &path,
            r#"{"feature_names":null,"mean":null,"std":null}"#,
        )
        .expect("write artifact");
        assert!(matches!(
            StandardScaler::load(&path),
            Err(TarifaError::NotFitted { .. })
        ));
    }
}
