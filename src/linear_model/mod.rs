//! Linear models for regression.
//!
//! Includes Ordinary Least Squares (OLS) linear regression.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TarifaError};
use crate::metrics::r_squared;

/// Singular values at or below `eps * max_singular_value` are treated as
/// zero by the least-squares solve.
const SVD_EPS: f64 = 1e-10;

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed and predicted targets:
///
/// ```text
/// y = X β + ε
/// ```
///
/// # Solver
///
/// `β` is found by SVD-based least squares with a singular-value cutoff,
/// which yields the minimum-norm solution on rank-deficient designs. Full
/// one-hot encoding makes each categorical's indicator block sum to one, so
/// the design matrix here is rank-deficient by construction and normal
/// equations would fail.
///
/// # Examples
///
/// ```
/// use ndarray::{array, Array1};
/// use tarifa::linear_model::LinearRegression;
///
/// // y = 2x + 1
/// let x = array![[1.0], [2.0], [3.0], [4.0]];
/// let y = Array1::from_vec(vec![3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// let predictions = model.predict(&x).unwrap();
/// assert!((predictions[0] - 3.0).abs() < 1e-6);
/// assert!(model.score(&x, &y).unwrap() > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vec<f64>>,
    /// Intercept (bias) term.
    intercept: f64,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns the coefficients (excluding intercept).
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        self.coefficients
            .as_deref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Fits the model by SVD least squares.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match, if there are zero
    /// samples, or if the solve fails.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let (n_samples, n_features) = x.dim();

        if n_samples != y.len() {
            return Err(TarifaError::DimensionMismatch {
                expected: format!("{n_samples} targets"),
                actual: format!("{} targets", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(TarifaError::InvalidParameter {
                param: "n_samples",
                value: "0".to_string(),
                constraint: "cannot fit with zero samples",
            });
        }

        let n_cols = if self.fit_intercept {
            n_features + 1
        } else {
            n_features
        };

        let mut design = DMatrix::<f64>::zeros(n_samples, n_cols);
        for i in 0..n_samples {
            let offset = if self.fit_intercept {
                design[(i, 0)] = 1.0;
                1
            } else {
                0
            };
            for j in 0..n_features {
                design[(i, j + offset)] = x[[i, j]];
            }
        }
        let target = DVector::from_iterator(n_samples, y.iter().copied());

        let svd = design.svd(true, true);
        let beta = svd.solve(&target, SVD_EPS).map_err(TarifaError::Solve)?;

        if self.fit_intercept {
            self.intercept = beta[0];
            self.coefficients = Some((1..n_cols).map(|j| beta[j]).collect());
        } else {
            self.intercept = 0.0;
            self.coefficients = Some((0..n_cols).map(|j| beta[j]).collect());
        }

        Ok(())
    }

    /// Predicts target values for input data.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or the matrix width
    /// doesn't match the coefficient count.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_deref()
            .ok_or(TarifaError::NotFitted { what: "model" })?;

        if x.ncols() != coefficients.len() {
            return Err(TarifaError::DimensionMismatch {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        let mut predictions = x.dot(&ArrayView1::from(coefficients));
        predictions += self.intercept;
        Ok(predictions)
    }

    /// Computes the R² score on the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails.
    pub fn score(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
        let y_pred = self.predict(x)?;
        Ok(r_squared(&y_pred, y))
    }

    /// Saves the fitted model as a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is unfitted or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if !self.is_fitted() {
            return Err(TarifaError::NotFitted { what: "model" });
        }
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Loads a fitted model from a JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, the JSON is corrupt, or the
    /// artifact describes an unfitted model.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let model: Self = serde_json::from_reader(BufReader::new(file))?;
        if !model.is_fitted() {
            return Err(TarifaError::NotFitted { what: "loaded model" });
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_new_unfitted() {
        let model = LinearRegression::new();
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_simple_regression() {
        // y = 2x + 1
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = Array1::from_vec(vec![3.0, 5.0, 7.0, 9.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit succeeds");

        assert!(model.is_fitted());
        assert_abs_diff_eq!(model.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.intercept(), 1.0, epsilon = 1e-6);

        let predictions = model.predict(&x).expect("predict succeeds");
        for i in 0..4 {
            assert_abs_diff_eq!(predictions[i], y[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_multivariate_regression() {
        // y = 1 + 2*x1 + 3*x2
        let x = array![[1.0, 1.0], [2.0, 1.0], [1.0, 2.0], [2.0, 2.0]];
        let y = Array1::from_vec(vec![6.0, 8.0, 9.0, 11.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit succeeds");

        assert_abs_diff_eq!(model.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.coefficients()[1], 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.intercept(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_no_intercept() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = Array1::from_vec(vec![2.0, 4.0, 6.0, 8.0]);

        let mut model = LinearRegression::new().with_intercept(false);
        model.fit(&x, &y).expect("fit succeeds");

        assert_abs_diff_eq!(model.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(model.intercept(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rank_deficient_design_still_predicts() {
        // Two identical columns: exactly collinear, the one-hot regime.
        let x = array![
            [1.0, 1.0],
            [2.0, 2.0],
            [3.0, 3.0],
            [4.0, 4.0],
            [5.0, 5.0]
        ];
        let y = Array1::from_vec(vec![3.0, 5.0, 7.0, 9.0, 11.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit succeeds on rank-deficient design");

        let predictions = model.predict(&x).expect("predict succeeds");
        for i in 0..5 {
            assert_abs_diff_eq!(predictions[i], y[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_dimension_mismatch_error() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = Array1::from_vec(vec![1.0, 2.0]);

        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_predict_unfitted_errors() {
        let model = LinearRegression::new();
        let x = array![[1.0]];
        assert!(matches!(
            model.predict(&x),
            Err(TarifaError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_predict_width_mismatch_errors() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = Array1::from_vec(vec![2.0, 4.0, 6.0]);
        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit succeeds");

        let wide = array![[1.0, 2.0]];
        assert!(matches!(
            model.predict(&wide),
            Err(TarifaError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");

        let x = array![[1.0], [2.0], [3.0]];
        let y = Array1::from_vec(vec![3.0, 5.0, 7.0]);
        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit succeeds");
        model.save(&path).expect("save succeeds");

        let loaded = LinearRegression::load(&path).expect("load succeeds");
        assert_eq!(loaded.coefficients(), model.coefficients());
        assert_abs_diff_eq!(loaded.intercept(), model.intercept(), epsilon = 1e-15);
    }

    #[test]
    fn test_save_unfitted_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model = LinearRegression::new();
        assert!(model.save(dir.path().join("model.json")).is_err());
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(LinearRegression::load("does/not/exist.json").is_err());
    }
}
