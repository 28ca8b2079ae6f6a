//! Evaluation metrics for regression models.

use ndarray::Array1;

/// Computes the coefficient of determination (R²).
///
/// R² = 1 - (`SS_res` / `SS_tot`)
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use tarifa::metrics::r_squared;
///
/// let y_true = Array1::from_vec(vec![3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Array1::from_vec(vec![2.5, 0.0, 2.0, 8.0]);
/// assert!(r_squared(&y_pred, &y_true) > 0.9);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths.
#[must_use]
pub fn r_squared(y_pred: &Array1<f64>, y_true: &Array1<f64>) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");

    let y_mean = y_true.sum() / y_true.len() as f64;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - y_mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return 0.0;
    }

    1.0 - (ss_res / ss_tot)
}

/// Computes the Mean Squared Error (MSE).
///
/// MSE = (1/n) * `Σ(y_true - y_pred)²`
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &Array1<f64>, y_true: &Array1<f64>) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let n = y_true.len() as f64;
    let sum_sq_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    sum_sq_error / n
}

/// Computes the Mean Absolute Error (MAE).
///
/// MAE = (1/n) * `Σ|y_true - y_pred|`
///
/// # Examples
///
/// ```
/// use ndarray::Array1;
/// use tarifa::metrics::mae;
///
/// let y_true = Array1::from_vec(vec![3.0, -0.5, 2.0, 7.0]);
/// let y_pred = Array1::from_vec(vec![2.5, 0.0, 2.0, 8.0]);
/// assert!(mae(&y_pred, &y_true) < 1.0);
/// ```
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn mae(y_pred: &Array1<f64>, y_true: &Array1<f64>) -> f64 {
    assert_eq!(y_pred.len(), y_true.len(), "Vectors must have same length");
    assert!(!y_true.is_empty(), "Vectors cannot be empty");

    let n = y_true.len() as f64;
    let sum_abs_error: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum();

    sum_abs_error / n
}

/// Computes the Root Mean Squared Error (RMSE).
///
/// RMSE = sqrt(MSE)
///
/// # Panics
///
/// Panics if vectors have different lengths or are empty.
#[must_use]
pub fn rmse(y_pred: &Array1<f64>, y_true: &Array1<f64>) -> f64 {
    mse(y_pred, y_true).sqrt()
}
