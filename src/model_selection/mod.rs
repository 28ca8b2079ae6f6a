//! Train/test splitting.

use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, TarifaError};

/// Validates inputs for `train_test_split`, returning (n_train, n_test).
fn validate_split_inputs(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
) -> Result<(usize, usize)> {
    if test_size <= 0.0 || test_size >= 1.0 {
        return Err(TarifaError::InvalidParameter {
            param: "test_size",
            value: test_size.to_string(),
            constraint: "must be strictly between 0 and 1",
        });
    }

    let n_samples = x.nrows();
    if n_samples != y.len() {
        return Err(TarifaError::DimensionMismatch {
            expected: format!("{n_samples} targets"),
            actual: format!("{} targets", y.len()),
        });
    }

    let n_test = (n_samples as f64 * test_size).round() as usize;
    let n_train = n_samples - n_test;

    if n_test == 0 || n_train == 0 {
        return Err(TarifaError::InvalidParameter {
            param: "test_size",
            value: test_size.to_string(),
            constraint: "split would leave an empty train or test partition",
        });
    }

    Ok((n_train, n_test))
}

/// Shuffles sample indices, seeded when a random state is given.
fn shuffle_indices(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut indices: Vec<usize> = (0..n_samples).collect();

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    } else {
        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);
    }

    indices
}

/// Splits arrays into random train and test subsets.
///
/// Returns `(x_train, x_test, y_train, y_test)`. Passing a fixed
/// `random_state` makes the split reproducible.
///
/// # Example
///
/// ```
/// use ndarray::{Array1, Array2};
/// use tarifa::model_selection::train_test_split;
///
/// let x = Array2::from_shape_fn((10, 2), |(i, j)| (i * 2 + j) as f64);
/// let y = Array1::from_shape_fn(10, |i| i as f64);
///
/// let (x_train, x_test, y_train, y_test) =
///     train_test_split(&x, &y, 0.3, Some(0)).unwrap();
/// assert_eq!(x_train.nrows(), 7);
/// assert_eq!(x_test.nrows(), 3);
/// assert_eq!(y_train.len(), 7);
/// assert_eq!(y_test.len(), 3);
/// ```
///
/// # Errors
///
/// Returns an error if `test_size` is outside (0, 1), if `x` and `y`
/// disagree on sample count, or if either partition would be empty.
#[allow(clippy::type_complexity)]
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    random_state: Option<u64>,
) -> Result<(Array2<f64>, Array2<f64>, Array1<f64>, Array1<f64>)> {
    let (n_train, _) = validate_split_inputs(x, y, test_size)?;

    let indices = shuffle_indices(x.nrows(), random_state);
    let train_indices = &indices[..n_train];
    let test_indices = &indices[n_train..];

    let x_train = x.select(Axis(0), train_indices);
    let x_test = x.select(Axis(0), test_indices);
    let y_train = y.select(Axis(0), train_indices);
    let y_test = y.select(Axis(0), test_indices);

    Ok((x_train, x_test, y_train, y_test))
}
