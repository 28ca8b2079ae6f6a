//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use tarifa::prelude::*;
//! ```

pub use crate::dataset::{read_listings, FeatureFrame, FeatureTable, Listing};
pub use crate::error::{Result, TarifaError};
pub use crate::inference::{load_artifacts, Predictor};
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::{mae, mse, r_squared, rmse};
pub use crate::model_selection::train_test_split;
pub use crate::preprocessing::StandardScaler;
pub use crate::train::{train, TrainConfig, TrainReport};
