//! Listing feature tables: CSV ingestion, one-hot encoding, and column
//! alignment.
//!
//! The input column set is a fixed external contract (see [`NUMERIC_COLUMNS`]
//! and [`CATEGORICAL_COLUMNS`]). One-hot encoding is data-dependent: the
//! indicator columns it produces are exactly the categories present in the
//! data being encoded, so the encoded column set differs between training
//! time and inference time unless explicitly reconciled. That reconciliation
//! is [`FeatureFrame::align_to`].

use std::collections::BTreeSet;
use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, TarifaError};

/// Numeric input columns, in encoding order.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "latitude",
    "longitude",
    "minimo_noites",
    "reviews_por_mes",
    "numero_de_reviews",
    "disponibilidade_365",
];

/// Categorical input columns, in encoding order.
pub const CATEGORICAL_COLUMNS: [&str; 3] = ["room_type", "bairro", "bairro_group"];

/// Training target column.
pub const TARGET_COLUMN: &str = "price";

/// One listing row from the feature table.
///
/// Field names match the CSV header contract exactly; columns not listed
/// here are ignored when deserializing. `price` is present in training data
/// and optional (and unused) at inference time.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub latitude: f64,
    pub longitude: f64,
    pub minimo_noites: f64,
    pub reviews_por_mes: f64,
    pub numero_de_reviews: f64,
    pub disponibilidade_365: f64,
    pub room_type: String,
    pub bairro: String,
    pub bairro_group: String,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Reads all listing rows from a delimited table file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any row fails to
/// deserialize against the fixed column contract.
pub fn read_listings<P: AsRef<Path>>(path: P) -> Result<Vec<Listing>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut listings = Vec::new();
    for row in reader.deserialize() {
        listings.push(row?);
    }
    Ok(listings)
}

/// A pre-encoding feature table with named numeric and categorical columns.
///
/// This is the selected input column set before one-hot expansion. Construct
/// it from a batch of [`Listing`] rows or from a single JSON object map, then
/// call [`FeatureTable::one_hot`] to obtain a numeric [`FeatureFrame`].
#[derive(Debug, Clone)]
pub struct FeatureTable {
    numeric: Vec<(String, Vec<f64>)>,
    categorical: Vec<(String, Vec<String>)>,
    n_rows: usize,
}

impl FeatureTable {
    /// Builds a table from listing rows, selecting the fixed input columns.
    #[must_use]
    pub fn from_listings(listings: &[Listing]) -> Self {
        let numeric = vec![
            (
                "latitude".to_string(),
                listings.iter().map(|l| l.latitude).collect(),
            ),
            (
                "longitude".to_string(),
                listings.iter().map(|l| l.longitude).collect(),
            ),
            (
                "minimo_noites".to_string(),
                listings.iter().map(|l| l.minimo_noites).collect(),
            ),
            (
                "reviews_por_mes".to_string(),
                listings.iter().map(|l| l.reviews_por_mes).collect(),
            ),
            (
                "numero_de_reviews".to_string(),
                listings.iter().map(|l| l.numero_de_reviews).collect(),
            ),
            (
                "disponibilidade_365".to_string(),
                listings.iter().map(|l| l.disponibilidade_365).collect(),
            ),
        ];
        let categorical = vec![
            (
                "room_type".to_string(),
                listings.iter().map(|l| l.room_type.clone()).collect(),
            ),
            (
                "bairro".to_string(),
                listings.iter().map(|l| l.bairro.clone()).collect(),
            ),
            (
                "bairro_group".to_string(),
                listings.iter().map(|l| l.bairro_group.clone()).collect(),
            ),
        ];
        Self {
            numeric,
            categorical,
            n_rows: listings.len(),
        }
    }

    /// Builds a one-row table from a JSON object map.
    ///
    /// Only the known input columns are taken from the map; extra keys are
    /// ignored. A known key that is absent (or null) is simply omitted and
    /// will be zero-filled later during alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if a known field is present but has the wrong type
    /// (a non-numeric value in a numeric column, a non-string value in a
    /// categorical column).
    pub fn from_record(record: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut numeric = Vec::new();
        for name in NUMERIC_COLUMNS {
            match record.get(name) {
                None | Some(Value::Null) => {}
                Some(value) => {
                    let v = value.as_f64().ok_or_else(|| {
                        TarifaError::InvalidRecord(format!(
                            "field `{name}` must be numeric, got {value}"
                        ))
                    })?;
                    numeric.push((name.to_string(), vec![v]));
                }
            }
        }

        let mut categorical = Vec::new();
        for name in CATEGORICAL_COLUMNS {
            match record.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => categorical.push((name.to_string(), vec![s.clone()])),
                Some(other) => {
                    return Err(TarifaError::InvalidRecord(format!(
                        "field `{name}` must be a string, got {other}"
                    )));
                }
            }
        }

        Ok(Self {
            numeric,
            categorical,
            n_rows: 1,
        })
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// One-hot encodes the categorical columns.
    ///
    /// The result holds the numeric columns first, in declaration order,
    /// followed by one `{column}_{category}` indicator column per category
    /// observed in the data, categories sorted within each source column.
    /// No category is dropped.
    ///
    /// The produced column set depends on which categories appear in this
    /// particular table; align against a training-time schema before feeding
    /// it to a fitted scaler or model.
    #[must_use]
    pub fn one_hot(&self) -> FeatureFrame {
        let mut columns = Vec::new();
        let mut column_data: Vec<Vec<f64>> = Vec::new();

        for (name, values) in &self.numeric {
            columns.push(name.clone());
            column_data.push(values.clone());
        }

        for (name, values) in &self.categorical {
            let categories: BTreeSet<&str> = values.iter().map(String::as_str).collect();
            for category in categories {
                columns.push(format!("{name}_{category}"));
                column_data.push(
                    values
                        .iter()
                        .map(|v| if v == category { 1.0 } else { 0.0 })
                        .collect(),
                );
            }
        }

        let mut data = Array2::zeros((self.n_rows, columns.len()));
        for (j, col) in column_data.iter().enumerate() {
            for (i, &v) in col.iter().enumerate() {
                data[[i, j]] = v;
            }
        }

        FeatureFrame { columns, data }
    }
}

/// A numeric feature table with named columns, post one-hot encoding.
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    columns: Vec<String>,
    data: Array2<f64>,
}

impl FeatureFrame {
    /// Creates a frame from column names and a matching matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of names doesn't match the matrix
    /// width.
    pub fn new(columns: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if columns.len() != data.ncols() {
            return Err(TarifaError::DimensionMismatch {
                expected: format!("{} columns", columns.len()),
                actual: format!("matrix with {} columns", data.ncols()),
            });
        }
        Ok(Self { columns, data })
    }

    /// Returns the column names, in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the backing matrix (rows are samples).
    #[must_use]
    pub fn matrix(&self) -> &Array2<f64> {
        &self.data
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    /// Reconciles this frame against an expected column list.
    ///
    /// The result has exactly the `expected` columns, in that order:
    ///
    /// - expected columns absent here are added zero-filled (categories seen
    ///   at training time but not present in this input, or omitted numeric
    ///   fields on the single-record path);
    /// - columns present here but not expected are discarded without report
    ///   (categories never seen during training).
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::array;
    /// use tarifa::dataset::FeatureFrame;
    ///
    /// let frame = FeatureFrame::new(
    ///     vec!["a".to_string(), "stray".to_string()],
    ///     array![[1.0, 9.0], [2.0, 9.0]],
    /// )
    /// .unwrap();
    ///
    /// let aligned = frame.align_to(&["a".to_string(), "b".to_string()]);
    /// assert_eq!(aligned.columns(), ["a".to_string(), "b".to_string()]);
    /// assert_eq!(aligned.matrix()[[0, 1]], 0.0);
    /// ```
    #[must_use]
    pub fn align_to(&self, expected: &[String]) -> FeatureFrame {
        let mut data = Array2::zeros((self.data.nrows(), expected.len()));
        for (j, name) in expected.iter().enumerate() {
            if let Some(src) = self.columns.iter().position(|c| c == name) {
                data.column_mut(j).assign(&self.data.column(src));
            }
        }
        FeatureFrame {
            columns: expected.to_vec(),
            data,
        }
    }
}
