//! Dict vectorizer: flat records -> numeric matrix
//!
//! Encoding per attribute value:
//! - integer / float → one column named by the key, holding the value
//! - boolean → one column named by the key, `1.0` or `0.0`
//! - string → one-hot column `key=value`, `1.0` when present
//!
//! Columns are sorted by name. Values never seen during `fit` are ignored by
//! `transform`, and absent keys encode as `0.0`.

use crate::dataset::Dataset;
use crate::record::{FlatRecord, Scalar};
use crate::{Error, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Name of the label column in exported record batches.
pub const LABEL_COLUMN: &str = "__label";

fn encode(key: &str, value: &Scalar) -> (String, f64) {
    match value {
        Scalar::Text(text) => (format!("{key}={text}"), 1.0),
        Scalar::Bool(flag) => (key.to_string(), if *flag { 1.0 } else { 0.0 }),
        Scalar::Integer(_) | Scalar::Float(_) => {
            (key.to_string(), value.as_f64().unwrap_or_default())
        }
    }
}

/// Learns a column layout from records and encodes records against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictVectorizer {
    index: BTreeMap<String, usize>,
    columns: Vec<String>,
}

impl DictVectorizer {
    /// Learn the column layout of `records`.
    #[must_use]
    pub fn fit(records: &[FlatRecord]) -> Self {
        let names: BTreeSet<String> = records
            .iter()
            .flat_map(|record| {
                record
                    .attributes()
                    .iter()
                    .map(|(key, value)| encode(key, value).0)
            })
            .collect();
        let columns: Vec<String> = names.into_iter().collect();
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { index, columns }
    }

    /// Learn the layout of a dataset and encode it in one step.
    #[must_use]
    pub fn fit_transform(dataset: &Dataset) -> (Self, FeatureMatrix) {
        let vectorizer = Self::fit(dataset.data());
        let matrix = vectorizer.transform(dataset);
        (vectorizer, matrix)
    }

    /// Column names, sorted.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Encode one record.
    #[must_use]
    pub fn transform_record(&self, record: &FlatRecord) -> Vec<f64> {
        let mut row = vec![0.0; self.columns.len()];
        for (key, value) in record.attributes() {
            let (name, x) = encode(key, value);
            if let Some(&column) = self.index.get(&name) {
                row[column] = x;
            }
        }
        row
    }

    /// Encode a dataset; labels are carried in their display form.
    #[must_use]
    pub fn transform(&self, dataset: &Dataset) -> FeatureMatrix {
        FeatureMatrix {
            feature_names: self.columns.clone(),
            rows: dataset
                .data()
                .iter()
                .map(|record| self.transform_record(record))
                .collect(),
            labels: dataset.labels().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Dense numeric features with their labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
    labels: Vec<String>,
}

impl FeatureMatrix {
    /// Build a matrix from raw parts.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IntegrityViolation`] if rows and labels differ in
    /// length, or [`Error::InvalidInput`] if a row has the wrong width.
    pub fn new(
        feature_names: Vec<String>,
        rows: Vec<Vec<f64>>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(Error::IntegrityViolation {
                features: rows.len(),
                labels: labels.len(),
            });
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != feature_names.len())
        {
            return Err(Error::InvalidInput(format!(
                "Row {i} has {} values, expected {}",
                row.len(),
                feature_names.len()
            )));
        }
        Ok(Self {
            feature_names,
            rows,
            labels,
        })
    }

    /// Column names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Feature rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Labels, one per row.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Rows at `indices`, in the given order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i].clone()).collect(),
        }
    }

    /// Export as an Arrow batch: one `Float64` column per feature plus a
    /// `Utf8` label column.
    ///
    /// # Errors
    ///
    /// Returns error if a feature is named like the label column or Arrow
    /// rejects the batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        if self.feature_names.iter().any(|name| name == LABEL_COLUMN) {
            return Err(Error::InvalidInput(format!(
                "Feature name '{LABEL_COLUMN}' is reserved for labels"
            )));
        }

        let mut fields: Vec<Field> = self
            .feature_names
            .iter()
            .map(|name| Field::new(name, DataType::Float64, false))
            .collect();
        fields.push(Field::new(LABEL_COLUMN, DataType::Utf8, false));

        let mut columns: Vec<ArrayRef> = (0..self.n_features())
            .map(|column| {
                Arc::new(Float64Array::from_iter_values(
                    self.rows.iter().map(|row| row[column]),
                )) as ArrayRef
            })
            .collect();
        columns.push(Arc::new(StringArray::from_iter_values(&self.labels)));

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }

    /// Rebuild a matrix from a batch written by [`Self::to_record_batch`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageError`] if the label column is missing or a
    /// column has an unexpected type.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut feature_names = Vec::new();
        let mut feature_columns = Vec::new();
        let mut labels = None;

        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            if field.name() == LABEL_COLUMN {
                let array = column
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .ok_or_else(|| {
                        Error::StorageError("Label column is not Utf8".to_string())
                    })?;
                labels = Some(
                    (0..array.len())
                        .map(|i| array.value(i).to_string())
                        .collect::<Vec<_>>(),
                );
            } else {
                let array = column
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| {
                        Error::StorageError(format!(
                            "Feature column '{}' is not Float64",
                            field.name()
                        ))
                    })?;
                feature_names.push(field.name().clone());
                feature_columns.push(array.clone());
            }
        }

        let labels = labels.ok_or_else(|| {
            Error::StorageError(format!("Missing '{LABEL_COLUMN}' column"))
        })?;
        let rows = (0..batch.num_rows())
            .map(|row| feature_columns.iter().map(|c| c.value(row)).collect())
            .collect();
        Self::new(feature_names, rows, labels)
    }
}
