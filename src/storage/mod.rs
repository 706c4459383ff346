//! Feature matrix storage (Arrow/Parquet)
//!
//! The JSON dataset is the hand-off between aggregation and classification.
//! Vectorized matrices can additionally be exported as Parquet so other
//! tools can train on exactly the columns a run used.
//!
//! Write pattern is append-only: a run appends whole batches and writes them
//! out once.

use crate::vectorize::FeatureMatrix;
use crate::{Error, Result};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;

/// Storage engine for feature matrix batches
pub struct StorageEngine {
    batches: Vec<RecordBatch>,
}

impl StorageEngine {
    /// Create a new storage engine from existing batches
    #[must_use]
    pub fn new(batches: Vec<RecordBatch>) -> Self {
        Self { batches }
    }

    /// Wrap a single feature matrix.
    ///
    /// # Errors
    ///
    /// Returns error if the matrix cannot be converted to an Arrow batch.
    pub fn from_matrix(matrix: &FeatureMatrix) -> Result<Self> {
        Ok(Self::new(vec![matrix.to_record_batch()?]))
    }

    /// Load batches from a Parquet file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::StorageError(format!("Failed to open Parquet file: {e}"))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            Error::StorageError(format!("Failed to parse Parquet file: {e}"))
        })?;

        let reader = builder.build().map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet reader: {e}"))
        })?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| {
                Error::StorageError(format!("Failed to read record batch: {e}"))
            })?;
            batches.push(batch);
        }

        Ok(Self { batches })
    }

    /// Write every batch to a Parquet file, creating parent directories.
    ///
    /// # Errors
    /// Returns error if there is nothing to write or the file cannot be
    /// written
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let Some(first) = self.batches.first() else {
            return Err(Error::StorageError("No batches to write".to_string()));
        };

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path).map_err(|e| {
            Error::StorageError(format!("Failed to create Parquet file: {e}"))
        })?;
        let mut writer = ArrowWriter::try_new(file, first.schema(), None)?;
        for batch in &self.batches {
            writer.write(batch)?;
        }
        writer.close()?;
        Ok(())
    }

    /// Get all record batches
    #[must_use]
    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Total rows across batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Append a batch
    ///
    /// # Errors
    ///
    /// Returns error if batch schema doesn't match existing batches
    pub fn append_batch(&mut self, batch: RecordBatch) -> Result<()> {
        if let Some(existing) = self.batches.first() {
            let existing_schema = existing.schema();
            if batch.schema() != existing_schema {
                return Err(Error::StorageError(format!(
                    "Schema mismatch: expected {:?}, got {:?}",
                    existing_schema,
                    batch.schema()
                )));
            }
        }

        self.batches.push(batch);
        Ok(())
    }

    /// Reassemble the stored batches into one feature matrix.
    ///
    /// # Errors
    ///
    /// Returns error if a batch was not produced by
    /// [`FeatureMatrix::to_record_batch`].
    pub fn to_matrix(&self) -> Result<FeatureMatrix> {
        let mut parts = self
            .batches
            .iter()
            .map(FeatureMatrix::from_record_batch);

        let Some(first) = parts.next().transpose()? else {
            return Ok(FeatureMatrix::default());
        };

        let feature_names = first.feature_names().to_vec();
        let mut rows = first.rows().to_vec();
        let mut labels = first.labels().to_vec();
        for part in parts {
            let part = part?;
            rows.extend_from_slice(part.rows());
            labels.extend_from_slice(part.labels());
        }
        FeatureMatrix::new(feature_names, rows, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(label: &str) -> FeatureMatrix {
        FeatureMatrix::new(
            vec!["abv".to_string(), "ibu".to_string()],
            vec![vec![5.0, 20.0], vec![7.0, 70.0]],
            vec![label.to_string(), label.to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_parquet_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("matrix.parquet");

        let storage = StorageEngine::from_matrix(&matrix("IPA")).unwrap();
        storage.write_parquet(&path).unwrap();

        let loaded = StorageEngine::load_parquet(&path).unwrap();
        assert_eq!(loaded.num_rows(), 2);
        assert_eq!(loaded.to_matrix().unwrap(), matrix("IPA"));
    }

    #[test]
    fn test_append_and_concat() {
        let mut storage = StorageEngine::from_matrix(&matrix("IPA")).unwrap();
        storage
            .append_batch(matrix("Stout").to_record_batch().unwrap())
            .unwrap();
        let combined = storage.to_matrix().unwrap();
        assert_eq!(combined.n_rows(), 4);
        assert_eq!(combined.labels()[3], "Stout");
    }

    #[test]
    fn test_append_schema_mismatch() {
        let mut storage = StorageEngine::from_matrix(&matrix("IPA")).unwrap();
        let other = FeatureMatrix::new(vec!["srm".to_string()], vec![vec![1.0]], vec!["x".to_string()])
            .unwrap();
        assert!(storage.append_batch(other.to_record_batch().unwrap()).is_err());
    }

    #[test]
    fn test_write_empty_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageEngine::new(vec![]);
        assert!(storage.write_parquet(dir.path().join("empty.parquet")).is_err());
        assert_eq!(storage.to_matrix().unwrap().n_rows(), 0);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            StorageEngine::load_parquet("/nonexistent/matrix.parquet"),
            Err(Error::StorageError(_))
        ));
    }
}
