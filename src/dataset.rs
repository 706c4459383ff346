//! Labeled dataset and its persisted form
//!
//! On disk a dataset is one JSON document:
//!
//! ```text
//! {"data": [FlatRecord, ...], "labels": [Scalar, ...]}
//! ```
//!
//! `labels[i]` is the label of `data[i]`; the two sequences always have the
//! same length.

use crate::record::{FlatRecord, Scalar};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Parallel sequences of feature records and labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetFile")]
pub struct Dataset {
    data: Vec<FlatRecord>,
    labels: Vec<Scalar>,
}

/// Unchecked on-disk shape, validated on the way in.
#[derive(Deserialize)]
struct DatasetFile {
    data: Vec<FlatRecord>,
    labels: Vec<Scalar>,
}

impl TryFrom<DatasetFile> for Dataset {
    type Error = Error;

    fn try_from(file: DatasetFile) -> Result<Self> {
        Self::from_parts(file.data, file.labels)
    }
}

impl Dataset {
    /// Create an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair feature records with labels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IntegrityViolation`] if the lengths differ.
    pub fn from_parts(data: Vec<FlatRecord>, labels: Vec<Scalar>) -> Result<Self> {
        if data.len() != labels.len() {
            return Err(Error::IntegrityViolation {
                features: data.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { data, labels })
    }

    /// Feature records.
    #[must_use]
    pub fn data(&self) -> &[FlatRecord] {
        &self.data
    }

    /// Labels, index-aligned with [`Self::data`].
    #[must_use]
    pub fn labels(&self) -> &[Scalar] {
        &self.labels
    }

    /// Number of labeled records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the dataset has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(record, label)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&FlatRecord, &Scalar)> {
        self.data.iter().zip(self.labels.iter())
    }

    /// The first `n` records and their labels.
    #[must_use]
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            data: self.data[..n].to_vec(),
            labels: self.labels[..n].to_vec(),
        }
    }

    /// Whether every record carries the same attribute key set.
    ///
    /// Vectorizers assume this; a trimmed dataset always satisfies it.
    #[must_use]
    pub fn is_rectangular(&self) -> bool {
        let mut records = self.data.iter();
        let Some(first) = records.next() else {
            return true;
        };
        let keys: BTreeSet<&str> = first.keys().collect();
        records.all(|record| record.keys().eq(keys.iter().copied()))
    }

    /// Write the dataset as one JSON document, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path).map_err(|e| {
            Error::StorageError(format!("Failed to create {}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a dataset written by [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, malformed, or its sequences
    /// have different lengths.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::StorageError(format!("Failed to open {}: {e}", path.display()))
        })?;
        let dataset = serde_json::from_reader(BufReader::new(file))?;
        Ok(dataset)
    }
}
