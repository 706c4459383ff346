//! Pipeline configuration
//!
//! Every stage receives its directories, target attribute and sizes through a
//! [`PipelineConfig`] value. Defaults follow the on-disk layout of the download step:
//! pages in `beer_data/`, the dataset in
//! `flattened_beer_data/flattened_beer_data.json`, labels from `style_name`.
//!
//! ```rust
//! use beer_styles::config::PipelineConfig;
//!
//! let config = PipelineConfig::default()
//!     .with_target("style_category_name")
//!     .with_top_k(25);
//! assert!(config.validate().is_ok());
//! ```

use crate::ingredients::DEFAULT_TOP_K;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings shared by the aggregation and classification drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory of downloaded page files
    pub data_dir: PathBuf,
    /// Persisted dataset location
    pub dataset_path: PathBuf,
    /// Flat attribute used as the label
    pub target: String,
    /// Ingredient vocabulary size
    pub top_k: usize,
    /// Records considered by a classification run
    pub sample_limit: usize,
    /// Share of the sample held out for scoring
    pub test_fraction: f64,
    /// Seed for the train/test shuffle
    pub seed: u64,
    /// Neighbours consulted by the k-NN classifier
    pub knn_neighbors: usize,
    /// Drop records whose `id` was already aggregated
    pub dedupe: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("beer_data"),
            dataset_path: PathBuf::from("flattened_beer_data/flattened_beer_data.json"),
            target: "style_name".to_string(),
            top_k: DEFAULT_TOP_K,
            sample_limit: 10_000,
            test_fraction: 0.25,
            seed: 42,
            knn_neighbors: 3,
            dedupe: false,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration file (JSON); missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid JSON, or fails
    /// [`Self::validate`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("Cannot read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            Error::Configuration(format!("Invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(Error::Configuration("target must not be empty".to_string()));
        }
        if self.top_k == 0 {
            return Err(Error::Configuration("top_k must be greater than 0".to_string()));
        }
        if self.sample_limit == 0 {
            return Err(Error::Configuration(
                "sample_limit must be greater than 0".to_string(),
            ));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(Error::Configuration(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.knn_neighbors == 0 {
            return Err(Error::Configuration(
                "knn_neighbors must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Set the page directory
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the dataset location
    #[must_use]
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Set the label attribute
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the ingredient vocabulary size
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the classification sample size
    #[must_use]
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    /// Set the held-out share
    #[must_use]
    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    /// Set the shuffle seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set k for the k-NN classifier
    #[must_use]
    pub fn with_knn_neighbors(mut self, k: usize) -> Self {
        self.knn_neighbors = k;
        self
    }

    /// Enable or disable id-based deduplication
    #[must_use]
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }
}
