//! Experiment Record - one classification invocation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One classification invocation: a dataset sample trimmed to one profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentRecord {
    experiment_id: String,
    profile: String,
    created_at: DateTime<Utc>,
    samples: usize,
    features: usize,
    config: Option<serde_json::Value>,
}

impl ExperimentRecord {
    /// Create a new experiment record for `profile`, timestamped now.
    #[must_use]
    pub fn new(experiment_id: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            profile: profile.into(),
            created_at: Utc::now(),
            samples: 0,
            features: 0,
            config: None,
        }
    }

    /// Record the shape of the matrix the classifiers saw.
    #[must_use]
    pub const fn with_shape(mut self, samples: usize, features: usize) -> Self {
        self.samples = samples;
        self.features = features;
        self
    }

    /// Attach a configuration snapshot.
    #[must_use]
    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the profile name.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of trimmed records vectorized.
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.samples
    }

    /// Number of feature columns.
    #[must_use]
    pub const fn features(&self) -> usize {
        self.features
    }

    /// Get the configuration snapshot, if any.
    #[must_use]
    pub const fn config(&self) -> Option<&serde_json::Value> {
        self.config.as_ref()
    }
}
