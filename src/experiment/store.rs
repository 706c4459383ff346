//! Experiment Store - in-memory tracking data with JSON persistence

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ExperimentRecord, MetricRecord, RunRecord};
use crate::{Error, Result};

/// In-memory store for experiment tracking data.
///
/// Runs are kept in insertion order so a saved store lists classifiers in
/// the order they were evaluated.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExperimentStore {
    experiments: Vec<ExperimentRecord>,
    runs: Vec<RunRecord>,
    metrics: Vec<MetricRecord>,
}

impl ExperimentStore {
    /// Create a new empty experiment store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the store is empty (no experiments, runs, or metrics).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty() && self.runs.is_empty() && self.metrics.is_empty()
    }

    /// Get the number of experiments in the store.
    #[must_use]
    pub fn experiment_count(&self) -> usize {
        self.experiments.len()
    }

    /// Get the number of runs in the store.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Add an experiment to the store.
    pub fn add_experiment(&mut self, experiment: ExperimentRecord) {
        self.experiments.push(experiment);
    }

    /// Get an experiment by ID.
    #[must_use]
    pub fn get_experiment(&self, experiment_id: &str) -> Option<&ExperimentRecord> {
        self.experiments
            .iter()
            .find(|e| e.experiment_id() == experiment_id)
    }

    /// Add a run to the store.
    pub fn add_run(&mut self, run: RunRecord) {
        self.runs.push(run);
    }

    /// Get a run by ID.
    #[must_use]
    pub fn get_run(&self, run_id: &str) -> Option<&RunRecord> {
        self.runs.iter().find(|r| r.run_id() == run_id)
    }

    /// Get all runs for an experiment, in insertion order.
    #[must_use]
    pub fn get_runs_for_experiment(&self, experiment_id: &str) -> Vec<&RunRecord> {
        self.runs
            .iter()
            .filter(|run| run.experiment_id() == experiment_id)
            .collect()
    }

    /// Add a metric to the store.
    pub fn add_metric(&mut self, metric: MetricRecord) {
        self.metrics.push(metric);
    }

    /// Latest value of `key` reported by a run.
    #[must_use]
    pub fn metric(&self, run_id: &str, key: &str) -> Option<f64> {
        self.metrics
            .iter()
            .rev()
            .find(|m| m.run_id() == run_id && m.key() == key)
            .map(MetricRecord::value)
    }

    /// Runs of an experiment ranked by `key`, highest first.
    ///
    /// Runs that never reported `key` are left out; equal values keep
    /// insertion order.
    #[must_use]
    pub fn leaderboard(&self, experiment_id: &str, key: &str) -> Vec<(&RunRecord, f64)> {
        let mut ranked: Vec<(&RunRecord, f64)> = self
            .get_runs_for_experiment(experiment_id)
            .into_iter()
            .filter_map(|run| self.metric(run.run_id(), key).map(|value| (run, value)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Write the store as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path).map_err(|e| {
            Error::StorageError(format!("Failed to create {}: {e}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a store written by [`Self::save_json`].
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or malformed.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::StorageError(format!("Failed to open {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
