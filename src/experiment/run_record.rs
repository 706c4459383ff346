//! Run Record - one classifier fitted and scored within an experiment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Run is created but not yet started.
    Pending,
    /// Classifier is fitting or scoring.
    Running,
    /// Score recorded.
    Success,
    /// Fit or score failed.
    Failed,
}

/// Run Record tracks one classifier through fit and score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunRecord {
    run_id: String,
    experiment_id: String,
    classifier: String,
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    error: Option<String>,
}

impl RunRecord {
    /// Create a new run record in Pending status.
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        experiment_id: impl Into<String>,
        classifier: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            experiment_id: experiment_id.into(),
            classifier: classifier.into(),
            status: RunStatus::Pending,
            started_at: None,
            ended_at: None,
            error: None,
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the parent experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the classifier name.
    #[must_use]
    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    /// Get the current run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start timestamp, if the run has started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp, if the run has completed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Failure message of a failed run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start the run, transitioning from Pending to Running.
    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Complete the run with the given final status.
    pub fn complete(&mut self, status: RunStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }

    /// Mark the run failed with a message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.complete(RunStatus::Failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_default() {
        let run = RunRecord::new("run-1", "exp-1", "Naive Bayes");
        assert_eq!(run.status(), RunStatus::Pending);
        assert!(run.started_at().is_none());
    }

    #[test]
    fn test_run_lifecycle() {
        let mut run = RunRecord::new("run-1", "exp-1", "Naive Bayes");
        run.start();
        assert_eq!(run.status(), RunStatus::Running);
        run.complete(RunStatus::Success);
        assert_eq!(run.status(), RunStatus::Success);
        assert!(run.ended_at() >= run.started_at());
    }

    #[test]
    fn test_run_failure_keeps_message() {
        let mut run = RunRecord::new("run-1", "exp-1", "Nearest Neighbors");
        run.start();
        run.fail("no rows");
        assert_eq!(run.status(), RunStatus::Failed);
        assert_eq!(run.error(), Some("no rows"));
    }
}
