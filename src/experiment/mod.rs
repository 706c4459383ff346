//! Classification experiment tracking
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord (1) ──< RunRecord (N)      one run per classifier
//!                              │
//!                              └──< MetricRecord (N)   accuracy, rows, ...
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use beer_styles::experiment::{ExperimentRecord, ExperimentStore, MetricRecord, RunRecord, RunStatus};
//!
//! let mut store = ExperimentStore::new();
//! let experiment = ExperimentRecord::new("exp-001", "heavy");
//!
//! let mut run = RunRecord::new("exp-001-knn", experiment.experiment_id(), "Nearest Neighbors");
//! run.start();
//! store.add_metric(MetricRecord::new(run.run_id(), "accuracy", 0.61));
//! run.complete(RunStatus::Success);
//!
//! store.add_experiment(experiment);
//! store.add_run(run);
//! assert_eq!(store.leaderboard("exp-001", "accuracy").len(), 1);
//! ```

mod experiment_record;
mod metric_record;
mod run_record;
mod store;

pub use experiment_record::ExperimentRecord;
pub use metric_record::MetricRecord;
pub use run_record::{RunRecord, RunStatus};
pub use store::ExperimentStore;
