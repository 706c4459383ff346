//! Classification driver
//!
//! One call runs a persisted dataset through every stage after aggregation
//! and records the outcome as an experiment:
//!
//! ```text
//! Dataset ──(profile names `ingredients`)──> IngredientFrequencyTable::top(top_k)
//!    │
//!    └─head(sample_limit)──> Trimmer ──> DictVectorizer ──> train_test_split(seed)
//!                                                                │
//!                                   evaluate per classifier ─────┴─> RunRecord + MetricRecord
//! ```

use crate::classify::{default_classifiers, evaluate, train_test_split, Classifier, Evaluation};
use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::experiment::{ExperimentRecord, ExperimentStore, MetricRecord, RunRecord, RunStatus};
use crate::ingredients::{IngredientFrequencyTable, IngredientVocabulary};
use crate::profile::AttributeProfile;
use crate::trim::{TrimReport, Trimmer};
use crate::vectorize::{DictVectorizer, FeatureMatrix};
use crate::{Error, Result};
use chrono::Utc;
use tracing::{info, warn};

/// Metric key under which each run's held-out accuracy is stored.
pub const ACCURACY: &str = "accuracy";

/// Everything produced by one classification run.
#[derive(Debug)]
pub struct ClassificationOutcome {
    /// Identifier of the experiment recorded in `store`
    pub experiment_id: String,
    /// Ingredient vocabulary used for expansion, if the profile needed one
    pub vocabulary: Option<IngredientVocabulary>,
    /// Counts from the trim pass
    pub trim: TrimReport,
    /// Encoded sample that was split and scored
    pub matrix: FeatureMatrix,
    /// Scores of the classifiers that completed
    pub evaluations: Vec<Evaluation>,
    /// Experiment, runs and metrics of this invocation
    pub store: ExperimentStore,
}

impl ClassificationOutcome {
    /// Highest scoring classifier, if any completed.
    #[must_use]
    pub fn best(&self) -> Option<&Evaluation> {
        self.evaluations
            .iter()
            .reduce(|best, e| if e.score > best.score { e } else { best })
    }
}

/// Run the default classifier line-up on `dataset` trimmed to `profile`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] for an invalid configuration and
/// [`Error::InvalidInput`] when no record satisfies the profile or the
/// sample is too small to split.
pub fn run_classification(
    dataset: &Dataset,
    profile: &AttributeProfile,
    config: &PipelineConfig,
) -> Result<ClassificationOutcome> {
    let mut classifiers = default_classifiers(config.knn_neighbors);
    run_with_classifiers(dataset, profile, config, &mut classifiers)
}

/// Same as [`run_classification`] with a caller-supplied line-up.
///
/// The ingredient vocabulary is ranked over the whole dataset, so the
/// feature columns do not depend on `sample_limit`. A classifier that fails
/// to fit or score is recorded as a failed run and the remaining classifiers
/// still run.
///
/// # Errors
///
/// See [`run_classification`].
pub fn run_with_classifiers(
    dataset: &Dataset,
    profile: &AttributeProfile,
    config: &PipelineConfig,
    classifiers: &mut [Box<dyn Classifier>],
) -> Result<ClassificationOutcome> {
    config.validate()?;

    let vocabulary = if profile.wants_ingredients() {
        Some(IngredientFrequencyTable::from_dataset(dataset).top(config.top_k)?)
    } else {
        None
    };
    let sample = dataset.head(config.sample_limit);

    let mut trimmer = Trimmer::new(profile);
    if let Some(vocabulary) = vocabulary.as_ref() {
        trimmer = trimmer.with_vocabulary(vocabulary);
    }
    let (trimmed, trim) = trimmer.trim_with_report(&sample)?;
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!(
            "No record of {} satisfies profile {profile}",
            sample.len()
        )));
    }

    let (_, matrix) = DictVectorizer::fit_transform(&trimmed);
    let split = train_test_split(&matrix, config.test_fraction, config.seed)?;
    info!(
        profile = profile.name(),
        samples = matrix.n_rows(),
        features = matrix.n_features(),
        train = split.train.n_rows(),
        test = split.test.n_rows(),
        "classifying"
    );

    let experiment_id = format!(
        "{}-{}",
        profile.name(),
        Utc::now().format("%Y%m%dT%H%M%S%.3f")
    );
    let mut store = ExperimentStore::new();
    store.add_experiment(
        ExperimentRecord::new(&experiment_id, profile.name())
            .with_shape(matrix.n_rows(), matrix.n_features())
            .with_config(serde_json::to_value(config)?),
    );

    let mut evaluations = Vec::with_capacity(classifiers.len());
    for (i, classifier) in classifiers.iter_mut().enumerate() {
        let mut run = RunRecord::new(
            format!("{experiment_id}-run{i}"),
            &experiment_id,
            classifier.name(),
        );
        run.start();
        match evaluate(classifier.as_mut(), &split) {
            Ok(evaluation) => {
                store.add_metric(MetricRecord::new(run.run_id(), ACCURACY, evaluation.score));
                run.complete(RunStatus::Success);
                evaluations.push(evaluation);
            }
            Err(e) => {
                warn!(classifier = classifier.name(), error = %e, "classifier failed");
                run.fail(e.to_string());
            }
        }
        store.add_run(run);
    }

    Ok(ClassificationOutcome {
        experiment_id,
        vocabulary,
        trim,
        matrix,
        evaluations,
        store,
    })
}
