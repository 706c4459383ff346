//! Classification harness
//!
//! The harness only needs opaque fit/score semantics, expressed by the
//! [`Classifier`] trait. Scores are plain accuracy on a held-out split.
//!
//! ```text
//! FeatureMatrix ──train_test_split(seed)──> (train, test)
//!                                              │
//!             for each classifier: fit(train) ─┴─> score(test)
//! ```

mod baseline;
mod bayes;
mod knn;

pub use baseline::MajorityClass;
pub use bayes::GaussianNaiveBayes;
pub use knn::KNearestNeighbors;

use crate::vectorize::FeatureMatrix;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A trainable classifier over dense numeric rows.
pub trait Classifier {
    /// Display name used in reports.
    fn name(&self) -> &str;

    /// Train on `rows` with one label per row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for empty or misaligned input.
    fn fit(&mut self, rows: &[Vec<f64>], labels: &[String]) -> Result<()>;

    /// Predict the label of one row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if called before `fit` or with a row
    /// of the wrong width.
    fn predict(&self, row: &[f64]) -> Result<String>;

    /// Share of rows predicted correctly.
    ///
    /// # Errors
    ///
    /// Propagates prediction errors; empty input is rejected.
    #[allow(clippy::cast_precision_loss)]
    fn score(&self, rows: &[Vec<f64>], labels: &[String]) -> Result<f64> {
        check_training_input(rows, labels)?;
        let mut correct = 0usize;
        for (row, label) in rows.iter().zip(labels) {
            if self.predict(row)? == *label {
                correct += 1;
            }
        }
        Ok(correct as f64 / rows.len() as f64)
    }
}

/// Shared input validation for `fit` and `score`.
pub(crate) fn check_training_input(rows: &[Vec<f64>], labels: &[String]) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::InvalidInput("no rows".to_string()));
    }
    if rows.len() != labels.len() {
        return Err(Error::InvalidInput(format!(
            "{} rows but {} labels",
            rows.len(),
            labels.len()
        )));
    }
    let width = rows[0].len();
    if rows.iter().any(|row| row.len() != width) {
        return Err(Error::InvalidInput("rows have different widths".to_string()));
    }
    Ok(())
}

/// A seeded train/test partition of a matrix.
#[derive(Debug, Clone)]
pub struct Split {
    /// Training rows
    pub train: FeatureMatrix,
    /// Held-out rows
    pub test: FeatureMatrix,
}

/// Shuffle rows with `seed` and hold out `ceil(n * test_fraction)` of them.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the fraction is outside `(0, 1)` or
/// either side of the split would be empty.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn train_test_split(matrix: &FeatureMatrix, test_fraction: f64, seed: u64) -> Result<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(Error::InvalidInput(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let n = matrix.n_rows();
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(Error::InvalidInput(format!(
            "Cannot split {n} rows with test_fraction {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));
    let (test, train) = indices.split_at(n_test);

    Ok(Split {
        train: matrix.select(train),
        test: matrix.select(test),
    })
}

/// Accuracy of one classifier on one split.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Classifier name
    pub classifier: String,
    /// Accuracy on the held-out rows
    pub score: f64,
}

/// Fit one classifier on the training rows and score it on the test rows.
///
/// # Errors
///
/// Returns the fit or score error.
pub fn evaluate(classifier: &mut dyn Classifier, split: &Split) -> Result<Evaluation> {
    classifier.fit(split.train.rows(), split.train.labels())?;
    let score = classifier.score(split.test.rows(), split.test.labels())?;
    tracing::info!(classifier = classifier.name(), score, "scored classifier");
    Ok(Evaluation {
        classifier: classifier.name().to_string(),
        score,
    })
}

/// The default classifier line-up.
#[must_use]
pub fn default_classifiers(knn_neighbors: usize) -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(KNearestNeighbors::new(knn_neighbors)),
        Box::new(GaussianNaiveBayes::default()),
        Box::new(MajorityClass::default()),
    ]
}

/// Distinct labels in first-seen order.
pub(crate) fn distinct_labels(labels: &[String]) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    for label in labels {
        if !classes.contains(label) {
            classes.push(label.clone());
        }
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn matrix(n: usize) -> FeatureMatrix {
        FeatureMatrix::new(
            vec!["x".to_string()],
            (0..n).map(|i| vec![i as f64]).collect(),
            (0..n).map(|i| format!("c{}", i % 2)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(&matrix(10), 0.25, 42).unwrap();
        assert_eq!(split.test.n_rows(), 3);
        assert_eq!(split.train.n_rows(), 7);
    }

    #[test]
    fn test_split_deterministic_and_disjoint() {
        let a = train_test_split(&matrix(20), 0.25, 7).unwrap();
        let b = train_test_split(&matrix(20), 0.25, 7).unwrap();
        assert_eq!(a.test, b.test);

        let mut all: Vec<f64> = a
            .train
            .rows()
            .iter()
            .chain(a.test.rows())
            .map(|row| row[0])
            .collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, (0..20).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rejects_degenerate() {
        assert!(train_test_split(&matrix(1), 0.25, 1).is_err());
        assert!(train_test_split(&matrix(10), 0.0, 1).is_err());
        assert!(train_test_split(&matrix(10), 1.5, 1).is_err());
    }

    #[test]
    fn test_check_training_input() {
        assert!(check_training_input(&[], &[]).is_err());
        assert!(check_training_input(&[vec![1.0]], &[]).is_err());
        assert!(check_training_input(&[vec![1.0], vec![1.0, 2.0]], &["a".into(), "b".into()]).is_err());
        assert!(check_training_input(&[vec![1.0]], &["a".into()]).is_ok());
    }

    #[test]
    fn test_evaluate_default_lineup() {
        let split = train_test_split(&matrix(40), 0.25, 42).unwrap();
        for mut classifier in default_classifiers(3) {
            let result = evaluate(classifier.as_mut(), &split).unwrap();
            assert_eq!(result.classifier, classifier.name());
            assert!((0.0..=1.0).contains(&result.score), "{result:?}");
        }
    }

    #[test]
    fn test_distinct_labels_order() {
        let labels: Vec<String> = ["b", "a", "b", "c"].iter().map(|s| (*s).to_string()).collect();
        assert_eq!(distinct_labels(&labels), vec!["b", "a", "c"]);
    }
}
