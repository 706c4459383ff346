//! Gaussian naive Bayes.

use super::{check_training_input, distinct_labels, Classifier};
use crate::{Error, Result};
use std::f64::consts::PI;

#[derive(Debug, Clone)]
struct ClassStats {
    label: String,
    log_prior: f64,
    means: Vec<f64>,
    variances: Vec<f64>,
}

/// Gaussian naive Bayes classifier.
///
/// Every variance is padded by `var_smoothing` times the largest feature
/// variance so constant columns (common with one-hot features) stay finite.
#[derive(Debug, Clone)]
pub struct GaussianNaiveBayes {
    var_smoothing: f64,
    classes: Vec<ClassStats>,
}

impl Default for GaussianNaiveBayes {
    fn default() -> Self {
        Self::new(1e-9)
    }
}

impl GaussianNaiveBayes {
    /// Create a classifier with the given variance smoothing.
    #[must_use]
    pub const fn new(var_smoothing: f64) -> Self {
        Self {
            var_smoothing,
            classes: Vec::new(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_and_variance(rows: &[&Vec<f64>], width: usize) -> (Vec<f64>, Vec<f64>) {
    let n = rows.len() as f64;
    let mut means = vec![0.0; width];
    for row in rows {
        for (m, x) in means.iter_mut().zip(row.iter()) {
            *m += x / n;
        }
    }
    let mut variances = vec![0.0; width];
    for row in rows {
        for ((v, m), x) in variances.iter_mut().zip(&means).zip(row.iter()) {
            *v += (x - m).powi(2) / n;
        }
    }
    (means, variances)
}

impl Classifier for GaussianNaiveBayes {
    fn name(&self) -> &str {
        "Naive Bayes"
    }

    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, rows: &[Vec<f64>], labels: &[String]) -> Result<()> {
        check_training_input(rows, labels)?;
        let width = rows[0].len();

        let all: Vec<&Vec<f64>> = rows.iter().collect();
        let (_, overall) = mean_and_variance(&all, width);
        let epsilon = self.var_smoothing * overall.iter().copied().fold(0.0, f64::max);
        // Guard against an all-constant matrix
        let epsilon = if epsilon > 0.0 { epsilon } else { self.var_smoothing.max(1e-12) };

        self.classes = distinct_labels(labels)
            .into_iter()
            .map(|label| {
                let members: Vec<&Vec<f64>> = rows
                    .iter()
                    .zip(labels)
                    .filter(|(_, l)| **l == label)
                    .map(|(row, _)| row)
                    .collect();
                let (means, mut variances) = mean_and_variance(&members, width);
                for v in &mut variances {
                    *v += epsilon;
                }
                ClassStats {
                    log_prior: (members.len() as f64 / rows.len() as f64).ln(),
                    label,
                    means,
                    variances,
                }
            })
            .collect();
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> Result<String> {
        let Some(width) = self.classes.first().map(|c| c.means.len()) else {
            return Err(Error::InvalidInput("classifier is not fitted".to_string()));
        };
        if row.len() != width {
            return Err(Error::InvalidInput(format!(
                "row has {} values, expected {width}",
                row.len()
            )));
        }

        let log_likelihood = |class: &ClassStats| -> f64 {
            class.log_prior
                + row
                    .iter()
                    .zip(&class.means)
                    .zip(&class.variances)
                    .map(|((x, m), v)| -0.5 * (2.0 * PI * v).ln() - (x - m).powi(2) / (2.0 * v))
                    .sum::<f64>()
        };

        // First class wins ties
        let mut best: Option<(&ClassStats, f64)> = None;
        for class in &self.classes {
            let score = log_likelihood(class);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((class, score));
            }
        }
        best.map(|(class, _)| class.label.clone())
            .ok_or_else(|| Error::Other("no classes".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayes_separates_gaussians() {
        let rows = vec![
            vec![1.0, 10.0],
            vec![1.2, 11.0],
            vec![0.8, 9.5],
            vec![5.0, 40.0],
            vec![5.3, 42.0],
            vec![4.8, 39.0],
        ];
        let labels: Vec<String> = ["lager", "lager", "lager", "ipa", "ipa", "ipa"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let mut nb = GaussianNaiveBayes::default();
        nb.fit(&rows, &labels).unwrap();
        assert_eq!(nb.predict(&[1.1, 10.5]).unwrap(), "lager");
        assert_eq!(nb.predict(&[5.1, 41.0]).unwrap(), "ipa");
        assert!((nb.score(&rows, &labels).unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bayes_constant_columns_stay_finite() {
        let rows = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let labels: Vec<String> = ["a", "a", "b"].iter().map(|s| (*s).to_string()).collect();
        let mut nb = GaussianNaiveBayes::default();
        nb.fit(&rows, &labels).unwrap();
        assert_eq!(nb.predict(&[1.0, 1.0]).unwrap(), "b");
        assert_eq!(nb.predict(&[1.0, 0.0]).unwrap(), "a");
    }

    #[test]
    fn test_bayes_unfitted() {
        assert!(GaussianNaiveBayes::default().predict(&[0.0]).is_err());
    }
}
