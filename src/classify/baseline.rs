//! Majority-class baseline.

use super::{check_training_input, distinct_labels, Classifier};
use crate::{Error, Result};

/// Always predicts the most frequent training label (first seen on ties).
#[derive(Debug, Clone, Default)]
pub struct MajorityClass {
    label: Option<String>,
}

impl Classifier for MajorityClass {
    fn name(&self) -> &str {
        "Majority Class"
    }

    fn fit(&mut self, rows: &[Vec<f64>], labels: &[String]) -> Result<()> {
        check_training_input(rows, labels)?;
        let mut best: Option<(String, usize)> = None;
        for class in distinct_labels(labels) {
            let count = labels.iter().filter(|l| **l == class).count();
            if best.as_ref().map_or(true, |(_, c)| count > *c) {
                best = Some((class, count));
            }
        }
        self.label = best.map(|(label, _)| label);
        Ok(())
    }

    fn predict(&self, _row: &[f64]) -> Result<String> {
        self.label
            .clone()
            .ok_or_else(|| Error::InvalidInput("classifier is not fitted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_class() {
        let rows = vec![vec![0.0]; 5];
        let labels: Vec<String> = ["ipa", "stout", "stout", "ipa", "stout"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let mut baseline = MajorityClass::default();
        assert!(baseline.predict(&[0.0]).is_err());
        baseline.fit(&rows, &labels).unwrap();
        assert_eq!(baseline.predict(&[42.0]).unwrap(), "stout");
        assert!((baseline.score(&rows, &labels).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_majority_tie_first_seen() {
        let rows = vec![vec![0.0]; 2];
        let labels: Vec<String> = vec!["b".into(), "a".into()];
        let mut baseline = MajorityClass::default();
        baseline.fit(&rows, &labels).unwrap();
        assert_eq!(baseline.predict(&[]).unwrap(), "b");
    }
}
