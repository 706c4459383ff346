//! k-nearest-neighbours by Euclidean distance, majority vote.

use super::{check_training_input, Classifier};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// k-NN classifier.
///
/// Vote ties go to the label of the nearest neighbour among the tied labels.
#[derive(Debug, Clone)]
pub struct KNearestNeighbors {
    k: usize,
    rows: Vec<Vec<f64>>,
    labels: Vec<String>,
}

impl KNearestNeighbors {
    /// Create a classifier consulting `k` neighbours (at least one).
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            rows: Vec::new(),
            labels: Vec::new(),
        }
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

impl Classifier for KNearestNeighbors {
    fn name(&self) -> &str {
        "Nearest Neighbors"
    }

    fn fit(&mut self, rows: &[Vec<f64>], labels: &[String]) -> Result<()> {
        check_training_input(rows, labels)?;
        self.rows = rows.to_vec();
        self.labels = labels.to_vec();
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> Result<String> {
        let Some(width) = self.rows.first().map(Vec::len) else {
            return Err(Error::InvalidInput("classifier is not fitted".to_string()));
        };
        if row.len() != width {
            return Err(Error::InvalidInput(format!(
                "row has {} values, expected {width}",
                row.len()
            )));
        }

        let mut neighbours: Vec<(f64, usize)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, candidate)| (squared_distance(row, candidate), i))
            .collect();
        neighbours.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        neighbours.truncate(self.k);

        // label -> (votes, rank of its nearest neighbour)
        let mut votes: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for (rank, &(_, i)) in neighbours.iter().enumerate() {
            let entry = votes.entry(self.labels[i].as_str()).or_insert((0, rank));
            entry.0 += 1;
        }

        votes
            .into_iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
            .map(|(label, _)| label.to_string())
            .ok_or_else(|| Error::Other("no neighbours".to_string()))
    }
}
