//! Ingredient feature expansion
//!
//! A beer's `ingredients` group has a variable shape:
//!
//! ```text
//! "ingredients": {
//!     "hops":  [{"name": "Cascade", ...}, {"name": "Citra", ...}],
//!     "malt":  [{"name": "Pale Malt", ...}],
//!     "yeast": [{"name": "Wyeast 1056", ...}]
//! }
//! ```
//!
//! To turn it into a fixed set of columns the corpus is scanned once, the
//! `k` most frequent ingredient names become the vocabulary, and every kept
//! record gets one boolean per vocabulary name.

use crate::dataset::Dataset;
use crate::record::{Ingredients, RawRecord, INGREDIENTS_KEY};
use crate::topk::top_k_indices;
use crate::Result;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::collections::BTreeMap;

/// Default vocabulary size.
pub const DEFAULT_TOP_K: usize = 50;

/// Iterate over every ingredient name of a group, across all kinds.
///
/// Entries without a string `name` are skipped.
pub fn ingredient_names(ingredients: &Ingredients) -> impl Iterator<Item = &str> {
    ingredients
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
}

/// Occurrence count of every ingredient name in a corpus.
///
/// Names are compared case-sensitively. Insertion order is remembered so that
/// ranking can break ties by first appearance.
#[derive(Debug, Clone, Default)]
pub struct IngredientFrequencyTable {
    index: FxHashMap<String, usize>,
    names: Vec<String>,
    counts: Vec<usize>,
}

impl IngredientFrequencyTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count ingredients across raw records.
    #[must_use]
    pub fn from_raw_records(records: &[RawRecord]) -> Self {
        let mut table = Self::new();
        for record in records {
            if let Some(Value::Object(ingredients)) = record.get(INGREDIENTS_KEY) {
                table.observe(ingredients);
            }
        }
        table
    }

    /// Count ingredients carried by the records of a dataset.
    ///
    /// Flattening passes ingredient groups through untouched, so this yields
    /// the same counts as the raw corpus the dataset was aggregated from,
    /// minus rejected records.
    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut table = Self::new();
        for record in dataset.data() {
            if let Some(ingredients) = record.ingredients() {
                table.observe(ingredients);
            }
        }
        table
    }

    /// Add one ingredient group to the counts.
    ///
    /// An ingredient literally named `ingredients` is not counted: it could
    /// never become a boolean column next to the raw group of that name.
    pub fn observe(&mut self, ingredients: &Ingredients) {
        for name in ingredient_names(ingredients).filter(|name| *name != INGREDIENTS_KEY) {
            if let Some(&slot) = self.index.get(name) {
                self.counts[slot] += 1;
            } else {
                self.index.insert(name.to_string(), self.names.len());
                self.names.push(name.to_string());
                self.counts.push(1);
            }
        }
    }

    /// Occurrences of `name` (zero if never seen).
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.index.get(name).map_or(0, |&slot| self.counts[slot])
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no ingredient has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(name, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }

    /// The `k` most frequent names, ties broken by first appearance.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] if `k` is zero.
    pub fn top(&self, k: usize) -> Result<IngredientVocabulary> {
        let names = top_k_indices(&self.counts, k)?
            .into_iter()
            .map(|slot| self.names[slot].clone())
            .collect();
        Ok(IngredientVocabulary { names })
    }
}

/// The ranked ingredient names that become boolean features.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientVocabulary {
    names: Vec<String>,
}

impl IngredientVocabulary {
    /// Build a vocabulary from explicit names (kept in the given order).
    ///
    /// The reserved name `ingredients` is dropped.
    #[must_use]
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names
                .into_iter()
                .map(Into::into)
                .filter(|name: &String| name != INGREDIENTS_KEY)
                .collect(),
        }
    }

    /// Names, most frequent first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// One boolean per vocabulary name for a record's ingredient group.
    #[must_use]
    pub fn features(&self, ingredients: Option<&Ingredients>) -> BTreeMap<String, bool> {
        ingredient_features(ingredients, &self.names)
    }
}

/// Rank the ingredients of a raw corpus and keep the top `k` names.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if `k` is zero.
pub fn top_ingredients(corpus: &[RawRecord], k: usize) -> Result<IngredientVocabulary> {
    IngredientFrequencyTable::from_raw_records(corpus).top(k)
}

/// Presence flags: `names[i] -> true` iff the name appears in any kind.
#[must_use]
pub fn ingredient_features(
    ingredients: Option<&Ingredients>,
    names: &[String],
) -> BTreeMap<String, bool> {
    let present: Vec<&str> = ingredients
        .map(|group| ingredient_names(group).collect())
        .unwrap_or_default();

    names
        .iter()
        .map(|name| (name.clone(), present.contains(&name.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn group(value: serde_json::Value) -> Ingredients {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_ingredient_names_across_kinds() {
        let ingredients = group(json!({
            "hops": [{"name": "Cascade"}, {"id": 7}],
            "malt": [{"name": "Pilsner"}],
            "notes": "not a list",
        }));
        let names: Vec<_> = ingredient_names(&ingredients).collect();
        assert_eq!(names, vec!["Cascade", "Pilsner"]);
    }

    #[test]
    fn test_frequency_counts_case_sensitive() {
        let corpus = vec![
            record(json!({"ingredients": {"hops": [{"name": "Cascade"}, {"name": "cascade"}]}})),
            record(json!({"ingredients": {"hops": [{"name": "Cascade"}]}})),
            record(json!({"name": "no ingredients"})),
        ];
        let table = IngredientFrequencyTable::from_raw_records(&corpus);
        assert_eq!(table.count("Cascade"), 2);
        assert_eq!(table.count("cascade"), 1);
        assert_eq!(table.count("Citra"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_top_ties_break_by_first_seen() {
        let corpus = vec![
            record(json!({"ingredients": {"hops": [{"name": "Saaz"}, {"name": "Munich"}]}})),
            record(json!({"ingredients": {"hops": [{"name": "Citra"}, {"name": "Munich"}, {"name": "Saaz"}]}})),
        ];
        let vocabulary = top_ingredients(&corpus, 2).unwrap();
        // Saaz and Munich are both seen twice; Saaz was seen first
        assert_eq!(vocabulary.names(), ["Saaz", "Munich"]);
        assert_eq!(top_ingredients(&corpus, 2).unwrap(), vocabulary);
    }

    #[test]
    fn test_cascade_scenario() {
        let mut corpus = Vec::new();
        for i in 0..10 {
            if i % 3 == 0 && i < 9 {
                corpus.push(record(json!({"ingredients": {"hops": [{"name": "Cascade"}]}})));
            } else if i == 9 {
                corpus.push(record(json!({"ingredients": {"malt": [{"name": "Crystal"}]}})));
            } else {
                corpus.push(record(json!({"abv": "5"})));
            }
        }
        let vocabulary = top_ingredients(&corpus, 1).unwrap();
        assert_eq!(vocabulary.names(), ["Cascade"]);

        let flags: Vec<bool> = corpus
            .iter()
            .map(|r| {
                let ingredients = r.get(INGREDIENTS_KEY).and_then(Value::as_object);
                vocabulary.features(ingredients)["Cascade"]
            })
            .collect();
        assert_eq!(flags.iter().filter(|&&f| f).count(), 3);
    }

    #[test]
    fn test_features_one_flag_per_name() {
        let vocabulary = IngredientVocabulary::new(["Cascade", "Citra", "Pilsner"]);
        let ingredients = group(json!({"hops": [{"name": "Citra"}], "malt": [{"name": "Pilsner"}]}));
        let features = vocabulary.features(Some(&ingredients));
        assert_eq!(features.len(), 3);
        assert!(!features["Cascade"]);
        assert!(features["Citra"]);
        assert!(features["Pilsner"]);

        let none = vocabulary.features(None);
        assert_eq!(none.len(), 3);
        assert!(none.values().all(|&flag| !flag));
    }

    #[test]
    fn test_reserved_name_is_not_a_feature() {
        let corpus = vec![record(json!({"ingredients": {"hops": [
            {"name": "ingredients"}, {"name": "Saaz"}
        ]}}))];
        let table = IngredientFrequencyTable::from_raw_records(&corpus);
        assert_eq!(table.count(INGREDIENTS_KEY), 0);
        assert_eq!(table.top(5).unwrap().names(), ["Saaz"]);

        let vocabulary = IngredientVocabulary::new([INGREDIENTS_KEY, "Saaz"]);
        assert_eq!(vocabulary.names(), ["Saaz"]);
    }

    #[test]
    fn test_top_zero_rejected() {
        assert!(IngredientFrequencyTable::new().top(0).is_err());
        assert!(IngredientFrequencyTable::new().top(DEFAULT_TOP_K).unwrap().is_empty());
    }
}
