//! Attribute profile trimmer
//!
//! Produces a rectangular dataset: every surviving record carries exactly the
//! profile's attributes (with `ingredients` expanded into one boolean per
//! vocabulary name), and records missing any profile attribute are dropped
//! together with their label.

use crate::dataset::Dataset;
use crate::ingredients::IngredientVocabulary;
use crate::profile::AttributeProfile;
use crate::record::{FlatRecord, Scalar, INGREDIENTS_KEY};
use crate::{Error, Result};
use tracing::{debug, info};

/// Counts from one trim pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrimReport {
    /// Records that satisfied the profile
    pub kept: usize,
    /// Records dropped for missing a profile attribute
    pub mismatched: usize,
}

/// Trims datasets to one attribute profile.
#[derive(Debug, Clone)]
pub struct Trimmer<'a> {
    profile: &'a AttributeProfile,
    vocabulary: Option<&'a IngredientVocabulary>,
}

impl<'a> Trimmer<'a> {
    /// Create a trimmer for `profile`.
    #[must_use]
    pub const fn new(profile: &'a AttributeProfile) -> Self {
        Self {
            profile,
            vocabulary: None,
        }
    }

    /// Supply the ingredient vocabulary used to expand `ingredients`.
    #[must_use]
    pub const fn with_vocabulary(mut self, vocabulary: &'a IngredientVocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Trim one record, or `None` if it lacks a profile attribute.
    #[must_use]
    pub fn trim_record(&self, record: &FlatRecord) -> Option<FlatRecord> {
        if !self.profile.attributes().iter().all(|a| record.contains(a)) {
            return None;
        }

        let mut trimmed = FlatRecord::from_pairs(self.profile.scalar_attributes().filter_map(
            |name| record.get(name).map(|value| (name.to_string(), value.clone())),
        ));

        if let (true, Some(vocabulary)) = (self.profile.wants_ingredients(), self.vocabulary) {
            for (name, present) in vocabulary.features(record.ingredients()) {
                // A profile attribute of the same name takes precedence
                if name != INGREDIENTS_KEY && !trimmed.contains(&name) {
                    trimmed.insert(name, Scalar::Bool(present));
                }
            }
        }

        Some(trimmed)
    }

    /// Trim a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the profile names `ingredients` but
    /// no vocabulary was supplied.
    pub fn trim(&self, dataset: &Dataset) -> Result<Dataset> {
        self.trim_with_report(dataset).map(|(trimmed, _)| trimmed)
    }

    /// Trim a dataset and report how many records survived.
    ///
    /// # Errors
    ///
    /// Same as [`Self::trim`].
    pub fn trim_with_report(&self, dataset: &Dataset) -> Result<(Dataset, TrimReport)> {
        if self.profile.wants_ingredients() && self.vocabulary.is_none() {
            return Err(Error::Configuration(format!(
                "Profile '{}' needs an ingredient vocabulary",
                self.profile.name()
            )));
        }

        let mut data = Vec::new();
        let mut labels = Vec::new();
        let mut report = TrimReport::default();

        for (record, label) in dataset.iter() {
            if let Some(trimmed) = self.trim_record(record) {
                data.push(trimmed);
                labels.push(label.clone());
                report.kept += 1;
            } else {
                report.mismatched += 1;
            }
        }

        debug!(
            profile = self.profile.name(),
            kept = report.kept,
            mismatched = report.mismatched,
            "trimmed dataset"
        );
        if report.kept == 0 && !dataset.is_empty() {
            info!(profile = self.profile.name(), "no record satisfies the profile");
        }

        Ok((Dataset::from_parts(data, labels)?, report))
    }
}

/// Trim `dataset` to `profile`, expanding ingredients with `vocabulary`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the profile names `ingredients` and
/// `vocabulary` is `None`.
///
/// # Examples
///
/// ```rust
/// use beer_styles::dataset::Dataset;
/// use beer_styles::profile::AttributeProfile;
/// use beer_styles::record::{FlatRecord, Scalar};
/// use beer_styles::trim::trim;
///
/// let dataset = Dataset::from_parts(
///     vec![
///         FlatRecord::from_pairs([("a", 1), ("b", 2)]),
///         FlatRecord::from_pairs([("a", 1)]),
///     ],
///     vec![Scalar::from("x"), Scalar::from("y")],
/// )?;
/// let profile = AttributeProfile::new("ab", ["a", "b"])?;
/// let trimmed = trim(&dataset, &profile, None)?;
/// assert_eq!(trimmed.len(), 1);
/// assert_eq!(trimmed.labels().len(), 1);
/// # Ok::<(), beer_styles::Error>(())
/// ```
pub fn trim(
    dataset: &Dataset,
    profile: &AttributeProfile,
    vocabulary: Option<&IngredientVocabulary>,
) -> Result<Dataset> {
    let mut trimmer = Trimmer::new(profile);
    if let Some(vocabulary) = vocabulary {
        trimmer = trimmer.with_vocabulary(vocabulary);
    }
    trimmer.trim(dataset)
}
