//! Raw page sources
//!
//! The upstream paging client is not part of this crate: it leaves one JSON
//! document per page on disk. Each document either carries its records under
//! the top-level `data` key, or is an API error response:
//!
//! ```text
//! {"currentPage": 3, "numberOfPages": 1024, "status": "success", "data": [...]}
//! {"status": "failure", "errorMessage": "API key could not be found"}
//! ```

use crate::record::RawRecord;
use crate::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A supplier of raw record pages.
pub trait PageSource {
    /// Names of every unit of work, in processing order.
    ///
    /// # Errors
    ///
    /// Failing to enumerate the source is fatal.
    fn units(&self) -> Result<Vec<String>>;

    /// Records of one unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnavailable`] for an unreadable unit or an
    /// upstream error response; callers skip the unit and continue.
    fn fetch(&self, unit: &str) -> Result<Vec<RawRecord>>;
}

/// Parse one page document.
///
/// # Errors
///
/// Returns [`Error::SourceUnavailable`] if the text is not JSON, carries an
/// error marker, or has no `data` array.
pub fn parse_page(unit: &str, text: &str) -> Result<Vec<RawRecord>> {
    let unavailable = |reason: String| Error::SourceUnavailable {
        unit: unit.to_string(),
        reason,
    };

    let document: Value =
        serde_json::from_str(text).map_err(|e| unavailable(format!("invalid JSON: {e}")))?;

    if let Some(message) = document.get("errorMessage") {
        let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
        return Err(unavailable(format!("upstream error: {message}")));
    }
    if document.get("status").and_then(Value::as_str) == Some("failure") {
        return Err(unavailable("upstream error: status failure".to_string()));
    }

    let Some(entries) = document.get("data").and_then(Value::as_array) else {
        return Err(unavailable("missing data array".to_string()));
    };

    let records: Vec<RawRecord> = entries
        .iter()
        .filter_map(|entry| entry.as_object().cloned())
        .collect();
    if records.len() != entries.len() {
        debug!(
            unit,
            skipped = entries.len() - records.len(),
            "ignored non-object entries"
        );
    }
    Ok(records)
}

/// A directory of downloaded page files (`*.json`).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Read pages from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory being read.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PageSource for DirectorySource {
    /// JSON files ordered by page number (`beers_page2.json` before
    /// `beers_page10.json`), then by name.
    fn units(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            Error::Configuration(format!(
                "Cannot read data directory {}: {e}",
                self.root.display()
            ))
        })?;

        let mut units = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_json = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if path.is_file() && is_json {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    units.push(name.to_string());
                }
            }
        }

        units.sort_by(|a, b| {
            page_number(a)
                .cmp(&page_number(b))
                .then_with(|| a.cmp(b))
        });
        Ok(units)
    }

    fn fetch(&self, unit: &str) -> Result<Vec<RawRecord>> {
        let text = fs::read_to_string(self.root.join(unit)).map_err(|e| Error::SourceUnavailable {
            unit: unit.to_string(),
            reason: format!("read failed: {e}"),
        })?;
        parse_page(unit, &text)
    }
}

/// In-memory pages, mostly for tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<(String, String)>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page document.
    #[must_use]
    pub fn with_page(mut self, unit: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.push((unit.into(), text.into()));
        self
    }
}

impl PageSource for MemorySource {
    fn units(&self) -> Result<Vec<String>> {
        Ok(self.pages.iter().map(|(unit, _)| unit.clone()).collect())
    }

    fn fetch(&self, unit: &str) -> Result<Vec<RawRecord>> {
        let (_, text) = self
            .pages
            .iter()
            .find(|(name, _)| name == unit)
            .ok_or_else(|| Error::SourceUnavailable {
                unit: unit.to_string(),
                reason: "no such page".to_string(),
            })?;
        parse_page(unit, text)
    }
}

/// Trailing page number of a file name (`beers_page12.json` -> 12).
fn page_number(name: &str) -> Option<u64> {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    stem[digits_start..].parse().ok()
}
