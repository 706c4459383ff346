//! Aggregation driver: pages -> flattened, labeled dataset
//!
//! ```text
//! PageSource ──units()──> fetch(unit) ──> [RawRecord]
//!                              │ SourceUnavailable: skip + count
//!                              ▼
//!                        flatten_all()  ──> None: rejected (no style)
//!                              │
//!                              ▼
//!                   label = record[target] ──> missing: rejected (no target)
//!                              │
//!                              ▼
//!                   Dataset::from_parts(data, labels)
//! ```

use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::record::flatten_all;
use crate::source::PageSource;
use crate::Result;
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Counters from one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    /// Units that yielded records
    pub pages_read: usize,
    /// Units skipped as unavailable
    pub pages_skipped: usize,
    /// Raw records seen in readable units
    pub records_seen: usize,
    /// Records without a style group
    pub rejected_no_style: usize,
    /// Records whose flattened form lacks the target attribute
    pub rejected_no_target: usize,
    /// Records dropped as repeats of an earlier `id` (only with dedupe on)
    pub duplicates: usize,
    /// Records in the dataset
    pub accepted: usize,
}

/// Walk every unit of `source` and build the labeled dataset.
///
/// Unavailable units are skipped and counted; any other error aborts the run.
///
/// # Errors
///
/// Returns error if the source cannot be enumerated, a non-recoverable error
/// occurs while fetching, or the collected sequences fail the integrity
/// check.
pub fn aggregate<S: PageSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
) -> Result<(Dataset, AggregateReport)> {
    let mut report = AggregateReport::default();
    let mut data = Vec::new();
    let mut labels = Vec::new();
    let mut seen_ids: FxHashSet<String> = FxHashSet::default();

    for unit in source.units()? {
        let records = match source.fetch(&unit) {
            Ok(records) => records,
            Err(e) if e.is_recoverable() => {
                warn!(%unit, error = %e, "skipping unit");
                report.pages_skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        report.pages_read += 1;
        report.records_seen += records.len();
        debug!(%unit, records = records.len(), "read unit");

        for (raw, flat) in records.iter().zip(flatten_all(&records)) {
            let Some(flat) = flat else {
                report.rejected_no_style += 1;
                continue;
            };
            let Some(label) = flat.get(&config.target).cloned() else {
                report.rejected_no_target += 1;
                continue;
            };
            if config.dedupe {
                if let Some(id) = raw.get("id").map(ToString::to_string) {
                    if !seen_ids.insert(id) {
                        report.duplicates += 1;
                        continue;
                    }
                }
            }
            data.push(flat);
            labels.push(label);
        }
    }

    let dataset = Dataset::from_parts(data, labels)?;
    report.accepted = dataset.len();

    info!(
        pages_read = report.pages_read,
        pages_skipped = report.pages_skipped,
        records = report.records_seen,
        rejected = report.rejected_no_style + report.rejected_no_target,
        duplicates = report.duplicates,
        accepted = report.accepted,
        "aggregated dataset"
    );
    Ok((dataset, report))
}
