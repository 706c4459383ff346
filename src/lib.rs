//! # beer-styles: Beer Style Classification Pipeline
//!
//! Turns paginated beer-catalogue pages into a rectangular, labeled dataset
//! and measures how well simple classifiers predict a beer's style from
//! attribute subsets.
//!
//! ```text
//! page files ──PageSource──> RawRecord ──flatten──> FlatRecord + label
//!                                                        │
//!                                  aggregate ──> Dataset (data, labels) ──save──> JSON
//!                                                        │
//!                     load ──> trim(profile, ingredient vocabulary)
//!                                                        │
//!                     DictVectorizer ──> FeatureMatrix ──> classifiers ──> ExperimentStore
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use beer_styles::config::PipelineConfig;
//! use beer_styles::source::MemorySource;
//! use beer_styles::aggregate::aggregate;
//!
//! let source = MemorySource::new().with_page(
//!     "beers_page1.json",
//!     r#"{"data": [{"abv": "5.0", "style": {"name": "Pilsner", "abvMax": 5.3}}]}"#,
//! );
//! let (dataset, report) = aggregate(&source, &PipelineConfig::default())?;
//! assert_eq!(report.accepted, 1);
//! assert_eq!(dataset.labels()[0].to_string(), "Pilsner");
//! # Ok::<(), beer_styles::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dataset;
pub mod error;
pub mod experiment;
pub mod ingredients;
pub mod pipeline;
pub mod profile;
pub mod record;
pub mod source;
pub mod storage;
pub mod telemetry;
pub mod topk;
pub mod trim;
pub mod vectorize;

pub use error::{Error, Result};
