//! End-to-end aggregation over a page directory

use beer_styles::aggregate::aggregate;
use beer_styles::config::PipelineConfig;
use beer_styles::dataset::Dataset;
use beer_styles::record::Scalar;
use beer_styles::source::{DirectorySource, PageSource};
use beer_styles::Error;
use std::fs;
use std::path::Path;

fn write_page(dir: &Path, name: &str, body: &serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string(body).unwrap()).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_page(
        dir.path(),
        "beers_page1.json",
        &serde_json::json!({
            "currentPage": 1,
            "status": "success",
            "data": [
                {"id": "a1", "abv": "6.5", "style": {"name": "American IPA", "abvMax": "7.5",
                  "category": {"name": "North American Ale"}},
                 "glass": {"name": "Pint"}},
                {"id": "a2", "abv": "4.9", "nameDisplay": "No Style Lager"},
                {"id": "a3", "abv": "5.0", "style": {"name": "Pilsner"}}
            ]
        }),
    );
    write_page(
        dir.path(),
        "beers_page2.json",
        &serde_json::json!({"status": "failure", "errorMessage": "API key could not be found"}),
    );
    write_page(
        dir.path(),
        "beers_page10.json",
        &serde_json::json!({
            "data": [
                {"id": "a1", "abv": "6.5", "style": {"name": "American IPA"}},
                {"id": "b1", "abv": "10.0", "style": {"shortName": "Stout"}}
            ]
        }),
    );
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

#[test]
fn test_units_in_page_order() {
    let dir = fixture();
    let units = DirectorySource::new(dir.path()).units().unwrap();
    assert_eq!(
        units,
        vec!["beers_page1.json", "beers_page2.json", "beers_page10.json"]
    );
}

#[test]
fn test_aggregate_directory() {
    let dir = fixture();
    let source = DirectorySource::new(dir.path());
    let (dataset, report) = aggregate(&source, &PipelineConfig::default()).unwrap();

    assert_eq!(report.pages_read, 2);
    assert_eq!(report.pages_skipped, 1);
    assert_eq!(report.records_seen, 5);
    assert_eq!(report.rejected_no_style, 1);
    assert_eq!(report.rejected_no_target, 1);
    assert_eq!(report.duplicates, 0);
    assert_eq!(report.accepted, 3);

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.data().len(), dataset.labels().len());
    assert_eq!(dataset.labels()[0], Scalar::from("American IPA"));
    assert_eq!(dataset.labels()[1], Scalar::from("Pilsner"));

    let first = &dataset.data()[0];
    assert_eq!(
        first.get("style_category_name"),
        Some(&Scalar::from("North American Ale"))
    );
    assert_eq!(first.get("glass_name"), Some(&Scalar::from("Pint")));
    assert!(!first.contains("style"));
    assert!(!first.contains("glass"));
}

#[test]
fn test_aggregate_with_dedupe() {
    let dir = fixture();
    let source = DirectorySource::new(dir.path());
    let config = PipelineConfig::default().with_dedupe(true);
    let (dataset, report) = aggregate(&source, &config).unwrap();
    assert_eq!(report.duplicates, 1);
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_aggregate_other_target() {
    let dir = fixture();
    let source = DirectorySource::new(dir.path());
    let config = PipelineConfig::default().with_target("style_shortName");
    let (dataset, _) = aggregate(&source, &config).unwrap();
    assert_eq!(dataset.labels(), [Scalar::from("Stout")]);
}

#[test]
fn test_aggregate_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path());
    let (dataset, report) = aggregate(&source, &PipelineConfig::default()).unwrap();
    assert!(dataset.is_empty());
    assert_eq!(report, Default::default());
}

#[test]
fn test_aggregate_missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path().join("nope"));
    let err = aggregate(&source, &PipelineConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn test_aggregate_save_and_load() {
    let dir = fixture();
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("flattened").join("flattened_beer_data.json");

    let source = DirectorySource::new(dir.path());
    let (dataset, _) = aggregate(&source, &PipelineConfig::default()).unwrap();
    dataset.save(&path).unwrap();

    let loaded = Dataset::load(&path).unwrap();
    assert_eq!(loaded, dataset);

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["data"].as_array().unwrap().len(), 3);
    assert_eq!(document["labels"][2], "American IPA");
}

#[test]
fn test_load_misaligned_dataset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"data": [{"abv": 5.0}], "labels": []}"#).unwrap();
    assert!(Dataset::load(&path).is_err());
}
