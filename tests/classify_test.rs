//! Aggregate, persist, reload and classify in one pass

use beer_styles::aggregate::aggregate;
use beer_styles::config::PipelineConfig;
use beer_styles::dataset::Dataset;
use beer_styles::experiment::{ExperimentStore, RunStatus};
use beer_styles::pipeline::{run_classification, ACCURACY};
use beer_styles::profile::{AttributeProfile, Preset};
use beer_styles::source::MemorySource;
use beer_styles::storage::StorageEngine;
use beer_styles::vectorize::DictVectorizer;
use serde_json::json;

/// Pages of pale lagers and strong stouts that differ in abv and ibu.
fn source() -> MemorySource {
    let mut source = MemorySource::new();
    for page in 0..4 {
        let data: Vec<serde_json::Value> = (0..15)
            .map(|i| {
                let n = page * 15 + i;
                let stout = n % 3 == 0;
                json!({
                    "id": format!("beer{n}"),
                    "abv": if stout { 9.5 + f64::from(n % 4) * 0.1 } else { 4.6 + f64::from(n % 4) * 0.1 },
                    "ibu": if stout { 55 + n % 7 } else { 12 + n % 5 },
                    "isOrganic": if n % 5 == 0 { "Y" } else { "N" },
                    "glass": {"name": if stout { "Snifter" } else { "Pilsner" }},
                    "style": {
                        "name": if stout { "Imperial Stout" } else { "Pale Lager" },
                        "category": {"name": if stout { "British Ale" } else { "Lager" }}
                    },
                    "ingredients": {
                        "malt": [{"name": if stout { "Roasted Barley" } else { "Pilsner Malt" }}],
                        "hops": [{"name": "Saaz"}]
                    }
                })
            })
            .collect();
        source = source.with_page(
            format!("beers_page{}.json", page + 1),
            json!({ "data": data }).to_string(),
        );
    }
    source.with_page(
        "beers_page5.json",
        json!({"status": "failure", "errorMessage": "rate limited"}).to_string(),
    )
}

fn aggregated() -> Dataset {
    let (dataset, report) = aggregate(&source(), &PipelineConfig::default()).unwrap();
    assert_eq!(report.pages_read, 4);
    assert_eq!(report.pages_skipped, 1);
    assert_eq!(dataset.len(), 60);
    dataset
}

#[test]
fn test_classify_reloaded_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flattened_beer_data.json");
    aggregated().save(&path).unwrap();
    let dataset = Dataset::load(&path).unwrap();

    let config = PipelineConfig::default().with_dataset_path(&path);
    let outcome = run_classification(&dataset, &Preset::Heavy.profile(), &config).unwrap();

    assert_eq!(outcome.trim.kept, 60);
    assert_eq!(outcome.trim.mismatched, 0);
    assert_eq!(outcome.evaluations.len(), 3);
    let best = outcome.best().unwrap();
    assert!((best.score - 1.0).abs() < f64::EPSILON, "{best:?}");

    let majority = outcome
        .evaluations
        .iter()
        .find(|e| e.classifier == "Majority Class")
        .unwrap();
    assert!(majority.score < 1.0);
}

#[test]
fn test_classify_profile_nothing_satisfies() {
    // No record carries `available_name`
    let err = run_classification(
        &aggregated(),
        &Preset::Descriptive.profile(),
        &PipelineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, beer_styles::Error::InvalidInput(_)));
}

#[test]
fn test_classify_custom_profile_one_hot() {
    let profile = AttributeProfile::new("label-free", ["abv", "isOrganic", "glass_name"]).unwrap();
    let outcome =
        run_classification(&aggregated(), &profile, &PipelineConfig::default()).unwrap();

    assert_eq!(
        outcome.matrix.feature_names(),
        [
            "abv",
            "glass_name=Pilsner",
            "glass_name=Snifter",
            "isOrganic=N",
            "isOrganic=Y"
        ]
    );
    for row in outcome.matrix.rows() {
        assert!((row[1] + row[2] - 1.0).abs() < f64::EPSILON);
    }
}

#[test]
fn test_classify_ingredient_profile() {
    let config = PipelineConfig::default().with_top_k(2);
    let outcome =
        run_classification(&aggregated(), &Preset::Ingredients.profile(), &config).unwrap();
    let vocabulary = outcome.vocabulary.as_ref().unwrap();
    assert_eq!(vocabulary.names(), ["Saaz", "Pilsner Malt"]);
    assert_eq!(
        outcome.matrix.feature_names(),
        ["Pilsner Malt", "Saaz", "abv", "ibu"]
    );
}

#[test]
fn test_export_matrix_and_runs() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = run_classification(
        &aggregated(),
        &Preset::Heavy.profile(),
        &PipelineConfig::default(),
    )
    .unwrap();

    let parquet_path = dir.path().join("matrix").join("heavy.parquet");
    StorageEngine::from_matrix(&outcome.matrix)
        .unwrap()
        .write_parquet(&parquet_path)
        .unwrap();
    let reloaded = StorageEngine::load_parquet(&parquet_path)
        .unwrap()
        .to_matrix()
        .unwrap();
    assert_eq!(reloaded, outcome.matrix);

    let runs_path = dir.path().join("runs.json");
    outcome.store.save_json(&runs_path).unwrap();
    let store = ExperimentStore::load_json(&runs_path).unwrap();
    let experiment = store.get_experiment(&outcome.experiment_id).unwrap();
    assert_eq!(experiment.profile(), "heavy");
    assert_eq!(experiment.samples(), 60);
    assert_eq!(experiment.features(), 2);

    let runs = store.get_runs_for_experiment(&outcome.experiment_id);
    assert_eq!(runs.len(), 3);
    assert!(runs.iter().all(|run| run.status() == RunStatus::Success));
    assert_eq!(store.leaderboard(&outcome.experiment_id, ACCURACY).len(), 3);
}

#[test]
fn test_vectorizer_ignores_unseen_values() {
    let dataset = aggregated();
    let profile = AttributeProfile::new("glass", ["glass_name"]).unwrap();
    let trimmed = beer_styles::trim::trim(&dataset, &profile, None).unwrap();
    let vectorizer = DictVectorizer::fit(trimmed.data());

    let unseen = beer_styles::record::FlatRecord::from_pairs([("glass_name", "Tulip")]);
    assert_eq!(vectorizer.transform_record(&unseen), vec![0.0, 0.0]);
}
