//! Pipeline benchmarks
//!
//! Throughput of the per-record passes:
//! - Flattening raw catalogue records
//! - Trimming a dataset to a profile (with and without ingredient expansion)
//! - Vectorizing the trimmed dataset

use beer_styles::dataset::Dataset;
use beer_styles::ingredients::IngredientFrequencyTable;
use beer_styles::profile::Preset;
use beer_styles::record::{flatten_all, RawRecord};
use beer_styles::trim::trim;
use beer_styles::vectorize::DictVectorizer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

const HOPS: [&str; 6] = ["Cascade", "Citra", "Saaz", "Simcoe", "Mosaic", "Fuggle"];

/// Create `n` raw records that look like catalogue entries
fn create_raw_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let value = json!({
                "id": format!("beer{i}"),
                "abv": format!("{:.1}", 4.0 + (i % 60) as f64 / 10.0),
                "ibu": format!("{}", 10 + i % 80),
                "isOrganic": if i % 7 == 0 { "Y" } else { "N" },
                "style": {
                    "name": format!("Style {}", i % 12),
                    "abvMax": "7.5",
                    "category": {"name": "North American Ale"}
                },
                "glass": {"name": "Pint"},
                "available": {"name": "Year Round"},
                "ingredients": {
                    "hops": [{"name": HOPS[i % HOPS.len()]}, {"name": HOPS[(i / 3) % HOPS.len()]}]
                }
            });
            match value {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            }
        })
        .collect()
}

fn create_dataset(n: usize) -> Dataset {
    let raw = create_raw_records(n);
    let (data, labels) = flatten_all(&raw)
        .into_iter()
        .flatten()
        .filter_map(|record| {
            let label = record.get("style_name").cloned()?;
            Some((record, label))
        })
        .unzip();
    Dataset::from_parts(data, labels).unwrap()
}

/// Benchmark flattening raw records
fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for size in [1_000, 10_000].iter() {
        let raw = create_raw_records(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(flatten_all(&raw)));
        });
    }

    group.finish();
}

/// Benchmark trimming per profile
fn bench_trim(c: &mut Criterion) {
    let mut group = c.benchmark_group("trim");
    let dataset = create_dataset(10_000);
    let vocabulary = IngredientFrequencyTable::from_dataset(&dataset)
        .top(50)
        .unwrap();

    for preset in Preset::ALL {
        let profile = preset.profile();
        group.bench_function(BenchmarkId::from_parameter(preset.name()), |b| {
            b.iter(|| black_box(trim(&dataset, &profile, Some(&vocabulary)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark vectorizing a trimmed dataset
fn bench_vectorize(c: &mut Criterion) {
    let dataset = create_dataset(10_000);
    let trimmed = trim(&dataset, &Preset::Descriptive.profile(), None).unwrap();

    c.bench_function("vectorize_descriptive", |b| {
        b.iter(|| black_box(DictVectorizer::fit_transform(&trimmed)));
    });
}

criterion_group!(benches, bench_flatten, bench_trim, bench_vectorize);
criterion_main!(benches);
