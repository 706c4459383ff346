use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use beer_styles::aggregate::aggregate;
use beer_styles::config::PipelineConfig;
use beer_styles::dataset::Dataset;
use beer_styles::ingredients::IngredientFrequencyTable;
use beer_styles::pipeline::run_classification;
use beer_styles::profile::{AttributeProfile, Preset};
use beer_styles::source::{DirectorySource, PageSource};
use beer_styles::storage::StorageEngine;
use beer_styles::telemetry::init_tracing;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "beer-styles", version, about = "Beer style dataset and classification pipeline")]
struct Cli {
    /// JSON configuration file; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Flattens downloaded pages into the labeled dataset.
    Aggregate(AggregateArgs),
    /// Trims the dataset to a profile and scores the classifiers.
    Classify(ClassifyArgs),
    /// Lists the built-in attribute profiles.
    Profiles,
    /// Shows the most frequent ingredient names in the downloaded pages.
    Ingredients {
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct AggregateArgs {
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Where the dataset is written.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Flat attribute used as the label.
    #[arg(long)]
    target: Option<String>,
    /// Drop records whose `id` was already seen.
    #[arg(long)]
    dedupe: bool,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Profile name or index (see `profiles`).
    #[arg(long, default_value = "minimal")]
    profile: String,
    /// Custom attribute list; overrides the named profile's attributes.
    #[arg(long, value_delimiter = ',')]
    attributes: Vec<String>,
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long)]
    test_fraction: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    top_k: Option<usize>,
    #[arg(long)]
    knn: Option<usize>,
    /// Write the encoded feature matrix as Parquet.
    #[arg(long)]
    matrix_out: Option<PathBuf>,
    /// Write experiment runs and scores as JSON.
    #[arg(long)]
    runs_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Aggregate(args) => handle_aggregate(config, args),
        Commands::Classify(args) => handle_classify(config, args),
        Commands::Profiles => {
            for preset in Preset::ALL {
                println!("{} | {}", preset.index(), preset.profile());
            }
            Ok(())
        }
        Commands::Ingredients { data_dir, top_k } => {
            let config = match data_dir {
                Some(dir) => config.with_data_dir(dir),
                None => config,
            };
            let top_k = top_k.unwrap_or(config.top_k);
            handle_ingredients(&config, top_k)
        }
    }
}

fn handle_aggregate(mut config: PipelineConfig, args: AggregateArgs) -> Result<()> {
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(out) = args.out {
        config = config.with_dataset_path(out);
    }
    if let Some(target) = args.target {
        config = config.with_target(target);
    }
    if args.dedupe {
        config = config.with_dedupe(true);
    }
    config.validate()?;

    let source = DirectorySource::new(&config.data_dir);
    let (dataset, report) = aggregate(&source, &config)
        .with_context(|| format!("aggregating {}", config.data_dir.display()))?;
    dataset
        .save(&config.dataset_path)
        .with_context(|| format!("writing {}", config.dataset_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "wrote {} records to {}",
        dataset.len(),
        config.dataset_path.display()
    );
    Ok(())
}

fn handle_classify(mut config: PipelineConfig, args: ClassifyArgs) -> Result<()> {
    if let Some(path) = args.dataset {
        config = config.with_dataset_path(path);
    }
    if let Some(limit) = args.limit {
        config = config.with_sample_limit(limit);
    }
    if let Some(fraction) = args.test_fraction {
        config = config.with_test_fraction(fraction);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(top_k) = args.top_k {
        config = config.with_top_k(top_k);
    }
    if let Some(k) = args.knn {
        config = config.with_knn_neighbors(k);
    }

    let profile = if args.attributes.is_empty() {
        args.profile.parse::<AttributeProfile>()?
    } else {
        AttributeProfile::new(args.profile.as_str(), args.attributes)?
    };

    let dataset = Dataset::load(&config.dataset_path)
        .with_context(|| format!("reading {}", config.dataset_path.display()))?;
    let outcome = run_classification(&dataset, &profile, &config)?;

    println!(
        "profile {profile}: {} records kept, {} mismatched, {} features",
        outcome.trim.kept,
        outcome.trim.mismatched,
        outcome.matrix.n_features()
    );
    for evaluation in &outcome.evaluations {
        println!("{:<20} {:.4}", evaluation.classifier, evaluation.score);
    }
    if outcome.evaluations.is_empty() {
        bail!("every classifier failed; see the log for details");
    }

    if let Some(path) = args.matrix_out {
        StorageEngine::from_matrix(&outcome.matrix)?
            .write_parquet(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = args.runs_out {
        outcome
            .store
            .save_json(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

fn handle_ingredients(config: &PipelineConfig, top_k: usize) -> Result<()> {
    let source = DirectorySource::new(&config.data_dir);
    let mut corpus = Vec::new();
    for unit in source.units()? {
        match source.fetch(&unit) {
            Ok(records) => corpus.extend(records),
            Err(e) if e.is_recoverable() => warn!(%unit, error = %e, "skipping unit"),
            Err(e) => return Err(e.into()),
        }
    }

    let table = IngredientFrequencyTable::from_raw_records(&corpus);
    let vocabulary = table.top(top_k)?;
    for name in vocabulary.names() {
        println!("{:>6}  {name}", table.count(name));
    }
    Ok(())
}
