//! roadrisk CLI binary.
//!
//! Command-line interface for the weekly crash-risk model.

use clap::{Parser, Subcommand};
use roadrisk_bin::pipeline::{ModelChoice, TrainOptions, run_train};
use roadrisk::CityConfig;
use roadrisk_features::registry::{FeatureKind, features_by_kind};
use roadrisk_model::CvParams;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "roadrisk")]
#[command(about = "roadrisk: Weekly crash-risk modeling for road segments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train crash-risk models for a target week
    Train {
        /// Segment/week crash dataset (CSV, optionally gzipped)
        #[arg(long)]
        seg_data: PathBuf,

        /// Week of the year to predict (must leave 16 weeks of history)
        #[arg(long)]
        week: i32,

        /// Year the target week falls in
        #[arg(long)]
        year: i32,

        /// Citizen concern column to merge as an exposure feature
        #[arg(long)]
        concern: Option<String>,

        /// Base year the concern reports cover
        #[arg(long, default_value = "2016")]
        concern_year: i32,

        /// ATR counts file (CSV)
        #[arg(long)]
        atr_data: Option<PathBuf>,

        /// ATR columns to merge, comma-separated
        #[arg(long, value_delimiter = ',', default_value = "speed_coalesced,volume_coalesced")]
        atr_columns: Vec<String>,

        /// TMC conflict summary file (JSON)
        #[arg(long)]
        tmc_data: Option<PathBuf>,

        /// TMC columns to merge, comma-separated
        #[arg(long, value_delimiter = ',', default_value = "Conflict")]
        tmc_columns: Vec<String>,

        /// Categorical segment attributes, comma-separated
        #[arg(long, value_delimiter = ',')]
        f_cat: Vec<String>,

        /// Continuous segment attributes, comma-separated
        #[arg(long, value_delimiter = ',')]
        f_cont: Vec<String>,

        /// City configuration file contributing feature lists
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip dummy encoding, log transforms, and the intersection flag
        #[arg(long)]
        no_process: bool,

        /// Which model families to tune
        #[arg(long, value_enum, default_value_t = ModelChoice::Both)]
        model: ModelChoice,

        /// Directory for predictions, scores, and the model artifact
        #[arg(long, default_value = "data/processed")]
        out_dir: PathBuf,

        /// RNG seed for splits and the parameter search
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Fraction of segments used for training
        #[arg(long, default_value = "0.7")]
        train_fraction: f64,

        /// Number of sampled hyperparameter candidates per model
        #[arg(long, default_value = "5")]
        iterations: usize,

        /// Number of cross-validation folds
        #[arg(long, default_value = "5")]
        folds: usize,
    },

    /// List the engineered features
    Features,

    /// Validate a city configuration file
    Config {
        /// Path to the YAML configuration
        path: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            seg_data,
            week,
            year,
            concern,
            concern_year,
            atr_data,
            atr_columns,
            tmc_data,
            tmc_columns,
            mut f_cat,
            mut f_cont,
            config,
            no_process,
            model,
            out_dir,
            seed,
            train_fraction,
            iterations,
            folds,
        } => {
            if let Some(path) = config {
                let city = CityConfig::load(&path)?;
                println!("Using configuration for {}", city.city);
                let features = city.feature_list();
                f_cat.extend(features.categorical);
                f_cont.extend(features.continuous);
                f_cont.extend(features.default);
            }

            let options = TrainOptions {
                seg_data,
                week,
                year,
                concern,
                concern_year,
                atr_data,
                atr_columns,
                tmc_data,
                tmc_columns,
                categorical: f_cat,
                continuous: f_cont,
                process: !no_process,
                models: model,
                out_dir,
                seed,
                train_fraction,
                cv: CvParams {
                    folds,
                    iterations,
                    shuffle: true,
                },
            };

            let summary = run_train(&options)?;
            println!("{}", summary.to_ascii_table());
        }
        Commands::Features => list_features(),
        Commands::Config { path } => validate_config(&path)?,
    }

    Ok(())
}

fn list_features() {
    println!("Engineered Features");
    println!("===================\n");

    let kinds = [
        (FeatureKind::Lag, "Crash lags (relative to the target week)"),
        (FeatureKind::Static, "Static segment attributes"),
        (FeatureKind::Exposure, "External exposure sources"),
        (FeatureKind::Derived, "Derived from the segment id"),
    ];

    for (kind, heading) in kinds {
        println!("{heading}:");
        for feature in features_by_kind(kind) {
            println!("  {:<16} {}", feature.name, feature.description);
        }
        println!();
    }
}

fn validate_config(path: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = CityConfig::load(path)?;
    println!("✓ Parsed configuration for {}", config.city);
    println!("  Timezone:    {}", config.timezone);
    println!("  Crash files: {}", config.crashes_files.len());

    let features = config.feature_list();
    println!("  Categorical: {}", features.categorical.join(", "));
    println!("  Continuous:  {}", features.continuous.join(", "));
    if !features.default.is_empty() {
        println!("  Untyped:     {}", features.default.join(", "));
    }

    Ok(())
}
