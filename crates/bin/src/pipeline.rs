//! The end-to-end training pipeline behind `roadrisk train`.
//!
//! Reads the segment/week crash dataset and its optional exposure sources,
//! builds the crash-lag modeling table for the target week, tunes the
//! requested classifiers, and persists predictions, scores, and the refit
//! model under the output directory.

use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use roadrisk_data::{
    CRASH, SEGMENT_ID, concern_exposure, filter_nonzero_segments, read_atr, read_segment_dataset,
    read_tmc, static_attributes,
};
use roadrisk_features::{
    CrashLagConfig, FeatureSet, LAG_COLUMNS, StandardScaler, crash_lags, dummy_encode,
    intersection_flag, log_transform,
};
use roadrisk_model::dataset::{take, take_rows};
use roadrisk_model::{
    CvParams, Evaluation, Model, ModelKind, ModelTable, Tester, TrainTestSplit, TuneResult, Tuner,
    final_fit, gbt_search_space, lr_search_space,
};
use roadrisk_output::{
    ExportFormat, Exporter, ModelScoreLine, PredictionExport, RunSummary, ScoreExport,
    TrainedArtifact,
};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;

/// Which model families to tune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelChoice {
    /// Logistic regression only
    Lr,
    /// Gradient-boosted trees only
    Gbt,
    /// Both families
    Both,
}

/// Everything `roadrisk train` needs.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Segment/week crash dataset path
    pub seg_data: PathBuf,
    /// Week of the year to predict
    pub week: i32,
    /// Year the target week falls in
    pub year: i32,
    /// Concern column to merge, if any
    pub concern: Option<String>,
    /// Base year the concern reports cover
    pub concern_year: i32,
    /// ATR counts file, if any
    pub atr_data: Option<PathBuf>,
    /// ATR columns to merge
    pub atr_columns: Vec<String>,
    /// TMC conflict file, if any
    pub tmc_data: Option<PathBuf>,
    /// TMC columns to merge
    pub tmc_columns: Vec<String>,
    /// Categorical segment attributes
    pub categorical: Vec<String>,
    /// Continuous segment attributes
    pub continuous: Vec<String>,
    /// Whether to dummy-encode, log-transform, and derive flags
    pub process: bool,
    /// Model families to tune
    pub models: ModelChoice,
    /// Output directory
    pub out_dir: PathBuf,
    /// RNG seed for splits and the parameter search
    pub seed: u64,
    /// Fraction of segments used for training
    pub train_fraction: f64,
    /// Cross-validation settings
    pub cv: CvParams,
}

fn step(message: &str) {
    print!("{message}...");
    let _ = std::io::stdout().flush();
}

fn tuning_bar(iterations: usize, name: &str) -> ProgressBar {
    let pb = ProgressBar::new(iterations as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("█▓░"),
    );
    pb.set_message(format!("Tuning {name}..."));
    pb
}

/// One row per segment with all segment-level feature columns merged in.
fn build_segment_frame(
    df: &DataFrame,
    opts: &TrainOptions,
    continuous: &mut Vec<String>,
) -> Result<DataFrame, Box<dyn Error>> {
    let raw_static: Vec<String> = opts
        .categorical
        .iter()
        .chain(&opts.continuous)
        .cloned()
        .collect();

    let mut segments = if raw_static.is_empty() {
        df.clone()
            .lazy()
            .group_by([col(SEGMENT_ID)])
            .agg([col("week").count().alias("_n")])
            .drop(["_n"])
            .sort([SEGMENT_ID], Default::default())
            .collect()?
    } else {
        static_attributes(df, &raw_static)?
    };

    if let Some(concern) = &opts.concern {
        let observed = concern_exposure(df, concern, opts.concern_year)?;
        segments = segments
            .lazy()
            .join(
                observed.lazy(),
                [col(SEGMENT_ID)],
                [col(SEGMENT_ID)],
                JoinArgs::new(JoinType::Left),
            )
            .with_columns([col(concern.as_str()).fill_null(lit(0))])
            .collect()?;
        continuous.push(concern.clone());
    }

    if let Some(path) = &opts.atr_data {
        let atr = read_atr(path, &opts.atr_columns)?;
        segments = segments
            .lazy()
            .join(
                atr.lazy(),
                [col(SEGMENT_ID)],
                [col(roadrisk_data::ATR_ID)],
                JoinArgs::new(JoinType::Inner),
            )
            .collect()?;
        continuous.extend(opts.atr_columns.iter().cloned());
    }

    if let Some(path) = &opts.tmc_data {
        let tmc = read_tmc(path, &opts.tmc_columns)?;
        let fills: Vec<Expr> = opts
            .tmc_columns
            .iter()
            .map(|c| col(c.as_str()).fill_null(lit(0)))
            .collect();
        segments = segments
            .lazy()
            .join(
                tmc.lazy(),
                [col(SEGMENT_ID)],
                [col(roadrisk_data::TMC_NEAR_ID)],
                JoinArgs::new(JoinType::Left),
            )
            .with_columns(fills)
            .collect()?;
        continuous.extend(opts.tmc_columns.iter().cloned());
    }

    Ok(segments)
}

/// Dummy-encode categoricals, log-transform continuous columns, and derive
/// the intersection flag. Returns the processed frame and the feature lists.
fn process_features(
    mut segments: DataFrame,
    categorical: &[String],
    continuous: &[String],
) -> Result<(DataFrame, FeatureSet), Box<dyn Error>> {
    let raw: Vec<String> = categorical.iter().chain(continuous).cloned().collect();
    let mut features = FeatureSet::new(&raw);
    features.extend(&LAG_COLUMNS.map(String::from));

    for column in categorical {
        let (encoded, names) = dummy_encode(segments, column)?;
        segments = encoded;
        features.extend_dummies(&names);
    }

    let (transformed, log_names) = log_transform(segments, continuous)?;
    segments = transformed;
    features.extend(&log_names);

    segments = intersection_flag(segments)?;
    features.push("intersection");

    features.remove_raw(&raw);
    Ok((segments, features))
}

/// Run the full training pipeline, returning the run summary.
pub fn run_train(opts: &TrainOptions) -> Result<RunSummary, Box<dyn Error>> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!(
        "║{:^62}║",
        format!("CRASH RISK TRAINING: week {} of {}", opts.week, opts.year)
    );
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    step("Reading segment dataset");
    let df = match read_segment_dataset(&opts.seg_data) {
        Ok(df) => {
            println!(" ✓ ({} rows)", df.height());
            df
        }
        Err(e) => {
            println!(" ✗");
            return Err(Box::new(e));
        }
    };

    step("Filtering to segments with crashes");
    let df = filter_nonzero_segments(&df)?;
    println!(" ✓ ({} rows)", df.height());

    step("Merging segment attributes and exposure sources");
    let mut continuous = opts.continuous.clone();
    let segments = build_segment_frame(&df, opts, &mut continuous)?;
    println!(" ✓ ({} segments)", segments.height());

    step("Building crash-lag features");
    let lag_config = CrashLagConfig::new(opts.week, opts.year)?;
    let lags = crash_lags(&df, CRASH, lag_config)?;
    println!(" ✓");

    let (segments, features) = if opts.process {
        step("Processing attribute features");
        let (segments, features) = process_features(segments, &opts.categorical, &continuous)?;
        println!(
            " ✓ ({} features, {} linear)",
            features.all.len(),
            features.linear.len()
        );
        (segments, features)
    } else {
        let raw: Vec<String> = opts.categorical.iter().chain(&continuous).cloned().collect();
        let mut features = FeatureSet::new(&raw);
        features.extend(&LAG_COLUMNS.map(String::from));
        (segments, features)
    };

    step("Assembling modeling table");
    let table = ModelTable::assemble(&lags, &segments)?;
    let y = table.target()?;
    let positive_rate = y.sum() / y.len() as f64;
    println!(
        " ✓ ({} segments, {:.2}% crash rate)",
        table.len(),
        positive_rate * 100.0
    );

    let x_all = table.features(&features.all)?;
    let x_linear_raw = table.features(&features.linear)?;

    let split = TrainTestSplit::new(table.len(), opts.train_fraction, opts.seed)?;
    let scale_pos_weight = table.positive_class_weight()?;

    // Scaling statistics come from the training rows only
    let scaler = StandardScaler::fit(&take_rows(&x_linear_raw, &split.train));
    let x_linear = scaler.transform(&x_linear_raw)?;

    let mut jobs: Vec<(&str, ModelKind)> = Vec::new();
    if matches!(opts.models, ModelChoice::Lr | ModelChoice::Both) {
        jobs.push(("LR_base", ModelKind::LogisticRegression));
    }
    if matches!(opts.models, ModelChoice::Gbt | ModelChoice::Both) {
        jobs.push(("GBT_base", ModelKind::GradientBoostedTrees));
    }

    let mut tuner = Tuner::new(opts.seed);
    let mut tester = Tester::new();

    println!();
    for (name, kind) in &jobs {
        let (x, space) = match kind {
            ModelKind::LogisticRegression => (&x_linear, lr_search_space()),
            ModelKind::GradientBoostedTrees => (&x_all, gbt_search_space(scale_pos_weight)),
        };

        let pb = tuning_bar(opts.cv.iterations, name);
        let tuned: TuneResult = tuner
            .tune_with_progress(
                name,
                *kind,
                &take_rows(x, &split.train),
                &take(&y, &split.train),
                &opts.cv,
                &space,
                |_, score| {
                    pb.inc(1);
                    pb.set_message(format!("candidate AUC {score:.4}"));
                },
            )?
            .clone();
        pb.finish_with_message(format!(
            "{name}: best CV AUC {:.4} ({})",
            tuned.best_score, tuned.best_params
        ));

        tester.evaluate(
            &tuned,
            &take_rows(x, &split.train),
            &take(&y, &split.train),
            &take_rows(x, &split.test),
            &take(&y, &split.test),
        )?;
    }

    let best: Evaluation = tester
        .best()
        .ok_or("no model was evaluated")?
        .clone();
    let tuned = tuner.result(&best.name)?.clone();

    step(&format!("\nRefitting {} on all segments", best.name));
    let (x_final, feature_names, final_scaler): (&Array2<f64>, &[String], Option<StandardScaler>) =
        match tuned.kind {
            ModelKind::LogisticRegression => (&x_linear, &features.linear, Some(scaler)),
            ModelKind::GradientBoostedTrees => (&x_all, &features.all, None),
        };
    let (model, probabilities): (Model, Array1<f64>) = final_fit(&tuned, x_final, &y)?;
    println!(" ✓");

    step("Writing outputs");
    std::fs::create_dir_all(&opts.out_dir)?;

    let predictions: Vec<PredictionExport> = table
        .segment_ids()?
        .into_iter()
        .zip(y.iter())
        .zip(probabilities.iter())
        .map(|((segment_id, &target), &p)| PredictionExport::new(segment_id, target as i32, p))
        .collect();
    predictions.export_to_file(&opts.out_dir.join("predictions.csv"), ExportFormat::Csv)?;

    let scores: Vec<ScoreExport> = tester
        .evaluations()
        .values()
        .map(|e| ScoreExport {
            model: e.name.clone(),
            cv_roc_auc: e.cv_score,
            test_roc_auc: e.roc_auc,
            test_log_loss: e.log_loss,
            test_brier: e.brier,
            test_accuracy: e.accuracy,
        })
        .collect();
    scores.export_to_file(&opts.out_dir.join("model_scores.csv"), ExportFormat::Csv)?;

    let artifact = TrainedArtifact::new(
        best.name.clone(),
        opts.week as u32,
        opts.year,
        feature_names.to_vec(),
        best.roc_auc,
        final_scaler,
        model,
    );
    artifact.save(&opts.out_dir.join("trained_model.json"))?;

    let summary = RunSummary {
        target_week: opts.week as u32,
        target_year: opts.year,
        n_segments: table.len(),
        n_features: features.all.len(),
        positive_rate,
        train_fraction: opts.train_fraction,
        scores: tester
            .evaluations()
            .values()
            .map(|e| ModelScoreLine {
                name: e.name.clone(),
                cv_roc_auc: e.cv_score,
                test_roc_auc: e.roc_auc,
                test_log_loss: e.log_loss,
                test_brier: e.brier,
                test_accuracy: e.accuracy,
            })
            .collect(),
        selected_model: best.name,
    };
    std::fs::write(opts.out_dir.join("run_summary.md"), summary.to_markdown())?;
    println!(" ✓ ({})", opts.out_dir.display());

    Ok(summary)
}
