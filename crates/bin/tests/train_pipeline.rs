//! End-to-end training run over a small synthetic city.

use roadrisk_bin::pipeline::{ModelChoice, TrainOptions, run_train};
use roadrisk_model::CvParams;
use roadrisk_output::TrainedArtifact;
use std::fmt::Write as _;

/// 60 segments over 20 weeks of 2017. Even-numbered segments crash every
/// other week, including the target week; odd-numbered ones only in the
/// first two weeks, so the lag features carry a clean signal.
fn synthetic_segments() -> String {
    let mut csv = String::from("segment_id,year,week,crash,SPEEDLIMIT,AADT\n");
    for i in 0..60u32 {
        let id = 1000 + i;
        let speed = if i % 4 < 2 { 30 } else { 40 };
        let aadt = 5000 + 100 * i;
        for week in 1..=20u32 {
            let crash = if i % 2 == 0 {
                u32::from(week % 2 == 0)
            } else {
                u32::from(week <= 2)
            };
            writeln!(csv, "{id},2017,{week},{crash},{speed},{aadt}").unwrap();
        }
    }
    csv
}

#[test]
fn test_train_pipeline_writes_outputs() {
    let dir = std::env::temp_dir().join("roadrisk_train_pipeline_test");
    std::fs::remove_dir_all(&dir).ok();
    std::fs::create_dir_all(&dir).unwrap();
    let seg_path = dir.join("segments.csv");
    std::fs::write(&seg_path, synthetic_segments()).unwrap();

    let out_dir = dir.join("out");
    let options = TrainOptions {
        seg_data: seg_path,
        week: 20,
        year: 2017,
        concern: None,
        concern_year: 2016,
        atr_data: None,
        atr_columns: vec![],
        tmc_data: None,
        tmc_columns: vec![],
        categorical: vec!["SPEEDLIMIT".to_string()],
        continuous: vec!["AADT".to_string()],
        process: true,
        models: ModelChoice::Lr,
        out_dir: out_dir.clone(),
        seed: 7,
        train_fraction: 0.7,
        cv: CvParams {
            folds: 3,
            iterations: 2,
            shuffle: true,
        },
    };

    let summary = run_train(&options).unwrap();
    assert_eq!(summary.n_segments, 60);
    assert_eq!(summary.selected_model, "LR_base");

    let predictions = std::fs::read_to_string(out_dir.join("predictions.csv")).unwrap();
    let mut lines = predictions.lines();
    assert_eq!(lines.next(), Some("segment_id,target,prediction"));
    assert_eq!(lines.count(), 60);

    let artifact = TrainedArtifact::load(&out_dir.join("trained_model.json")).unwrap();
    assert_eq!(artifact.model_name, "LR_base");
    assert_eq!(artifact.target_week, 20);
    assert!(artifact.scaler.is_some());
    assert!(!artifact.feature_names.is_empty());
    assert!(artifact.test_roc_auc > 0.9);

    assert!(out_dir.join("model_scores.csv").exists());
    assert!(out_dir.join("run_summary.md").exists());

    std::fs::remove_dir_all(&dir).ok();
}
