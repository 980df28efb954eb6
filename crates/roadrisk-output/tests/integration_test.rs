//! Integration tests for artifact persistence and prediction export.

use ndarray::array;
use roadrisk_model::{Classifier, LogisticRegression, Model};
use roadrisk_output::{
    ExportFormat, Exporter, ModelScoreLine, PredictionExport, RunSummary, TrainedArtifact,
};

#[test]
fn test_full_persistence_workflow() {
    // Fit a small model, wrap it in an artifact, and round-trip it
    let x = array![[-2.0, 0.0], [-1.0, 1.0], [1.0, 0.0], [2.0, 1.0]];
    let y = array![0.0, 0.0, 1.0, 1.0];
    let mut model = LogisticRegression::default();
    model.fit(&x, &y).unwrap();
    let model = Model::Logistic(model);

    let probs = model.predict_proba(&x).unwrap();

    let artifact = TrainedArtifact::new(
        "LR_base".to_string(),
        20,
        2017,
        vec!["pre_week".to_string(), "intersection".to_string()],
        0.83,
        None,
        model,
    );

    let temp_dir = std::env::temp_dir();
    let artifact_path = temp_dir.join("roadrisk_artifact_workflow.json");
    artifact.save(&artifact_path).unwrap();

    let restored = TrainedArtifact::load(&artifact_path).unwrap();
    std::fs::remove_file(&artifact_path).ok();

    assert_eq!(restored.feature_names.len(), 2);
    assert_eq!(restored.model.predict_proba(&x).unwrap(), probs);

    // Export the per-segment predictions alongside the artifact
    let predictions: Vec<PredictionExport> = probs
        .iter()
        .zip(y.iter())
        .enumerate()
        .map(|(i, (&p, &t))| PredictionExport::new(format!("{:05}", i + 1), t as i32, p))
        .collect();

    let csv = predictions.export_to_string(ExportFormat::Csv).unwrap();
    assert!(csv.starts_with("segment_id,target,prediction"));
    assert_eq!(csv.lines().count(), 5); // header + 4 rows

    let json = predictions
        .export_to_string(ExportFormat::PrettyJson)
        .unwrap();
    assert!(json.contains("\"00001\""));
}

#[test]
fn test_summary_reports_both_models() {
    let summary = RunSummary {
        target_week: 20,
        target_year: 2017,
        n_segments: 500,
        n_features: 12,
        positive_rate: 0.08,
        train_fraction: 0.7,
        scores: vec![
            ModelScoreLine {
                name: "LR_base".to_string(),
                cv_roc_auc: 0.77,
                test_roc_auc: 0.76,
                test_log_loss: 0.46,
                test_brier: 0.15,
                test_accuracy: 0.70,
            },
            ModelScoreLine {
                name: "GBT_base".to_string(),
                cv_roc_auc: 0.82,
                test_roc_auc: 0.80,
                test_log_loss: 0.40,
                test_brier: 0.13,
                test_accuracy: 0.75,
            },
        ],
        selected_model: "GBT_base".to_string(),
    };

    let ascii = summary.to_ascii_table();
    assert!(ascii.contains("LR_base"));
    assert!(ascii.contains("GBT_base"));
    assert!(ascii.contains("Selected model: GBT_base"));

    let markdown = summary.to_markdown();
    assert!(markdown.contains("## Held-Out Scores"));
    assert!(markdown.contains("| LR_base |"));
}
