//! Serialized model artifacts.
//!
//! A training run persists the refit model together with enough metadata to
//! reproduce its feature matrix: model name, target week and year, ordered
//! feature names, and the held-out score it was selected on.

use chrono::{DateTime, Utc};
use roadrisk_features::StandardScaler;
use roadrisk_model::Model;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when saving or loading artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A trained model with its training metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedArtifact {
    /// Model name used during tuning.
    pub model_name: String,

    /// Week of the year the model predicts crashes for.
    pub target_week: u32,

    /// Year the target week falls in.
    pub target_year: i32,

    /// Feature names in matrix column order.
    pub feature_names: Vec<String>,

    /// ROC AUC on the held-out test split.
    pub test_roc_auc: f64,

    /// Artifact creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Column scaling the model was fit with, if any.
    pub scaler: Option<StandardScaler>,

    /// The refit model.
    pub model: Model,
}

impl TrainedArtifact {
    /// Create a new artifact stamped with the current time.
    pub fn new(
        model_name: String,
        target_week: u32,
        target_year: i32,
        feature_names: Vec<String>,
        test_roc_auc: f64,
        scaler: Option<StandardScaler>,
        model: Model,
    ) -> Self {
        Self {
            model_name,
            target_week,
            target_year,
            feature_names,
            test_roc_auc,
            created_at: Utc::now(),
            scaler,
            model,
        }
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, ArtifactError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the artifact to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Read an artifact back from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadrisk_model::{Classifier, LogisticRegression, ModelKind};
    use ndarray::array;

    fn fitted_artifact() -> TrainedArtifact {
        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let mut model = LogisticRegression::default();
        model.fit(&x, &y).unwrap();

        TrainedArtifact::new(
            "LR_base".to_string(),
            20,
            2017,
            vec!["pre_week".to_string()],
            0.83,
            None,
            Model::Logistic(model),
        )
    }

    #[test]
    fn test_to_json_carries_metadata() {
        let json = fitted_artifact().to_json().unwrap();
        assert!(json.contains("\"model_name\": \"LR_base\""));
        assert!(json.contains("\"target_week\": 20"));
        assert!(json.contains("\"pre_week\""));
    }

    #[test]
    fn test_save_load_preserves_predictions() {
        let artifact = fitted_artifact();
        let x = array![[-2.0], [2.0]];
        let before = artifact.model.predict_proba(&x).unwrap();

        let path = std::env::temp_dir().join("test_trained_artifact.json");
        artifact.save(&path).unwrap();
        let restored = TrainedArtifact::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored.model_name, "LR_base");
        assert_eq!(restored.model.kind(), ModelKind::LogisticRegression);
        let after = restored.model.predict_proba(&x).unwrap();
        assert_eq!(before, after);
    }
}
