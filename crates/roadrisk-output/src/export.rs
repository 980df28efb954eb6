//! Export of per-segment predictions and model scores.
//!
//! CSV and JSON serialization for the two tables a training run leaves
//! behind: the full-data risk predictions and the held-out metric rows.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Predicted crash risk for a single road segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionExport {
    /// Road segment identifier.
    pub segment_id: String,

    /// Observed target: 1 if a crash occurred in the target week.
    pub target: i32,

    /// Predicted probability of a crash in the target week.
    pub prediction: f64,
}

impl PredictionExport {
    /// Create a new prediction row.
    pub const fn new(segment_id: String, target: i32, prediction: f64) -> Self {
        Self {
            segment_id,
            target,
            prediction,
        }
    }
}

/// Held-out test metrics for one tuned model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreExport {
    /// Model name used during tuning.
    pub model: String,

    /// Mean cross-validation ROC AUC of the best candidate.
    pub cv_roc_auc: f64,

    /// ROC AUC on the held-out test split.
    pub test_roc_auc: f64,

    /// Log loss on the held-out test split.
    pub test_log_loss: f64,

    /// Brier score on the held-out test split.
    pub test_brier: f64,

    /// Accuracy at the 0.5 threshold on the held-out test split.
    pub test_accuracy: f64,
}

fn csv_writer_to_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for Vec<PredictionExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in self {
                    wtr.serialize(record)?;
                }
                csv_writer_to_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<ScoreExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in self {
                    wtr.serialize(record)?;
                }
                csv_writer_to_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_predictions() -> Vec<PredictionExport> {
        vec![
            PredictionExport::new("00123".to_string(), 1, 0.82),
            PredictionExport::new("17456".to_string(), 0, 0.04),
        ]
    }

    #[test]
    fn test_predictions_export_csv() {
        let csv = sample_predictions()
            .export_to_string(ExportFormat::Csv)
            .unwrap();
        assert!(csv.starts_with("segment_id,target,prediction"));
        assert!(csv.contains("00123,1,0.82"));
        assert!(csv.contains("17456,0,0.04"));
    }

    #[test]
    fn test_predictions_export_json() {
        let json = sample_predictions()
            .export_to_string(ExportFormat::Json)
            .unwrap();
        assert!(json.contains("\"segment_id\":\"00123\""));
        assert!(json.contains("\"prediction\":0.82"));
    }

    #[test]
    fn test_predictions_export_pretty_json() {
        let json = sample_predictions()
            .export_to_string(ExportFormat::PrettyJson)
            .unwrap();
        assert!(json.contains("\"00123\""));
        assert!(json.contains("  ")); // Indentation indicates pretty format
    }

    #[test]
    fn test_scores_export_csv() {
        let scores = vec![ScoreExport {
            model: "LR_base".to_string(),
            cv_roc_auc: 0.81,
            test_roc_auc: 0.79,
            test_log_loss: 0.42,
            test_brier: 0.13,
            test_accuracy: 0.74,
        }];

        let csv = scores.export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("model,cv_roc_auc,test_roc_auc"));
        assert!(csv.contains("LR_base,0.81,0.79"));
    }

    #[test]
    fn test_export_to_file() {
        use std::io::Read;

        let temp_dir = std::env::temp_dir();
        let csv_path = temp_dir.join("test_predictions.csv");

        sample_predictions()
            .export_to_file(&csv_path, ExportFormat::Csv)
            .unwrap();

        let mut content = String::new();
        File::open(&csv_path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert!(content.contains("00123"));

        std::fs::remove_file(csv_path).ok();
    }

    #[test]
    fn test_export_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
