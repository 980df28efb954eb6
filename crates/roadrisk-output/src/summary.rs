//! Run summaries for a training pass.
//!
//! Collects the modeling table shape, class balance, and per-model held-out
//! scores into a structure that renders as an ASCII table or Markdown.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Held-out scores for one model, as rendered in the summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelScoreLine {
    /// Model name used during tuning.
    pub name: String,

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

impl fmt::Display for ModelScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: test AUC {:.4} (cv {:.4}, log loss {:.4})",
            self.name, self.test_roc_auc, self.cv_roc_auc, self.test_log_loss
        )
    }
}

/// Summary of one training run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Week of the year the models predict crashes for.
    pub target_week: u32,

    /// Year the target week falls in.
    pub target_year: i32,

    /// Number of road segments in the modeling table.
    pub n_segments: usize,

    /// Number of feature columns in the matrix.
    pub n_features: usize,

    /// Fraction of segments with a crash in the target week.
    pub positive_rate: f64,

    /// Fraction of rows used for training.
    pub train_fraction: f64,

    /// Per-model held-out scores.
    pub scores: Vec<ModelScoreLine>,

    /// Name of the model selected for the final refit.
    pub selected_model: String,
}

impl RunSummary {
    /// Render as a fixed-width ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nCrash Risk Training Run: week {} of {}\n",
            self.target_week, self.target_year
        ));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        output.push_str("\nModeling Table:\n");
        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "  Road segments:            {}\n",
            self.n_segments
        ));
        output.push_str(&format!(
            "  Feature columns:          {}\n",
            self.n_features
        ));
        output.push_str(&format!(
            "  Crash rate (target week): {:.2}%\n",
            self.positive_rate * 100.0
        ));
        output.push_str(&format!(
            "  Training fraction:        {:.0}%\n",
            self.train_fraction * 100.0
        ));

        if !self.scores.is_empty() {
            output.push_str("\nHeld-Out Scores:\n");
            output.push_str(&"-".repeat(80));
            output.push('\n');
            output.push_str(&format!(
                "  {:<12} {:>8} {:>10} {:>10} {:>8} {:>10}\n",
                "Model", "CV AUC", "Test AUC", "Log Loss", "Brier", "Accuracy"
            ));
            for line in &self.scores {
                output.push_str(&format!(
                    "  {:<12} {:>8.4} {:>10.4} {:>10.4} {:>8.4} {:>9.1}%\n",
                    line.name,
                    line.cv_roc_auc,
                    line.test_roc_auc,
                    line.test_log_loss,
                    line.test_brier,
                    line.test_accuracy * 100.0
                ));
            }
        }

        output.push_str(&format!("\nSelected model: {}\n", self.selected_model));
        output
    }

    /// Render as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# Crash Risk Training Run: week {} of {}\n\n",
            self.target_week, self.target_year
        ));

        output.push_str("## Modeling Table\n\n");
        output.push_str(&format!("- **Road segments:** {}\n", self.n_segments));
        output.push_str(&format!("- **Feature columns:** {}\n", self.n_features));
        output.push_str(&format!(
            "- **Crash rate (target week):** {:.2}%\n",
            self.positive_rate * 100.0
        ));
        output.push_str(&format!(
            "- **Training fraction:** {:.0}%\n\n",
            self.train_fraction * 100.0
        ));

        if !self.scores.is_empty() {
            output.push_str("## Held-Out Scores\n\n");
            output.push_str("| Model | CV AUC | Test AUC | Log Loss | Brier | Accuracy |\n");
            output.push_str("|-------|--------|----------|----------|-------|----------|\n");
            for line in &self.scores {
                output.push_str(&format!(
                    "| {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.1}% |\n",
                    line.name,
                    line.cv_roc_auc,
                    line.test_roc_auc,
                    line.test_log_loss,
                    line.test_brier,
                    line.test_accuracy * 100.0
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!("**Selected model:** {}\n", self.selected_model));
        output
    }
}
