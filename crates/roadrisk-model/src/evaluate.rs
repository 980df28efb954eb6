//! Held-out evaluation and final refitting of tuned models.

use crate::classifier::{Classifier, Model, ModelKind};
use crate::error::Result;
use crate::metrics::{accuracy, brier_score, log_loss, roc_auc};
use crate::tune::{ParamSet, TuneResult, build_model};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Held-out test metrics for one tuned model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Model name from tuning
    pub name: String,
    /// Model family
    pub kind: ModelKind,
    /// Parameters the model was refit with
    pub params: ParamSet,
    /// Mean validation score from cross-validation
    pub cv_score: f64,
    /// ROC AUC on the held-out test split
    pub roc_auc: f64,
    /// Log loss on the held-out test split
    pub log_loss: f64,
    /// Brier score on the held-out test split
    pub brier: f64,
    /// Accuracy at the 0.5 threshold on the held-out test split
    pub accuracy: f64,
}

/// Refits tuned candidates on the training split and scores them on the
/// held-out test split.
#[derive(Debug, Default)]
pub struct Tester {
    evaluations: BTreeMap<String, Evaluation>,
}

impl Tester {
    /// Create an empty tester.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refit one tuned model on the training split and score it on the test
    /// split.
    pub fn evaluate(
        &mut self,
        tuned: &TuneResult,
        x_train: &Array2<f64>,
        y_train: &Array1<f64>,
        x_test: &Array2<f64>,
        y_test: &Array1<f64>,
    ) -> Result<&Evaluation> {
        let mut model = build_model(tuned.kind, &tuned.best_params)?;
        model.fit(x_train, y_train)?;
        let probs = model.predict_proba(x_test)?;

        let evaluation = Evaluation {
            name: tuned.name.clone(),
            kind: tuned.kind,
            params: tuned.best_params.clone(),
            cv_score: tuned.best_score,
            roc_auc: roc_auc(y_test, &probs)?,
            log_loss: log_loss(y_test, &probs)?,
            brier: brier_score(y_test, &probs)?,
            accuracy: accuracy(y_test, &probs)?,
        };
        self.evaluations.insert(tuned.name.clone(), evaluation);
        Ok(&self.evaluations[&tuned.name])
    }

    /// All evaluations, by model name.
    pub const fn evaluations(&self) -> &BTreeMap<String, Evaluation> {
        &self.evaluations
    }

    /// The evaluation with the best held-out ROC AUC, if any.
    pub fn best(&self) -> Option<&Evaluation> {
        self.evaluations
            .values()
            .max_by(|a, b| a.roc_auc.total_cmp(&b.roc_auc))
    }
}

/// Refit a tuned model on every row and return it with its in-sample
/// predicted probabilities, the pair that gets persisted.
pub fn final_fit(
    tuned: &TuneResult,
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> Result<(Model, Array1<f64>)> {
    let mut model = build_model(tuned.kind, &tuned.best_params)?;
    model.fit(x, y)?;
    let probs = model.predict_proba(x)?;
    Ok((model, probs))
}

/// Fit-and-score helper for quick sensitivity checks: ROC AUC of a fresh
/// model fit and scored on the same rows.
pub fn score_at(
    kind: ModelKind,
    params: &ParamSet,
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> Result<f64> {
    let mut model = build_model(kind, params)?;
    model.fit(x, y)?;
    let probs = model.predict_proba(x)?;
    roc_auc(y, &probs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tune::ParamValue;
    use ndarray::{Array1, Array2};

    fn blobs(n_per_class: usize) -> (Array2<f64>, Array1<f64>) {
        let n = n_per_class * 2;
        let mut x = Array2::<f64>::zeros((n, 1));
        let mut y = Array1::<f64>::zeros(n);
        for i in 0..n_per_class {
            let jitter = (i as f64 * 0.618).fract() - 0.5;
            x[[i, 0]] = -2.0 + jitter;
            x[[n_per_class + i, 0]] = 2.0 + jitter;
            y[n_per_class + i] = 1.0;
        }
        (x, y)
    }

    fn tuned_lr() -> TuneResult {
        let mut params = ParamSet::default();
        params
            .0
            .insert("penalty".to_string(), ParamValue::Text("l2".to_string()));
        params.0.insert("c".to_string(), ParamValue::Float(1.0));
        TuneResult {
            name: "LR_base".to_string(),
            kind: ModelKind::LogisticRegression,
            best_params: params,
            best_score: 0.95,
            candidate_scores: vec![0.95],
        }
    }

    #[test]
    fn test_evaluate_scores_held_out_split() {
        let (x, y) = blobs(10);
        let mut tester = Tester::new();
        let evaluation = tester.evaluate(&tuned_lr(), &x, &y, &x, &y).unwrap();

        assert!(evaluation.roc_auc > 0.95);
        assert!(evaluation.accuracy > 0.9);
        assert_eq!(evaluation.cv_score, 0.95);
    }

    #[test]
    fn test_best_picks_highest_auc() {
        let (x, y) = blobs(10);
        let mut tester = Tester::new();
        tester.evaluate(&tuned_lr(), &x, &y, &x, &y).unwrap();

        // Flipped test labels invert the ranking, driving AUC toward zero
        let mut weak = tuned_lr();
        weak.name = "LR_flipped".to_string();
        let y_flipped = y.mapv(|v| 1.0 - v);
        tester.evaluate(&weak, &x, &y, &x, &y_flipped).unwrap();

        assert_eq!(tester.best().unwrap().name, "LR_base");
    }

    #[test]
    fn test_final_fit_returns_fitted_model_and_predictions() {
        let (x, y) = blobs(10);
        let (model, probs) = final_fit(&tuned_lr(), &x, &y).unwrap();

        assert_eq!(model.kind(), ModelKind::LogisticRegression);
        assert_eq!(probs.len(), x.nrows());
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_score_at_separable_data() {
        let (x, y) = blobs(10);
        let tuned = tuned_lr();
        let score = score_at(tuned.kind, &tuned.best_params, &x, &y).unwrap();
        assert!(score > 0.95);
    }
}
