//! Binary classification metrics.

use crate::error::{ModelError, Result};
use ndarray::Array1;

fn check_lengths(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<()> {
    if y_true.len() != scores.len() {
        return Err(ModelError::DimensionMismatch {
            expected: y_true.len(),
            actual: scores.len(),
        });
    }
    if y_true.is_empty() {
        return Err(ModelError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(())
}

/// Area under the ROC curve via the rank statistic, with tied scores
/// receiving their average rank.
///
/// Requires both classes to be present.
pub fn roc_auc(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, scores)?;

    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&y| y > 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ModelError::DegenerateTarget(
            "ROC AUC needs both classes in the target".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Average ranks over tied score runs
    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|&(&y, _)| y > 0.5)
        .map(|(_, &r)| r)
        .sum();

    let auc = (rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos * n_neg) as f64;
    Ok(auc)
}

/// Binomial log loss with probability clipping.
pub fn log_loss(y_true: &Array1<f64>, probs: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, probs)?;

    const EPS: f64 = 1e-15;
    let total: f64 = y_true
        .iter()
        .zip(probs)
        .map(|(&y, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();

    Ok(total / y_true.len() as f64)
}

/// Brier score: mean squared error of the predicted probabilities.
pub fn brier_score(y_true: &Array1<f64>, probs: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, probs)?;

    let total: f64 = y_true
        .iter()
        .zip(probs)
        .map(|(&y, &p)| (p - y).powi(2))
        .sum();

    Ok(total / y_true.len() as f64)
}

/// Accuracy at the 0.5 probability threshold.
pub fn accuracy(y_true: &Array1<f64>, probs: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, probs)?;

    let correct = y_true
        .iter()
        .zip(probs)
        .filter(|&(&y, &p)| (p >= 0.5) == (y > 0.5))
        .count();

    Ok(correct as f64 / y_true.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_roc_auc_perfect_ranking() {
        let y = array![0.0, 0.0, 1.0, 1.0];
        let scores = array![0.1, 0.2, 0.8, 0.9];
        assert_relative_eq!(roc_auc(&y, &scores).unwrap(), 1.0);
    }

    #[test]
    fn test_roc_auc_inverted_ranking() {
        let y = array![1.0, 1.0, 0.0, 0.0];
        let scores = array![0.1, 0.2, 0.8, 0.9];
        assert_relative_eq!(roc_auc(&y, &scores).unwrap(), 0.0);
    }

    #[test]
    fn test_roc_auc_with_ties() {
        // All scores equal: AUC is exactly 0.5 by the average-rank rule
        let y = array![0.0, 1.0, 0.0, 1.0];
        let scores = array![0.5, 0.5, 0.5, 0.5];
        assert_relative_eq!(roc_auc(&y, &scores).unwrap(), 0.5);
    }

    #[test]
    fn test_roc_auc_partial() {
        // One discordant pair out of four: AUC = 3/4
        let y = array![0.0, 1.0, 0.0, 1.0];
        let scores = array![0.1, 0.3, 0.35, 0.8];
        assert_relative_eq!(roc_auc(&y, &scores).unwrap(), 0.75);
    }

    #[test]
    fn test_roc_auc_single_class_errors() {
        let y = array![1.0, 1.0];
        let scores = array![0.5, 0.6];
        assert!(matches!(
            roc_auc(&y, &scores),
            Err(ModelError::DegenerateTarget(_))
        ));
    }

    #[test]
    fn test_log_loss_confident_and_correct() {
        let y = array![1.0, 0.0];
        let probs = array![0.9, 0.1];
        assert_relative_eq!(
            log_loss(&y, &probs).unwrap(),
            -(0.9f64.ln()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_log_loss_clips_extremes() {
        let y = array![1.0];
        let probs = array![0.0];
        assert!(log_loss(&y, &probs).unwrap().is_finite());
    }

    #[test]
    fn test_brier_score() {
        let y = array![1.0, 0.0];
        let probs = array![0.8, 0.3];
        assert_relative_eq!(
            brier_score(&y, &probs).unwrap(),
            (0.04 + 0.09) / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_accuracy_threshold() {
        let y = array![1.0, 0.0, 1.0, 0.0];
        let probs = array![0.7, 0.4, 0.2, 0.6];
        assert_relative_eq!(accuracy(&y, &probs).unwrap(), 0.5);
    }

    #[test]
    fn test_length_mismatch() {
        let y = array![1.0, 0.0];
        let probs = array![0.5];
        assert!(matches!(
            accuracy(&y, &probs),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }
}
