//! Randomized hyperparameter search with k-fold cross-validation.
//!
//! Candidates are drawn from per-parameter distributions (choice lists,
//! integer ranges, Beta variates) and scored by mean validation ROC AUC;
//! the best candidate per named model is retained for final evaluation.

use crate::boosted::{BoostedConfig, GradientBoostedTrees};
use crate::classifier::{Classifier, Model, ModelKind};
use crate::error::{ModelError, Result};
use crate::logistic::{ClassWeight, LogisticConfig, LogisticRegression, Penalty};
use crate::dataset;
use crate::metrics::roc_auc;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sampled hyperparameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    /// Integer parameter
    Int(i64),
    /// Floating-point parameter
    Float(f64),
    /// Text parameter (e.g. penalty names)
    Text(String),
}

impl ParamValue {
    /// Integer view of the value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float view of the value (integers widen).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text view of the value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.4}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// A per-parameter sampling distribution.
#[derive(Debug, Clone)]
pub enum ParamDistribution {
    /// Uniform choice from a list
    Choice(Vec<ParamValue>),
    /// Uniform integer from `lo..hi` (exclusive upper bound)
    IntRange {
        /// Inclusive lower bound
        lo: i64,
        /// Exclusive upper bound
        hi: i64,
    },
    /// Beta(a, b) variate on (0, 1)
    Beta {
        /// Alpha shape parameter
        a: f64,
        /// Beta shape parameter
        b: f64,
    },
    /// Always the same value
    Fixed(ParamValue),
}

impl ParamDistribution {
    /// Draw one value.
    pub fn sample(&self, rng: &mut StdRng) -> Result<ParamValue> {
        match self {
            Self::Choice(values) => values
                .choose(rng)
                .cloned()
                .ok_or_else(|| ModelError::InvalidParameter("empty choice list".to_string())),
            Self::IntRange { lo, hi } => {
                if lo >= hi {
                    return Err(ModelError::InvalidParameter(format!(
                        "empty integer range {lo}..{hi}"
                    )));
                }
                Ok(ParamValue::Int(rng.gen_range(*lo..*hi)))
            }
            Self::Beta { a, b } => {
                let beta = rand_distr::Beta::new(*a, *b).map_err(|e| {
                    ModelError::InvalidParameter(format!("Beta({a}, {b}): {e}"))
                })?;
                Ok(ParamValue::Float(beta.sample(rng)))
            }
            Self::Fixed(value) => Ok(value.clone()),
        }
    }
}

/// A named set of distributions to sample candidates from.
pub type SearchSpace = Vec<(String, ParamDistribution)>;

/// One sampled candidate: parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSet(pub BTreeMap<String, ParamValue>);

impl ParamSet {
    /// Look up a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }
}

impl std::fmt::Display for ParamSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Sample one candidate from a search space.
pub fn sample_params(space: &SearchSpace, rng: &mut StdRng) -> Result<ParamSet> {
    let mut params = BTreeMap::new();
    for (name, distribution) in space {
        params.insert(name.clone(), distribution.sample(rng)?);
    }
    Ok(ParamSet(params))
}

/// The logistic regression search space: penalty in {l1, l2}, `C` drawn
/// from Beta(5, 2), balanced class weights.
pub fn lr_search_space() -> SearchSpace {
    vec![
        (
            "penalty".to_string(),
            ParamDistribution::Choice(vec![
                ParamValue::Text("l1".to_string()),
                ParamValue::Text("l2".to_string()),
            ]),
        ),
        ("c".to_string(), ParamDistribution::Beta { a: 5.0, b: 2.0 }),
        (
            "class_weight".to_string(),
            ParamDistribution::Choice(vec![ParamValue::Text("balanced".to_string())]),
        ),
    ]
}

/// The gradient-boosted trees search space: depth 3..7, child weight 1..5,
/// learning rate from Beta(2, 15), fixed positive-class scale.
pub fn gbt_search_space(scale_pos_weight: f64) -> SearchSpace {
    vec![
        (
            "max_depth".to_string(),
            ParamDistribution::IntRange { lo: 3, hi: 7 },
        ),
        (
            "min_child_weight".to_string(),
            ParamDistribution::IntRange { lo: 1, hi: 5 },
        ),
        (
            "learning_rate".to_string(),
            ParamDistribution::Beta { a: 2.0, b: 15.0 },
        ),
        (
            "scale_pos_weight".to_string(),
            ParamDistribution::Fixed(ParamValue::Float(scale_pos_weight)),
        ),
    ]
}

/// Instantiate an unfitted model of the given kind from sampled parameters.
///
/// Parameters absent from the set keep their config defaults; unknown
/// parameter names are rejected.
pub fn build_model(kind: ModelKind, params: &ParamSet) -> Result<Model> {
    match kind {
        ModelKind::LogisticRegression => {
            let mut config = LogisticConfig::default();
            for (name, value) in &params.0 {
                match name.as_str() {
                    "penalty" => {
                        config.penalty = match value.as_str() {
                            Some("l1") => Penalty::L1,
                            Some("l2") => Penalty::L2,
                            _ => {
                                return Err(ModelError::InvalidParameter(format!(
                                    "penalty must be l1 or l2, got {value}"
                                )));
                            }
                        }
                    }
                    "c" => {
                        config.c = value.as_f64().ok_or_else(|| {
                            ModelError::InvalidParameter("c must be numeric".to_string())
                        })?
                    }
                    "class_weight" => {
                        config.class_weight = match value.as_str() {
                            Some("balanced") => ClassWeight::Balanced,
                            Some("none") => ClassWeight::None,
                            _ => {
                                return Err(ModelError::InvalidParameter(format!(
                                    "class_weight must be balanced or none, got {value}"
                                )));
                            }
                        }
                    }
                    other => {
                        return Err(ModelError::InvalidParameter(format!(
                            "unknown logistic regression parameter '{other}'"
                        )));
                    }
                }
            }
            Ok(Model::Logistic(LogisticRegression::new(config)))
        }
        ModelKind::GradientBoostedTrees => {
            let mut config = BoostedConfig::default();
            for (name, value) in &params.0 {
                let numeric = || {
                    value.as_f64().ok_or_else(|| {
                        ModelError::InvalidParameter(format!("{name} must be numeric"))
                    })
                };
                match name.as_str() {
                    "n_estimators" => config.n_estimators = numeric()? as usize,
                    "max_depth" => config.max_depth = numeric()? as usize,
                    "min_child_weight" => config.min_child_weight = numeric()?,
                    "learning_rate" => config.learning_rate = numeric()?,
                    "scale_pos_weight" => config.scale_pos_weight = numeric()?,
                    other => {
                        return Err(ModelError::InvalidParameter(format!(
                            "unknown gradient boosting parameter '{other}'"
                        )));
                    }
                }
            }
            Ok(Model::Boosted(GradientBoostedTrees::new(config)))
        }
    }
}

/// Cross-validation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvParams {
    /// Number of folds (default: 5)
    pub folds: usize,
    /// Number of sampled candidates (default: 5)
    pub iterations: usize,
    /// Shuffle rows before folding (default: true)
    pub shuffle: bool,
}

impl Default for CvParams {
    fn default() -> Self {
        Self {
            folds: 5,
            iterations: 5,
            shuffle: true,
        }
    }
}

/// Outcome of tuning one named model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuneResult {
    /// Model name given at tune time
    pub name: String,
    /// Model family
    pub kind: ModelKind,
    /// Best candidate's parameters
    pub best_params: ParamSet,
    /// Best candidate's mean validation ROC AUC
    pub best_score: f64,
    /// Mean validation score of every candidate, in sample order
    pub candidate_scores: Vec<f64>,
}

/// Split `0..n` into `folds` contiguous index chunks, optionally shuffled.
fn kfold(n: usize, folds: usize, shuffle: bool, rng: &mut StdRng) -> Result<Vec<Vec<usize>>> {
    if folds < 2 {
        return Err(ModelError::InvalidParameter(format!(
            "need at least 2 folds, got {folds}"
        )));
    }
    if n < folds {
        return Err(ModelError::InsufficientData {
            required: folds,
            actual: n,
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    if shuffle {
        indices.shuffle(rng);
    }

    let base = n / folds;
    let remainder = n % folds;
    let mut out = Vec::with_capacity(folds);
    let mut start = 0;
    for fold in 0..folds {
        let size = base + usize::from(fold < remainder);
        out.push(indices[start..start + size].to_vec());
        start += size;
    }
    Ok(out)
}

/// Mean validation ROC AUC of one candidate over the folds.
///
/// Folds whose validation slice holds a single class are skipped; if every
/// fold is degenerate the candidate cannot be scored.
fn cross_val_score(
    kind: ModelKind,
    params: &ParamSet,
    x: &Array2<f64>,
    y: &Array1<f64>,
    cv: &CvParams,
    rng: &mut StdRng,
) -> Result<f64> {
    let folds = kfold(x.nrows(), cv.folds, cv.shuffle, rng)?;
    let mut scores = Vec::new();

    for fold in &folds {
        let train: Vec<usize> = (0..x.nrows()).filter(|i| !fold.contains(i)).collect();

        let x_train = dataset::take_rows(x, &train);
        let y_train = dataset::take(y, &train);
        let x_valid = dataset::take_rows(x, fold);
        let y_valid = dataset::take(y, fold);

        let mut model = build_model(kind, params)?;
        match model.fit(&x_train, &y_train) {
            Ok(()) => {}
            Err(ModelError::DegenerateTarget(_)) => continue,
            Err(e) => return Err(e),
        }

        let probs = model.predict_proba(&x_valid)?;
        match roc_auc(&y_valid, &probs) {
            Ok(score) => scores.push(score),
            Err(ModelError::DegenerateTarget(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    if scores.is_empty() {
        return Err(ModelError::DegenerateTarget(
            "every validation fold held a single class".to_string(),
        ));
    }
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Randomized-search tuner over named models.
#[derive(Debug)]
pub struct Tuner {
    rng: StdRng,
    results: BTreeMap<String, TuneResult>,
}

impl Tuner {
    /// Create a tuner with a fixed RNG seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            results: BTreeMap::new(),
        }
    }

    /// Tune one named model: sample `cv.iterations` candidates and keep the
    /// one with the best mean validation ROC AUC.
    pub fn tune(
        &mut self,
        name: &str,
        kind: ModelKind,
        x: &Array2<f64>,
        y: &Array1<f64>,
        cv: &CvParams,
        space: &SearchSpace,
    ) -> Result<&TuneResult> {
        self.tune_with_progress(name, kind, x, y, cv, space, |_, _| {})
    }

    /// Like [`Self::tune`], reporting each scored candidate to the callback
    /// (candidate index, mean score).
    pub fn tune_with_progress(
        &mut self,
        name: &str,
        kind: ModelKind,
        x: &Array2<f64>,
        y: &Array1<f64>,
        cv: &CvParams,
        space: &SearchSpace,
        mut on_candidate: impl FnMut(usize, f64),
    ) -> Result<&TuneResult> {
        if cv.iterations == 0 {
            return Err(ModelError::InvalidParameter(
                "need at least one search iteration".to_string(),
            ));
        }

        let mut best: Option<(ParamSet, f64)> = None;
        let mut candidate_scores = Vec::with_capacity(cv.iterations);

        for iteration in 0..cv.iterations {
            let params = sample_params(space, &mut self.rng)?;
            let score = cross_val_score(kind, &params, x, y, cv, &mut self.rng)?;
            candidate_scores.push(score);
            on_candidate(iteration, score);

            if best.as_ref().is_none_or(|(_, s)| score > *s) {
                best = Some((params, score));
            }
        }

        let (best_params, best_score) =
            best.ok_or_else(|| ModelError::InvalidParameter("no candidates scored".to_string()))?;

        let result = TuneResult {
            name: name.to_string(),
            kind,
            best_params,
            best_score,
            candidate_scores,
        };
        self.results.insert(name.to_string(), result);
        Ok(&self.results[name])
    }

    /// Look up a tuned result by name.
    pub fn result(&self, name: &str) -> Result<&TuneResult> {
        self.results
            .get(name)
            .ok_or_else(|| ModelError::UnknownModel(name.to_string()))
    }

    /// All tuned results, by name.
    pub const fn results(&self) -> &BTreeMap<String, TuneResult> {
        &self.results
    }
}

/// Convenience: ROC AUC of a fitted model on a labeled set.
pub fn score_fitted(model: &Model, x: &Array2<f64>, y: &Array1<f64>) -> Result<f64> {
    let probs = model.predict_proba(x)?;
    roc_auc(y, &probs)
}
