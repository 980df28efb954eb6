#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/insightlane/roadrisk/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod boosted;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod evaluate;
pub mod logistic;
pub mod metrics;
pub mod tree;
pub mod tune;

pub use boosted::{BoostedConfig, GradientBoostedTrees};
pub use classifier::{Classifier, Model, ModelKind, sigmoid};
pub use dataset::{ModelTable, TrainTestSplit};
pub use error::{ModelError, Result};
pub use evaluate::{Evaluation, Tester, final_fit, score_at};
pub use logistic::{ClassWeight, LogisticConfig, LogisticRegression, Penalty};
pub use metrics::{accuracy, brier_score, log_loss, roc_auc};
pub use tune::{
    CvParams, ParamDistribution, ParamSet, ParamValue, SearchSpace, TuneResult, Tuner,
    gbt_search_space, lr_search_space,
};
