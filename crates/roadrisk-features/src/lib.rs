#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/insightlane/roadrisk/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod encode;
pub mod error;
pub mod featureset;
pub mod lags;
pub mod registry;
pub mod scale;

pub use encode::{dummy_encode, intersection_flag, log_transform};
pub use error::{FeatureError, Result};
pub use featureset::FeatureSet;
pub use lags::{CrashLagConfig, LAG_COLUMNS, TARGET, crash_lags};
pub use registry::{FeatureInfo, FeatureKind, available_features, features_by_kind};
pub use scale::StandardScaler;
