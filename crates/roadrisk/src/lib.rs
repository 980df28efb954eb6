#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/insightlane/roadrisk/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;

// Re-export main types from sub-crates
pub use roadrisk_data as data;
pub use roadrisk_features as features;
pub use roadrisk_model as model;
pub use roadrisk_output as output;

pub use config::{CityConfig, ConfigError, FeatureList};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
