#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/insightlane/roadrisk/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod artifact;
pub mod export;
pub mod summary;

pub use artifact::{ArtifactError, TrainedArtifact};
pub use export::{ExportError, ExportFormat, Exporter, PredictionExport, ScoreExport};
pub use summary::{ModelScoreLine, RunSummary};
