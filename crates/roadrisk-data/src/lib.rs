#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/insightlane/roadrisk/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod atr;
pub mod error;
pub mod segments;
pub mod tmc;

pub use atr::{ATR_ID, read_atr};
pub use error::{DataError, Result};
pub use segments::{
    CRASH, SEGMENT_ID, concern_exposure, filter_nonzero_segments, read_segment_dataset,
    static_attributes,
};
pub use tmc::{TMC_NEAR_ID, read_tmc};
