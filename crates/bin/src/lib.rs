//! Training pipeline behind the `roadrisk` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod pipeline;
