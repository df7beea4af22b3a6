//! Epoch-aligned OHLCV resampling for barvault.
//!
//! - [`BarAggregator`] - Streaming 1-minute to N-minute aggregation
//! - [`resample`] - Resample one symbol's bars
//! - [`resample_many`] - Resample a symbol-then-time ordered sequence

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aggregator;
mod resample;

pub use aggregator::BarAggregator;
pub use resample::{resample, resample_many};
