//! Fetch-merge-resample client for the barvault minute-bar archive.
//!
//! - [`MarketDataClient`] - Serves bars, filling archive gaps from a provider
//! - [`ClientConfig`] - Fetch concurrency and provider-bar filtering
//! - [`GapReport`] / [`find_gaps`] - Calendar-aware missing-minute detection

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod gaps;

pub use barvault_format::bar_to_record;
pub use client::{ClientConfig, MarketDataClient};
pub use gaps::{GapReport, find_gaps, find_gaps_in_store};
