//! Core types for the barvault minute-bar archive.
//!
//! This crate provides the fundamental data structures used throughout barvault:
//!
//! - [`Bar`] - A single OHLCV bar for one symbol
//! - [`TimeRange`] - Half-open `[start, end)` UTC range
//! - [`Timeframe`] - Validated resampling width (closed allow-list)
//! - [`ArchiveConfig`] - Where a bar store keeps its data
//! - [`ArchiveError`] - Error taxonomy shared by every crate

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod config;
mod error;
mod instant;
mod symbol;
mod time_range;
mod timeframe;

pub use bar::Bar;
pub use config::{ArchiveConfig, Backend};
pub use error::{
    ArchiveError, InstantParseError, ProviderError, RangeError, Result, StorageError,
    TimeframeError, ValidationError,
};
pub use instant::IntoUtcInstant;
pub use symbol::{decode_symbol, encode_symbol};
pub use time_range::{MinuteIterator, TimeRange};
pub use timeframe::Timeframe;
