//! Bar provider capability for barvault.
//!
//! - [`BarProvider`] - Async source of raw 1-minute bars
//! - [`CsvDirProvider`] - Reads per-symbol CSV exports from a directory
//! - [`read_csv_bars`] - Parses one CSV export
//! - [`UnavailableProvider`] - Refuses every fetch (cache-only mode)

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv_dir;
mod provider;

pub use csv_dir::{CsvDirProvider, read_csv_bars};
pub use provider::{BarProvider, UnavailableProvider};
