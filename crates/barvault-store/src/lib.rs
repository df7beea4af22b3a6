//! Deduplicating 1-minute bar store for the barvault archive.
//!
//! - [`BarStore`] - Write/read contract shared by all backends
//! - [`MemoryBarStore`] - Ordered in-process map keyed by `(symbol, timestamp)`
//! - [`ParquetBarStore`] - Parquet partitions under a local root
//! - [`open_store`] - Opens the backend an [`ArchiveConfig`] names

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod memory;
mod parquet;

pub use crate::parquet::ParquetBarStore;
pub use memory::MemoryBarStore;

use barvault_types::{ArchiveConfig, Backend, Bar, StorageError, TimeRange};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Persistence contract for base-timeframe bars.
///
/// Implementations must be safe to share across threads. Concurrent writes
/// to the same `(symbol, timestamp)` resolve to last-write-wins in the order
/// the backend serializes them.
pub trait BarStore: Send + Sync + std::fmt::Debug {
    /// Persists bars, replacing any stored bar with the same
    /// `(symbol, timestamp)`. Within one call a later element wins over an
    /// earlier one. Writing zero bars is a no-op.
    ///
    /// Returns the number of bars written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write_1m(&self, bars: &[Bar]) -> Result<usize, StorageError>;

    /// Returns every stored bar for `symbols` within `[start, end)`, sorted
    /// by symbol then timestamp. The order of `symbols` and duplicate
    /// entries in it do not affect the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, symbols: &[String], range: &TimeRange) -> Result<Vec<Bar>, StorageError>;

    /// Lists the symbols with at least one stored bar, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn symbols(&self) -> Result<Vec<String>, StorageError>;
}

impl<S: BarStore + ?Sized> BarStore for Arc<S> {
    fn write_1m(&self, bars: &[Bar]) -> Result<usize, StorageError> {
        (**self).write_1m(bars)
    }

    fn read(&self, symbols: &[String], range: &TimeRange) -> Result<Vec<Bar>, StorageError> {
        (**self).read(symbols, range)
    }

    fn symbols(&self) -> Result<Vec<String>, StorageError> {
        (**self).symbols()
    }
}

/// Opens the store described by `config`.
///
/// # Errors
///
/// Returns an error if a local root cannot be created.
pub fn open_store(config: &ArchiveConfig) -> Result<Arc<dyn BarStore>, StorageError> {
    match config.backend() {
        Backend::Local { root } => Ok(Arc::new(ParquetBarStore::new(root.clone())?)),
        Backend::Memory => Ok(Arc::new(MemoryBarStore::new())),
    }
}

/// Sorted, deduplicated view of a symbol list.
fn unique_symbols(symbols: &[String]) -> BTreeSet<&str> {
    symbols.iter().map(String::as_str).collect()
}
