//! In-process bar store.

use barvault_types::{Bar, StorageError, TimeRange};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::{BarStore, unique_symbols};

/// Bar store backed by an ordered map keyed by `(symbol, timestamp)`.
///
/// Not durable; contents live as long as the store. The map's key order is
/// the canonical read order, so reads need no extra sort.
#[derive(Debug, Default)]
pub struct MemoryBarStore {
    bars: RwLock<BTreeMap<(String, DateTime<Utc>), Bar>>,
}

impl MemoryBarStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored bars.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.bars.read().map_err(|_| StorageError::Poisoned)?.len())
    }

    /// Returns true if the store holds no bars.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl BarStore for MemoryBarStore {
    fn write_1m(&self, bars: &[Bar]) -> Result<usize, StorageError> {
        if bars.is_empty() {
            return Ok(0);
        }
        let mut map = self.bars.write().map_err(|_| StorageError::Poisoned)?;
        for bar in bars {
            map.insert((bar.symbol.clone(), bar.timestamp), bar.clone());
        }
        Ok(bars.len())
    }

    fn read(&self, symbols: &[String], range: &TimeRange) -> Result<Vec<Bar>, StorageError> {
        let map = self.bars.read().map_err(|_| StorageError::Poisoned)?;
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for symbol in unique_symbols(symbols) {
            let lo = (symbol.to_string(), range.start());
            let hi = (symbol.to_string(), range.end());
            out.extend(map.range(lo..hi).map(|(_, bar)| bar.clone()));
        }
        Ok(out)
    }

    fn symbols(&self) -> Result<Vec<String>, StorageError> {
        let map = self.bars.read().map_err(|_| StorageError::Poisoned)?;
        let mut symbols: Vec<String> = map.keys().map(|(s, _)| s.clone()).collect();
        symbols.dedup();
        Ok(symbols)
    }
}
