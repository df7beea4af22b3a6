//! Import command implementation.

use anyhow::{Context, Result};
use barvault_lib::prelude::*;
use barvault_lib::read_csv_bars;
use std::path::Path;

/// Write a CSV export of 1-minute bars for `symbol` into the archive.
pub(crate) async fn import(
    archive: &ArchiveConfig,
    file: &Path,
    symbol: &str,
    quiet: bool,
) -> Result<()> {
    let symbol = symbol.trim();
    anyhow::ensure!(!symbol.is_empty(), "Symbol must not be empty");

    let bars = read_csv_bars(file, symbol)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let (aligned, unaligned): (Vec<Bar>, Vec<Bar>) =
        bars.into_iter().partition(Bar::is_minute_aligned);
    if !unaligned.is_empty() {
        tracing::warn!(skipped = unaligned.len(), "skipping bars not on a minute boundary");
    }

    let store = open_store(archive).with_context(|| format!("Failed to open {archive}"))?;
    let written = store.write_1m(&aligned)?;

    if !quiet {
        println!("Imported {written} bars for {symbol} into {archive}");
    }
    Ok(())
}
