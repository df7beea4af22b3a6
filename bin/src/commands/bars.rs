//! Bars command implementation.
//!
//! Serves bars through `MarketDataClient`, backfilling from a CSV export
//! directory when one is given.

use crate::display::{CalendarKind, Format, parse_instant, write_output};
use anyhow::{Context, Result};
use barvault_lib::prelude::*;
use barvault_lib::UnavailableProvider;
use std::path::PathBuf;
use std::sync::Arc;

/// Serve bars for `symbols` over `[start, end)`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn bars(
    archive: &ArchiveConfig,
    symbols: &[String],
    start: &str,
    end: &str,
    timeframe: &str,
    source: Option<PathBuf>,
    calendar: CalendarKind,
    format: Format,
    output: Option<PathBuf>,
    concurrency: usize,
    quiet: bool,
) -> Result<()> {
    let start = parse_instant(start)?;
    let end = parse_instant(end)?;

    let provider: Arc<dyn BarProvider> = match source {
        Some(dir) => Arc::new(CsvDirProvider::new(dir)),
        None => Arc::new(UnavailableProvider::new(
            "no --source given; only archived data can be served",
        )),
    };
    let store = open_store(archive).with_context(|| format!("Failed to open {archive}"))?;
    let client = MarketDataClient::with_store(store, provider, calendar.build())
        .with_config(ClientConfig::default().with_fetch_concurrency(concurrency));

    let bars = client.get_bars(symbols, start, end, timeframe).await?;
    write_output(&bars, output.as_deref(), format)?;

    if !quiet {
        if let Some(path) = &output {
            eprintln!("{} bars written to: {}", bars.len(), path.display());
        }
    }
    Ok(())
}
