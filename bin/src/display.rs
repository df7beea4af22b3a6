//! Shared argument parsing and output helpers for the barvault CLI.

use anyhow::{Context, Result, bail};
use barvault_lib::prelude::*;
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Output format for served bars.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Trading calendar selection.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum CalendarKind {
    /// NYSE regular session, 09:30-16:00 New York
    Nyse,
    /// Every minute of every day
    AlwaysOpen,
}

impl CalendarKind {
    pub(crate) fn build(self) -> Arc<dyn TradingCalendar> {
        match self {
            Self::Nyse => Arc::new(NyseCalendar::new()),
            Self::AlwaysOpen => Arc::new(AlwaysOpenCalendar::new()),
        }
    }
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `-v`.
pub(crate) fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolves `--archive` (or `BARVAULT_ARCHIVE`) to an archive config.
pub(crate) fn archive_config(root: Option<PathBuf>) -> ArchiveConfig {
    root.map_or_else(ArchiveConfig::default_local, ArchiveConfig::local)
}

/// Parses an RFC 3339 instant or a `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = input.into_utc() {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid instant: {input} (expected RFC 3339 or YYYY-MM-DD)"))?;
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => Ok(midnight.and_utc()),
        None => bail!("Invalid instant: {input}"),
    }
}

/// Writes bars to `output`, or stdout when no path is given.
pub(crate) fn write_output(bars: &[Bar], output: Option<&Path>, format: Format) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            barvault_lib::write_bars(format.into(), bars, BufWriter::new(file))?;
        }
        None => {
            barvault_lib::write_bars(format.into(), bars, BufWriter::new(std::io::stdout()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_instant() {
        assert_eq!(
            parse_instant("2025-01-02T14:30:00Z").unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 2, 14, 30, 0).unwrap()
        );
        assert_eq!(
            parse_instant("2025-01-02").unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap()
        );
        assert!(parse_instant("02/01/2025").is_err());
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 14, 30, 0).unwrap();
        let bars = vec![Bar::new("AAPL", ts, 1.0, 2.0, 0.5, 1.5, 10.0)];

        write_output(&bars, Some(path.as_path()), Format::Csv).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("symbol,ts,open"));
        assert!(written.contains("AAPL,2025-01-02T14:30:00Z"));
    }
}
