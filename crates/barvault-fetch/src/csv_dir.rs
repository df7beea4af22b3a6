//! Provider backed by a directory of per-symbol CSV exports.

use async_trait::async_trait;
use barvault_types::{Bar, IntoUtcInstant, ProviderError, TimeRange, encode_symbol};
use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures::StreamExt;
use std::path::{Path, PathBuf};

use crate::BarProvider;

const COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Serves bars from `<dir>/<SYMBOL>.csv`.
///
/// Each file needs a header naming `timestamp` (or `ts`), `open`, `high`,
/// `low`, `close` and `volume`; extra columns are ignored. Timestamps are
/// RFC 3339. A symbol without a file has no data, which is not an error.
#[derive(Debug, Clone)]
pub struct CsvDirProvider {
    dir: PathBuf,
}

impl CsvDirProvider {
    /// Creates a provider reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the source directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file consulted for `symbol`.
    ///
    /// The symbol is percent-encoded, so `BRK/B` reads `BRK%2FB.csv` and the
    /// path never leaves the source directory.
    #[must_use]
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", encode_symbol(symbol)))
    }
}

#[async_trait]
impl BarProvider for CsvDirProvider {
    fn name(&self) -> &str {
        "csv-dir"
    }

    async fn fetch_1m_bars(
        &self,
        symbol: &str,
        range: &TimeRange,
    ) -> Result<Vec<Bar>, ProviderError> {
        let path = self.path_for(symbol);
        if !tokio::fs::try_exists(&path).await? {
            tracing::debug!(symbol, path = %path.display(), "no export for symbol");
            return Ok(Vec::new());
        }

        let mut bars = read_csv_bars(&path, symbol).await?;
        bars.retain(|bar| range.contains(bar.timestamp));
        tracing::debug!(symbol, bars = bars.len(), "read export");
        Ok(bars)
    }
}

/// Parses a CSV export of 1-minute bars for `symbol`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a required column is
/// missing, or a field does not parse.
pub async fn read_csv_bars(path: &Path, symbol: &str) -> Result<Vec<Bar>, ProviderError> {
    let file = tokio::fs::File::open(path).await?;
    let mut reader = AsyncReaderBuilder::new()
        .trim(Trim::All)
        .create_reader(file);

    let headers = reader
        .headers()
        .await
        .map_err(|e| ProviderError::Parse(format!("{}: {e}", path.display())))?
        .clone();
    let columns = ColumnIndex::from_headers(&headers)
        .map_err(|missing| ProviderError::Parse(format!("{}: missing column '{missing}'", path.display())))?;

    let mut bars = Vec::new();
    let mut records = reader.records();
    let mut line = 1usize;
    while let Some(record) = records.next().await {
        line += 1;
        let record =
            record.map_err(|e| ProviderError::Parse(format!("{}: {e}", path.display())))?;
        let bar = columns
            .parse(symbol, &record)
            .map_err(|e| ProviderError::Parse(format!("{}:{line}: {e}", path.display())))?;
        bars.push(bar);
    }
    Ok(bars)
}

/// Positions of the required columns in a header row.
#[derive(Debug)]
struct ColumnIndex([usize; 6]);

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, &'static str> {
        let find = |name: &str| {
            headers.iter().position(|h| {
                h.eq_ignore_ascii_case(name) || (name == "timestamp" && h.eq_ignore_ascii_case("ts"))
            })
        };
        let mut index = [0; 6];
        for (slot, name) in index.iter_mut().zip(COLUMNS) {
            *slot = find(name).ok_or(name)?;
        }
        Ok(Self(index))
    }

    fn parse(&self, symbol: &str, record: &StringRecord) -> Result<Bar, String> {
        let field = |i: usize| {
            record
                .get(self.0[i])
                .ok_or_else(|| format!("missing field '{}'", COLUMNS[i]))
        };
        let number = |i: usize| -> Result<f64, String> {
            let raw = field(i)?;
            raw.parse::<f64>()
                .map_err(|e| format!("invalid {} '{raw}': {e}", COLUMNS[i]))
        };

        let timestamp = field(0)?.into_utc().map_err(|e| e.to_string())?;
        Ok(Bar::new(
            symbol,
            timestamp,
            number(1)?,
            number(2)?,
            number(3)?,
            number(4)?,
            number(5)?,
        ))
    }
}
