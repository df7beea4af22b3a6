//! Fetch-merge-resample orchestration.

use barvault_calendar::TradingCalendar;
use barvault_fetch::BarProvider;
use barvault_format::bar_to_record;
use barvault_resample::resample_many;
use barvault_store::{BarStore, open_store};
use barvault_types::{
    ArchiveConfig, ArchiveError, Bar, IntoUtcInstant, Result, TimeRange, Timeframe,
    ValidationError,
};
use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{GapReport, find_gaps};

/// Configuration for the archive client.
#[derive(Debug, Clone, Copy)]
pub struct ClientConfig {
    /// Maximum provider fetches in flight at once.
    pub fetch_concurrency: usize,
    /// Drop provider bars outside the requested range before writing.
    pub discard_out_of_range: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fetch_concurrency: 4,
            discard_out_of_range: true,
        }
    }
}

impl ClientConfig {
    /// Sets the maximum number of concurrent provider fetches (at least 1).
    #[must_use]
    pub const fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = if concurrency == 0 { 1 } else { concurrency };
        self
    }

    /// Sets whether provider bars outside the requested range are dropped.
    #[must_use]
    pub const fn with_discard_out_of_range(mut self, discard: bool) -> Self {
        self.discard_out_of_range = discard;
        self
    }
}

/// Serves bars from a local archive, filling gaps from a provider.
pub struct MarketDataClient {
    store: Arc<dyn BarStore>,
    provider: Arc<dyn BarProvider>,
    calendar: Arc<dyn TradingCalendar>,
    config: ClientConfig,
}

impl std::fmt::Debug for MarketDataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataClient")
            .field("store", &self.store)
            .field("provider", &self.provider.name())
            .field("calendar", &self.calendar.name())
            .field("config", &self.config)
            .finish()
    }
}

impl MarketDataClient {
    /// Creates a client over the archive described by `archive`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be opened.
    pub fn new<P, C>(archive: &ArchiveConfig, provider: P, calendar: C) -> Result<Self>
    where
        P: BarProvider + 'static,
        C: TradingCalendar + 'static,
    {
        let store = open_store(archive)?;
        Ok(Self::with_store(store, Arc::new(provider), Arc::new(calendar)))
    }

    /// Creates a client over an already opened store.
    #[must_use]
    pub fn with_store(
        store: Arc<dyn BarStore>,
        provider: Arc<dyn BarProvider>,
        calendar: Arc<dyn TradingCalendar>,
    ) -> Self {
        Self {
            store,
            provider,
            calendar,
            config: ClientConfig::default(),
        }
    }

    /// Replaces the client configuration.
    #[must_use]
    pub const fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn BarStore> {
        &self.store
    }

    /// Returns bars for `symbols` over `[start, end)` at `timeframe`.
    ///
    /// Symbols missing any calendar-expected minute are refetched from the
    /// provider for the whole range and written over the archive first. The
    /// result is sorted by symbol then timestamp.
    ///
    /// # Errors
    ///
    /// Validation errors (timeframe, instants, range, symbols) are returned
    /// before any I/O. Otherwise the first storage or provider failure ends
    /// the call; symbols written before it stay written.
    pub async fn get_bars<S: AsRef<str>>(
        &self,
        symbols: &[S],
        start: impl IntoUtcInstant,
        end: impl IntoUtcInstant,
        timeframe: &str,
    ) -> Result<Vec<Bar>> {
        let timeframe = Timeframe::resolve(timeframe)?;
        let range = TimeRange::new(start.into_utc()?, end.into_utc()?)?;
        let symbols = normalize_symbols(symbols)?;
        self.serve(&symbols, &range, timeframe).await
    }

    /// Same as [`get_bars`](Self::get_bars), returning one JSON object per
    /// bar with keys `symbol`, `ts`, `open`, `high`, `low`, `close`, `volume`
    /// (the same records the JSON writers emit).
    ///
    /// # Errors
    ///
    /// As for [`get_bars`](Self::get_bars).
    pub async fn get_bars_records<S: AsRef<str>>(
        &self,
        symbols: &[S],
        start: impl IntoUtcInstant,
        end: impl IntoUtcInstant,
        timeframe: &str,
    ) -> Result<Vec<Map<String, Value>>> {
        let bars = self.get_bars(symbols, start, end, timeframe).await?;
        Ok(bars.iter().map(bar_to_record).collect())
    }

    /// Reports missing calendar minutes in the archive without fetching.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad range or symbol list, or a
    /// storage error if the archive cannot be read.
    pub fn find_gaps<S: AsRef<str>>(
        &self,
        symbols: &[S],
        start: impl IntoUtcInstant,
        end: impl IntoUtcInstant,
    ) -> Result<GapReport> {
        let range = TimeRange::new(start.into_utc()?, end.into_utc()?)?;
        let symbols = normalize_symbols(symbols)?;
        crate::find_gaps_in_store(&*self.store, &*self.calendar, &range, &symbols)
            .map_err(ArchiveError::from)
    }

    #[tracing::instrument(
        skip(self, symbols),
        fields(symbols = symbols.len(), provider = self.provider.name())
    )]
    async fn serve(
        &self,
        symbols: &[String],
        range: &TimeRange,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>> {
        let cached = self.store.read(symbols, range)?;
        let report = find_gaps(&cached, &*self.calendar, range, symbols);
        let report = &report;
        let stale = report.symbols_with_gaps();

        // Any gap refetches the symbol's whole range rather than only the
        // missing minutes: fresher provider values replace stale archived
        // bars at the cost of redundant transfer.
        let mut written = 0usize;
        let mut fetches = stream::iter(stale.iter().map(|&symbol| async move {
            tracing::debug!(symbol, missing = report.missing(symbol).len(), "fetching");
            (symbol, self.provider.fetch_1m_bars(symbol, range).await)
        }))
        .buffered(self.config.fetch_concurrency.max(1));

        while let Some((symbol, fetched)) = fetches.next().await {
            let fetched = fetched.map_err(|source| ArchiveError::Provider {
                provider: self.provider.name().to_string(),
                source,
            })?;
            let accepted = self.accept(symbol, range, fetched);
            written += self.store.write_1m(&accepted)?;
        }

        let bars = self.store.read(symbols, range)?;
        let out = if timeframe.is_base() {
            bars
        } else {
            resample_many(&bars, timeframe)
        };

        tracing::info!(
            gaps = stale.len(),
            provider_calls = stale.len(),
            written,
            returned = out.len(),
            "served bars"
        );
        Ok(out)
    }

    /// Filters provider output down to what may be written for `symbol`.
    fn accept(&self, symbol: &str, range: &TimeRange, fetched: Vec<Bar>) -> Vec<Bar> {
        let received = fetched.len();
        let accepted: Vec<Bar> = fetched
            .into_iter()
            .filter(|bar| {
                bar.symbol == symbol
                    && bar.is_minute_aligned()
                    && (!self.config.discard_out_of_range || range.contains(bar.timestamp))
            })
            .collect();

        let dropped = received - accepted.len();
        if dropped > 0 {
            tracing::warn!(symbol, dropped, received, "discarded provider bars");
        }
        accepted
    }
}

/// Trims, validates and deduplicates symbols into sorted order.
fn normalize_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<String>> {
    let mut unique = BTreeSet::new();
    for symbol in symbols {
        let raw = symbol.as_ref();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidSymbol(raw.to_string()).into());
        }
        unique.insert(trimmed.to_string());
    }
    Ok(unique.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbols() {
        let out = normalize_symbols(&["MSFT", " AAPL ", "MSFT"]).unwrap();
        assert_eq!(out, vec!["AAPL".to_string(), "MSFT".to_string()]);

        let err = normalize_symbols(&["AAPL", "  "]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::default()
            .with_fetch_concurrency(0)
            .with_discard_out_of_range(false);
        assert_eq!(config.fetch_concurrency, 1);
        assert!(!config.discard_out_of_range);
    }
}
