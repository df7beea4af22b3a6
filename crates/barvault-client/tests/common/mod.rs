//! Shared test doubles for client integration tests.

#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use barvault_fetch::BarProvider;
use barvault_types::{Bar, ProviderError, TimeRange};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;

/// Provider returning deterministic bars for every minute it is asked for,
/// recording each call.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    calls: Mutex<Vec<(String, TimeRange)>>,
    fail_for: Option<String>,
    extra: Vec<Bar>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every fetch for `symbol`.
    pub fn failing_for(symbol: &str) -> Self {
        Self {
            fail_for: Some(symbol.to_string()),
            ..Self::default()
        }
    }

    /// Appends `extra` to every successful response.
    pub fn with_extra(mut self, extra: Vec<Bar>) -> Self {
        self.extra = extra;
        self
    }

    pub fn calls(&self) -> Vec<(String, TimeRange)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BarProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn fetch_1m_bars(
        &self,
        symbol: &str,
        range: &TimeRange,
    ) -> Result<Vec<Bar>, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((symbol.to_string(), *range));
        if self.fail_for.as_deref() == Some(symbol) {
            return Err(ProviderError::Unavailable(format!("{symbol} is down")));
        }
        let mut bars = linear_bars(symbol, range);
        bars.extend(self.extra.iter().cloned());
        Ok(bars)
    }
}

/// One bar per minute of `range`: open = i + 1, volume = 100 + i.
pub fn linear_bars(symbol: &str, range: &TimeRange) -> Vec<Bar> {
    range
        .minutes()
        .enumerate()
        .map(|(i, ts)| {
            let base = (i + 1) as f64;
            Bar::new(
                symbol,
                ts,
                base,
                base + 0.2,
                base - 0.1,
                base + 0.1,
                100.0 + i as f64,
            )
        })
        .collect()
}

/// 2025-01-02 (a regular NYSE session) at 14:`minute` UTC.
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 14, minute, 0).unwrap()
}

pub fn bar(symbol: &str, minute: u32, open: f64, volume: f64) -> Bar {
    Bar::new(symbol, at(minute), open, open + 0.2, open - 0.1, open + 0.1, volume)
}
