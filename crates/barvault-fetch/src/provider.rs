//! Provider capability.

use async_trait::async_trait;
use barvault_types::{Bar, ProviderError, TimeRange};
use std::sync::Arc;

/// Source of raw 1-minute bars.
///
/// The archive calls this at most once per symbol per request, always for
/// the full requested range. Implementations own their retry, backoff and
/// rate-limit policy; the archive adds none.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Fetches 1-minute bars for `symbol` within `range`.
    ///
    /// Returned bars may be unordered and may stray outside `range`; the
    /// caller filters them.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    async fn fetch_1m_bars(
        &self,
        symbol: &str,
        range: &TimeRange,
    ) -> Result<Vec<Bar>, ProviderError>;
}

#[async_trait]
impl<P: BarProvider + ?Sized> BarProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_1m_bars(
        &self,
        symbol: &str,
        range: &TimeRange,
    ) -> Result<Vec<Bar>, ProviderError> {
        (**self).fetch_1m_bars(symbol, range).await
    }
}

/// Provider that refuses every fetch.
///
/// Requests fully served by the archive never reach it, so it turns a client
/// into a cache-only reader.
#[derive(Debug, Clone, Default)]
pub struct UnavailableProvider {
    reason: String,
}

impl UnavailableProvider {
    /// Creates a provider that fails with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl BarProvider for UnavailableProvider {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn fetch_1m_bars(
        &self,
        symbol: &str,
        _range: &TimeRange,
    ) -> Result<Vec<Bar>, ProviderError> {
        Err(ProviderError::Unavailable(format!(
            "cannot fetch {symbol}: {}",
            self.reason
        )))
    }
}
