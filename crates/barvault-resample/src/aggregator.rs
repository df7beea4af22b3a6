//! Streaming bar-to-bar aggregation.

use barvault_types::{Bar, Timeframe};
use chrono::{DateTime, Utc};

/// Streaming bar aggregator.
///
/// Folds ascending bars of one symbol into windows of the configured
/// timeframe. A window is emitted once a bar from a later window arrives, or
/// on [`finish`](Self::finish).
#[derive(Debug)]
pub struct BarAggregator {
    timeframe: Timeframe,
    current_bar: Option<BarBuilder>,
}

impl BarAggregator {
    /// Creates a new aggregator for the given timeframe.
    #[must_use]
    pub const fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            current_bar: None,
        }
    }

    /// Returns the timeframe being aggregated to.
    #[must_use]
    pub const fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Processes a bar, potentially emitting a completed window.
    ///
    /// Returns `Some(bar)` when this bar opens a new window, completing the
    /// previous one, `None` otherwise.
    pub fn process(&mut self, bar: &Bar) -> Option<Bar> {
        let window = self.timeframe.window_start(bar.timestamp);

        match self.current_bar.take() {
            Some(mut builder) if builder.timestamp == window => {
                builder.update(bar);
                self.current_bar = Some(builder);
                None
            }
            Some(builder) => {
                let completed = builder.finish();
                self.current_bar = Some(BarBuilder::new(window, bar));
                Some(completed)
            }
            None => {
                self.current_bar = Some(BarBuilder::new(window, bar));
                None
            }
        }
    }

    /// Finishes aggregation, returning any remaining partial window.
    #[must_use]
    pub fn finish(self) -> Option<Bar> {
        self.current_bar.map(BarBuilder::finish)
    }
}

/// Accumulator for one output window.
#[derive(Debug)]
struct BarBuilder {
    symbol: String,
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl BarBuilder {
    fn new(timestamp: DateTime<Utc>, bar: &Bar) -> Self {
        Self {
            symbol: bar.symbol.clone(),
            timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }

    fn update(&mut self, bar: &Bar) {
        self.high = self.high.max(bar.high);
        self.low = self.low.min(bar.low);
        self.close = bar.close;
        self.volume += bar.volume;
    }

    fn finish(self) -> Bar {
        Bar {
            symbol: self.symbol,
            timestamp: self.timestamp,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}
