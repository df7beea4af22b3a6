//! Batch resampling over owned bar sequences.

use barvault_types::{Bar, Timeframe};

use crate::BarAggregator;

/// Resamples ascending 1-minute bars of `symbol` into `target` windows.
///
/// Output is ascending by window start. Windows without input bars are
/// omitted rather than filled. Bars of any other symbol are skipped. A base
/// target returns the matching input unchanged.
#[must_use]
pub fn resample(bars: &[Bar], symbol: &str, target: Timeframe) -> Vec<Bar> {
    let own = bars.iter().filter(|bar| {
        let keep = bar.symbol == symbol;
        if !keep {
            tracing::debug!(expected = symbol, found = %bar.symbol, "skipping foreign bar");
        }
        keep
    });

    if target.is_base() {
        return own.cloned().collect();
    }

    let mut aggregator = BarAggregator::new(target);
    let mut out: Vec<Bar> = own.filter_map(|bar| aggregator.process(bar)).collect();
    out.extend(aggregator.finish());
    out
}

/// Resamples a sequence ordered by symbol then timestamp.
///
/// Each run of equal symbols is resampled on its own; the symbol order of the
/// input is kept.
#[must_use]
pub fn resample_many(bars: &[Bar], target: Timeframe) -> Vec<Bar> {
    if target.is_base() {
        return bars.to_vec();
    }

    bars.chunk_by(|a, b| a.symbol == b.symbol)
        .flat_map(|group| resample(group, &group[0].symbol, target))
        .collect()
}
