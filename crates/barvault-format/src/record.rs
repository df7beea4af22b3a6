//! Column layout shared by every output format.

use barvault_types::Bar;
use serde_json::{Map, Value};

/// Output columns, in order.
pub const COLUMNS: [&str; 7] = ["symbol", "ts", "open", "high", "low", "close", "volume"];

const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Renders a bar's timestamp as an RFC 3339 UTC instant with a `Z` suffix.
#[must_use]
pub fn timestamp_text(bar: &Bar) -> String {
    bar.timestamp.format(TS_FORMAT).to_string()
}

/// Converts a bar into a JSON record keyed by [`COLUMNS`].
#[must_use]
pub fn bar_to_record(bar: &Bar) -> Map<String, Value> {
    let values = [
        Value::from(bar.symbol.as_str()),
        Value::from(timestamp_text(bar)),
        Value::from(bar.open),
        Value::from(bar.high),
        Value::from(bar.low),
        Value::from(bar.close),
        Value::from(bar.volume),
    ];
    COLUMNS
        .iter()
        .map(|name| (*name).to_string())
        .zip(values)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_record_matches_serde() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 14, 30, 0).unwrap();
        let bar = Bar::new("AAPL", ts, 1.0, 2.0, 0.5, 1.5, 10.0);

        let record = bar_to_record(&bar);
        assert_eq!(record.len(), COLUMNS.len());
        assert_eq!(record["ts"], "2025-01-02T14:30:00Z");
        assert_eq!(record["volume"], 10.0);

        let serialized = serde_json::to_value(&bar).unwrap();
        assert_eq!(Value::Object(record), serialized);
    }
}
