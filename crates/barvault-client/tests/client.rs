//! End-to-end behavior of `MarketDataClient` against real stores.

mod common;

use approx::assert_relative_eq;
use barvault_calendar::{AlwaysOpenCalendar, NyseCalendar};
use barvault_client::{ClientConfig, MarketDataClient};
use barvault_store::{BarStore, MemoryBarStore, ParquetBarStore};
use barvault_types::{ArchiveConfig, ArchiveError, TimeRange};
use chrono::{TimeZone, Utc};
use common::{RecordingProvider, at, bar};
use std::sync::Arc;
use tempfile::TempDir;

const START: &str = "2025-01-02T14:30:00Z";
const END: &str = "2025-01-02T14:33:00Z";

fn local_client(dir: &TempDir, provider: &Arc<RecordingProvider>) -> MarketDataClient {
    MarketDataClient::new(
        &ArchiveConfig::local(dir.path()),
        Arc::clone(provider),
        NyseCalendar::new(),
    )
    .unwrap()
}

fn keys(bars: &[barvault_types::Bar]) -> Vec<(String, chrono::DateTime<Utc>)> {
    bars.iter().map(|b| (b.symbol.clone(), b.timestamp)).collect()
}

#[tokio::test]
async fn test_cache_miss_fetches_and_archives() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    let out = client.get_bars(&["AAPL"], START, END, "1min").await.unwrap();

    assert_eq!(provider.calls().len(), 1);
    assert_eq!(
        keys(&out),
        vec![
            ("AAPL".to_string(), at(30)),
            ("AAPL".to_string(), at(31)),
            ("AAPL".to_string(), at(32)),
        ]
    );

    let reopened = ParquetBarStore::new(dir.path().to_path_buf()).unwrap();
    let range = TimeRange::new(at(30), at(33)).unwrap();
    assert_eq!(reopened.read(&["AAPL".to_string()], &range).unwrap(), out);
}

#[tokio::test]
async fn test_cache_hit_does_not_call_provider() {
    let dir = TempDir::new().unwrap();
    let writer = ParquetBarStore::new(dir.path().to_path_buf()).unwrap();
    writer
        .write_1m(&[
            bar("AAPL", 30, 10.0, 1000.0),
            bar("AAPL", 31, 11.0, 1001.0),
            bar("AAPL", 32, 12.0, 1002.0),
        ])
        .unwrap();

    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);
    let out = client.get_bars(&["AAPL"], START, END, "1min").await.unwrap();

    assert!(provider.calls().is_empty());
    assert_eq!(out.len(), 3);
    assert_relative_eq!(out[0].open, 10.0);
    assert_eq!(out[2].timestamp, at(32));
}

#[tokio::test]
async fn test_partial_gap_fetches_whole_range_and_fresh_wins() {
    let dir = TempDir::new().unwrap();
    let writer = ParquetBarStore::new(dir.path().to_path_buf()).unwrap();
    writer
        .write_1m(&[bar("AAPL", 30, 999.0, 9990.0), bar("AAPL", 32, 999.0, 9992.0)])
        .unwrap();

    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);
    let out = client.get_bars(&["AAPL"], START, END, "1min").await.unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, TimeRange::new(at(30), at(33)).unwrap());

    let opens: Vec<f64> = out.iter().map(|b| b.open).collect();
    assert_eq!(opens, vec![1.0, 2.0, 3.0]);
}

#[tokio::test]
async fn test_returns_resampled_timeframe() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    let out = client
        .get_bars(&["AAPL"], START, "2025-01-02T14:40:00Z", "5min")
        .await
        .unwrap();

    assert_eq!(
        keys(&out),
        vec![("AAPL".to_string(), at(30)), ("AAPL".to_string(), at(35))]
    );
    assert_relative_eq!(out[0].volume, 510.0);
    assert_relative_eq!(out[1].volume, 535.0);
    assert_relative_eq!(out[0].open, 1.0);
    assert_relative_eq!(out[1].close, 10.1);
}

#[tokio::test]
async fn test_rejects_ambiguous_minutes_timeframe() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    for spec in ["1m", "1M", "m1", "5m", "1T", "min"] {
        let err = client.get_bars(&["AAPL"], START, END, spec).await.unwrap_err();
        assert!(err.is_validation(), "{spec} should be rejected");
    }
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_records_accept_datetime_inputs() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    let recs = client
        .get_bars_records(
            &["AAPL"],
            Utc.with_ymd_and_hms(2025, 1, 2, 14, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 2, 14, 33, 0).unwrap(),
            "1min",
        )
        .await
        .unwrap();

    let symbols: Vec<&str> = recs.iter().map(|r| r["symbol"].as_str().unwrap()).collect();
    assert_eq!(symbols, vec!["AAPL", "AAPL", "AAPL"]);
    assert_eq!(recs[0]["ts"], "2025-01-02T14:30:00Z");
}

#[tokio::test]
async fn test_records_match_serialized_bars() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    let bars = client.get_bars(&["AAPL"], at(30), at(35), "5min").await.unwrap();
    let recs = client
        .get_bars_records(&["AAPL"], at(30), at(35), "5min")
        .await
        .unwrap();

    assert_eq!(recs.len(), bars.len());
    for (record, bar) in recs.into_iter().zip(&bars) {
        assert_eq!(serde_json::Value::Object(record), serde_json::to_value(bar).unwrap());
    }
}

#[tokio::test]
async fn test_records_accept_naive_inputs() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    let start = at(30).naive_utc();
    let end = at(32).naive_utc();
    let recs = client
        .get_bars_records(&["AAPL"], start, end, "1min")
        .await
        .unwrap();
    assert_eq!(recs.len(), 2);
}

#[tokio::test]
async fn test_inverted_range_rejected_before_io() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    let err = client.get_bars(&["AAPL"], END, START, "1min").await.unwrap_err();
    assert!(err.is_validation());

    let err = client
        .get_bars(&["AAPL"], "yesterday", END, "1min")
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = client.get_bars(&[""], START, END, "1min").await.unwrap_err();
    assert!(err.is_validation());

    assert!(provider.calls().is_empty());
    assert!(client.store().symbols().unwrap().is_empty());
}

#[tokio::test]
async fn test_provider_error_keeps_earlier_symbols() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::failing_for("MSFT"));
    let client = local_client(&dir, &provider);

    let err = client
        .get_bars(&["MSFT", "AAPL"], START, END, "1min")
        .await
        .unwrap_err();
    match err {
        ArchiveError::Provider { provider, source } => {
            assert_eq!(provider, "recording");
            assert!(source.to_string().contains("MSFT"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let range = TimeRange::new(at(30), at(33)).unwrap();
    let stored = client.store().read(&["AAPL".to_string()], &range).unwrap();
    assert_eq!(stored.len(), 3);
    assert!(client.store().read(&["MSFT".to_string()], &range).unwrap().is_empty());
}

#[tokio::test]
async fn test_out_of_range_and_foreign_bars_discarded() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new().with_extra(vec![
        bar("AAPL", 29, 50.0, 1.0),
        bar("AAPL", 33, 50.0, 1.0),
        bar("ZZZZ", 31, 50.0, 1.0),
    ]));
    let client = local_client(&dir, &provider);

    let out = client.get_bars(&["AAPL"], START, END, "1min").await.unwrap();
    assert_eq!(out.len(), 3);

    let wide = TimeRange::new(at(0), at(59)).unwrap();
    let stored = client
        .store()
        .read(&["AAPL".to_string(), "ZZZZ".to_string()], &wide)
        .unwrap();
    assert_eq!(stored.len(), 3);
}

#[tokio::test]
async fn test_out_of_range_bars_kept_when_configured() {
    let store: Arc<dyn BarStore> = Arc::new(MemoryBarStore::new());
    let provider = Arc::new(RecordingProvider::new().with_extra(vec![
        bar("AAPL", 29, 50.0, 1.0),
        bar("ZZZZ", 31, 50.0, 1.0),
    ]));
    let client = MarketDataClient::with_store(
        Arc::clone(&store),
        provider,
        Arc::new(AlwaysOpenCalendar::new()),
    )
    .with_config(ClientConfig::default().with_discard_out_of_range(false));

    let out = client.get_bars(&["AAPL"], START, END, "1min").await.unwrap();
    assert_eq!(out.len(), 3);

    let wide = TimeRange::new(at(0), at(59)).unwrap();
    assert_eq!(store.read(&["AAPL".to_string()], &wide).unwrap().len(), 4);
    assert_eq!(store.symbols().unwrap(), vec!["AAPL".to_string()]);
}

#[tokio::test]
async fn test_refetch_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    let first = client.get_bars(&["AAPL"], START, END, "1min").await.unwrap();
    let second = client.get_bars(&["AAPL"], START, END, "1min").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn test_multi_symbol_order_and_one_fetch_each() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider)
        .with_config(ClientConfig::default().with_fetch_concurrency(2));

    let out = client
        .get_bars(&["TSLA", "MSFT", "AAPL", "MSFT"], START, END, "1min")
        .await
        .unwrap();

    let symbols: Vec<&str> = out.iter().map(|b| b.symbol.as_str()).collect();
    assert_eq!(
        symbols,
        vec!["AAPL", "AAPL", "AAPL", "MSFT", "MSFT", "MSFT", "TSLA", "TSLA", "TSLA"]
    );

    let mut called: Vec<String> = provider.calls().into_iter().map(|(s, _)| s).collect();
    called.sort();
    assert_eq!(called, vec!["AAPL", "MSFT", "TSLA"]);
}

#[tokio::test]
async fn test_closed_market_skips_provider() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);

    // Saturday, and an empty range on a trading day
    let weekend = client
        .get_bars(&["AAPL"], "2025-01-04T14:30:00Z", "2025-01-04T16:00:00Z", "1h")
        .await
        .unwrap();
    let empty = client.get_bars(&["AAPL"], START, START, "1min").await.unwrap();

    assert!(weekend.is_empty());
    assert!(empty.is_empty());
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_gap_report_from_client() {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(RecordingProvider::new());
    let client = local_client(&dir, &provider);
    client
        .store()
        .write_1m(&[bar("AAPL", 30, 1.0, 1.0), bar("AAPL", 32, 1.0, 1.0)])
        .unwrap();

    let report = client.find_gaps(&["AAPL", "MSFT"], START, END).unwrap();
    assert_eq!(report.missing("AAPL"), &[at(31)]);
    assert_eq!(report.missing("MSFT").len(), 3);
    assert_eq!(report.total_missing(), 4);
    assert!(provider.calls().is_empty());
}
