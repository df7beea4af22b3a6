//! Archive benchmarks: resampling, gap detection and store round trips.
//!
//! Run with: `cargo bench --package barvault-bench`

use barvault_bench::{session_open, synthetic_bars, synthetic_universe, with_holes};
use barvault_calendar::NyseCalendar;
use barvault_client::find_gaps;
use barvault_resample::{resample, resample_many};
use barvault_store::{BarStore, MemoryBarStore, ParquetBarStore};
use barvault_types::{TimeRange, Timeframe};
use chrono::TimeDelta;
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::TempDir;

/// One NYSE session, one week and one month of minutes.
const SIZES: [(&str, usize); 3] = [("1-day", 390), ("1-week", 1_950), ("1-month", 8_190)];

const SYMBOLS: [&str; 5] = ["AAPL", "AMZN", "GOOG", "MSFT", "NVDA"];

fn resample_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");

    for (name, minutes) in SIZES {
        let bars = synthetic_bars("AAPL", session_open(), minutes);
        group.throughput(Throughput::Elements(minutes as u64));

        for spec in ["5min", "1h", "1d"] {
            let tf = Timeframe::resolve(spec).unwrap();
            group.bench_with_input(BenchmarkId::new(spec, name), &bars, |b, bars| {
                b.iter(|| resample(black_box(bars), "AAPL", tf));
            });
        }
    }

    let universe = synthetic_universe(&SYMBOLS, session_open(), 1_950);
    group.throughput(Throughput::Elements(universe.len() as u64));
    group.bench_function("many/15min", |b| {
        let tf = Timeframe::resolve("15min").unwrap();
        b.iter(|| resample_many(black_box(&universe), tf));
    });

    group.finish();
}

fn gap_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("gaps");
    let calendar = NyseCalendar::new();
    let symbols: Vec<String> = SYMBOLS.iter().map(|s| s.to_string()).collect();

    for (name, minutes) in SIZES {
        let bars = with_holes(&synthetic_universe(&SYMBOLS, session_open(), minutes));
        let range = TimeRange::new(
            session_open(),
            session_open() + TimeDelta::minutes(minutes as i64),
        )
        .unwrap();
        group.throughput(Throughput::Elements((minutes * SYMBOLS.len()) as u64));
        group.bench_with_input(BenchmarkId::new("nyse", name), &bars, |b, bars| {
            b.iter(|| find_gaps(black_box(bars), &calendar, &range, symbols.as_slice()));
        });
    }

    group.finish();
}

fn store_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");
    group.sample_size(20);

    let minutes = 1_950;
    let bars = synthetic_universe(&SYMBOLS, session_open(), minutes);
    let symbols: Vec<String> = SYMBOLS.iter().map(|s| s.to_string()).collect();
    let range = TimeRange::new(
        session_open(),
        session_open() + TimeDelta::minutes(minutes as i64),
    )
    .unwrap();
    group.throughput(Throughput::Elements(bars.len() as u64));

    group.bench_function("memory/write", |b| {
        b.iter(|| {
            let store = MemoryBarStore::new();
            store.write_1m(black_box(&bars)).unwrap()
        });
    });

    let memory = MemoryBarStore::new();
    memory.write_1m(&bars).unwrap();
    group.bench_function("memory/read", |b| {
        b.iter(|| memory.read(black_box(&symbols), &range).unwrap());
    });

    group.bench_function("parquet/write", |b| {
        b.iter_batched(
            || TempDir::new().unwrap(),
            |dir| {
                let store = ParquetBarStore::new(dir.path().to_path_buf()).unwrap();
                store.write_1m(black_box(&bars)).unwrap()
            },
            BatchSize::PerIteration,
        );
    });

    let dir = TempDir::new().unwrap();
    let parquet = ParquetBarStore::new(dir.path().to_path_buf()).unwrap();
    parquet.write_1m(&bars).unwrap();
    group.bench_function("parquet/read", |b| {
        b.iter(|| parquet.read(black_box(&symbols), &range).unwrap());
    });

    group.finish();
}

criterion_group!(benches, resample_benchmark, gap_benchmark, store_benchmark);
criterion_main!(benches);
