//! Parquet-backed local bar store.
//!
//! Layout: `<root>/bars_1m/symbol=<SYMBOL>/<YYYY-MM-DD>.parquet`, one file per
//! symbol and UTC day. Each file holds unique, ascending timestamps.

use arrow::array::{Array, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use barvault_types::{Bar, StorageError, TimeRange, decode_symbol, encode_symbol};
use chrono::{DateTime, NaiveDate, Utc};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::{BarStore, unique_symbols};

const BARS_DIR: &str = "bars_1m";
const SYMBOL_PREFIX: &str = "symbol=";

/// Bar store persisting one Parquet file per (symbol, UTC day).
///
/// A write merges incoming bars into the existing partitions (incoming wins).
/// All partitions of one symbol are staged as temporary files before any of
/// them is renamed into place, so a failed write leaves that symbol's
/// partitions as they were. Writers to the same partition are serialized by a
/// per-partition lock.
#[derive(Debug)]
pub struct ParquetBarStore {
    root: PathBuf,
    compression: Compression,
    partition_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl ParquetBarStore {
    /// Opens (creating if needed) a store under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(root: PathBuf) -> Result<Self, StorageError> {
        let bars_dir = root.join(BARS_DIR);
        fs::create_dir_all(&bars_dir).map_err(|e| StorageError::Io {
            path: bars_dir,
            source: e,
        })?;
        Ok(Self {
            root,
            compression: Compression::SNAPPY,
            partition_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Sets the compression codec for partitions written from now on.
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Returns the archive root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory holding one symbol's partitions.
    #[must_use]
    pub fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.root
            .join(BARS_DIR)
            .join(format!("{SYMBOL_PREFIX}{}", encode_symbol(symbol)))
    }

    /// Returns the partition file for a symbol and UTC day.
    #[must_use]
    pub fn partition_path(&self, symbol: &str, day: NaiveDate) -> PathBuf {
        self.symbol_dir(symbol)
            .join(format!("{}.parquet", day.format("%Y-%m-%d")))
    }

    /// Arrow schema of a partition file.
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("symbol", DataType::Utf8, false),
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new("open", DataType::Float64, false),
            Field::new("high", DataType::Float64, false),
            Field::new("low", DataType::Float64, false),
            Field::new("close", DataType::Float64, false),
            Field::new("volume", DataType::Float64, false),
        ])
    }

    fn lock_for(&self, path: &Path) -> Result<Arc<Mutex<()>>, StorageError> {
        let mut locks = self
            .partition_locks
            .lock()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(Arc::clone(locks.entry(path.to_path_buf()).or_default()))
    }

    /// Writes one symbol's partitions so that either all of them change or
    /// none do.
    ///
    /// Every partition is merged and staged to a temporary file before any
    /// rename. Locks are taken in day order for the whole write.
    fn write_symbol(
        &self,
        symbol: &str,
        days: &BTreeMap<NaiveDate, Vec<&Bar>>,
    ) -> Result<(), StorageError> {
        let paths: Vec<PathBuf> = days
            .keys()
            .map(|day| self.partition_path(symbol, *day))
            .collect();
        let locks = paths
            .iter()
            .map(|path| self.lock_for(path))
            .collect::<Result<Vec<_>, _>>()?;
        let _guards = locks
            .iter()
            .map(|lock| lock.lock().map_err(|_| StorageError::Poisoned))
            .collect::<Result<Vec<_>, _>>()?;

        let mut staged = Vec::with_capacity(paths.len());
        for (path, incoming) in paths.into_iter().zip(days.values()) {
            match self.stage_partition(path, incoming) {
                Ok(partition) => staged.push(partition),
                Err(e) => {
                    discard_staged(&staged);
                    return Err(e);
                }
            }
        }

        for (committed, partition) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(&partition.tmp, &partition.path) {
                discard_staged(&staged[committed..]);
                self.restore(&staged[..committed]);
                return Err(StorageError::Io {
                    path: partition.path.clone(),
                    source: e,
                });
            }
            tracing::debug!(
                partition = %partition.path.display(),
                existing = partition.previous.as_ref().map_or(0, Vec::len),
                stored = partition.stored,
                "wrote partition"
            );
        }
        Ok(())
    }

    /// Merges `incoming` into a partition and writes the result next to it.
    fn stage_partition(
        &self,
        path: PathBuf,
        incoming: &[&Bar],
    ) -> Result<StagedPartition, StorageError> {
        let previous = if path.exists() {
            Some(read_partition(&path)?)
        } else {
            None
        };

        let mut merged: BTreeMap<DateTime<Utc>, Bar> = previous
            .iter()
            .flatten()
            .map(|bar| (bar.timestamp, bar.clone()))
            .collect();
        for bar in incoming {
            merged.insert(bar.timestamp, (*bar).clone());
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StorageError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let bars: Vec<Bar> = merged.into_values().collect();
        let tmp = path.with_extension("parquet.tmp");
        if let Err(e) = self.write_file(&tmp, &bars) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(StagedPartition {
            path,
            tmp,
            previous,
            stored: bars.len(),
        })
    }

    /// Puts committed partitions back the way they were before a failed write.
    fn restore(&self, committed: &[StagedPartition]) {
        for partition in committed {
            let restored = match &partition.previous {
                Some(bars) => self
                    .write_file(&partition.tmp, bars)
                    .and_then(|()| {
                        fs::rename(&partition.tmp, &partition.path).map_err(|e| {
                            StorageError::Io {
                                path: partition.path.clone(),
                                source: e,
                            }
                        })
                    }),
                None => fs::remove_file(&partition.path).map_err(|e| StorageError::Io {
                    path: partition.path.clone(),
                    source: e,
                }),
            };
            if let Err(e) = restored {
                tracing::warn!(partition = %partition.path.display(), error = %e, "rollback failed");
            }
        }
    }

    fn write_file(&self, path: &Path, bars: &[Bar]) -> Result<(), StorageError> {
        let parquet_err = |e: &dyn std::fmt::Display| StorageError::Parquet {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let schema: SchemaRef = Arc::new(Self::schema());
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();
        let file = File::create(path).map_err(|e| StorageError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let batch = bars_to_batch(Arc::clone(&schema), bars).map_err(|e| parquet_err(&e))?;
        let mut writer =
            ArrowWriter::try_new(file, schema, Some(props)).map_err(|e| parquet_err(&e))?;
        writer.write(&batch).map_err(|e| parquet_err(&e))?;
        writer.close().map_err(|e| parquet_err(&e))?;
        Ok(())
    }
}

impl BarStore for ParquetBarStore {
    fn write_1m(&self, bars: &[Bar]) -> Result<usize, StorageError> {
        if bars.is_empty() {
            return Ok(0);
        }

        // Input order is kept inside each group so later duplicates win.
        let mut symbols: BTreeMap<&str, BTreeMap<NaiveDate, Vec<&Bar>>> = BTreeMap::new();
        for bar in bars {
            symbols
                .entry(bar.symbol.as_str())
                .or_default()
                .entry(bar.timestamp.date_naive())
                .or_default()
                .push(bar);
        }

        for (symbol, days) in &symbols {
            self.write_symbol(symbol, days)?;
        }
        Ok(bars.len())
    }

    fn read(&self, symbols: &[String], range: &TimeRange) -> Result<Vec<Bar>, StorageError> {
        let days = range.days();
        let mut out = Vec::new();

        for symbol in unique_symbols(symbols) {
            for day in &days {
                let path = self.partition_path(symbol, *day);
                if !path.exists() {
                    continue;
                }
                out.extend(
                    read_partition(&path)?
                        .into_iter()
                        .filter(|bar| bar.symbol == symbol && range.contains(bar.timestamp)),
                );
            }
        }

        out.sort_by(Bar::canonical_cmp);
        Ok(out)
    }

    fn symbols(&self) -> Result<Vec<String>, StorageError> {
        let bars_dir = self.root.join(BARS_DIR);
        let entries = fs::read_dir(&bars_dir).map_err(|e| StorageError::Io {
            path: bars_dir.clone(),
            source: e,
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Io {
                path: bars_dir.clone(),
                source: e,
            })?;
            let name = entry.file_name();
            if let Some(encoded) = name.to_string_lossy().strip_prefix(SYMBOL_PREFIX) {
                symbols.push(decode_symbol(encoded));
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}

/// A partition merged and written to its temporary file, not yet renamed.
#[derive(Debug)]
struct StagedPartition {
    path: PathBuf,
    tmp: PathBuf,
    previous: Option<Vec<Bar>>,
    stored: usize,
}

fn discard_staged(staged: &[StagedPartition]) {
    for partition in staged {
        let _ = fs::remove_file(&partition.tmp);
    }
}

fn bars_to_batch(schema: SchemaRef, bars: &[Bar]) -> Result<RecordBatch, arrow::error::ArrowError> {
    let symbols: Vec<&str> = bars.iter().map(|b| b.symbol.as_str()).collect();
    let timestamps: Vec<i64> = bars.iter().map(|b| b.timestamp.timestamp_micros()).collect();
    let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(symbols)),
            Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
            Arc::new(Float64Array::from(opens)),
            Arc::new(Float64Array::from(highs)),
            Arc::new(Float64Array::from(lows)),
            Arc::new(Float64Array::from(closes)),
            Arc::new(Float64Array::from(volumes)),
        ],
    )
}

fn read_partition(path: &Path) -> Result<Vec<Bar>, StorageError> {
    let parquet_err = |e: &dyn std::fmt::Display| StorageError::Parquet {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let file = File::open(path).map_err(|e| StorageError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| parquet_err(&e))?
        .build()
        .map_err(|e| parquet_err(&e))?;

    let mut bars = Vec::new();
    for batch in reader {
        let batch = batch.map_err(|e| parquet_err(&e))?;
        bars.extend(batch_to_bars(path, &batch)?);
    }
    Ok(bars)
}

fn batch_to_bars(path: &Path, batch: &RecordBatch) -> Result<Vec<Bar>, StorageError> {
    let symbols: &StringArray = column(path, batch, "symbol")?;
    let timestamps: &TimestampMicrosecondArray = column(path, batch, "timestamp")?;
    let opens: &Float64Array = column(path, batch, "open")?;
    let highs: &Float64Array = column(path, batch, "high")?;
    let lows: &Float64Array = column(path, batch, "low")?;
    let closes: &Float64Array = column(path, batch, "close")?;
    let volumes: &Float64Array = column(path, batch, "volume")?;

    (0..batch.num_rows())
        .map(|i| {
            let micros = timestamps.value(i);
            let timestamp =
                DateTime::from_timestamp_micros(micros).ok_or_else(|| StorageError::Schema {
                    path: path.to_path_buf(),
                    message: format!("timestamp out of range: {micros}"),
                })?;
            Ok(Bar {
                symbol: symbols.value(i).to_string(),
                timestamp,
                open: opens.value(i),
                high: highs.value(i),
                low: lows.value(i),
                close: closes.value(i),
                volume: volumes.value(i),
            })
        })
        .collect()
}

fn column<'a, T: Array + 'static>(
    path: &Path,
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a T, StorageError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| StorageError::Schema {
            path: path.to_path_buf(),
            message: format!("missing or mistyped column '{name}'"),
        })
}
