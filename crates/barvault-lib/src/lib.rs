//! Local minute-bar archive that fills gaps from a remote provider.
//!
//! This is a facade crate that re-exports functionality from the barvault
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use barvault_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = MarketDataClient::new(
//!         &ArchiveConfig::default_local(),
//!         CsvDirProvider::new("./exports"),
//!         NyseCalendar::new(),
//!     )?;
//!
//!     let bars = client
//!         .get_bars(&["AAPL", "MSFT"], "2025-01-02T14:30:00Z", "2025-01-02T21:00:00Z", "15min")
//!         .await?;
//!     for bar in &bars {
//!         println!("{bar}");
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/barvault/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use barvault_types::*;

// Re-export calendars, storage and resampling
pub use barvault_calendar::{AlwaysOpenCalendar, NyseCalendar, TradingCalendar, WeekdayCalendar};
pub use barvault_resample::{BarAggregator, resample, resample_many};
pub use barvault_store::{BarStore, MemoryBarStore, ParquetBarStore, open_store};

// Re-export providers and the client
#[cfg(feature = "client")]
pub use barvault_client::{
    ClientConfig, GapReport, MarketDataClient, bar_to_record, find_gaps, find_gaps_in_store,
};
#[cfg(feature = "client")]
pub use barvault_fetch::{BarProvider, CsvDirProvider, UnavailableProvider, read_csv_bars};

// Re-export formatters
#[cfg(feature = "format")]
pub use barvault_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, write_bars,
};

/// Prelude module for convenient imports.
///
/// ```
/// use barvault_lib::prelude::*;
/// ```
pub mod prelude {
    pub use barvault_types::{
        ArchiveConfig, ArchiveError, Bar, IntoUtcInstant, Result, TimeRange, Timeframe,
    };

    pub use barvault_calendar::{AlwaysOpenCalendar, NyseCalendar, TradingCalendar};
    pub use barvault_store::{BarStore, open_store};

    #[cfg(feature = "client")]
    pub use barvault_client::{ClientConfig, GapReport, MarketDataClient};
    #[cfg(feature = "client")]
    pub use barvault_fetch::{BarProvider, CsvDirProvider};

    #[cfg(feature = "format")]
    pub use barvault_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};
}
