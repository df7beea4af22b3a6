//! Error types for barvault.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for barvault operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors surfaced by the archive client.
///
/// Validation errors are always raised before any storage or provider I/O.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Invalid request (timeframe, range, symbols).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bar store read or write failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The injected provider failed; passed through unchanged.
    #[error("Provider '{provider}' failed: {source}")]
    Provider {
        /// Name of the provider that failed.
        provider: String,
        /// The provider's own error.
        #[source]
        source: ProviderError,
    },
}

impl ArchiveError {
    /// Returns true for errors raised before any I/O.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<TimeframeError> for ArchiveError {
    fn from(e: TimeframeError) -> Self {
        Self::Validation(e.into())
    }
}

impl From<RangeError> for ArchiveError {
    fn from(e: RangeError) -> Self {
        Self::Validation(e.into())
    }
}

impl From<InstantParseError> for ArchiveError {
    fn from(e: InstantParseError) -> Self {
        Self::Validation(e.into())
    }
}

/// Request validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Timeframe specifier not in the allow-list.
    #[error(transparent)]
    Timeframe(#[from] TimeframeError),

    /// Start is after end.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// A start/end value could not be read as a UTC instant.
    #[error(transparent)]
    Instant(#[from] InstantParseError),

    /// Empty or whitespace-only symbol.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

/// Error for timeframe specifiers outside the allow-list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeframeError {
    /// The specifier is ambiguous (e.g., `1m`) or not recognized.
    #[error(
        "Ambiguous or unknown timeframe '{0}', expected one of: 1min, 2min, 3min, 5min, 10min, 15min, 30min, 60min, 1h, 2h, 4h, 1d"
    )]
    AmbiguousOrUnknown(String),
}

/// Error for invalid time ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Start is after end.
    #[error("Invalid time range: {start} > {end}")]
    Inverted {
        /// The start instant.
        start: DateTime<Utc>,
        /// The end instant.
        end: DateTime<Utc>,
    },
}

/// Error for unparseable instants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid UTC instant '{input}': {reason}")]
pub struct InstantParseError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Errors raised by bar store backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Parquet encoding or decoding failed.
    #[error("Parquet error on '{path}': {message}")]
    Parquet {
        /// The partition file involved.
        path: PathBuf,
        /// Backend error message.
        message: String,
    },

    /// A partition file does not have the expected columns.
    #[error("Unexpected schema in '{path}': {message}")]
    Schema {
        /// The partition file involved.
        path: PathBuf,
        /// What was wrong.
        message: String,
    },

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Errors raised by bar providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Reading the provider's source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The provider cannot serve requests at all.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Any other provider-specific failure.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
