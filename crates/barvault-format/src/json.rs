//! JSON output: one object per bar, keyed by the shared column names.

use barvault_types::Bar;
use serde_json::{Map, Value};
use std::io::Write;

use crate::record::bar_to_record;
use crate::{FormatError, Formatter};

/// How records are laid out in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// A single JSON array.
    #[default]
    Array,
    /// An indented JSON array.
    Pretty,
    /// One object per line (NDJSON/JSONL).
    Ndjson,
}

/// Writes bars as JSON records.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    style: JsonStyle,
}

impl JsonFormatter {
    /// Array output.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_style(JsonStyle::Array)
    }

    /// Newline-delimited output.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self::with_style(JsonStyle::Ndjson)
    }

    /// Output in the given style.
    #[must_use]
    pub const fn with_style(style: JsonStyle) -> Self {
        Self { style }
    }

    /// Returns the output style.
    #[must_use]
    pub const fn style(&self) -> JsonStyle {
        self.style
    }
}

impl Formatter for JsonFormatter {
    fn write_bars<W: Write + Send>(&self, bars: &[Bar], mut writer: W) -> Result<(), FormatError> {
        let records = bars.iter().map(bar_to_record);
        match self.style {
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, &record)?;
                    writer.write_all(b"\n")?;
                }
            }
            JsonStyle::Array | JsonStyle::Pretty => {
                let records: Vec<Map<String, Value>> = records.collect();
                if self.style == JsonStyle::Pretty {
                    serde_json::to_writer_pretty(&mut writer, &records)?;
                } else {
                    serde_json::to_writer(&mut writer, &records)?;
                }
                writer.write_all(b"\n")?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array | JsonStyle::Pretty => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
