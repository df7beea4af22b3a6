//! CSV / TSV output.

use barvault_types::Bar;
use std::borrow::Cow;
use std::io::Write;

use crate::record::{COLUMNS, timestamp_text};
use crate::{FormatError, Formatter};

/// Writes bars as delimited text with a header row.
///
/// Fields containing the delimiter, a double quote or a line break are
/// quoted, with embedded quotes doubled.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    delimiter: char,
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Comma-separated with a header.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Tab-separated with a header.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to write the header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    fn escape<'a>(&self, field: &'a str) -> Cow<'a, str> {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter || matches!(c, '"' | '\n' | '\r'));
        if needs_quotes {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(field)
        }
    }

    fn write_row<W: Write>(&self, writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                write!(writer, "{}", self.delimiter)?;
            }
            writer.write_all(self.escape(field).as_bytes())?;
        }
        writeln!(writer)
    }
}

impl Formatter for CsvFormatter {
    fn write_bars<W: Write + Send>(&self, bars: &[Bar], mut writer: W) -> Result<(), FormatError> {
        if self.include_header {
            self.write_row(&mut writer, &COLUMNS)?;
        }

        for bar in bars {
            let ts = timestamp_text(bar);
            let numbers = [bar.open, bar.high, bar.low, bar.close, bar.volume].map(|v| v.to_string());
            let mut fields = vec![bar.symbol.as_str(), ts.as_str()];
            fields.extend(numbers.iter().map(String::as_str));
            self.write_row(&mut writer, &fields)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
