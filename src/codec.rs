//! Reading, parsing, and serializing delimited text.
//!
//! Parsing is deliberately naive: every physical line is one record (a
//! quoted field containing a newline is not reassembled), and each line is
//! split on the configured delimiter with trailing empty fields preserved.
//! Serialization quotes a cell only when it contains a double-quote,
//! newline, or comma; the test is fixed on those three characters no
//! matter which delimiter is configured.

use std::{borrow::Cow, fs, path::Path};

use itertools::Itertools;

use crate::error::{WranglerError, WranglerResult};
use crate::model::{Row, TableConfig, display_text};

/// Parsed file content: column names plus data rows. Rows may still be
/// ragged here; the table model normalizes widths on population.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// Reads the whole file as text: UTF-8 first, then a Windows-1252 fallback
/// for files produced by legacy spreadsheet exports.
pub fn read_file_text(path: &Path) -> WranglerResult<String> {
    let bytes = fs::read(path).map_err(|source| WranglerError::io(path, source))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Writes the serialized table text to `path`. No temp-file-and-rename
/// step: a failing write can leave partial content behind.
pub fn write_file(path: &Path, text: &str) -> WranglerResult<()> {
    fs::write(path, text).map_err(|source| WranglerError::io(path, source))
}

/// Splits `content` into rows under `config`. With the header flag set the
/// first line is consumed as column names; otherwise names `Col 1`,
/// `Col 2`, … are synthesized from the width of the first data row. Parsed
/// cells are always present (null never arises from parsing).
pub fn parse(content: &str, config: &TableConfig) -> ParsedTable {
    let mut lines = content.lines();
    let mut columns = Vec::new();
    if config.has_headers
        && let Some(header) = lines.next()
    {
        columns = split_line(header, config.delimiter);
    }
    let rows: Vec<Row> = lines
        .map(|line| {
            split_line(line, config.delimiter)
                .into_iter()
                .map(Some)
                .collect()
        })
        .collect();
    if !config.has_headers
        && let Some(first) = rows.first()
    {
        columns = (1..=first.len()).map(|idx| format!("Col {idx}")).collect();
    }
    ParsedTable { columns, rows }
}

/// Renders a table as delimited text: one header line when the header flag
/// is set, then one line per row, every line terminated with `\n`. Null
/// cells become empty fields; column names are emitted as-is.
pub fn serialize(columns: &[String], rows: &[Row], config: &TableConfig) -> String {
    let delimiter = config.delimiter.to_string();
    let mut output = String::new();
    if config.has_headers && !columns.is_empty() {
        output.push_str(&columns.iter().join(&delimiter));
        output.push('\n');
    }
    for row in rows {
        let line = row
            .iter()
            .map(|cell| escape_field(display_text(cell)))
            .join(&delimiter);
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Wraps a cell in double quotes, doubling inner quotes, when it contains a
/// double-quote, newline, or comma. A cell holding some other configured
/// delimiter (semicolon, tab, pipe) goes out unquoted.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains(['"', '\n', ',']) {
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push('"');
        for ch in value.chars() {
            if ch == '"' {
                escaped.push('"');
            }
            escaped.push(ch);
        }
        escaped.push('"');
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(value)
    }
}

fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter).map(str::to_string).collect()
}
