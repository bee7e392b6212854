//! Support for header-driven CSV translation tables.
//!
//! The first row names the columns: exactly one `key` column (matched
//! case-insensitively) plus one column per language. Cells are kept as
//! literal strings; nothing is coerced.
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufRead, Read},
    path::Path,
};

use crate::{error::Error, traits::Parser};

/// Name of the reserved key column, compared case-insensitively.
pub const KEY_COLUMN: &str = "key";

/// One data row of a sheet.
///
/// Empty cells are not stored, so a missing entry and an empty string mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Physical line of the row, counting the header as line 1.
    pub line: usize,
    pub cells: HashMap<String, String>,
}

impl Row {
    /// Gets the non-empty cell value for a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// A row that could not be parsed; the rest of the sheet is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    pub line: usize,
    pub message: String,
}

/// A parsed CSV file: its header, the rows that parsed and the rows that didn't.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub warnings: Vec<RowWarning>,
}

impl Sheet {
    /// The header that holds row keys, if any.
    pub fn key_column(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| is_key_column(h))
            .map(String::as_str)
    }

    /// Every header that names a language, in header order, each once.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        let mut seen = HashSet::new();
        self.headers
            .iter()
            .map(String::as_str)
            .filter(move |h| !h.is_empty() && !is_key_column(h) && seen.insert(*h))
    }
}

fn is_key_column(header: &str) -> bool {
    header.eq_ignore_ascii_case(KEY_COLUMN)
}

// Strip a stray BOM and surrounding whitespace from a header field.
fn sanitize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_string()
}

// Picks the columns cells are read from. Blank headers are ignored, and a
// repeated header is only read at its first position.
fn readable_columns<'a>(
    headers: &'a [String],
    warnings: &mut Vec<RowWarning>,
) -> Vec<Option<&'a str>> {
    let mut seen_key = false;
    let mut seen = HashSet::new();
    headers
        .iter()
        .map(|header| {
            if header.is_empty() {
                return None;
            }
            let first = if is_key_column(header) {
                !std::mem::replace(&mut seen_key, true)
            } else {
                seen.insert(header.as_str())
            };
            if first {
                Some(header.as_str())
            } else {
                warnings.push(RowWarning {
                    line: 1,
                    message: format!(
                        "duplicate column {:?}; only its first occurrence is read",
                        header
                    ),
                });
                None
            }
        })
        .collect()
}

impl Parser for Sheet {
    /// Parse from any reader. Rows with the wrong number of fields become warnings.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(sanitize_header).collect();
        if headers.iter().all(String::is_empty) {
            return Err(Error::MissingHeader(
                "no header fields could be determined".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        let columns = readable_columns(&headers, &mut warnings);

        let mut rows = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let line = index + 2;
            match result {
                Ok(record) => {
                    let cells = columns
                        .iter()
                        .zip(record.iter())
                        .filter_map(|(column, value)| match column {
                            Some(header) if !value.is_empty() => {
                                Some((header.to_string(), value.to_string()))
                            }
                            _ => None,
                        })
                        .collect();
                    rows.push(Row { line, cells });
                }
                Err(e) => warnings.push(RowWarning {
                    line,
                    message: e.to_string(),
                }),
            }
        }

        Ok(Sheet {
            headers,
            rows,
            warnings,
        })
    }

    /// Override default file reading to decode BOM-prefixed files (UTF-8 or UTF-16).
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}
