//! Loads delimited text and spreadsheets into a [`RawTable`].
//!
//! The loader reads every row without assuming a header: header detection is
//! the pipeline's job. All-blank rows are dropped here so that downstream
//! components never see them.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::SourceMetadata;
use super::table::{Cell, RawTable};
use crate::error::InputError;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b';', b',', b'|'];

/// Extensions read as delimited text.
const TEXT_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Extensions read through the spreadsheet reader.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Delimiter to use for text files (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Tables read from one file, with how they were decoded.
struct LoadedSheets {
    sheets: Vec<(String, RawTable)>,
    format: String,
    encoding: String,
}

/// Reads price-list files into ragged tables.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file, choosing the reader from its extension.
    ///
    /// Worksheets are concatenated in workbook order.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata), InputError> {
        let path = path.as_ref();
        let contents = read_all(path)?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let loaded = self.read_sheets(path, &contents)?;
        let sheet_count = loaded.sheets.len();
        let table = RawTable::new(
            loaded
                .sheets
                .into_iter()
                .flat_map(|(_, sheet)| sheet.into_rows())
                .collect(),
        );

        if table.is_empty() {
            return Err(InputError::EmptyTable(format!(
                "{} has no non-blank rows",
                path.display()
            )));
        }

        debug!(
            file = %path.display(),
            format = %loaded.format,
            rows = table.len(),
            columns = table.column_count(),
            "loaded source table"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            loaded.format,
            loaded.encoding,
            sheet_count,
            table.len(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Load each worksheet as its own table, named after the sheet.
    ///
    /// Delimited text yields one table named after the file stem. Sheets with no
    /// non-blank rows are left out.
    pub fn load_sheets(&self, path: impl AsRef<Path>) -> Result<Vec<(String, RawTable)>, InputError> {
        let path = path.as_ref();
        let contents = read_all(path)?;

        let sheets: Vec<(String, RawTable)> = self
            .read_sheets(path, &contents)?
            .sheets
            .into_iter()
            .filter(|(_, sheet)| !sheet.is_empty())
            .collect();

        if sheets.is_empty() {
            return Err(InputError::EmptyTable(format!(
                "{} has no non-blank rows",
                path.display()
            )));
        }
        Ok(sheets)
    }

    fn read_sheets(&self, path: &Path, contents: &[u8]) -> Result<LoadedSheets, InputError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            let (text, encoding) = decode_text(contents);
            let delimiter = match self.config.delimiter {
                Some(d) => d,
                None => detect_delimiter(&text)?,
            };
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(LoadedSheets {
                sheets: vec![(name, self.parse_delimited(&text, delimiter)?)],
                format: delimited_format(delimiter),
                encoding: encoding.to_string(),
            })
        } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            Ok(LoadedSheets {
                sheets: load_workbook(path)?,
                format: ext,
                encoding: "binary".to_string(),
            })
        } else {
            Err(InputError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                ext
            }))
        }
    }

    /// Parse delimited text that is already in memory.
    ///
    /// The delimiter is sniffed unless one is configured.
    pub fn load_text(&self, text: &str) -> Result<RawTable, InputError> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(text)?,
        };
        let table = self.parse_delimited(text, delimiter)?;
        if table.is_empty() {
            return Err(InputError::EmptyTable("no non-blank rows".to_string()));
        }
        Ok(table)
    }

    fn parse_delimited(&self, text: &str, delimiter: u8) -> Result<RawTable, InputError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<Cell> = record.iter().map(Cell::text).collect();
            if row.iter().all(Cell::is_blank) {
                continue;
            }
            rows.push(row);
        }

        Ok(RawTable::new(rows))
    }
}

fn read_all(path: &Path) -> Result<Vec<u8>, InputError> {
    let mut file = File::open(path).map_err(|e| InputError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).map_err(|e| InputError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(contents)
}

/// Decode UTF-8 (dropping a BOM), falling back to Windows-1251 used by
/// Cyrillic spreadsheet exports.
fn decode_text(bytes: &[u8]) -> (String, &'static str) {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => (s.to_string(), "utf-8"),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1251.decode(bytes);
            (decoded.into_owned(), "windows-1251")
        }
    }
}

/// Read every worksheet in workbook order, blank rows dropped.
fn load_workbook(path: &Path) -> Result<Vec<(String, RawTable)>, InputError> {
    let spreadsheet_error = |message: String| InputError::Spreadsheet {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(spreadsheet_error("workbook contains no sheets".to_string()));
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| spreadsheet_error(format!("sheet '{}': {}", sheet_name, e)))?;

        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect::<Vec<Cell>>())
            .filter(|cells| !cells.iter().all(Cell::is_blank))
            .collect();
        sheets.push((sheet_name, RawTable::new(rows)));
    }

    Ok(sheets)
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text(s.as_str()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => Cell::text(other.to_string()),
    }
}

fn delimited_format(delimiter: u8) -> String {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
    .to_string()
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(text: &str) -> Result<u8, InputError> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(20)
        .collect();

    if lines.is_empty() {
        return Err(InputError::EmptyTable("no lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = (0usize, 0usize);

    // Banner lines above the header carry few or no delimiters, so a candidate
    // is ranked by how many lines agree on one field count, then by that count.
    for &delim in DELIMITERS {
        let mut agreement: HashMap<usize, usize> = HashMap::new();
        for line in &lines {
            let count = count_delimiter_in_line(line, delim);
            if count > 0 {
                *agreement.entry(count).or_default() += 1;
            }
        }

        let Some(score) = agreement
            .into_iter()
            .map(|(count, agreeing)| (agreeing, count))
            .max()
        else {
            continue;
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
