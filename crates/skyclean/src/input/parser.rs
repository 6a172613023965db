//! Delimited-file parser with delimiter detection.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{RawTable, SourceMetadata};
use crate::error::{CleanError, Result};

/// Delimiters to try when auto-detecting, in tie-break order.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Data rows read per candidate delimiter.
const SNIFF_ROWS: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Reads delimited files into raw tables.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the raw table and its metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| CleanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => self.detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed source file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(CleanError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Ragged rows are padded or truncated to the header width
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(CleanError::EmptyData("No data rows found".to_string()));
        }

        Ok(RawTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// How cleanly one candidate delimiter splits the start of a file.
///
/// Ordered so that a delimiter whose sampled rows all match the header
/// width beats one that does not, then by the number of matching rows,
/// then by header width.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct DelimiterFit {
    consistent: bool,
    matching_rows: usize,
    header_width: usize,
}

impl DelimiterFit {
    /// `None` when the header does not split into at least two columns.
    fn measure(bytes: &[u8], delimiter: u8, quote: u8) -> Option<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .quote(quote)
            .flexible(true)
            .from_reader(bytes);

        let header_width = reader.headers().ok()?.len();
        if header_width < 2 {
            return None;
        }

        let mut sampled = 0;
        let mut matching_rows = 0;
        for record in reader.records().take(SNIFF_ROWS) {
            let Ok(record) = record else { break };
            sampled += 1;
            if record.len() == header_width {
                matching_rows += 1;
            }
        }

        Some(Self {
            consistent: matching_rows == sampled,
            matching_rows,
            header_width,
        })
    }
}

impl Parser {
    /// Pick the candidate delimiter that best agrees with the header row.
    ///
    /// Ties go to the earlier entry of [`DELIMITERS`]; a single-column
    /// file falls back to a comma.
    fn detect_delimiter(&self, bytes: &[u8]) -> Result<u8> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(CleanError::EmptyData("No lines to analyze".to_string()));
        }

        let mut best: Option<(DelimiterFit, u8)> = None;
        for &delimiter in DELIMITERS {
            let Some(fit) = DelimiterFit::measure(bytes, delimiter, self.config.quote) else {
                continue;
            };
            debug!(
                delimiter = %(delimiter as char).escape_default(),
                ?fit,
                "delimiter candidate"
            );
            if best.as_ref().is_none_or(|(current, _)| fit > *current) {
                best = Some((fit, delimiter));
            }
        }

        Ok(best.map_or(b',', |(_, delimiter)| delimiter))
    }
}
