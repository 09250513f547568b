use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while reading a log file
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Input format of a log file, detected from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Csv,
    Json,
    PlainText,
}

impl LogFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => LogFormat::Csv,
            Some("json") => LogFormat::Json,
            _ => LogFormat::PlainText,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Csv => write!(f, "csv"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::PlainText => write!(f, "plaintext"),
        }
    }
}

/// A log file flattened into a single text blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogDocument {
    pub source: PathBuf,
    pub format: LogFormat,
    pub content: String,
}

impl LogDocument {
    /// Read and normalize a log file. Failures leave `content` empty.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let format = LogFormat::from_path(path);

        let content = match try_parse(path, format) {
            Ok(content) => content,
            Err(e) => {
                error!("Error reading log file {}: {}", path.display(), e);
                String::new()
            }
        };

        Self {
            source: path.to_path_buf(),
            format,
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Parse a log file into normalized text; empty string means nothing was read
pub fn parse_log_file(path: impl AsRef<Path>) -> String {
    LogDocument::load(path).content
}

/// Parse a log file, surfacing the underlying failure
pub fn try_parse(path: &Path, format: LogFormat) -> ParseResult<String> {
    debug!("Parsing {} as {}", path.display(), format);

    match format {
        LogFormat::Csv => parse_csv(path),
        LogFormat::Json => parse_json(path),
        LogFormat::PlainText => Ok(fs::read_to_string(path)?),
    }
}

/// Blank lines outside quoted fields are kept as empty rows so row order and
/// row count match the file.
fn parse_csv(path: &Path) -> ParseResult<String> {
    let raw = fs::read_to_string(path)?;

    let mut rows = Vec::new();
    let mut pending = String::new();
    let mut in_quotes = false;

    for line in raw.split_inclusive('\n') {
        if !in_quotes && line.trim_end_matches(['\r', '\n']).is_empty() {
            read_csv_rows(&pending, &mut rows)?;
            pending.clear();
            rows.push(String::new());
            continue;
        }

        if line.matches('"').count() % 2 == 1 {
            in_quotes = !in_quotes;
        }
        pending.push_str(line);
    }
    read_csv_rows(&pending, &mut rows)?;

    Ok(rows.join("\n"))
}

fn read_csv_rows(chunk: &str, rows: &mut Vec<String>) -> ParseResult<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(chunk.as_bytes());

    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().collect::<Vec<_>>().join(" "));
    }
    Ok(())
}

fn parse_json(path: &Path) -> ParseResult<String> {
    let raw = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
