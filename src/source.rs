//! Batch source reading
//!
//! Turns a table file or a block of pasted text into an ordered list of raw
//! candidate strings. Nothing is validated or deduplicated here.

use std::path::{Path, PathBuf};

use crate::config::SourceConfig;
use crate::error::{Error, Result};

/// Where the entries of a batch come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchSource {
    /// Delimited table file; the first field of each row is a candidate
    Table(PathBuf),
    /// Newline-delimited pasted text
    Text(String),
    /// Newline-delimited text file, read when the batch is prepared
    TextFile(PathBuf),
    /// Newline-delimited text on standard input, read when the batch is prepared
    Stdin,
}

impl BatchSource {
    /// Read the candidates from this source
    pub fn read(&self, config: &SourceConfig) -> Result<Vec<String>> {
        match self {
            BatchSource::Table(path) => read_from_table_with(path, config.delimiter),
            BatchSource::Text(blob) => Ok(read_from_text(blob)),
            BatchSource::TextFile(path) => {
                let blob =
                    std::fs::read_to_string(path).map_err(|e| Error::source_read(path, e))?;
                Ok(read_from_text(&blob))
            }
            BatchSource::Stdin => {
                let blob = std::io::read_to_string(std::io::stdin())
                    .map_err(|e| Error::source_read("<stdin>", e))?;
                Ok(read_from_text(&blob))
            }
        }
    }
}

/// Read the first column of a comma-delimited table file
///
/// No header row is assumed. Blank lines are skipped; rows with an empty first
/// field are kept as empty candidates so they show up as invalid entries.
pub fn read_from_table(path: &Path) -> Result<Vec<String>> {
    read_from_table_with(path, ',')
}

/// Read the first column of a table file with an explicit delimiter
pub fn read_from_table_with(path: &Path, delimiter: char) -> Result<Vec<String>> {
    let delimiter = u8::try_from(delimiter).map_err(|_| {
        Error::config(
            "source.delimiter",
            format!("delimiter '{delimiter}' is not a single-byte character"),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| Error::source_read(path, e))?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::source_read(path, e))?;
        if let Some(first) = record.get(0) {
            entries.push(first.to_string());
        }
    }

    tracing::debug!(path = %path.display(), entries = entries.len(), "Read batch table");
    Ok(entries)
}

/// Split pasted text into trimmed, non-empty lines
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn read_from_text(blob: &str) -> Vec<String> {
    blob.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
