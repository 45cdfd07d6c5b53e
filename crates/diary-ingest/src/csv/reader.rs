//! CSV file reading into text-typed DataFrames.
//!
//! Every column is loaded as a string. Numeric interpretation happens where
//! a stage needs it, so subject ids compare the same way across files no
//! matter how each export typed them.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

use super::header::{CsvHeaders, normalize_header, parse_csv_line};

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open_file(path)?;

    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        if buffer[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads and parses the header line.
pub fn read_csv_schema(path: &Path) -> Result<CsvHeaders> {
    let reader = BufReader::new(open_file(path)?);
    let Some(line) = reader.lines().next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let line = line.map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let columns = parse_csv_line(&line);
    if columns.iter().all(String::is_empty) {
        return Err(IngestError::NoHeaderDetected {
            path: path.to_path_buf(),
        });
    }
    let headers = CsvHeaders::new(columns);
    if let Some(column) = headers.first_duplicate() {
        return Err(IngestError::DuplicateColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(headers)
}

/// Reads a CSV file into a DataFrame whose columns are all strings.
///
/// Header names are trimmed; blank header cells (typically an exported row
/// index) are named `Unnamed: <position>`. A file with a header but no rows
/// loads as an empty frame and logs a warning.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;
    let headers = read_csv_schema(path)?;

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for (position, name) in df.get_column_names_owned().into_iter().enumerate() {
        let blank = headers
            .columns
            .get(position)
            .is_some_and(|column| column.is_empty());
        let target = if blank {
            format!("Unnamed: {position}")
        } else {
            normalize_header(name.as_str())
        };
        if target != name.as_str() {
            df.rename(name.as_str(), target.into())?;
        }
    }

    if df.height() == 0 {
        warn!(path = %path.display(), "input has a header but no data rows");
    }
    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded csv"
    );
    Ok(df)
}

/// Fails with every absent column when `df` lacks any of `required`.
pub fn require_columns(df: &DataFrame, path: &Path, required: &[&str]) -> Result<()> {
    let headers = CsvHeaders::new(
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
    );
    let missing = headers.missing(required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingColumns {
            columns: missing.into_iter().map(String::from).collect(),
            path: path.to_path_buf(),
        })
    }
}
