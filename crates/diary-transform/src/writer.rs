//! CSV output of the merged table.

use std::fs;
use std::path::Path;

use csv::WriterBuilder;
use polars::prelude::{AnyValue, DataFrame};
use tracing::debug;

use crate::data_utils::{any_to_string_for_output, column_names};
use crate::error::{Result, TransformError};

/// Ensure a parent directory exists for a file path.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| TransformError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Writes `df` to `path` and returns the number of data rows written.
///
/// With `include_index` a leading column with an empty header holds the
/// zero-based row number. Nulls are written as empty cells and integral
/// floats without a fractional part.
pub fn write_merged_csv(df: &DataFrame, path: &Path, include_index: bool) -> Result<usize> {
    ensure_parent_dir(path)?;
    let write_err = |source: csv::Error| TransformError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WriterBuilder::new().from_path(path).map_err(write_err)?;

    let mut header = Vec::with_capacity(df.width() + 1);
    if include_index {
        header.push(String::new());
    }
    header.extend(column_names(df));
    writer.write_record(&header).map_err(write_err)?;

    let columns = df.get_columns();
    let mut record: Vec<String> = Vec::with_capacity(header.len());
    for row in 0..df.height() {
        record.clear();
        if include_index {
            record.push(row.to_string());
        }
        for column in columns {
            record.push(any_to_string_for_output(
                column.get(row).unwrap_or(AnyValue::Null),
            ));
        }
        writer.write_record(&record).map_err(write_err)?;
    }
    writer.flush().map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = header.len(),
        "wrote merged csv"
    );
    Ok(df.height())
}
