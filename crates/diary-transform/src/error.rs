//! Error types for the reshape and merge stages.

use std::path::PathBuf;

use diary_ingest::IngestError;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Columns a stage depends on are absent.
    #[error("{table} table is missing {}", .columns.join(", "))]
    SchemaMismatch { table: String, columns: Vec<String> },

    /// A join produced nothing although both sides had rows.
    #[error(
        "join '{stage}' matched no rows ({left_rows} left, {right_rows} right); \
         check that subject ids use the same format in every file"
    )]
    JoinKeyMismatch {
        stage: String,
        left_rows: usize,
        right_rows: usize,
    },

    #[error("merged table has no rows")]
    EmptyResult,

    #[error("{table} table repeats subject id(s) {}", .keys.join(", "))]
    DuplicateKeys { table: String, keys: Vec<String> },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DataFrame operation failed: {0}")]
    DataFrame(#[from] PolarsError),
}

impl TransformError {
    pub(crate) fn schema(table: &str, columns: Vec<String>) -> Self {
        Self::SchemaMismatch {
            table: table.to_string(),
            columns,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
