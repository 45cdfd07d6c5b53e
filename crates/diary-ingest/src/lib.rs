//! Survey data ingestion.
//!
//! Loads the diary, trait, and network CSV exports into Polars DataFrames
//! with every column typed as text, and checks that the columns a stage
//! depends on are present.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use diary_ingest::{read_csv_frame, require_columns};
//!
//! let path = Path::new("data/dd.csv");
//! let diary = read_csv_frame(path)?;
//! require_columns(&diary, path, &["ID", "Dorm", "Day"])?;
//! ```

mod csv;
mod error;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::{
    CsvHeaders, normalize_header, parse_csv_line, read_csv_frame, read_csv_schema,
    require_columns, validate_encoding,
};
