//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, normalize_header, parse_csv_line};
pub use reader::{read_csv_frame, read_csv_schema, require_columns, validate_encoding};
