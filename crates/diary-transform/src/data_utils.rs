//! Polars `AnyValue` helpers shared by the stages.

use polars::prelude::{AnyValue, DataFrame};

use crate::error::Result;

/// Converts a cell to text; nulls become the empty string.
pub fn any_to_string(value: AnyValue) -> String {
    match value {
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Converts a cell to the text written to the output file.
pub fn any_to_string_for_output(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(value) => value.to_string(),
        AnyValue::StringOwned(value) => value.to_string(),
        AnyValue::Float64(value) => format_numeric(value),
        AnyValue::Float32(value) => format_numeric(value as f64),
        AnyValue::Int64(value) => value.to_string(),
        AnyValue::Int32(value) => value.to_string(),
        AnyValue::Int16(value) => value.to_string(),
        AnyValue::Int8(value) => value.to_string(),
        AnyValue::UInt64(value) => value.to_string(),
        AnyValue::UInt32(value) => value.to_string(),
        AnyValue::UInt16(value) => value.to_string(),
        AnyValue::UInt8(value) => value.to_string(),
        AnyValue::Boolean(value) => {
            if value {
                "1".to_string()
            } else {
                "0".to_string()
            }
        }
        value => value.to_string(),
    }
}

pub fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn any_to_f64(value: AnyValue) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Float32(value) => Some(value as f64),
        AnyValue::Float64(value) => Some(value),
        AnyValue::Int8(value) => Some(value as f64),
        AnyValue::Int16(value) => Some(value as f64),
        AnyValue::Int32(value) => Some(value as f64),
        AnyValue::Int64(value) => Some(value as f64),
        AnyValue::UInt8(value) => Some(value as f64),
        AnyValue::UInt16(value) => Some(value as f64),
        AnyValue::UInt32(value) => Some(value as f64),
        AnyValue::UInt64(value) => Some(value as f64),
        AnyValue::String(value) => parse_f64(value),
        AnyValue::StringOwned(value) => parse_f64(&value),
        _ => None,
    }
}

pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

/// Names from `required` that `df` does not have, in the order given.
pub fn missing_columns(df: &DataFrame, required: &[&str]) -> Vec<String> {
    let present = column_names(df);
    required
        .iter()
        .filter(|name| !present.iter().any(|column| column == *name))
        .map(|name| (*name).to_string())
        .collect()
}

/// Every cell of a column as text.
pub fn column_strings(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Every cell of a column as text, with nulls and blanks as `None`.
pub fn column_optional_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    Ok(column_strings(df, name)?
        .into_iter()
        .map(|value| if value.is_empty() { None } else { Some(value) })
        .collect())
}

/// Every cell of a column parsed as a number.
pub fn numeric_column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_integral_floats_without_fraction() {
        assert_eq!(format_numeric(1.0), "1");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(2.5), "2.5");
    }

    #[test]
    fn parses_numbers_leniently() {
        assert_eq!(parse_f64(" 3 "), Some(3.0));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("yes"), None);
        assert_eq!(parse_f64("NaN"), None);
    }

    #[test]
    fn output_strings_render_nulls_empty() {
        assert_eq!(any_to_string_for_output(AnyValue::Null), "");
        assert_eq!(any_to_string_for_output(AnyValue::Float64(4.0)), "4");
        assert_eq!(any_to_string_for_output(AnyValue::Int32(1)), "1");
        assert_eq!(any_to_string_for_output(AnyValue::String("Talk")), "Talk");
    }
}
