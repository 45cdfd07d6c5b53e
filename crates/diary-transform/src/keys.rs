//! Subject id normalization and key comparison.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::data_utils::{column_optional_strings, column_strings, parse_f64};
use crate::error::Result;

/// Canonical text form of a join-key cell.
///
/// Whitespace is trimmed and integral numeric spellings collapse to integer
/// form, so `" 101 "`, `"101"` and `"101.0"` all become `"101"`.
pub fn normalize_subject_id(value: &str) -> String {
    let trimmed = value.trim();
    match parse_f64(trimmed) {
        Some(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
            format!("{}", number as i64)
        }
        _ => trimmed.to_string(),
    }
}

/// Rewrites a key column in place with normalized ids; blanks become null.
pub fn normalize_key_column(df: &mut DataFrame, name: &str) -> Result<()> {
    let values: Vec<Option<String>> = column_optional_strings(df, name)?
        .into_iter()
        .map(|value| value.map(|id| normalize_subject_id(&id)))
        .map(|value| value.filter(|id| !id.is_empty()))
        .collect();
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

/// Key cells of every row of `df`, one entry per key column.
pub fn row_keys(df: &DataFrame, key_columns: &[&str]) -> Result<Vec<Vec<String>>> {
    let mut columns = Vec::with_capacity(key_columns.len());
    for name in key_columns {
        columns.push(column_strings(df, name)?);
    }
    Ok((0..df.height())
        .map(|row| columns.iter().map(|values| values[row].clone()).collect())
        .collect())
}

/// Composite keys that occur on more than one row, in first-seen order.
///
/// Keys are compared cell by cell; the returned labels join the cells with
/// `|` for display.
pub fn duplicate_keys(df: &DataFrame, key_columns: &[&str]) -> Result<Vec<String>> {
    let mut counts: BTreeMap<Vec<String>, (usize, usize)> = BTreeMap::new();
    for (row, key) in row_keys(df, key_columns)?.into_iter().enumerate() {
        let entry = counts.entry(key).or_insert((row, 0));
        entry.1 += 1;
    }

    let mut repeated: Vec<(usize, Vec<String>)> = counts
        .into_iter()
        .filter(|(_, (_, count))| *count > 1)
        .map(|(key, (first, _))| (first, key))
        .collect();
    repeated.sort_by_key(|(first, _)| *first);
    Ok(repeated.into_iter().map(|(_, key)| key.join("|")).collect())
}

/// Orders key values numerically when both parse as numbers, else as text.
///
/// Numbers sort before non-numeric text.
pub fn compare_key_values(left: &str, right: &str) -> Ordering {
    match (parse_f64(left), parse_f64(right)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{AnyValue, Column};

    #[test]
    fn normalizes_numeric_spellings() {
        assert_eq!(normalize_subject_id("101"), "101");
        assert_eq!(normalize_subject_id(" 101.0 "), "101");
        assert_eq!(normalize_subject_id("101.5"), "101.5");
        assert_eq!(normalize_subject_id("S-7"), "S-7");
    }

    #[test]
    fn numeric_ordering_beats_lexical() {
        assert_eq!(compare_key_values("9", "10"), Ordering::Less);
        assert_eq!(compare_key_values("10", "9"), Ordering::Greater);
        assert_eq!(compare_key_values("2", "b"), Ordering::Less);
        assert_eq!(compare_key_values("a", "b"), Ordering::Less);
    }

    #[test]
    fn key_column_is_rewritten() {
        let mut df = DataFrame::new(vec![Column::new(
            "ID".into(),
            vec![Some("7.0"), Some(" 8"), None],
        )])
        .unwrap();
        normalize_key_column(&mut df, "ID").unwrap();
        let id = df.column("ID").unwrap();
        assert_eq!(id.get(0).unwrap(), AnyValue::String("7"));
        assert_eq!(id.get(1).unwrap(), AnyValue::String("8"));
        assert_eq!(id.get(2).unwrap(), AnyValue::Null);
    }

    #[test]
    fn finds_repeated_keys_in_order() {
        let df = DataFrame::new(vec![Column::new(
            "ID".into(),
            vec!["9", "3", "9", "3", "4"],
        )])
        .unwrap();
        assert_eq!(duplicate_keys(&df, &["ID"]).unwrap(), vec!["9", "3"]);
    }

    #[test]
    fn composite_keys_join_with_pipe() {
        let df = DataFrame::new(vec![
            Column::new("ID".into(), vec!["1", "1", "1"]),
            Column::new("Day".into(), vec!["2", "3", "2"]),
        ])
        .unwrap();
        assert_eq!(duplicate_keys(&df, &["ID", "Day"]).unwrap(), vec!["1|2"]);
    }

    #[test]
    fn pipe_inside_a_cell_is_not_a_separator() {
        let df = DataFrame::new(vec![
            Column::new("ID".into(), vec!["a|b", "a"]),
            Column::new("Dorm".into(), vec!["c", "b|c"]),
        ])
        .unwrap();
        assert!(duplicate_keys(&df, &["ID", "Dorm"]).unwrap().is_empty());
    }
}
