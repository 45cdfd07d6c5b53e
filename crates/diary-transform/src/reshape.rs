//! Wide-to-long reshaping of the diary table.
//!
//! Each variable family melts into its own long table keyed by
//! `ID, Dorm, Day, Valence, EventNum` with one value column named after the
//! family. Rows come out sorted by `ID, Dorm, Day` (numeric-aware, stable),
//! and within one diary row the matched columns keep header order.

use std::cmp::Ordering;

use diary_model::columns::{DAY, DIARY_ID_COLUMNS, DORM, EVENT_NUM, ID, VALENCE};
use diary_model::{DiarySchema, VariableFamily};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::data_utils::{column_optional_strings, missing_columns};
use crate::error::{Result, TransformError};
use crate::keys::compare_key_values;

const DIARY_TABLE: &str = "diary";

/// Fails unless the diary carries `ID`, `Dorm` and `Day`.
pub fn require_diary_ids(diary: &DataFrame) -> Result<()> {
    let missing = missing_columns(diary, &DIARY_ID_COLUMNS);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(TransformError::schema(DIARY_TABLE, missing))
    }
}

fn family_requirement(family: VariableFamily) -> String {
    match family.pattern() {
        Some(pattern) => format!("{family} columns ({})", pattern.as_str()),
        None => format!("{family} columns"),
    }
}

fn compare_optional(left: &Option<String>, right: &Option<String>) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => compare_key_values(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Wide row indices ordered by `ID, Dorm, Day`.
fn sorted_rows(ids: &[Vec<Option<String>>; 3]) -> Vec<usize> {
    let height = ids[0].len();
    let mut rows: Vec<usize> = (0..height).collect();
    rows.sort_by(|a, b| {
        ids.iter()
            .map(|column| compare_optional(&column[*a], &column[*b]))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Melts one variable family into long form.
pub fn melt_family(
    diary: &DataFrame,
    schema: &DiarySchema,
    family: VariableFamily,
) -> Result<DataFrame> {
    require_diary_ids(diary)?;
    let event_columns = schema.columns(family);
    if event_columns.is_empty() {
        return Err(TransformError::schema(
            DIARY_TABLE,
            vec![family_requirement(family)],
        ));
    }

    let ids = [
        column_optional_strings(diary, ID)?,
        column_optional_strings(diary, DORM)?,
        column_optional_strings(diary, DAY)?,
    ];
    let mut values = Vec::with_capacity(event_columns.len());
    for column in event_columns {
        values.push(column_optional_strings(diary, &column.name)?);
    }

    let rows = sorted_rows(&ids);
    let capacity = rows.len() * event_columns.len();
    let mut out_id: Vec<Option<String>> = Vec::with_capacity(capacity);
    let mut out_dorm: Vec<Option<String>> = Vec::with_capacity(capacity);
    let mut out_day: Vec<Option<String>> = Vec::with_capacity(capacity);
    let mut out_values: Vec<Option<String>> = Vec::with_capacity(capacity);
    let mut out_valence: Vec<&str> = Vec::with_capacity(capacity);
    let mut out_event: Vec<String> = Vec::with_capacity(capacity);

    for row in rows {
        for (position, column) in event_columns.iter().enumerate() {
            out_id.push(ids[0][row].clone());
            out_dorm.push(ids[1][row].clone());
            out_day.push(ids[2][row].clone());
            out_values.push(values[position][row].clone());
            out_valence.push(column.valence.label());
            out_event.push(column.event_num.to_string());
        }
    }

    let long = DataFrame::new(vec![
        Column::new(ID.into(), out_id),
        Column::new(DORM.into(), out_dorm),
        Column::new(DAY.into(), out_day),
        Column::new(family.value_column().into(), out_values),
        Column::new(VALENCE.into(), out_valence),
        Column::new(EVENT_NUM.into(), out_event),
    ])?;

    debug!(
        family = %family,
        matched_columns = event_columns.len(),
        rows = long.height(),
        "melted family"
    );
    Ok(long)
}

/// Melts every family, failing with all families that matched no column.
pub fn melt_all(
    diary: &DataFrame,
    schema: &DiarySchema,
) -> Result<Vec<(VariableFamily, DataFrame)>> {
    require_diary_ids(diary)?;
    let missing = schema.missing_families();
    if !missing.is_empty() {
        return Err(TransformError::schema(
            DIARY_TABLE,
            missing.into_iter().map(family_requirement).collect(),
        ));
    }
    VariableFamily::all()
        .into_iter()
        .map(|family| Ok((family, melt_family(diary, schema, family)?)))
        .collect()
}
