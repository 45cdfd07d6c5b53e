//! Derived disclosure totals: `NumDrmTld` and `GotHelp`.

use diary_model::MissingDisclosure;
use diary_model::columns::{GOT_HELP, NUM_DRM_TLD, disclosure_columns};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::debug;

use crate::data_utils::{missing_columns, numeric_column_f64};
use crate::error::{Result, TransformError};

/// Sum of the slot values under `mode`.
///
/// With [`MissingDisclosure::Propagate`] any missing slot makes the total
/// missing; with [`MissingDisclosure::Zero`] missing slots add nothing.
pub fn disclosure_total(slots: &[Option<f64>], mode: MissingDisclosure) -> Option<f64> {
    match mode {
        MissingDisclosure::Propagate => slots.iter().copied().sum::<Option<f64>>(),
        MissingDisclosure::Zero => Some(slots.iter().flatten().sum()),
    }
}

/// 1 when anyone was told, 0 otherwise; missing totals stay missing.
pub fn got_help(total: Option<f64>) -> Option<i32> {
    total.map(|value| i32::from(value != 0.0))
}

/// Appends `NumDrmTld` and `GotHelp` computed from `TldDrm1..5`.
pub fn add_disclosure_totals(events: &mut DataFrame, mode: MissingDisclosure) -> Result<()> {
    let columns = disclosure_columns();
    let names: Vec<&str> = columns.iter().map(String::as_str).collect();
    let missing = missing_columns(events, &names);
    if !missing.is_empty() {
        return Err(TransformError::schema("event", missing));
    }

    let mut slots = Vec::with_capacity(names.len());
    for name in &names {
        slots.push(numeric_column_f64(events, name)?);
    }

    let mut totals: Vec<Option<f64>> = Vec::with_capacity(events.height());
    let mut helped: Vec<Option<i32>> = Vec::with_capacity(events.height());
    let mut row_slots = Vec::with_capacity(names.len());
    for row in 0..events.height() {
        row_slots.clear();
        row_slots.extend(slots.iter().map(|values| values[row]));
        let total = disclosure_total(&row_slots, mode);
        totals.push(total);
        helped.push(got_help(total));
    }

    let missing_totals = totals.iter().filter(|total| total.is_none()).count();
    events.with_column(Series::new(NUM_DRM_TLD.into(), totals))?;
    events.with_column(Series::new(GOT_HELP.into(), helped))?;
    debug!(
        rows = events.height(),
        missing_totals,
        "computed disclosure totals"
    );
    Ok(())
}
