//! Baseline trait selection.

use diary_model::columns::{ID, TIME};
use diary_model::BASELINE_TIME;
use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::{debug, warn};

use crate::data_utils::{missing_columns, numeric_column_f64};
use crate::error::{Result, TransformError};
use crate::keys::duplicate_keys;

const TRAIT_TABLE: &str = "trait";

/// Baseline rows projected onto `whitelist`, plus subject ids that occur on
/// more than one baseline row.
#[derive(Debug, Clone)]
pub struct BaselineTraits {
    pub frame: DataFrame,
    pub duplicate_ids: Vec<String>,
}

/// Keeps rows whose `time` is the baseline occasion and projects them onto
/// `whitelist` in the order given.
///
/// `time` is compared numerically, so `0`, `0.0` and ` 0` all qualify. Every
/// absent whitelist column (and an absent `time`) is reported at once.
pub fn select_baseline_traits(traits: &DataFrame, whitelist: &[&str]) -> Result<BaselineTraits> {
    let mut required = Vec::with_capacity(whitelist.len() + 1);
    required.extend_from_slice(whitelist);
    if !required.contains(&TIME) {
        required.push(TIME);
    }
    let missing = missing_columns(traits, &required);
    if !missing.is_empty() {
        return Err(TransformError::schema(TRAIT_TABLE, missing));
    }

    let baseline = BASELINE_TIME as f64;
    let mask: Vec<bool> = numeric_column_f64(traits, TIME)?
        .into_iter()
        .map(|time| time == Some(baseline))
        .collect();
    let mask = BooleanChunked::from_slice("baseline".into(), &mask);
    let frame = traits.filter(&mask)?.select(whitelist.iter().copied())?;

    let duplicate_ids = if whitelist.contains(&ID) {
        duplicate_keys(&frame, &[ID])?
    } else {
        Vec::new()
    };
    if !duplicate_ids.is_empty() {
        warn!(
            subjects = %duplicate_ids.join(", "),
            "several baseline rows for one subject; merged rows will repeat"
        );
    }
    debug!(
        rows = traits.height(),
        baseline_rows = frame.height(),
        columns = frame.width(),
        "selected baseline traits"
    );
    Ok(BaselineTraits {
        frame,
        duplicate_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_utils::{column_names, column_strings};
    use polars::prelude::Column;

    fn traits() -> DataFrame {
        DataFrame::new(vec![
            Column::new("extra".into(), vec!["x", "y", "z"]),
            Column::new("BFI_a".into(), vec!["3.5", "2", "4"]),
            Column::new("time".into(), vec!["0", "1", "0.0"]),
            Column::new("ID".into(), vec!["1", "1", "2"]),
        ])
        .unwrap()
    }

    #[test]
    fn keeps_one_row_per_baseline_subject_in_whitelist_order() {
        let selected = select_baseline_traits(&traits(), &["ID", "BFI_a"]).unwrap();
        assert_eq!(column_names(&selected.frame), vec!["ID", "BFI_a"]);
        assert_eq!(column_strings(&selected.frame, "ID").unwrap(), vec!["1", "2"]);
        assert_eq!(column_strings(&selected.frame, "BFI_a").unwrap(), vec!["3.5", "4"]);
        assert!(selected.duplicate_ids.is_empty());
    }

    #[test]
    fn reports_every_missing_column() {
        let err = select_baseline_traits(&traits(), &["ID", "BFI_e", "BFI_n"]).unwrap_err();
        assert_eq!(err.to_string(), "trait table is missing BFI_e, BFI_n");
    }

    #[test]
    fn missing_time_is_schema_error() {
        let df = traits().drop("time").unwrap();
        let err = select_baseline_traits(&df, &["ID"]).unwrap_err();
        assert_eq!(err.to_string(), "trait table is missing time");
    }

    #[test]
    fn flags_repeated_baseline_subject() {
        let df = DataFrame::new(vec![
            Column::new("ID".into(), vec!["5", "5"]),
            Column::new("time".into(), vec!["0", "0"]),
        ])
        .unwrap();
        let selected = select_baseline_traits(&df, &["ID"]).unwrap();
        assert_eq!(selected.frame.height(), 2);
        assert_eq!(selected.duplicate_ids, vec!["5"]);
    }
}
