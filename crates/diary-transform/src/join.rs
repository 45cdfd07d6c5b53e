//! Key-based joins between text-typed frames.
//!
//! Joins are built from row indices and `DataFrame::take`, so the output keeps
//! left row order and, within one left row, right row order. A non-key column
//! name present on both sides is written as `<name>_x` (left) and `<name>_y`
//! (right), the suffixes pandas `merge` uses.

use std::collections::HashMap;

use diary_model::JoinPolicy;
use polars::prelude::{DataFrame, IdxCa, NewChunkedArray};
use tracing::{debug, warn};

use crate::data_utils::{column_names, missing_columns};
use crate::error::{Result, TransformError};
use crate::keys::{duplicate_keys, row_keys};
use crate::report::JoinStage;

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// A join between two frames on shared key columns.
#[derive(Debug, Clone, Copy)]
pub struct JoinSpec<'a> {
    /// Stage name used in logs, diagnostics, and errors.
    pub stage: &'a str,
    pub keys: &'a [&'a str],
    pub policy: JoinPolicy,
    /// Accept zero output rows from non-empty inputs.
    pub allow_empty: bool,
}

impl<'a> JoinSpec<'a> {
    pub fn new(stage: &'a str, keys: &'a [&'a str], policy: JoinPolicy) -> Self {
        Self {
            stage,
            keys,
            policy,
            allow_empty: false,
        }
    }

    pub fn with_allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}

/// Joins `right` onto `left` as described by `spec`.
///
/// Both frames must hold every key column. With [`JoinPolicy::Inner`] left
/// rows without a partner are dropped; with [`JoinPolicy::Left`] they are kept
/// and the right columns are null. A right key that repeats multiplies the
/// matching left rows; the stage records which keys did so.
pub fn join_frames(
    left: &DataFrame,
    right: &DataFrame,
    spec: &JoinSpec<'_>,
) -> Result<(DataFrame, JoinStage)> {
    let missing = missing_columns(left, spec.keys);
    if !missing.is_empty() {
        return Err(TransformError::schema(&format!("{} left", spec.stage), missing));
    }
    let missing = missing_columns(right, spec.keys);
    if !missing.is_empty() {
        return Err(TransformError::schema(
            &format!("{} right", spec.stage),
            missing,
        ));
    }

    let left_keys = row_keys(left, spec.keys)?;
    let right_keys = row_keys(right, spec.keys)?;

    let mut right_index: HashMap<&[String], Vec<u32>> = HashMap::new();
    for (row, key) in right_keys.iter().enumerate() {
        right_index.entry(key.as_slice()).or_default().push(row as u32);
    }

    let mut left_take: Vec<u32> = Vec::with_capacity(left.height());
    let mut right_take: Vec<Option<u32>> = Vec::with_capacity(left.height());
    let mut fanned_rows = 0usize;
    for (row, key) in left_keys.iter().enumerate() {
        match right_index.get(key.as_slice()) {
            Some(matches) => {
                if matches.len() > 1 {
                    fanned_rows += 1;
                }
                for right_row in matches {
                    left_take.push(row as u32);
                    right_take.push(Some(*right_row));
                }
            }
            None if spec.policy == JoinPolicy::Left => {
                left_take.push(row as u32);
                right_take.push(None);
            }
            None => {}
        }
    }

    let left_idx = IdxCa::from_vec("left_idx".into(), left_take);
    let right_idx = IdxCa::from_iter_options("right_idx".into(), right_take.into_iter());
    let mut left_part = left.take(&left_idx)?;

    let left_names = column_names(left);
    let payload: Vec<String> = column_names(right)
        .into_iter()
        .filter(|name| !spec.keys.contains(&name.as_str()))
        .collect();
    let mut right_part = right.select(payload.iter().map(String::as_str))?.take(&right_idx)?;
    for name in &payload {
        if left_names.contains(name) {
            left_part.rename(name, format!("{name}{LEFT_SUFFIX}").into())?;
            right_part.rename(name, format!("{name}{RIGHT_SUFFIX}").into())?;
        }
    }
    let joined = left_part.hstack(right_part.get_columns())?;

    let stage = JoinStage {
        name: spec.stage.to_string(),
        policy: spec.policy,
        left_rows: left.height(),
        right_rows: right.height(),
        output_rows: joined.height(),
        duplicate_right_keys: duplicate_keys(right, spec.keys)?,
        fanned_rows,
    };

    debug!(
        stage = spec.stage,
        policy = spec.policy.as_str(),
        left_rows = stage.left_rows,
        right_rows = stage.right_rows,
        output_rows = stage.output_rows,
        "joined"
    );

    if stage.output_rows == 0 && stage.left_rows > 0 && stage.right_rows > 0 {
        if !spec.allow_empty {
            return Err(TransformError::JoinKeyMismatch {
                stage: spec.stage.to_string(),
                left_rows: stage.left_rows,
                right_rows: stage.right_rows,
            });
        }
        warn!(stage = spec.stage, "join matched no rows");
    }

    Ok((joined, stage))
}
