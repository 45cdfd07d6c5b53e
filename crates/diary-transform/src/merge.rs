//! Subject-level joins of events with traits and network data.

use diary_model::MergeOptions;
use diary_model::columns::ID;
use polars::prelude::DataFrame;
use tracing::warn;

use crate::error::{Result, TransformError};
use crate::join::{JoinSpec, join_frames};
use crate::report::JoinStage;

pub const TRAIT_STAGE: &str = "traits";
pub const NETWORK_STAGE: &str = "network";

/// Joins one subject-level table onto `left` by `ID`.
///
/// Repeated right-side ids are a warning, or [`TransformError::DuplicateKeys`]
/// when `strict_keys` is set.
pub fn join_subject_table(
    left: &DataFrame,
    right: &DataFrame,
    stage: &str,
    options: &MergeOptions,
) -> Result<(DataFrame, JoinStage)> {
    let spec = JoinSpec::new(stage, &[ID], options.join_policy)
        .with_allow_empty(options.allow_empty);
    let (joined, stage) = join_frames(left, right, &spec)?;
    if !stage.duplicate_right_keys.is_empty() {
        if options.strict_keys {
            return Err(TransformError::DuplicateKeys {
                table: stage.name,
                keys: stage.duplicate_right_keys,
            });
        }
        warn!(
            stage = %stage.name,
            keys = %stage.duplicate_right_keys.join(", "),
            fanned_rows = stage.fanned_rows,
            "subject id repeats on the right side of the join"
        );
    }
    Ok((joined, stage))
}

/// Joins events with baseline traits, then with network metrics.
pub fn merge_subject_tables(
    events: &DataFrame,
    traits: &DataFrame,
    network: &DataFrame,
    options: &MergeOptions,
) -> Result<(DataFrame, Vec<JoinStage>)> {
    let (with_traits, trait_stage) = join_subject_table(events, traits, TRAIT_STAGE, options)?;
    let (merged, network_stage) =
        join_subject_table(&with_traits, network, NETWORK_STAGE, options)?;
    Ok((merged, vec![trait_stage, network_stage]))
}
