//! Combines the per-family long tables into one event table.

use diary_model::columns::EVENT_KEY_COLUMNS;
use diary_model::{JoinPolicy, VariableFamily};
use polars::prelude::DataFrame;
use tracing::warn;

use crate::error::{Result, TransformError};
use crate::join::{JoinSpec, join_frames};
use crate::report::JoinStage;

/// Joins the long tables in the order given on the event key.
///
/// The first table is the left side of every join. Returns the event table
/// and one [`JoinStage`] per joined family.
pub fn join_event_tables(
    tables: Vec<(VariableFamily, DataFrame)>,
    policy: JoinPolicy,
    allow_empty: bool,
) -> Result<(DataFrame, Vec<JoinStage>)> {
    let mut tables = tables.into_iter();
    let Some((_, mut events)) = tables.next() else {
        return Err(TransformError::schema(
            "event",
            vec!["at least one variable family".to_string()],
        ));
    };

    let mut stages = Vec::new();
    for (family, table) in tables {
        let stage_name = format!("events+{family}");
        let spec = JoinSpec::new(&stage_name, &EVENT_KEY_COLUMNS, policy)
            .with_allow_empty(allow_empty);
        let (joined, stage) = join_frames(&events, &table, &spec)?;
        if !stage.duplicate_right_keys.is_empty() {
            warn!(
                stage = %stage.name,
                keys = stage.duplicate_right_keys.len(),
                "event key repeats within one family table"
            );
        }
        events = joined;
        stages.push(stage);
    }
    Ok((events, stages))
}
