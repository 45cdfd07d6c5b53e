//! End-to-end merge: reshape, aggregate, select, join, write.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use diary_ingest::{read_csv_frame, require_columns};
use diary_model::columns::{DIARY_ID_COLUMNS, ID, TIME};
use diary_model::{DiarySchema, MergeConfig, MergeOptions, TRAIT_COLUMNS};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use crate::data_utils::{column_names, column_strings, missing_columns};
use crate::disclosure::add_disclosure_totals;
use crate::error::{Result, TransformError};
use crate::events::join_event_tables;
use crate::keys::normalize_key_column;
use crate::merge::merge_subject_tables;
use crate::report::{InputSummary, JoinStage, MergeReport};
use crate::reshape::{melt_all, require_diary_ids};
use crate::traits::select_baseline_traits;
use crate::writer::write_merged_csv;

/// Copies `df` with its `ID` column normalized.
fn with_normalized_ids(df: &DataFrame, table: &str) -> Result<DataFrame> {
    let missing = missing_columns(df, &[ID]);
    if !missing.is_empty() {
        return Err(TransformError::schema(table, missing));
    }
    let mut df = df.clone();
    normalize_key_column(&mut df, ID)?;
    Ok(df)
}

fn record_stage_warnings(report: &mut MergeReport, stage: &JoinStage) {
    if stage.fanned_out() {
        report.warnings.push(format!(
            "{}: {} row(s) repeated by duplicate key(s) {}",
            stage.name,
            stage.fanned_rows,
            stage.duplicate_right_keys.join(", ")
        ));
    } else if !stage.duplicate_right_keys.is_empty() {
        report.warnings.push(format!(
            "{}: duplicate key(s) {} on the right side",
            stage.name,
            stage.duplicate_right_keys.join(", ")
        ));
    }
    if stage.output_rows == 0 && stage.left_rows > 0 && stage.right_rows > 0 {
        report
            .warnings
            .push(format!("{}: join matched no rows", stage.name));
    }
}

/// Runs every in-memory stage on loaded frames.
///
/// Inputs are not modified. Returns the merged table and the diagnostics
/// collected on the way; the report's `inputs` list stays empty.
pub fn merge_frames(
    diary: &DataFrame,
    traits: &DataFrame,
    network: &DataFrame,
    options: &MergeOptions,
) -> Result<(DataFrame, MergeReport)> {
    let mut report = MergeReport::default();

    require_diary_ids(diary)?;
    let diary = with_normalized_ids(diary, "diary")?;
    let traits = with_normalized_ids(traits, "trait")?;
    let network = with_normalized_ids(network, "network")?;

    let long_tables = info_span!("reshape").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let schema = DiarySchema::from_headers(column_names(&diary));
        let tables = melt_all(&diary, &schema)?;
        debug!(
            wide_rows = diary.height(),
            event_columns = schema.event_column_count(),
            families = tables.len(),
            duration_ms = start.elapsed().as_millis(),
            "reshape complete"
        );
        Ok(tables)
    })?;
    report.reshaped = long_tables
        .iter()
        .map(|(family, table)| (family.to_string(), table.height()))
        .collect();

    let mut events = info_span!("events").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let (events, stages) =
            join_event_tables(long_tables, options.join_policy, options.allow_empty)?;
        debug!(
            rows = events.height(),
            stages = stages.len(),
            duration_ms = start.elapsed().as_millis(),
            "event join complete"
        );
        for stage in &stages {
            record_stage_warnings(&mut report, stage);
        }
        report.stages.extend(stages);
        Ok(events)
    })?;

    info_span!("aggregate").in_scope(|| -> Result<()> {
        let start = Instant::now();
        add_disclosure_totals(&mut events, options.missing_disclosure)?;
        debug!(
            rows = events.height(),
            duration_ms = start.elapsed().as_millis(),
            "disclosure totals complete"
        );
        Ok(())
    })?;

    let baseline =
        info_span!("traits").in_scope(|| select_baseline_traits(&traits, &TRAIT_COLUMNS))?;
    report.baseline_subjects = column_strings(&baseline.frame, ID)?
        .into_iter()
        .collect::<BTreeSet<_>>()
        .len();
    if !baseline.duplicate_ids.is_empty() {
        report.warnings.push(format!(
            "trait: several baseline rows for subject(s) {}",
            baseline.duplicate_ids.join(", ")
        ));
    }

    let merged = info_span!("merge").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let (merged, stages) = merge_subject_tables(&events, &baseline.frame, &network, options)?;
        debug!(
            rows = merged.height(),
            columns = merged.width(),
            duration_ms = start.elapsed().as_millis(),
            "subject join complete"
        );
        for stage in &stages {
            record_stage_warnings(&mut report, stage);
        }
        report.stages.extend(stages);
        Ok(merged)
    })?;

    if merged.height() == 0 {
        if !options.allow_empty {
            return Err(TransformError::EmptyResult);
        }
        warn!("merged table has no rows");
        report.warnings.push("merged table has no rows".to_string());
    }

    report.output_rows = merged.height();
    report.output_columns = merged.width();
    Ok((merged, report))
}

fn load_input(
    label: &'static str,
    path: &Path,
    required: &[&str],
    inputs: &mut Vec<InputSummary>,
) -> Result<DataFrame> {
    let df = read_csv_frame(path)?;
    require_columns(&df, path, required)?;
    inputs.push(InputSummary {
        label,
        path: path.to_path_buf(),
        rows: df.height(),
        columns: df.width(),
    });
    Ok(df)
}

/// Reads the three inputs named by `config`, merges them, and writes the
/// result to `config.output_path`.
pub fn run_merge(config: &MergeConfig) -> Result<MergeReport> {
    let run_span = info_span!(
        "merge_run",
        output = %config.output_path.display(),
        join = config.options.join_policy.as_str()
    );
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    let mut inputs = Vec::with_capacity(3);
    let (diary, traits, network) = info_span!("ingest").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let diary = load_input("diary", &config.diary_path, &DIARY_ID_COLUMNS, &mut inputs)?;
        let traits = load_input("trait", &config.trait_path, &[ID, TIME], &mut inputs)?;
        let network = load_input("network", &config.network_path, &[ID], &mut inputs)?;
        info!(
            diary_rows = diary.height(),
            trait_rows = traits.height(),
            network_rows = network.height(),
            duration_ms = start.elapsed().as_millis(),
            "ingest complete"
        );
        Ok((diary, traits, network))
    })?;

    let (merged, mut report) = merge_frames(&diary, &traits, &network, &config.options)?;
    report.inputs = inputs;

    info_span!("write").in_scope(|| -> Result<()> {
        let start = Instant::now();
        let rows = write_merged_csv(&merged, &config.output_path, config.options.include_index)?;
        info!(
            path = %config.output_path.display(),
            rows,
            duration_ms = start.elapsed().as_millis(),
            "output written"
        );
        Ok(())
    })?;

    for warning in &report.warnings {
        warn!("{warning}");
    }
    info!(
        output_rows = report.output_rows,
        output_columns = report.output_columns,
        warnings = report.warnings.len(),
        duration_ms = run_start.elapsed().as_millis(),
        "merge complete"
    );
    Ok(report)
}
