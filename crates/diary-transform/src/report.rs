//! Row-count diagnostics collected while merging.

use std::path::PathBuf;

use diary_model::JoinPolicy;

/// Row counts of one loaded input file.
#[derive(Debug, Clone)]
pub struct InputSummary {
    pub label: &'static str,
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Outcome of one join stage.
#[derive(Debug, Clone)]
pub struct JoinStage {
    pub name: String,
    pub policy: JoinPolicy,
    pub left_rows: usize,
    pub right_rows: usize,
    pub output_rows: usize,
    /// Keys appearing more than once on the right side.
    pub duplicate_right_keys: Vec<String>,
    /// Left rows whose key is one of `duplicate_right_keys`.
    pub fanned_rows: usize,
}

impl JoinStage {
    /// Left rows without a partner (zero for left joins without fan-out).
    pub fn dropped_rows(&self) -> usize {
        self.left_rows.saturating_sub(self.output_rows)
    }

    /// True when repeated right keys multiplied at least one left row.
    pub fn fanned_out(&self) -> bool {
        self.fanned_rows > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub inputs: Vec<InputSummary>,
    /// Long rows produced per variable family.
    pub reshaped: Vec<(String, usize)>,
    pub stages: Vec<JoinStage>,
    pub baseline_subjects: usize,
    pub output_rows: usize,
    pub output_columns: usize,
    pub warnings: Vec<String>,
}

impl MergeReport {
    pub fn stage(&self, name: &str) -> Option<&JoinStage> {
        self.stages.iter().find(|stage| stage.name == name)
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(left: usize, output: usize, fanned: usize) -> JoinStage {
        JoinStage {
            name: "network".into(),
            policy: JoinPolicy::Inner,
            left_rows: left,
            right_rows: 3,
            output_rows: output,
            duplicate_right_keys: if fanned > 0 { vec!["7".into()] } else { Vec::new() },
            fanned_rows: fanned,
        }
    }

    #[test]
    fn dropped_rows_never_underflow() {
        assert_eq!(stage(4, 2, 0).dropped_rows(), 2);
        assert_eq!(stage(4, 6, 2).dropped_rows(), 0);
    }

    #[test]
    fn fan_out_follows_matched_duplicates() {
        assert!(stage(4, 6, 2).fanned_out());
        assert!(!stage(4, 4, 0).fanned_out());
    }
}
