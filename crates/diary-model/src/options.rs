//! Configuration for a merge run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How unmatched rows are treated at each join stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinPolicy {
    /// Keep only rows whose key exists on both sides.
    #[default]
    Inner,
    /// Keep every left row; missing right values become null.
    Left,
}

impl JoinPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinPolicy::Inner => "inner",
            JoinPolicy::Left => "left",
        }
    }
}

/// Treatment of missing or non-numeric disclosure counts when summing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingDisclosure {
    /// Missing slots count as zero.
    #[default]
    Zero,
    /// Any missing slot makes `NumDrmTld` and `GotHelp` missing.
    Propagate,
}

/// Options controlling merge behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeOptions {
    /// Join semantics used by every join stage.
    pub join_policy: JoinPolicy,

    /// Missing-value handling for the disclosure sum.
    pub missing_disclosure: MissingDisclosure,

    /// Write a leading unnamed row-index column.
    ///
    /// Downstream analysis scripts written against earlier exports expect it.
    pub include_index: bool,

    /// Accept a join stage or final table with zero rows.
    ///
    /// When false, an empty join result from non-empty inputs is an error
    /// (usually mismatched subject id formats between files).
    pub allow_empty: bool,

    /// Fail instead of warning when trait or network data repeat a subject id.
    pub strict_keys: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            join_policy: JoinPolicy::Inner,
            missing_disclosure: MissingDisclosure::Zero,
            include_index: true,
            allow_empty: false,
            strict_keys: false,
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_join_policy(mut self, policy: JoinPolicy) -> Self {
        self.join_policy = policy;
        self
    }

    pub fn with_missing_disclosure(mut self, mode: MissingDisclosure) -> Self {
        self.missing_disclosure = mode;
        self
    }

    pub fn with_index(mut self, enable: bool) -> Self {
        self.include_index = enable;
        self
    }

    pub fn with_allow_empty(mut self, enable: bool) -> Self {
        self.allow_empty = enable;
        self
    }

    pub fn with_strict_keys(mut self, enable: bool) -> Self {
        self.strict_keys = enable;
        self
    }
}

/// Input and output locations plus options for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Wide daily-diary CSV.
    pub diary_path: PathBuf,
    /// Trait questionnaire CSV (all measurement occasions).
    pub trait_path: PathBuf,
    /// Per-subject network metrics CSV.
    pub network_path: PathBuf,
    /// Destination of the merged CSV.
    pub output_path: PathBuf,
    pub options: MergeOptions,
}

impl MergeConfig {
    pub fn new(
        diary_path: impl Into<PathBuf>,
        trait_path: impl Into<PathBuf>,
        network_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            diary_path: diary_path.into(),
            trait_path: trait_path.into(),
            network_path: network_path.into(),
            output_path: output_path.into(),
            options: MergeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }
}
