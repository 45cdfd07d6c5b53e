//! Reshape and merge of daily-diary, trait, and network survey tables.
//!
//! The pipeline runs in this order:
//!
//! 1. [`reshape`]: melt each diary variable family into a long table.
//! 2. [`events`]: join the long tables on `ID, Dorm, Day, Valence, EventNum`.
//! 3. [`disclosure`]: derive `NumDrmTld` and `GotHelp`.
//! 4. [`traits`]: keep baseline (`time == 0`) rows of the whitelisted traits.
//! 5. [`merge`]: join events with traits and network metrics on `ID`.
//! 6. [`writer`]: write the merged table as CSV.
//!
//! [`run_merge`] drives all of it from a [`diary_model::MergeConfig`];
//! [`merge_frames`] runs the in-memory stages on frames already loaded.

pub mod data_utils;
pub mod disclosure;
pub mod error;
pub mod events;
pub mod join;
pub mod keys;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod reshape;
pub mod traits;
pub mod writer;

pub use disclosure::add_disclosure_totals;
pub use error::{Result, TransformError};
pub use events::join_event_tables;
pub use join::{JoinSpec, join_frames};
pub use keys::normalize_subject_id;
pub use merge::merge_subject_tables;
pub use pipeline::{merge_frames, run_merge};
pub use report::{InputSummary, JoinStage, MergeReport};
pub use reshape::{melt_all, melt_family};
pub use traits::{BaselineTraits, select_baseline_traits};
pub use writer::write_merged_csv;
