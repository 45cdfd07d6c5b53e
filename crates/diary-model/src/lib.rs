//! Data model for the daily-diary / trait / network merge.

pub mod columns;
pub mod options;
pub mod schema;
pub mod traits;

pub use options::{JoinPolicy, MergeConfig, MergeOptions, MissingDisclosure};
pub use schema::{DiarySchema, EventColumn, Valence, VariableFamily, normalize_valence};
pub use traits::{BASELINE_TIME, TRAIT_COLUMNS};
