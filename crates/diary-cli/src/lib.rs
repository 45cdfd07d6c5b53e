//! CLI library components for `dd-trait-merge`.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
