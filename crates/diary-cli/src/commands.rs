//! Translation of parsed arguments into a merge run.

use anyhow::{Context, Result};
use diary_model::{MergeConfig, MergeOptions};
use diary_transform::{MergeReport, run_merge};
use tracing::info;

use crate::cli::Cli;

/// Builds the run configuration from command-line arguments.
pub fn merge_config_from_cli(cli: &Cli) -> MergeConfig {
    let options = MergeOptions::new()
        .with_join_policy(cli.join.into())
        .with_missing_disclosure(cli.missing_disclosure.into())
        .with_index(!cli.no_index)
        .with_allow_empty(cli.allow_empty)
        .with_strict_keys(cli.strict_keys);
    MergeConfig::new(&cli.diary, &cli.traits, &cli.network, &cli.output).with_options(options)
}

pub fn run_command(cli: &Cli) -> Result<MergeReport> {
    let config = merge_config_from_cli(cli);
    info!(
        diary = %config.diary_path.display(),
        traits = %config.trait_path.display(),
        network = %config.network_path.display(),
        output = %config.output_path.display(),
        "starting merge"
    );
    run_merge(&config).with_context(|| format!("merge into {}", config.output_path.display()))
}
