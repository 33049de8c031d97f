//! Precompute command implementation for the walkscore CLI.

use std::collections::BTreeMap;
use std::io::Write;
use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use walkscore_core::SliderRanges;
use walkscore_data::load_features;
use walkscore_scorer::{PrecomputeEngine, PrecomputeOptions, write_lookup_table};

use crate::{
    ARG_CHUNK_SIZE, ARG_INPUT, ARG_OUTPUT, CliError, ENV_PRECOMPUTE_INPUT, require_existing,
    required, write_json,
};

/// File name of the lookup table when no output path is given.
pub(crate) const DEFAULT_OUTPUT_FILE: &str = "walkscore_combinations.json";

/// CLI arguments for the `precompute` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "precompute",
    long_about = "Score every feature under every slider combination and \
                 write the lookup table atomically. Paths can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Build the personalised walkscore lookup table"
)]
#[ortho_config(prefix = "WALKSCORE")]
pub(crate) struct PrecomputeArgs {
    /// Path to the feature document produced by the ETL stage.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Path of the lookup table (defaults next to the input).
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Number of combinations scored in parallel before being written.
    #[arg(long = ARG_CHUNK_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) chunk_size: Option<usize>,
}

impl PrecomputeArgs {
    pub(crate) fn into_config(self) -> Result<PrecomputeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PrecomputeConfig::try_from(merged)
    }
}

/// Resolved `precompute` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PrecomputeConfig {
    /// Feature document to score.
    pub(crate) input: Utf8PathBuf,
    /// Destination of the lookup table.
    pub(crate) output: Utf8PathBuf,
    /// Engine tuning.
    pub(crate) options: PrecomputeOptions,
}

impl PrecomputeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.input, ARG_INPUT)
    }
}

impl TryFrom<PrecomputeArgs> for PrecomputeConfig {
    type Error = CliError;

    fn try_from(args: PrecomputeArgs) -> Result<Self, Self::Error> {
        let input = required(args.input, ARG_INPUT, ENV_PRECOMPUTE_INPUT)?;
        let output = args.output.unwrap_or_else(|| default_output(&input));
        let options = match args.chunk_size {
            None => PrecomputeOptions::default(),
            Some(size) => PrecomputeOptions {
                chunk_size: NonZeroUsize::new(size).ok_or(CliError::ZeroChunkSize)?,
            },
        };
        Ok(Self {
            input,
            output,
            options,
        })
    }
}

fn default_output(input: &Utf8Path) -> Utf8PathBuf {
    input
        .parent()
        .map_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_FILE), |dir| {
            dir.join(DEFAULT_OUTPUT_FILE)
        })
}

/// Summary printed once the table is persisted.
#[derive(Debug, Serialize)]
struct PrecomputeReport {
    output: Utf8PathBuf,
    combinations: usize,
    features: usize,
    missing_attributes: BTreeMap<&'static str, usize>,
    duplicate_ids: usize,
}

pub(crate) fn run_precompute(args: PrecomputeArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_precompute_config(args)?;
    let features = load_features(&config.input)?;
    let engine = PrecomputeEngine::new(features.features());
    let summary = write_lookup_table(
        &engine,
        &SliderRanges::new(),
        &config.output,
        config.options,
    )?;
    info!(
        "Walkscore combinations saved to {} ({} combinations, {} features)",
        summary.output, summary.combinations, summary.features
    );
    let report = PrecomputeReport {
        output: summary.output,
        combinations: summary.combinations,
        features: summary.features,
        missing_attributes: features.report().missing_attributes().collect(),
        duplicate_ids: features.report().duplicate_ids().len(),
    };
    write_json(writer, &report)
}

fn resolve_precompute_config(args: PrecomputeArgs) -> Result<PrecomputeConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PrecomputeConfig, CliError> {
    let merged = PrecomputeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PrecomputeConfig::try_from(merged)
}
