//! Lookup command implementation for the walkscore CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use walkscore_core::SliderCombination;
use walkscore_scorer::{rank_normalise, read_lookup_table};

use crate::{
    ARG_AMENITY, ARG_CRIME, ARG_RANK_NORMALISE, ARG_SLOPE, ARG_STREETS, ARG_TABLE, CliError,
    ENV_LOOKUP_TABLE, LOOKUP_SLIDER_ENV, SliderEnv, require_existing, required, write_json,
};

/// CLI arguments for the `lookup` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "lookup",
    long_about = "Read a precomputed lookup table and print the scores for \
                 one slider combination, in feature order.",
    about = "Query the lookup table for one slider combination"
)]
#[ortho_config(prefix = "WALKSCORE")]
pub(crate) struct LookupArgs {
    /// Path to the lookup table written by `precompute`.
    #[arg(long = ARG_TABLE, value_name = "path")]
    #[serde(default)]
    pub(crate) table: Option<Utf8PathBuf>,
    /// Importance of gentle terrain (0-4).
    #[arg(long = ARG_SLOPE, value_name = "level")]
    #[serde(default)]
    pub(crate) slope: Option<u8>,
    /// Importance of calm, safe streets (0-4).
    #[arg(long = ARG_STREETS, value_name = "level")]
    #[serde(default)]
    pub(crate) streets: Option<u8>,
    /// Importance of nearby businesses (0-4).
    #[arg(long = ARG_AMENITY, value_name = "level")]
    #[serde(default)]
    pub(crate) amenity: Option<u8>,
    /// Importance of low crime (0-4).
    #[arg(long = ARG_CRIME, value_name = "level")]
    #[serde(default)]
    pub(crate) crime: Option<u8>,
    /// Replace scores with their dense rank scaled onto 0-5.
    #[arg(long = ARG_RANK_NORMALISE)]
    #[serde(default)]
    pub(crate) rank_normalise: bool,
}

impl LookupArgs {
    pub(crate) fn into_config(self) -> Result<LookupConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        LookupConfig::try_from(merged)
    }
}

/// Resolved `lookup` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LookupConfig {
    pub(crate) table: Utf8PathBuf,
    pub(crate) combination: SliderCombination,
    pub(crate) rank_normalise: bool,
}

impl TryFrom<LookupArgs> for LookupConfig {
    type Error = CliError;

    fn try_from(args: LookupArgs) -> Result<Self, Self::Error> {
        let table = required(args.table, ARG_TABLE, ENV_LOOKUP_TABLE)?;
        let combination = combination_from_levels(
            [args.slope, args.streets, args.amenity, args.crime],
            LOOKUP_SLIDER_ENV,
        )?;
        Ok(Self {
            table,
            combination,
            rank_normalise: args.rank_normalise,
        })
    }
}

/// Build a validated combination from optional slider levels.
pub(crate) fn combination_from_levels(
    [slope, streets, amenity, crime]: [Option<u8>; 4],
    env: SliderEnv,
) -> Result<SliderCombination, CliError> {
    let combination = SliderCombination::new(
        required(slope, ARG_SLOPE, env.slope)?,
        required(streets, ARG_STREETS, env.streets)?,
        required(amenity, ARG_AMENITY, env.amenity)?,
        required(crime, ARG_CRIME, env.crime)?,
    )?;
    Ok(combination)
}

pub(crate) fn run_lookup(args: LookupArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.table, ARG_TABLE)?;
    let table = read_lookup_table(&config.table)?;
    let scores =
        table
            .scores_for(&config.combination)
            .ok_or_else(|| CliError::CombinationNotFound {
                key: config.combination.canonical_key(),
                path: config.table.clone(),
            })?;
    if config.rank_normalise {
        write_json(writer, &rank_normalise(scores))
    } else {
        write_json(writer, scores)
    }
}
