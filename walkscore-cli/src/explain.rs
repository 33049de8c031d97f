//! Explain command implementation for the walkscore CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use walkscore_core::SliderCombination;
use walkscore_data::load_features;
use walkscore_scorer::ScoreBreakdown;

use crate::lookup::combination_from_levels;
use crate::{
    ARG_AMENITY, ARG_CRIME, ARG_FEATURE_ID, ARG_INPUT, ARG_SLOPE, ARG_STREETS, CliError,
    ENV_EXPLAIN_FEATURE_ID, ENV_EXPLAIN_INPUT, EXPLAIN_SLIDER_ENV, require_existing, required,
    write_json,
};

/// CLI arguments for the `explain` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "explain",
    long_about = "Score a single feature from the feature document and print \
                 each scale factor that contributed to the result.",
    about = "Break down one feature's personalised score"
)]
#[ortho_config(prefix = "WALKSCORE")]
pub(crate) struct ExplainArgs {
    /// Path to the feature document.
    #[arg(long = ARG_INPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// `IndexID` of the feature to explain.
    #[arg(long = ARG_FEATURE_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) feature_id: Option<String>,
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
}

impl ExplainArgs {
    pub(crate) fn into_config(self) -> Result<ExplainConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExplainConfig::try_from(merged)
    }
}

/// Resolved `explain` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExplainConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) feature_id: String,
    pub(crate) combination: SliderCombination,
}

impl TryFrom<ExplainArgs> for ExplainConfig {
    type Error = CliError;

    fn try_from(args: ExplainArgs) -> Result<Self, Self::Error> {
        let input = required(args.input, ARG_INPUT, ENV_EXPLAIN_INPUT)?;
        let feature_id = required(args.feature_id, ARG_FEATURE_ID, ENV_EXPLAIN_FEATURE_ID)?;
        let combination = combination_from_levels(
            [args.slope, args.streets, args.amenity, args.crime],
            EXPLAIN_SLIDER_ENV,
        )?;
        Ok(Self {
            input,
            feature_id,
            combination,
        })
    }
}

pub(crate) fn run_explain(args: ExplainArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.input, ARG_INPUT)?;
    let features = load_features(&config.input)?;
    let feature = features
        .find(&config.feature_id)
        .ok_or_else(|| CliError::UnknownFeature {
            id: config.feature_id.clone(),
            path: config.input.clone(),
        })?;
    write_json(writer, &ScoreBreakdown::new(feature, &config.combination))
}
