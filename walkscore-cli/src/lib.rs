//! Command-line interface for the walkscore precompute engine.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod curves;
mod error;
mod explain;
mod lookup;
mod precompute;

pub use error::CliError;

use curves::CurvesArgs;
use explain::ExplainArgs;
use lookup::LookupArgs;
use precompute::PrecomputeArgs;

pub(crate) const ARG_INPUT: &str = "input";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_CHUNK_SIZE: &str = "chunk-size";
pub(crate) const ARG_TABLE: &str = "table";
pub(crate) const ARG_SLOPE: &str = "slope";
pub(crate) const ARG_STREETS: &str = "streets";
pub(crate) const ARG_AMENITY: &str = "amenity";
pub(crate) const ARG_CRIME: &str = "crime";
pub(crate) const ARG_RANK_NORMALISE: &str = "rank-normalise";
pub(crate) const ARG_FEATURE_ID: &str = "feature-id";
pub(crate) const ARG_DIMENSION: &str = "dimension";
pub(crate) const ARG_START: &str = "start";
pub(crate) const ARG_END: &str = "end";
pub(crate) const ARG_COUNT: &str = "count";

pub(crate) const ENV_PRECOMPUTE_INPUT: &str = "WALKSCORE_CMDS_PRECOMPUTE_INPUT";
pub(crate) const ENV_LOOKUP_TABLE: &str = "WALKSCORE_CMDS_LOOKUP_TABLE";
pub(crate) const ENV_EXPLAIN_INPUT: &str = "WALKSCORE_CMDS_EXPLAIN_INPUT";
pub(crate) const ENV_EXPLAIN_FEATURE_ID: &str = "WALKSCORE_CMDS_EXPLAIN_FEATURE_ID";
pub(crate) const ENV_CURVES_DIMENSION: &str = "WALKSCORE_CMDS_CURVES_DIMENSION";

/// Environment variables naming each slider for one subcommand.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SliderEnv {
    pub(crate) slope: &'static str,
    pub(crate) streets: &'static str,
    pub(crate) amenity: &'static str,
    pub(crate) crime: &'static str,
}

pub(crate) const LOOKUP_SLIDER_ENV: SliderEnv = SliderEnv {
    slope: "WALKSCORE_CMDS_LOOKUP_SLOPE",
    streets: "WALKSCORE_CMDS_LOOKUP_STREETS",
    amenity: "WALKSCORE_CMDS_LOOKUP_AMENITY",
    crime: "WALKSCORE_CMDS_LOOKUP_CRIME",
};

pub(crate) const EXPLAIN_SLIDER_ENV: SliderEnv = SliderEnv {
    slope: "WALKSCORE_CMDS_EXPLAIN_SLOPE",
    streets: "WALKSCORE_CMDS_EXPLAIN_STREETS",
    amenity: "WALKSCORE_CMDS_EXPLAIN_AMENITY",
    crime: "WALKSCORE_CMDS_EXPLAIN_CRIME",
};

/// Run the walkscore CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Precompute(args) => precompute::run_precompute(args, writer),
        Command::Lookup(args) => lookup::run_lookup(args, writer),
        Command::Explain(args) => explain::run_explain(args, writer),
        Command::Curves(args) => curves::run_curves(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "walkscore",
    about = "Precompute and query personalised walkability scores",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score every slider combination and persist the lookup table.
    Precompute(PrecomputeArgs),
    /// Print the scores stored for one slider combination.
    Lookup(LookupArgs),
    /// Print every factor behind one feature's score.
    Explain(ExplainArgs),
    /// Print sampled scaler curves for one dimension.
    Curves(CurvesArgs),
}

pub(crate) fn required<T>(
    value: Option<T>,
    field: &'static str,
    env: &'static str,
) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match walkscore_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
