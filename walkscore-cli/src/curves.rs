//! Curves command implementation for the walkscore CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use walkscore_core::Dimension;

use crate::{
    ARG_COUNT, ARG_DIMENSION, ARG_END, ARG_START, CliError, ENV_CURVES_DIMENSION, required,
    write_json,
};

/// CLI arguments for the `curves` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "curves",
    long_about = "Sample the response curve of one scaler dimension at every \
                 importance level. Without explicit bounds the sample covers \
                 the range the curve's breakpoints span.",
    about = "Sample scaler curves for charting"
)]
#[ortho_config(prefix = "WALKSCORE")]
pub(crate) struct CurvesArgs {
    /// Dimension to sample (slope, speed_limit, business_density,
    /// crime_density or crash_density).
    #[arg(long = ARG_DIMENSION, value_name = "name")]
    #[serde(default)]
    pub(crate) dimension: Option<String>,
    /// First sampled value.
    #[arg(long = ARG_START, value_name = "x", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) start: Option<f64>,
    /// Last sampled value.
    #[arg(long = ARG_END, value_name = "x", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) end: Option<f64>,
    /// Number of evenly spaced samples.
    #[arg(long = ARG_COUNT, value_name = "n")]
    #[serde(default)]
    pub(crate) count: Option<usize>,
}

impl CurvesArgs {
    pub(crate) fn into_config(self) -> Result<CurvesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        CurvesConfig::try_from(merged)
    }
}

/// Resolved `curves` command configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CurvesConfig {
    pub(crate) dimension: Dimension,
    pub(crate) start: f64,
    pub(crate) end: f64,
    pub(crate) count: usize,
}

/// Default `(start, end, count)` covering every breakpoint of `dimension`.
const fn default_window(dimension: Dimension) -> (f64, f64, usize) {
    match dimension {
        Dimension::Slope => (0.0, 30.0, 61),
        Dimension::SpeedLimit => (0.0, 60.0, 61),
        Dimension::BusinessDensity => (0.0, 6.0, 61),
        Dimension::CrimeDensity | Dimension::CrashDensity => (0.0, 3.5, 71),
    }
}

impl TryFrom<CurvesArgs> for CurvesConfig {
    type Error = CliError;

    fn try_from(args: CurvesArgs) -> Result<Self, Self::Error> {
        let name = required(args.dimension, ARG_DIMENSION, ENV_CURVES_DIMENSION)?;
        let dimension: Dimension = name
            .parse()
            .map_err(|_| CliError::UnknownDimension { name: name.clone() })?;
        let (start, end, count) = default_window(dimension);
        let count = args.count.unwrap_or(count);
        if count == 0 {
            return Err(CliError::ZeroSampleCount);
        }
        Ok(Self {
            dimension,
            start: finite_bound(args.start.unwrap_or(start), ARG_START)?,
            end: finite_bound(args.end.unwrap_or(end), ARG_END)?,
            count,
        })
    }
}

fn finite_bound(value: f64, field: &'static str) -> Result<f64, CliError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CliError::NonFiniteBound { field, value })
    }
}

#[derive(Debug, Serialize)]
struct CurvePoint {
    value: f64,
    factor: f64,
}

#[derive(Debug, Serialize)]
struct CurveLevel {
    importance: i32,
    points: Vec<CurvePoint>,
}

#[derive(Debug, Serialize)]
struct CurveReport {
    dimension: &'static str,
    attribute: &'static str,
    levels: Vec<CurveLevel>,
}

fn sample_report(config: &CurvesConfig) -> CurveReport {
    let levels = config
        .dimension
        .sample(config.start, config.end, config.count)
        .into_iter()
        .map(|(importance, points)| CurveLevel {
            importance,
            points: points
                .into_iter()
                .map(|(value, factor)| CurvePoint { value, factor })
                .collect(),
        })
        .collect();
    CurveReport {
        dimension: config.dimension.as_str(),
        attribute: config.dimension.attribute(),
        levels,
    }
}

pub(crate) fn run_curves(args: CurvesArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    write_json(writer, &sample_report(&config))
}
