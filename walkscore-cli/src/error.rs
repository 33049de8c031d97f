//! Error types emitted by the walkscore CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use walkscore_core::SliderError;
use walkscore_data::FeatureLoadError;
use walkscore_scorer::LookupError;

/// Errors emitted by the walkscore CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The chunk size must hold at least one combination.
    #[error("--chunk-size must be at least 1")]
    ZeroChunkSize,
    /// Curve sampling needs at least one point.
    #[error("--count must be at least 1")]
    ZeroSampleCount,
    /// A curve sampling bound is infinite or NaN.
    #[error("--{field} must be a finite number, got {value}")]
    NonFiniteBound { field: &'static str, value: f64 },
    /// Slider levels do not form a valid combination.
    #[error("invalid slider combination: {0}")]
    InvalidCombination(#[from] SliderError),
    /// The named dimension has no scaler.
    #[error("unknown dimension {name:?}")]
    UnknownDimension { name: String },
    /// Loading the feature document failed.
    #[error(transparent)]
    LoadFeatures(#[from] FeatureLoadError),
    /// Writing or reading the lookup table failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// The lookup table has no entry for the requested combination.
    #[error("lookup table {path} has no entry for {key}")]
    CombinationNotFound { key: String, path: Utf8PathBuf },
    /// The feature document has no feature with the requested identifier.
    #[error("feature document {path} has no feature with IndexID {id}")]
    UnknownFeature { id: String, path: Utf8PathBuf },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
