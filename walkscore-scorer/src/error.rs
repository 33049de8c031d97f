//! Error types raised while persisting or reading lookup tables.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use thiserror::Error;
use walkscore_core::{FeatureId, SliderCombination, SliderError};

/// Problems with the content of a lookup table document.
#[derive(Debug, Error)]
pub enum TableError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("failed to parse lookup table: {0}")]
    Json(#[from] serde_json::Error),
    /// A key is not the canonical rendering of a slider combination.
    #[error("lookup table key {key} is not a slider combination: {source}")]
    InvalidKey {
        /// Key as it appeared in the document.
        key: String,
        /// Reason the key was rejected.
        #[source]
        source: SliderError,
    },
    /// Two keys name the same combination.
    #[error("lookup table key {key} repeats combination {combination}")]
    DuplicateKey {
        /// Second key as it appeared in the document.
        key: String,
        /// Combination both keys parse to.
        combination: SliderCombination,
    },
    /// A computed score cannot be represented in JSON.
    #[error("score of feature {id} under {key} is not finite")]
    NonFiniteScore {
        /// Canonical key of the combination being written.
        key: String,
        /// Feature whose score overflowed or is NaN.
        id: FeatureId,
    },
}

/// Errors raised while writing or reading a lookup table artefact.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Creating the temporary artefact next to the target failed.
    #[error("failed to create lookup table at {path}: {source}")]
    Create {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Streaming scores into the temporary artefact failed.
    #[error("failed to write lookup table at {path}: {source}")]
    Write {
        /// Target file path.
        path: Utf8PathBuf,
        /// Serialisation, I/O or non-finite score failure.
        #[source]
        source: TableError,
    },
    /// Syncing or renaming the finished artefact into place failed.
    #[error("failed to persist lookup table at {path}: {source}")]
    Persist {
        /// Target file path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening an existing artefact failed.
    #[error("failed to open lookup table at {path}: {source}")]
    Open {
        /// Requested path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// An existing artefact could not be decoded.
    #[error("invalid lookup table at {path}: {source}")]
    Read {
        /// Artefact path.
        path: Utf8PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: TableError,
    },
}
