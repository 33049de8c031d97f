//! Error types raised while loading feature collections.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Structural problems with a feature document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The top-level `features` key is absent or null.
    #[error("document has no top-level `features` sequence")]
    MissingFeatures,
    /// A feature has no `attributes` object.
    #[error("feature {index} has no `attributes` object")]
    MissingAttributes {
        /// Position of the feature in the input sequence.
        index: usize,
    },
    /// A feature's attributes lack an identifier.
    #[error("feature {index} has no `IndexID` attribute")]
    MissingIdentifier {
        /// Position of the feature in the input sequence.
        index: usize,
    },
    /// A feature's identifier is neither a number nor a string.
    #[error("feature {index} has an unsupported `IndexID` value {raw}")]
    InvalidIdentifier {
        /// Position of the feature in the input sequence.
        index: usize,
        /// Identifier as it appeared in the document.
        raw: String,
    },
}

/// Errors raised while decoding a feature document from a reader.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("failed to parse feature document: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but lacks required structure.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors raised while loading features from disk.
#[derive(Debug, Error)]
pub enum FeatureLoadError {
    /// Opening the input file failed.
    #[error("failed to open feature document at {path}: {source}")]
    Open {
        /// Requested input path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Decoding the input file failed.
    #[error("invalid feature document at {path}: {source}")]
    Document {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying decoding failure.
        #[source]
        source: DocumentError,
    },
}

impl FeatureLoadError {
    /// Structural error behind this failure, if any.
    #[must_use]
    pub const fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::Document {
                source: DocumentError::Schema(schema),
                ..
            } => Some(schema),
            _ => None,
        }
    }
}
