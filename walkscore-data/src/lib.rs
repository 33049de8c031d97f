//! Feature loading for the walkscore engine.
//!
//! Responsibilities:
//! - Decode the feature document produced by the upstream ETL stage.
//! - Preserve input order; it becomes the order of every score list.
//! - Tolerate missing measurements, reporting them instead of failing.
//!
//! Boundaries:
//! - Do not encode scoring rules (those live in `walkscore-core`).
//! - Validate structure only: the `features` sequence, each element's
//!   `attributes` object and its `IndexID`.
//!
//! # Examples
//! ```
//! use walkscore_data::features_from_reader;
//!
//! let json = br#"{"features": [{"attributes": {"IndexID": 7, "unadjusted_walkscore": 2.5}}]}"#;
//! let collection = features_from_reader(&json[..]).expect("valid document");
//! assert_eq!(collection.len(), 1);
//! assert_eq!(collection.report().missing("effective_slope"), 1);
//! ```

#![forbid(unsafe_code)]

use std::collections::{BTreeMap, HashSet};
use std::io::{BufReader, Read};

use camino::Utf8Path;
use log::{debug, info, warn};
use walkscore_core::{BASE_SCORE_ATTRIBUTE, Feature, FeatureId};
use walkscore_fs::open_utf8_file;

mod document;
mod error;

pub use error::{DocumentError, FeatureLoadError, SchemaError};

use document::RawDocument;

/// Summary of tolerated gaps in a feature document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    missing: BTreeMap<&'static str, usize>,
    duplicate_ids: Vec<FeatureId>,
}

impl LoadReport {
    /// Number of features lacking `attribute`.
    #[must_use]
    pub fn missing(&self, attribute: &str) -> usize {
        self.missing.get(attribute).copied().unwrap_or(0)
    }

    /// Attributes with at least one gap, with the number of affected features.
    pub fn missing_attributes(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.missing.iter().map(|(&attribute, &count)| (attribute, count))
    }

    /// Identifiers that appeared more than once, in order of repetition.
    #[must_use]
    pub const fn duplicate_ids(&self) -> &[FeatureId] {
        self.duplicate_ids.as_slice()
    }

    fn record(&mut self, feature: &Feature, seen: &mut HashSet<FeatureId>) {
        let missing = feature.missing_attributes();
        if !missing.is_empty() {
            debug!("feature {} lacks {}", feature.id, missing.join(", "));
        }
        for attribute in missing {
            *self.missing.entry(attribute).or_default() += 1;
        }
        if !seen.insert(feature.id.clone()) {
            self.duplicate_ids.push(feature.id.clone());
        }
    }

    fn log_summary(&self) {
        for (attribute, count) in self.missing_attributes() {
            if attribute == BASE_SCORE_ATTRIBUTE {
                warn!("{count} features lack {attribute}; their base score counts as 0");
            } else {
                warn!("{count} features lack {attribute}; its scaler is neutral for them");
            }
        }
        for id in &self.duplicate_ids {
            warn!("feature id {id} appears more than once");
        }
    }
}

/// Features in input order, with the gaps tolerated while loading them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    report: LoadReport,
}

impl FeatureCollection {
    /// Build a collection from already-decoded features.
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        let mut report = LoadReport::default();
        let mut seen = HashSet::with_capacity(features.len());
        for feature in &features {
            report.record(feature, &mut seen);
        }
        Self { features, report }
    }

    /// Features in input order.
    #[must_use]
    pub const fn features(&self) -> &[Feature] {
        self.features.as_slice()
    }

    /// Gaps found while loading.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Number of features.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.features.len()
    }

    /// Report whether the collection holds no features.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Find the first feature whose identifier renders as `id`.
    ///
    /// Numeric and string identifiers are matched on their display form, so
    /// `"7"` finds both `7` and `"7"`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Feature> {
        self.features
            .iter()
            .find(|feature| feature.id.to_string() == id)
    }
}

/// Decode a feature document from any reader.
///
/// # Errors
/// Returns [`DocumentError::Json`] for malformed JSON and
/// [`DocumentError::Schema`] when required structure is missing.
pub fn features_from_reader<R: Read>(reader: R) -> Result<FeatureCollection, DocumentError> {
    let document: RawDocument = serde_json::from_reader(reader)?;
    let raw_features = document.features.ok_or(SchemaError::MissingFeatures)?;
    let features = raw_features
        .into_iter()
        .enumerate()
        .map(|(index, raw)| raw.into_feature(index))
        .collect::<Result<Vec<_>, _>>()?;
    let collection = FeatureCollection::new(features);
    collection.report.log_summary();
    Ok(collection)
}

/// Load the feature document at `path`.
///
/// # Errors
/// Returns [`FeatureLoadError::Open`] when the file cannot be opened and
/// [`FeatureLoadError::Document`] when it cannot be decoded.
pub fn load_features(path: &Utf8Path) -> Result<FeatureCollection, FeatureLoadError> {
    let file = open_utf8_file(path).map_err(|source| FeatureLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let collection = features_from_reader(BufReader::new(file)).map_err(|source| {
        FeatureLoadError::Document {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!("Loaded {} features from {path}", collection.len());
    Ok(collection)
}

#[cfg(test)]
mod tests;
