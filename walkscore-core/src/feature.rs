//! Spatial cells and their raw measurements.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Dimension;

/// Attribute name holding the feature identifier.
pub const ID_ATTRIBUTE: &str = "IndexID";
/// Attribute name holding the base score.
pub const BASE_SCORE_ATTRIBUTE: &str = "unadjusted_walkscore";

/// Stable identifier of a feature, echoed verbatim into the lookup table.
///
/// Identifiers may be numbers or strings in the source document. Numbers
/// keep their JSON form, so `101.0` and `18446744073709551615` are written
/// back exactly as read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    /// Numeric identifier.
    Number(serde_json::Number),
    /// Textual identifier.
    Text(String),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for FeatureId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<serde_json::Number> for FeatureId {
    fn from(value: serde_json::Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FeatureId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// One spatial cell with its base score and raw dimension values.
///
/// Absent values are kept as `None`; the scalers treat them as neutral.
///
/// # Examples
/// ```
/// use walkscore_core::{Dimension, Feature};
///
/// let feature = Feature::new("A1")
///     .with_base_score(10.0)
///     .with_value(Dimension::Slope, 1.0);
/// assert_eq!(feature.value(Dimension::Slope), Some(1.0));
/// assert_eq!(feature.value(Dimension::CrimeDensity), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Identifier, unique across the dataset.
    pub id: FeatureId,
    /// Base score from the upstream ETL stage.
    pub unadjusted_walkscore: Option<f64>,
    /// Effective slope of the cell.
    pub effective_slope: Option<f64>,
    /// Highest posted speed limit in the cell.
    pub max_speed_limit: Option<f64>,
    /// Normalised business density.
    pub business_density: Option<f64>,
    /// Normalised crime density.
    pub crime_density_normalized: Option<f64>,
    /// Normalised crash density.
    pub crash_density_normalized: Option<f64>,
}

impl Feature {
    /// Feature with no measurements.
    #[must_use]
    pub fn new(id: impl Into<FeatureId>) -> Self {
        Self {
            id: id.into(),
            unadjusted_walkscore: None,
            effective_slope: None,
            max_speed_limit: None,
            business_density: None,
            crime_density_normalized: None,
            crash_density_normalized: None,
        }
    }

    /// Set the base score while returning `self` for chaining.
    #[must_use]
    pub const fn with_base_score(mut self, score: f64) -> Self {
        self.unadjusted_walkscore = Some(score);
        self
    }

    /// Set a raw dimension value while returning `self` for chaining.
    #[must_use]
    pub const fn with_value(mut self, dimension: Dimension, value: f64) -> Self {
        *self.value_mut(dimension) = Some(value);
        self
    }

    /// Raw value recorded for `dimension`.
    #[must_use]
    pub const fn value(&self, dimension: Dimension) -> Option<f64> {
        match dimension {
            Dimension::Slope => self.effective_slope,
            Dimension::SpeedLimit => self.max_speed_limit,
            Dimension::BusinessDensity => self.business_density,
            Dimension::CrimeDensity => self.crime_density_normalized,
            Dimension::CrashDensity => self.crash_density_normalized,
        }
    }

    const fn value_mut(&mut self, dimension: Dimension) -> &mut Option<f64> {
        match dimension {
            Dimension::Slope => &mut self.effective_slope,
            Dimension::SpeedLimit => &mut self.max_speed_limit,
            Dimension::BusinessDensity => &mut self.business_density,
            Dimension::CrimeDensity => &mut self.crime_density_normalized,
            Dimension::CrashDensity => &mut self.crash_density_normalized,
        }
    }

    /// Base score, with an absent score counting as zero.
    #[must_use]
    pub fn base_score(&self) -> f64 {
        self.unadjusted_walkscore.unwrap_or(0.0)
    }

    /// Attribute names of every absent measurement, base score included.
    #[must_use]
    pub fn missing_attributes(&self) -> Vec<&'static str> {
        let base = self
            .unadjusted_walkscore
            .is_none()
            .then_some(BASE_SCORE_ATTRIBUTE);
        base.into_iter()
            .chain(
                Dimension::ALL
                    .into_iter()
                    .filter(|&dimension| self.value(dimension).is_none())
                    .map(Dimension::attribute),
            )
            .collect()
    }
}
