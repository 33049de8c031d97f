//! Serde mirror of the feature document and its conversion into
//! [`Feature`] records.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use walkscore_core::{Feature, FeatureId};

use crate::SchemaError;

#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub(crate) features: Option<Vec<RawFeature>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    attributes: Option<RawAttributes>,
}

#[derive(Debug, Deserialize)]
struct RawAttributes {
    #[serde(rename = "IndexID", default)]
    index_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_number")]
    unadjusted_walkscore: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    effective_slope: Option<f64>,
    #[serde(rename = "Max_Speed_Limit", default, deserialize_with = "lenient_number")]
    max_speed_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    business_density: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    crime_density_normalized: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    crash_density_normalized: Option<f64>,
}

/// Accept any JSON value, keeping numbers and treating everything else as
/// absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

impl RawFeature {
    pub(crate) fn into_feature(self, index: usize) -> Result<Feature, SchemaError> {
        let attributes = self
            .attributes
            .ok_or(SchemaError::MissingAttributes { index })?;
        let id = match attributes.index_id {
            None | Some(Value::Null) => return Err(SchemaError::MissingIdentifier { index }),
            Some(raw) => parse_identifier(raw, index)?,
        };
        Ok(Feature {
            id,
            unadjusted_walkscore: attributes.unadjusted_walkscore,
            effective_slope: attributes.effective_slope,
            max_speed_limit: attributes.max_speed_limit,
            business_density: attributes.business_density,
            crime_density_normalized: attributes.crime_density_normalized,
            crash_density_normalized: attributes.crash_density_normalized,
        })
    }
}

fn parse_identifier(raw: Value, index: usize) -> Result<FeatureId, SchemaError> {
    match raw {
        Value::String(text) => Ok(FeatureId::Text(text)),
        Value::Number(number) => Ok(FeatureId::Number(number)),
        other => Err(SchemaError::InvalidIdentifier {
            index,
            raw: other.to_string(),
        }),
    }
}
