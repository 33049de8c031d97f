//! Unit coverage for feature document decoding.
#![forbid(unsafe_code)]

use rstest::rstest;
use walkscore_core::{Dimension, FeatureId};

use crate::{DocumentError, SchemaError, features_from_reader};

fn decode(json: &str) -> Result<crate::FeatureCollection, DocumentError> {
    features_from_reader(json.as_bytes())
}

#[rstest]
fn preserves_input_order_and_values() {
    let json = r#"{
        "features": [
            {"attributes": {"IndexID": "B2", "unadjusted_walkscore": 3.0, "Max_Speed_Limit": 25}},
            {"attributes": {"IndexID": 11, "unadjusted_walkscore": 1.5, "effective_slope": 4.2}},
            {"attributes": {"IndexID": "A1", "unadjusted_walkscore": 0.0}}
        ]
    }"#;

    let collection = decode(json).expect("decode features");
    let ids: Vec<&FeatureId> = collection.features().iter().map(|f| &f.id).collect();

    assert_eq!(
        ids,
        vec![
            &FeatureId::from("B2"),
            &FeatureId::from(11_i64),
            &FeatureId::from("A1")
        ]
    );
    let second = collection.features().get(1).expect("second feature");
    assert_eq!(second.value(Dimension::Slope), Some(4.2));
    assert_eq!(second.unadjusted_walkscore, Some(1.5));
    let first = collection.features().first().expect("first feature");
    assert_eq!(first.value(Dimension::SpeedLimit), Some(25.0));
}

#[rstest]
#[case(r#"{}"#)]
#[case(r#"{"features": null}"#)]
#[case(r#"{"type": "FeatureCollection", "rows": []}"#)]
fn missing_features_key_is_a_schema_error(#[case] json: &str) {
    let err = decode(json).expect_err("document without features must fail");
    assert!(
        matches!(err, DocumentError::Schema(SchemaError::MissingFeatures)),
        "unexpected error {err:?}"
    );
}

#[rstest]
#[case(r#"{"features": [{"geometry": {}}]}"#, SchemaError::MissingAttributes { index: 0 })]
#[case(
    r#"{"features": [{"attributes": {"IndexID": 1}}, {"attributes": {}}]}"#,
    SchemaError::MissingIdentifier { index: 1 }
)]
#[case(
    r#"{"features": [{"attributes": {"IndexID": 1}}, {"attributes": {"IndexID": true}}]}"#,
    SchemaError::InvalidIdentifier { index: 1, raw: "true".to_owned() }
)]
fn malformed_features_report_their_position(#[case] json: &str, #[case] expected: SchemaError) {
    match decode(json) {
        Err(DocumentError::Schema(schema)) => assert_eq!(schema, expected),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[rstest]
#[case("101.0")]
#[case("18446744073709551615")]
#[case("-3")]
fn numeric_identifiers_are_kept_verbatim(#[case] raw: &str) {
    let json = format!(r#"{{"features": [{{"attributes": {{"IndexID": {raw}}}}}]}}"#);

    let collection = decode(&json).expect("any numeric identifier is accepted");
    let feature = collection.features().first().expect("one feature");

    assert_eq!(serde_json::to_string(&feature.id).expect("serialise id"), raw);
    assert_eq!(feature.id.to_string(), raw);
}

#[rstest]
fn null_and_non_numeric_values_become_absent() {
    let json = r#"{"features": [{"attributes": {
        "IndexID": 5,
        "unadjusted_walkscore": 2.0,
        "effective_slope": null,
        "business_density": "n/a",
        "crime_density_normalized": 0.4
    }}]}"#;

    let collection = decode(json).expect("decode features");
    let feature = collection.features().first().expect("one feature");

    assert_eq!(feature.value(Dimension::Slope), None);
    assert_eq!(feature.value(Dimension::BusinessDensity), None);
    assert_eq!(feature.value(Dimension::CrimeDensity), Some(0.4));
    let report = collection.report();
    assert_eq!(report.missing("effective_slope"), 1);
    assert_eq!(report.missing("business_density"), 1);
    assert_eq!(report.missing("crime_density_normalized"), 0);
    assert_eq!(report.missing("unadjusted_walkscore"), 0);
}

#[rstest]
fn duplicate_identifiers_are_reported_not_rejected() {
    let json = r#"{"features": [
        {"attributes": {"IndexID": 1}},
        {"attributes": {"IndexID": 2}},
        {"attributes": {"IndexID": 1}}
    ]}"#;

    let collection = decode(json).expect("duplicates are tolerated");

    assert_eq!(collection.len(), 3);
    assert_eq!(collection.report().duplicate_ids(), &[FeatureId::from(1_i64)]);
    assert_eq!(collection.report().missing("unadjusted_walkscore"), 3);
}

#[rstest]
fn invalid_json_is_reported_as_json_error() {
    let err = decode("{\"features\": [").expect_err("truncated document");
    assert!(matches!(err, DocumentError::Json(_)));
}

#[rstest]
#[case("7", Some(FeatureId::from(7_i64)))]
#[case("A1", Some(FeatureId::from("A1")))]
#[case("Z9", None)]
fn find_matches_rendered_identifiers(#[case] id: &str, #[case] expected: Option<FeatureId>) {
    let json = r#"{"features": [
        {"attributes": {"IndexID": "A1"}},
        {"attributes": {"IndexID": 7}}
    ]}"#;

    let collection = decode(json).expect("decode features");

    assert_eq!(collection.find(id).map(|feature| feature.id.clone()), expected);
}
