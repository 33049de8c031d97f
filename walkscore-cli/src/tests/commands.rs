//! End-to-end command runs writing into an in-memory buffer.

use super::helpers::{Workspace, output_json};
use super::*;
use crate::curves::CurvesArgs;
use crate::explain::ExplainArgs;
use crate::lookup::LookupArgs;
use crate::precompute::PrecomputeArgs;
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn precomputed() -> Workspace {
    let workspace = Workspace::new();
    let mut sink = Vec::new();
    run_command(
        Command::Precompute(PrecomputeArgs {
            input: Some(workspace.input()),
            ..PrecomputeArgs::default()
        }),
        &mut sink,
    )
    .expect("precompute should succeed");
    workspace
}

fn lookup(workspace: &Workspace, levels: [u8; 4], rank_normalise: bool) -> Result<Value, CliError> {
    let [slope, streets, amenity, crime] = levels;
    let mut sink = Vec::new();
    run_command(
        Command::Lookup(LookupArgs {
            table: Some(workspace.table()),
            slope: Some(slope),
            streets: Some(streets),
            amenity: Some(amenity),
            crime: Some(crime),
            rank_normalise,
        }),
        &mut sink,
    )?;
    Ok(output_json(&sink))
}

fn scores(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .expect("lookup output should be an array")
        .iter()
        .map(|entry| {
            entry["personalized_walkscore"]
                .as_f64()
                .expect("score should be numeric")
        })
        .collect()
}

#[rstest]
fn precompute_reports_table_summary() {
    let workspace = Workspace::new();
    let mut sink = Vec::new();

    run_command(
        Command::Precompute(PrecomputeArgs {
            input: Some(workspace.input()),
            chunk_size: Some(3),
            ..PrecomputeArgs::default()
        }),
        &mut sink,
    )
    .expect("precompute should succeed");

    let report = output_json(&sink);
    assert_eq!(report["combinations"], 625);
    assert_eq!(report["features"], 2);
    assert_eq!(report["output"], workspace.table().as_str());
    assert_eq!(report["missing_attributes"]["effective_slope"], 1);
    assert!(workspace.table().exists());
}

#[rstest]
fn precompute_fails_for_missing_input() {
    let workspace = Workspace::new();
    let mut sink = Vec::new();

    let err = run_command(
        Command::Precompute(PrecomputeArgs {
            input: Some(workspace.root().join("absent.json")),
            ..PrecomputeArgs::default()
        }),
        &mut sink,
    )
    .expect_err("missing input should fail");

    assert!(matches!(err, CliError::MissingSourceFile { .. }), "{err:?}");
    assert!(!workspace.table().exists());
    assert!(sink.is_empty());
}

#[rstest]
fn precompute_surfaces_schema_errors() {
    let workspace = Workspace::new();
    let input = workspace.root().join("no-features.json");
    std::fs::write(input.as_std_path(), br#"{"rows": []}"#).expect("write document");
    let mut sink = Vec::new();

    let err = run_command(
        Command::Precompute(PrecomputeArgs {
            input: Some(input),
            ..PrecomputeArgs::default()
        }),
        &mut sink,
    )
    .expect_err("document without features must fail");

    match &err {
        CliError::LoadFeatures(load) => assert_eq!(
            load.schema_error(),
            Some(&walkscore_data::SchemaError::MissingFeatures)
        ),
        other => panic!("expected LoadFeatures, found {other:?}"),
    }
    let message = err.to_string();
    assert!(
        message.contains("document has no top-level `features` sequence"),
        "message should name the schema problem: {message}"
    );
    assert!(!workspace.table().exists());
}

#[rstest]
fn lookup_prints_scores_in_feature_order(precomputed: Workspace) {
    let value = lookup(&precomputed, [0, 0, 0, 0], false).expect("lookup should succeed");

    assert_eq!(value[0]["IndexID"], "A1");
    assert_eq!(value[1]["IndexID"], 7);
    assert_eq!(scores(&value), vec![10.001, 2.001]);
}

#[rstest]
fn lookup_rank_normalises_on_request(precomputed: Workspace) {
    let value = lookup(&precomputed, [0, 0, 0, 0], true).expect("lookup should succeed");

    assert_eq!(scores(&value), vec![5.0, 0.0]);
}

#[rstest]
fn lookup_reports_absent_combination(precomputed: Workspace) {
    let mut sink = Vec::new();
    let partial = precomputed.root().join("partial.json");
    std::fs::write(
        partial.as_std_path(),
        br#"{"{\"slope\": 0, \"streets\": 0, \"amenity\": 0, \"crime\": 0}": []}"#,
    )
    .expect("write partial table");

    let err = run_command(
        Command::Lookup(LookupArgs {
            table: Some(partial),
            slope: Some(4),
            streets: Some(4),
            amenity: Some(4),
            crime: Some(4),
            rank_normalise: false,
        }),
        &mut sink,
    )
    .expect_err("combination is absent");

    match err {
        CliError::CombinationNotFound { key, .. } => assert_eq!(
            key,
            r#"{"slope": 4, "streets": 4, "amenity": 4, "crime": 4}"#
        ),
        other => panic!("expected CombinationNotFound, found {other:?}"),
    }
}

#[rstest]
fn explain_prints_every_factor() {
    let workspace = Workspace::new();
    let mut sink = Vec::new();

    run_command(
        Command::Explain(ExplainArgs {
            input: Some(workspace.input()),
            feature_id: Some("A1".to_owned()),
            slope: Some(1),
            streets: Some(1),
            amenity: Some(1),
            crime: Some(1),
        }),
        &mut sink,
    )
    .expect("explain should succeed");

    let breakdown = output_json(&sink);
    assert_eq!(breakdown["IndexID"], "A1");
    assert_eq!(breakdown["unadjusted_walkscore"], 10.0);
    assert_eq!(breakdown["personalized_walkscore"], 9.801);
}

#[rstest]
fn explain_rejects_unknown_feature() {
    let workspace = Workspace::new();
    let mut sink = Vec::new();

    let err = run_command(
        Command::Explain(ExplainArgs {
            input: Some(workspace.input()),
            feature_id: Some("Z9".to_owned()),
            slope: Some(0),
            streets: Some(0),
            amenity: Some(0),
            crime: Some(0),
        }),
        &mut sink,
    )
    .expect_err("feature is absent");

    match err {
        CliError::UnknownFeature { id, .. } => assert_eq!(id, "Z9"),
        other => panic!("expected UnknownFeature, found {other:?}"),
    }
}

#[rstest]
fn curves_samples_every_importance_level() {
    let mut sink = Vec::new();

    run_command(
        Command::Curves(CurvesArgs {
            dimension: Some("business_density".to_owned()),
            start: Some(0.0),
            end: Some(6.0),
            count: Some(4),
        }),
        &mut sink,
    )
    .expect("curves should succeed");

    let report = output_json(&sink);
    assert_eq!(report["dimension"], "business_density");
    assert_eq!(report["attribute"], "business_density");
    let levels = report["levels"].as_array().expect("levels array");
    assert_eq!(levels.len(), 5);
    for (importance, level) in levels.iter().enumerate() {
        assert_eq!(level["importance"], importance);
        assert_eq!(level["points"].as_array().map(Vec::len), Some(4));
    }
    assert_eq!(levels[0]["points"][3]["factor"], 1.0);
}
