//! Behavioural tests for the `load_features` entry point.

use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, io::Write};
use tempfile::{NamedTempFile, TempPath};
use walkscore_core::FeatureId;
use walkscore_data::{FeatureCollection, FeatureLoadError, SchemaError, load_features};

enum DocumentTarget {
    Fixture(Utf8PathBuf),
    Temporary(TempPath),
    Missing(Utf8PathBuf),
}

impl DocumentTarget {
    fn path(&self) -> Utf8PathBuf {
        match self {
            Self::Fixture(path) | Self::Missing(path) => path.clone(),
            Self::Temporary(temp) => {
                Utf8PathBuf::from_path_buf(temp.to_path_buf()).expect("utf-8 temp path")
            }
        }
    }
}

type LoadOutcome = Option<Result<FeatureCollection, FeatureLoadError>>;

fn fixtures_dir() -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

#[fixture]
fn target() -> RefCell<Option<DocumentTarget>> {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> RefCell<LoadOutcome> {
    RefCell::new(None)
}

fn expect_collection(outcome: &RefCell<LoadOutcome>) -> FeatureCollection {
    outcome
        .borrow()
        .as_ref()
        .expect("load was attempted")
        .as_ref()
        .expect("expected a successful load")
        .clone()
}

#[given("the sample feature document")]
fn sample_document(#[from(target)] target: &RefCell<Option<DocumentTarget>>) {
    *target.borrow_mut() = Some(DocumentTarget::Fixture(
        fixtures_dir().join("sample_features.json"),
    ));
}

#[given("a feature document without a features key")]
fn document_without_features(#[from(target)] target: &RefCell<Option<DocumentTarget>>) {
    let mut file = NamedTempFile::new().expect("create temp document");
    file.write_all(br#"{"type": "FeatureCollection"}"#)
        .expect("write temp document");
    *target.borrow_mut() = Some(DocumentTarget::Temporary(file.into_temp_path()));
}

#[given("a path to a missing feature document")]
fn missing_document(#[from(target)] target: &RefCell<Option<DocumentTarget>>) {
    *target.borrow_mut() = Some(DocumentTarget::Missing(
        fixtures_dir().join("does-not-exist.json"),
    ));
}

#[when("I load the feature document")]
fn load_document(
    #[from(target)] target: &RefCell<Option<DocumentTarget>>,
    #[from(outcome)] outcome: &RefCell<LoadOutcome>,
) {
    let path = target.borrow().as_ref().expect("document prepared").path();
    *outcome.borrow_mut() = Some(load_features(&path));
}

#[then("{count} features are loaded in input order")]
fn features_in_order(count: usize, #[from(outcome)] outcome: &RefCell<LoadOutcome>) {
    let collection = expect_collection(outcome);
    assert_eq!(collection.len(), count);
    let ids: Vec<FeatureId> = collection.features().iter().map(|f| f.id.clone()).collect();
    assert_eq!(
        ids,
        vec![
            FeatureId::from(101_i64),
            FeatureId::from(102_i64),
            FeatureId::from("corner-7"),
        ]
    );
}

#[then("{count} feature lacks {attribute}")]
fn feature_lacks(count: usize, attribute: String, #[from(outcome)] outcome: &RefCell<LoadOutcome>) {
    let collection = expect_collection(outcome);
    assert_eq!(collection.report().missing(&attribute), count);
}

#[then("a missing features error is returned")]
fn missing_features_error(#[from(outcome)] outcome: &RefCell<LoadOutcome>) {
    let borrowed = outcome.borrow();
    match borrowed.as_ref().expect("load was attempted") {
        Ok(_) => panic!("expected a schema error"),
        Err(err) => assert_eq!(err.schema_error(), Some(&SchemaError::MissingFeatures)),
    }
}

#[then("an open error is returned")]
fn open_error(#[from(outcome)] outcome: &RefCell<LoadOutcome>) {
    let borrowed = outcome.borrow();
    match borrowed.as_ref().expect("load was attempted") {
        Ok(_) => panic!("expected an error for the missing file"),
        Err(FeatureLoadError::Open { path, source }) => {
            assert!(path.ends_with("does-not-exist.json"));
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        Err(other) => panic!("expected open error, got {other:?}"),
    }
}

#[scenario(path = "tests/features/feature_loader.feature", index = 0)]
fn well_formed_document(target: RefCell<Option<DocumentTarget>>, outcome: RefCell<LoadOutcome>) {
    let _ = (target, outcome);
}

#[scenario(path = "tests/features/feature_loader.feature", index = 1)]
fn document_without_features_key(
    target: RefCell<Option<DocumentTarget>>,
    outcome: RefCell<LoadOutcome>,
) {
    let _ = (target, outcome);
}

#[scenario(path = "tests/features/feature_loader.feature", index = 2)]
fn missing_file(target: RefCell<Option<DocumentTarget>>, outcome: RefCell<LoadOutcome>) {
    let _ = (target, outcome);
}
