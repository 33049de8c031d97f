//! Test helpers for composing feature documents and temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Two cells: `A1` is the reference cell, `7` has no measurements.
pub(super) const FEATURE_DOCUMENT: &str = r#"{"features": [
    {"attributes": {
        "IndexID": "A1",
        "unadjusted_walkscore": 10.0,
        "effective_slope": 1.0,
        "Max_Speed_Limit": 10.0,
        "business_density": 0.2,
        "crime_density_normalized": 0.1,
        "crash_density_normalized": 0.1
    }},
    {"attributes": {"IndexID": 7, "unadjusted_walkscore": 2.0}}
]}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents)
        .unwrap_or_else(|err| panic!("failed to write {path}: {err}"));
}

/// Temporary directory holding a feature document.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        write_utf8(&root.join("walkscores.json"), FEATURE_DOCUMENT.as_bytes());
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn input(&self) -> Utf8PathBuf {
        self.root.join("walkscores.json")
    }

    pub(super) fn table(&self) -> Utf8PathBuf {
        self.root.join("walkscore_combinations.json")
    }
}

pub(super) fn output_json(buffer: &[u8]) -> serde_json::Value {
    serde_json::from_slice(buffer).expect("command output should be JSON")
}
