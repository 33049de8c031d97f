//! Precomputation of personalised walkscores.
//!
//! The crate turns a loaded feature set into the lookup table consumed at
//! request time:
//! - **Scoring** multiplies each feature's base score by the five scale
//!   factors its slider combination selects, then adds a small floor so no
//!   score is exactly zero.
//! - **Persistence** streams one JSON member per combination into a
//!   temporary file that is renamed over the target on success. Batches of
//!   combinations are scored in parallel with `rayon`.
//! - **Lookup** reads a persisted table back and answers exact-match
//!   queries by combination.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use walkscore_core::SliderRanges;
//! use walkscore_data::load_features;
//! use walkscore_scorer::{PrecomputeEngine, PrecomputeOptions, write_lookup_table};
//!
//! let features = load_features(Utf8Path::new("walkscores.json")).expect("load features");
//! let engine = PrecomputeEngine::new(features.features());
//! write_lookup_table(
//!     &engine,
//!     &SliderRanges::new(),
//!     Utf8Path::new("walkscore_combinations.json"),
//!     PrecomputeOptions::default(),
//! )
//! .expect("persist lookup table");
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod error;
mod lookup;
mod rank;

pub use engine::{
    PERSONALIZED_SCORE_FLOOR, PersonalizedScore, PrecomputeEngine, ScoreBreakdown,
    personalized_score,
};
pub use error::{LookupError, TableError};
pub use lookup::{
    DEFAULT_CHUNK_SIZE, LookupTable, PrecomputeOptions, PrecomputeSummary, read_lookup_table,
    write_lookup_json, write_lookup_table,
};
pub use rank::{RANK_SCALE, rank_normalise};
