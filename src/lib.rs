//! Facade crate for the walkscore precompute engine.
//!
//! This crate re-exports the core scoring types and exposes the feature
//! loader and lookup table writer behind feature flags.
//!
//! ```
//! use walkscore_engine::{Dimension, Feature, SliderCombination, personalized_score};
//!
//! let feature = Feature::new("A1")
//!     .with_base_score(10.0)
//!     .with_value(Dimension::Slope, 1.0);
//! let neutral = SliderCombination::default();
//! assert_eq!(personalized_score(&feature, &neutral), 10.001);
//! ```

#![forbid(unsafe_code)]

pub use walkscore_core::{
    Curve, Dimension, Feature, FeatureId, LEVELS, MAX_LEVEL, NEUTRAL, Slider, SliderCombination,
    SliderError, SliderRanges,
};

#[cfg(feature = "loader")]
pub use walkscore_data::{
    DocumentError, FeatureCollection, FeatureLoadError, LoadReport, SchemaError,
    features_from_reader, load_features,
};

#[cfg(feature = "precompute")]
pub use walkscore_scorer::{
    LookupError, LookupTable, PERSONALIZED_SCORE_FLOOR, PersonalizedScore, PrecomputeEngine,
    PrecomputeOptions, PrecomputeSummary, ScoreBreakdown, TableError, personalized_score,
    rank_normalise, read_lookup_table, write_lookup_table,
};
