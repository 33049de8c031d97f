//! Core domain types for the walkscore engine.
//!
//! The crate holds everything that is pure: the piecewise response curves
//! that turn raw measurements into score multipliers, the slider levels a
//! user picks, and the enumeration of every slider combination the
//! precompute stage must cover. Nothing here performs I/O.
//!
//! # Examples
//! ```
//! use walkscore_core::{Dimension, SliderRanges};
//!
//! let combinations = SliderRanges::new().combinations();
//! assert_eq!(combinations.len(), 625);
//! assert_eq!(Dimension::BusinessDensity.scale(Some(2.0), 2), 2.0);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod curve;
mod feature;
mod scaler;
mod slider;

pub use curve::{Bound, Curve, Step};
pub use feature::{BASE_SCORE_ATTRIBUTE, Feature, FeatureId, ID_ATTRIBUTE};
pub use scaler::{
    Dimension, NEUTRAL, scale_business_density, scale_crash_density, scale_crime_density,
    scale_slope, scale_speed_limit,
};
pub use slider::{LEVELS, MAX_LEVEL, Slider, SliderCombination, SliderError, SliderRanges};
