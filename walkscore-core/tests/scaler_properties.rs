//! Property-based tests for the scaler library.
//!
//! # Invariants tested
//!
//! - **Disabled dimension:** importance `0` is neutral for every value.
//! - **Missing data:** absent or negative values are neutral at every level.
//! - **Totality:** importance levels outside `0..=4` are neutral.
//! - **Finite factor set:** every result is one of the curve's constants.

use proptest::prelude::*;
use walkscore_core::{Dimension, NEUTRAL};

fn dimension_strategy() -> impl Strategy<Value = Dimension> {
    prop::sample::select(Dimension::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: a disabled slider never changes the score.
    #[test]
    fn importance_zero_is_neutral(
        dimension in dimension_strategy(),
        value in proptest::option::of(-1_000.0_f64..1_000.0),
    ) {
        prop_assert_eq!(dimension.scale(value, 0), NEUTRAL);
    }

    /// Property: missing measurements never change the score.
    #[test]
    fn absent_value_is_neutral(dimension in dimension_strategy(), importance in any::<i32>()) {
        prop_assert_eq!(dimension.scale(None, importance), NEUTRAL);
    }

    /// Property: negative measurements are treated as missing.
    #[test]
    fn negative_value_is_neutral(
        dimension in dimension_strategy(),
        value in -1.0e9_f64..-1.0e-9,
        importance in 0_i32..=4,
    ) {
        prop_assert_eq!(dimension.scale(Some(value), importance), NEUTRAL);
    }

    /// Property: undefined importance levels fall back to neutral.
    #[test]
    fn undefined_importance_is_neutral(
        dimension in dimension_strategy(),
        value in 0.0_f64..100.0,
        importance in prop_oneof![i32::MIN..0, 5..=i32::MAX],
    ) {
        prop_assert_eq!(dimension.scale(Some(value), importance), NEUTRAL);
    }

    /// Property: results are drawn from the curve's constants, never
    /// interpolated between them.
    #[test]
    fn factors_come_from_the_table(
        dimension in dimension_strategy(),
        value in 0.0_f64..100.0,
        importance in 1_i32..=4,
    ) {
        let curve = dimension.curve(importance).expect("levels 1..=4 are defined");
        let factor = dimension.scale(Some(value), importance);
        prop_assert!(
            curve.factors().any(|candidate| candidate.to_bits() == factor.to_bits()),
            "{} level {} produced {} outside its table",
            dimension,
            importance,
            factor
        );
    }
}
