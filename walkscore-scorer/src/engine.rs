//! Personalised scoring of features under slider combinations.
#![forbid(unsafe_code)]

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkscore_core::{Dimension, Feature, FeatureId, SliderCombination, SliderRanges};

use crate::LookupTable;

/// Constant added to every personalised score so none is exactly zero.
pub const PERSONALIZED_SCORE_FLOOR: f64 = 0.001;

/// Score of one feature under one slider combination, as stored in the
/// lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedScore {
    /// Identifier of the scored feature.
    #[serde(rename = "IndexID")]
    pub id: FeatureId,
    /// Personalised score, always at least [`PERSONALIZED_SCORE_FLOOR`]
    /// for non-negative base scores.
    pub personalized_walkscore: f64,
}

/// Every factor that contributes to one personalised score.
///
/// # Examples
/// ```
/// use walkscore_core::{Dimension, Feature, SliderCombination};
/// use walkscore_scorer::ScoreBreakdown;
///
/// # fn main() -> Result<(), walkscore_core::SliderError> {
/// let feature = Feature::new("A1")
///     .with_base_score(10.0)
///     .with_value(Dimension::Slope, 3.5);
/// let breakdown = ScoreBreakdown::new(&feature, &SliderCombination::new(4, 0, 0, 0)?);
/// assert_eq!(breakdown.slope, 0.1);
/// assert_eq!(breakdown.personalized_walkscore, 10.0 * 0.1 + 0.001);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Identifier of the feature.
    #[serde(rename = "IndexID")]
    pub id: FeatureId,
    /// Combination the factors were evaluated for.
    pub combination: SliderCombination,
    /// Base score, `0.0` when the feature has none.
    pub unadjusted_walkscore: f64,
    /// Slope factor at the `slope` slider level.
    pub slope: f64,
    /// Speed limit factor at the `streets` slider level.
    pub speed_limit: f64,
    /// Business density factor at the `amenity` slider level.
    pub business_density: f64,
    /// Crime density factor at the `crime` slider level.
    pub crime_density: f64,
    /// Crash density factor, also at the `streets` slider level.
    pub crash_density: f64,
    /// Final personalised score.
    pub personalized_walkscore: f64,
}

impl ScoreBreakdown {
    /// Evaluate every factor for `feature` under `combination`.
    #[must_use]
    pub fn new(feature: &Feature, combination: &SliderCombination) -> Self {
        let factor = |dimension: Dimension| {
            dimension.scale(
                feature.value(dimension),
                dimension.importance_in(combination),
            )
        };
        let mut breakdown = Self {
            id: feature.id.clone(),
            combination: *combination,
            unadjusted_walkscore: feature.base_score(),
            slope: factor(Dimension::Slope),
            speed_limit: factor(Dimension::SpeedLimit),
            business_density: factor(Dimension::BusinessDensity),
            crime_density: factor(Dimension::CrimeDensity),
            crash_density: factor(Dimension::CrashDensity),
            personalized_walkscore: 0.0,
        };
        breakdown.personalized_walkscore = breakdown.combine();
        breakdown
    }

    /// Multiply left to right, then add the floor.
    #[expect(
        clippy::float_arithmetic,
        reason = "the personalised score is a product of scale factors"
    )]
    fn combine(&self) -> f64 {
        self.unadjusted_walkscore
            * self.slope
            * self.speed_limit
            * self.business_density
            * self.crime_density
            * self.crash_density
            + PERSONALIZED_SCORE_FLOOR
    }
}

/// Personalised score of `feature` under `combination`.
///
/// # Examples
/// ```
/// use walkscore_core::{Feature, SliderCombination};
/// use walkscore_scorer::personalized_score;
///
/// let feature = Feature::new("A1").with_base_score(10.0);
/// assert_eq!(personalized_score(&feature, &SliderCombination::default()), 10.001);
/// ```
#[must_use]
pub fn personalized_score(feature: &Feature, combination: &SliderCombination) -> f64 {
    ScoreBreakdown::new(feature, combination).personalized_walkscore
}

/// Stateless scorer over a borrowed, ordered feature set.
#[derive(Debug, Clone, Copy)]
pub struct PrecomputeEngine<'a> {
    features: &'a [Feature],
}

impl<'a> PrecomputeEngine<'a> {
    /// Build an engine over `features`; score lists follow their order.
    #[must_use]
    pub const fn new(features: &'a [Feature]) -> Self {
        Self { features }
    }

    /// Features scored by this engine.
    #[must_use]
    pub const fn features(&self) -> &'a [Feature] {
        self.features
    }

    /// Score every feature under one combination, in feature order.
    #[must_use]
    pub fn score_combination(&self, combination: &SliderCombination) -> Vec<PersonalizedScore> {
        self.features
            .iter()
            .map(|feature| PersonalizedScore {
                id: feature.id.clone(),
                personalized_walkscore: personalized_score(feature, combination),
            })
            .collect()
    }

    /// Score a batch of combinations in parallel.
    ///
    /// The result holds one score list per combination, in the order the
    /// combinations were given.
    #[must_use]
    pub fn score_batch(&self, combinations: &[SliderCombination]) -> Vec<Vec<PersonalizedScore>> {
        combinations
            .par_iter()
            .map(|combination| self.score_combination(combination))
            .collect()
    }

    /// Score every combination of `ranges` and keep the whole table in
    /// memory.
    ///
    /// Prefer [`crate::write_lookup_table`] for large inputs; it bounds
    /// memory to one batch of combinations.
    #[must_use]
    pub fn run(&self, ranges: &SliderRanges) -> LookupTable {
        let combinations = ranges.combinations();
        let scores = self.score_batch(&combinations);
        combinations.into_iter().zip(scores).collect()
    }
}
