//! Response curves converting raw measurements into score multipliers.
//!
//! Each [`Dimension`] owns one [`Curve`] per active importance level
//! (`1..=4`). Level `0`, absent values, negative values and importance
//! levels outside `0..=4` all yield the neutral factor `1.0`, so every
//! scaler is total over `(Option<f64>, i32)`.
//!
//! Business density rewards dense areas with factors above `1.0`; every
//! other dimension suppresses undesirable extremes towards `0.0`.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::curve::{Curve, Step};
use crate::slider::{Slider, SliderCombination};

/// Factor that leaves a score unchanged.
pub const NEUTRAL: f64 = 1.0;

/// One measured input to the personalised score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    /// Effective slope of the cell.
    Slope,
    /// Highest posted speed limit.
    SpeedLimit,
    /// Normalised business density.
    BusinessDensity,
    /// Normalised crime density.
    CrimeDensity,
    /// Normalised crash density.
    CrashDensity,
}

impl Dimension {
    /// All dimensions in scoring order.
    pub const ALL: [Self; 5] = [
        Self::Slope,
        Self::SpeedLimit,
        Self::BusinessDensity,
        Self::CrimeDensity,
        Self::CrashDensity,
    ];

    /// Return the dimension as a `snake_case` `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slope => "slope",
            Self::SpeedLimit => "speed_limit",
            Self::BusinessDensity => "business_density",
            Self::CrimeDensity => "crime_density",
            Self::CrashDensity => "crash_density",
        }
    }

    /// Attribute holding this dimension's raw value in the feature document.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Slope => "effective_slope",
            Self::SpeedLimit => "Max_Speed_Limit",
            Self::BusinessDensity => "business_density",
            Self::CrimeDensity => "crime_density_normalized",
            Self::CrashDensity => "crash_density_normalized",
        }
    }

    /// Slider whose level drives this dimension.
    ///
    /// Speed limit and crash density both read the streets slider: crash
    /// density is scored as part of street safety.
    #[must_use]
    pub const fn slider(self) -> Slider {
        match self {
            Self::Slope => Slider::Slope,
            Self::SpeedLimit | Self::CrashDensity => Slider::Streets,
            Self::BusinessDensity => Slider::Amenity,
            Self::CrimeDensity => Slider::Crime,
        }
    }

    /// Importance level this dimension receives from `combination`.
    #[must_use]
    pub fn importance_in(self, combination: &SliderCombination) -> i32 {
        i32::from(combination.level(self.slider()))
    }

    fn curves(self) -> &'static [Curve; 4] {
        match self {
            Self::Slope => &SLOPE,
            Self::SpeedLimit => &SPEED_LIMIT,
            Self::BusinessDensity => &BUSINESS_DENSITY,
            Self::CrimeDensity => &CRIME_DENSITY,
            Self::CrashDensity => &CRASH_DENSITY,
        }
    }

    /// Curve applied at `importance`.
    ///
    /// Level `0` maps to the constant neutral curve; levels outside `0..=4`
    /// return `None`.
    #[must_use]
    pub fn curve(self, importance: i32) -> Option<Curve> {
        if importance == 0 {
            return Some(Curve::constant(NEUTRAL));
        }
        let index = usize::try_from(importance.checked_sub(1)?).ok()?;
        self.curves().get(index).copied()
    }

    /// Scale factor for a raw `value` at `importance`.
    ///
    /// # Examples
    /// ```
    /// use walkscore_core::Dimension;
    ///
    /// assert_eq!(Dimension::Slope.scale(Some(1.0), 4), 1.0);
    /// assert_eq!(Dimension::Slope.scale(Some(3.5), 4), 0.1);
    /// assert_eq!(Dimension::Slope.scale(None, 4), 1.0);
    /// assert_eq!(Dimension::Slope.scale(Some(30.0), 9), 1.0);
    /// ```
    #[must_use]
    pub fn scale(self, value: Option<f64>, importance: i32) -> f64 {
        let Some(raw) = value.filter(|raw| *raw >= 0.0 || raw.is_nan()) else {
            return NEUTRAL;
        };
        match self.curve(importance) {
            Some(curve) => curve.factor_for(raw),
            None => {
                debug!("{self} importance {importance} is undefined; using neutral factor");
                NEUTRAL
            }
        }
    }

    /// Sample every importance level's curve at `count` evenly spaced values
    /// between `start` and `end` inclusive.
    ///
    /// Returns one `(importance, points)` pair per level in `0..=4`.
    #[must_use]
    pub fn sample(self, start: f64, end: f64, count: usize) -> Vec<(i32, Vec<(f64, f64)>)> {
        let values = linspace(start, end, count);
        (0..=4)
            .map(|importance| {
                let points = values
                    .iter()
                    .map(|&value| (value, self.scale(Some(value), importance)))
                    .collect();
                (importance, points)
            })
            .collect()
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "sample positions interpolate between the requested bounds"
)]
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|index| start + index as f64 * step).collect()
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slope" | "effective_slope" => Ok(Self::Slope),
            "speed_limit" | "max_speed_limit" => Ok(Self::SpeedLimit),
            "business_density" => Ok(Self::BusinessDensity),
            "crime_density" | "crime_density_normalized" => Ok(Self::CrimeDensity),
            "crash_density" | "crash_density_normalized" => Ok(Self::CrashDensity),
            _ => Err(format!("unknown dimension '{s}'")),
        }
    }
}

/// Slope multiplier: gentle terrain keeps the score, steep terrain erodes it.
#[must_use]
pub fn scale_slope(value: Option<f64>, importance: i32) -> f64 {
    Dimension::Slope.scale(value, importance)
}

/// Speed limit multiplier: calm streets may be boosted at high importance.
#[must_use]
pub fn scale_speed_limit(value: Option<f64>, importance: i32) -> f64 {
    Dimension::SpeedLimit.scale(value, importance)
}

/// Business density multiplier: the one dimension that rewards density.
#[must_use]
pub fn scale_business_density(value: Option<f64>, importance: i32) -> f64 {
    Dimension::BusinessDensity.scale(value, importance)
}

/// Crime density multiplier.
#[must_use]
pub fn scale_crime_density(value: Option<f64>, importance: i32) -> f64 {
    Dimension::CrimeDensity.scale(value, importance)
}

/// Crash density multiplier.
#[must_use]
pub fn scale_crash_density(value: Option<f64>, importance: i32) -> f64 {
    Dimension::CrashDensity.scale(value, importance)
}

static SLOPE_1: [Step; 9] = [
    Step::below(2.0, 1.0),
    Step::below(3.0, 1.0),
    Step::below(4.0, 1.0),
    Step::below(5.0, 0.99),
    Step::below(7.0, 0.95),
    Step::below(10.0, 0.9),
    Step::below(15.0, 0.8),
    Step::below(20.0, 0.7),
    Step::below(25.0, 0.5),
];
static SLOPE_2: [Step; 7] = [
    Step::below(2.0, 1.0),
    Step::below(3.0, 0.9),
    Step::below(4.0, 0.7),
    Step::below(5.0, 0.5),
    Step::below(7.0, 0.3),
    Step::below(10.0, 0.1),
    Step::below(15.0, 0.01),
];
static SLOPE_3: [Step; 5] = [
    Step::below(2.0, 1.0),
    Step::below(3.0, 1.0),
    Step::below(4.0, 0.5),
    Step::below(5.0, 0.3),
    Step::below(7.0, 0.01),
];
static SLOPE_4: [Step; 3] = [
    Step::below(2.0, 1.0),
    Step::below(3.0, 0.5),
    Step::below(4.0, 0.1),
];
static SLOPE: [Curve; 4] = [
    Curve::new(&SLOPE_1, 0.25),
    Curve::new(&SLOPE_2, 0.0),
    Curve::new(&SLOPE_3, 0.0),
    Curve::new(&SLOPE_4, 0.0),
];

static SPEED_LIMIT_1: [Step; 7] = [
    Step::below(15.0, 1.0),
    Step::below(20.0, 1.0),
    Step::below(25.0, 1.0),
    Step::below(30.0, 1.0),
    Step::below(35.0, 1.0),
    Step::below(40.0, 0.6),
    Step::below(45.0, 0.3),
];
static SPEED_LIMIT_2: [Step; 5] = [
    Step::below(15.0, 0.95),
    Step::below(20.0, 0.9),
    Step::below(25.0, 0.85),
    Step::below(30.0, 0.75),
    Step::below(35.0, 0.6),
];
static SPEED_LIMIT_3: [Step; 3] = [
    Step::below(15.0, 1.2),
    Step::below(20.0, 1.0),
    Step::below(25.0, 0.8),
];
static SPEED_LIMIT_4: [Step; 3] = [
    Step::below(15.0, 1.5),
    Step::below(20.0, 1.0),
    Step::below(25.0, 0.9),
];
static SPEED_LIMIT: [Curve; 4] = [
    Curve::new(&SPEED_LIMIT_1, 0.0),
    Curve::new(&SPEED_LIMIT_2, 0.0),
    Curve::new(&SPEED_LIMIT_3, 0.0),
    Curve::new(&SPEED_LIMIT_4, 0.0),
];

// Sparse and saturated areas (`< 0.5` and `> 5`) share the catch-all
// factor; `[1.5, 5]` is closed on the right.
static BUSINESS_DENSITY_1: [Step; 4] = [
    Step::below(0.5, 1.0),
    Step::below(1.0, 1.1),
    Step::below(1.5, 1.25),
    Step::at_most(5.0, 1.5),
];
static BUSINESS_DENSITY_2: [Step; 4] = [
    Step::below(0.5, 1.0),
    Step::below(1.0, 1.25),
    Step::below(1.5, 1.5),
    Step::at_most(5.0, 2.0),
];
static BUSINESS_DENSITY_3: [Step; 4] = [
    Step::below(0.5, 0.5),
    Step::below(1.0, 1.0),
    Step::below(1.5, 1.25),
    Step::at_most(5.0, 2.5),
];
static BUSINESS_DENSITY_4: [Step; 4] = [
    Step::below(0.5, 0.0),
    Step::below(1.0, 1.5),
    Step::below(1.5, 1.75),
    Step::at_most(5.0, 2.5),
];
static BUSINESS_DENSITY: [Curve; 4] = [
    Curve::new(&BUSINESS_DENSITY_1, 1.0),
    Curve::new(&BUSINESS_DENSITY_2, 1.0),
    Curve::new(&BUSINESS_DENSITY_3, 0.5),
    Curve::new(&BUSINESS_DENSITY_4, 0.0),
];

static CRIME_DENSITY_1: [Step; 4] = [
    Step::below(0.25, 1.0),
    Step::below(0.7, 1.0),
    Step::below(1.5, 0.95),
    Step::below(3.0, 0.90),
];
static CRIME_DENSITY_2: [Step; 4] = [
    Step::below(0.25, 1.0),
    Step::below(0.7, 0.95),
    Step::below(1.5, 0.90),
    Step::below(3.0, 0.85),
];
static CRIME_DENSITY_3: [Step; 4] = [
    Step::below(0.25, 1.25),
    Step::below(0.7, 1.0),
    Step::below(1.5, 0.25),
    Step::below(3.0, 0.0),
];
static CRIME_DENSITY_4: [Step; 4] = [
    Step::below(0.25, 1.5),
    Step::below(0.7, 0.5),
    Step::below(1.5, 0.0),
    Step::below(3.0, 0.0),
];
static CRIME_DENSITY: [Curve; 4] = [
    Curve::new(&CRIME_DENSITY_1, 0.85),
    Curve::new(&CRIME_DENSITY_2, 0.80),
    Curve::new(&CRIME_DENSITY_3, 0.0),
    Curve::new(&CRIME_DENSITY_4, 0.0),
];

static CRASH_DENSITY_1: [Step; 3] = [
    Step::below(0.5, 0.98),
    Step::below(1.5, 0.95),
    Step::below(3.0, 0.90),
];
static CRASH_DENSITY_2: [Step; 3] = [
    Step::below(0.5, 0.95),
    Step::below(1.5, 0.90),
    Step::below(3.0, 0.85),
];
static CRASH_DENSITY_3: [Step; 3] = [
    Step::below(0.5, 1.0),
    Step::below(1.5, 0.85),
    Step::below(3.0, 0.5),
];
static CRASH_DENSITY_4: [Step; 4] = [
    Step::below(0.1, 2.0),
    Step::below(0.5, 0.1),
    Step::below(1.0, 0.1),
    Step::below(3.0, 0.0),
];
static CRASH_DENSITY: [Curve; 4] = [
    Curve::new(&CRASH_DENSITY_1, 0.85),
    Curve::new(&CRASH_DENSITY_2, 0.80),
    Curve::new(&CRASH_DENSITY_3, 0.25),
    Curve::new(&CRASH_DENSITY_4, 0.0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn every_curve_is_ordered() {
        for dimension in Dimension::ALL {
            for importance in 0..=4 {
                let curve = dimension.curve(importance).expect("defined level");
                assert!(curve.is_ordered(), "{dimension} level {importance}");
            }
        }
    }

    #[rstest]
    #[case(Dimension::Slope, Slider::Slope)]
    #[case(Dimension::SpeedLimit, Slider::Streets)]
    #[case(Dimension::BusinessDensity, Slider::Amenity)]
    #[case(Dimension::CrimeDensity, Slider::Crime)]
    #[case(Dimension::CrashDensity, Slider::Streets)]
    fn dimensions_read_their_slider(#[case] dimension: Dimension, #[case] slider: Slider) {
        assert_eq!(dimension.slider(), slider);
    }

    #[rstest]
    #[case(-1)]
    #[case(5)]
    #[case(i32::MIN)]
    #[case(i32::MAX)]
    fn undefined_importance_has_no_curve(#[case] importance: i32) {
        assert!(Dimension::CrashDensity.curve(importance).is_none());
        assert_eq!(
            Dimension::CrashDensity.scale(Some(10.0), importance),
            NEUTRAL
        );
    }

    #[rstest]
    fn sampling_covers_inclusive_bounds() {
        let samples = Dimension::Slope.sample(0.0, 10.0, 11);
        assert_eq!(samples.len(), 5);
        let (importance, points) = samples.get(4).expect("level 4");
        assert_eq!(*importance, 4);
        assert_eq!(points.first(), Some(&(0.0, 1.0)));
        assert_eq!(points.last(), Some(&(10.0, 0.0)));
        assert_eq!(points.len(), 11);
    }

    #[rstest]
    fn dimension_names_parse() {
        for dimension in Dimension::ALL {
            assert_eq!(dimension.as_str().parse::<Dimension>(), Ok(dimension));
            assert_eq!(dimension.attribute().parse::<Dimension>(), Ok(dimension));
        }
    }
}
