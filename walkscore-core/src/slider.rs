//! User-facing importance sliders and the combinations they span.
//!
//! Four sliders (slope, streets, amenity, crime) each take a level in
//! `0..=4`. A [`SliderCombination`] fixes one level per slider and doubles
//! as the lookup key of the precomputed table, so its canonical rendering
//! must never change between the writer and the reader.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest importance level a slider can take.
pub const MAX_LEVEL: u8 = 4;

/// Every level a slider can take, in ascending order.
pub const LEVELS: [u8; 5] = [0, 1, 2, 3, 4];

/// Errors raised when building slider combinations or ranges.
#[derive(Debug, Error)]
pub enum SliderError {
    /// A level lies outside `0..=4`.
    #[error("{slider} level {level} is outside 0..={MAX_LEVEL}")]
    LevelOutOfRange {
        /// Slider the level was supplied for.
        slider: Slider,
        /// Offending level.
        level: u8,
    },
    /// A slider range contains no levels.
    #[error("{slider} must allow at least one level")]
    EmptyRange {
        /// Slider with the empty range.
        slider: Slider,
    },
    /// A slider range lists the same level twice.
    #[error("{slider} lists level {level} more than once")]
    DuplicateLevel {
        /// Slider with the repeated level.
        slider: Slider,
        /// Level that appears twice.
        level: u8,
    },
    /// A serialized key is not a canonical slider combination.
    #[error("'{key}' is not a slider combination key: {source}")]
    MalformedKey {
        /// Key as supplied.
        key: String,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A slider name was not recognised.
    #[error("unknown slider '{name}'")]
    UnknownSlider {
        /// Name as supplied.
        name: String,
    },
}

/// One of the four user-facing importance controls.
///
/// # Examples
/// ```
/// use walkscore_core::Slider;
///
/// assert_eq!(Slider::Streets.as_str(), "streets");
/// assert_eq!("amenity".parse::<Slider>().ok(), Some(Slider::Amenity));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slider {
    /// Terrain steepness.
    Slope,
    /// Street safety: speed limits and crash density.
    Streets,
    /// Nearby businesses.
    Amenity,
    /// Reported crime.
    Crime,
}

impl Slider {
    /// All sliders in declaration order.
    pub const ALL: [Self; 4] = [Self::Slope, Self::Streets, Self::Amenity, Self::Crime];

    /// Return the slider as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slope => "slope",
            Self::Streets => "streets",
            Self::Amenity => "amenity",
            Self::Crime => "crime",
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slider {
    type Err = SliderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slope" => Ok(Self::Slope),
            "streets" => Ok(Self::Streets),
            "amenity" => Ok(Self::Amenity),
            "crime" => Ok(Self::Crime),
            _ => Err(SliderError::UnknownSlider { name: s.to_owned() }),
        }
    }
}

/// One level per slider.
///
/// Field order is the canonical key order, and the derived ordering matches
/// the order in which [`SliderRanges::combinations`] emits combinations.
///
/// # Examples
/// ```
/// use walkscore_core::SliderCombination;
///
/// # fn main() -> Result<(), walkscore_core::SliderError> {
/// let combination = SliderCombination::new(4, 0, 2, 1)?;
/// let key = combination.canonical_key();
/// assert_eq!(key, r#"{"slope": 4, "streets": 0, "amenity": 2, "crime": 1}"#);
/// assert_eq!(SliderCombination::from_key(&key)?, combination);
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(deny_unknown_fields)]
pub struct SliderCombination {
    /// Importance of gentle terrain.
    pub slope: u8,
    /// Importance of calm, safe streets.
    pub streets: u8,
    /// Importance of nearby businesses.
    pub amenity: u8,
    /// Importance of low crime.
    pub crime: u8,
}

impl SliderCombination {
    /// Validate and construct a combination.
    ///
    /// # Errors
    /// Returns [`SliderError::LevelOutOfRange`] when any level exceeds
    /// [`MAX_LEVEL`].
    pub fn new(slope: u8, streets: u8, amenity: u8, crime: u8) -> Result<Self, SliderError> {
        let combination = Self {
            slope,
            streets,
            amenity,
            crime,
        };
        combination.validate()?;
        Ok(combination)
    }

    /// Check every level against [`MAX_LEVEL`].
    ///
    /// # Errors
    /// Returns the first out-of-range slider.
    pub fn validate(&self) -> Result<(), SliderError> {
        for slider in Slider::ALL {
            let level = self.level(slider);
            if level > MAX_LEVEL {
                return Err(SliderError::LevelOutOfRange { slider, level });
            }
        }
        Ok(())
    }

    /// Level assigned to `slider`.
    #[must_use]
    pub const fn level(&self, slider: Slider) -> u8 {
        match slider {
            Slider::Slope => self.slope,
            Slider::Streets => self.streets,
            Slider::Amenity => self.amenity,
            Slider::Crime => self.crime,
        }
    }

    /// Render the lookup key for this combination.
    ///
    /// The rendering is a JSON object with the four keys in declaration
    /// order, `": "` after each key and `", "` between members.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        format!(
            "{{\"slope\": {}, \"streets\": {}, \"amenity\": {}, \"crime\": {}}}",
            self.slope, self.streets, self.amenity, self.crime
        )
    }

    /// Parse a key produced by [`Self::canonical_key`].
    ///
    /// Whitespace between tokens is not significant, so compact renderings
    /// of the same object parse to the same combination.
    ///
    /// # Errors
    /// Returns [`SliderError::MalformedKey`] when the key is not a JSON
    /// object holding exactly the four slider fields, and
    /// [`SliderError::LevelOutOfRange`] when a level exceeds [`MAX_LEVEL`].
    pub fn from_key(key: &str) -> Result<Self, SliderError> {
        let parsed: Self = serde_json::from_str(key).map_err(|source| SliderError::MalformedKey {
            key: key.to_owned(),
            source,
        })?;
        parsed.validate()?;
        Ok(parsed)
    }
}

impl fmt::Display for SliderCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_key())
    }
}

impl FromStr for SliderCombination {
    type Err = SliderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// Allowed levels per slider.
///
/// Defaults to every level in `0..=4` for all four sliders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderRanges {
    slope: Vec<u8>,
    streets: Vec<u8>,
    amenity: Vec<u8>,
    crime: Vec<u8>,
}

impl Default for SliderRanges {
    fn default() -> Self {
        Self {
            slope: LEVELS.to_vec(),
            streets: LEVELS.to_vec(),
            amenity: LEVELS.to_vec(),
            crime: LEVELS.to_vec(),
        }
    }
}

impl SliderRanges {
    /// Full range for every slider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the levels allowed for one slider, keeping their order.
    ///
    /// # Errors
    /// Rejects empty level sets, repeated levels and levels above
    /// [`MAX_LEVEL`].
    pub fn with_levels(mut self, slider: Slider, levels: Vec<u8>) -> Result<Self, SliderError> {
        if levels.is_empty() {
            return Err(SliderError::EmptyRange { slider });
        }
        for (position, &level) in levels.iter().enumerate() {
            if level > MAX_LEVEL {
                return Err(SliderError::LevelOutOfRange { slider, level });
            }
            if levels.iter().take(position).any(|&seen| seen == level) {
                return Err(SliderError::DuplicateLevel { slider, level });
            }
        }
        *self.levels_mut(slider) = levels;
        Ok(self)
    }

    /// Levels allowed for `slider`.
    #[must_use]
    pub fn levels(&self, slider: Slider) -> &[u8] {
        match slider {
            Slider::Slope => &self.slope,
            Slider::Streets => &self.streets,
            Slider::Amenity => &self.amenity,
            Slider::Crime => &self.crime,
        }
    }

    const fn levels_mut(&mut self, slider: Slider) -> &mut Vec<u8> {
        match slider {
            Slider::Slope => &mut self.slope,
            Slider::Streets => &mut self.streets,
            Slider::Amenity => &mut self.amenity,
            Slider::Crime => &mut self.crime,
        }
    }

    /// Number of combinations the ranges span.
    #[must_use]
    pub fn combination_count(&self) -> usize {
        Slider::ALL
            .iter()
            .map(|&slider| self.levels(slider).len())
            .product()
    }

    /// Materialise the Cartesian product of the ranges.
    ///
    /// Slope varies slowest and crime fastest, matching nested iteration in
    /// declaration order.
    ///
    /// # Examples
    /// ```
    /// use walkscore_core::SliderRanges;
    ///
    /// let combinations = SliderRanges::new().combinations();
    /// assert_eq!(combinations.len(), 625);
    /// assert_eq!(combinations.first().map(|c| c.crime), Some(0));
    /// assert_eq!(combinations.get(1).map(|c| c.crime), Some(1));
    /// ```
    #[must_use]
    pub fn combinations(&self) -> Vec<SliderCombination> {
        let mut combinations = Vec::with_capacity(self.combination_count());
        for &slope in &self.slope {
            for &streets in &self.streets {
                for &amenity in &self.amenity {
                    for &crime in &self.crime {
                        combinations.push(SliderCombination {
                            slope,
                            streets,
                            amenity,
                            crime,
                        });
                    }
                }
            }
        }
        combinations
    }
}
