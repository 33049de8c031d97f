//! Lookup table artefact: streaming writer and runtime reader.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufReader, Read, Write};
use std::num::NonZeroUsize;

use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use walkscore_core::{SliderCombination, SliderRanges};
use walkscore_fs::{AtomicFile, open_utf8_file};

use crate::{LookupError, PersonalizedScore, PrecomputeEngine, TableError};

/// Number of combinations scored in parallel before being flushed.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(64) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Tuning for the precompute run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecomputeOptions {
    /// Combinations held in memory at once.
    pub chunk_size: NonZeroUsize,
}

impl Default for PrecomputeOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Outcome of a successful precompute run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecomputeSummary {
    /// Combinations written.
    pub combinations: usize,
    /// Scores per combination.
    pub features: usize,
    /// Location of the persisted table.
    pub output: Utf8PathBuf,
}

/// Score lists keyed by slider combination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: BTreeMap<SliderCombination, Vec<PersonalizedScore>>,
}

impl LookupTable {
    /// Scores for `combination` in feature order, if it was precomputed.
    #[must_use]
    pub fn scores_for(&self, combination: &SliderCombination) -> Option<&[PersonalizedScore]> {
        self.entries.get(combination).map(Vec::as_slice)
    }

    /// Number of combinations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Report whether the table holds no combinations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in combination order.
    pub fn iter(&self) -> impl Iterator<Item = (&SliderCombination, &[PersonalizedScore])> {
        self.entries
            .iter()
            .map(|(combination, scores)| (combination, scores.as_slice()))
    }

    /// Decode a table from JSON whose keys are canonical combination keys.
    ///
    /// # Errors
    /// Returns [`TableError::Json`] for malformed documents,
    /// [`TableError::InvalidKey`] for keys that are not combinations and
    /// [`TableError::DuplicateKey`] when two keys name the same combination.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let RawEntries(raw) = serde_json::from_reader(reader)?;
        let mut entries = BTreeMap::new();
        for (key, scores) in raw {
            let combination = SliderCombination::from_key(&key)
                .map_err(|source| TableError::InvalidKey {
                    key: key.clone(),
                    source,
                })?;
            if entries.insert(combination, scores).is_some() {
                return Err(TableError::DuplicateKey { key, combination });
            }
        }
        Ok(Self { entries })
    }
}

/// Table members in document order, repeated keys included.
struct RawEntries(Vec<(String, Vec<PersonalizedScore>)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("an object of score lists keyed by slider combination")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl FromIterator<(SliderCombination, Vec<PersonalizedScore>)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (SliderCombination, Vec<PersonalizedScore>)>>(
        iter: I,
    ) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Read a lookup table artefact.
///
/// # Errors
/// Returns [`LookupError::Open`] when the file cannot be opened and
/// [`LookupError::Read`] when its content is not a lookup table.
pub fn read_lookup_table(path: &Utf8Path) -> Result<LookupTable, LookupError> {
    let file = open_utf8_file(path).map_err(|source| LookupError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    LookupTable::from_reader(BufReader::new(file)).map_err(|source| LookupError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Stream the scores of every combination into `writer` as one JSON object.
///
/// Each member sits on its own line, keyed by
/// [`SliderCombination::canonical_key`]. Only `chunk_size` combinations
/// are held in memory at a time; each chunk is scored in parallel and
/// written in combination order.
///
/// # Errors
/// Returns [`TableError::NonFiniteScore`] before writing a combination
/// whose scores include an infinite or NaN value, and [`TableError::Json`]
/// for serialisation or I/O failures from `writer`.
pub fn write_lookup_json<W: Write>(
    engine: &PrecomputeEngine<'_>,
    combinations: &[SliderCombination],
    options: PrecomputeOptions,
    mut writer: W,
) -> Result<(), TableError> {
    writer.write_all(b"{").map_err(serde_json::Error::io)?;
    let mut separator: &[u8] = b"\n";
    for chunk in combinations.chunks(options.chunk_size.get()) {
        let scored = engine.score_batch(chunk);
        for (combination, scores) in chunk.iter().zip(&scored) {
            ensure_finite(combination, scores)?;
            writer.write_all(separator).map_err(serde_json::Error::io)?;
            serde_json::to_writer(&mut writer, &combination.canonical_key())?;
            writer.write_all(b": ").map_err(serde_json::Error::io)?;
            serde_json::to_writer(&mut writer, scores)?;
            separator = b",\n";
        }
    }
    writer.write_all(b"\n}\n").map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

// JSON has no encoding for infinities or NaN; `serde_json` would write
// `null`, which the reader rejects.
fn ensure_finite(
    combination: &SliderCombination,
    scores: &[PersonalizedScore],
) -> Result<(), TableError> {
    match scores
        .iter()
        .find(|score| !score.personalized_walkscore.is_finite())
    {
        Some(score) => Err(TableError::NonFiniteScore {
            key: combination.canonical_key(),
            id: score.id.clone(),
        }),
        None => Ok(()),
    }
}

/// Score every combination of `ranges` and persist the table at `output`.
///
/// The table is written to a temporary sibling of `output` and renamed into
/// place once complete, so an interrupted run leaves any previous table
/// intact.
///
/// # Errors
/// Returns [`LookupError::Create`], [`LookupError::Write`] or
/// [`LookupError::Persist`] for the failing stage. A non-finite score is a
/// write failure; nothing is committed.
pub fn write_lookup_table(
    engine: &PrecomputeEngine<'_>,
    ranges: &SliderRanges,
    output: &Utf8Path,
    options: PrecomputeOptions,
) -> Result<PrecomputeSummary, LookupError> {
    let combinations = ranges.combinations();
    info!(
        "Scoring {} combinations over {} features",
        combinations.len(),
        engine.features().len()
    );
    let mut file = AtomicFile::create(output).map_err(|source| LookupError::Create {
        path: output.to_path_buf(),
        source,
    })?;
    write_lookup_json(engine, &combinations, options, &mut file).map_err(|source| {
        LookupError::Write {
            path: output.to_path_buf(),
            source,
        }
    })?;
    file.commit().map_err(|source| LookupError::Persist {
        path: output.to_path_buf(),
        source,
    })?;
    info!("Lookup table saved to {output}");
    Ok(PrecomputeSummary {
        combinations: combinations.len(),
        features: engine.features().len(),
        output: output.to_path_buf(),
    })
}
