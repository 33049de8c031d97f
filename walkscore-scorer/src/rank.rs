//! Dense-rank rescaling of score lists for display.
#![forbid(unsafe_code)]

use crate::PersonalizedScore;

/// Upper end of the rescaled range.
pub const RANK_SCALE: f64 = 5.0;

/// Replace each score with its dense rank among distinct scores, mapped
/// linearly onto `0.0..=RANK_SCALE`.
///
/// Ties share a rank. A list with a single distinct score maps to zeros.
///
/// # Examples
/// ```
/// use walkscore_scorer::{PersonalizedScore, rank_normalise};
///
/// let scores: Vec<_> = [(1, 0.5), (2, 9.0), (3, 0.5), (4, 3.0)]
///     .into_iter()
///     .map(|(id, score)| PersonalizedScore { id: id.into(), personalized_walkscore: score })
///     .collect();
/// let ranked: Vec<f64> = rank_normalise(&scores)
///     .into_iter()
///     .map(|s| s.personalized_walkscore)
///     .collect();
/// assert_eq!(ranked, vec![0.0, 5.0, 0.0, 2.5]);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "ranks are rescaled onto a floating-point range"
)]
pub fn rank_normalise(scores: &[PersonalizedScore]) -> Vec<PersonalizedScore> {
    let mut distinct: Vec<f64> = scores.iter().map(|s| s.personalized_walkscore).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup_by(|a, b| a.total_cmp(b).is_eq());
    let top_rank = distinct.len().saturating_sub(1);

    scores
        .iter()
        .map(|score| {
            let rank = distinct
                .binary_search_by(|candidate| candidate.total_cmp(&score.personalized_walkscore))
                .unwrap_or_default();
            let scaled = if top_rank == 0 {
                0.0
            } else {
                rank as f64 / top_rank as f64 * RANK_SCALE
            };
            PersonalizedScore {
                id: score.id.clone(),
                personalized_walkscore: scaled,
            }
        })
        .collect()
}
