//! Heuristic probability mapping
//!
//! Converts a dominant feature into four disease scores using an explicit
//! random source:
//!
//! 1. Every disease starts from a small random baseline
//! 2. If a dominant feature was found, its disease is boosted into the high
//!    band and the other three are suppressed
//! 3. Near-equal scores are nudged apart so displayed bars differ
//! 4. Each score is clamped independently to [0.01, 0.99]
//!
//! Scores are not normalized: they do not sum to 1.
//!
//! The output is intentionally non-deterministic for an entropy-seeded
//! source. Seed the generator to reproduce a run.
//!
//! # Example
//!
//! ```
//! use pancrescan::analysis::probability::map_probabilities;
//! use pancrescan::features::DominantFeature;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let scores = map_probabilities(DominantFeature::CystLike, &mut rng);
//! assert_eq!(scores.len(), 4);
//! ```

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use rand::Rng;

use super::disease::Disease;
use crate::features::DominantFeature;

/// Disease key to score
pub type DiseaseProbabilities = BTreeMap<Disease, f32>;

/// Lower clamp for every score
pub const MIN_PROBABILITY: f32 = 0.01;

/// Upper clamp for every score
pub const MAX_PROBABILITY: f32 = 0.99;

/// Score above which a disease counts as dominant
pub const DOMINANT_THRESHOLD: f32 = 0.8;

const BASELINE_RANGE: RangeInclusive<f32> = 0.01..=0.15;
const DOMINANT_RANGE: RangeInclusive<f32> = 0.80..=0.99;
const SUPPRESSED_RANGE: RangeInclusive<f32> = 0.01..=0.10;

/// Minimum gap between neighbouring scores
const MIN_SEPARATION: f32 = 0.005;
const NUDGE_RANGE: RangeInclusive<f32> = 0.005..=0.015;

/// Map a dominant feature to four disease scores
pub fn map_probabilities<R: Rng + ?Sized>(
    dominant: DominantFeature,
    rng: &mut R,
) -> DiseaseProbabilities {
    let mut scores: DiseaseProbabilities = match dominant.disease() {
        Some(target) => Disease::ALL
            .into_iter()
            .map(|d| {
                let range = if d == target { DOMINANT_RANGE } else { SUPPRESSED_RANGE };
                (d, rng.gen_range(range))
            })
            .collect(),
        None => Disease::ALL
            .into_iter()
            .map(|d| (d, rng.gen_range(BASELINE_RANGE)))
            .collect(),
    };

    separate(&mut scores, rng);
    clamp_all(&mut scores);

    log::debug!("Mapped {:?} to probabilities {:?}", dominant, scores);
    scores
}

/// Scores for an image that could not be decoded
///
/// A disease is picked uniformly at random and treated as dominant, so the
/// result still has exactly one score above [`DOMINANT_THRESHOLD`].
pub fn fallback_probabilities<R: Rng + ?Sized>(rng: &mut R) -> (Disease, DiseaseProbabilities) {
    let disease = Disease::ALL[rng.gen_range(0..Disease::ALL.len())];
    let feature = match disease {
        Disease::PancreaticCancer => DominantFeature::CancerLike,
        Disease::PancreaticCysts => DominantFeature::CystLike,
        Disease::AcutePancreatitis => DominantFeature::AcuteLike,
        Disease::ChronicPancreatitis => DominantFeature::ChronicLike,
    };
    (disease, map_probabilities(feature, rng))
}

/// Disease with the highest score
pub fn top_disease(scores: &DiseaseProbabilities) -> Option<(Disease, f32)> {
    scores
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(d, p)| (*d, *p))
}

/// Nudge scores that sit within `MIN_SEPARATION` of their lower neighbour
fn separate<R: Rng + ?Sized>(scores: &mut DiseaseProbabilities, rng: &mut R) {
    let mut ordered: Vec<(Disease, f32)> = scores.iter().map(|(d, p)| (*d, *p)).collect();
    ordered.sort_by(|a, b| a.1.total_cmp(&b.1));

    for i in 1..ordered.len() {
        let below = ordered[i - 1].1;
        if ordered[i].1 - below < MIN_SEPARATION {
            let nudged = below + rng.gen_range(NUDGE_RANGE);
            log::debug!(
                "Separating {} from neighbour: {:.4} -> {:.4}",
                ordered[i].0.key(),
                ordered[i].1,
                nudged
            );
            ordered[i].1 = nudged;
        }
    }

    scores.extend(ordered);
}

fn clamp_all(scores: &mut DiseaseProbabilities) {
    for p in scores.values_mut() {
        *p = p.clamp(MIN_PROBABILITY, MAX_PROBABILITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL_FEATURES: [DominantFeature; 5] = [
        DominantFeature::CancerLike,
        DominantFeature::CystLike,
        DominantFeature::AcuteLike,
        DominantFeature::ChronicLike,
        DominantFeature::Normal,
    ];

    fn dominant_count(scores: &DiseaseProbabilities) -> usize {
        scores.values().filter(|p| **p > DOMINANT_THRESHOLD).count()
    }

    #[test]
    fn test_scores_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..200 {
            for feature in ALL_FEATURES {
                let scores = map_probabilities(feature, &mut rng);
                assert_eq!(scores.len(), 4);
                for p in scores.values() {
                    assert!((MIN_PROBABILITY..=MAX_PROBABILITY).contains(p), "{} out of range", p);
                }
            }
        }
    }

    #[test]
    fn test_dominant_disease_boosted() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let scores = map_probabilities(DominantFeature::CancerLike, &mut rng);
            assert!(scores[&Disease::PancreaticCancer] >= 0.8);
            assert_eq!(dominant_count(&scores), 1);
            for (d, p) in &scores {
                if *d != Disease::PancreaticCancer {
                    assert!(*p < 0.2, "{} suppressed score too high: {}", d.key(), p);
                }
            }
        }
    }

    #[test]
    fn test_normal_stays_low() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let scores = map_probabilities(DominantFeature::Normal, &mut rng);
            assert_eq!(dominant_count(&scores), 0);
            assert!(scores.values().all(|p| *p < 0.25));
        }
    }

    #[test]
    fn test_scores_are_distinct() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            for feature in ALL_FEATURES {
                let mut values: Vec<f32> = map_probabilities(feature, &mut rng).into_values().collect();
                values.sort_by(f32::total_cmp);
                for pair in values.windows(2) {
                    assert!(pair[1] > pair[0], "tied scores {:?}", values);
                }
            }
        }
    }

    #[test]
    fn test_scores_do_not_sum_to_one() {
        let mut rng = StdRng::seed_from_u64(5);
        let scores = map_probabilities(DominantFeature::Normal, &mut rng);
        let total: f32 = scores.values().sum();
        assert!(total < 1.0);
    }

    #[test]
    fn test_same_seed_reproduces() {
        let a = map_probabilities(DominantFeature::AcuteLike, &mut StdRng::seed_from_u64(9));
        let b = map_probabilities(DominantFeature::AcuteLike, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_vary() {
        let a = map_probabilities(DominantFeature::AcuteLike, &mut StdRng::seed_from_u64(10));
        let b = map_probabilities(DominantFeature::AcuteLike, &mut StdRng::seed_from_u64(11));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fallback_has_single_dominant() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let (disease, scores) = fallback_probabilities(&mut rng);
            assert_eq!(dominant_count(&scores), 1);
            assert_eq!(top_disease(&scores).map(|t| t.0), Some(disease));
            seen.insert(disease);
        }
        assert_eq!(seen.len(), 4, "fallback should pick every disease eventually");
    }

    #[test]
    fn test_separate_breaks_exact_ties() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut scores: DiseaseProbabilities = Disease::ALL.into_iter().map(|d| (d, 0.05)).collect();
        separate(&mut scores, &mut rng);
        let mut values: Vec<f32> = scores.into_values().collect();
        values.sort_by(f32::total_cmp);
        assert_eq!(values[0], 0.05);
        for pair in values.windows(2) {
            assert!(pair[1] - pair[0] >= MIN_SEPARATION * 0.99);
        }
    }
}
