//! Diversity Filter
//!
//! Greedy pruning of a score-sorted recommendation list: a candidate is
//! kept only while the selection stays diverse enough on average. Keeps the
//! incoming score order for everything it accepts.

use tracing::debug;

use crate::config::SimilarityConfig;
use crate::similarity::calculate_track_similarity;
use crate::track::{RecommendationResult, TrackProfile};
use std::collections::HashSet;

/// Diversity of a set of profiles: one minus the average pairwise lexical
/// similarity. A singleton (or empty) set is fully diverse.
pub fn calculate_diversity_score(profiles: &[TrackProfile], config: &SimilarityConfig) -> f64 {
    if profiles.len() < 2 {
        return 1.0;
    }
    let mut total = 0.0;
    let mut pairs = 0u32;
    for i in 0..profiles.len() {
        for j in (i + 1)..profiles.len() {
            total += calculate_track_similarity(&profiles[i], &profiles[j], config);
            pairs += 1;
        }
    }
    1.0 - total / pairs as f64
}

/// Walk a score-sorted list and keep each candidate only if adding it
/// leaves the average pairwise diversity at or above
/// `config.diversity_factor`. Rejected candidates are dropped, not
/// deferred.
///
/// A factor of zero (or a list of at most one entry) is a passthrough.
/// Factors near 1 demand near-total dissimilarity and can empty the tail
/// of the list entirely.
pub fn apply_diversity_filter(
    results: Vec<RecommendationResult>,
    config: &SimilarityConfig,
) -> Vec<RecommendationResult> {
    if results.len() <= 1 || config.diversity_factor <= 0.0 {
        return results;
    }

    let incoming = results.len();
    let mut selected: Vec<TrackProfile> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<RecommendationResult> = Vec::new();

    for result in results {
        let key = result.track.key().to_string();
        if !seen.insert(key) {
            continue;
        }

        let profile = TrackProfile::from_track(&result.track);
        selected.push(profile);
        let score = calculate_diversity_score(&selected, config);
        if score >= config.diversity_factor {
            kept.push(result);
        } else {
            selected.pop();
        }
    }

    if kept.len() < incoming {
        debug!(
            incoming,
            kept = kept.len(),
            factor = config.diversity_factor,
            "diversity filter pruned recommendations"
        );
    }
    kept
}
