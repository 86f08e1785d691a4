//! Recommendation Engine
//!
//! Three entry modes (seed track, aggregated preferences, listening
//! history) funneling into one base scan: lexical-filter the candidate
//! pool, blend lexical and vector similarity, attach reasons, rank,
//! diversify, truncate.
//!
//! Fail-open by design: every public function is total. Empty pools, empty
//! history, and degenerate metadata all degrade to an empty list, never an
//! error. Callers can fire these on every queue refill without guarding.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::debug;

use crate::config::SimilarityConfig;
use crate::diversity::apply_diversity_filter;
use crate::features::build_feature_vector;
use crate::similarity::{calculate_track_similarity, calculate_vector_similarity};
use crate::track::{
    HistoryEntry, PreferenceSummary, RecommendationResult, Track, TrackProfile,
};

/// Absolute duration difference under which two tracks count as
/// "similar duration" for reason reporting.
const SIMILAR_DURATION_MS: u64 = 30_000;

/// How many history entries beyond the most recent contribute secondary
/// seeds in history-based mode.
const MAX_SECONDARY_SEEDS: usize = 4;

const REASON_VERY_SIMILAR: &str = "Very similar to the current track";
const REASON_SIMILAR_STYLE: &str = "Similar style";
const REASON_LISTENING_PATTERNS: &str = "Matches your listening patterns";
const REASON_SAME_ARTIST: &str = "Same artist";
const REASON_SIMILAR_DURATION: &str = "Similar duration";
const REASON_FALLBACK: &str = "Based on your listening";

/// Recommend candidates similar to a seed track.
///
/// Candidates whose id or URL appears in `exclude_ids` are skipped; the
/// returned list is score-sorted descending, diversity-filtered, and at
/// most `config.max_recommendations` long.
pub fn generate_recommendations(
    seed: &Track,
    candidates: &[Track],
    config: &SimilarityConfig,
    exclude_ids: &HashSet<String>,
) -> Vec<RecommendationResult> {
    let profile = TrackProfile::from_track(seed);
    recommend_for_profile(&profile, candidates, config, exclude_ids)
}

/// Recommend candidates matching an aggregated preference summary.
///
/// The summary is normalized into a seed profile (top genre as the title
/// so keyword extraction recovers it, average duration widened to
/// milliseconds) and run through the same scan as a real seed track.
pub fn generate_user_preference_recommendations(
    preferences: &PreferenceSummary,
    candidates: &[Track],
    config: &SimilarityConfig,
    exclude_ids: &HashSet<String>,
) -> Vec<RecommendationResult> {
    let profile = TrackProfile::from_preferences(preferences);
    recommend_for_profile(&profile, candidates, config, exclude_ids)
}

/// Recommend candidates based on recent listening history (newest first).
///
/// The most recent entry is the primary seed. Up to [`MAX_SECONDARY_SEEDS`]
/// older entries contribute secondary recommendation lists that are merged
/// in by track key: a track seen twice keeps the average of both scores and
/// the union of reasons. Empty history yields an empty list.
pub fn generate_history_based_recommendations(
    recent_history: &[HistoryEntry],
    candidates: &[Track],
    config: &SimilarityConfig,
    exclude_ids: &HashSet<String>,
) -> Vec<RecommendationResult> {
    let Some(primary) = recent_history.first() else {
        return Vec::new();
    };

    let primary_profile = TrackProfile::from_history(primary);
    let mut merged = recommend_for_profile(&primary_profile, candidates, config, exclude_ids);

    if recent_history.len() > 1 {
        let mut index: HashMap<String, usize> = merged
            .iter()
            .enumerate()
            .map(|(i, r)| (r.track.key().to_string(), i))
            .collect();

        for entry in recent_history[1..].iter().take(MAX_SECONDARY_SEEDS) {
            let profile = TrackProfile::from_history(entry);
            let secondary = recommend_for_profile(&profile, candidates, config, exclude_ids);

            for result in secondary {
                let key = result.track.key().to_string();
                match index.get(&key) {
                    Some(&i) => {
                        let existing = &mut merged[i];
                        existing.score = (existing.score + result.score) / 2.0;
                        existing.reasons.extend(result.reasons);
                    }
                    None => {
                        index.insert(key, merged.len());
                        merged.push(result);
                    }
                }
            }
        }

        sort_by_score(&mut merged);
        merged.truncate(config.max_recommendations);
    }

    merged
}

/// The base scan every mode funnels into.
fn recommend_for_profile(
    seed: &TrackProfile,
    candidates: &[Track],
    config: &SimilarityConfig,
    exclude_ids: &HashSet<String>,
) -> Vec<RecommendationResult> {
    let seed_vector = build_feature_vector(seed);

    let mut results: Vec<RecommendationResult> = candidates
        .par_iter()
        .filter(|candidate| {
            !exclude_ids.contains(candidate.id.as_str())
                && !exclude_ids.contains(candidate.url.as_str())
        })
        .filter_map(|candidate| {
            let profile = TrackProfile::from_track(candidate);
            let lexical = calculate_track_similarity(seed, &profile, config);
            if lexical < config.similarity_threshold {
                return None;
            }

            let vector =
                calculate_vector_similarity(&seed_vector, &build_feature_vector(&profile));
            let score = ((lexical + vector) / 2.0).clamp(0.0, 1.0);
            let reasons = build_reasons(seed, &profile, lexical, vector);

            Some(RecommendationResult {
                track: candidate.clone(),
                score,
                reasons,
            })
        })
        .collect();

    sort_by_score(&mut results);
    let mut results = apply_diversity_filter(results, config);
    results.truncate(config.max_recommendations);

    debug!(
        seed = %seed.key,
        pool = candidates.len(),
        returned = results.len(),
        threshold = config.similarity_threshold,
        "recommendation scan complete"
    );
    results
}

fn build_reasons(
    seed: &TrackProfile,
    candidate: &TrackProfile,
    lexical: f64,
    vector: f64,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if lexical > 0.8 {
        reasons.push(REASON_VERY_SIMILAR.to_string());
    } else if lexical > 0.6 {
        reasons.push(REASON_SIMILAR_STYLE.to_string());
    }
    if vector > 0.7 {
        reasons.push(REASON_LISTENING_PATTERNS.to_string());
    }
    if seed.artist == candidate.artist {
        reasons.push(REASON_SAME_ARTIST.to_string());
    }
    if seed.duration_ms.abs_diff(candidate.duration_ms) < SIMILAR_DURATION_MS {
        reasons.push(REASON_SIMILAR_DURATION.to_string());
    }
    if reasons.is_empty() {
        reasons.push(REASON_FALLBACK.to_string());
    }
    reasons
}

fn sort_by_score(results: &mut [RecommendationResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
