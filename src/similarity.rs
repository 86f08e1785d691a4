//! Similarity Calculators
//!
//! Two families of primitives: lexical comparison between track profiles
//! (weighted multi-factor sum) and numeric comparison between feature
//! vectors (cosine with a genre bonus). Plus the edit-distance string
//! similarity the near-duplicate detector is built on.

use crate::config::SimilarityConfig;
use crate::features::FeatureVector;
use crate::text;
use crate::track::TrackProfile;

/// Weight of the title sub-score in the lexical blend. A design constant,
/// deliberately not part of [`SimilarityConfig`].
pub const TITLE_WEIGHT: f64 = 0.2;

// TODO: genre and tag comparison still return fixed placeholders even though
// tag overlap is computed for the feature vector. Wiring a real overlap score
// in here shifts every blended score, so it needs a deliberate rollout.
const GENRE_SIMILARITY_STUB: f64 = 0.5;
const TAG_SIMILARITY_STUB: f64 = 0.3;

/// Weighted multi-factor lexical similarity between two track profiles.
///
/// `0.2*title + artist_weight*artist + genre_weight*genre +
/// duration_weight*duration + tag_weight*tags`. Sub-scores are each in
/// [0, 1]; the sum is not clamped.
pub fn calculate_track_similarity(
    a: &TrackProfile,
    b: &TrackProfile,
    config: &SimilarityConfig,
) -> f64 {
    TITLE_WEIGHT * title_similarity(&a.title, &b.title)
        + config.artist_weight * artist_similarity(&a.artist, &b.artist)
        + config.genre_weight * GENRE_SIMILARITY_STUB
        + config.duration_weight * duration_similarity(a.duration_ms, b.duration_ms)
        + config.tag_weight * TAG_SIMILARITY_STUB
}

/// 1.0 on case-insensitive equality, otherwise Jaccard over whitespace
/// word sets.
fn title_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim();
    let b = b.trim();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.eq_ignore_ascii_case(b) {
        return 1.0;
    }

    let words_a = text::word_set(a);
    let words_b = text::word_set(b);
    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Tiered artist comparison: exact 1.0, substring containment 0.8,
/// otherwise up to 0.6 scaled by the shared-word fraction.
fn artist_similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(&b) || b.contains(&a) {
        return 0.8;
    }

    let words_a = text::word_set(&a);
    let words_b = text::word_set(&b);
    let shared = words_a.intersection(&words_b).count();
    if shared == 0 {
        return 0.0;
    }
    let larger = words_a.len().max(words_b.len());
    0.6 * (shared as f64 / larger as f64)
}

/// Ratio of the shorter duration to the longer. 0.5 when either side is
/// unknown: zero information, neutral score.
fn duration_similarity(a_ms: u64, b_ms: u64) -> f64 {
    if a_ms == 0 || b_ms == 0 {
        return 0.5;
    }
    let min = a_ms.min(b_ms) as f64;
    let max = a_ms.max(b_ms) as f64;
    min / max
}

/// Normalized edit-distance similarity: `(max_len - distance) / max_len`.
/// Symmetric, 1.0 for identical strings.
pub fn calculate_string_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Cosine similarity between two raw vectors. Zero when lengths differ or
/// either norm is zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Cosine similarity between two feature vectors, with a flat 0.2 bonus
/// when both carry the same non-empty genre. Capped at 1.0.
pub fn calculate_vector_similarity(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let mut score = cosine_similarity(&a.values, &b.values);
    if let (Some(genre_a), Some(genre_b)) = (&a.profile.genre, &b.profile.genre) {
        if !genre_a.is_empty() && genre_a == genre_b {
            score += 0.2;
        }
    }
    score.min(1.0)
}

/// Euclidean distance between two vectors of equal length.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return f64::MAX;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left as-is.
pub fn l2_normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}
