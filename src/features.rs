//! Feature Vector Builder
//!
//! Encodes a track profile as a fixed-length numeric vector for cosine
//! comparison. Deterministic and pure; callers that need to compare one
//! vector against many should build it once and reuse it.

use crate::track::TrackProfile;

/// Number of entries in every feature vector. Changing this constant
/// requires recomputing all cached vectors.
pub const FEATURE_DIM: usize = 13;

const TITLE_LEN_CAP: f64 = 50.0;
const ARTIST_LEN_CAP: f64 = 30.0;
const DURATION_CAP_MS: f64 = 300_000.0;
const SHORT_TRACK_MS: u64 = 120_000;
const GENRE_LEN_CAP: f64 = 20.0;
const TAG_COUNT_CAP: f64 = 10.0;
const POPULARITY_CAP: f64 = 1_000_000.0;

/// A track profile together with its numeric encoding.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    pub profile: TrackProfile,
    /// Exactly [`FEATURE_DIM`] normalized values.
    pub values: Vec<f64>,
}

/// Build the numeric encoding for a profile.
///
/// Feature order: title length, remix flag, cover flag, artist length,
/// featured-artist flag, duration, short-track flag, has-genre flag, genre
/// length, tag count, instrumental tag, acoustic tag, popularity.
pub fn build_feature_vector(profile: &TrackProfile) -> FeatureVector {
    let title_lower = profile.title.to_lowercase();

    let values = vec![
        unit(profile.title.chars().count() as f64 / TITLE_LEN_CAP),
        flag(title_lower.contains("remix")),
        flag(title_lower.contains("cover")),
        unit(profile.artist.chars().count() as f64 / ARTIST_LEN_CAP),
        flag(title_lower.contains("feat.") || title_lower.contains("ft.")),
        unit(profile.duration_ms as f64 / DURATION_CAP_MS),
        flag(profile.duration_ms > 0 && profile.duration_ms < SHORT_TRACK_MS),
        flag(profile.genre.is_some()),
        profile
            .genre
            .as_ref()
            .map(|g| unit(g.chars().count() as f64 / GENRE_LEN_CAP))
            .unwrap_or(0.0),
        unit(profile.tags.len() as f64 / TAG_COUNT_CAP),
        flag(profile.tags.iter().any(|t| t == "instrumental")),
        flag(profile.tags.iter().any(|t| t == "acoustic")),
        profile
            .popularity
            .map(|v| unit(v as f64 / POPULARITY_CAP))
            .unwrap_or(0.0),
    ];

    debug_assert_eq!(values.len(), FEATURE_DIM);
    FeatureVector {
        profile: profile.clone(),
        values,
    }
}

fn unit(value: f64) -> f64 {
    value.min(1.0)
}

fn flag(set: bool) -> f64 {
    if set {
        1.0
    } else {
        0.0
    }
}
