//! Engine configuration. Values are caller-supplied, constructed once with
//! every tunable explicit, and never mutated by the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables for similarity scoring and result shaping.
///
/// Weights are independent knobs in [0, 1]; they are not required to sum
/// to 1, so the combined lexical score is not normalized either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Upper bound on the returned list length.
    pub max_recommendations: usize,
    /// Minimum lexical similarity for a candidate to be considered.
    pub similarity_threshold: f64,
    pub genre_weight: f64,
    pub tag_weight: f64,
    pub artist_weight: f64,
    pub duration_weight: f64,
    /// Carried for the feature-vector path; the lexical formula does not
    /// consult it.
    pub popularity_weight: f64,
    /// Minimum diversity score a candidate must keep the selection at.
    /// Zero disables the diversity filter entirely.
    pub diversity_factor: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            max_recommendations: 10,
            similarity_threshold: 0.3,
            genre_weight: 0.2,
            tag_weight: 0.1,
            artist_weight: 0.25,
            duration_weight: 0.15,
            popularity_weight: 0.1,
            diversity_factor: 0.3,
        }
    }
}

impl SimilarityConfig {
    /// Reject out-of-range values before the config reaches the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_recommendations == 0 {
            return Err(ConfigError::ZeroMaxRecommendations);
        }
        check_unit("similarity_threshold", self.similarity_threshold)?;
        check_unit("genre_weight", self.genre_weight)?;
        check_unit("tag_weight", self.tag_weight)?;
        check_unit("artist_weight", self.artist_weight)?;
        check_unit("duration_weight", self.duration_weight)?;
        check_unit("popularity_weight", self.popularity_weight)?;
        check_unit("diversity_factor", self.diversity_factor)?;
        Ok(())
    }
}

/// Tunables for the near-duplicate detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateConfig {
    /// Minimum normalized title similarity for a fuzzy match.
    pub title_threshold: f64,
    /// Minimum normalized artist similarity for a fuzzy match.
    pub artist_threshold: f64,
    /// Carried alongside the other thresholds; no check consults it today.
    pub duration_threshold_ms: u64,
    /// How far back the exact-URL check looks.
    pub time_window_ms: u64,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            title_threshold: 0.85,
            artist_threshold: 0.8,
            duration_threshold_ms: 10_000,
            time_window_ms: 2 * 60 * 60 * 1000,
        }
    }
}

impl DuplicateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("title_threshold", self.title_threshold)?;
        check_unit("artist_threshold", self.artist_threshold)?;
        Ok(())
    }
}

/// Invalid configuration value supplied by the caller.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_recommendations must be positive")]
    ZeroMaxRecommendations,
    #[error("{field} must be within 0.0..=1.0, got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
