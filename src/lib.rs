//! Content-based track recommendation and near-duplicate detection.
//!
//! Pure, synchronous scoring over caller-supplied data: the playback layer
//! fetches the candidate pool and history window, then calls in here.
//! Nothing in this crate performs I/O, and every public entry point is
//! fail-open: degenerate input degrades to an empty or negative result
//! instead of an error.
//!
//! The three recommendation modes (seed track, aggregated preferences,
//! listening history) share one scoring pipeline; the near-duplicate
//! detector shares only the string-similarity primitive and runs
//! independently of the feature-vector path.

pub mod cache;
pub mod config;
pub mod dedup;
pub mod diversity;
pub mod engine;
pub mod features;
pub mod meta;
pub mod similarity;
pub mod tags;
pub mod text;
pub mod track;

pub use cache::{spawn_sweeper, MetadataCache, DEFAULT_SWEEP_INTERVAL};
pub use config::{ConfigError, DuplicateConfig, SimilarityConfig};
pub use dedup::{check_for_duplicate, check_for_duplicate_at};
pub use diversity::{apply_diversity_filter, calculate_diversity_score};
pub use engine::{
    generate_history_based_recommendations, generate_recommendations,
    generate_user_preference_recommendations,
};
pub use features::{build_feature_vector, FeatureVector, FEATURE_DIM};
pub use similarity::{
    calculate_string_similarity, calculate_track_similarity, calculate_vector_similarity,
    cosine_similarity, euclidean_distance, l2_normalize,
};
pub use tags::{extract_tags, ExtractedTags};
pub use track::{
    DuplicateCheckResult, HistoryEntry, PreferenceSummary, RecommendationResult, Track,
    TrackProfile,
};
