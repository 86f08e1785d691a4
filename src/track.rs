//! Core data model: engine inputs supplied by the playback layer and the
//! result types handed back to it.

use serde::{Deserialize, Serialize};

use crate::tags;

/// Fallback title for tracks whose metadata came back empty.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Fallback artist for tracks whose metadata came back empty.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A playable track as supplied by the catalog provider. Input-only: the
/// engine never mutates or stores these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Duration in milliseconds. Zero means unknown.
    pub duration_ms: u64,
    pub url: String,
    pub thumbnail: Option<String>,
    pub view_count: Option<u64>,
    pub requested_by: Option<String>,
}

impl Track {
    /// Stable identity for exclusion and merge logic: the identifier when
    /// present, the URL otherwise.
    pub fn key(&self) -> &str {
        if self.id.is_empty() {
            &self.url
        } else {
            &self.id
        }
    }
}

/// One recently played item from the history store. Read-only input,
/// ordered newest-first by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub artist: String,
    pub duration_ms: u64,
    /// Unix timestamp in milliseconds.
    pub played_at: u64,
    /// Guild/channel the entry belongs to.
    pub scope: String,
    pub played_by: Option<String>,
    /// True when the entry was queued automatically rather than by a user.
    pub auto_play: bool,
}

/// Aggregated listener preferences, used to seed recommendations when no
/// concrete track is available.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceSummary {
    pub top_genre: Option<String>,
    pub top_artist: Option<String>,
    pub avg_duration_secs: f64,
}

/// Normalized seed descriptor the scoring pipeline operates on.
///
/// Every entry mode funnels into one of the constructors below, so the
/// similarity calculators and the feature vector builder never need to know
/// whether a seed was a real track, a history entry, or a synthetic
/// preference aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackProfile {
    pub key: String,
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub tags: Vec<String>,
    pub duration_ms: u64,
    pub popularity: Option<u64>,
}

impl TrackProfile {
    fn build(
        key: String,
        title: &str,
        artist: &str,
        duration_ms: u64,
        popularity: Option<u64>,
    ) -> Self {
        // Malformed input is coerced, never rejected.
        let title = if title.trim().is_empty() {
            UNKNOWN_TITLE.to_string()
        } else {
            title.to_string()
        };
        let artist = if artist.trim().is_empty() {
            UNKNOWN_ARTIST.to_string()
        } else {
            artist.to_string()
        };

        let extracted = tags::extract_tags(&title, None, Some(&artist));
        Self {
            key,
            title,
            artist,
            genre: extracted.genre,
            tags: extracted.tags,
            duration_ms,
            popularity,
        }
    }

    pub fn from_track(track: &Track) -> Self {
        Self::build(
            track.key().to_string(),
            &track.title,
            &track.artist,
            track.duration_ms,
            track.view_count,
        )
    }

    pub fn from_history(entry: &HistoryEntry) -> Self {
        Self::build(
            entry.url.clone(),
            &entry.title,
            &entry.artist,
            entry.duration_ms,
            None,
        )
    }

    /// Seed profile for preference-based recommendations. The top genre
    /// doubles as the title so keyword extraction recovers it as the
    /// profile's genre; average duration arrives in seconds and is widened
    /// to milliseconds here.
    pub fn from_preferences(preferences: &PreferenceSummary) -> Self {
        let title = preferences.top_genre.clone().unwrap_or_default();
        let artist = preferences.top_artist.clone().unwrap_or_default();
        let duration_ms = (preferences.avg_duration_secs.max(0.0) * 1000.0) as u64;
        Self::build("preference-seed".to_string(), &title, &artist, duration_ms, None)
    }
}

/// A recommended candidate with its blended score and the reasons it was
/// picked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub track: Track,
    /// Blended lexical/vector score, clamped to [0, 1].
    pub score: f64,
    /// Human-readable reasons, never empty.
    pub reasons: Vec<String>,
}

/// Outcome of a near-duplicate check against recent history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    pub is_duplicate: bool,
    pub reason: Option<String>,
    /// Matching history entries, at most 3.
    pub matched: Option<Vec<HistoryEntry>>,
    /// Confidence in [0, 1] when a check fired.
    pub confidence: Option<f64>,
}

impl DuplicateCheckResult {
    /// The negative result every failed check falls through to.
    pub fn clean() -> Self {
        Self::default()
    }
}
