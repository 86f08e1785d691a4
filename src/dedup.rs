//! Near-Duplicate Detector
//!
//! Decides whether a candidate track is a repeat of something recently
//! played in the same scope. Three checks run in fixed order and
//! short-circuit on the first hit: exact URL, fuzzy title+artist, artist
//! saturation. Anything else is not a duplicate.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::config::DuplicateConfig;
use crate::similarity::calculate_string_similarity;
use crate::text;
use crate::track::{DuplicateCheckResult, HistoryEntry, Track};

/// At most this many matched history entries are reported back.
const MAX_MATCHED_ENTRIES: usize = 3;

/// History entries by the same artist before a track counts as
/// artist saturation.
const ARTIST_SATURATION_COUNT: usize = 3;

/// Weight of the title in the fuzzy-match confidence blend.
const FUZZY_TITLE_WEIGHT: f64 = 0.7;
/// Weight of the artist in the fuzzy-match confidence blend.
const FUZZY_ARTIST_WEIGHT: f64 = 0.3;

/// Check a candidate track against recent history.
///
/// Fail-open: empty history is simply "not a duplicate", and no input can
/// make this return an error.
pub fn check_for_duplicate(
    track: &Track,
    recent_history: &[HistoryEntry],
    config: &DuplicateConfig,
) -> DuplicateCheckResult {
    check_for_duplicate_at(track, recent_history, config, unix_now_ms())
}

/// Same as [`check_for_duplicate`] with an explicit "now". The clock is a
/// parameter so the time-window behavior is testable.
pub fn check_for_duplicate_at(
    track: &Track,
    recent_history: &[HistoryEntry],
    config: &DuplicateConfig,
    now_ms: u64,
) -> DuplicateCheckResult {
    if let Some(result) = exact_url_match(track, recent_history, config, now_ms) {
        return result;
    }
    if let Some(result) = fuzzy_match(track, recent_history, config) {
        return result;
    }
    if let Some(result) = artist_saturation(track, recent_history) {
        return result;
    }
    DuplicateCheckResult::clean()
}

/// Check 1: the exact same URL was played within the time window.
fn exact_url_match(
    track: &Track,
    recent_history: &[HistoryEntry],
    config: &DuplicateConfig,
    now_ms: u64,
) -> Option<DuplicateCheckResult> {
    let matched: Vec<HistoryEntry> = recent_history
        .iter()
        .filter(|entry| {
            entry.url == track.url
                && now_ms.saturating_sub(entry.played_at) <= config.time_window_ms
        })
        .take(MAX_MATCHED_ENTRIES)
        .cloned()
        .collect();

    if matched.is_empty() {
        return None;
    }

    debug!(url = %track.url, "duplicate: exact URL match in history window");
    Some(DuplicateCheckResult {
        is_duplicate: true,
        reason: Some("This track was played recently".to_string()),
        matched: Some(matched),
        confidence: Some(1.0),
    })
}

/// Check 2: near-identical title and artist under edit distance.
///
/// Both thresholds must pass independently. Confidence is the best
/// combined similarity (`0.7*title + 0.3*artist`) among the matches.
fn fuzzy_match(
    track: &Track,
    recent_history: &[HistoryEntry],
    config: &DuplicateConfig,
) -> Option<DuplicateCheckResult> {
    let track_title = text::clean_title(&track.title);
    let track_artist = track.artist.to_lowercase();

    let mut matched: Vec<(HistoryEntry, f64)> = Vec::new();
    for entry in recent_history {
        let title_sim =
            calculate_string_similarity(&track_title, &text::clean_title(&entry.title));
        if title_sim < config.title_threshold {
            continue;
        }
        let artist_sim =
            calculate_string_similarity(&track_artist, &entry.artist.to_lowercase());
        if artist_sim < config.artist_threshold {
            continue;
        }
        let combined = FUZZY_TITLE_WEIGHT * title_sim + FUZZY_ARTIST_WEIGHT * artist_sim;
        matched.push((entry.clone(), combined));
    }

    if matched.is_empty() {
        return None;
    }

    let confidence = matched
        .iter()
        .map(|(_, combined)| *combined)
        .fold(0.0_f64, f64::max)
        .min(1.0);
    let best_title = matched
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(entry, _)| entry.title.clone())
        .unwrap_or_default();

    debug!(
        title = %track.title,
        confidence,
        matches = matched.len(),
        "duplicate: fuzzy title/artist match"
    );
    Some(DuplicateCheckResult {
        is_duplicate: true,
        reason: Some(format!(
            "Very similar to \"{}\" played recently ({:.0}% match)",
            best_title,
            confidence * 100.0
        )),
        matched: Some(
            matched
                .into_iter()
                .take(MAX_MATCHED_ENTRIES)
                .map(|(entry, _)| entry)
                .collect(),
        ),
        confidence: Some(confidence),
    })
}

/// Check 3: the artist dominates recent history even if no single track
/// repeats.
fn artist_saturation(track: &Track, recent_history: &[HistoryEntry]) -> Option<DuplicateCheckResult> {
    let artist = track.artist.trim().to_lowercase();
    if artist.is_empty() {
        return None;
    }

    let matches: Vec<&HistoryEntry> = recent_history
        .iter()
        .filter(|entry| entry.artist.trim().to_lowercase() == artist)
        .collect();

    if matches.len() < ARTIST_SATURATION_COUNT {
        return None;
    }

    debug!(artist = %track.artist, count = matches.len(), "duplicate: artist saturation");
    Some(DuplicateCheckResult {
        is_duplicate: true,
        reason: Some(format!(
            "\"{}\" was already played {} times recently",
            track.artist,
            matches.len()
        )),
        matched: Some(
            matches
                .into_iter()
                .take(MAX_MATCHED_ENTRIES)
                .cloned()
                .collect(),
        ),
        confidence: Some(0.6),
    })
}

fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: u64 = 1_700_000_000_000;

    fn track(title: &str, artist: &str, url: &str) -> Track {
        Track {
            id: "t".to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            duration_ms: 200_000,
            url: url.to_string(),
            ..Default::default()
        }
    }

    fn entry(title: &str, artist: &str, url: &str, played_at: u64) -> HistoryEntry {
        HistoryEntry {
            url: url.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            duration_ms: 200_000,
            played_at,
            scope: "guild-1".to_string(),
            played_by: None,
            auto_play: false,
        }
    }

    #[test]
    fn test_exact_url_match_full_confidence() {
        let candidate = track("Song A", "Artist X", "https://example.com/a");
        let history = vec![entry(
            "Song A",
            "Artist X",
            "https://example.com/a",
            NOW_MS - 60_000,
        )];
        let result = check_for_duplicate_at(
            &candidate,
            &history,
            &DuplicateConfig::default(),
            NOW_MS,
        );
        assert!(result.is_duplicate);
        assert_eq!(result.confidence, Some(1.0));
        assert_eq!(result.matched.map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_url_match_outside_window_ignored() {
        let config = DuplicateConfig::default();
        let candidate = track("Song A", "Artist X", "https://example.com/a");
        let history = vec![entry(
            "Song A",
            "Artist X",
            "https://example.com/a",
            NOW_MS - config.time_window_ms - 1,
        )];
        let result = check_for_duplicate_at(&candidate, &history, &config, NOW_MS);
        // The URL check misses, but the identical title/artist still trips
        // the fuzzy check.
        assert!(result.is_duplicate);
        assert!(result.confidence.unwrap() < 1.0 + 1e-9);
        assert!(result.reason.unwrap().contains("Very similar"));
    }

    #[test]
    fn test_fuzzy_match_on_decorated_title() {
        let candidate = track(
            "Song Alpha (Official Video)",
            "Artist X",
            "https://example.com/new",
        );
        let history = vec![entry(
            "Song Alpha",
            "Artist X",
            "https://example.com/old",
            NOW_MS - 60_000,
        )];
        let result = check_for_duplicate_at(
            &candidate,
            &history,
            &DuplicateConfig::default(),
            NOW_MS,
        );
        assert!(result.is_duplicate);
        // Cleaned titles are identical and artists equal: full confidence.
        assert!((result.confidence.unwrap() - 1.0).abs() < 1e-9);
        assert!(result.reason.unwrap().contains("100% match"));
    }

    #[test]
    fn test_fuzzy_requires_both_thresholds() {
        // Same title, entirely different artist: not a fuzzy duplicate.
        let candidate = track("Song Alpha", "Artist X", "https://example.com/new");
        let history = vec![entry(
            "Song Alpha",
            "Completely Other",
            "https://example.com/old",
            NOW_MS - 60_000,
        )];
        let result = check_for_duplicate_at(
            &candidate,
            &history,
            &DuplicateConfig::default(),
            NOW_MS,
        );
        assert!(!result.is_duplicate);
    }

    #[test]
    fn test_artist_saturation() {
        let candidate = track("Brand New Song", "Artist X", "https://example.com/new");
        let history = vec![
            entry("Old One", "Artist X", "https://example.com/1", NOW_MS - 100),
            entry("Old Two", "artist x", "https://example.com/2", NOW_MS - 200),
            entry("Old Three", "ARTIST X", "https://example.com/3", NOW_MS - 300),
            entry("Old Four", "Artist X", "https://example.com/4", NOW_MS - 400),
        ];
        let result = check_for_duplicate_at(
            &candidate,
            &history,
            &DuplicateConfig::default(),
            NOW_MS,
        );
        assert!(result.is_duplicate);
        assert_eq!(result.confidence, Some(0.6));
        assert_eq!(result.matched.map(|m| m.len()), Some(3));
    }

    #[test]
    fn test_two_plays_by_artist_is_fine() {
        let candidate = track("Brand New Song", "Artist X", "https://example.com/new");
        let history = vec![
            entry("Old One", "Artist X", "https://example.com/1", NOW_MS - 100),
            entry("Old Two", "Artist X", "https://example.com/2", NOW_MS - 200),
        ];
        let result = check_for_duplicate_at(
            &candidate,
            &history,
            &DuplicateConfig::default(),
            NOW_MS,
        );
        assert!(!result.is_duplicate);
    }

    #[test]
    fn test_empty_history_is_clean() {
        let candidate = track("Song A", "Artist X", "https://example.com/a");
        let result =
            check_for_duplicate_at(&candidate, &[], &DuplicateConfig::default(), NOW_MS);
        assert!(!result.is_duplicate);
        assert!(result.confidence.is_none());
        assert!(result.matched.is_none());
    }

    #[test]
    fn test_exact_match_takes_precedence_over_fuzzy() {
        let candidate = track("Song A", "Artist X", "https://example.com/a");
        let history = vec![
            entry("Song A", "Artist X", "https://example.com/other", NOW_MS - 50),
            entry("Song A", "Artist X", "https://example.com/a", NOW_MS - 60),
        ];
        let result = check_for_duplicate_at(
            &candidate,
            &history,
            &DuplicateConfig::default(),
            NOW_MS,
        );
        assert!(result.is_duplicate);
        assert_eq!(result.confidence, Some(1.0));
        assert_eq!(
            result.reason.as_deref(),
            Some("This track was played recently")
        );
        assert_eq!(result.matched.map(|m| m.len()), Some(1));
    }
}
