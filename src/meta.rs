//! Display metadata helpers for the playback layer: splitting raw
//! `"Artist - Title"` strings coming from scraped uploads, and formatting
//! durations and track labels. These feed the caches in [`crate::cache`].

use crate::track::Track;

/// Result of splitting a raw uploaded title.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitTitle {
    pub artist: Option<String>,
    pub title: Option<String>,
}

/// Split a raw track title into artist and title.
///
/// Common upload patterns:
/// 1. "Artist - Title"
/// 2. "Artist-Title" (no spaces)
/// 3. Just a title, no artist
///
/// Heuristic only; a title that legitimately contains dashes will confuse
/// it, which is why callers treat the result as a hint.
pub fn split_artist_title(raw: &str) -> SplitTitle {
    let raw = raw.trim();
    if raw.is_empty() {
        return SplitTitle::default();
    }

    let parts: Vec<&str> = raw.split(" - ").collect();
    if parts.len() == 2 {
        return SplitTitle {
            artist: Some(parts[0].trim().to_string()),
            title: Some(parts[1].trim().to_string()),
        };
    }

    // No spaced dash; try a bare dash. With multiple dashes assume the
    // first segment is the artist and the rest belongs to the title.
    if parts.len() < 2 {
        let dash_parts: Vec<&str> = raw.split('-').collect();
        if dash_parts.len() >= 2 {
            let artist = dash_parts[0].trim();
            let title = dash_parts[1..].join("-");
            if !artist.is_empty() && !title.trim().is_empty() {
                return SplitTitle {
                    artist: Some(artist.to_string()),
                    title: Some(title.trim().to_string()),
                };
            }
        }
    }

    SplitTitle {
        artist: None,
        title: Some(raw.to_string()),
    }
}

/// Format a millisecond duration as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// One-line display label: `Artist - Title (3:25)`.
pub fn display_label(track: &Track) -> String {
    format!(
        "{} - {} ({})",
        track.artist,
        track.title,
        format_duration(track.duration_ms)
    )
}
