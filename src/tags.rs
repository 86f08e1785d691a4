//! Tag/Genre Extraction Module
//!
//! Pulls coarse genre keywords out of track metadata (title, description,
//! artist name). This is keyword spotting against a fixed vocabulary, not
//! real genre classification: whatever the uploader wrote is what we get.

use std::collections::HashSet;

use crate::text;

/// Fixed genre/keyword vocabulary. Order matters: the first match becomes
/// the track's genre. Multi-word entries are matched as phrases.
pub const GENRE_VOCABULARY: &[&str] = &[
    "rock",
    "pop",
    "jazz",
    "blues",
    "metal",
    "punk",
    "indie",
    "folk",
    "country",
    "reggae",
    "reggaeton",
    "hip hop",
    "rap",
    "trap",
    "funk",
    "soul",
    "disco",
    "house",
    "techno",
    "trance",
    "dubstep",
    "electronic",
    "electro",
    "samba",
    "pagode",
    "forró",
    "sertanejo",
    "mpb",
    "axé",
    "bossa nova",
    "gospel",
    "classical",
    "orchestral",
    "acoustic",
    "instrumental",
    "lofi",
    "ambient",
];

/// Result of keyword extraction over a track's text fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTags {
    /// Deduplicated vocabulary matches, in vocabulary order.
    pub tags: Vec<String>,
    /// First vocabulary match, if any.
    pub genre: Option<String>,
}

/// Extract genre/tag keywords from a track's title, description, and artist.
///
/// Total function: unmatchable or empty input yields an empty tag set,
/// never an error.
pub fn extract_tags(
    title: &str,
    description: Option<&str>,
    artist: Option<&str>,
) -> ExtractedTags {
    let mut combined = String::from(title);
    if let Some(desc) = description {
        combined.push(' ');
        combined.push_str(desc);
    }
    if let Some(artist) = artist {
        combined.push(' ');
        combined.push_str(artist);
    }

    let normalized = text::normalize(&combined);
    let tokens: HashSet<String> = text::tokenize(&combined).into_iter().collect();

    let mut tags = Vec::new();
    for keyword in GENRE_VOCABULARY {
        let matched = if keyword.contains(' ') {
            normalized.contains(keyword)
        } else {
            tokens.contains(*keyword)
        };
        if matched {
            tags.push((*keyword).to_string());
        }
    }

    let genre = tags.first().cloned();
    ExtractedTags { tags, genre }
}
