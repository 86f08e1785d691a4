//! Text normalization helpers shared by the tag extractor, the lexical
//! similarity calculator, and the near-duplicate detector.

use std::collections::HashSet;

/// Tokens at or below this length are discarded ("a", "the", "mix", ...).
const MIN_TOKEN_LEN: usize = 4;

/// Suffix noise commonly appended to uploaded track titles.
const TITLE_NOISE: &[&str] = &[
    "official video",
    "official music video",
    "official audio",
    "official lyric video",
    "lyric video",
    "lyrics",
    "visualizer",
    "audio",
];

/// Lowercase the text and replace every non-alphanumeric character with a
/// space. Keeps accented letters intact ("forró" survives).
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            for lc in c.to_lowercase() {
                out.push(lc);
            }
        } else {
            out.push(' ');
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tokenize a text field: lowercase, strip non-word characters, split on
/// whitespace, drop short tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(|t| t.to_string())
        .collect()
}

/// Lowercased whitespace-separated word set, punctuation kept. Used for
/// Jaccard title comparison where "(remix)" should stay a distinct word.
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect()
}

/// Strip formatting noise from a track title before fuzzy comparison:
/// bracketed annotations, "official video"-style suffixes, punctuation.
///
/// "Song A (Official Video) [HD]" and "song a" normalize to the same string,
/// which is the whole point: uploads of the same song differ mostly in
/// decoration, not in the words themselves.
pub fn clean_title(title: &str) -> String {
    // Drop bracketed segments, tracking nesting depth.
    let mut stripped = String::with_capacity(title.len());
    let mut depth = 0i32;
    for c in title.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth > 0 {
                    depth -= 1;
                }
            }
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    let mut cleaned = normalize(&stripped);
    for noise in TITLE_NOISE {
        if let Some(rest) = cleaned.strip_suffix(*noise) {
            cleaned = rest.trim_end().to_string();
        }
    }
    cleaned.trim().to_string()
}
