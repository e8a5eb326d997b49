//! Plausibility filter for unrecognized input.
//!
//! Library scans hand us folder names as titles. When nothing recognizable
//! is found we only forward the raw text to providers if it still looks like
//! an identifier: short, and made of letters, digits, dashes, underscores
//! and spaces.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse;

/// Longest raw text that may be used as a search key.
pub const MAX_RAW_KEY_LEN: usize = 12;

static KEY_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[-_ a-z0-9]+$").unwrap());

/// Returns `true` when `text` may be sent to providers verbatim.
pub fn is_plausible_key(text: &str) -> bool {
    text.chars().count() <= MAX_RAW_KEY_LEN && KEY_CHARS.is_match(text)
}

/// Resolve the key that providers should be queried with.
///
/// Prefers a recognized identifier, falls back to the raw text when it is
/// plausible, and returns `None` otherwise.
pub fn search_key(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    match parse(text) {
        Some(id) => Some(id.id),
        None if is_plausible_key(text) => Some(text.to_string()),
        None => None,
    }
}
