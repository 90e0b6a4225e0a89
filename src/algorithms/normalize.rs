//! Product-name normalization
//!
//! Retailers case, punctuate and space the same product differently:
//! "iPhone 13 128GB (Blue)", "iphone-13 128gb blue", " IPHONE 13 128GB
//! Blue ". Every name entering the matcher goes through the same
//! canonical pipeline so that none of those differences survive into
//! the similarity scores.

use unicode_normalization::UnicodeNormalization;

/// Canonical product-name normalization.
///
/// NFKD compatibility fold, lowercase, ASCII punctuation mapped to
/// spaces (so "iphone-13" tokenizes like "iphone 13"), then whitespace
/// collapsed and trimmed. Pure function; may return an empty string if
/// nothing survives.
#[must_use]
pub fn normalize_name(s: &str) -> String {
    let folded: String = s.nfkd().collect();
    let spaced: String = folded
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
