//! Levenshtein (edit) distance
//!
//! Classic dynamic-programming formulation over Unicode scalar values.
//! The full `(|s|+1) x (|t|+1)` table collapses to two rolling rows, so
//! only O(min(m, n)) cells are live at a time; the computed values are
//! identical to the full table.
//!
//! # Complexity
//! - Time: O(m*n), no early termination
//! - Space: O(min(m, n))

use super::EditDistance;
use smallvec::SmallVec;

/// Levenshtein distance calculator.
///
/// Stateless; exists so the metric can flow through [`EditDistance`] /
/// [`Similarity`](super::Similarity) trait objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl Levenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        edit_distance(a, b)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Compute the Levenshtein distance between two strings.
///
/// Counts the minimum number of single-character insertions, deletions
/// and substitutions needed to turn `a` into `b`. Comparison is exact:
/// no case folding or normalization happens here.
///
/// # Example
/// ```
/// use pricematch::edit_distance;
///
/// assert_eq!(edit_distance("kitten", "sitting"), 3);
/// assert_eq!(edit_distance("iphone 13", "iphone 13"), 0);
/// ```
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: SmallVec<[char; 64]> = a.chars().collect();
    let b_chars: SmallVec<[char; 64]> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    // Deleting or inserting every character of the non-empty string
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Keep the shorter string on the row axis
    let (target, source) = if m < n {
        (&a_chars[..], &b_chars[..])
    } else {
        (&b_chars[..], &a_chars[..])
    };
    let n_target = target.len();

    // Row 0 holds the base case: distance from the empty prefix
    let mut row: SmallVec<[usize; 64]> = (0..=n_target).collect();

    for (i, &sc) in source.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;

        for j in 0..n_target {
            let cost = if sc == target[j] { 0 } else { 1 };
            let deletion = row[j + 1] + 1;
            let insertion = row[j] + 1;
            let substitution = prev + cost;

            prev = row[j + 1];
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
    }

    row[n_target]
}

/// Normalized Levenshtein similarity (0.0 to 1.0).
///
/// `1 - distance / max(|a|, |b|)`. Two empty strings have nothing to edit
/// and score 1.0; that case is handled explicitly rather than dividing by
/// zero.
///
/// # Example
/// ```
/// use pricematch::edit_ratio;
///
/// assert_eq!(edit_ratio("", ""), 1.0);
/// assert!(edit_ratio("iphone 13 xanh", "iphone 13 blue") > 0.7);
/// ```
#[inline]
#[must_use]
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    let dist = edit_distance(a, b);
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        1.0
    } else {
        1.0 - (dist as f64 / max_len as f64)
    }
}
