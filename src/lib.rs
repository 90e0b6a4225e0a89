//! PriceMatch - product identity resolution for price comparison
//!
//! Decides whether product listings scraped from different retailers
//! refer to the same physical product ("iPhone 13 128GB Xanh" vs
//! "Apple iPhone 13 128GB (Blue)"), so their prices can be compared
//! apples-to-apples.
//!
//! # Features
//! - TF-IDF weighted cosine similarity over a whole catalog in one batch
//! - Normalized Levenshtein edit distance for character-level checks
//! - A match decision layer that exposes both scores
//! - Parallel candidate scoring for large catalogs
//!
//! # Example
//! ```
//! use pricematch::{Catalog, Listing, Matcher};
//!
//! let listings = vec![
//!     Listing {
//!         name: "iPhone 13 128GB (Blue)".into(),
//!         price: 18_990_000,
//!         old_price: 21_990_000,
//!         source: "cps".into(),
//!     },
//!     Listing {
//!         name: "Samsung Galaxy S21".into(),
//!         price: 15_990_000,
//!         old_price: 0,
//!         source: "hhm".into(),
//!     },
//! ];
//! let (catalog, skipped) = Catalog::from_listings(listings);
//! assert!(skipped.is_empty());
//!
//! let matcher = Matcher::new();
//! let best = matcher.find_best_match("iphone 13 128gb", &catalog).unwrap().unwrap();
//! assert_eq!(catalog.payload(best.index).unwrap().source, "cps");
//! ```

pub mod algorithms;
pub mod catalog;
pub mod matcher;

use thiserror::Error;

pub use algorithms::levenshtein::{edit_distance, edit_ratio, Levenshtein};
pub use algorithms::normalize::normalize_name;
pub use algorithms::tfidf::{build_similarity, SimilarityMatrix};
pub use algorithms::{EditDistance, Similarity};
pub use catalog::{Catalog, Listing, ProductName, SkipReason, Skipped};
pub use matcher::{MatchResult, Matcher, MatcherConfig};

// ============================================================================
// Constants
// ============================================================================

/// Minimum input size for parallel processing.
///
/// For inputs smaller than this threshold, sequential processing is faster
/// due to the overhead of thread pool coordination. Product catalogs are
/// typically a few hundred entries per retailer, so the parallel path is
/// the common one for full-catalog comparisons.
pub(crate) const PARALLEL_THRESHOLD: usize = 100;

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by the matching core.
///
/// All of these are malformed-input conditions at the caller's boundary;
/// pure computation over well-formed strings cannot fail, is never retried
/// and never produces a partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The similarity matrix was requested for an empty corpus
    #[error("corpus must contain at least one document")]
    EmptyCorpus,

    /// The query normalized to the empty string
    #[error("query is empty after normalization")]
    EmptyQuery,

    /// The catalog has no entries to match against
    #[error("catalog must contain at least one entry")]
    EmptyCatalog,
}
