//! Match decision layer
//!
//! Scores a query against a catalog with both strategies and picks a
//! winner. TF-IDF cosine similarity over the combined corpus is the
//! primary signal; the normalized edit-distance ratio breaks near-ties
//! and is reported alongside, so the serving layer can apply its own
//! policy from the raw scores.

use crate::algorithms::levenshtein::edit_ratio;
use crate::algorithms::tfidf::build_similarity;
use crate::catalog::{Catalog, ProductName};
use crate::{MatchError, PARALLEL_THRESHOLD};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tunable knobs for the match decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum vector score for a confident match. Below it,
    /// [`Matcher::find_best_match`] reports "no confident match" instead
    /// of a forced best guess. At the default 0.0 the matcher always
    /// returns the arithmetic best, scoring 0.0 on a degenerate catalog.
    pub min_score: f64,

    /// Candidates whose vector score is within this distance of the
    /// leader count as tied and are re-ranked by edit ratio.
    pub tie_epsilon: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            tie_epsilon: 0.02,
        }
    }
}

/// Best match for a query: the winning catalog index plus both scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Index into the catalog this result was computed against
    pub index: usize,
    /// TF-IDF cosine similarity between query and candidate (primary signal)
    pub vector_score: f64,
    /// Normalized Levenshtein similarity between query and candidate
    pub edit_ratio: f64,
}

impl MatchResult {
    /// The primary score used for ranking and thresholding.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.vector_score
    }
}

/// Product matcher combining vector and edit-distance similarity.
///
/// Stateless apart from its configuration: every call rebuilds the
/// similarity statistics from the catalog snapshot it is given, so
/// concurrent calls against the same catalog need no coordination.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    /// Matcher with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: MatcherConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Find the best-matching catalog entry for `query`.
    ///
    /// The query is normalized, appended to the catalog's names to form
    /// an `N+1` corpus, and scored against every candidate with both
    /// strategies. Selection policy, fixed and tested: highest vector
    /// score wins; candidates within `tie_epsilon` of the leader are
    /// re-ranked by edit ratio; remaining ties go to the lowest catalog
    /// index. A winner whose vector score is below `min_score` comes back
    /// as `Ok(None)` - no confident match.
    ///
    /// # Errors
    /// [`MatchError::EmptyQuery`] if `query` normalizes to nothing,
    /// [`MatchError::EmptyCatalog`] if `catalog` has no entries.
    pub fn find_best_match<T>(
        &self,
        query: &str,
        catalog: &Catalog<T>,
    ) -> Result<Option<MatchResult>, MatchError> {
        let scored = self.score_all(query, catalog)?;

        let leader = scored
            .iter()
            .map(|r| r.vector_score)
            .fold(f64::MIN, f64::max);
        let epsilon = self.config.tie_epsilon.max(0.0);

        let winner = scored
            .iter()
            .filter(|r| leader - r.vector_score <= epsilon)
            .max_by(|a, b| {
                a.edit_ratio
                    .partial_cmp(&b.edit_ratio)
                    .unwrap_or(Ordering::Equal)
                    // On equal edit ratios the lower index wins
                    .then_with(|| b.index.cmp(&a.index))
            })
            .copied();

        match winner {
            Some(best) if best.vector_score >= self.config.min_score => {
                debug!(
                    "best candidate {} scored {:.3} (edit ratio {:.3})",
                    best.index, best.vector_score, best.edit_ratio
                );
                Ok(Some(best))
            }
            Some(best) => {
                debug!(
                    "no confident match: best score {:.3} below min_score {:.3}",
                    best.vector_score, self.config.min_score
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Score every catalog entry against `query`, best first.
    ///
    /// Ordering: vector score descending, then edit ratio, then catalog
    /// index. The `tie_epsilon` re-rank of [`Self::find_best_match`] is
    /// not applied here; callers get the raw scores and can impose their
    /// own policy.
    ///
    /// # Errors
    /// Same conditions as [`Self::find_best_match`].
    pub fn rank<T>(
        &self,
        query: &str,
        catalog: &Catalog<T>,
    ) -> Result<Vec<MatchResult>, MatchError> {
        let mut scored = self.score_all(query, catalog)?;
        scored.sort_by(|a, b| {
            b.vector_score
                .partial_cmp(&a.vector_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.edit_ratio
                        .partial_cmp(&a.edit_ratio)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.index.cmp(&b.index))
        });
        Ok(scored)
    }

    /// Compute both scores for every candidate, in catalog order.
    fn score_all<T>(
        &self,
        query: &str,
        catalog: &Catalog<T>,
    ) -> Result<Vec<MatchResult>, MatchError> {
        if catalog.is_empty() {
            return Err(MatchError::EmptyCatalog);
        }
        let query = ProductName::new(query);
        if query.is_empty() {
            return Err(MatchError::EmptyQuery);
        }

        debug!("matching {:?} against {} catalog entries", query.as_str(), catalog.len());

        // Corpus = catalog names plus the query as the final row
        let mut corpus: Vec<&str> = catalog.names().iter().map(ProductName::as_str).collect();
        corpus.push(query.as_str());
        let matrix = build_similarity(&corpus)?;
        let query_row = matrix.row(catalog.len());

        let ratios: Vec<f64> = if catalog.len() >= PARALLEL_THRESHOLD {
            catalog
                .names()
                .par_iter()
                .map(|name| edit_ratio(query.as_str(), name.as_str()))
                .collect()
        } else {
            catalog
                .names()
                .iter()
                .map(|name| edit_ratio(query.as_str(), name.as_str()))
                .collect()
        };

        Ok((0..catalog.len())
            .map(|index| MatchResult {
                index,
                vector_score: query_row[index],
                edit_ratio: ratios[index],
            })
            .collect())
    }
}
