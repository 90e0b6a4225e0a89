//! TF-IDF vector similarity over a product-name corpus
//!
//! Builds a term-frequency / inverse-document-frequency vector for every
//! document in a corpus and compares all of them pairwise with cosine
//! similarity. One batch call covers the whole corpus; the vocabulary and
//! frequency statistics are scoped to that call and nothing is retained
//! afterwards.
//!
//! # Complexity
//! - Time: O(total tokens) to vectorize, O(N^2 * terms-per-doc) for the matrix
//! - Space: O(N^2) for the matrix plus the per-document sparse vectors

use crate::{MatchError, PARALLEL_THRESHOLD};
use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use std::cmp::Ordering;

/// Dense, symmetric pairwise similarity matrix with a unit diagonal.
///
/// Row `i` holds the similarity of corpus entry `i` against every other
/// entry; all values lie in `[0.0, 1.0]`. The matrix is a snapshot of one
/// corpus: it must be rebuilt whenever the corpus changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    /// Row-major, `dim * dim` values
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Number of rows/columns (= corpus size).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Similarity between corpus entries `i` and `j`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is not a valid corpus index.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.dim && j < self.dim,
            "index ({}, {}) out of bounds for {}x{} matrix",
            i,
            j,
            self.dim,
            self.dim
        );
        self.values[i * self.dim + j]
    }

    /// Full similarity row for corpus entry `i`.
    ///
    /// # Panics
    /// Panics if `i` is not a valid corpus index.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.dim, "row {} out of bounds for {}x{} matrix", i, self.dim, self.dim);
        &self.values[i * self.dim..(i + 1) * self.dim]
    }
}

/// Sparse TF-IDF weight vector, sorted by interned term id.
///
/// Sorted storage keeps dot products order-deterministic, so building the
/// same corpus twice yields bit-identical matrices.
type WeightVector = Vec<(usize, f64)>;

/// Tokenize a document: case-folded, split at every non-alphanumeric rune.
fn tokenize(doc: &str) -> Vec<String> {
    doc.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw term counts weighted by IDF, then L2-normalized.
///
/// Empty documents yield an empty vector.
fn weight_vector(doc: &[usize], idf: &[f64]) -> WeightVector {
    let mut tf: AHashMap<usize, usize> = AHashMap::new();
    for &id in doc {
        *tf.entry(id).or_insert(0) += 1;
    }

    let mut vector: WeightVector = tf
        .into_iter()
        .map(|(id, count)| (id, count as f64 * idf[id]))
        .collect();
    vector.sort_unstable_by_key(|&(id, _)| id);

    let norm = vector.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut vector {
            *w /= norm;
        }
    }
    vector
}

/// Cosine similarity between two L2-normalized sparse vectors.
///
/// Two empty vectors belong to two empty documents, which are identical
/// by convention (1.0); an empty vector against anything else shares
/// nothing (0.0). Neither case goes through the 0/0 dot product.
fn cosine(a: &WeightVector, b: &WeightVector) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}

/// Build the pairwise TF-IDF cosine similarity matrix for `corpus`.
///
/// Every document is tokenized (case-folded, split at non-alphanumeric
/// characters), terms are weighted with raw in-document counts and the
/// smoothed IDF `ln((1 + N) / (1 + df)) + 1`, each document vector is
/// L2-normalized, and all pairwise dot products fill the symmetric
/// matrix. The smoothed IDF never reaches zero, so a term present in
/// every document still carries weight and duplicate documents keep unit
/// similarity.
///
/// Duplicate and empty documents are permitted. Empty documents get zero
/// vectors; two empty documents compare at 1.0, an empty against a
/// non-empty one at 0.0.
///
/// # Errors
/// Returns [`MatchError::EmptyCorpus`] if `corpus` has no documents.
///
/// # Example
/// ```
/// use pricematch::build_similarity;
///
/// let m = build_similarity(&["iphone 13", "iphone 14", "galaxy s21"]).unwrap();
/// assert_eq!(m.dim(), 3);
/// assert_eq!(m.get(0, 0), 1.0);
/// assert!(m.get(0, 1) > m.get(0, 2));
/// ```
pub fn build_similarity<S: AsRef<str>>(corpus: &[S]) -> Result<SimilarityMatrix, MatchError> {
    if corpus.is_empty() {
        return Err(MatchError::EmptyCorpus);
    }
    let n = corpus.len();

    // Tokenize once, interning terms so vectors key on dense ids.
    let mut vocab: AHashMap<String, usize> = AHashMap::new();
    let docs: Vec<Vec<usize>> = corpus
        .iter()
        .map(|doc| {
            tokenize(doc.as_ref())
                .into_iter()
                .map(|term| {
                    let next_id = vocab.len();
                    *vocab.entry(term).or_insert(next_id)
                })
                .collect()
        })
        .collect();

    // Document frequency: number of documents containing each term
    let mut df = vec![0usize; vocab.len()];
    for doc in &docs {
        let unique: AHashSet<usize> = doc.iter().copied().collect();
        for id in unique {
            df[id] += 1;
        }
    }

    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1 + n) as f64 / (1 + d) as f64).ln() + 1.0)
        .collect();

    let vectors: Vec<WeightVector> = docs.iter().map(|doc| weight_vector(doc, &idf)).collect();

    // Upper triangle once, mirrored, diagonal pinned to 1.0
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();
    let sims: Vec<f64> = if pairs.len() >= PARALLEL_THRESHOLD {
        pairs
            .par_iter()
            .map(|&(i, j)| cosine(&vectors[i], &vectors[j]))
            .collect()
    } else {
        pairs
            .iter()
            .map(|&(i, j)| cosine(&vectors[i], &vectors[j]))
            .collect()
    };

    let mut values = vec![0.0f64; n * n];
    for i in 0..n {
        values[i * n + i] = 1.0;
    }
    for (&(i, j), &sim) in pairs.iter().zip(&sims) {
        values[i * n + j] = sim;
        values[j * n + i] = sim;
    }

    Ok(SimilarityMatrix { dim: n, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("iPhone 13, 128GB (Blue)"), ["iphone", "13", "128gb", "blue"]);
        assert_eq!(tokenize(""), [] as [&str; 0]);
        assert_eq!(tokenize(" -- "), [] as [&str; 0]);
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let corpus: [&str; 0] = [];
        assert_eq!(build_similarity(&corpus), Err(MatchError::EmptyCorpus));
    }

    #[test]
    fn test_diagonal_and_symmetry() {
        let m = build_similarity(&[
            "iphone 13 128gb blue",
            "iphone 13 128gb xanh",
            "samsung galaxy s21",
            "nokia 3310",
        ])
        .unwrap();

        for i in 0..m.dim() {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..m.dim() {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!((0.0..=1.0).contains(&m.get(i, j)));
            }
        }
    }

    #[test]
    fn test_same_product_ranks_above_different_product() {
        let m = build_similarity(&[
            "iphone 13 128gb blue",
            "iphone 13 128gb xanh",
            "samsung galaxy s21",
        ])
        .unwrap();

        assert!(m.get(0, 1) > m.get(0, 2));
        assert!(m.get(0, 1) > m.get(1, 2));
    }

    #[test]
    fn test_duplicate_documents_score_one() {
        let m = build_similarity(&["iphone 13", "iphone 13"]).unwrap();
        assert!(approx_eq(m.get(0, 1), 1.0));
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        let m = build_similarity(&["iphone 13", "galaxy s21"]).unwrap();
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn test_empty_document_conventions() {
        let m = build_similarity(&["", "", "iphone 13"]).unwrap();
        // Two empty documents are identical by convention
        assert_eq!(m.get(0, 1), 1.0);
        // An empty document shares nothing with a non-empty one
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.get(1, 2), 0.0);
        assert_eq!(m.get(2, 2), 1.0);
    }

    #[test]
    fn test_idempotent() {
        let corpus = [
            "iphone 13 128gb blue",
            "iphone 13 128gb xanh",
            "samsung galaxy s21 5g",
        ];
        let first = build_similarity(&corpus).unwrap();
        let second = build_similarity(&corpus).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_row_matches_get() {
        let m = build_similarity(&["iphone 13", "iphone 14", "galaxy s21"]).unwrap();
        let row = m.row(1);
        assert_eq!(row.len(), 3);
        for j in 0..3 {
            assert_eq!(row[j], m.get(1, j));
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_get_out_of_bounds_panics() {
        let m = build_similarity(&["iphone 13"]).unwrap();
        m.get(0, 1);
    }
}
