//! TF-IDF vectorizer compatible with scikit-learn's `TfidfVectorizer` defaults
//! (`stop_words="english"`, smooth idf, L2 norm).

use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::stop_words::ENGLISH_STOP_WORDS;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Sparse vector as `(term index, weight)` pairs sorted by term index.
pub type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    /// Term → column index. Columns follow alphabetical term order.
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and idf weights from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let n = documents.len() as f64;
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let unique: HashSet<String> = analyze(doc.as_ref()).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_default() += 1;
            }
        }

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (idx, (term, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, idx);
        }

        Self { vocabulary, idf }
    }

    /// L2-normalized tf-idf vector. Unknown terms are dropped; a document with
    /// no known terms maps to the empty (zero) vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in analyze(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_default() += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * self.idf[idx]))
            .collect();

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut vector {
                *w /= norm;
            }
        }
        vector
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    #[cfg(test)]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&idx| self.idf[idx])
    }
}

/// Lowercase, tokenize, drop stop words.
fn analyze(document: &str) -> Vec<String> {
    let lower = document.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Cosine similarity of two L2-normalized sparse vectors.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_stop_words_and_short_tokens_are_dropped() {
        let v = TfidfVectorizer::fit(&["The R and a Python of C"]);
        assert_eq!(v.vocabulary_len(), 1);
        assert!(v.idf("python").is_some());
    }

    #[test]
    fn test_smooth_idf() {
        let v = TfidfVectorizer::fit(&["python flask", "python sql"]);
        // idf = ln((1 + n) / (1 + df)) + 1
        assert!((v.idf("python").unwrap() - 1.0).abs() < EPS);
        assert!((v.idf("flask").unwrap() - ((3.0f64 / 2.0).ln() + 1.0)).abs() < EPS);
    }

    #[test]
    fn test_transform_is_unit_length() {
        let v = TfidfVectorizer::fit(&["python flask", "python sql"]);
        let vec = v.transform("Python python Flask");
        let norm: f64 = vec.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < EPS);
    }

    #[test]
    fn test_unknown_terms_give_zero_vector() {
        let v = TfidfVectorizer::fit(&["python flask"]);
        assert!(v.transform("cobol fortran").is_empty());
        assert_eq!(cosine(&v.transform("cobol"), &v.transform("python")), 0.0);
    }

    #[test]
    fn test_identical_documents_have_similarity_one() {
        let v = TfidfVectorizer::fit(&["python flask", "sql tableau"]);
        let a = v.transform("python flask");
        assert!((cosine(&a, &a) - 1.0).abs() < EPS);
    }
}
