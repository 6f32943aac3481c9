//! TF-IDF feature extraction.
//!
//! Rows are sparse `(feature index, weight)` pairs sorted by index and L2
//! normalised; a text with no known terms is an empty row.

use crate::SentiError;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

/// Two or more word characters; single letters never become features.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

pub type SparseRow = Vec<(usize, f64)>;

/// Term → feature index. Indices follow lexicographic term order.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Smoothed inverse document frequency, one entry per vocabulary term.
#[derive(Debug, Clone, Default)]
pub struct TermWeights {
    idf: Vec<f64>,
}

impl TermWeights {
    pub fn idf(&self, idx: usize) -> f64 {
        self.idf[idx]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.idf
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: Vocabulary,
    weights: TermWeights,
    stopwords: HashSet<String>,
}

/// Lowercase word tokens of length >= 2, stopwords removed.
fn tokenize<'a>(text: &'a str, stopwords: &'a HashSet<String>) -> impl Iterator<Item = String> + 'a {
    TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(move |t| !stopwords.contains(t))
}

impl TfidfVectorizer {
    /// Build vocabulary and idf from a corpus. Terms appearing in fewer than
    /// `min_df` documents are dropped.
    pub fn fit<S: AsRef<str>>(
        documents: &[S],
        stopwords: &HashSet<String>,
        min_df: usize,
    ) -> Result<Self, SentiError> {
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: HashSet<String> = tokenize(doc.as_ref(), stopwords).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let mut vocabulary = Vocabulary::default();
        let mut idf = Vec::new();

        // BTreeMap iteration is already in lexicographic order
        for (term, df) in doc_freq.into_iter().filter(|(_, df)| *df >= min_df.max(1)) {
            vocabulary.index.insert(term.clone(), vocabulary.terms.len());
            vocabulary.terms.push(term);
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
        }

        if vocabulary.is_empty() {
            return Err(SentiError::InvalidInput(
                "empty vocabulary: training texts contain only stopwords or no words".into(),
            ));
        }

        Ok(Self {
            vocabulary,
            weights: TermWeights { idf },
            stopwords: stopwords.clone(),
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn weights(&self) -> &TermWeights {
        &self.weights
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Project one text into feature space.
    pub fn transform(&self, text: &str) -> SparseRow {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for token in tokenize(text, &self.stopwords) {
            if let Some(idx) = self.vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut row: SparseRow = counts
            .into_iter()
            .map(|(idx, count)| (idx, count as f64 * self.weights.idf(idx)))
            .collect();

        // L2 normalize
        let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in row.iter_mut() {
                *v /= norm;
            }
        }
        row
    }

    pub fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SparseRow> {
        texts.iter().map(|t| self.transform(t.as_ref())).collect()
    }
}
