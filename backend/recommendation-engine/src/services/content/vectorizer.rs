use ndarray::{Array1, Array2};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Two or more word characters, matching the usual TF-IDF token pattern
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("token pattern is a valid regex"));

/// TF-IDF vectorizer over word n-grams.
///
/// - tf: raw term count in the document
/// - idf: `ln((1 + n_docs) / (1 + df)) + 1` (smoothed)
/// - rows are L2-normalized; documents with no known terms stay zero
///
/// The vocabulary keeps the `max_features` most frequent terms of the fitted
/// corpus. Terms outside the vocabulary are ignored by `transform`.
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize, max_ngram: usize) -> Self {
        Self {
            max_features,
            ngram_range: (1, max_ngram.max(1)),
            vocabulary: HashMap::new(),
            idf: Array1::zeros(0),
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Lowercase, tokenize and expand into n-grams
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    /// Learn vocabulary and idf from `documents`, then return their matrix
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Array2<f64> {
        let analyzed: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.analyze(doc.as_ref()))
            .collect();

        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let mut unique: HashSet<&str> = HashSet::new();
            for term in terms {
                *corpus_freq.entry(term.as_str()).or_insert(0) += 1;
                if unique.insert(term.as_str()) {
                    *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                }
            }
        }

        // Most frequent terms first, lexicographic among equals
        let mut ranked: Vec<(&str, usize)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        let n_docs = documents.len() as f64;
        self.idf = kept
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        self.vocabulary = kept
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        self.weigh(&analyzed)
    }

    /// Project documents into the fitted vocabulary without refitting
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let analyzed: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.analyze(doc.as_ref()))
            .collect();
        self.weigh(&analyzed)
    }

    fn weigh(&self, analyzed: &[Vec<String>]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((analyzed.len(), self.vocabulary.len()));

        for (row, terms) in analyzed.iter().enumerate() {
            for term in terms {
                if let Some(&col) = self.vocabulary.get(term) {
                    matrix[[row, col]] += 1.0;
                }
            }
        }

        for mut row in matrix.rows_mut() {
            row *= &self.idf;
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }

        matrix
    }
}
