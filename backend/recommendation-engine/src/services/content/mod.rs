//! Content-based Similarity Engine
//!
//! Builds a TF-IDF vector space over item text (title, description, tags,
//! type) and scores items against each other or against a user profile.
//!
//! # Workflow
//! 1. `fit` learns the vocabulary from the full item snapshot
//! 2. `similar_items` ranks other items by cosine similarity
//! 3. `score_against_profile` projects free text into the fitted vocabulary;
//!    unknown terms contribute nothing, the index is never refitted

mod vectorizer;

pub use vectorizer::TfidfVectorizer;

use crate::config::ContentConfig;
use crate::models::Item;
use crate::utils::{argsort_desc, cosine_similarity};
use ndarray::Array2;
use std::collections::HashMap;
use tracing::{debug, warn};

pub struct ContentSimilarityEngine {
    vectorizer: TfidfVectorizer,
    item_ids: Vec<String>,
    item_index: HashMap<String, usize>,
    item_matrix: Array2<f64>,
}

impl Default for ContentSimilarityEngine {
    fn default() -> Self {
        Self::new(&ContentConfig::default())
    }
}

impl ContentSimilarityEngine {
    pub fn new(config: &ContentConfig) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(config.max_features, config.max_ngram),
            item_ids: Vec::new(),
            item_index: HashMap::new(),
            item_matrix: Array2::zeros((0, 0)),
        }
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    /// Rebuild the vector space from `items`, in item order.
    ///
    /// A duplicated id keeps its first occurrence; later copies are dropped
    /// before vectorizing.
    pub fn fit(&mut self, items: &[Item]) {
        let mut unique: Vec<&Item> = Vec::with_capacity(items.len());
        let mut item_index: HashMap<String, usize> = HashMap::with_capacity(items.len());
        for item in items {
            if item_index.contains_key(&item.id) {
                warn!(item_id = %item.id, "Duplicate item id in snapshot, keeping first occurrence");
                continue;
            }
            item_index.insert(item.id.clone(), unique.len());
            unique.push(item);
        }

        let corpus: Vec<String> = unique.iter().map(|item| item.text()).collect();
        self.item_matrix = self.vectorizer.fit_transform(&corpus);
        self.item_ids = unique.iter().map(|item| item.id.clone()).collect();
        self.item_index = item_index;

        debug!(
            items = self.item_ids.len(),
            vocabulary = self.vectorizer.vocabulary_size(),
            "Content index built"
        );
    }

    /// Up to `top_k` other item ids, most similar first.
    ///
    /// Empty when `item_id` is unknown or nothing has been fitted.
    pub fn similar_items(&self, item_id: &str, top_k: usize) -> Vec<String> {
        let Some(&idx) = self.item_index.get(item_id) else {
            return Vec::new();
        };

        let query = self.item_matrix.row(idx);
        let sims: Vec<f64> = self
            .item_matrix
            .rows()
            .into_iter()
            .map(|row| cosine_similarity(row, query))
            .collect();

        argsort_desc(&sims)
            .into_iter()
            .filter(|&j| j != idx)
            .take(top_k)
            .map(|j| self.item_ids[j].clone())
            .collect()
    }

    /// Cosine similarity of `profile_text` to each candidate, in candidate order
    pub fn score_against_profile<'a, I>(&self, profile_text: &str, candidates: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let texts: Vec<String> = candidates.into_iter().map(Item::text).collect();
        if texts.is_empty() {
            return Vec::new();
        }

        let candidate_matrix = self.vectorizer.transform(&texts);
        let profile_matrix = self.vectorizer.transform(&[profile_text]);
        let profile = profile_matrix.row(0);

        candidate_matrix
            .rows()
            .into_iter()
            .map(|row| cosine_similarity(row, profile))
            .collect()
    }
}
