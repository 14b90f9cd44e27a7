use crate::models::{Event, EventType};
use crate::utils::{argsort_desc, EPSILON};
use ndarray::Array2;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// User-based Collaborative Filtering over implicit feedback
///
/// Algorithm:
/// 1. Weight every event by its type and accumulate into a user×item matrix
/// 2. L2-normalize each user row, so row dot products are cosine similarities
/// 3. For a target user: `sims = M · u`, then `scores = Mᵀ · sims`
/// 4. Mask already-seen items and rank the rest
///
/// Users and items are indexed in sorted id order, so the same snapshot always
/// produces the same matrix.
pub struct InteractionMatrixEngine {
    users: Vec<String>,
    items: Vec<String>,
    user_index: HashMap<String, usize>,
    item_index: HashMap<String, usize>,
    user_item: Array2<f64>,
}

/// Score assigned to excluded items before ranking
pub const EXCLUDED_SCORE: f64 = -1e9;

/// Anything at or below this is treated as masked
const MASK_THRESHOLD: f64 = -1e8;

/// Implicit-feedback weight of a single event
pub fn interaction_weight(event: &Event) -> f64 {
    match event.event_type {
        EventType::Complete => 3.0,
        EventType::Quiz => {
            let score = if event.score.is_finite() {
                event.score
            } else {
                0.0
            };
            1.0 + score
        }
        EventType::Like => 1.5,
        EventType::View => 1.0,
        EventType::Other => 0.5,
    }
}

impl Default for InteractionMatrixEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionMatrixEngine {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            items: Vec::new(),
            user_index: HashMap::new(),
            item_index: HashMap::new(),
            user_item: Array2::zeros((0, 0)),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_item.is_empty()
    }

    /// Rebuild the interaction matrix from the full event snapshot
    pub fn fit(&mut self, events: &[Event]) {
        let user_set: BTreeSet<&str> = events.iter().map(|e| e.user_id.as_str()).collect();
        let item_set: BTreeSet<&str> = events.iter().map(|e| e.item_id.as_str()).collect();

        self.users = user_set.into_iter().map(str::to_owned).collect();
        self.items = item_set.into_iter().map(str::to_owned).collect();
        self.user_index = self
            .users
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();
        self.item_index = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, id)| (id.clone(), idx))
            .collect();

        if self.users.is_empty() || self.items.is_empty() {
            self.user_item = Array2::zeros((0, 0));
            return;
        }

        let mut matrix = Array2::<f64>::zeros((self.users.len(), self.items.len()));
        for event in events {
            let (Some(&u), Some(&i)) = (
                self.user_index.get(&event.user_id),
                self.item_index.get(&event.item_id),
            ) else {
                continue;
            };
            matrix[[u, i]] += interaction_weight(event);
        }

        for mut row in matrix.rows_mut() {
            let norm = row.dot(&row).sqrt() + EPSILON;
            row /= norm;
        }
        self.user_item = matrix;

        debug!(
            users = self.users.len(),
            items = self.items.len(),
            events = events.len(),
            "Interaction matrix built"
        );
    }

    /// Up to `top_k` `(item_id, score)` pairs for `user_id`, best first.
    ///
    /// Items in `exclude_item_ids` are never returned. Unknown users and an
    /// empty matrix yield an empty list.
    pub fn recommend(
        &self,
        user_id: &str,
        exclude_item_ids: &HashSet<&str>,
        top_k: usize,
    ) -> Vec<(String, f64)> {
        if self.is_empty() {
            return Vec::new();
        }
        let Some(&u) = self.user_index.get(user_id) else {
            return Vec::new();
        };

        let target = self.user_item.row(u);
        let user_sims = self.user_item.dot(&target);
        let mut scores = self.user_item.t().dot(&user_sims);

        for excluded in exclude_item_ids {
            if let Some(&i) = self.item_index.get(*excluded) {
                scores[i] = EXCLUDED_SCORE;
            }
        }

        let scores = scores.to_vec();
        argsort_desc(&scores)
            .into_iter()
            .filter(|&i| scores[i] > MASK_THRESHOLD)
            .take(top_k)
            .map(|i| (self.items[i].clone(), scores[i]))
            .collect()
    }
}
