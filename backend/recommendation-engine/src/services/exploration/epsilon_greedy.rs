// ============================================
// Epsilon-Greedy Bandit Ranker
// ============================================
//
// select(candidates):
//   with probability epsilon -> uniform random candidate
//   otherwise               -> argmax avg_reward(user, candidate)
//
// avg_reward = total_reward / count, 0.0 for arms never pulled.
// Ties go to the earliest candidate.

use super::store::BanditStore;
use crate::config::BanditConfig;
use crate::models::BanditArmState;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub struct BanditRanker {
    /// Exploration probability in [0, 1]
    epsilon: f64,
    /// Re-rank window is 2·limit clamped into [min_window, max_window]
    min_window: usize,
    max_window: usize,
    store: BanditStore,
    rng: StdRng,
}

impl Default for BanditRanker {
    fn default() -> Self {
        Self::new(&BanditConfig::default())
    }
}

impl BanditRanker {
    pub fn new(config: &BanditConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            epsilon: config.epsilon.clamp(0.0, 1.0),
            min_window: config.min_window,
            max_window: config.max_window,
            store: BanditStore::new(),
            rng,
        }
    }

    /// Replace the random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.clamp(0.0, 1.0);
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn store(&self) -> &BanditStore {
        &self.store
    }

    pub fn arm(&self, user_id: &str, item_id: &str) -> Option<&BanditArmState> {
        self.store.get(user_id, item_id)
    }

    /// Every known arm as `(user_id, item_id, state)`, for checkpointing
    pub fn arms(&self) -> impl Iterator<Item = (&str, &str, &BanditArmState)> {
        self.store.iter()
    }

    /// Rehydrate an arm from a checkpoint, overwriting any in-memory state
    pub fn restore(&mut self, user_id: &str, item_id: &str, state: BanditArmState) {
        self.store.set(user_id, item_id, state);
    }

    /// Record a reward for `(user_id, item_id)`
    pub fn update(&mut self, user_id: &str, item_id: &str, reward: f64) {
        let arm = self.store.record(user_id, item_id, reward);

        debug!(
            user_id = user_id,
            item_id = item_id,
            reward = reward,
            count = arm.count,
            avg_reward = arm.average_reward(),
            "Bandit arm updated"
        );
    }

    /// Pick one candidate for `user_id`; `None` only for an empty slice
    pub fn select<'a>(&mut self, user_id: &str, candidates: &'a [String]) -> Option<&'a str> {
        if candidates.is_empty() {
            return None;
        }

        if self.epsilon > 0.0 && self.rng.gen::<f64>() < self.epsilon {
            let picked = candidates.choose(&mut self.rng).map(String::as_str);
            debug!(user_id = user_id, picked = ?picked, "Bandit explored");
            return picked;
        }

        let mut best_idx = 0;
        let mut best_avg = f64::NEG_INFINITY;
        for (idx, arm) in candidates.iter().enumerate() {
            let avg = self.store.average_reward(user_id, arm);
            if avg > best_avg {
                best_avg = avg;
                best_idx = idx;
            }
        }

        Some(candidates[best_idx].as_str())
    }

    /// `max(min_window, min(max_window, 2·limit))`
    pub fn window_size(&self, limit: usize) -> usize {
        limit
            .saturating_mul(2)
            .min(self.max_window)
            .max(self.min_window)
    }

    /// Move the bandit's pick from the top window to the front.
    ///
    /// Output is `[selected] + window without selected + remainder`, where
    /// the selected id is taken out of the window once (first occurrence)
    /// and the remainder skips anything already placed. Truncated to `limit`.
    pub fn rerank(&mut self, user_id: &str, ranked: Vec<String>, limit: usize) -> Vec<String> {
        if limit == 0 || ranked.is_empty() {
            return Vec::new();
        }

        let window_len = self.window_size(limit).min(ranked.len());
        let (window, remainder) = ranked.split_at(window_len);

        let Some(selected) = self.select(user_id, window).map(str::to_owned) else {
            return ranked.into_iter().take(limit).collect();
        };

        let mut output: Vec<String> = Vec::with_capacity(limit.min(ranked.len()));
        output.push(selected.clone());

        let mut removed = false;
        for id in window {
            if !removed && *id == selected {
                removed = true;
                continue;
            }
            output.push(id.clone());
        }

        for id in remainder {
            if output.len() >= limit {
                break;
            }
            if *id == selected || window.contains(id) {
                continue;
            }
            output.push(id.clone());
        }

        output.truncate(limit);

        debug!(
            user_id = user_id,
            selected = %selected,
            window = window_len,
            returned = output.len(),
            "Bandit re-rank applied"
        );

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn greedy() -> BanditRanker {
        BanditRanker::default()
            .with_epsilon(0.0)
            .with_rng(StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_select_empty_candidates() {
        let mut bandit = greedy();
        assert_eq!(bandit.select("u1", &[]), None);
    }

    #[test]
    fn test_select_exploits_best_average() {
        let mut bandit = greedy();
        bandit.update("u1", "b", 0.2);
        bandit.update("u1", "c", 0.9);
        bandit.update("u1", "c", 0.7);

        let candidates = ids(&["a", "b", "c"]);
        assert_eq!(bandit.select("u1", &candidates), Some("c"));
        // other users have no history, so first candidate wins
        assert_eq!(bandit.select("u2", &candidates), Some("a"));
    }

    #[test]
    fn test_select_ties_go_to_first_occurrence() {
        let mut bandit = greedy();
        bandit.update("u1", "b", 1.0);
        bandit.update("u1", "d", 1.0);

        let candidates = ids(&["a", "b", "c", "d"]);
        assert_eq!(bandit.select("u1", &candidates), Some("b"));
    }

    #[test]
    fn test_negative_rewards_lose_to_unseen_arms() {
        let mut bandit = greedy();
        bandit.update("u1", "a", -1.0);

        let candidates = ids(&["a", "b"]);
        assert_eq!(bandit.select("u1", &candidates), Some("b"));
    }

    #[test]
    fn test_full_exploration_stays_within_candidates() {
        let mut bandit = BanditRanker::default()
            .with_epsilon(1.0)
            .with_rng(StdRng::seed_from_u64(11));
        let candidates = ids(&["a", "b", "c"]);

        for _ in 0..50 {
            let picked = bandit.select("u1", &candidates).unwrap();
            assert!(candidates.iter().any(|c| c == picked));
        }
    }

    #[test]
    fn test_seeded_exploration_is_reproducible() {
        let candidates = ids(&["a", "b", "c", "d", "e"]);
        let run = || {
            let mut bandit = BanditRanker::default()
                .with_epsilon(0.5)
                .with_rng(StdRng::seed_from_u64(99));
            (0..20)
                .map(|_| bandit.select("u1", &candidates).unwrap().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_update_is_additive() {
        let mut bandit = greedy();
        let rewards = [0.5, 1.0, 0.0, 0.25];
        for reward in rewards {
            bandit.update("u1", "i1", reward);
        }

        let arm = bandit.arm("u1", "i1").unwrap();
        assert_eq!(arm.count, rewards.len() as u64);
        assert_eq!(arm.total_reward, rewards.iter().sum::<f64>());
        assert_eq!(arm.last_reward, Some(0.25));
    }

    #[test]
    fn test_restore_overwrites_arm() {
        let mut bandit = greedy();
        bandit.update("u1", "i1", 1.0);
        bandit.restore(
            "u1",
            "i1",
            BanditArmState {
                count: 10,
                total_reward: 3.0,
                last_reward: None,
            },
        );

        assert_eq!(bandit.arm("u1", "i1").unwrap().count, 10);
        assert_eq!(bandit.store().len(), 1);

        let arms: Vec<_> = bandit.arms().collect();
        assert_eq!(arms, vec![("u1", "i1", bandit.arm("u1", "i1").unwrap())]);
    }

    #[test]
    fn test_window_size_bounds() {
        let bandit = greedy();
        assert_eq!(bandit.window_size(0), 5);
        assert_eq!(bandit.window_size(1), 5);
        assert_eq!(bandit.window_size(4), 8);
        assert_eq!(bandit.window_size(10), 20);
        assert_eq!(bandit.window_size(50), 20);
    }

    #[test]
    fn test_rerank_moves_best_arm_to_front() {
        let mut bandit = greedy();
        bandit.update("u1", "c", 1.0);

        let ranked = ids(&["a", "b", "c", "d", "e", "f", "g"]);
        let output = bandit.rerank("u1", ranked, 3);

        assert_eq!(output, ids(&["c", "a", "b"]));
    }

    #[test]
    fn test_rerank_keeps_order_without_history() {
        let mut bandit = greedy();
        let ranked = ids(&["a", "b", "c", "d", "e", "f", "g"]);

        let output = bandit.rerank("u1", ranked.clone(), 10);
        assert_eq!(output, ranked);
    }

    #[test]
    fn test_rerank_ignores_arms_outside_window() {
        let mut bandit = greedy();
        bandit.update("u1", "g", 5.0);

        // limit 1 -> window of 5, "g" sits at position 7
        let ranked = ids(&["a", "b", "c", "d", "e", "f", "g"]);
        let output = bandit.rerank("u1", ranked, 1);
        assert_eq!(output, ids(&["a"]));
    }

    #[test]
    fn test_rerank_removes_selected_once() {
        let config = BanditConfig {
            epsilon: 0.0,
            seed: Some(1),
            min_window: 5,
            max_window: 5,
        };
        let mut bandit = BanditRanker::new(&config);
        bandit.update("u1", "b", 1.0);

        let ranked = ids(&["a", "b", "c", "b", "d", "e", "b"]);
        let output = bandit.rerank("u1", ranked, 10);

        // the second "b" is inside the window and stays; the one past the
        // window is already placed
        assert_eq!(output, ids(&["b", "a", "c", "b", "d", "e"]));
    }

    #[test]
    fn test_rerank_zero_limit() {
        let mut bandit = greedy();
        assert!(bandit.rerank("u1", ids(&["a", "b"]), 0).is_empty());
        assert!(bandit.rerank("u1", Vec::new(), 5).is_empty());
    }
}
