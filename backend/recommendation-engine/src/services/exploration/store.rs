use crate::models::BanditArmState;
use std::collections::HashMap;

/// In-memory arm statistics, grouped per user
#[derive(Debug, Clone, Default)]
pub struct BanditStore {
    arms: HashMap<String, HashMap<String, BanditArmState>>,
}

impl BanditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str, item_id: &str) -> Option<&BanditArmState> {
        self.arms.get(user_id).and_then(|arms| arms.get(item_id))
    }

    /// Replace the state of one arm
    pub fn set(&mut self, user_id: &str, item_id: &str, state: BanditArmState) {
        self.arms
            .entry(user_id.to_string())
            .or_default()
            .insert(item_id.to_string(), state);
    }

    /// Add one reward to an arm, creating it on first use
    pub fn record(&mut self, user_id: &str, item_id: &str, reward: f64) -> &BanditArmState {
        let arm = self
            .arms
            .entry(user_id.to_string())
            .or_default()
            .entry(item_id.to_string())
            .or_default();
        arm.record(reward);
        arm
    }

    pub fn average_reward(&self, user_id: &str, item_id: &str) -> f64 {
        self.get(user_id, item_id)
            .map(BanditArmState::average_reward)
            .unwrap_or(0.0)
    }

    /// Number of arms across all users
    pub fn len(&self) -> usize {
        self.arms.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn user_arm_count(&self, user_id: &str) -> usize {
        self.arms.get(user_id).map(HashMap::len).unwrap_or(0)
    }

    /// All arms as `(user_id, item_id, state)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &BanditArmState)> {
        self.arms.iter().flat_map(|(user_id, arms)| {
            arms.iter()
                .map(move |(item_id, state)| (user_id.as_str(), item_id.as_str(), state))
        })
    }
}
