use crate::models::{Event, Item};
use std::collections::HashMap;

/// Popularity prior - raw interaction frequency per item.
///
/// A weak signal for cold-start users and for breaking near-ties in the
/// blend. Stateless: counts come from whatever snapshot is passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopularityPrior;

impl PopularityPrior {
    pub fn new() -> Self {
        Self
    }

    /// Event count per item id
    pub fn counts<'a>(&self, events: &'a [Event]) -> HashMap<&'a str, f64> {
        let mut counts: HashMap<&str, f64> = HashMap::new();
        for event in events {
            *counts.entry(event.item_id.as_str()).or_insert(0.0) += 1.0;
        }
        counts
    }

    /// Event count for each candidate, in candidate order; 0.0 for items
    /// nobody interacted with
    pub fn scores<'a, I>(&self, events: &[Event], candidates: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let counts = self.counts(events);
        candidates
            .into_iter()
            .map(|item| counts.get(item.id.as_str()).copied().unwrap_or(0.0))
            .collect()
    }
}
