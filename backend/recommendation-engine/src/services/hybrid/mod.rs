use crate::config::EngineConfig;
use crate::error::{RecommendError, Result};
use crate::models::{Event, FitSummary, Item, User};
use crate::services::collaborative::InteractionMatrixEngine;
use crate::services::content::ContentSimilarityEngine;
use crate::services::exploration::BanditRanker;
use crate::services::popularity::PopularityPrior;
use crate::services::ranking::ScoreBlender;
use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Hybrid Recommender - content + collaborative + popularity, re-ranked by
/// an epsilon-greedy bandit.
///
/// Lifecycle: starts unfit. `recommend` before `fit` still works; content and
/// collaborative scores are all zero, so popularity drives the order.
/// `feedback` only touches the bandit; the other engines change on `fit`.
pub struct HybridRecommender {
    config: EngineConfig,
    content: ContentSimilarityEngine,
    collaborative: InteractionMatrixEngine,
    popularity: PopularityPrior,
    blender: ScoreBlender,
    bandit: BanditRanker,
    fitted: bool,
}

impl Default for HybridRecommender {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl HybridRecommender {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            content: ContentSimilarityEngine::new(&config.content),
            collaborative: InteractionMatrixEngine::new(),
            popularity: PopularityPrior::new(),
            blender: ScoreBlender::new(config.blend),
            bandit: BanditRanker::new(&config.bandit),
            fitted: false,
            config,
        }
    }

    /// Build from `REC_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(EngineConfig::from_env()?))
    }

    /// Inject the exploration random source
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.bandit = self.bandit.with_rng(rng);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn bandit(&self) -> &BanditRanker {
        &self.bandit
    }

    pub fn bandit_mut(&mut self) -> &mut BanditRanker {
        &mut self.bandit
    }

    /// Rebuild the content and collaborative engines from a full snapshot.
    ///
    /// Both engines are built on the side and swapped in together; on error
    /// the previous model stays in place.
    pub fn fit(&mut self, items: &[Item], events: &[Event]) -> Result<FitSummary> {
        validate_events(events)?;

        let mut content = ContentSimilarityEngine::new(&self.config.content);
        content.fit(items);

        let mut collaborative = InteractionMatrixEngine::new();
        collaborative.fit(events);

        let summary = FitSummary {
            item_count: content.len(),
            vocabulary_size: content.vocabulary_size(),
            user_count: collaborative.user_count(),
            interacted_item_count: collaborative.item_count(),
        };

        self.content = content;
        self.collaborative = collaborative;
        self.fitted = true;

        info!(
            items = summary.item_count,
            vocabulary = summary.vocabulary_size,
            users = summary.user_count,
            interacted_items = summary.interacted_item_count,
            events = events.len(),
            "Hybrid model fitted"
        );

        Ok(summary)
    }

    /// Up to `limit` unseen item ids for `user`, best first.
    ///
    /// The seen set is derived from `events` on every call. Every returned id
    /// comes from `items`.
    pub fn recommend(
        &mut self,
        user: &User,
        items: &[Item],
        events: &[Event],
        limit: usize,
    ) -> Result<Vec<String>> {
        user.validate()?;
        validate_events(events)?;

        let seen: HashSet<&str> = events
            .iter()
            .filter(|e| e.user_id == user.id)
            .map(|e| e.item_id.as_str())
            .collect();

        let mut placed: HashSet<&str> = HashSet::new();
        let mut candidates: Vec<&Item> = Vec::new();
        for item in items {
            if seen.contains(item.id.as_str()) {
                continue;
            }
            if !placed.insert(item.id.as_str()) {
                warn!(item_id = %item.id, "Duplicate candidate item skipped");
                continue;
            }
            candidates.push(item);
        }

        if candidates.is_empty() {
            debug!(user_id = %user.id, seen = seen.len(), "No unseen candidates");
            return Ok(Vec::new());
        }

        let profile = user.profile_text();
        let content_scores = self
            .content
            .score_against_profile(&profile, candidates.iter().copied());

        // Items outside the catalog may outrank candidates, so take every
        // unseen interacted item and keep only what the candidates need
        let cf_pairs: HashMap<String, f64> = self
            .collaborative
            .recommend(&user.id, &seen, self.collaborative.item_count())
            .into_iter()
            .collect();
        let collaborative_scores: Vec<f64> = candidates
            .iter()
            .map(|item| cf_pairs.get(&item.id).copied().unwrap_or(0.0))
            .collect();

        let popularity_scores = self
            .popularity
            .scores(events, candidates.iter().copied());

        let blended =
            self.blender
                .blend(&content_scores, &collaborative_scores, &popularity_scores)?;
        let ranked: Vec<String> = self
            .blender
            .rank(candidates.iter().map(|item| item.id.as_str()), &blended)?
            .into_iter()
            .map(|ranked| ranked.item_id)
            .collect();

        let recommendations = self.bandit.rerank(&user.id, ranked, limit);

        info!(
            user_id = %user.id,
            candidates = candidates.len(),
            seen = seen.len(),
            limit = limit,
            returned = recommendations.len(),
            fitted = self.fitted,
            "Recommendations generated"
        );

        Ok(recommendations)
    }

    /// Record explicit reward feedback for one arm
    pub fn feedback(&mut self, user_id: &str, item_id: &str, reward: f64) -> Result<()> {
        if user_id.trim().is_empty() || item_id.trim().is_empty() {
            return Err(RecommendError::InvalidInput(
                "feedback requires user_id and item_id".to_string(),
            ));
        }
        if !reward.is_finite() {
            return Err(RecommendError::InvalidInput(format!(
                "reward must be finite, got {}",
                reward
            )));
        }

        self.bandit.update(user_id, item_id, reward);
        Ok(())
    }

    /// Content-similar items; empty before `fit` or for unknown ids
    pub fn similar_items(&self, item_id: &str, top_k: usize) -> Vec<String> {
        self.content.similar_items(item_id, top_k)
    }
}

fn validate_events(events: &[Event]) -> Result<()> {
    events.iter().try_for_each(Event::validate)
}
