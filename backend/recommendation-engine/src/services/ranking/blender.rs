use crate::config::BlendWeights;
use crate::error::{RecommendError, Result};
use crate::models::RankedItem;
use crate::utils::EPSILON;
use std::cmp::Ordering;

/// Score Blender - standardize each signal, then combine linearly.
///
/// `blend = w_content·cbf_n + w_collaborative·cf_n + w_popularity·pop_n`
pub struct ScoreBlender {
    weights: BlendWeights,
}

impl Default for ScoreBlender {
    fn default() -> Self {
        Self::new(BlendWeights::default())
    }
}

impl ScoreBlender {
    pub fn new(weights: BlendWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> BlendWeights {
        self.weights
    }

    /// Zero-mean, unit-variance standardization.
    ///
    /// A vector without spread maps to all zeros. Non-finite entries are
    /// read as 0.0 so NaN and infinity never leak into the ranking.
    pub fn normalize(scores: &[f64]) -> Vec<f64> {
        let clean: Vec<f64> = scores
            .iter()
            .map(|v| if v.is_finite() { *v } else { 0.0 })
            .collect();
        let Some(&first) = clean.first() else {
            return Vec::new();
        };

        let n = clean.len() as f64;
        let mean = clean.iter().sum::<f64>() / n;
        let variance = clean.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let constant = clean.iter().all(|v| *v == first);
        if constant || !std.is_finite() || std <= 0.0 {
            return vec![0.0; clean.len()];
        }

        clean
            .iter()
            .map(|v| {
                let z = (v - mean) / (std + EPSILON);
                if z.is_finite() {
                    z
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// Weighted sum of the standardized signals, one key per candidate
    pub fn blend(
        &self,
        content: &[f64],
        collaborative: &[f64],
        popularity: &[f64],
    ) -> Result<Vec<f64>> {
        if content.len() != collaborative.len() || content.len() != popularity.len() {
            return Err(RecommendError::InvalidInput(format!(
                "signal lengths differ: content={}, collaborative={}, popularity={}",
                content.len(),
                collaborative.len(),
                popularity.len()
            )));
        }

        let content = Self::normalize(content);
        let collaborative = Self::normalize(collaborative);
        let popularity = Self::normalize(popularity);

        Ok(content
            .iter()
            .zip(&collaborative)
            .zip(&popularity)
            .map(|((c, f), p)| {
                self.weights.content_weight * c
                    + self.weights.collaborative_weight * f
                    + self.weights.popularity_weight * p
            })
            .collect())
    }

    /// Candidates ordered by descending blended score; ties keep input order
    pub fn rank<'a, I>(&self, candidate_ids: I, blended: &[f64]) -> Result<Vec<RankedItem>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ranked: Vec<RankedItem> = candidate_ids
            .into_iter()
            .map(|id| RankedItem {
                item_id: id.to_string(),
                score: 0.0,
            })
            .collect();

        if ranked.len() != blended.len() {
            return Err(RecommendError::InvalidInput(format!(
                "{} candidates but {} blended scores",
                ranked.len(),
                blended.len()
            )));
        }

        for (item, score) in ranked.iter_mut().zip(blended) {
            item.score = *score;
        }

        // sort_by is stable
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        Ok(ranked)
    }
}
