pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::EngineConfig;
pub use error::{RecommendError, Result};
pub use models::{BanditArmState, Event, EventType, FitSummary, Item, User};
pub use services::{
    BanditRanker, BanditStore, ContentSimilarityEngine, HybridRecommender,
    InteractionMatrixEngine, PopularityPrior, ScoreBlender,
};
