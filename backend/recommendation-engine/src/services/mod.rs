pub mod collaborative;
pub mod content;
pub mod exploration;
pub mod hybrid;
pub mod popularity;
pub mod ranking;

pub use collaborative::InteractionMatrixEngine;
pub use content::ContentSimilarityEngine;
pub use exploration::{BanditRanker, BanditStore};
pub use hybrid::HybridRecommender;
pub use popularity::PopularityPrior;
pub use ranking::ScoreBlender;
