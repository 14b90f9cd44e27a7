//! Shared fixtures for recommendation-engine integration tests

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use recommendation_engine::{EngineConfig, Event, EventType, HybridRecommender, Item, User};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours RUST_LOG
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Recommender with exploration turned off and a fixed seed
pub fn greedy_recommender() -> HybridRecommender {
    seeded_recommender(0.0, 42)
}

pub fn seeded_recommender(epsilon: f64, seed: u64) -> HybridRecommender {
    let mut config = EngineConfig::default();
    config.bandit.epsilon = epsilon;
    config.bandit.seed = Some(seed);
    HybridRecommender::new(config).with_rng(StdRng::seed_from_u64(seed))
}

/// Five-course learning catalog
pub fn learning_catalog() -> Vec<Item> {
    vec![
        Item::new("i1", "Python Basics")
            .with_description("Variables, loops and functions for beginners")
            .with_tags(["python", "basics"])
            .with_type("course"),
        Item::new("i2", "Python for Data Analysis")
            .with_description("Cleaning and exploring tables with pandas")
            .with_tags(["python", "data", "pandas"])
            .with_type("course"),
        Item::new("i3", "Supervised Machine Learning")
            .with_description("Regression and classification models")
            .with_tags(["ml", "supervised"])
            .with_type("course"),
        Item::new("i4", "Deep Learning with PyTorch")
            .with_description("Neural networks, tensors and GPUs")
            .with_tags(["deep", "pytorch"])
            .with_type("course"),
        Item::new("i5", "Python Exercises")
            .with_description("Practice problems to sharpen your skills")
            .with_tags(["python", "exercise"])
            .with_type("course"),
    ]
}

/// u1 viewed i1 and took the quiz of i2
pub fn learner_events() -> Vec<Event> {
    vec![
        Event::new("u1", "i1", EventType::View),
        Event::new("u1", "i2", EventType::Quiz).with_score(0.8),
    ]
}

pub fn python_learner() -> User {
    User::new("u1").with_interests(["python", "data"])
}
