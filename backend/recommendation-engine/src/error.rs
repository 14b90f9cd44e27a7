use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommendError>;

/// Errors surfaced by the recommendation engine.
///
/// Unknown users, unseen items and empty corpora are not errors; they yield
/// empty collections. Only caller precondition violations end up here.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<envy::Error> for RecommendError {
    fn from(err: envy::Error) -> Self {
        RecommendError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for RecommendError {
    fn from(err: serde_json::Error) -> Self {
        RecommendError::InvalidInput(format!("malformed snapshot: {}", err))
    }
}
