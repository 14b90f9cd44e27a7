use crate::error::{RecommendError, Result};
use serde::Deserialize;
use std::env;

/// Engine configuration, loaded from `REC_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub blend: BlendWeights,
    pub bandit: BanditConfig,
    pub content: ContentConfig,
}

/// Linear blend weights applied to the standardized signals.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BlendWeights {
    #[serde(default = "default_content_weight")]
    pub content_weight: f64,
    #[serde(default = "default_collaborative_weight")]
    pub collaborative_weight: f64,
    #[serde(default = "default_popularity_weight")]
    pub popularity_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BanditConfig {
    /// Probability of picking a uniformly random arm instead of the best one
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Fixed seed for the exploration RNG; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_min_window")]
    pub min_window: usize,
    #[serde(default = "default_max_window")]
    pub max_window: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_max_features")]
    pub max_features: usize,
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
}

fn default_content_weight() -> f64 {
    0.5
}

fn default_collaborative_weight() -> f64 {
    0.4
}

fn default_popularity_weight() -> f64 {
    0.1
}

fn default_epsilon() -> f64 {
    0.1
}

fn default_min_window() -> usize {
    5
}

fn default_max_window() -> usize {
    20
}

fn default_max_features() -> usize {
    5000
}

fn default_max_ngram() -> usize {
    2
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            content_weight: default_content_weight(),
            collaborative_weight: default_collaborative_weight(),
            popularity_weight: default_popularity_weight(),
        }
    }
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            seed: None,
            min_window: default_min_window(),
            max_window: default_max_window(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            max_ngram: default_max_ngram(),
        }
    }
}

/// Older deployments set the exploration rate under this key
const LEGACY_EPSILON_KEY: &str = "REC_EPSILON";

impl EngineConfig {
    /// Load from `REC_BLEND_*`, `REC_BANDIT_*` and `REC_CONTENT_*`.
    ///
    /// `REC_EPSILON` is honoured when `REC_BANDIT_EPSILON` is unset.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = EngineConfig {
            blend: envy::prefixed("REC_BLEND_").from_env::<BlendWeights>()?,
            bandit: envy::prefixed("REC_BANDIT_").from_env::<BanditConfig>()?,
            content: envy::prefixed("REC_CONTENT_").from_env::<ContentConfig>()?,
        };

        if env::var_os("REC_BANDIT_EPSILON").is_none() {
            if let Ok(raw) = env::var(LEGACY_EPSILON_KEY) {
                config.bandit.epsilon = raw.trim().parse().map_err(|_| {
                    RecommendError::Config(format!(
                        "{} must be a number, got '{}'",
                        LEGACY_EPSILON_KEY, raw
                    ))
                })?;
            }
        }
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("content_weight", self.blend.content_weight),
            ("collaborative_weight", self.blend.collaborative_weight),
            ("popularity_weight", self.blend.popularity_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RecommendError::Config(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, weight
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.bandit.epsilon) {
            return Err(RecommendError::Config(format!(
                "epsilon must be in [0, 1], got {}",
                self.bandit.epsilon
            )));
        }

        if self.bandit.min_window == 0 || self.bandit.min_window > self.bandit.max_window {
            return Err(RecommendError::Config(format!(
                "bandit window bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.bandit.min_window, self.bandit.max_window
            )));
        }

        if self.content.max_features == 0 {
            return Err(RecommendError::Config(
                "max_features must be positive".to_string(),
            ));
        }

        if self.content.max_ngram == 0 {
            return Err(RecommendError::Config(
                "max_ngram must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const KEYS: [&str; 5] = [
        "REC_BANDIT_EPSILON",
        "REC_EPSILON",
        "REC_BANDIT_SEED",
        "REC_BLEND_CONTENT_WEIGHT",
        "REC_CONTENT_MAX_FEATURES",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_from_empty_env() {
        clear_env();
        let config = EngineConfig::from_env().unwrap();

        assert_eq!(config.blend, BlendWeights::default());
        assert_eq!(config.bandit.epsilon, 0.1);
        assert_eq!(config.bandit.seed, None);
        assert_eq!(config.bandit.min_window, 5);
        assert_eq!(config.bandit.max_window, 20);
        assert_eq!(config.content.max_features, 5000);
        assert_eq!(config.content.max_ngram, 2);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("REC_BANDIT_EPSILON", "0.25");
        env::set_var("REC_BANDIT_SEED", "42");
        env::set_var("REC_BLEND_CONTENT_WEIGHT", "0.7");
        env::set_var("REC_CONTENT_MAX_FEATURES", "100");

        let config = EngineConfig::from_env().unwrap();
        clear_env();

        assert!((config.bandit.epsilon - 0.25).abs() < 1e-12);
        assert_eq!(config.bandit.seed, Some(42));
        assert!((config.blend.content_weight - 0.7).abs() < 1e-12);
        assert!((config.blend.collaborative_weight - 0.4).abs() < 1e-12);
        assert_eq!(config.content.max_features, 100);
    }

    #[test]
    #[serial]
    fn test_invalid_epsilon_rejected() {
        clear_env();
        env::set_var("REC_BANDIT_EPSILON", "1.5");

        let result = EngineConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(RecommendError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_unparsable_value_is_config_error() {
        clear_env();
        env::set_var("REC_CONTENT_MAX_FEATURES", "lots");

        let result = EngineConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(RecommendError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_legacy_epsilon_key_is_fallback() {
        clear_env();
        env::set_var("REC_EPSILON", "0.3");
        let legacy = EngineConfig::from_env();

        env::set_var("REC_BANDIT_EPSILON", "0.05");
        let prefixed = EngineConfig::from_env();

        env::set_var("REC_EPSILON", "often");
        env::remove_var("REC_BANDIT_EPSILON");
        let unparsable = EngineConfig::from_env();
        clear_env();

        assert!((legacy.unwrap().bandit.epsilon - 0.3).abs() < 1e-12);
        assert!((prefixed.unwrap().bandit.epsilon - 0.05).abs() < 1e-12);
        assert!(matches!(unparsable, Err(RecommendError::Config(_))));
    }

    #[test]
    fn test_validate_window_bounds() {
        let mut config = EngineConfig::default();
        config.bandit.min_window = 30;
        assert!(config.validate().is_err());

        config.bandit.min_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_negative_weight() {
        let mut config = EngineConfig::default();
        config.blend.popularity_weight = -0.1;
        assert!(config.validate().is_err());

        config.blend.popularity_weight = f64::NAN;
        assert!(config.validate().is_err());
    }
}
