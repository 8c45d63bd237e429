//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with full defaults, so the
//! binary runs without one. API keys come from the environment only, never
//! from the file.

use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists; fall back to defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.marketplace.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "marketplace.base_url",
                reason: "cannot be empty".into(),
            }
            .into());
        }
        if self.pipeline.filter_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.filter_batch_size",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.recommendation.min_margin_percent > self.recommendation.target_margin_percent {
            return Err(ConfigError::InvalidValue {
                field: "recommendation.min_margin_percent",
                reason: "cannot exceed target_margin_percent".into(),
            }
            .into());
        }
        Ok(())
    }
}

/// Marketplace search API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketplaceConfig {
    /// Base URL of the marketplace search API.
    pub base_url: String,
    /// Maximum listings requested per query.
    pub search_limit: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mercadolibre.com/sites/MLA".into(),
            search_limit: 50,
        }
    }
}

/// LLM provider settings for the comparability filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-haiku-latest".into(),
            max_tokens: 2048,
            temperature: 0.0,
        }
    }
}

/// Pipeline retry, batching, and timeout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Retries per collection/classification call on transient failures.
    pub max_retries: u32,
    /// Base backoff between retries, doubled each attempt.
    pub backoff_ms: u64,
    /// Offers per concurrent classification batch.
    pub filter_batch_size: usize,
    /// Deadline for the cancellable stages (collection + filtering).
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_ms: 500,
            filter_batch_size: 20,
            timeout_secs: 60,
        }
    }
}

/// Business defaults for the recommendation engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Desired profit margin when the caller does not supply one.
    pub target_margin_percent: Decimal,
    /// Hard floor; recommendations below it surface as margin violations.
    pub min_margin_percent: Decimal,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            target_margin_percent: dec!(30),
            min_margin_percent: dec!(10),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [pipeline]
            max_retries = 5
            backoff_ms = 100
            filter_batch_size = 10
            timeout_secs = 30

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.max_retries, 5);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.marketplace.search_limit, 50);
        assert_eq!(config.recommendation.target_margin_percent, dec!(30));
    }

    #[test]
    fn loads_from_file_and_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repricer.toml");
        std::fs::write(&path, "[marketplace]\nsearch_limit = 25\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.marketplace.search_limit, 25);

        let missing = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing.marketplace.search_limit, 50);
    }

    #[test]
    fn rejects_zero_batch_size() {
        let mut config = Config::default();
        config.pipeline.filter_batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_floor_above_target_margin() {
        let mut config = Config::default();
        config.recommendation.min_margin_percent = dec!(50);
        assert!(config.validate().is_err());
    }
}
