use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::PricingRecommendation;
use crate::pipeline::Stage;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Statistics engine errors.
#[derive(Error, Debug, Clone)]
pub enum StatsError {
    /// No comparable, positive-price offers remained to aggregate.
    #[error("no comparable offers with a valid price to aggregate")]
    EmptyInput,
}

/// Recommendation engine errors.
#[derive(Error, Debug, Clone)]
pub enum RecommendError {
    /// The clean distribution was empty.
    #[error("insufficient data: no clean price observations")]
    InsufficientData,

    /// The percentile price breaches the configured margin floor.
    ///
    /// Carries the best feasible alternative (recomputed at the floor
    /// price) so the caller can decide whether to accept it. The engine
    /// never substitutes it silently.
    #[error(
        "recommended price {recommended} yields {margin_percent}% margin, below the {floor_percent}% floor"
    )]
    MarginViolation {
        recommended: rust_decimal::Decimal,
        margin_percent: rust_decimal::Decimal,
        floor_percent: rust_decimal::Decimal,
        best_feasible: Box<PricingRecommendation>,
    },
}

/// Offer-source transport errors.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network-level failure; worth retrying.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request deadline exceeded; worth retrying.
    #[error("request timed out")]
    Timeout,

    /// The source answered with something we cannot use; not retried.
    #[error("bad response: {0}")]
    BadResponse(String),
}

impl SourceError {
    /// Whether a retry could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, SourceError::Transport(_) | SourceError::Timeout)
    }
}

/// Comparability-filter errors.
#[derive(Error, Debug)]
pub enum FilterError {
    /// The classification backend failed; worth retrying.
    #[error("classifier backend error: {0}")]
    Backend(String),

    /// The backend answered but the verdict payload was unusable.
    #[error("malformed classification verdict: {0}")]
    MalformedVerdict(String),
}

impl FilterError {
    /// Whether a retry could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, FilterError::Backend(_))
    }
}

/// Pipeline orchestration errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Live collection failed and the fallback set was empty too.
    #[error("no comparable offers: live collection and fallback both came up empty")]
    EmptyComparableSet,

    /// A cancellable stage ran past the caller-supplied deadline.
    #[error("timed out during {stage}")]
    Timeout { stage: Stage },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
