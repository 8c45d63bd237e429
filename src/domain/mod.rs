//! Marketplace-agnostic domain types.

pub mod error;
mod offer;
mod recommendation;
mod report;
mod stats;

pub use error::DomainError;
pub use offer::{Condition, Offer};
pub use recommendation::{
    Confidence, CurrentPricePosition, MarketPosition, PricingRecommendation, PricingStrategy,
};
pub use report::{AnalysisReport, DataSource, DropAccounting, StageTimings};
pub use stats::{GroupedStats, PriceDistributionStats, PERCENTILE_KEYS};
