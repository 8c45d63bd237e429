//! Pricing recommendation types.
//!
//! The final output of the recommendation engine. Derived purely from
//! [`GroupedStats`](super::stats::GroupedStats) and caller parameters; holds
//! no reference back to raw offers and no time-dependent fields, so reruns
//! over the same snapshot are byte-identical.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

/// Pricing strategy implied by the chosen percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingStrategy {
    Competitive,
    Balanced,
    Value,
    Premium,
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingStrategy::Competitive => write!(f, "competitive"),
            PricingStrategy::Balanced => write!(f, "balanced"),
            PricingStrategy::Value => write!(f, "value"),
            PricingStrategy::Premium => write!(f, "premium"),
        }
    }
}

/// Percentile bucket of a price within the observed distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPosition {
    Budget,
    Competitive,
    Premium,
    Luxury,
}

impl MarketPosition {
    /// Bucket a percentile rank: <25 budget, 25-74 competitive,
    /// 75-89 premium, >=90 luxury.
    #[must_use]
    pub fn from_rank(rank: Decimal) -> Self {
        if rank < Decimal::from(25) {
            MarketPosition::Budget
        } else if rank < Decimal::from(75) {
            MarketPosition::Competitive
        } else if rank < Decimal::from(90) {
            MarketPosition::Premium
        } else {
            MarketPosition::Luxury
        }
    }
}

impl fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketPosition::Budget => write!(f, "budget"),
            MarketPosition::Competitive => write!(f, "competitive"),
            MarketPosition::Premium => write!(f, "premium"),
            MarketPosition::Luxury => write!(f, "luxury"),
        }
    }
}

/// Confidence in a recommendation, from sample size and dispersion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Where the caller's current price sits in the observed market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPricePosition {
    pub price: Decimal,
    /// Percentile rank against the full pre-removal distribution.
    pub percentile: Decimal,
    /// Margin over cost at the current price, as a percentage.
    pub margin_percent: Decimal,
}

/// A defensible price recommendation with supporting context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingRecommendation {
    pub recommended_price: Decimal,
    pub strategy: PricingStrategy,
    pub market_position: MarketPosition,
    pub confidence: Confidence,
    /// Percentile of the clean distribution the price was read from.
    pub target_percentile: Decimal,
    /// Margin over cost at the recommended price, as a percentage.
    pub margin_percent: Decimal,
    /// Aggressive / recommended / premium price points.
    pub alternative_prices: [Decimal; 3],
    /// Deterministic template; reproducible from the other fields.
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price_position: Option<CurrentPricePosition>,
}
