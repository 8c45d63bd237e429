//! Recommendation engine.
//!
//! Pure derivation of a [`PricingRecommendation`] from grouped statistics
//! and business parameters. Deterministic: the same inputs always produce
//! an identical recommendation.

mod engine;

pub use engine::{recommend, RecommendParams};
