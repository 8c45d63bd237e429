//! Domain validation errors for core domain types.
//!
//! These errors are returned by `try_new` constructors that validate inputs.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Offer prices must be positive.
    #[error("price must be positive, got {price}")]
    NonPositivePrice {
        /// The invalid price that was provided.
        price: rust_decimal::Decimal,
    },

    /// Product cost must be positive for margin math.
    #[error("cost must be positive, got {cost}")]
    NonPositiveCost {
        /// The invalid cost that was provided.
        cost: rust_decimal::Decimal,
    },

    /// Percentiles live in the closed range [0, 100].
    #[error("percentile must be within 0..=100, got {percentile}")]
    PercentileOutOfRange {
        /// The invalid percentile that was provided.
        percentile: rust_decimal::Decimal,
    },
}
