//! Competitor offer types.
//!
//! An [`Offer`] is one observed competitor listing. Offers enter the system
//! from an offer source, get tagged by the comparability filter, and feed the
//! statistics engine. The `identifier` is the dedup key within a collection
//! run.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Item condition reported by the marketplace listing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Used,
    #[default]
    Unknown,
}

impl Condition {
    /// All conditions, in grouping order.
    pub const ALL: [Condition; 3] = [Condition::New, Condition::Used, Condition::Unknown];

    /// Parse a marketplace condition string, mapping anything unrecognized
    /// to `Unknown`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "new" => Condition::New,
            "used" => Condition::Used,
            _ => Condition::Unknown,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::New => write!(f, "new"),
            Condition::Used => write!(f, "used"),
            Condition::Unknown => write!(f, "unknown"),
        }
    }
}

/// One observed competitor listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Listing price. Always positive; enforced by [`Offer::try_new`].
    pub price: Decimal,
    /// Item condition.
    pub condition: Condition,
    /// Opaque listing identifier, unique within a collection run.
    pub identifier: String,
    /// Whether the comparability filter accepted this offer.
    pub comparable: bool,
    /// Listing title, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Seller name, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    /// Listing URL, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Offer {
    /// Create a validated offer.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositivePrice`] when `price <= 0`.
    pub fn try_new(
        identifier: impl Into<String>,
        price: Decimal,
        condition: Condition,
    ) -> Result<Self, DomainError> {
        if price <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice { price });
        }
        Ok(Self {
            price,
            condition,
            identifier: identifier.into(),
            comparable: false,
            title: None,
            seller: None,
            url: None,
        })
    }

    /// Attach a listing title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a seller name.
    #[must_use]
    pub fn with_seller(mut self, seller: impl Into<String>) -> Self {
        self.seller = Some(seller.into());
        self
    }

    /// Attach a listing URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Mark the offer as accepted by the comparability filter.
    #[must_use]
    pub fn mark_comparable(mut self) -> Self {
        self.comparable = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn try_new_accepts_positive_price() {
        let offer = Offer::try_new("MLA1", dec!(1250.50), Condition::New).unwrap();
        assert_eq!(offer.identifier, "MLA1");
        assert_eq!(offer.price, dec!(1250.50));
        assert!(!offer.comparable);
    }

    #[test]
    fn try_new_rejects_zero_price() {
        let result = Offer::try_new("MLA2", Decimal::ZERO, Condition::New);
        assert!(matches!(result, Err(DomainError::NonPositivePrice { .. })));
    }

    #[test]
    fn try_new_rejects_negative_price() {
        let result = Offer::try_new("MLA3", dec!(-10), Condition::Used);
        assert!(matches!(result, Err(DomainError::NonPositivePrice { .. })));
    }

    #[test]
    fn condition_parse_maps_unrecognized_to_unknown() {
        assert_eq!(Condition::parse("new"), Condition::New);
        assert_eq!(Condition::parse("Used"), Condition::Used);
        assert_eq!(Condition::parse("refurbished"), Condition::Unknown);
        assert_eq!(Condition::parse(""), Condition::Unknown);
    }

    #[test]
    fn mark_comparable_sets_flag() {
        let offer = Offer::try_new("MLA4", dec!(99), Condition::New)
            .unwrap()
            .mark_comparable();
        assert!(offer.comparable);
    }
}
