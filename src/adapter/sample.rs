//! Static sample data source and trivial filter.
//!
//! The fallback offer set substituted when live collection fails or returns
//! nothing. Substitution is never silent: the pipeline flags the result
//! `data_source = fallback` and logs the switch. Also useful for offline
//! runs (`repricer analyze --sample`) and tests.

use async_trait::async_trait;
use rust_decimal_macros::dec;

use crate::domain::{Condition, Offer};
use crate::error::{FilterError, SourceError};
use crate::port::{ComparabilityFilter, OfferSource};

/// Pre-recorded competitor offers for a mid-range bluetooth speaker.
#[must_use]
pub fn sample_offers() -> Vec<Offer> {
    let listings: [(&str, rust_decimal::Decimal, Condition, &str); 16] = [
        ("SAMPLE-001", dec!(18999), Condition::New, "Parlante bluetooth 20W IPX6"),
        ("SAMPLE-002", dec!(19500), Condition::New, "Parlante portatil 20W bluetooth 5.0"),
        ("SAMPLE-003", dec!(17250), Condition::New, "Parlante bluetooth 20W con radio FM"),
        ("SAMPLE-004", dec!(21000), Condition::New, "Parlante bluetooth 24W resistente al agua"),
        ("SAMPLE-005", dec!(16800), Condition::New, "Parlante inalambrico 20W"),
        ("SAMPLE-006", dec!(22499), Condition::New, "Parlante bluetooth premium 20W"),
        ("SAMPLE-007", dec!(18500), Condition::New, "Parlante bluetooth 20W luces LED"),
        ("SAMPLE-008", dec!(20100), Condition::New, "Parlante portatil 22W bluetooth"),
        ("SAMPLE-009", dec!(19999), Condition::New, "Parlante bluetooth 20W TWS"),
        ("SAMPLE-010", dec!(17999), Condition::New, "Parlante bluetooth 18W compacto"),
        ("SAMPLE-011", dec!(23500), Condition::New, "Parlante bluetooth 25W graves reforzados"),
        ("SAMPLE-012", dec!(14500), Condition::Used, "Parlante bluetooth 20W usado"),
        ("SAMPLE-013", dec!(13900), Condition::Used, "Parlante portatil 20W impecable"),
        ("SAMPLE-014", dec!(15200), Condition::Used, "Parlante bluetooth 20W poco uso"),
        ("SAMPLE-015", dec!(18750), Condition::New, "Parlante bluetooth 20W manos libres"),
        ("SAMPLE-016", dec!(20500), Condition::New, "Parlante bluetooth 20W estuche incluido"),
    ];

    listings
        .into_iter()
        .map(|(id, price, condition, title)| {
            Offer {
                price,
                condition,
                identifier: id.into(),
                comparable: true,
                title: Some(title.into()),
                seller: None,
                url: None,
            }
        })
        .collect()
}

/// Offer source that serves a fixed set, ignoring the query.
pub struct StaticOfferSource {
    offers: Vec<Offer>,
}

impl StaticOfferSource {
    #[must_use]
    pub fn new(offers: Vec<Offer>) -> Self {
        Self { offers }
    }
}

impl Default for StaticOfferSource {
    fn default() -> Self {
        Self::new(sample_offers())
    }
}

#[async_trait]
impl OfferSource for StaticOfferSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn collect(&self, _query: &str) -> Result<Vec<Offer>, SourceError> {
        Ok(self.offers.clone())
    }
}

/// Filter that accepts every offer. For offline runs where the sample set
/// is already curated.
pub struct AcceptAllFilter;

#[async_trait]
impl ComparabilityFilter for AcceptAllFilter {
    fn name(&self) -> &'static str {
        "accept-all"
    }

    async fn classify(&self, _target: &str, offers: &[Offer]) -> Result<Vec<Offer>, FilterError> {
        Ok(offers.iter().map(|o| o.clone().mark_comparable()).collect())
    }
}
