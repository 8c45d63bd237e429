//! Marketplace search API client.
//!
//! REST adapter for the [`OfferSource`] port. Hits the marketplace search
//! endpoint, maps listings into [`Offer`]s, and rejects listings with a
//! missing or non-positive price before they reach the pipeline.

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::MarketplaceConfig;
use crate::domain::{Condition, Offer};
use crate::error::SourceError;
use crate::port::OfferSource;

/// HTTP client for the marketplace search API.
pub struct MarketplaceClient {
    client: Client,
    base_url: String,
    search_limit: usize,
}

impl MarketplaceClient {
    #[must_use]
    pub fn new(config: &MarketplaceConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            search_limit: config.search_limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ListingRecord>,
}

#[derive(Debug, Deserialize)]
struct ListingRecord {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    seller: Option<SellerRecord>,
    #[serde(default)]
    permalink: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SellerRecord {
    #[serde(default)]
    nickname: Option<String>,
}

impl ListingRecord {
    /// Map a listing into a validated offer. `None` when the price is
    /// missing or non-positive.
    fn into_offer(self) -> Option<Offer> {
        let price = self.price?;
        let condition = self
            .condition
            .as_deref()
            .map(Condition::parse)
            .unwrap_or_default();
        let mut offer = Offer::try_new(self.id, price, condition).ok()?;
        offer.title = self.title;
        offer.seller = self.seller.and_then(|s| s.nickname);
        offer.url = self.permalink;
        Some(offer)
    }
}

#[async_trait]
impl OfferSource for MarketplaceClient {
    fn name(&self) -> &'static str {
        "marketplace"
    }

    async fn collect(&self, query: &str) -> Result<Vec<Offer>, SourceError> {
        let url = format!(
            "{}/search?q={}&limit={}",
            self.base_url,
            urlencode(query),
            self.search_limit
        );

        info!(url = %url, "Searching marketplace");

        let response = self.client.get(&url).send().await.map_err(classify_error)?;
        let response = response.error_for_status().map_err(classify_error)?;
        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::BadResponse(e.to_string()))?;

        let total = search.results.len();
        let offers: Vec<Offer> = search
            .results
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                let offer = record.into_offer();
                if offer.is_none() {
                    warn!(listing = %id, "Dropping listing with missing or invalid price");
                }
                offer
            })
            .collect();

        debug!(
            query = %query,
            listings = total,
            offers = offers.len(),
            "Mapped search results"
        );

        Ok(offers)
    }
}

fn classify_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout
    } else if err.is_status() {
        SourceError::BadResponse(err.to_string())
    } else {
        SourceError::Transport(err.to_string())
    }
}

/// Minimal query-string escaping for the search parameter.
fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            ' ' => out.push('+'),
            c if c.is_ascii_alphanumeric() || "-_.~".contains(c) => out.push(c),
            c => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    out.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn listing_with_price_maps_to_offer() {
        let record = ListingRecord {
            id: "MLA123".into(),
            title: Some("Parlante bluetooth 20W".into()),
            price: Some(dec!(18999.99)),
            condition: Some("new".into()),
            seller: Some(SellerRecord {
                nickname: Some("TECNOSHOP".into()),
            }),
            permalink: Some("https://example.com/MLA123".into()),
        };
        let offer = record.into_offer().unwrap();
        assert_eq!(offer.identifier, "MLA123");
        assert_eq!(offer.price, dec!(18999.99));
        assert_eq!(offer.condition, Condition::New);
        assert_eq!(offer.seller.as_deref(), Some("TECNOSHOP"));
        assert!(!offer.comparable);
    }

    #[test]
    fn listing_without_price_is_dropped() {
        let record = ListingRecord {
            id: "MLA124".into(),
            title: None,
            price: None,
            condition: None,
            seller: None,
            permalink: None,
        };
        assert!(record.into_offer().is_none());
    }

    #[test]
    fn listing_with_zero_price_is_dropped() {
        let record = ListingRecord {
            id: "MLA125".into(),
            title: None,
            price: Some(Decimal::ZERO),
            condition: Some("used".into()),
            seller: None,
            permalink: None,
        };
        assert!(record.into_offer().is_none());
    }

    #[test]
    fn urlencode_escapes_query_text() {
        assert_eq!(urlencode("parlante 20w"), "parlante+20w");
        assert_eq!(urlencode("a&b"), "a%26b");
    }
}
