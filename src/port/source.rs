//! Offer-source port.

use async_trait::async_trait;

use crate::domain::Offer;
use crate::error::SourceError;

/// Collects raw competitor offers for a search query.
///
/// Implementations wrap a marketplace API or scraper. An empty result is a
/// valid answer ("no listings found") and must be `Ok`; only transport
/// failures are errors. Transient failures ([`SourceError::is_transient`])
/// are retried by the pipeline.
///
/// Implementations must be thread-safe (`Send + Sync`): the pipeline fans
/// out one collection task per query variant.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Collect offers matching `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] for transport failures only.
    async fn collect(&self, query: &str) -> Result<Vec<Offer>, SourceError>;
}
