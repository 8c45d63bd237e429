//! Comparability-filter port.

use async_trait::async_trait;

use crate::domain::Offer;
use crate::error::FilterError;

/// Judges which offers are comparable to the target product.
///
/// This is a capability boundary: the filter may be an LLM, an embedding
/// model, or a heuristic. The pipeline depends only on the output contract,
/// never on the filter's internal reasoning. Every offer in the returned
/// vector carries `comparable = true`; offers omitted from the result are
/// excluded. Offers the filter cannot classify are dropped by the caller,
/// not treated as errors.
#[async_trait]
pub trait ComparabilityFilter: Send + Sync {
    /// Filter name for logging.
    fn name(&self) -> &'static str;

    /// Classify `offers` against the target description, returning the
    /// comparable subset.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when the whole batch cannot be classified.
    async fn classify(&self, target: &str, offers: &[Offer]) -> Result<Vec<Offer>, FilterError>;

    /// Maximum offers per classification call.
    fn batch_limit(&self) -> usize {
        20
    }
}
