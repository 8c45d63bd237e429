//! LLM completion port.
//!
//! Generic interface for large language model completion requests, used by
//! the LLM-backed comparability filter.

use async_trait::async_trait;

use crate::error::Result;

/// Client for large language model text completion.
///
/// Implementations wrap specific providers and handle authentication and
/// response parsing. Must be thread-safe (`Send + Sync`) to support
/// concurrent classification batches.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is
    /// invalid.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
