//! Implementations of ports (hexagonal adapters).

mod anthropic;
mod llm_filter;
mod marketplace;
mod sample;

pub use anthropic::AnthropicLlm;
pub use llm_filter::LlmFilter;
pub use marketplace::MarketplaceClient;
pub use sample::{sample_offers, AcceptAllFilter, StaticOfferSource};
