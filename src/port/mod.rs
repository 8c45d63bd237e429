//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the contracts the pipeline consumes; adapters implement them
//! to integrate external systems (marketplace APIs, LLM providers). The
//! core never depends on an adapter's internals, only on these traits.

mod filter;
mod llm;
mod source;

pub use filter::ComparabilityFilter;
pub use llm::Llm;
pub use source::OfferSource;
