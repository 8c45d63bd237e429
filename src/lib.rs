//! Repricer - Competitive price discovery and recommendation.
//!
//! This crate ingests competitor price observations for a target product,
//! removes noise, and produces a defensible price recommendation with
//! supporting statistics and alternatives.
//!
//! # Architecture
//!
//! Data flows one direction through a staged pipeline:
//!
//! raw offers → comparable offers → statistics → recommendation
//!
//! - [`stats`] - Statistics engine: IQR outlier removal, percentiles,
//!   grouping by condition. Pure, no I/O.
//! - [`recommend`] - Recommendation engine: strategy selection, confidence
//!   scoring, alternatives, margin-floor enforcement. Pure, deterministic.
//! - [`pipeline`] - Orchestrator: parallel collection, batched filtering,
//!   retry/backoff, fallback to sample data, stage timings.
//! - [`port`] - Collaborator contracts: [`port::OfferSource`],
//!   [`port::ComparabilityFilter`], [`port::Llm`].
//! - [`adapter`] - Marketplace REST client, LLM-backed filter, Anthropic
//!   client, static sample source.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rust_decimal_macros::dec;
//! use repricer::adapter::{AcceptAllFilter, StaticOfferSource};
//! use repricer::config::{PipelineConfig, RecommendationConfig};
//! use repricer::pipeline::{AnalyzeRequest, Pipeline};
//!
//! # async fn run() -> repricer::error::Result<()> {
//! let pipeline = Pipeline::new(
//!     Arc::new(StaticOfferSource::default()),
//!     Arc::new(AcceptAllFilter),
//!     PipelineConfig::default(),
//!     RecommendationConfig::default(),
//! );
//! let report = pipeline
//!     .analyze(AnalyzeRequest::new("parlante bluetooth 20w", dec!(9000)))
//!     .await?;
//! println!("{}", report.recommendation.recommended_price);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod port;
pub mod recommend;
pub mod stats;
