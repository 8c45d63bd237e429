//! Pipeline orchestration.
//!
//! Sequences collection, filtering, aggregation, and recommendation into
//! one `analyze` run: collect offers from every query variant in parallel,
//! filter them for comparability in concurrent batches, compute grouped
//! statistics, derive the recommendation, and assemble the report.
//!
//! Failure discipline: the cancellable stages (collection, filtering) are
//! retried on transient errors and fall back to the static sample set when
//! they produce nothing; the pure stages are never retried and their typed
//! failures propagate to the caller. A fatal error is never converted into
//! a degraded success silently.

mod retry;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::task::JoinSet;
use tokio::time::timeout_at;
use tracing::{error, info, warn};

use crate::config::{PipelineConfig, RecommendationConfig};
use crate::domain::{
    AnalysisReport, DataSource, DropAccounting, Offer, StageTimings,
};
use crate::error::{FilterError, PipelineError, Result, SourceError};
use crate::port::{ComparabilityFilter, OfferSource};
use crate::recommend::{recommend, RecommendParams};
use crate::stats::compute_stats;

pub use retry::with_retry;

/// Pipeline stage, for timing attribution and timeout errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Collecting,
    Filtering,
    Aggregating,
    Recommending,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Collecting => write!(f, "collection"),
            Stage::Filtering => write!(f, "filtering"),
            Stage::Aggregating => write!(f, "aggregation"),
            Stage::Recommending => write!(f, "recommendation"),
        }
    }
}

/// One analysis request.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    /// Target product description; also the comparability reference.
    pub product: String,
    /// Search-term variants. Empty means "search for the product text".
    pub queries: Vec<String>,
    pub cost: Decimal,
    /// Overrides the configured default target margin.
    pub target_margin_percent: Option<Decimal>,
    pub target_percentile: Option<Decimal>,
    pub current_price: Option<Decimal>,
    /// Overrides the configured collection/filtering deadline.
    pub timeout: Option<Duration>,
}

impl AnalyzeRequest {
    #[must_use]
    pub fn new(product: impl Into<String>, cost: Decimal) -> Self {
        Self {
            product: product.into(),
            queries: Vec::new(),
            cost,
            target_margin_percent: None,
            target_percentile: None,
            current_price: None,
            timeout: None,
        }
    }

    fn effective_queries(&self) -> Vec<String> {
        if self.queries.is_empty() {
            vec![self.product.clone()]
        } else {
            self.queries.clone()
        }
    }
}

struct CollectedBatch {
    offers: Vec<Offer>,
    collected: usize,
    invalid_dropped: usize,
    all_failed: bool,
}

/// Orchestrates one analysis run over pluggable collaborators.
pub struct Pipeline {
    source: Arc<dyn OfferSource>,
    filter: Arc<dyn ComparabilityFilter>,
    fallback: Vec<Offer>,
    config: PipelineConfig,
    recommendation: RecommendationConfig,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        source: Arc<dyn OfferSource>,
        filter: Arc<dyn ComparabilityFilter>,
        config: PipelineConfig,
        recommendation: RecommendationConfig,
    ) -> Self {
        Self {
            source,
            filter,
            fallback: crate::adapter::sample_offers(),
            config,
            recommendation,
        }
    }

    /// Replace the fallback offer set.
    #[must_use]
    pub fn with_fallback(mut self, offers: Vec<Offer>) -> Self {
        self.fallback = offers;
        self
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Timeout`] when collection or filtering overruns
    ///   the deadline.
    /// - [`PipelineError::EmptyComparableSet`] when filtering and the
    ///   fallback set both produce nothing.
    /// - [`RecommendError`](crate::error::RecommendError) failures from the
    ///   recommendation stage, margin violations included.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisReport> {
        let run_started = Instant::now();
        let deadline = tokio::time::Instant::now()
            + request
                .timeout
                .unwrap_or(Duration::from_secs(self.config.timeout_secs));

        let queries = request.effective_queries();
        info!(
            product = %request.product,
            queries = queries.len(),
            "Starting price analysis"
        );

        let mut timings = StageTimings::default();
        let mut drops = DropAccounting::default();
        let mut data_source = DataSource::Live;

        // COLLECTING
        let stage_started = Instant::now();
        let batch = timeout_at(deadline, self.collect_stage(&queries))
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: Stage::Collecting,
            })?;
        timings.collecting = stage_started.elapsed();
        drops.collected = batch.collected;
        drops.deduped = batch.offers.len();
        drops.invalid_price_dropped = batch.invalid_dropped;

        // FILTERING (skipped on the fallback path: the sample set is curated)
        let stage_started = Instant::now();
        let comparable = if batch.all_failed || batch.offers.is_empty() {
            warn!("Collection produced no offers, substituting fallback sample data");
            data_source = DataSource::Fallback;
            self.fallback.clone()
        } else {
            let (kept, unclassified) = timeout_at(
                deadline,
                self.filter_stage(&request.product, batch.offers),
            )
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: Stage::Filtering,
            })?;
            drops.unclassified_dropped = unclassified;
            if kept.is_empty() {
                warn!("Filter rejected every offer, substituting fallback sample data");
                data_source = DataSource::Fallback;
                self.fallback.clone()
            } else {
                kept
            }
        };
        timings.filtering = stage_started.elapsed();
        drops.comparable = comparable.len();

        if comparable.is_empty() {
            return Err(PipelineError::EmptyComparableSet.into());
        }

        // AGGREGATING (pure, no retry, no timeout)
        let stage_started = Instant::now();
        let stats = compute_stats(&comparable).map_err(|_| PipelineError::EmptyComparableSet)?;
        timings.aggregating = stage_started.elapsed();

        // RECOMMENDING (pure, no retry, no timeout)
        let stage_started = Instant::now();
        let mut params = RecommendParams::try_new(
            request.cost,
            request
                .target_margin_percent
                .unwrap_or(self.recommendation.target_margin_percent),
            self.recommendation.min_margin_percent,
        )?;
        if let Some(p) = request.target_percentile {
            params = params.with_target_percentile(p)?;
        }
        if let Some(price) = request.current_price {
            params = params.with_current_price(price);
        }
        let recommendation = recommend(&stats, &params)?;
        timings.recommending = stage_started.elapsed();
        timings.total = run_started.elapsed();

        info!(
            recommended = %recommendation.recommended_price,
            confidence = %recommendation.confidence,
            data_source = %data_source,
            comparable = drops.comparable,
            invalid_dropped = drops.invalid_price_dropped,
            unclassified_dropped = drops.unclassified_dropped,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            stats,
            recommendation,
            data_source,
            timings,
            drops,
            generated_at: Utc::now(),
        })
    }

    /// Fan out one collection task per query, merge and dedup by
    /// identifier (last write wins), drop invalid prices.
    async fn collect_stage(&self, queries: &[String]) -> CollectedBatch {
        let mut set = JoinSet::new();
        for query in queries {
            let source = Arc::clone(&self.source);
            let query = query.clone();
            let retries = self.config.max_retries;
            let backoff = Duration::from_millis(self.config.backoff_ms);
            set.spawn(async move {
                let result = with_retry(retries, backoff, SourceError::is_transient, || {
                    source.collect(&query)
                })
                .await;
                (query, result)
            });
        }

        let mut merged: HashMap<String, Offer> = HashMap::new();
        let mut collected = 0;
        let mut invalid_dropped = 0;
        let mut failed_queries = 0;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_query, Ok(offers))) => {
                    collected += offers.len();
                    for offer in offers {
                        if offer.price <= Decimal::ZERO {
                            warn!(
                                identifier = %offer.identifier,
                                price = %offer.price,
                                "Dropping offer with non-positive price"
                            );
                            invalid_dropped += 1;
                            continue;
                        }
                        merged.insert(offer.identifier.clone(), offer);
                    }
                }
                Ok((query, Err(err))) => {
                    failed_queries += 1;
                    warn!(query = %query, error = %err, "Collection query failed");
                }
                Err(join_err) => {
                    failed_queries += 1;
                    error!(error = %join_err, "Collection task panicked");
                }
            }
        }

        let all_failed = failed_queries == queries.len();
        let mut offers: Vec<Offer> = merged.into_values().collect();
        // Stable input for the later stages regardless of join order
        offers.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        CollectedBatch {
            offers,
            collected,
            invalid_dropped,
            all_failed,
        }
    }

    /// Classify offers in concurrent fixed-size batches. A batch that
    /// cannot be classified is dropped and counted, never fatal.
    async fn filter_stage(&self, target: &str, offers: Vec<Offer>) -> (Vec<Offer>, usize) {
        let batch_size = self
            .config
            .filter_batch_size
            .min(self.filter.batch_limit())
            .max(1);

        let mut set = JoinSet::new();
        for chunk in offers.chunks(batch_size) {
            let filter = Arc::clone(&self.filter);
            let target = target.to_string();
            let batch: Vec<Offer> = chunk.to_vec();
            let retries = self.config.max_retries;
            let backoff = Duration::from_millis(self.config.backoff_ms);
            set.spawn(async move {
                let size = batch.len();
                let result = with_retry(retries, backoff, FilterError::is_transient, || {
                    filter.classify(&target, &batch)
                })
                .await;
                (size, result)
            });
        }

        let mut comparable = Vec::new();
        let mut unclassified = 0;
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(kept))) => comparable.extend(kept),
                Ok((size, Err(err))) => {
                    unclassified += size;
                    warn!(
                        batch_size = size,
                        error = %err,
                        "Dropping unclassified batch"
                    );
                }
                Err(join_err) => {
                    error!(error = %join_err, "Classification task panicked");
                }
            }
        }

        // Commutative merge: batch order must not matter downstream
        comparable.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        (comparable, unclassified)
    }
}
