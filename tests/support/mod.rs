#![allow(dead_code)]

//! Fake collaborators for pipeline tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use repricer::domain::{Condition, Offer};
use repricer::error::{FilterError, SourceError};
use repricer::port::{ComparabilityFilter, OfferSource};

/// Build a comparable offer with a fixed identifier scheme.
pub fn offer(id: &str, price: i64, condition: Condition) -> Offer {
    Offer::try_new(id, Decimal::from(price), condition).unwrap()
}

/// Fifteen clustered prices plus one high outlier, mirroring a realistic
/// market snapshot.
pub fn market_offers() -> Vec<Offer> {
    let prices = [
        500, 520, 540, 560, 580, 600, 620, 640, 660, 680, 700, 720, 740, 760, 1500,
    ];
    prices
        .iter()
        .enumerate()
        .map(|(i, p)| offer(&format!("MLA{i:03}"), *p, Condition::New))
        .collect()
}

/// Scripted offer source: fails `failures_before_success` times with a
/// transient error, then serves the configured offers. Records attempts.
pub struct ScriptedSource {
    offers: Vec<Offer>,
    failures_before_success: usize,
    attempts: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn serving(offers: Vec<Offer>) -> Self {
        Self {
            offers,
            failures_before_success: 0,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures_before_success = failures;
        self
    }

    pub fn attempt_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait]
impl OfferSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn collect(&self, _query: &str) -> Result<Vec<Offer>, SourceError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures_before_success {
            Err(SourceError::Timeout)
        } else {
            Ok(self.offers.clone())
        }
    }
}

/// Source that sleeps past any reasonable deadline before answering.
pub struct SlowSource(pub std::time::Duration);

#[async_trait]
impl OfferSource for SlowSource {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn collect(&self, _query: &str) -> Result<Vec<Offer>, SourceError> {
        tokio::time::sleep(self.0).await;
        Ok(market_offers())
    }
}

/// Source that always fails with a permanent error.
pub struct BrokenSource;

#[async_trait]
impl OfferSource for BrokenSource {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn collect(&self, _query: &str) -> Result<Vec<Offer>, SourceError> {
        Err(SourceError::BadResponse("boom".into()))
    }
}

/// Filter that accepts everything.
pub struct PassthroughFilter;

#[async_trait]
impl ComparabilityFilter for PassthroughFilter {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    async fn classify(&self, _target: &str, offers: &[Offer]) -> Result<Vec<Offer>, FilterError> {
        Ok(offers.iter().map(|o| o.clone().mark_comparable()).collect())
    }
}

/// Filter that rejects everything (returns an empty comparable set).
pub struct RejectAllFilter;

#[async_trait]
impl ComparabilityFilter for RejectAllFilter {
    fn name(&self) -> &'static str {
        "reject-all"
    }

    async fn classify(&self, _target: &str, _offers: &[Offer]) -> Result<Vec<Offer>, FilterError> {
        Ok(Vec::new())
    }
}

/// Filter whose classification calls always fail permanently, so every
/// batch ends up dropped as unclassified.
pub struct FailingFilter;

#[async_trait]
impl ComparabilityFilter for FailingFilter {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn classify(&self, _target: &str, _offers: &[Offer]) -> Result<Vec<Offer>, FilterError> {
        Err(FilterError::MalformedVerdict("not json".into()))
    }
}
