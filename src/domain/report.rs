//! Analysis report assembled by the pipeline.
//!
//! Bundles the statistics, the recommendation, the data-source flag, stage
//! timings, and drop accounting. This is the one place a timestamp lives;
//! the recommendation itself stays time-free.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::recommendation::PricingRecommendation;
use super::stats::GroupedStats;

/// Whether the analysis ran on live offers or the static fallback set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Live => write!(f, "live"),
            DataSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Wall-clock duration of each pipeline stage.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StageTimings {
    pub collecting: Duration,
    pub filtering: Duration,
    pub aggregating: Duration,
    pub recommending: Duration,
    pub total: Duration,
}

/// Accounting for offers dropped along the way.
///
/// Every report states how many offers were dropped and why; drops are
/// logged during the run but never silently absorbed into the result.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DropAccounting {
    /// Raw offers collected before dedup.
    pub collected: usize,
    /// Unique offers after dedup by identifier.
    pub deduped: usize,
    /// Offers rejected for non-positive or missing price.
    pub invalid_price_dropped: usize,
    /// Offers the filter failed to classify (treated as non-comparable).
    pub unclassified_dropped: usize,
    /// Offers accepted as comparable.
    pub comparable: usize,
}

/// Final result of one `analyze` run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub stats: GroupedStats,
    pub recommendation: PricingRecommendation,
    pub data_source: DataSource,
    pub timings: StageTimings,
    pub drops: DropAccounting,
    pub generated_at: DateTime<Utc>,
}
