//! Price distribution statistics types.
//!
//! Output of the statistics engine: descriptive statistics for one group of
//! offers after IQR outlier removal, plus the per-condition breakdown.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::offer::{Condition, Offer};

/// Percentile keys reported in [`PriceDistributionStats::percentiles`].
pub const PERCENTILE_KEYS: [u8; 11] = [10, 20, 25, 30, 40, 50, 60, 70, 75, 80, 90];

/// Descriptive statistics for one group of offers.
///
/// All central measures (`min` through `iqr` and `percentiles`) are computed
/// on the clean set, i.e. after IQR outlier removal. The removed offers are
/// retained in `outliers_removed` for audit, and the full pre-removal price
/// vector is kept for percentile-rank lookups.
#[derive(Debug, Clone, Serialize)]
pub struct PriceDistributionStats {
    /// Offers remaining after outlier removal.
    pub count: usize,
    /// Offers before outlier removal.
    pub count_before_removal: usize,
    pub min: Decimal,
    pub max: Decimal,
    pub mean: Decimal,
    pub median: Decimal,
    pub std_dev: Decimal,
    pub variance: Decimal,
    pub coefficient_of_variation: Decimal,
    pub q1: Decimal,
    pub q3: Decimal,
    pub iqr: Decimal,
    /// Clean-set price at each key of [`PERCENTILE_KEYS`].
    pub percentiles: BTreeMap<u8, Decimal>,
    /// Offers excluded by the IQR fences, in input order.
    pub outliers_removed: Vec<Offer>,
    /// Sorted clean prices; the percentile basis for recommendations.
    #[serde(skip)]
    pub clean_values: Vec<Decimal>,
    /// Sorted pre-removal prices; the ranking basis for market position.
    #[serde(skip)]
    pub full_values: Vec<Decimal>,
}

impl PriceDistributionStats {
    /// Interquartile spread relative to the median. Proxy for market price
    /// dispersion; drives strategy selection.
    #[must_use]
    pub fn spread_ratio(&self) -> Decimal {
        if self.median.is_zero() {
            Decimal::ZERO
        } else {
            self.iqr / self.median
        }
    }

    /// Percentile rank of `price` within the full pre-removal distribution:
    /// the share of observations at or below it, as a percentage.
    #[must_use]
    pub fn rank_in_full(&self, price: Decimal) -> Decimal {
        if self.full_values.is_empty() {
            return Decimal::ZERO;
        }
        let at_or_below = self.full_values.iter().filter(|v| **v <= price).count();
        Decimal::from(at_or_below) / Decimal::from(self.full_values.len()) * Decimal::ONE_HUNDRED
    }
}

/// Statistics for the whole comparable set plus each condition group.
///
/// A condition with zero comparable offers is absent from `by_condition`,
/// never present with degenerate contents.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedStats {
    pub overall: PriceDistributionStats,
    pub by_condition: BTreeMap<Condition, PriceDistributionStats>,
}
