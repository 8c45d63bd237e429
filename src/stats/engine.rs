//! Statistics engine: descriptive statistics with IQR outlier removal.
//!
//! Pure and synchronous. Consumes offers already marked comparable and with
//! a positive price; partitions by condition; computes clean statistics per
//! group with the removed outliers retained for audit.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::domain::{Condition, GroupedStats, Offer, PriceDistributionStats, PERCENTILE_KEYS};
use crate::error::StatsError;

use super::percentile::percentile;

/// IQR fence multiplier for outlier detection.
const IQR_FENCE: Decimal = Decimal::from_parts(15, 0, 0, false, 1); // 1.5

/// Compute grouped statistics over the comparable offers.
///
/// Offers that are not marked comparable or carry a non-positive price are
/// ignored. Grouping is by condition, with the same method as the overall
/// distribution; conditions with no offers are absent from the result.
///
/// # Errors
///
/// Returns [`StatsError::EmptyInput`] when nothing remains after filtering.
pub fn compute_stats(offers: &[Offer]) -> Result<GroupedStats, StatsError> {
    let valid: Vec<&Offer> = offers
        .iter()
        .filter(|o| o.comparable && o.price > Decimal::ZERO)
        .collect();

    if valid.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let overall = distribution(&valid);
    debug!(
        count = overall.count,
        outliers = overall.outliers_removed.len(),
        median = %overall.median,
        "Computed overall distribution"
    );

    let mut by_condition = BTreeMap::new();
    for condition in Condition::ALL {
        let group: Vec<&Offer> = valid
            .iter()
            .filter(|o| o.condition == condition)
            .copied()
            .collect();
        if !group.is_empty() {
            by_condition.insert(condition, distribution(&group));
        }
    }

    Ok(GroupedStats {
        overall,
        by_condition,
    })
}

/// Statistics for one non-empty group of offers.
fn distribution(offers: &[&Offer]) -> PriceDistributionStats {
    let mut full_values: Vec<Decimal> = offers.iter().map(|o| o.price).collect();
    full_values.sort();

    // Fences come from the full group so a heavy outlier cannot shift its
    // own exclusion bounds.
    let q1_full = percentile(&full_values, Decimal::from(25));
    let q3_full = percentile(&full_values, Decimal::from(75));
    let iqr_full = q3_full - q1_full;
    let lower = q1_full - IQR_FENCE * iqr_full;
    let upper = q3_full + IQR_FENCE * iqr_full;

    let mut clean: Vec<&Offer> = Vec::with_capacity(offers.len());
    let mut outliers_removed: Vec<Offer> = Vec::new();
    for offer in offers {
        if offer.price >= lower && offer.price <= upper {
            clean.push(offer);
        } else {
            outliers_removed.push((*offer).clone());
        }
    }

    // Never reduce a non-empty input to an empty clean set; if the fences
    // reject everything, skip removal and keep the full group.
    if clean.is_empty() {
        clean = offers.to_vec();
        outliers_removed.clear();
    }

    let mut clean_values: Vec<Decimal> = clean.iter().map(|o| o.price).collect();
    clean_values.sort();

    let count = clean_values.len();
    let n = Decimal::from(count);
    let mean = clean_values.iter().sum::<Decimal>() / n;
    let variance = clean_values
        .iter()
        .map(|v| (*v - mean) * (*v - mean))
        .sum::<Decimal>()
        / n;
    let std_dev = variance.sqrt().unwrap_or_default();
    let coefficient_of_variation = if mean > Decimal::ZERO {
        std_dev / mean
    } else {
        Decimal::ZERO
    };

    let q1 = percentile(&clean_values, Decimal::from(25));
    let median = percentile(&clean_values, Decimal::from(50));
    let q3 = percentile(&clean_values, Decimal::from(75));

    let percentiles: BTreeMap<u8, Decimal> = PERCENTILE_KEYS
        .iter()
        .map(|p| (*p, percentile(&clean_values, Decimal::from(*p))))
        .collect();

    PriceDistributionStats {
        count,
        count_before_removal: full_values.len(),
        min: clean_values[0],
        max: clean_values[count - 1],
        mean,
        median,
        std_dev,
        variance,
        coefficient_of_variation,
        q1,
        q3,
        iqr: q3 - q1,
        percentiles,
        outliers_removed,
        clean_values,
        full_values,
    }
}
