//! Linear-interpolation percentile.
//!
//! Single shared implementation used by both the statistics and the
//! recommendation engines, so `percentile(50) == median` holds everywhere.
//! Rank is `p/100 * (n-1)`, interpolated between adjacent sorted values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Price at percentile `p` of `sorted` (ascending). `p` is clamped to
/// [0, 100]. Returns zero for an empty slice; callers guard non-emptiness.
#[must_use]
pub fn percentile(sorted: &[Decimal], p: Decimal) -> Decimal {
    if sorted.is_empty() {
        return Decimal::ZERO;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let p = p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let rank = p / Decimal::ONE_HUNDRED * Decimal::from(sorted.len() - 1);
    let lower = rank.floor();
    let frac = rank - lower;

    // floor of a value in 0..n-1 always fits in usize
    let idx = lower.to_usize().unwrap_or(0);
    if frac.is_zero() || idx + 1 >= sorted.len() {
        return sorted[idx];
    }
    sorted[idx] + (sorted[idx + 1] - sorted[idx]) * frac
}

/// Median via the shared percentile implementation.
#[must_use]
pub fn median(sorted: &[Decimal]) -> Decimal {
    percentile(sorted, Decimal::from(50))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sorted(values: &[i64]) -> Vec<Decimal> {
        let mut v: Vec<Decimal> = values.iter().map(|n| Decimal::from(*n)).collect();
        v.sort();
        v
    }

    #[test]
    fn percentile_50_equals_median_odd() {
        let v = sorted(&[10, 20, 30, 40, 50]);
        assert_eq!(percentile(&v, dec!(50)), dec!(30));
        assert_eq!(median(&v), dec!(30));
    }

    #[test]
    fn percentile_50_equals_median_even() {
        let v = sorted(&[10, 20, 30, 40]);
        assert_eq!(percentile(&v, dec!(50)), dec!(25));
        assert_eq!(median(&v), dec!(25));
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        // rank = 0.25 * 3 = 0.75 -> 10 + 0.75 * 10
        let v = sorted(&[10, 20, 30, 40]);
        assert_eq!(percentile(&v, dec!(25)), dec!(17.5));
    }

    #[test]
    fn percentile_endpoints_are_min_and_max() {
        let v = sorted(&[5, 7, 11, 200]);
        assert_eq!(percentile(&v, dec!(0)), dec!(5));
        assert_eq!(percentile(&v, dec!(100)), dec!(200));
    }

    #[test]
    fn percentile_clamps_out_of_range_input() {
        let v = sorted(&[1, 2, 3]);
        assert_eq!(percentile(&v, dec!(-10)), dec!(1));
        assert_eq!(percentile(&v, dec!(150)), dec!(3));
    }

    #[test]
    fn single_value_is_every_percentile() {
        let v = vec![dec!(42)];
        for p in [0, 10, 50, 90, 100] {
            assert_eq!(percentile(&v, Decimal::from(p)), dec!(42));
        }
    }

    #[test]
    fn percentiles_are_non_decreasing_in_p() {
        let v = sorted(&[3, 9, 27, 81, 243, 729]);
        let mut prev = percentile(&v, dec!(0));
        for p in 1..=100 {
            let cur = percentile(&v, Decimal::from(p));
            assert!(cur >= prev, "percentile decreased at p={p}");
            prev = cur;
        }
    }
}
