//! Recommendation derivation: strategy selection, confidence scoring,
//! alternatives, and margin-floor enforcement.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::{
    Confidence, CurrentPricePosition, GroupedStats, MarketPosition, PriceDistributionStats,
    PricingRecommendation, PricingStrategy,
};
use crate::error::RecommendError;
use crate::stats::percentile;

/// Business parameters for one recommendation.
#[derive(Debug, Clone)]
pub struct RecommendParams {
    cost: Decimal,
    target_margin_percent: Decimal,
    target_percentile: Option<Decimal>,
    current_price: Option<Decimal>,
    min_margin_percent: Decimal,
}

impl RecommendParams {
    /// Create validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonPositiveCost`] for `cost <= 0` and
    /// [`DomainError::PercentileOutOfRange`] for a target percentile
    /// outside [0, 100].
    pub fn try_new(
        cost: Decimal,
        target_margin_percent: Decimal,
        min_margin_percent: Decimal,
    ) -> Result<Self, DomainError> {
        if cost <= Decimal::ZERO {
            return Err(DomainError::NonPositiveCost { cost });
        }
        Ok(Self {
            cost,
            target_margin_percent,
            target_percentile: None,
            current_price: None,
            min_margin_percent,
        })
    }

    /// Pin the target percentile instead of deriving one from dispersion.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PercentileOutOfRange`] outside [0, 100].
    pub fn with_target_percentile(mut self, percentile: Decimal) -> Result<Self, DomainError> {
        if percentile < Decimal::ZERO || percentile > Decimal::ONE_HUNDRED {
            return Err(DomainError::PercentileOutOfRange { percentile });
        }
        self.target_percentile = Some(percentile);
        Ok(self)
    }

    /// Supply the current selling price for positioning context.
    #[must_use]
    pub fn with_current_price(mut self, price: Decimal) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }
}

/// Derive a recommendation from grouped statistics.
///
/// # Errors
///
/// - [`RecommendError::InsufficientData`] when the clean distribution is
///   empty.
/// - [`RecommendError::MarginViolation`] when the percentile price breaches
///   the margin floor; the error carries the best feasible alternative,
///   recomputed at the floor price.
pub fn recommend(
    stats: &GroupedStats,
    params: &RecommendParams,
) -> Result<PricingRecommendation, RecommendError> {
    let overall = &stats.overall;
    if overall.count == 0 {
        return Err(RecommendError::InsufficientData);
    }

    let (strategy, target_percentile) = match params.target_percentile {
        Some(p) => (strategy_for_percentile(p), p),
        None => select_strategy(overall, params),
    };

    let recommended = percentile(&overall.clean_values, target_percentile).round_dp(2);
    let margin = margin_percent(recommended, params.cost);
    let confidence = score_confidence(overall);
    let alternatives = alternative_prices(overall, target_percentile);
    let current_price_position = params.current_price.map(|price| CurrentPricePosition {
        price,
        percentile: overall.rank_in_full(price).round_dp(2),
        margin_percent: margin_percent(price, params.cost).round_dp(2),
    });

    debug!(
        strategy = %strategy,
        percentile = %target_percentile,
        recommended = %recommended,
        margin = %margin.round_dp(2),
        "Derived recommendation"
    );

    if margin < params.min_margin_percent {
        let floor_price = (params.cost
            * (Decimal::ONE + params.min_margin_percent / Decimal::ONE_HUNDRED))
            .round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity);
        warn!(
            recommended = %recommended,
            margin = %margin.round_dp(2),
            floor = %floor_price,
            "Recommended price breaches margin floor"
        );
        let best_feasible = PricingRecommendation {
            recommended_price: floor_price,
            strategy,
            market_position: MarketPosition::from_rank(overall.rank_in_full(floor_price)),
            confidence,
            target_percentile,
            margin_percent: margin_percent(floor_price, params.cost).round_dp(2),
            alternative_prices: alternatives,
            reasoning: floored_reasoning(overall, params, target_percentile, margin),
            current_price_position,
        };
        return Err(RecommendError::MarginViolation {
            recommended,
            margin_percent: margin.round_dp(2),
            floor_percent: params.min_margin_percent,
            best_feasible: Box::new(best_feasible),
        });
    }

    let market_position = MarketPosition::from_rank(overall.rank_in_full(recommended));
    Ok(PricingRecommendation {
        recommended_price: recommended,
        strategy,
        market_position,
        confidence,
        target_percentile,
        margin_percent: margin.round_dp(2),
        alternative_prices: alternatives,
        reasoning: reasoning(overall, target_percentile, market_position, margin),
        current_price_position,
    })
}

/// Strategy and percentile from market dispersion.
///
/// Tight markets price at the median; spread-out markets leave room to
/// position above it, as value or premium depending on where the margin
/// target lands relative to the median.
fn select_strategy(
    overall: &PriceDistributionStats,
    params: &RecommendParams,
) -> (PricingStrategy, Decimal) {
    let spread = overall.spread_ratio();
    if spread < dec!(0.2) {
        (PricingStrategy::Competitive, dec!(50))
    } else if spread <= dec!(0.5) {
        (PricingStrategy::Balanced, dec!(50))
    } else {
        let min_viable = params.cost
            * (Decimal::ONE + params.target_margin_percent / Decimal::ONE_HUNDRED);
        let strategy = if min_viable <= overall.median {
            PricingStrategy::Value
        } else {
            PricingStrategy::Premium
        };
        (strategy, dec!(60))
    }
}

/// Label an explicitly supplied percentile.
fn strategy_for_percentile(p: Decimal) -> PricingStrategy {
    if p < dec!(40) {
        PricingStrategy::Competitive
    } else if p <= dec!(60) {
        PricingStrategy::Balanced
    } else {
        PricingStrategy::Premium
    }
}

/// Confidence from raw sample size and clean-set dispersion. Both gates of
/// a tier must hold; failing either drops one tier.
fn score_confidence(overall: &PriceDistributionStats) -> Confidence {
    let n = overall.count_before_removal;
    let cv = overall.coefficient_of_variation;
    if n >= 15 && cv < dec!(0.3) {
        Confidence::High
    } else if n >= 8 && cv < dec!(0.5) {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Three price points straddling the target percentile, clamped to [0, 100].
/// Ties are kept as-is.
fn alternative_prices(overall: &PriceDistributionStats, target: Decimal) -> [Decimal; 3] {
    [target - dec!(15), target, target + dec!(15)].map(|p| {
        percentile(
            &overall.clean_values,
            p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
        )
        .round_dp(2)
    })
}

fn margin_percent(price: Decimal, cost: Decimal) -> Decimal {
    (price - cost) / cost * Decimal::ONE_HUNDRED
}

fn reasoning(
    overall: &PriceDistributionStats,
    target_percentile: Decimal,
    position: MarketPosition,
    margin: Decimal,
) -> String {
    format!(
        "Based on analysis of {} competitors, recommended price at the {}th percentile ({} positioning) with {}% margin.",
        overall.count_before_removal,
        target_percentile.normalize(),
        position,
        margin.round_dp(1).normalize(),
    )
}

fn floored_reasoning(
    overall: &PriceDistributionStats,
    params: &RecommendParams,
    target_percentile: Decimal,
    violating_margin: Decimal,
) -> String {
    format!(
        "Based on analysis of {} competitors, the {}th percentile target would yield only {}% margin; price floored at cost plus the {}% minimum margin.",
        overall.count_before_removal,
        target_percentile.normalize(),
        violating_margin.round_dp(1).normalize(),
        params.min_margin_percent.normalize(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Condition, Offer};
    use crate::stats::compute_stats;

    fn offers(prices: &[i64]) -> Vec<Offer> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Offer::try_new(format!("MLA{i}"), Decimal::from(*p), Condition::New)
                    .unwrap()
                    .mark_comparable()
            })
            .collect()
    }

    fn spread_fifteen() -> GroupedStats {
        compute_stats(&offers(&[
            500, 520, 540, 560, 580, 600, 620, 640, 660, 680, 700, 720, 740, 760, 1500,
        ]))
        .unwrap()
    }

    fn params(cost: i64) -> RecommendParams {
        RecommendParams::try_new(Decimal::from(cost), dec!(30), dec!(10)).unwrap()
    }

    #[test]
    fn median_target_lands_near_clean_median() {
        let stats = spread_fifteen();
        let p = params(300).with_target_percentile(dec!(50)).unwrap();
        let rec = recommend(&stats, &p).unwrap();
        assert_eq!(rec.recommended_price, dec!(630));
        assert_eq!(rec.strategy, PricingStrategy::Balanced);
        assert_eq!(rec.confidence, Confidence::High);
    }

    #[test]
    fn confidence_is_never_high_below_fifteen_samples() {
        // Tight distribution (cv ~ 0) but only 10 observations
        let stats = compute_stats(&offers(&[
            100, 101, 102, 103, 104, 105, 106, 107, 108, 109,
        ]))
        .unwrap();
        let rec = recommend(&stats, &params(50)).unwrap();
        assert_eq!(rec.confidence, Confidence::Medium);
    }

    #[test]
    fn high_dispersion_drops_confidence_despite_sample_size() {
        let stats = compute_stats(&offers(&[
            10, 20, 40, 80, 160, 320, 640, 1280, 2560, 5120, 10240, 20480, 40960, 81920, 163840,
            327680,
        ]))
        .unwrap();
        let rec = recommend(&stats, &params(5)).unwrap();
        assert_ne!(rec.confidence, Confidence::High);
    }

    #[test]
    fn explicit_low_percentile_is_labeled_competitive() {
        let stats = spread_fifteen();
        let p = params(100).with_target_percentile(dec!(25)).unwrap();
        let rec = recommend(&stats, &p).unwrap();
        assert_eq!(rec.strategy, PricingStrategy::Competitive);
        assert_eq!(rec.target_percentile, dec!(25));
    }

    #[test]
    fn explicit_high_percentile_is_labeled_premium() {
        let stats = spread_fifteen();
        let p = params(100).with_target_percentile(dec!(80)).unwrap();
        let rec = recommend(&stats, &p).unwrap();
        assert_eq!(rec.strategy, PricingStrategy::Premium);
    }

    #[test]
    fn tight_spread_selects_competitive_at_median() {
        let stats = compute_stats(&offers(&[
            98, 99, 99, 100, 100, 100, 101, 101, 102, 102, 103, 103, 104, 104, 105,
        ]))
        .unwrap();
        let rec = recommend(&stats, &params(50)).unwrap();
        assert_eq!(rec.strategy, PricingStrategy::Competitive);
        assert_eq!(rec.target_percentile, dec!(50));
    }

    #[test]
    fn recommendation_is_deterministic() {
        let stats = spread_fifteen();
        let p = params(300)
            .with_target_percentile(dec!(50))
            .unwrap()
            .with_current_price(dec!(900));
        let a = recommend(&stats, &p).unwrap();
        let b = recommend(&stats, &p).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn current_price_ranks_against_the_full_distribution() {
        let stats = spread_fifteen();
        let p = params(300)
            .with_target_percentile(dec!(50))
            .unwrap()
            .with_current_price(dec!(900));
        let rec = recommend(&stats, &p).unwrap();
        let pos = rec.current_price_position.unwrap();
        assert_eq!(pos.percentile, dec!(93.33));
        assert_eq!(pos.margin_percent, dec!(200));
    }

    #[test]
    fn alternatives_straddle_the_target() {
        let stats = spread_fifteen();
        let p = params(300).with_target_percentile(dec!(50)).unwrap();
        let rec = recommend(&stats, &p).unwrap();
        let [aggressive, mid, premium] = rec.alternative_prices;
        assert_eq!(mid, rec.recommended_price);
        assert!(aggressive <= mid && mid <= premium);
    }

    #[test]
    fn alternatives_clamp_at_the_distribution_edges() {
        let stats = spread_fifteen();
        let p = params(100).with_target_percentile(dec!(95)).unwrap();
        let rec = recommend(&stats, &p).unwrap();
        // 95 + 15 clamps to 100: the clean-set max
        assert_eq!(rec.alternative_prices[2], dec!(760));
    }

    #[test]
    fn margin_floor_violation_carries_best_feasible() {
        let stats = spread_fifteen();
        // Cost so high the median cannot clear a 10% floor
        let p = params(620).with_target_percentile(dec!(50)).unwrap();
        let err = recommend(&stats, &p).unwrap_err();
        match err {
            RecommendError::MarginViolation {
                recommended,
                floor_percent,
                best_feasible,
                ..
            } => {
                assert_eq!(recommended, dec!(630));
                assert_eq!(floor_percent, dec!(10));
                assert_eq!(best_feasible.recommended_price, dec!(682));
                assert!(best_feasible.margin_percent >= dec!(10));
            }
            other => panic!("expected MarginViolation, got {other:?}"),
        }
    }

    #[test]
    fn reasoning_is_reproducible_from_fields() {
        let stats = spread_fifteen();
        let p = params(300).with_target_percentile(dec!(50)).unwrap();
        let rec = recommend(&stats, &p).unwrap();
        assert_eq!(
            rec.reasoning,
            format!(
                "Based on analysis of 15 competitors, recommended price at the 50th percentile ({} positioning) with {}% margin.",
                rec.market_position,
                rec.margin_percent.round_dp(1).normalize(),
            )
        );
    }

    #[test]
    fn non_positive_cost_is_rejected_up_front() {
        assert!(RecommendParams::try_new(Decimal::ZERO, dec!(30), dec!(10)).is_err());
    }

    #[test]
    fn out_of_range_percentile_is_rejected() {
        assert!(params(10).with_target_percentile(dec!(101)).is_err());
    }
}
