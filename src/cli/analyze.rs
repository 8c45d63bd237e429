//! Handler for the `analyze` command.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use crate::adapter::{
    AcceptAllFilter, AnthropicLlm, LlmFilter, MarketplaceClient, StaticOfferSource,
};
use crate::cli::{output, AnalyzeArgs};
use crate::config::Config;
use crate::domain::{AnalysisReport, DataSource, PricingRecommendation};
use crate::error::{Error, RecommendError, Result};
use crate::pipeline::{AnalyzeRequest, Pipeline};
use crate::port::{ComparabilityFilter, OfferSource};

/// Execute `analyze`.
pub async fn execute(args: AnalyzeArgs, config: Config) -> Result<()> {
    let (source, filter): (Arc<dyn OfferSource>, Arc<dyn ComparabilityFilter>) = if args.sample {
        (
            Arc::new(StaticOfferSource::default()),
            Arc::new(AcceptAllFilter),
        )
    } else {
        let llm = Arc::new(AnthropicLlm::from_env(&config.llm)?);
        (
            Arc::new(MarketplaceClient::new(&config.marketplace)),
            Arc::new(LlmFilter::new(llm).with_batch_limit(config.pipeline.filter_batch_size)),
        )
    };

    let pipeline = Pipeline::new(
        source,
        filter,
        config.pipeline.clone(),
        config.recommendation.clone(),
    );

    let mut request = AnalyzeRequest::new(&args.product, args.cost);
    request.queries = args.queries.clone();
    request.target_margin_percent = args.margin;
    request.target_percentile = args.percentile;
    request.current_price = args.current_price;
    request.timeout = args.timeout.map(Duration::from_secs);

    match pipeline.analyze(request).await {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render_report(&report);
            }
            Ok(())
        }
        Err(Error::Recommend(RecommendError::MarginViolation {
            recommended,
            margin_percent,
            floor_percent,
            best_feasible,
        })) => {
            render_margin_violation(
                &args,
                recommended,
                margin_percent,
                floor_percent,
                &best_feasible,
            )?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[derive(Tabled)]
struct ConditionRow {
    #[tabled(rename = "Condition")]
    condition: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Median")]
    median: Decimal,
    #[tabled(rename = "Min")]
    min: Decimal,
    #[tabled(rename = "Max")]
    max: Decimal,
}

#[derive(Tabled)]
struct AlternativeRow {
    #[tabled(rename = "Option")]
    label: &'static str,
    #[tabled(rename = "Percentile")]
    percentile: Decimal,
    #[tabled(rename = "Price")]
    price: Decimal,
}

fn render_report(report: &AnalysisReport) {
    let overall = &report.stats.overall;

    output::section("Market statistics");
    output::key_value(
        "Sample",
        format!(
            "{} comparable ({} collected, {} after outlier removal)",
            report.drops.comparable, report.drops.collected, overall.count
        ),
    );
    output::key_value("Median", overall.median.round_dp(2));
    output::key_value("Mean", overall.mean.round_dp(2));
    output::key_value(
        "Range",
        format!(
            "{} - {}",
            overall.min.round_dp(2),
            overall.max.round_dp(2)
        ),
    );
    output::key_value(
        "Quartiles",
        format!(
            "q1 {}  q3 {}  iqr {}",
            overall.q1.round_dp(2),
            overall.q3.round_dp(2),
            overall.iqr.round_dp(2)
        ),
    );
    output::key_value(
        "Dispersion",
        format!(
            "std dev {}  cv {}",
            overall.std_dev.round_dp(2),
            overall.coefficient_of_variation.round_dp(3)
        ),
    );
    if !overall.outliers_removed.is_empty() {
        let prices: Vec<String> = overall
            .outliers_removed
            .iter()
            .map(|o| o.price.to_string())
            .collect();
        output::key_value(
            "Outliers removed",
            format!("{} ({})", prices.len(), prices.join(", ")),
        );
    }

    if !report.stats.by_condition.is_empty() {
        let rows: Vec<ConditionRow> = report
            .stats
            .by_condition
            .iter()
            .map(|(condition, stats)| ConditionRow {
                condition: condition.to_string(),
                count: stats.count,
                median: stats.median.round_dp(2),
                min: stats.min.round_dp(2),
                max: stats.max.round_dp(2),
            })
            .collect();
        println!();
        output::table(&Table::new(rows).to_string());
    }

    render_recommendation(&report.recommendation);

    output::section("Run");
    if report.data_source == DataSource::Fallback {
        output::warn("Live collection produced nothing; results use the fallback sample set");
    }
    output::key_value("Data source", report.data_source);
    if report.drops.invalid_price_dropped > 0 {
        output::key_value(
            "Invalid prices dropped",
            report.drops.invalid_price_dropped,
        );
    }
    if report.drops.unclassified_dropped > 0 {
        output::key_value("Unclassified dropped", report.drops.unclassified_dropped);
    }
    output::key_value(
        "Timing",
        format!(
            "collect {}ms, filter {}ms, total {}ms",
            report.timings.collecting.as_millis(),
            report.timings.filtering.as_millis(),
            report.timings.total.as_millis()
        ),
    );
    println!();
}

fn render_recommendation(rec: &PricingRecommendation) {
    output::section("Recommendation");
    output::key_value("Recommended price", output::highlight(rec.recommended_price));
    output::key_value("Strategy", rec.strategy);
    output::key_value("Market position", rec.market_position);
    output::key_value("Confidence", rec.confidence);
    output::key_value("Margin", format!("{}%", rec.margin_percent));

    let [aggressive, recommended, premium] = rec.alternative_prices;
    let base = rec.target_percentile;
    let rows = vec![
        AlternativeRow {
            label: "aggressive",
            percentile: (base - Decimal::from(15)).max(Decimal::ZERO),
            price: aggressive,
        },
        AlternativeRow {
            label: "recommended",
            percentile: base,
            price: recommended,
        },
        AlternativeRow {
            label: "premium",
            percentile: (base + Decimal::from(15)).min(Decimal::ONE_HUNDRED),
            price: premium,
        },
    ];
    println!();
    output::table(&Table::new(rows).to_string());

    if let Some(pos) = &rec.current_price_position {
        println!();
        output::key_value(
            "Current price",
            format!(
                "{} (p{} of market, {}% margin)",
                pos.price, pos.percentile, pos.margin_percent
            ),
        );
    }

    println!();
    println!("  {}", rec.reasoning);
}

fn render_margin_violation(
    args: &AnalyzeArgs,
    recommended: Decimal,
    margin_percent: Decimal,
    floor_percent: Decimal,
    best_feasible: &PricingRecommendation,
) -> Result<()> {
    if args.json {
        let payload = serde_json::json!({
            "error": "margin_violation",
            "recommended_price": recommended,
            "margin_percent": margin_percent,
            "floor_percent": floor_percent,
            "best_feasible": best_feasible,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    output::warn(&format!(
        "Market percentile price {recommended} would yield only {margin_percent}% margin (floor {floor_percent}%)"
    ));
    output::warn("Showing the best feasible alternative at the margin floor");
    render_recommendation(best_feasible);
    println!();
    Ok(())
}
