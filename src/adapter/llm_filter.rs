//! LLM-backed comparability filter.
//!
//! Adapter for the [`ComparabilityFilter`] port over any [`Llm`]. Builds a
//! deterministic classification prompt listing the candidate offers, asks
//! for a JSON verdict per identifier, and keeps only the offers judged
//! comparable. Offers the model omits from its answer are treated as
//! non-comparable, never as errors.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::Offer;
use crate::error::FilterError;
use crate::port::{ComparabilityFilter, Llm};

/// Comparability filter that delegates judgment to an LLM.
pub struct LlmFilter {
    llm: Arc<dyn Llm>,
    batch_limit: usize,
}

impl LlmFilter {
    #[must_use]
    pub fn new(llm: Arc<dyn Llm>) -> Self {
        Self {
            llm,
            batch_limit: 20,
        }
    }

    #[must_use]
    pub fn with_batch_limit(mut self, limit: usize) -> Self {
        self.batch_limit = limit.max(1);
        self
    }
}

#[derive(Debug, Deserialize)]
struct Verdict {
    identifier: String,
    comparable: bool,
}

fn build_prompt(target: &str, offers: &[Offer]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are filtering competitor listings for a pricing analysis.\n\
         Target product: {target}\n\n\
         For each listing below, judge whether it is the same kind of product\n\
         as the target (same category and comparable specifications; accessories,\n\
         bundles, spare parts and unrelated items are NOT comparable).\n\n\
         Listings:"
    );
    for offer in offers {
        let _ = writeln!(
            prompt,
            "- identifier: {} | price: {} | condition: {} | title: {}",
            offer.identifier,
            offer.price,
            offer.condition,
            offer.title.as_deref().unwrap_or("(none)"),
        );
    }
    let _ = write!(
        prompt,
        "\nAnswer with ONLY a JSON array, one object per listing:\n\
         [{{\"identifier\": \"...\", \"comparable\": true}}]"
    );
    prompt
}

/// Parse the model's verdict payload, tolerating a Markdown code fence.
fn parse_verdicts(raw: &str) -> Result<Vec<Verdict>, FilterError> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end_matches("```"))
        .unwrap_or(trimmed)
        .trim();
    serde_json::from_str(body).map_err(|e| FilterError::MalformedVerdict(e.to_string()))
}

#[async_trait]
impl ComparabilityFilter for LlmFilter {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn classify(&self, target: &str, offers: &[Offer]) -> Result<Vec<Offer>, FilterError> {
        if offers.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_prompt(target, offers);
        let raw = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| FilterError::Backend(e.to_string()))?;
        let verdicts = parse_verdicts(&raw)?;

        let by_id: HashMap<&str, bool> = verdicts
            .iter()
            .map(|v| (v.identifier.as_str(), v.comparable))
            .collect();

        let comparable: Vec<Offer> = offers
            .iter()
            .filter(|o| by_id.get(o.identifier.as_str()).copied().unwrap_or(false))
            .map(|o| o.clone().mark_comparable())
            .collect();

        debug!(
            backend = self.llm.name(),
            offered = offers.len(),
            comparable = comparable.len(),
            "Classified offer batch"
        );

        Ok(comparable)
    }

    fn batch_limit(&self) -> usize {
        self.batch_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Condition;
    use crate::error::Result;
    use rust_decimal_macros::dec;

    struct CannedLlm(String);

    #[async_trait]
    impl Llm for CannedLlm {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn offers() -> Vec<Offer> {
        vec![
            Offer::try_new("a", dec!(100), Condition::New)
                .unwrap()
                .with_title("Parlante bluetooth 20W"),
            Offer::try_new("b", dec!(15), Condition::New)
                .unwrap()
                .with_title("Funda para parlante"),
            Offer::try_new("c", dec!(95), Condition::Used).unwrap(),
        ]
    }

    #[tokio::test]
    async fn keeps_only_offers_judged_comparable() {
        let llm = Arc::new(CannedLlm(
            r#"[{"identifier":"a","comparable":true},
                {"identifier":"b","comparable":false},
                {"identifier":"c","comparable":true}]"#
                .into(),
        ));
        let filter = LlmFilter::new(llm);
        let kept = filter.classify("parlante 20w", &offers()).await.unwrap();
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|o| o.comparable));
        assert_eq!(kept[0].identifier, "a");
        assert_eq!(kept[1].identifier, "c");
    }

    #[tokio::test]
    async fn omitted_identifiers_are_non_comparable() {
        let llm = Arc::new(CannedLlm(r#"[{"identifier":"a","comparable":true}]"#.into()));
        let filter = LlmFilter::new(llm);
        let kept = filter.classify("parlante", &offers()).await.unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn tolerates_code_fenced_answers() {
        let llm = Arc::new(CannedLlm(
            "```json\n[{\"identifier\":\"a\",\"comparable\":true}]\n```".into(),
        ));
        let filter = LlmFilter::new(llm);
        let kept = filter.classify("parlante", &offers()).await.unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_typed_error() {
        let llm = Arc::new(CannedLlm("the offers look fine to me".into()));
        let filter = LlmFilter::new(llm);
        let err = filter.classify("parlante", &offers()).await.unwrap_err();
        assert!(matches!(err, FilterError::MalformedVerdict(_)));
    }

    #[tokio::test]
    async fn empty_batch_short_circuits() {
        let llm = Arc::new(CannedLlm("ignored".into()));
        let filter = LlmFilter::new(llm);
        assert!(filter.classify("parlante", &[]).await.unwrap().is_empty());
    }

    #[test]
    fn prompt_lists_every_offer() {
        let prompt = build_prompt("parlante 20w", &offers());
        assert!(prompt.contains("identifier: a"));
        assert!(prompt.contains("identifier: b"));
        assert!(prompt.contains("identifier: c"));
        assert!(prompt.contains("parlante 20w"));
    }
}
