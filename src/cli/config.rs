//! Handler for the `config` command group.

use std::path::Path;

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    if !path.exists() {
        output::warn(&format!(
            "{} not found; built-in defaults will be used",
            path.display()
        ));
        return Ok(());
    }
    Config::load(path)?;
    output::ok(&format!("{} is valid", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;

    output::section("Marketplace");
    output::key_value("Base URL", &config.marketplace.base_url);
    output::key_value("Search limit", config.marketplace.search_limit);

    output::section("LLM");
    output::key_value("Model", &config.llm.model);
    output::key_value("Max tokens", config.llm.max_tokens);
    output::key_value("Temperature", config.llm.temperature);

    output::section("Pipeline");
    output::key_value("Max retries", config.pipeline.max_retries);
    output::key_value("Backoff (ms)", config.pipeline.backoff_ms);
    output::key_value("Filter batch size", config.pipeline.filter_batch_size);
    output::key_value("Timeout (s)", config.pipeline.timeout_secs);

    output::section("Recommendation");
    output::key_value(
        "Target margin (%)",
        config.recommendation.target_margin_percent,
    );
    output::key_value("Margin floor (%)", config.recommendation.min_margin_percent);

    output::section("Logging");
    output::key_value("Level", &config.logging.level);
    output::key_value("Format", &config.logging.format);
    println!();
    Ok(())
}
