use clap::Parser;
use tracing::error;

use repricer::cli::{analyze, config as config_cmd, Cli, Commands, ConfigCommand};
use repricer::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.logging.init();

    let result = match cli.command {
        Commands::Analyze(args) => analyze::execute(args, config).await,
        Commands::Config(ConfigCommand::Validate) => config_cmd::execute_validate(&cli.config),
        Commands::Config(ConfigCommand::Show) => config_cmd::execute_show(&cli.config),
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        repricer::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
