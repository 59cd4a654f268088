use clap::Parser;
use fitment::adapter::inbound::cli::command::Cli;
use fitment::adapter::inbound::cli::output::{self, OutputConfig};
use fitment::adapter::inbound::cli;
use fitment::infrastructure::config::Config;
use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let args = Cli::parse();
    output::configure(OutputConfig::new(args.json, args.quiet, args.verbose));

    let config = match Config::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            output::error(&format!("Failed to load config: {e}"));
            std::process::exit(1);
        }
    };

    let logging = match args.verbose {
        0 => config.logging.clone(),
        1 => config.logging.with_level("debug"),
        _ => config.logging.with_level("trace"),
    };
    logging.init();

    if let Err(e) = cli::execute(&args, &config).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
