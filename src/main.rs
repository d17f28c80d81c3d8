//! reckon CLI entry point.

use clap::Parser;

use reckon::cli::{commands, handle_error, Cli, Commands};
use reckon::infrastructure::config::ConfigLoader;
use reckon::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => handle_error(&err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, cli.json),
    };

    let result = match cli.command {
        Commands::Config(args) => commands::config::execute(args, &config, cli.json),
        Commands::Inspect(args) => commands::inspect::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(&err, cli.json);
    }
}
