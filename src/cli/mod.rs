//! Command-line interface for inspecting the decision engine's setup.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::config::ConfigArgs;
use commands::inspect::InspectArgs;

#[derive(Parser, Debug)]
#[command(name = "reckon")]
#[command(about = "reckon - goal-driven action determination engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective configuration
    Config(ConfigArgs),

    /// Build a context workspace over a resource tree and print it
    Inspect(InspectArgs),
}

/// Report a command failure and exit with a non-zero status.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
