//! Implementation of the `reckon config` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Read this YAML file instead of the layered project configuration
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|e| format!("<unable to render configuration: {e}>"))
    }
}

pub fn execute(args: ConfigArgs, loaded: &Config, json_mode: bool) -> Result<()> {
    let config = match args.file {
        Some(path) => ConfigLoader::load_from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => loaded.clone(),
    };

    output(&ConfigOutput { config }, json_mode);
    Ok(())
}
