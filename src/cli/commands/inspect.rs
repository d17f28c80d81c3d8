//! Implementation of the `reckon inspect` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::InMemoryResourceRepository;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::{Config, SearchRecord, WorkspaceSnapshot};
use crate::services::{ContextEntry, ResourceContext};

const MAX_LINE_CHARS: usize = 120;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// YAML resource tree to load
    #[arg(short, long)]
    pub resources: PathBuf,

    /// Similarity search to run; matches are admitted (repeatable)
    #[arg(short, long)]
    pub search: Vec<String>,

    /// Restrict searches to one aspect
    #[arg(long)]
    pub scope: Option<String>,

    /// Location to hide from the workspace (repeatable)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Locations to admit directly
    pub locations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InspectOutput {
    pub snapshot: WorkspaceSnapshot,
    pub searches: Vec<SearchRecord>,
    #[serde(skip)]
    pub rendered: Vec<ContextEntry>,
}

impl CommandOutput for InspectOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.searches {
            lines.push(format!(
                "Search \"{}\" admitted {} location(s)",
                record.query,
                record.locations.len()
            ));
        }
        if !self.searches.is_empty() {
            lines.push(String::new());
        }

        if self.rendered.is_empty() {
            lines.push("Workspace is empty.".to_string());
        }
        for (location, entries) in &self.rendered {
            lines.push(format!("== {location} =="));
            for entry in entries {
                lines.push(format!("  {}", truncate(entry, MAX_LINE_CHARS)));
            }
        }

        if !self.snapshot.missing_locations.is_empty() {
            lines.push(String::new());
            lines.push("Missing locations:".to_string());
            for location in &self.snapshot.missing_locations {
                lines.push(format!("  - {location}"));
            }
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InspectArgs, config: &Config, json_mode: bool) -> Result<()> {
    let repository = InMemoryResourceRepository::from_yaml_file(&args.resources)
        .await
        .with_context(|| format!("Failed to load resource tree {}", args.resources.display()))?;

    let mut context = ResourceContext::new(Arc::new(repository), &config.workspace);
    for location in &args.locations {
        context.query(location);
    }
    for query in &args.search {
        context
            .search(query, args.scope.as_deref())
            .await
            .with_context(|| format!("Search failed: {query}"))?;
    }
    for location in &args.exclude {
        context.exclude(location);
    }

    let result = InspectOutput {
        snapshot: context.snapshot().await,
        searches: context.search_history().to_vec(),
        rendered: context.render_context().await,
    };
    output(&result, json_mode);
    Ok(())
}
