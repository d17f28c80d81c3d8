//! Resource context service.
//!
//! Owns one [`ContextWorkspace`] together with the repository it projects
//! and the search history the discovery phase reads. All workspace
//! mutations made by the discovery sub-loop go through here.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ContextWorkspace, SearchRecord, WorkspaceConfig, WorkspaceSnapshot,
};
use crate::domain::ports::ResourceRepository;

/// Rendered context for one segment: `(location, lines)`.
pub type ContextEntry = (String, Vec<String>);

pub struct ResourceContext {
    repository: Arc<dyn ResourceRepository>,
    workspace: ContextWorkspace,
    search_history: Vec<SearchRecord>,
    search_limit: usize,
    history_window: usize,
}

impl ResourceContext {
    /// Create a context with the configured root location already admitted.
    pub fn new(repository: Arc<dyn ResourceRepository>, config: &WorkspaceConfig) -> Self {
        let mut workspace = ContextWorkspace::new();
        workspace.admit(&config.root_location);
        Self {
            repository,
            workspace,
            search_history: Vec::new(),
            search_limit: config.search_limit,
            history_window: config.search_history_window,
        }
    }

    pub fn with_defaults(repository: Arc<dyn ResourceRepository>) -> Self {
        Self::new(repository, &WorkspaceConfig::default())
    }

    pub fn workspace(&self) -> &ContextWorkspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut ContextWorkspace {
        &mut self.workspace
    }

    /// Full search history, oldest first.
    pub fn search_history(&self) -> &[SearchRecord] {
        &self.search_history
    }

    /// The trailing window of the search history shown to discovery.
    pub fn recent_searches(&self) -> &[SearchRecord] {
        let start = self.search_history.len().saturating_sub(self.history_window);
        &self.search_history[start..]
    }

    /// Resolve every visible segment against live repository state.
    ///
    /// A location that resolves to nothing, or whose resolution fails, is
    /// reported as missing. Its slot is kept.
    pub async fn snapshot(&self) -> WorkspaceSnapshot {
        let mut snapshot = WorkspaceSnapshot::default();
        for segment in self.workspace.visible_segments() {
            match self.repository.resolve(&segment.location).await {
                Ok(Some(resolved)) => {
                    snapshot
                        .segments
                        .push(self.workspace.project(segment, &resolved));
                }
                Ok(None) => snapshot.missing_locations.push(segment.location.clone()),
                Err(e) => {
                    warn!(location = %segment.location, error = %e, "Failed to resolve segment");
                    snapshot.missing_locations.push(segment.location.clone());
                }
            }
        }
        snapshot
    }

    /// Admit a location directly, even if it does not resolve.
    pub fn query(&mut self, location: &str) {
        self.workspace.admit(location);
    }

    /// Run a similarity search, admit every match and record the search.
    pub async fn search(&mut self, query: &str, scope: Option<&str>) -> DomainResult<Vec<String>> {
        let matches = self
            .repository
            .similarity_search(query, scope, self.search_limit)
            .await?;
        let locations: Vec<String> = matches.into_iter().map(|m| m.location).collect();
        for location in &locations {
            self.workspace.admit(location);
        }
        debug!(query, matches = locations.len(), "Search admitted resources");
        self.search_history.push(SearchRecord {
            query: query.to_string(),
            scope: scope.map(ToString::to_string),
            locations: locations.clone(),
        });
        Ok(locations)
    }

    pub fn exclude(&mut self, location: &str) {
        self.workspace.exclude(location);
    }

    pub fn include(&mut self, location: &str) {
        self.workspace.include(location);
    }

    pub fn exclude_field(&mut self, location: &str, field: &str) {
        self.workspace.exclude_field(location, field);
    }

    pub fn sort(&mut self, ordering: &[String]) {
        self.workspace.reorder(ordering);
    }

    /// Clear all exclusions and the search history to start a fresh sub-task.
    pub fn reset(&mut self) {
        self.workspace.reset();
        self.search_history.clear();
    }

    /// Render the current snapshot as prompt-ready lines per location.
    pub async fn render_context(&self) -> Vec<ContextEntry> {
        self.snapshot()
            .await
            .segments
            .into_iter()
            .map(|view| {
                let mut lines: Vec<String> = view
                    .fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", display_value(value)))
                    .collect();
                lines.extend(
                    view.relations
                        .iter()
                        .map(|(target, description)| format!("Related to {target}: {description}")),
                );
                (view.location, lines)
            })
            .collect()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
