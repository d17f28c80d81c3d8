//! One-shot plans returned by the discovery and relevance phases.
//!
//! Plans are consumed immediately by the discovery sub-loop and discarded.

use serde::{Deserialize, Serialize};

/// What to look up, search for and expand in the next round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryPlan {
    /// Coverage analysis of the current context
    pub discovery_analysis: String,
    /// Searches for resources whose locations are unknown
    #[serde(default)]
    pub search_queries: Vec<String>,
    /// Locations to admit directly
    #[serde(default)]
    pub query_resources: Vec<String>,
    /// Collapsed tools whose schemas should become visible
    #[serde(default)]
    pub expand_tools: Vec<String>,
}

impl DiscoveryPlan {
    /// An empty plan ends the discovery sub-loop.
    pub fn settled(analysis: impl Into<String>) -> Self {
        Self {
            discovery_analysis: analysis.into(),
            ..Default::default()
        }
    }

    /// True when the plan asked for new context.
    ///
    /// Tool expansion alone does not count.
    pub fn refinement_needed(&self) -> bool {
        !self.search_queries.is_empty() || !self.query_resources.is_empty()
    }
}

/// A field to hide on one admitted resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldExclusion {
    pub location: String,
    pub property: String,
}

impl FieldExclusion {
    pub fn new(location: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            property: property.into(),
        }
    }
}

/// How to prune, redact and reorder the workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefinementPlan {
    /// Per-resource relevance rating
    pub relevance_analysis: String,
    /// Locations to soft-exclude
    #[serde(default)]
    pub exclude_resources: Vec<String>,
    /// Fields to hide on kept resources
    #[serde(default)]
    pub exclude_properties: Vec<FieldExclusion>,
    /// Expanded tools whose schemas should be hidden again
    #[serde(default)]
    pub collapse_tools: Vec<String>,
    /// Preferred ordering, most relevant first; empty keeps the current one
    #[serde(default)]
    pub sorted_segments: Vec<String>,
}
