//! Resources as the repository hands them to the workspace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Child group used for the ids of a root listing.
pub const LISTING_CHILD_GROUP: &str = "aspects";

/// What a location resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedResource {
    /// A bare list of child ids, e.g. the top-level aspects under `/`
    Listing { children: Vec<String> },
    /// A resource with fields, child groups and relations
    Resource(ResourceRecord),
}

/// A single resolved resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub location: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    /// Child group name to child ids, relative to `location`
    #[serde(default)]
    pub children: BTreeMap<String, Vec<String>>,
    /// Target location to relation descriptions
    #[serde(default)]
    pub relations: BTreeMap<String, Vec<String>>,
}

/// One ranked similarity-search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub location: String,
    /// Lower is closer
    pub distance: f32,
}

/// Join a parent location and a child id into the child's full location.
///
/// The root `/` joins as the empty base, so `("/", "character")` is `/character`.
pub fn child_location(parent: &str, child_id: &str) -> String {
    format!("{}/{}", parent.trim_end_matches('/'), child_id)
}
