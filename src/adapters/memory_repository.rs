//! In-memory resource repository.
//!
//! Holds a hierarchical tree of aspects, elements and nested child groups,
//! usually loaded from YAML:
//!
//! ```yaml
//! aspects:
//!   - name: character
//!     fields: { description: People in the story }
//!     elements:
//!       - id: alice
//!         fields: { name: Alice }
//!         relations: { /character/bob: [sister of] }
//!         children:
//!           notes:
//!             - id: diary
//!               fields: { tone: secretive }
//! ```
//!
//! `/` resolves to a listing of aspect names, `/character` to the aspect with
//! one child group `elements`, and `/character/alice/diary` to the nested
//! element. Similarity search is lexical: Jaccard similarity over word
//! tokens, reported as distance `1 - similarity`.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{child_location, ResolvedResource, ResourceRecord, SearchMatch};
use crate::domain::ports::ResourceRepository;

/// Child group that holds an aspect's top-level elements.
pub const ASPECT_CHILD_GROUP: &str = "elements";

/// Serialized form of a resource tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTree {
    #[serde(default)]
    pub aspects: Vec<AspectNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectNode {
    pub name: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub elements: Vec<ElementNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub id: String,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub relations: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub children: BTreeMap<String, Vec<ElementNode>>,
}

#[derive(Debug, Default)]
struct TreeState {
    aspects: Vec<String>,
    records: BTreeMap<String, ResourceRecord>,
}

impl TreeState {
    fn from_tree(tree: ResourceTree) -> Self {
        let mut state = Self::default();
        for aspect in tree.aspects {
            let location = child_location("/", &aspect.name);
            let ids = aspect.elements.iter().map(|e| e.id.clone()).collect();
            for element in aspect.elements {
                state.insert_element(&location, element);
            }
            state.records.insert(
                location.clone(),
                ResourceRecord {
                    location,
                    fields: aspect.fields,
                    children: BTreeMap::from([(ASPECT_CHILD_GROUP.to_string(), ids)]),
                    relations: BTreeMap::new(),
                },
            );
            state.aspects.push(aspect.name);
        }
        state
    }

    fn insert_element(&mut self, parent: &str, element: ElementNode) {
        let location = child_location(parent, &element.id);
        let mut children = BTreeMap::new();
        for (group, nodes) in element.children {
            children.insert(group, nodes.iter().map(|n| n.id.clone()).collect());
            for node in nodes {
                self.insert_element(&location, node);
            }
        }
        self.records.insert(
            location.clone(),
            ResourceRecord {
                location,
                fields: element.fields,
                children,
                relations: element.relations,
            },
        );
    }
}

pub struct InMemoryResourceRepository {
    state: RwLock<TreeState>,
}

impl InMemoryResourceRepository {
    pub fn new(tree: ResourceTree) -> Self {
        Self {
            state: RwLock::new(TreeState::from_tree(tree)),
        }
    }

    pub fn empty() -> Self {
        Self::new(ResourceTree::default())
    }

    pub fn from_yaml_str(yaml: &str) -> DomainResult<Self> {
        let tree: ResourceTree = serde_yaml::from_str(yaml)?;
        Ok(Self::new(tree))
    }

    pub async fn from_yaml_file(path: &Path) -> DomainResult<Self> {
        let yaml = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::Repository(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Insert or replace the record at `record.location`.
    ///
    /// Parent child groups are left untouched.
    pub async fn upsert(&self, record: ResourceRecord) {
        let mut state = self.state.write().await;
        state.records.insert(record.location.clone(), record);
    }

    /// Remove a record and everything below it.
    ///
    /// References to it from parents and relations are left dangling.
    pub async fn remove(&self, location: &str) -> bool {
        let mut state = self.state.write().await;
        let prefix = format!("{}/", location.trim_end_matches('/'));
        let before = state.records.len();
        state
            .records
            .retain(|key, _| key != location && !key.starts_with(&prefix));
        state.aspects.retain(|name| child_location("/", name) != location);
        state.records.len() != before
    }

    pub async fn record_count(&self) -> usize {
        self.state.read().await.records.len()
    }
}

#[async_trait]
impl ResourceRepository for InMemoryResourceRepository {
    async fn resolve(&self, location: &str) -> DomainResult<Option<ResolvedResource>> {
        let state = self.state.read().await;
        if location == "/" {
            return Ok(Some(ResolvedResource::Listing {
                children: state.aspects.clone(),
            }));
        }
        Ok(state
            .records
            .get(location)
            .cloned()
            .map(ResolvedResource::Resource))
    }

    async fn similarity_search(
        &self,
        query: &str,
        scope: Option<&str>,
        limit: usize,
    ) -> DomainResult<Vec<SearchMatch>> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }
        let scope_prefix = scope.map(|aspect| format!("{}/", child_location("/", aspect)));

        let state = self.state.read().await;
        let mut matches: Vec<SearchMatch> = state
            .records
            .values()
            .filter(|record| {
                scope_prefix
                    .as_deref()
                    .is_none_or(|prefix| record.location.starts_with(prefix))
            })
            .filter_map(|record| {
                let similarity = jaccard_similarity(&query_tokens, &tokenize(&record_text(record)));
                (similarity > 0.0).then(|| SearchMatch {
                    location: record.location.clone(),
                    distance: 1.0 - similarity,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.location.cmp(&b.location))
        });
        matches.truncate(limit);
        debug!(query, hits = matches.len(), "In-memory similarity search");
        Ok(matches)
    }
}

fn record_text(record: &ResourceRecord) -> String {
    let mut text = record.location.replace('/', " ");
    for value in record.fields.values() {
        text.push(' ');
        match value {
            serde_json::Value::String(s) => text.push_str(s),
            other => text.push_str(&other.to_string()),
        }
    }
    text
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Jaccard similarity between two token sets.
fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_similarity() {
        let a = tokenize("Alice the brave");
        let b = tokenize("alice THE coward");
        assert!((jaccard_similarity(&a, &b) - 0.5).abs() < f32::EPSILON);
        assert!(jaccard_similarity(&a, &HashSet::new()).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_nested_children_resolve() {
        let repo = InMemoryResourceRepository::from_yaml_str(
            r"
aspects:
  - name: character
    elements:
      - id: alice
        children:
          notes:
            - id: diary
              fields: { tone: secretive }
",
        )
        .unwrap();

        let Some(ResolvedResource::Resource(alice)) = repo.resolve("/character/alice").await.unwrap()
        else {
            panic!("alice should resolve to a resource");
        };
        assert_eq!(alice.children["notes"], vec!["diary".to_string()]);
        assert!(repo.resolve("/character/alice/diary").await.unwrap().is_some());
        assert_eq!(repo.record_count().await, 3);
    }
}
