//! Context workspace domain model.
//!
//! The workspace is a windowed cache over an unbounded repository. Its
//! admission and eviction policy is driven entirely by the discovery and
//! relevance phases: nothing is ever evicted by size or recency.
//!
//! Every admitted location owns one [`ResourceSegment`] slot. A slot does not
//! imply the referenced resource still exists; snapshots resolve live state
//! and report dangling slots as missing.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::resource::{child_location, ResolvedResource, LISTING_CHILD_GROUP};

/// One admitted (location, visibility-state) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSegment {
    pub location: String,
    #[serde(default)]
    pub excluded_fields: BTreeSet<String>,
}

impl ResourceSegment {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            excluded_fields: BTreeSet::new(),
        }
    }
}

/// Read-only projection of a segment joined with live repository state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentView {
    pub location: String,
    /// Visible fields (all fields minus excluded ones)
    pub fields: serde_json::Map<String, serde_json::Value>,
    /// Field names hidden on this segment, sorted
    pub excluded_fields: Vec<String>,
    /// Child group to visible child ids
    pub children: BTreeMap<String, Vec<String>>,
    /// Visible relation target to description
    pub relations: BTreeMap<String, String>,
}

/// Point-in-time view of the workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    /// Views of visible segments, in workspace order
    pub segments: Vec<SegmentView>,
    /// Visible segments whose location no longer resolves
    pub missing_locations: Vec<String>,
}

/// One entry of the search history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub locations: Vec<String>,
}

/// The evolving set of segments curated during one pursuit.
///
/// `ordering` is always a permutation of the admitted locations.
#[derive(Debug, Clone, Default)]
pub struct ContextWorkspace {
    segments: HashMap<String, ResourceSegment>,
    ordering: Vec<String>,
    excluded_locations: HashSet<String>,
}

impl ContextWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a slot exists for `location`. Re-admitting is a no-op.
    ///
    /// Admission never lifts a soft exclusion; use [`Self::include`] for that.
    pub fn admit(&mut self, location: &str) -> &mut ResourceSegment {
        if !self.segments.contains_key(location) {
            self.ordering.push(location.to_string());
        }
        self.segments
            .entry(location.to_string())
            .or_insert_with(|| ResourceSegment::new(location))
    }

    /// Soft-exclude a location. Its slot, if any, is kept.
    pub fn exclude(&mut self, location: &str) {
        self.excluded_locations.insert(location.to_string());
    }

    /// Lift a soft exclusion and make sure the location is admitted.
    ///
    /// Field exclusions recorded before the location was excluded are kept.
    pub fn include(&mut self, location: &str) -> &mut ResourceSegment {
        self.excluded_locations.remove(location);
        self.admit(location)
    }

    /// Hide one field of a segment, admitting the segment if needed.
    pub fn exclude_field(&mut self, location: &str, field: &str) {
        self.admit(location).excluded_fields.insert(field.to_string());
    }

    /// Replace the ordering with `preferred`.
    ///
    /// Unknown locations are ignored and duplicates collapse to their first
    /// occurrence. Admitted locations missing from `preferred` are appended
    /// in their prior relative order.
    pub fn reorder(&mut self, preferred: &[String]) {
        let mut seen = HashSet::with_capacity(self.ordering.len());
        let mut ordering = Vec::with_capacity(self.ordering.len());
        for location in preferred {
            if self.segments.contains_key(location) && seen.insert(location.as_str()) {
                ordering.push(location.clone());
            }
        }
        for location in &self.ordering {
            if !seen.contains(location.as_str()) {
                ordering.push(location.clone());
            }
        }
        self.ordering = ordering;
    }

    /// Clear every soft exclusion and field exclusion. Admitted slots stay.
    pub fn reset(&mut self) {
        self.excluded_locations.clear();
        for segment in self.segments.values_mut() {
            segment.excluded_fields.clear();
        }
    }

    pub fn contains(&self, location: &str) -> bool {
        self.segments.contains_key(location)
    }

    pub fn is_excluded(&self, location: &str) -> bool {
        self.excluded_locations.contains(location)
    }

    pub fn segment(&self, location: &str) -> Option<&ResourceSegment> {
        self.segments.get(location)
    }

    /// Admitted locations in workspace order, excluded ones included.
    pub fn ordering(&self) -> &[String] {
        &self.ordering
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments that are not soft-excluded, in workspace order.
    pub fn visible_segments(&self) -> impl Iterator<Item = &ResourceSegment> {
        self.ordering
            .iter()
            .filter(|location| !self.excluded_locations.contains(*location))
            .filter_map(|location| self.segments.get(location))
    }

    /// Drop child ids whose full location under `parent` is excluded.
    pub fn filter_children(&self, parent: &str, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| !self.excluded_locations.contains(&child_location(parent, id)))
            .cloned()
            .collect()
    }

    /// Drop relations pointing at excluded locations and join their descriptions.
    pub fn filter_relations(
        &self,
        relations: &BTreeMap<String, Vec<String>>,
    ) -> BTreeMap<String, String> {
        relations
            .iter()
            .filter(|(target, _)| !self.excluded_locations.contains(*target))
            .map(|(target, descriptions)| (target.clone(), descriptions.join(" ")))
            .collect()
    }

    /// Build the view of `segment` over its resolved repository state.
    pub fn project(&self, segment: &ResourceSegment, resolved: &ResolvedResource) -> SegmentView {
        let excluded_fields = segment.excluded_fields.iter().cloned().collect();
        match resolved {
            ResolvedResource::Listing { children } => {
                let mut groups = BTreeMap::new();
                groups.insert(
                    LISTING_CHILD_GROUP.to_string(),
                    self.filter_children(&segment.location, children),
                );
                SegmentView {
                    location: segment.location.clone(),
                    fields: serde_json::Map::new(),
                    excluded_fields,
                    children: groups,
                    relations: BTreeMap::new(),
                }
            }
            ResolvedResource::Resource(record) => SegmentView {
                location: segment.location.clone(),
                fields: record
                    .fields
                    .iter()
                    .filter(|(name, _)| !segment.excluded_fields.contains(*name))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
                excluded_fields,
                children: record
                    .children
                    .iter()
                    .map(|(group, ids)| (group.clone(), self.filter_children(&segment.location, ids)))
                    .collect(),
                relations: self.filter_relations(&record.relations),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::resource::ResourceRecord;
    use serde_json::json;

    fn locations(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_admit_is_idempotent() {
        let mut workspace = ContextWorkspace::new();
        workspace.admit("/a");
        workspace.admit("/b");
        workspace.admit("/a");
        assert_eq!(workspace.ordering(), locations(&["/a", "/b"]).as_slice());
        assert_eq!(workspace.len(), 2);
    }

    #[test]
    fn test_reorder_appends_omitted_and_ignores_unknown() {
        let mut workspace = ContextWorkspace::new();
        for location in ["/a", "/b", "/c", "/d"] {
            workspace.admit(location);
        }
        workspace.reorder(&locations(&["/c", "/zzz", "/a", "/c"]));
        assert_eq!(
            workspace.ordering(),
            locations(&["/c", "/a", "/b", "/d"]).as_slice()
        );
    }

    #[test]
    fn test_exclude_hides_segment_and_include_restores_fields() {
        let mut workspace = ContextWorkspace::new();
        workspace.exclude_field("/a", "secret");
        workspace.admit("/b");
        workspace.exclude("/a");

        let visible: Vec<_> = workspace.visible_segments().map(|s| s.location.as_str()).collect();
        assert_eq!(visible, vec!["/b"]);
        assert!(workspace.contains("/a"));

        // Admitting does not lift the exclusion.
        workspace.admit("/a");
        assert!(workspace.is_excluded("/a"));

        let segment = workspace.include("/a");
        assert!(segment.excluded_fields.contains("secret"));
        assert!(!workspace.is_excluded("/a"));
    }

    #[test]
    fn test_reset_keeps_slots() {
        let mut workspace = ContextWorkspace::new();
        workspace.exclude_field("/a", "x");
        workspace.exclude("/a");
        workspace.reset();
        assert!(!workspace.is_excluded("/a"));
        assert!(workspace.segment("/a").unwrap().excluded_fields.is_empty());
        assert_eq!(workspace.len(), 1);
    }

    #[test]
    fn test_project_listing_filters_excluded_children() {
        let mut workspace = ContextWorkspace::new();
        let root = workspace.admit("/").clone();
        workspace.exclude("/outline");
        let view = workspace.project(
            &root,
            &ResolvedResource::Listing {
                children: locations(&["character", "outline"]),
            },
        );
        assert_eq!(view.children[LISTING_CHILD_GROUP], locations(&["character"]));
        assert!(view.fields.is_empty());
    }

    #[test]
    fn test_project_resource_hides_fields_children_and_relations() {
        let mut workspace = ContextWorkspace::new();
        workspace.exclude_field("/character/alice", "age");
        workspace.exclude("/character/alice/diary");
        workspace.exclude("/character/bob");
        let segment = workspace.segment("/character/alice").unwrap().clone();

        let mut record = ResourceRecord {
            location: "/character/alice".to_string(),
            ..Default::default()
        };
        record.fields.insert("name".to_string(), json!("Alice"));
        record.fields.insert("age".to_string(), json!(30));
        record
            .children
            .insert("notes".to_string(), locations(&["diary", "letters"]));
        record
            .relations
            .insert("/character/bob".to_string(), locations(&["brother"]));
        record.relations.insert(
            "/location/home".to_string(),
            locations(&["lives", "here"]),
        );

        let view = workspace.project(&segment, &ResolvedResource::Resource(record));
        assert_eq!(view.fields.len(), 1);
        assert_eq!(view.fields["name"], json!("Alice"));
        assert_eq!(view.excluded_fields, locations(&["age"]));
        assert_eq!(view.children["notes"], locations(&["letters"]));
        assert_eq!(view.relations.len(), 1);
        assert_eq!(view.relations["/location/home"], "lives here");
    }
}
