//! Workspace invariants: ordering permutation, idempotent admission and
//! soft exclusion.

mod common;

use std::collections::HashSet;

use common::{story_context, story_repository};
use proptest::prelude::*;
use reckon::domain::models::{ContextWorkspace, WorkspaceConfig};
use reckon::services::ResourceContext;

fn admitted(count: usize) -> (ContextWorkspace, Vec<String>) {
    let mut workspace = ContextWorkspace::new();
    let locations: Vec<String> = (0..count).map(|i| format!("/loc/{i}")).collect();
    for location in &locations {
        workspace.admit(location);
    }
    (workspace, locations)
}

proptest! {
    /// Property: reordering never loses or invents a location
    ///
    /// For any preferred ordering, including unknown and duplicate entries,
    /// the result is a permutation of the admitted set with omitted locations
    /// appended in their prior relative order.
    #[test]
    fn prop_reorder_is_a_permutation(
        count in 1usize..12,
        preferred in prop::collection::vec(0usize..16, 0..16),
    ) {
        let (mut workspace, before) = admitted(count);
        let preferred: Vec<String> = preferred.iter().map(|i| format!("/loc/{i}")).collect();

        workspace.reorder(&preferred);
        let after = workspace.ordering().to_vec();

        let before_set: HashSet<&String> = before.iter().collect();
        let after_set: HashSet<&String> = after.iter().collect();
        prop_assert_eq!(after.len(), before.len());
        prop_assert_eq!(after_set, before_set);

        let mut expected_head: Vec<String> = Vec::new();
        for location in &preferred {
            if before.contains(location) && !expected_head.contains(location) {
                expected_head.push(location.clone());
            }
        }
        prop_assert_eq!(&after[..expected_head.len()], expected_head.as_slice());

        let tail: Vec<&String> = after[expected_head.len()..].iter().collect();
        let expected_tail: Vec<&String> = before
            .iter()
            .filter(|location| !expected_head.contains(location))
            .collect();
        prop_assert_eq!(tail, expected_tail);
    }

    /// Property: admitting an already-admitted location changes nothing
    #[test]
    fn prop_admit_is_idempotent(
        count in 1usize..10,
        again in prop::collection::vec(0usize..10, 1..10),
    ) {
        let (mut workspace, _) = admitted(count);
        let ordering = workspace.ordering().to_vec();

        for i in again.into_iter().filter(|i| *i < count) {
            workspace.admit(&format!("/loc/{i}"));
        }

        prop_assert_eq!(workspace.ordering(), ordering.as_slice());
        prop_assert_eq!(workspace.len(), count);
    }
}

#[test]
fn test_admit_does_not_lift_exclusion() {
    let (mut workspace, _) = admitted(2);
    workspace.exclude("/loc/0");
    workspace.admit("/loc/0");
    assert!(workspace.is_excluded("/loc/0"));

    workspace.include("/loc/0");
    assert!(!workspace.is_excluded("/loc/0"));
}

#[tokio::test]
async fn test_exclusion_hides_segment_and_include_restores_field_exclusions() {
    let mut context = story_context();
    context.query("/character/alice");
    context.query("/character/bob");
    context.exclude_field("/character/alice", "role");

    context.exclude("/character/alice");
    let snapshot = context.snapshot().await;
    assert!(snapshot
        .segments
        .iter()
        .all(|view| view.location != "/character/alice"));
    let bob = snapshot
        .segments
        .iter()
        .find(|view| view.location == "/character/bob")
        .unwrap();
    assert!(bob.relations.is_empty(), "relation to excluded alice is hidden");

    context.include("/character/alice");
    let snapshot = context.snapshot().await;
    let alice = snapshot
        .segments
        .iter()
        .find(|view| view.location == "/character/alice")
        .unwrap();
    assert_eq!(alice.excluded_fields, vec!["role".to_string()]);
    assert!(alice.fields.contains_key("name"));
    assert!(!alice.fields.contains_key("role"));
}

#[tokio::test]
async fn test_excluded_children_are_hidden_from_parent() {
    let mut context = story_context();
    context.query("/character");
    context.exclude("/character/bob");

    let snapshot = context.snapshot().await;
    let aspect = snapshot
        .segments
        .iter()
        .find(|view| view.location == "/character")
        .unwrap();
    assert_eq!(aspect.children["elements"], vec!["alice".to_string()]);

    let root = snapshot
        .segments
        .iter()
        .find(|view| view.location == "/")
        .unwrap();
    assert_eq!(
        root.children["aspects"],
        vec!["character".to_string(), "place".to_string()]
    );
}

#[tokio::test]
async fn test_reset_clears_exclusions_and_history_but_keeps_slots() {
    let mut context = story_context();
    context.search("knight", None).await.unwrap();
    context.exclude("/place/castle");
    context.exclude_field("/character/alice", "role");
    let ordering = context.workspace().ordering().to_vec();

    context.reset();

    assert_eq!(context.workspace().ordering(), ordering.as_slice());
    assert!(!context.workspace().is_excluded("/place/castle"));
    assert!(context
        .workspace()
        .segment("/character/alice")
        .unwrap()
        .excluded_fields
        .is_empty());
    assert!(context.search_history().is_empty());
}

#[tokio::test]
async fn test_removed_resource_is_reported_missing() {
    let repository = story_repository();
    let mut context = ResourceContext::new(repository.clone(), &WorkspaceConfig::default());
    context.query("/character/bob");

    assert!(repository.remove("/character/bob").await);

    let snapshot = context.snapshot().await;
    assert_eq!(snapshot.missing_locations, vec!["/character/bob".to_string()]);
    assert!(context.workspace().contains("/character/bob"));
}

#[tokio::test]
async fn test_recent_searches_window() {
    let config = WorkspaceConfig {
        search_history_window: 2,
        ..WorkspaceConfig::default()
    };
    let mut context = ResourceContext::new(story_repository(), &config);
    for query in ["alice", "bob", "castle"] {
        context.search(query, None).await.unwrap();
    }

    let recent: Vec<&str> = context
        .recent_searches()
        .iter()
        .map(|record| record.query.as_str())
        .collect();
    assert_eq!(recent, vec!["bob", "castle"]);
    assert_eq!(context.search_history().len(), 3);
}

#[tokio::test]
async fn test_render_context_lines() {
    let mut context = story_context();
    context.query("/character/alice");
    context.exclude("/");

    let rendered = context.render_context().await;
    assert_eq!(rendered.len(), 1);
    let (location, lines) = &rendered[0];
    assert_eq!(location, "/character/alice");
    assert!(lines.contains(&"name: Alice".to_string()));
    assert!(lines.contains(&"role: brave knight".to_string()));
    assert!(lines.contains(&"Related to /character/bob: sister of".to_string()));
}
