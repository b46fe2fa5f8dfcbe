//! Unit tests for the optimistic annotation store reducer.

use pagemark::api::ApiError;
use pagemark::store::{AnnotationStore, Resolution, StoreError};
use pagemark::types::{AnnotationPatch, HighlightColor};

use crate::helpers::{TestAnnotationBuilder, annotation, draft};

fn network_error() -> ApiError {
    ApiError::Network("timeout".to_string())
}

#[test]
fn test_create_is_visible_immediately() {
    let mut store = AnnotationStore::new("doc-1");

    let (temp_id, _seq) = store.begin_create(&draft(1)).unwrap();

    assert!(temp_id.is_temp());
    assert_eq!(store.len(), 1);
    assert!(store.is_pending(&temp_id));
    assert_eq!(store.get(&temp_id).unwrap().text_content.as_deref(), Some("selected text"));
}

#[test]
fn test_create_commit_replaces_temp_in_place_and_keeps_rects() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![annotation("ann-0", 1)]);

    let (temp_id, seq) = store.begin_create(&draft(1)).unwrap();
    let local_rects = store.get(&temp_id).unwrap().rects.clone();

    // The server assigns a permanent id and does not echo geometry.
    let mut server = annotation("srv-9", 1);
    server.rects = Vec::new();

    let resolution = store.resolve_create(&temp_id, seq, Ok(server));

    assert_eq!(resolution, Resolution::Committed);
    assert_eq!(store.len(), 2);
    let committed = &store.annotations()[1];
    assert_eq!(committed.id.as_str(), "srv-9");
    assert_eq!(committed.rects, local_rects);
    assert!(!store.is_pending(&committed.id));
}

#[test]
fn test_create_failure_leaves_no_residue() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![annotation("ann-0", 1), annotation("ann-1", 2)]);
    let before: Vec<String> = store
        .annotations()
        .iter()
        .map(|a| a.id.as_str().to_string())
        .collect();

    let (temp_id, seq) = store.begin_create(&draft(1)).unwrap();
    assert_eq!(store.len(), 3);

    let resolution = store.resolve_create(&temp_id, seq, Err(network_error()));

    assert_eq!(resolution, Resolution::RolledBack);
    let after: Vec<String> = store
        .annotations()
        .iter()
        .map(|a| a.id.as_str().to_string())
        .collect();
    assert_eq!(after, before);
    assert!(!store.is_pending(&temp_id));
}

#[test]
fn test_update_failure_restores_previous_note() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![
        TestAnnotationBuilder::new("ann-0").with_note("x").build(),
    ]);
    let id = store.annotations()[0].id.clone();

    let seq = store.begin_update(&id, &AnnotationPatch::note("y")).unwrap();
    assert_eq!(store.get(&id).unwrap().note.as_deref(), Some("y"));

    let resolution = store.resolve_update(&id, seq, Err(network_error()));

    assert_eq!(resolution, Resolution::RolledBack);
    assert_eq!(store.get(&id).unwrap().note.as_deref(), Some("x"));
}

#[test]
fn test_update_commit_keeps_optimistic_value() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![annotation("ann-0", 1)]);
    let id = store.annotations()[0].id.clone();

    let seq = store
        .begin_update(&id, &AnnotationPatch::color(HighlightColor::Blue))
        .unwrap();
    let resolution = store.resolve_update(&id, seq, Ok(()));

    assert_eq!(resolution, Resolution::Committed);
    assert_eq!(store.get(&id).unwrap().color, HighlightColor::Blue);
    assert!(!store.is_pending(&id));
}

#[test]
fn test_delete_failure_restores_at_original_index() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![
        annotation("a", 1),
        annotation("b", 1),
        annotation("c", 1),
    ]);
    let id = store.annotations()[1].id.clone();

    let seq = store.begin_delete(&id).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.get(&id).is_none());

    let resolution = store.resolve_delete(&id, seq, Err(network_error()));

    assert_eq!(resolution, Resolution::RolledBack);
    assert_eq!(store.len(), 3);
    assert_eq!(store.annotations()[1].id.as_str(), "b");
}

#[test]
fn test_delete_commit_removes_entry() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![annotation("a", 1)]);
    let id = store.annotations()[0].id.clone();

    let seq = store.begin_delete(&id).unwrap();
    let resolution = store.resolve_delete(&id, seq, Ok(()));

    assert_eq!(resolution, Resolution::Committed);
    assert!(store.is_empty());
    assert!(!store.is_pending(&id));
}

#[test]
fn test_in_flight_guard_blocks_second_mutation() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![annotation("a", 1)]);
    let id = store.annotations()[0].id.clone();

    store
        .begin_update(&id, &AnnotationPatch::note("first"))
        .unwrap();

    let err = store
        .begin_update(&id, &AnnotationPatch::note("second"))
        .unwrap_err();
    assert_eq!(err, StoreError::MutationInFlight(id.clone()));
    assert_eq!(store.begin_delete(&id).unwrap_err(), StoreError::MutationInFlight(id));
}

#[test]
fn test_unknown_annotation_is_an_error() {
    let mut store = AnnotationStore::new("doc-1");
    let id = pagemark::types::AnnotationId::new("ghost");

    assert_eq!(
        store.begin_delete(&id).unwrap_err(),
        StoreError::UnknownAnnotation(id)
    );
}

#[test]
fn test_for_page_filters_by_page() {
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![
        annotation("a", 1),
        annotation("b", 2),
        annotation("c", 1),
    ]);

    let page_one: Vec<&str> = store.for_page(1).map(|a| a.id.as_str()).collect();
    assert_eq!(page_one, vec!["a", "c"]);
    assert_eq!(store.for_page(3).count(), 0);
}
