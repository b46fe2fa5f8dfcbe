//! Multi-component workflow tests: optimistic mutations through the remote
//! sync driver, and selection-to-annotation flows through the Pagemark
//! coordinator.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use pagemark::Pagemark;
use pagemark::drag::{DragEffect, ExcerptPayload, export};
use pagemark::store::{AnnotationStore, RemoteSync};
use pagemark::types::{AnnotationKind, AnnotationPatch, HighlightColor, Rect};
use pagemark::viewer::{ViewerEvents, ViewerSignal};

use crate::helpers::{FakeApi, FakeViewer, TestAnnotationBuilder, annotation, draft, wait_for_sync};

/// Drive frames until the remote sync settles.
fn settle(pagemark: &mut Pagemark, viewer: &FakeViewer) {
    let timeout = Duration::from_secs(2);
    let start = Instant::now();
    while pagemark.sync.remote.has_pending() && start.elapsed() < timeout {
        pagemark.frame(viewer);
        std::thread::yield_now();
    }
    pagemark.frame(viewer);
}

// ============================================================================
// RemoteSync workflows
// ============================================================================

#[test]
fn test_create_commits_with_server_id_and_local_rects() {
    let api = Arc::new(FakeApi::new());
    let sync = RemoteSync::new(api.clone());
    let mut store = AnnotationStore::new("doc-1");

    let temp_id = sync.create(&mut store, draft(1)).unwrap();
    // Optimistic insert is visible before the remote call resolves.
    assert_eq!(store.len(), 1);
    assert!(store.is_pending(&temp_id));
    let local_rects = store.get(&temp_id).unwrap().rects.clone();

    let failures = wait_for_sync(&sync, &mut store);

    assert!(failures.is_empty());
    assert_eq!(store.len(), 1);
    let committed = &store.annotations()[0];
    assert_eq!(committed.id.as_str(), "srv-1");
    assert_eq!(committed.rects, local_rects);
    assert!(!store.is_pending(&committed.id));
    assert_eq!(api.calls(), vec!["create doc-1"]);
}

#[test]
fn test_create_failure_rolls_back_and_reports() {
    let api = Arc::new(FakeApi::new());
    api.fail_create.store(true, Ordering::SeqCst);
    let sync = RemoteSync::new(api);
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![annotation("ann-0", 1)]);

    sync.create(&mut store, draft(1)).unwrap();
    assert_eq!(store.len(), 2);

    let failures = wait_for_sync(&sync, &mut store);

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].operation, "create");
    assert_eq!(store.len(), 1);
    assert_eq!(store.annotations()[0].id.as_str(), "ann-0");
}

#[test]
fn test_update_failure_restores_note_after_settlement() {
    let api = Arc::new(FakeApi::new());
    api.fail_update.store(true, Ordering::SeqCst);
    let sync = RemoteSync::new(api);
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![
        TestAnnotationBuilder::new("ann-0").with_note("x").build(),
    ]);
    let id = store.annotations()[0].id.clone();

    sync.update(&mut store, &id, AnnotationPatch::note("y")).unwrap();
    assert_eq!(store.get(&id).unwrap().note.as_deref(), Some("y"));

    let failures = wait_for_sync(&sync, &mut store);

    assert_eq!(failures.len(), 1);
    assert_eq!(store.get(&id).unwrap().note.as_deref(), Some("x"));
}

#[test]
fn test_delete_failure_restores_at_original_index() {
    let api = Arc::new(FakeApi::new());
    api.fail_delete.store(true, Ordering::SeqCst);
    let sync = RemoteSync::new(api);
    let mut store = AnnotationStore::new("doc-1");
    store.replace_all(vec![
        annotation("a", 1),
        annotation("b", 1),
        annotation("c", 1),
    ]);
    let id = store.annotations()[1].id.clone();

    sync.delete(&mut store, &id).unwrap();
    assert!(store.get(&id).is_none());

    let failures = wait_for_sync(&sync, &mut store);

    assert_eq!(failures.len(), 1);
    assert_eq!(store.annotations()[1].id.as_str(), "b");
}

#[test]
fn test_load_installs_remote_list() {
    let api = Arc::new(FakeApi::new());
    *api.remote_list.lock().unwrap() = vec![annotation("ann-0", 1), annotation("ann-1", 2)];
    let sync = RemoteSync::new(api);
    let mut store = AnnotationStore::new("doc-1");

    sync.load("doc-1");
    let failures = wait_for_sync(&sync, &mut store);

    assert!(failures.is_empty());
    assert_eq!(store.len(), 2);
}

// ============================================================================
// Pagemark workflows
// ============================================================================

#[test]
fn test_create_highlight_from_selection() {
    let api = Arc::new(FakeApi::new());
    let mut events = ViewerEvents::new();
    let mut pagemark = Pagemark::new("doc-1", "Paper.pdf", api, &mut events);

    let mut viewer = FakeViewer::new()
        .on_page(3)
        .with_selection("Transformers use attention", vec![Rect::new(
            140.0, 120.0, 300.0, 18.0,
        )]);
    viewer.container.scroll_top = 2000.0;
    settle(&mut pagemark, &viewer);

    events.emit(ViewerSignal::SelectionChanged);
    pagemark.frame(&viewer);
    assert!(pagemark.active_selection().is_some());

    pagemark.commit_highlight(HighlightColor::Yellow, &viewer);

    // Committed optimistically and the selection/toolbar is gone.
    assert!(pagemark.active_selection().is_none());
    assert_eq!(pagemark.sync.store.len(), 1);
    let created = &pagemark.sync.store.annotations()[0];
    assert!(created.id.is_temp());
    assert_eq!(created.kind, AnnotationKind::Highlight);
    assert_eq!(created.color, HighlightColor::Yellow);
    assert_eq!(created.page_number, 3);
    assert!(!created.rects.is_empty());
    assert_eq!(
        created.text_content.as_deref(),
        Some("Transformers use attention")
    );

    settle(&mut pagemark, &viewer);

    let committed = &pagemark.sync.store.annotations()[0];
    assert_eq!(committed.id.as_str(), "srv-1");
    assert!(!committed.rects.is_empty());
    assert_eq!(pagemark.toasts.count(), 0);
}

#[test]
fn test_failed_commit_surfaces_toast_and_rolls_back() {
    let api = Arc::new(FakeApi::new());
    api.fail_create.store(true, Ordering::SeqCst);
    let mut events = ViewerEvents::new();
    let mut pagemark = Pagemark::new("doc-1", "Paper.pdf", api, &mut events);

    let viewer = FakeViewer::new().with_selection("hello", vec![Rect::new(
        140.0, 120.0, 100.0, 18.0,
    )]);
    settle(&mut pagemark, &viewer);

    events.emit(ViewerSignal::SelectionChanged);
    pagemark.frame(&viewer);
    pagemark.commit_highlight(HighlightColor::Green, &viewer);
    assert_eq!(pagemark.sync.store.len(), 1);

    settle(&mut pagemark, &viewer);

    assert!(pagemark.sync.store.is_empty());
    assert_eq!(pagemark.toasts.count(), 1);
    assert!(pagemark.toasts.toasts()[0].message.contains("create"));
}

#[test]
fn test_hover_shows_note_preview() {
    let api = Arc::new(FakeApi::new());
    *api.remote_list.lock().unwrap() = vec![
        TestAnnotationBuilder::new("ann-0").with_note("check this").build(),
    ];
    let mut events = ViewerEvents::new();
    let mut pagemark = Pagemark::new("doc-1", "Paper.pdf", api, &mut events);
    let viewer = FakeViewer::new();
    settle(&mut pagemark, &viewer);

    // The annotation's rect renders at container (250, 100)..(550, 150);
    // the viewport point lands inside it.
    let changed = pagemark.handle_mouse_move((360.0, 190.0), &viewer);
    assert!(changed);

    let (note, anchor) = pagemark.note_preview().expect("preview should show");
    assert_eq!(note, "check this");
    assert!(anchor.0 > 550.0);

    // Moving far away clears the hover.
    assert!(pagemark.handle_mouse_move((900.0, 900.0), &viewer));
    assert!(pagemark.note_preview().is_none());
}

#[test]
fn test_click_dispatch_hits_annotation() {
    let api = Arc::new(FakeApi::new());
    *api.remote_list.lock().unwrap() = vec![annotation("ann-0", 1)];
    let mut events = ViewerEvents::new();
    let mut pagemark = Pagemark::new("doc-1", "Paper.pdf", api, &mut events);
    let viewer = FakeViewer::new();
    settle(&mut pagemark, &viewer);

    let hit = pagemark.handle_mouse_down((360.0, 190.0), &viewer);
    let (annotation, point) = hit.expect("click should hit the annotation");
    assert_eq!(annotation.id.as_str(), "ann-0");
    assert!(point.0 >= 250.0 && point.0 <= 550.0);

    assert!(pagemark.handle_mouse_down((5.0, 5.0), &viewer).is_none());
}

#[test]
fn test_menu_driven_color_change_rolls_back_on_failure() {
    let api = Arc::new(FakeApi::new());
    *api.remote_list.lock().unwrap() = vec![annotation("ann-0", 1)];
    api.fail_update.store(true, Ordering::SeqCst);
    let mut events = ViewerEvents::new();
    let mut pagemark = Pagemark::new("doc-1", "Paper.pdf", api, &mut events);
    let viewer = FakeViewer::new();
    settle(&mut pagemark, &viewer);

    let id = pagemark.sync.store.annotations()[0].id.clone();
    pagemark.set_annotation_color(&id, HighlightColor::Red);
    assert_eq!(
        pagemark.sync.store.get(&id).unwrap().color,
        HighlightColor::Red
    );

    settle(&mut pagemark, &viewer);

    assert_eq!(
        pagemark.sync.store.get(&id).unwrap().color,
        HighlightColor::Yellow
    );
    assert_eq!(pagemark.toasts.count(), 1);
}

#[test]
fn test_detach_tears_down_listeners() {
    let api = Arc::new(FakeApi::new());
    let mut events = ViewerEvents::new();
    let mut pagemark = Pagemark::new("doc-1", "Paper.pdf", api, &mut events);
    assert_eq!(events.listener_count(), 2);

    pagemark.detach(&mut events);
    assert_eq!(events.listener_count(), 0);
}

// ============================================================================
// Drag export
// ============================================================================

#[test]
fn test_drag_payload_scenario() {
    let selection = crate::helpers::selection("Hello world", 2);
    let payload = ExcerptPayload::from_selection("doc-1", "Paper.pdf", &selection);

    assert_eq!(
        payload,
        ExcerptPayload {
            source_type: "pdf".to_string(),
            source_id: "doc-1".to_string(),
            source_title: "Paper.pdf".to_string(),
            page_number: 2,
            content: "Hello world".to_string(),
        }
    );

    let export = export(&payload).unwrap();
    assert_eq!(export.effect, DragEffect::Copy);
    let parsed: ExcerptPayload = serde_json::from_str(&export.data).unwrap();
    assert_eq!(parsed, payload);
}
