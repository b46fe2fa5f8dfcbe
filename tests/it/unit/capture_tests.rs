//! Unit tests for selection capture.

use std::thread;
use std::time::Duration;

use pagemark::selection::SelectionCapture;
use pagemark::types::Rect;
use pagemark::viewer::{RawSelection, ViewerEvents, ViewerSignal};

use crate::helpers::FakeViewer;

fn line_rects() -> Vec<Rect> {
    vec![
        Rect::new(140.0, 120.0, 300.0, 18.0),
        Rect::new(140.0, 142.0, 180.0, 18.0),
    ]
}

#[test]
fn test_selection_changed_produces_capture() {
    let mut events = ViewerEvents::new();
    let mut capture = SelectionCapture::attach(&mut events);
    let viewer = FakeViewer::new()
        .on_page(3)
        .with_selection("  Transformers use attention  ", line_rects());

    events.emit(ViewerSignal::SelectionChanged);
    let change = capture.poll(&viewer).expect("capture should change");

    let selection = change.expect("selection should be captured");
    assert_eq!(selection.text, "Transformers use attention");
    assert_eq!(selection.rects.len(), 2);
    assert_eq!(selection.page_number, 3);
}

#[test]
fn test_cleared_selection_emits_none() {
    let mut events = ViewerEvents::new();
    let mut capture = SelectionCapture::attach(&mut events);
    let mut viewer = FakeViewer::new().with_selection("hello", line_rects());

    events.emit(ViewerSignal::SelectionChanged);
    assert!(capture.poll(&viewer).is_some());

    viewer.selection = None;
    events.emit(ViewerSignal::SelectionChanged);
    let change = capture.poll(&viewer).expect("clear should be observed");
    assert!(change.is_none());
    assert!(capture.current().is_none());
}

#[test]
fn test_selection_outside_container_is_rejected() {
    let mut events = ViewerEvents::new();
    let mut capture = SelectionCapture::attach(&mut events);
    let mut viewer = FakeViewer::new();
    viewer.selection = Some(RawSelection {
        text: "outside".to_string(),
        rects: vec![Rect::new(10.0, 10.0, 50.0, 16.0)],
        // Container starts at (100, 80); this anchor is in the sidebar.
        anchor: (10.0, 10.0),
    });

    events.emit(ViewerSignal::SelectionChanged);
    assert!(capture.poll(&viewer).is_none());
    assert!(capture.current().is_none());
}

#[test]
fn test_whitespace_selection_is_rejected() {
    let mut events = ViewerEvents::new();
    let mut capture = SelectionCapture::attach(&mut events);
    let viewer = FakeViewer::new().with_selection("   \n\t  ", line_rects());

    events.emit(ViewerSignal::SelectionChanged);
    assert!(capture.poll(&viewer).is_none());
}

#[test]
fn test_missing_page_marker_defaults_to_page_one() {
    let mut events = ViewerEvents::new();
    let mut capture = SelectionCapture::attach(&mut events);
    let mut viewer = FakeViewer::new().with_selection("hello", line_rects());
    viewer.anchor_page = None;

    events.emit(ViewerSignal::SelectionChanged);
    let selection = capture.poll(&viewer).unwrap().unwrap();
    assert_eq!(selection.page_number, 1);
}

#[test]
fn test_pointer_release_is_debounced() {
    let mut events = ViewerEvents::new();
    let mut capture = SelectionCapture::attach(&mut events);
    let viewer = FakeViewer::new().with_selection("hello", line_rects());

    events.emit(ViewerSignal::PointerReleased);
    // The settle delay has not lapsed yet.
    assert!(capture.poll(&viewer).is_none());

    thread::sleep(Duration::from_millis(20));
    let change = capture.poll(&viewer).expect("settled release should read");
    assert!(change.is_some());
}

#[test]
fn test_destroyed_capture_ignores_signals() {
    let mut events = ViewerEvents::new();
    let mut capture = SelectionCapture::attach(&mut events);
    let viewer = FakeViewer::new().with_selection("hello", line_rects());

    capture.destroy(&mut events);
    events.emit(ViewerSignal::SelectionChanged);
    events.emit(ViewerSignal::PointerReleased);

    thread::sleep(Duration::from_millis(20));
    assert!(capture.poll(&viewer).is_none());
    assert_eq!(events.listener_count(), 0);
}
