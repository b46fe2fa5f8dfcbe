//! Unit tests for the annotation data model and its wire format.

use pagemark::types::{
    AnnotationId, AnnotationKind, AnnotationPatch, HighlightColor,
};
use serde_json::json;

use crate::helpers::{TestAnnotationBuilder, annotation};

#[test]
fn test_temp_ids_are_recognizable() {
    let temp = AnnotationId::temp();
    assert!(temp.is_temp());

    let permanent = AnnotationId::new("srv-1");
    assert!(!permanent.is_temp());
}

#[test]
fn test_temp_ids_are_unique() {
    assert_ne!(AnnotationId::temp(), AnnotationId::temp());
}

#[test]
fn test_kind_and_color_serialize_lowercase() {
    assert_eq!(
        serde_json::to_value(AnnotationKind::Underline).unwrap(),
        json!("underline")
    );
    assert_eq!(
        serde_json::to_value(HighlightColor::Purple).unwrap(),
        json!("purple")
    );
}

#[test]
fn test_annotation_wire_shape() {
    let value = serde_json::to_value(annotation("ann-1", 3)).unwrap();

    assert_eq!(value["id"], json!("ann-1"));
    assert_eq!(value["documentId"], json!("doc-1"));
    assert_eq!(value["pageNumber"], json!(3));
    assert_eq!(value["type"], json!("highlight"));
    assert_eq!(value["color"], json!("yellow"));
    assert!(value["createdAt"].is_string());

    // Rects travel with redundant edges for consumer convenience.
    let rect = &value["rects"][0];
    assert_eq!(rect["left"], json!(0.25));
    assert_eq!(rect["width"], json!(0.5));
    assert_eq!(rect["right"], json!(0.75));
    assert_eq!(rect["bottom"], json!(0.1875));
}

#[test]
fn test_absent_note_is_omitted_from_wire() {
    let value = serde_json::to_value(annotation("ann-1", 1)).unwrap();
    assert!(value.get("note").is_none());

    let noted = TestAnnotationBuilder::new("ann-2").with_note("check").build();
    let value = serde_json::to_value(noted).unwrap();
    assert_eq!(value["note"], json!("check"));
}

#[test]
fn test_annotation_round_trips_through_wire() {
    let original = TestAnnotationBuilder::new("ann-1")
        .on_page(4)
        .with_kind(AnnotationKind::Strike)
        .with_color(HighlightColor::Pink)
        .with_text("struck text")
        .build();

    let json = serde_json::to_string(&original).unwrap();
    let parsed: pagemark::types::Annotation = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.id, original.id);
    assert_eq!(parsed.kind, AnnotationKind::Strike);
    assert_eq!(parsed.color, HighlightColor::Pink);
    assert_eq!(parsed.rects, original.rects);
    assert_eq!(parsed.created_at, original.created_at);
}

#[test]
fn test_patch_omits_unset_fields() {
    let value = serde_json::to_value(AnnotationPatch::color(HighlightColor::Blue)).unwrap();
    assert_eq!(value, json!({ "color": "blue" }));

    let value = serde_json::to_value(AnnotationPatch::note("hi")).unwrap();
    assert_eq!(value, json!({ "note": "hi" }));

    assert!(AnnotationPatch::default().is_empty());
}

#[test]
fn test_badge_rules() {
    let highlight_with_note = TestAnnotationBuilder::new("a").with_note("n").build();
    assert!(highlight_with_note.shows_badge());

    let note_kind = TestAnnotationBuilder::new("b")
        .with_kind(AnnotationKind::Note)
        .build();
    assert!(note_kind.shows_badge());

    let whitespace_note = TestAnnotationBuilder::new("c").with_note("   ").build();
    assert!(!whitespace_note.has_note());
    assert!(!whitespace_note.shows_badge());
}
