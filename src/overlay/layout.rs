//! Pure layout stage of the annotation overlay.
//!
//! Recomputed whenever the visible page, the annotation list or the
//! container geometry changes - stored rects are page fractions, so every
//! scroll, resize or zoom shifts where they land in pixels.

use tracing::trace;

use crate::constants::{
    NOTE_BADGE_DIAMETER, NOTE_PREVIEW_GAP, NOTE_PREVIEW_MAX_CHARS, STRIKE_THICKNESS,
    UNDERLINE_THICKNESS,
};
use crate::geometry::GeometryMapper;
use crate::profile_scope;
use crate::types::{Annotation, AnnotationId, AnnotationKind, HighlightColor, Rect, TextSelection};
use crate::viewer::ViewerAdapter;

/// How a shape is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeStyle {
    /// Ephemeral selection box, lower-emphasis fixed tint.
    SelectionBox,
    /// Translucent fill in the annotation's color.
    Fill(HighlightColor),
    /// Bottom rule only, transparent elsewhere.
    Underline(HighlightColor),
    /// Horizontal band centered vertically within the line rect.
    Strike(HighlightColor),
    /// Circular badge marking an attached note.
    NoteBadge(HighlightColor),
}

/// A positioned shape in container-content space.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayShape {
    /// The owning annotation; `None` for ephemeral selection boxes.
    pub annotation: Option<AnnotationId>,
    pub bounds: Rect,
    pub style: ShapeStyle,
}

/// Result of a layout pass.
#[derive(Clone, Debug, Default)]
pub struct OverlayLayout {
    /// Page the layout was computed for.
    pub page_number: u32,
    /// Shapes in paint order (persisted annotations first, then the
    /// ephemeral selection on top).
    pub shapes: Vec<OverlayShape>,
    /// Full line rects per annotation, in paint order, for hit testing.
    /// These cover the whole selected line even for underline/strike, whose
    /// painted shapes are thin.
    pub hit_rects: Vec<(AnnotationId, Rect)>,
}

impl OverlayLayout {
    pub fn selection_boxes(&self) -> impl Iterator<Item = &OverlayShape> {
        self.shapes
            .iter()
            .filter(|shape| shape.style == ShapeStyle::SelectionBox)
    }

    pub fn badges(&self) -> impl Iterator<Item = &OverlayShape> {
        self.shapes
            .iter()
            .filter(|shape| matches!(shape.style, ShapeStyle::NoteBadge(_)))
    }

    pub fn shapes_for<'a>(
        &'a self,
        id: &'a AnnotationId,
    ) -> impl Iterator<Item = &'a OverlayShape> {
        self.shapes
            .iter()
            .filter(move |shape| shape.annotation.as_ref() == Some(id))
    }

    /// First laid-out line rect of an annotation, the anchor for badges and
    /// the note preview.
    pub fn first_rect_of(&self, id: &AnnotationId) -> Option<Rect> {
        self.hit_rects
            .iter()
            .find(|(annotation, _)| annotation == id)
            .map(|(_, rect)| *rect)
    }
}

/// Compute the overlay layout for the current frame.
///
/// Annotations on other pages are never laid out; records with an empty
/// rect list are skipped rather than crashing the overlay.
pub fn layout_overlay(
    annotations: &[Annotation],
    selection: Option<&TextSelection>,
    viewer: &dyn ViewerAdapter,
) -> OverlayLayout {
    profile_scope!("layout_overlay");

    let page_number = viewer.current_page();
    let mut layout = OverlayLayout {
        page_number,
        ..Default::default()
    };

    let page_rect = viewer.page_rect(page_number);
    if page_rect.is_none() {
        trace!(page = page_number, "page not laid out; skipping annotations");
    }

    for annotation in annotations {
        if annotation.page_number != page_number {
            continue;
        }
        if annotation.rects.is_empty() {
            trace!(id = %annotation.id, "annotation without rects skipped");
            continue;
        }
        let Some(page) = page_rect else {
            continue;
        };

        let line_rects: Vec<Rect> = annotation
            .rects
            .iter()
            .map(|rect| GeometryMapper::denormalize_from_page(rect, &page))
            .collect();

        for rect in &line_rects {
            let (bounds, style) = match annotation.kind {
                AnnotationKind::Highlight | AnnotationKind::Note => {
                    (*rect, ShapeStyle::Fill(annotation.color))
                }
                AnnotationKind::Underline => (
                    Rect::new(
                        rect.left,
                        rect.bottom() - UNDERLINE_THICKNESS,
                        rect.width,
                        UNDERLINE_THICKNESS,
                    ),
                    ShapeStyle::Underline(annotation.color),
                ),
                AnnotationKind::Strike => (
                    Rect::new(
                        rect.left,
                        rect.top + (rect.height - STRIKE_THICKNESS) / 2.0,
                        rect.width,
                        STRIKE_THICKNESS,
                    ),
                    ShapeStyle::Strike(annotation.color),
                ),
            };
            layout.shapes.push(OverlayShape {
                annotation: Some(annotation.id.clone()),
                bounds,
                style,
            });
            layout.hit_rects.push((annotation.id.clone(), *rect));
        }

        if annotation.shows_badge() {
            if let Some(first) = line_rects.first() {
                let badge = badge_rect(first);
                layout.shapes.push(OverlayShape {
                    annotation: Some(annotation.id.clone()),
                    bounds: badge,
                    style: ShapeStyle::NoteBadge(annotation.color),
                });
                layout.hit_rects.push((annotation.id.clone(), badge));
            }
        }
    }

    if let Some(selection) = selection {
        let container = viewer.container();
        for rect in GeometryMapper::to_container_space(&selection.rects, &container) {
            layout.shapes.push(OverlayShape {
                annotation: None,
                bounds: rect,
                style: ShapeStyle::SelectionBox,
            });
        }
    }

    layout
}

/// Badge bounds, centered on the first rect's top-right corner.
fn badge_rect(first: &Rect) -> Rect {
    Rect::new(
        first.right() - NOTE_BADGE_DIAMETER / 2.0,
        first.top - NOTE_BADGE_DIAMETER / 2.0,
        NOTE_BADGE_DIAMETER,
        NOTE_BADGE_DIAMETER,
    )
}

/// Where the hover preview card anchors: to the right of the annotation's
/// first rect.
pub fn note_preview_anchor(first_rect: &Rect) -> (f32, f32) {
    (first_rect.right() + NOTE_PREVIEW_GAP, first_rect.top)
}

/// Preview text, clipped beyond the preview limit with an ellipsis.
pub fn truncate_note(note: &str) -> String {
    if note.chars().count() <= NOTE_PREVIEW_MAX_CHARS {
        return note.to_string();
    }
    let mut clipped: String = note.chars().take(NOTE_PREVIEW_MAX_CHARS).collect();
    clipped.push('…');
    clipped
}
