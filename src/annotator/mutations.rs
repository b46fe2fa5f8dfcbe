//! Menu-driven annotation mutations and pointer dispatch.
//!
//! Clicks and hovers over the painted overlay are resolved through the hit
//! tester; the overlay layer itself takes no pointer events.

use gpui::{App, Window};

use super::Pagemark;
use crate::constants::{NOTE_PREVIEW_HOVER_HEIGHT, NOTE_PREVIEW_WIDTH};
use crate::geometry::GeometryMapper;
use crate::notifications::Toast;
use crate::overlay::layout::note_preview_anchor;
use crate::profile_scope;
use crate::selection::toolbar::{NoteEditorState, NoteTarget};
use crate::types::{Annotation, AnnotationId, AnnotationPatch, HighlightColor, Rect};
use crate::viewer::ViewerAdapter;

impl Pagemark {
    /// Change an annotation's color (optimistic, rolled back on failure).
    pub fn set_annotation_color(&mut self, id: &AnnotationId, color: HighlightColor) {
        let patch = AnnotationPatch::color(color);
        if let Err(error) = self.sync.remote.update(&mut self.sync.store, id, patch) {
            self.toasts
                .push(Toast::error(format!("Couldn't recolor annotation: {error}")));
        }
    }

    /// Replace an annotation's note (optimistic, rolled back on failure).
    pub fn edit_annotation_note(&mut self, id: &AnnotationId, note: String) {
        let patch = AnnotationPatch::note(note);
        if let Err(error) = self.sync.remote.update(&mut self.sync.store, id, patch) {
            self.toasts
                .push(Toast::error(format!("Couldn't save note: {error}")));
        }
    }

    /// Open the note editor prefilled with an existing annotation's note.
    pub fn open_note_editor_for(
        &mut self,
        id: &AnnotationId,
        window: &mut Window,
        cx: &mut App,
    ) {
        let existing_note = self
            .sync
            .store
            .get(id)
            .and_then(|annotation| annotation.note.clone())
            .unwrap_or_default();

        let editor = NoteEditorState::new(NoteTarget::Existing(id.clone()), window, cx);
        if !existing_note.is_empty() {
            editor.input.update(cx, |state, cx| {
                state.set_value(existing_note, window, cx);
            });
        }
        self.selection.note_editor = Some(editor);
    }

    /// Delete an annotation (optimistic, restored on failure).
    pub fn delete_annotation(&mut self, id: &AnnotationId) {
        if let Err(error) = self.sync.remote.delete(&mut self.sync.store, id) {
            self.toasts
                .push(Toast::error(format!("Couldn't delete annotation: {error}")));
        }
    }

    /// Whether a mutation for this annotation is still in flight. The menu
    /// disables its entries while pending.
    pub fn is_annotation_pending(&self, id: &AnnotationId) -> bool {
        self.sync.store.is_pending(id)
    }

    /// Resolve a pointer-down on the overlay. A hit returns the annotation
    /// and the container-space click point for anchoring the edit menu; the
    /// host must stop propagation when it gets one.
    pub fn handle_mouse_down(
        &mut self,
        viewport_pos: (f32, f32),
        viewer: &dyn ViewerAdapter,
    ) -> Option<(Annotation, (f32, f32))> {
        let container = viewer.container();
        let point = GeometryMapper::point_to_container_space(viewport_pos, &container);

        let id = self.overlay.hit_tester.top_hit(point.0, point.1)?;
        let annotation = self.sync.store.get(&id)?.clone();
        Some((annotation, point))
    }

    /// Track the pointer for hover previews. Returns whether hover state
    /// changed.
    pub fn handle_mouse_move(
        &mut self,
        viewport_pos: (f32, f32),
        viewer: &dyn ViewerAdapter,
    ) -> bool {
        profile_scope!("annotation_hover");

        let container = viewer.container();
        let point = GeometryMapper::point_to_container_space(viewport_pos, &container);

        // The preview stays open while the pointer is over the card itself.
        if let Some(bounds) = &self.overlay.preview_bounds {
            if self.overlay.hovered.is_some() && bounds.contains(point.0, point.1) {
                return false;
            }
        }

        let hovered = self.overlay.hit_tester.top_hit(point.0, point.1);
        if hovered == self.overlay.hovered {
            return false;
        }

        self.overlay.preview_bounds = hovered.as_ref().and_then(|id| {
            let annotation = self.sync.store.get(id)?;
            if !annotation.has_note() {
                return None;
            }
            let first = self.overlay.layout.first_rect_of(id)?;
            let (x, y) = note_preview_anchor(&first);
            Some(Rect::new(x, y, NOTE_PREVIEW_WIDTH, NOTE_PREVIEW_HOVER_HEIGHT))
        });
        self.overlay.hovered = hovered;
        true
    }
}
