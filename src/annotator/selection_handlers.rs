//! Selection-side handlers - toolbar actions, note flow, clipboard, commits.

use anyhow::Context as _;
use gpui::{App, Window};
use tracing::debug;

use super::Pagemark;
use crate::geometry::GeometryMapper;
use crate::notifications::Toast;
use crate::selection::toolbar::{NoteEditorState, NoteTarget, ToolbarAction, ToolbarAnchor, toolbar_anchor};
use crate::types::{AnnotationDraft, AnnotationKind, HighlightColor, TextSelection};
use crate::viewer::ViewerAdapter;

impl Pagemark {
    /// The captured selection, if any.
    pub fn active_selection(&self) -> Option<&TextSelection> {
        self.selection.capture.current()
    }

    /// Container-space anchor for the toolbar (or the note editor replacing
    /// it), recomputed from live geometry.
    pub fn selection_anchor(&self, viewer: &dyn ViewerAdapter) -> Option<ToolbarAnchor> {
        let selection = self.active_selection()?;
        let container = viewer.container();
        let rects = GeometryMapper::to_container_space(&selection.rects, &container);
        toolbar_anchor(&rects)
    }

    /// Dispatch a toolbar button press.
    pub fn handle_toolbar_action(
        &mut self,
        action: ToolbarAction,
        viewer: &dyn ViewerAdapter,
        window: &mut Window,
        cx: &mut App,
    ) {
        match action {
            ToolbarAction::Highlight(color) => self.commit_highlight(color, viewer),
            ToolbarAction::AddNote => self.open_note_editor(window, cx),
            ToolbarAction::Copy => {
                if let Err(error) = self.copy_selection() {
                    self.toasts
                        .push(Toast::warning(format!("Copy failed: {error:#}")));
                }
                self.clear_selection();
            }
            ToolbarAction::Dismiss => self.clear_selection(),
        }
    }

    /// Commit the selection as a highlight annotation in the given color.
    pub fn commit_highlight(&mut self, color: HighlightColor, viewer: &dyn ViewerAdapter) {
        let Some(draft) = self.selection_draft(AnnotationKind::Highlight, color, None, viewer)
        else {
            return;
        };
        self.create_annotation(draft);
    }

    /// Open the note entry flow for the current selection.
    pub fn open_note_editor(&mut self, window: &mut Window, cx: &mut App) {
        if self.active_selection().is_none() {
            return;
        }
        self.selection.note_editor =
            Some(NoteEditorState::new(NoteTarget::Selection, window, cx));
    }

    /// Save the open note flow: commit a note-kind annotation from the
    /// selection, or patch the targeted annotation's note.
    pub fn save_note(&mut self, viewer: &dyn ViewerAdapter, cx: &App) {
        let Some(editor) = self.selection.note_editor.take() else {
            return;
        };
        let text = editor.text(cx);
        let note = text.trim();
        if note.is_empty() {
            return;
        }

        match editor.target {
            NoteTarget::Selection => {
                let Some(draft) = self.selection_draft(
                    AnnotationKind::Note,
                    HighlightColor::default(),
                    Some(note.to_string()),
                    viewer,
                ) else {
                    return;
                };
                self.create_annotation(draft);
            }
            NoteTarget::Existing(id) => self.edit_annotation_note(&id, note.to_string()),
        }
    }

    pub fn cancel_note_editor(&mut self) {
        self.selection.note_editor = None;
    }

    /// Copy the selected text to the clipboard, caching it for inspection.
    pub fn copy_selection(&mut self) -> anyhow::Result<()> {
        let Some(selection) = self.active_selection() else {
            anyhow::bail!("no text selected");
        };
        let text = selection.text.clone();
        self.selection.last_copied_text = Some(text.clone());

        let mut clipboard = arboard::Clipboard::new().context("accessing clipboard")?;
        clipboard.set_text(text).context("copying to clipboard")?;
        Ok(())
    }

    pub fn last_copied_text(&self) -> Option<&str> {
        self.selection.last_copied_text.as_deref()
    }

    /// Drop the selection and any open note flow.
    pub fn clear_selection(&mut self) {
        self.selection.capture.clear();
        self.selection.note_editor = None;
    }

    /// Build the create body for the current selection: viewport rects to
    /// container space, then normalized against the owning page's rect.
    fn selection_draft(
        &mut self,
        kind: AnnotationKind,
        color: HighlightColor,
        note: Option<String>,
        viewer: &dyn ViewerAdapter,
    ) -> Option<AnnotationDraft> {
        let selection = self.active_selection()?.clone();

        let Some(page) = viewer.page_rect(selection.page_number) else {
            self.toasts.push(Toast::error(format!(
                "Couldn't place annotation: page {} is not laid out",
                selection.page_number
            )));
            return None;
        };

        let container = viewer.container();
        let rects = GeometryMapper::to_container_space(&selection.rects, &container)
            .iter()
            .map(|rect| GeometryMapper::normalize_to_page(rect, &page))
            .collect();

        Some(AnnotationDraft {
            page_number: selection.page_number,
            kind,
            color,
            rects,
            text_content: Some(selection.text),
            note,
        })
    }

    /// Optimistically insert a draft and clear the selection on success.
    fn create_annotation(&mut self, draft: AnnotationDraft) {
        match self.sync.remote.create(&mut self.sync.store, draft) {
            Ok(id) => {
                debug!(id = %id, "annotation committed optimistically");
                self.clear_selection();
            }
            Err(error) => {
                self.toasts
                    .push(Toast::error(format!("Couldn't create annotation: {error}")));
            }
        }
    }
}
