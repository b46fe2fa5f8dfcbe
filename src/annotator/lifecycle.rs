//! Subsystem lifecycle - attachment, per-frame polling, and teardown.

use std::sync::Arc;

use tracing::debug;

use super::{OverlayState, Pagemark, SelectionState, SyncState};
use crate::api::AnnotationApi;
use crate::hit_testing::AnnotationHitTester;
use crate::notifications::{Toast, ToastAction, ToastManager};
use crate::overlay::layout::{OverlayLayout, layout_overlay};
use crate::profile_scope;
use crate::selection::capture::SelectionCapture;
use crate::store::annotations::AnnotationStore;
use crate::store::sync::RemoteSync;
use crate::viewer::{ViewerAdapter, ViewerEvents};

impl Pagemark {
    /// Attach the subsystem for a document: register the capture listeners
    /// and kick off the initial remote list load.
    pub fn new(
        document_id: impl Into<String>,
        document_title: impl Into<String>,
        api: Arc<dyn AnnotationApi>,
        events: &mut ViewerEvents,
    ) -> Self {
        let document_id = document_id.into();
        let store = AnnotationStore::new(&document_id);
        let remote = RemoteSync::new(api);
        remote.load(&document_id);

        debug!(document = %document_id, "annotation subsystem attached");
        Self {
            document_id,
            document_title: document_title.into(),
            selection: SelectionState {
                capture: SelectionCapture::attach(events),
                note_editor: None,
                last_copied_text: None,
            },
            sync: SyncState { store, remote },
            overlay: OverlayState {
                layout: OverlayLayout::default(),
                hit_tester: AnnotationHitTester::new(),
                hovered: None,
                preview_bounds: None,
            },
            toasts: ToastManager::new(),
        }
    }

    /// Tear down for unmount or a document switch. Detaches the capture
    /// listeners; a skipped detach leaks callbacks into the next document.
    pub fn detach(&mut self, events: &mut ViewerEvents) {
        debug!(document = %self.document_id, "annotation subsystem detached");
        self.selection.capture.destroy(events);
        self.selection.note_editor = None;
        self.overlay.hovered = None;
        self.overlay.preview_bounds = None;
        self.toasts.clear();
    }

    /// Per-frame poll: advance the capture debounce, drain remote outcomes
    /// into the store, expire toasts, and rebuild the overlay layout.
    /// Returns whether subsystem state changed and the host should redraw.
    pub fn frame(&mut self, viewer: &dyn ViewerAdapter) -> bool {
        profile_scope!("pagemark_frame");

        let mut dirty = false;

        if let Some(change) = self.selection.capture.poll(viewer) {
            // A replaced or cleared selection invalidates an open note flow.
            if change.is_none() {
                self.selection.note_editor = None;
            }
            dirty = true;
        }

        let report = self.sync.remote.process(&mut self.sync.store);
        dirty |= report.changed;
        for failure in report.failures {
            self.toasts
                .push(Toast::error(failure.message()).with_action(ToastAction::retry()));
            dirty = true;
        }

        dirty |= self.toasts.prune_expired();

        // Rects are page fractions; any scroll, zoom or resize moves them in
        // pixel space, so the layout is recomputed every frame.
        let layout = layout_overlay(
            self.sync.store.annotations(),
            self.selection.capture.current(),
            viewer,
        );
        self.overlay.hit_tester.rebuild(layout.hit_rects.iter().cloned());
        self.overlay.layout = layout;

        dirty
    }

    /// The layout computed by the last `frame` call.
    pub fn layout(&self) -> &OverlayLayout {
        &self.overlay.layout
    }

    /// Note preview to show for the hovered annotation: the note text and
    /// its container-space anchor.
    pub fn note_preview(&self) -> Option<(&str, (f32, f32))> {
        let id = self.overlay.hovered.as_ref()?;
        let annotation = self.sync.store.get(id)?;
        if !annotation.has_note() {
            return None;
        }
        let note = annotation.note.as_deref()?;
        let first = self.overlay.layout.first_rect_of(id)?;
        Some((note, crate::overlay::layout::note_preview_anchor(&first)))
    }
}
