//! Subsystem state - the Pagemark struct definition and sub-structs.

use crate::hit_testing::AnnotationHitTester;
use crate::notifications::ToastManager;
use crate::overlay::layout::OverlayLayout;
use crate::selection::capture::SelectionCapture;
use crate::selection::toolbar::NoteEditorState;
use crate::store::annotations::AnnotationStore;
use crate::store::sync::RemoteSync;
use crate::types::{AnnotationId, Rect};

/// Selection-side state: the capture, the note entry flow, and the copy
/// cache.
pub struct SelectionState {
    /// Listens for the viewer's selection and pointer signals.
    pub capture: SelectionCapture,
    /// Open note entry flow, if any.
    pub note_editor: Option<NoteEditorState>,
    /// Last text put on the clipboard, kept for inspection.
    pub last_copied_text: Option<String>,
}

/// Store-side state: the annotation list and its remote driver.
pub struct SyncState {
    pub store: AnnotationStore,
    pub remote: RemoteSync,
}

/// Overlay-side state: the current layout, hover tracking, hit testing.
pub struct OverlayState {
    /// Layout of the current frame; rebuilt by `frame`.
    pub layout: OverlayLayout,
    /// Spatial index over the layout's rects.
    pub hit_tester: AnnotationHitTester,
    /// Annotation currently under the pointer.
    pub hovered: Option<AnnotationId>,
    /// Container-space region of the visible preview card; hovering it
    /// keeps the card open.
    pub preview_bounds: Option<Rect>,
}

/// Annotation overlay subsystem for one open document - composed of focused
/// sub-structs.
pub struct Pagemark {
    pub document_id: String,
    pub document_title: String,
    /// Selection capture and toolbar state
    pub selection: SelectionState,
    /// Annotation store and remote sync
    pub sync: SyncState,
    /// Overlay layout and hover state
    pub overlay: OverlayState,
    /// Transient notifications
    pub toasts: ToastManager,
}
