//! Selection capture - turning raw viewer selections into `TextSelection`s.
//!
//! The capture listens for two viewer signals: the document-level
//! selection-changed signal and the container-level pointer-release signal.
//! Pointer releases are debounced briefly so the viewer's selection can
//! settle before it is read. Selections outside the container, collapsed
//! selections and whitespace-only selections are silent no-ops.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use tracing::trace;

use crate::constants::{FALLBACK_PAGE_NUMBER, SELECTION_SETTLE_DELAY};
use crate::types::TextSelection;
use crate::viewer::{ListenerId, ViewerAdapter, ViewerEvents, ViewerSignal};

/// Signal flags shared with the hub callbacks.
#[derive(Default)]
struct CaptureSignals {
    selection_changed: Cell<bool>,
    pointer_released: Cell<bool>,
}

/// Captures the viewer's active selection into at most one `TextSelection`.
///
/// Holds no state beyond its listener handles, the pointer-release settle
/// deadline and the current value. `destroy` must be called on unmount or
/// document switch; the listeners do not detach themselves.
pub struct SelectionCapture {
    signals: Rc<CaptureSignals>,
    listeners: Option<[ListenerId; 2]>,
    settle_deadline: Option<Instant>,
    current: Option<TextSelection>,
}

impl SelectionCapture {
    /// Register both listeners on the hub and return the capture.
    pub fn attach(events: &mut ViewerEvents) -> Self {
        let signals = Rc::new(CaptureSignals::default());

        let changed = Rc::clone(&signals);
        let selection_listener = events.subscribe(
            ViewerSignal::SelectionChanged,
            Box::new(move || changed.selection_changed.set(true)),
        );

        let released = Rc::clone(&signals);
        let pointer_listener = events.subscribe(
            ViewerSignal::PointerReleased,
            Box::new(move || released.pointer_released.set(true)),
        );

        Self {
            signals,
            listeners: Some([selection_listener, pointer_listener]),
            settle_deadline: None,
            current: None,
        }
    }

    /// Detach both listeners and drop any pending state. Required for
    /// correct unmount; a capture left attached keeps receiving signals
    /// across document switches.
    pub fn destroy(&mut self, events: &mut ViewerEvents) {
        if let Some(listeners) = self.listeners.take() {
            for id in listeners {
                events.unsubscribe(id);
            }
        }
        self.settle_deadline = None;
        self.current = None;
    }

    pub fn is_attached(&self) -> bool {
        self.listeners.is_some()
    }

    /// The currently captured selection, if any.
    pub fn current(&self) -> Option<&TextSelection> {
        self.current.as_ref()
    }

    /// Drop the current selection (after a commit, copy or dismiss).
    pub fn clear(&mut self) {
        self.current = None;
        self.settle_deadline = None;
    }

    /// Per-frame poll. Returns `Some(new_state)` when the captured selection
    /// changed, `None` otherwise.
    pub fn poll(&mut self, viewer: &dyn ViewerAdapter) -> Option<Option<TextSelection>> {
        if self.listeners.is_none() {
            return None;
        }

        let changed = self.signals.selection_changed.replace(false);
        if self.signals.pointer_released.replace(false) {
            self.settle_deadline = Some(Instant::now() + SELECTION_SETTLE_DELAY);
        }

        let settled = self
            .settle_deadline
            .is_some_and(|deadline| Instant::now() >= deadline);
        if settled {
            self.settle_deadline = None;
        }

        if !changed && !settled {
            return None;
        }

        let next = Self::read_selection(viewer);
        if next == self.current {
            return None;
        }

        trace!(
            captured = next.is_some(),
            page = next.as_ref().map(|s| s.page_number),
            "selection capture changed"
        );
        self.current = next.clone();
        Some(next)
    }

    /// Read and validate the viewer's active selection.
    fn read_selection(viewer: &dyn ViewerAdapter) -> Option<TextSelection> {
        let raw = viewer.active_selection()?;
        if raw.is_collapsed() {
            return None;
        }

        // Selections elsewhere in the application must not trigger the
        // toolbar: the anchor has to fall inside the viewer container.
        let container = viewer.container();
        if !container.bounds.contains(raw.anchor.0, raw.anchor.1) {
            return None;
        }

        let text = raw.text.trim();
        if text.is_empty() {
            return None;
        }

        let page_number = viewer
            .page_number_at(raw.anchor)
            .unwrap_or(FALLBACK_PAGE_NUMBER);

        Some(TextSelection {
            text: text.to_string(),
            rects: raw.rects,
            page_number,
        })
    }
}
