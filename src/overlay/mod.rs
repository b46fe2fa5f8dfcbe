//! Annotation overlay - layout and painting.
//!
//! Split into a pure layout stage (`layout`) computing positioned, styled
//! shapes from the annotation list and current geometry, and a paint stage
//! (`render`) turning a layout into gpui elements. All interactivity is
//! dispatched through hit testing; the painted layer takes no pointer
//! events itself.

pub mod layout;
pub mod render;

pub use layout::{
    OverlayLayout, OverlayShape, ShapeStyle, layout_overlay, note_preview_anchor, truncate_note,
};
