//! Subsystem-wide constants.
//!
//! Centralizes magic numbers and layout values to make the codebase
//! more maintainable and self-documenting.

use std::time::Duration;

// ============================================================================
// Selection Capture
// ============================================================================

/// Delay after pointer release before the selection is read, letting the
/// viewer's selection settle first
pub const SELECTION_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Page assumed when no page marker is found above the selection anchor
pub const FALLBACK_PAGE_NUMBER: u32 = 1;

// ============================================================================
// Overlay Rendering
// ============================================================================

/// Thickness of the rule drawn for underline annotations
pub const UNDERLINE_THICKNESS: f32 = 2.0;

/// Thickness of the band drawn for strike annotations
pub const STRIKE_THICKNESS: f32 = 2.0;

/// Diameter of the circular note badge
pub const NOTE_BADGE_DIAMETER: f32 = 14.0;

/// Opacity of annotation fill rectangles
pub const HIGHLIGHT_FILL_OPACITY: f32 = 0.35;

/// Opacity of the ephemeral selection boxes
pub const SELECTION_BOX_OPACITY: f32 = 0.22;

// ============================================================================
// Note Preview
// ============================================================================

/// Width of the hover note-preview card
pub const NOTE_PREVIEW_WIDTH: f32 = 240.0;

/// Gap between an annotation's first rect and the preview card
pub const NOTE_PREVIEW_GAP: f32 = 8.0;

/// Notes longer than this are truncated with an ellipsis in the preview
pub const NOTE_PREVIEW_MAX_CHARS: usize = 100;

/// Hover region height assumed for the preview card, so the card stays open
/// while the pointer moves onto it
pub const NOTE_PREVIEW_HOVER_HEIGHT: f32 = 96.0;

// ============================================================================
// Selection Toolbar
// ============================================================================

/// Height of the floating selection toolbar
pub const TOOLBAR_HEIGHT: f32 = 36.0;

/// Gap between the toolbar and the topmost selection rect
pub const TOOLBAR_GAP: f32 = 8.0;

/// Diameter of a palette color button
pub const COLOR_BUTTON_DIAMETER: f32 = 18.0;

// ============================================================================
// Drag Export
// ============================================================================

/// MIME-like key under which excerpt payloads travel on the drag channel
pub const EXCERPT_MIME: &str = "application/x-pagemark-excerpt";

/// Source type reported to drop targets for PDF excerpts
pub const EXCERPT_SOURCE_TYPE: &str = "pdf";

/// Excerpt text longer than this is truncated in the drag preview
pub const DRAG_PREVIEW_MAX_CHARS: usize = 80;

/// Width of the custom drag-preview card
pub const DRAG_PREVIEW_WIDTH: f32 = 220.0;

// ============================================================================
// Remote Sync
// ============================================================================

/// Worker threads used for remote annotation calls
pub const SYNC_WORKER_COUNT: usize = 2;

// ============================================================================
// UI Spacing Constants (for visual consistency)
// ============================================================================

/// Border radius - Small (buttons, badges)
pub const BORDER_RADIUS_SM: f32 = 4.0;
/// Border radius - Medium (cards, toolbar)
pub const BORDER_RADIUS_MD: f32 = 6.0;
/// Border radius - Large (preview card, note editor)
pub const BORDER_RADIUS_LG: f32 = 10.0;

/// Padding - Small
pub const PADDING_SM: f32 = 8.0;
/// Padding - Medium
pub const PADDING_MD: f32 = 12.0;

/// Gap spacing - Small
pub const GAP_SM: f32 = 4.0;
/// Gap spacing - Medium
pub const GAP_MD: f32 = 8.0;
