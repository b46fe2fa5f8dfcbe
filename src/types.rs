//! Core types for the annotation overlay subsystem.
//!
//! This module defines the fundamental data structures used throughout the
//! subsystem, including annotation records, the color palette, rectangle
//! geometry in its two coordinate spaces, and the ephemeral text selection.

use chrono::{DateTime, Utc};
use gpui::{Hsla, hsla};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::constants::HIGHLIGHT_FILL_OPACITY;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of an annotation record.
///
/// Locally created annotations carry a client-generated temporary id until
/// the remote store assigns a permanent one; the permanent id replaces the
/// temporary one in place, preserving list position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a temporary client-side id for an optimistic insert.
    pub fn temp() -> Self {
        Self(format!("tmp-{}", Uuid::new_v4().simple()))
    }

    /// Whether this id was generated locally and not yet replaced by the
    /// remote store.
    pub fn is_temp(&self) -> bool {
        self.0.starts_with("tmp-")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ============================================================================
// Annotation Kinds & Palette
// ============================================================================

/// Kind of an annotation. Determines the overlay rendering rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    #[default]
    Highlight,
    Underline,
    Strike,
    Note,
}

impl AnnotationKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnnotationKind::Highlight => "Highlight",
            AnnotationKind::Underline => "Underline",
            AnnotationKind::Strike => "Strike",
            AnnotationKind::Note => "Note",
        }
    }

    pub fn all() -> &'static [AnnotationKind] {
        &[
            AnnotationKind::Highlight,
            AnnotationKind::Underline,
            AnnotationKind::Strike,
            AnnotationKind::Note,
        ]
    }
}

/// Fixed highlight color palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    #[default]
    Yellow,
    Green,
    Blue,
    Pink,
    Red,
    Orange,
    Purple,
    Black,
}

impl HighlightColor {
    pub fn label(&self) -> &'static str {
        match self {
            HighlightColor::Yellow => "Yellow",
            HighlightColor::Green => "Green",
            HighlightColor::Blue => "Blue",
            HighlightColor::Pink => "Pink",
            HighlightColor::Red => "Red",
            HighlightColor::Orange => "Orange",
            HighlightColor::Purple => "Purple",
            HighlightColor::Black => "Black",
        }
    }

    pub fn all() -> &'static [HighlightColor] {
        &[
            HighlightColor::Yellow,
            HighlightColor::Green,
            HighlightColor::Blue,
            HighlightColor::Pink,
            HighlightColor::Red,
            HighlightColor::Orange,
            HighlightColor::Purple,
            HighlightColor::Black,
        ]
    }

    /// Solid accent color, used for underline rules, strike bands and badges.
    pub fn accent(&self) -> Hsla {
        match self {
            HighlightColor::Yellow => hsla(50.0 / 360.0, 0.9, 0.5, 1.0),
            HighlightColor::Green => hsla(130.0 / 360.0, 0.6, 0.45, 1.0),
            HighlightColor::Blue => hsla(210.0 / 360.0, 0.75, 0.5, 1.0),
            HighlightColor::Pink => hsla(330.0 / 360.0, 0.7, 0.6, 1.0),
            HighlightColor::Red => hsla(0.0, 0.75, 0.5, 1.0),
            HighlightColor::Orange => hsla(25.0 / 360.0, 0.85, 0.55, 1.0),
            HighlightColor::Purple => hsla(270.0 / 360.0, 0.6, 0.55, 1.0),
            HighlightColor::Black => hsla(0.0, 0.0, 0.1, 1.0),
        }
    }

    /// Translucent fill color for highlight-style rectangles.
    pub fn fill(&self) -> Hsla {
        let mut color = self.accent();
        color.a = HIGHLIGHT_FILL_OPACITY;
        color
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// An axis-aligned rectangle in pixel space.
///
/// Which pixel space (viewport or container-content) is a property of the
/// call site; the geometry mapper converts between them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// A rectangle expressed as fractions of a page's rendered size.
///
/// Annotations store their geometry in this form so they survive zoom and
/// container resizes; the overlay re-scales to pixels against the page's
/// current rect on every layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl NormRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

// ============================================================================
// Annotation Records
// ============================================================================

/// A persisted highlight/underline/strike/note record tied to a page and a
/// set of rectangles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    pub document_id: String,
    /// 1-based page the annotation belongs to.
    pub page_number: u32,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub color: HighlightColor,
    /// Ordered, non-empty for persisted records. One entry per visually
    /// wrapped line of the original selection.
    #[serde(with = "crate::api::rects_wire")]
    pub rects: Vec<NormRect>,
    /// Selected text captured at creation time. Immutable thereafter.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_content: Option<String>,
    /// Free-text annotation body.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Annotation {
    /// Build the optimistic local record for a draft, ahead of the remote
    /// store assigning a permanent id.
    pub fn from_draft(document_id: impl Into<String>, id: AnnotationId, draft: &AnnotationDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            document_id: document_id.into(),
            page_number: draft.page_number,
            kind: draft.kind,
            color: draft.color,
            rects: draft.rects.clone(),
            text_content: draft.text_content.clone(),
            note: draft.note.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the annotation carries a non-empty note body.
    pub fn has_note(&self) -> bool {
        matches!(&self.note, Some(note) if !note.trim().is_empty())
    }

    /// Note-kind annotations and any annotation with a non-empty note render
    /// the badge and hover preview.
    pub fn shows_badge(&self) -> bool {
        self.kind == AnnotationKind::Note || self.has_note()
    }
}

/// Body of a create call: everything but the server-assigned id and
/// timestamps.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDraft {
    pub page_number: u32,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    pub color: HighlightColor,
    #[serde(with = "crate::api::rects_wire")]
    pub rects: Vec<NormRect>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

/// Partial update body: only color and note are remotely mutable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub color: Option<HighlightColor>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

impl AnnotationPatch {
    pub fn color(color: HighlightColor) -> Self {
        Self {
            color: Some(color),
            note: None,
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            color: None,
            note: Some(note.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.note.is_none()
    }
}

// ============================================================================
// Ephemeral Selection
// ============================================================================

/// A captured text selection. Lives only between selection start and
/// commit/clear; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSelection {
    pub text: String,
    /// Viewport-space rectangles, one per wrapped line of the selection.
    pub rects: Vec<Rect>,
    pub page_number: u32,
}

impl TextSelection {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() || self.rects.is_empty()
    }
}
