//! Drag export - packaging selections for the canvas collaborator.
//!
//! A drop target outside the viewer (canvas, whiteboard) receives a typed
//! JSON payload under a fixed MIME-like key instead of raw drag data. The
//! export also describes a custom drag-preview card; the drag machinery
//! snapshots that element for the drag cursor and owns its lifetime.

use anyhow::Context as _;
use gpui::*;
use gpui_component::ActiveTheme as _;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BORDER_RADIUS_MD, DRAG_PREVIEW_MAX_CHARS, DRAG_PREVIEW_WIDTH, EXCERPT_MIME,
    EXCERPT_SOURCE_TYPE, PADDING_SM,
};
use crate::types::TextSelection;

/// Structured payload transferred to drop targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcerptPayload {
    pub source_type: String,
    pub source_id: String,
    pub source_title: String,
    pub page_number: u32,
    pub content: String,
}

impl ExcerptPayload {
    /// Payload for a live text selection.
    pub fn from_selection(
        document_id: impl Into<String>,
        document_title: impl Into<String>,
        selection: &TextSelection,
    ) -> Self {
        Self {
            source_type: EXCERPT_SOURCE_TYPE.to_string(),
            source_id: document_id.into(),
            source_title: document_title.into(),
            page_number: selection.page_number,
            content: selection.text.clone(),
        }
    }

    /// Payload for an externally supplied excerpt (e.g. a generated summary
    /// of a passage).
    pub fn from_excerpt(
        document_id: impl Into<String>,
        document_title: impl Into<String>,
        page_number: u32,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source_type: EXCERPT_SOURCE_TYPE.to_string(),
            source_id: document_id.into(),
            source_title: document_title.into(),
            page_number,
            content: content.into(),
        }
    }
}

/// Allowed drag effect. Excerpt drags never move or link, only copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEffect {
    Copy,
}

/// Content of the custom drag-image card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPreview {
    pub title: String,
    pub text: String,
}

/// Everything a drag-start handler needs to hand to the drag machinery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragExport {
    /// Fixed transfer key the drop target looks up.
    pub mime: &'static str,
    /// JSON-serialized `ExcerptPayload`.
    pub data: String,
    pub effect: DragEffect,
    pub preview: DragPreview,
}

/// Serialize a payload into a ready-to-transfer export.
pub fn export(payload: &ExcerptPayload) -> anyhow::Result<DragExport> {
    let data = serde_json::to_string(payload).context("serializing excerpt payload")?;
    Ok(DragExport {
        mime: EXCERPT_MIME,
        data,
        effect: DragEffect::Copy,
        preview: DragPreview {
            title: payload.source_title.clone(),
            text: truncate_preview(&payload.content),
        },
    })
}

fn truncate_preview(content: &str) -> String {
    if content.chars().count() <= DRAG_PREVIEW_MAX_CHARS {
        return content.to_string();
    }
    let mut clipped: String = content.chars().take(DRAG_PREVIEW_MAX_CHARS).collect();
    clipped.push('…');
    clipped
}

/// Render the drag-preview card. Fixed styling regardless of theme
/// accents; the drag cursor snapshot has no hover states.
pub fn render_drag_preview(preview: &DragPreview, cx: &App) -> impl IntoElement {
    div()
        .w(px(DRAG_PREVIEW_WIDTH))
        .p(px(PADDING_SM))
        .bg(cx.theme().muted)
        .border_1()
        .border_color(cx.theme().border)
        .rounded(px(BORDER_RADIUS_MD))
        .child(
            div()
                .text_xs()
                .text_color(cx.theme().muted_foreground)
                .child(preview.title.clone()),
        )
        .child(
            div()
                .text_sm()
                .text_color(cx.theme().foreground)
                .child(preview.text.clone()),
        )
}
