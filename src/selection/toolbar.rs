//! Floating selection toolbar and the note entry editor.
//!
//! The toolbar anchors above the current selection: horizontally centered on
//! the union of the first and last selection rects, vertically above the
//! topmost rect. Committing a color, saving a note, copying or dismissing
//! all clear the active selection.

use gpui::*;
use gpui_component::input::{Input, InputState};
use gpui_component::{ActiveTheme as _, h_flex, v_flex};

use crate::constants::{
    BORDER_RADIUS_MD, BORDER_RADIUS_LG, COLOR_BUTTON_DIAMETER, GAP_SM, NOTE_PREVIEW_WIDTH,
    PADDING_SM, TOOLBAR_GAP, TOOLBAR_HEIGHT,
};
use crate::types::{AnnotationId, HighlightColor, Rect};

/// What the user picked on the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Commit a highlight annotation in the given palette color.
    Highlight(HighlightColor),
    /// Open the note entry flow.
    AddNote,
    /// Copy the selected text to the clipboard and clear the selection.
    Copy,
    /// Drop the selection without committing anything.
    Dismiss,
}

/// Container-space anchor the toolbar hangs from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolbarAnchor {
    pub center_x: f32,
    pub top: f32,
}

/// Compute the toolbar anchor for a selection's container-space rects.
pub fn toolbar_anchor(rects: &[Rect]) -> Option<ToolbarAnchor> {
    let first = rects.first()?;
    let last = rects.last()?;

    let span = first.union(last);
    let topmost = rects
        .iter()
        .map(|rect| rect.top)
        .fold(f32::INFINITY, f32::min);

    Some(ToolbarAnchor {
        center_x: span.left + span.width / 2.0,
        top: topmost - TOOLBAR_HEIGHT - TOOLBAR_GAP,
    })
}

/// Width the toolbar renders at, derived from its button row.
pub fn toolbar_width() -> f32 {
    let palette = HighlightColor::all().len() as f32;
    let colors = palette * COLOR_BUTTON_DIAMETER + (palette - 1.0) * GAP_SM;
    let divider = 1.0 + 2.0 * GAP_SM;
    let glyph_buttons = 3.0 * 24.0 + 2.0 * GAP_SM;
    colors + divider + glyph_buttons + 2.0 * PADDING_SM
}

/// Render the floating toolbar at its anchor.
pub fn render_selection_toolbar<V, F>(
    anchor: ToolbarAnchor,
    on_action: F,
    cx: &mut Context<V>,
) -> Stateful<Div>
where
    V: 'static,
    F: Fn(&mut V, ToolbarAction, &mut Window, &mut Context<V>) + 'static + Clone,
{
    let border_color = cx.theme().border;
    let background = cx.theme().muted;

    let mut toolbar = h_flex()
        .id("selection-toolbar")
        .absolute()
        .left(px(anchor.center_x - toolbar_width() / 2.0))
        .top(px(anchor.top))
        .h(px(TOOLBAR_HEIGHT))
        .items_center()
        .px(px(PADDING_SM))
        .gap(px(GAP_SM))
        .bg(background)
        .border_1()
        .border_color(border_color)
        .rounded(px(BORDER_RADIUS_MD));

    for &color in HighlightColor::all() {
        let on_action = on_action.clone();
        toolbar = toolbar.child(
            div()
                .id(ElementId::Name(format!("toolbar-color-{}", color.label()).into()))
                .w(px(COLOR_BUTTON_DIAMETER))
                .h(px(COLOR_BUTTON_DIAMETER))
                .rounded_full()
                .bg(color.accent())
                .cursor_pointer()
                .hover(|style| style.border_2().border_color(gpui::white()))
                .on_click(cx.listener(move |this, _, window, cx| {
                    on_action(this, ToolbarAction::Highlight(color), window, cx);
                })),
        );
    }

    toolbar = toolbar.child(div().w(px(1.0)).h(px(20.0)).mx(px(GAP_SM)).bg(border_color));

    for (glyph, action) in [
        ("✎", ToolbarAction::AddNote),
        ("⧉", ToolbarAction::Copy),
        ("✕", ToolbarAction::Dismiss),
    ] {
        toolbar = toolbar.child(render_glyph_button(glyph, action, on_action.clone(), cx));
    }

    toolbar
}

fn render_glyph_button<V, F>(
    glyph: &'static str,
    action: ToolbarAction,
    on_action: F,
    cx: &mut Context<V>,
) -> Stateful<Div>
where
    V: 'static,
    F: Fn(&mut V, ToolbarAction, &mut Window, &mut Context<V>) + 'static,
{
    let foreground = cx.theme().muted_foreground;
    let hover_bg = cx.theme().border;

    div()
        .id(ElementId::Name(format!("toolbar-{glyph}").into()))
        .w(px(24.0))
        .h(px(24.0))
        .rounded(px(BORDER_RADIUS_MD))
        .cursor_pointer()
        .flex()
        .items_center()
        .justify_center()
        .hover(move |style| style.bg(hover_bg))
        .child(div().text_sm().text_color(foreground).child(glyph))
        .on_click(cx.listener(move |this, _, window, cx| {
            on_action(this, action, window, cx);
        }))
}

// ============================================================================
// Note Editor
// ============================================================================

/// What a saved note applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteTarget {
    /// Commit a new note-kind annotation from the live selection.
    Selection,
    /// Edit the note of an existing annotation.
    Existing(AnnotationId),
}

/// State of the open note entry flow.
pub struct NoteEditorState {
    pub target: NoteTarget,
    pub input: Entity<InputState>,
}

impl NoteEditorState {
    pub fn new(target: NoteTarget, window: &mut Window, cx: &mut App) -> Self {
        let input = cx.new(|cx| InputState::new(window, cx).placeholder("Add a note..."));
        input.update(cx, |state, cx| {
            state.focus(window, cx);
        });
        Self { target, input }
    }

    pub fn text(&self, cx: &App) -> String {
        self.input.read(cx).text().to_string()
    }
}

/// Render the note editor card in place of the toolbar.
pub fn render_note_editor<V, S, C>(
    state: &NoteEditorState,
    anchor: ToolbarAnchor,
    on_save: S,
    on_cancel: C,
    cx: &mut Context<V>,
) -> Stateful<Div>
where
    V: 'static,
    S: Fn(&mut V, &mut Window, &mut Context<V>) + 'static,
    C: Fn(&mut V, &mut Window, &mut Context<V>) + 'static,
{
    let border_color = cx.theme().border;
    let background = cx.theme().muted;
    let foreground = cx.theme().foreground;
    let accent = cx.theme().primary;

    v_flex()
        .id("note-editor")
        .absolute()
        .left(px(anchor.center_x - NOTE_PREVIEW_WIDTH / 2.0))
        .top(px(anchor.top))
        .w(px(NOTE_PREVIEW_WIDTH))
        .p(px(PADDING_SM))
        .gap(px(GAP_SM))
        .bg(background)
        .border_1()
        .border_color(border_color)
        .rounded(px(BORDER_RADIUS_LG))
        .child(
            div()
                .w_full()
                .h(px(72.0))
                .child(Input::new(&state.input).appearance(false).size_full()),
        )
        .child(
            h_flex()
                .justify_end()
                .gap(px(GAP_SM))
                .child(
                    div()
                        .id("note-cancel")
                        .px(px(PADDING_SM))
                        .py(px(2.0))
                        .rounded(px(BORDER_RADIUS_MD))
                        .cursor_pointer()
                        .child(div().text_sm().text_color(foreground).child("Cancel"))
                        .on_click(cx.listener(move |this, _, window, cx| {
                            on_cancel(this, window, cx);
                        })),
                )
                .child(
                    div()
                        .id("note-save")
                        .px(px(PADDING_SM))
                        .py(px(2.0))
                        .rounded(px(BORDER_RADIUS_MD))
                        .bg(accent)
                        .cursor_pointer()
                        .child(
                            div()
                                .text_sm()
                                .text_color(cx.theme().primary_foreground)
                                .child("Save"),
                        )
                        .on_click(cx.listener(move |this, _, window, cx| {
                            on_save(this, window, cx);
                        })),
                ),
        )
}
