//! Paint stage of the annotation overlay.
//!
//! Shapes are painted straight to the GPU via `paint_quad`; only the note
//! preview card and the toast stack are element trees. The overlay canvas
//! must be mounted at the container's content origin so container-space
//! coordinates land where the text is.

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{ActiveTheme as _, h_flex, v_flex};

use crate::constants::{
    BORDER_RADIUS_MD, BORDER_RADIUS_LG, GAP_MD, NOTE_BADGE_DIAMETER, PADDING_MD, PADDING_SM,
    SELECTION_BOX_OPACITY, NOTE_PREVIEW_WIDTH,
};
use crate::notifications::{Toast, ToastVariant};
use crate::overlay::layout::{OverlayLayout, ShapeStyle, truncate_note};
use crate::profile_scope;

/// Tint used for the ephemeral selection boxes.
fn selection_tint() -> Hsla {
    hsla(210.0 / 360.0, 0.7, 0.55, SELECTION_BOX_OPACITY)
}

/// Render the overlay layer for one frame's layout.
pub fn render_annotation_overlay(layout: OverlayLayout) -> impl IntoElement {
    canvas(
        move |_bounds, _window, _cx| (),
        move |bounds, _data, window, _cx| paint_shapes(bounds, window, &layout),
    )
    .absolute()
    .size_full()
}

fn paint_shapes(bounds: Bounds<Pixels>, window: &mut Window, layout: &OverlayLayout) {
    profile_scope!("paint_overlay");

    let origin_x = f32::from(bounds.origin.x);
    let origin_y = f32::from(bounds.origin.y);

    for shape in &layout.shapes {
        let shape_bounds = Bounds {
            origin: point(
                px(origin_x + shape.bounds.left),
                px(origin_y + shape.bounds.top),
            ),
            size: size(px(shape.bounds.width), px(shape.bounds.height)),
        };

        match shape.style {
            ShapeStyle::SelectionBox => {
                window.paint_quad(quad(
                    shape_bounds,
                    px(2.0),
                    selection_tint(),
                    px(0.0),
                    transparent_black(),
                    Default::default(),
                ));
            }
            ShapeStyle::Fill(color) => {
                window.paint_quad(quad(
                    shape_bounds,
                    px(2.0),
                    color.fill(),
                    px(0.0),
                    transparent_black(),
                    Default::default(),
                ));
            }
            ShapeStyle::Underline(color) | ShapeStyle::Strike(color) => {
                window.paint_quad(quad(
                    shape_bounds,
                    px(0.0),
                    color.accent(),
                    px(0.0),
                    transparent_black(),
                    Default::default(),
                ));
            }
            ShapeStyle::NoteBadge(color) => {
                window.paint_quad(quad(
                    shape_bounds,
                    px(NOTE_BADGE_DIAMETER / 2.0),
                    color.accent(),
                    px(1.5),
                    hsla(0.0, 0.0, 1.0, 0.9),
                    Default::default(),
                ));
            }
        }
    }
}

/// Render the hover note-preview card at its container-space anchor.
pub fn render_note_preview(note: &str, anchor: (f32, f32), cx: &App) -> impl IntoElement {
    div()
        .absolute()
        .left(px(anchor.0))
        .top(px(anchor.1))
        .w(px(NOTE_PREVIEW_WIDTH))
        .p(px(PADDING_MD))
        .bg(cx.theme().muted)
        .border_1()
        .border_color(cx.theme().border)
        .rounded(px(BORDER_RADIUS_LG))
        .child(
            div()
                .text_sm()
                .text_color(cx.theme().foreground)
                .child(truncate_note(note)),
        )
}

/// Render the transient toast stack in the container's bottom-right corner.
pub fn render_toast_stack<V: 'static>(
    toasts: &[Toast],
    on_dismiss: impl Fn(&mut V, u64, &mut Window, &mut Context<V>) + 'static + Clone,
    cx: &mut Context<V>,
) -> impl IntoElement {
    let mut stack = v_flex()
        .absolute()
        .bottom(px(16.0))
        .right(px(16.0))
        .gap(px(GAP_MD));

    for toast in toasts {
        stack = stack.child(render_toast(toast, on_dismiss.clone(), cx));
    }
    stack
}

fn variant_color(variant: ToastVariant) -> Hsla {
    match variant {
        ToastVariant::Success => hsla(130.0 / 360.0, 0.6, 0.45, 1.0),
        ToastVariant::Info => hsla(210.0 / 360.0, 0.7, 0.5, 1.0),
        ToastVariant::Warning => hsla(40.0 / 360.0, 0.8, 0.5, 1.0),
        ToastVariant::Error => hsla(0.0, 0.7, 0.5, 1.0),
    }
}

fn render_toast<V: 'static>(
    toast: &Toast,
    on_dismiss: impl Fn(&mut V, u64, &mut Window, &mut Context<V>) + 'static,
    cx: &mut Context<V>,
) -> Stateful<Div> {
    let accent = variant_color(toast.variant);
    let id = toast.id;

    h_flex()
        .id(ElementId::Name(format!("toast-{}", toast.id).into()))
        .items_center()
        .gap(px(GAP_MD))
        .px(px(PADDING_MD))
        .py(px(PADDING_SM))
        .bg(cx.theme().muted)
        .border_1()
        .border_color(accent)
        .rounded(px(BORDER_RADIUS_MD))
        .opacity(toast.opacity(false))
        .cursor_pointer()
        .on_mouse_down(
            MouseButton::Left,
            cx.listener(move |this, _, window, cx| on_dismiss(this, id, window, cx)),
        )
        .child(
            div()
                .text_sm()
                .text_color(accent)
                .child(toast.variant.icon()),
        )
        .child(
            div()
                .text_sm()
                .text_color(cx.theme().foreground)
                .child(toast.message.clone()),
        )
        .when_some(toast.action, |this, action| {
            this.child(
                div()
                    .text_sm()
                    .text_color(accent)
                    .child(action.label),
            )
        })
}
