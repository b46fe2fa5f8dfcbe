//! Coordinate conversion utilities for the annotation overlay.
//!
//! This module provides centralized coordinate conversion functions to
//! eliminate duplicated formulas across capture, layout and hit-testing
//! code. All conversions between viewport space, container-content space
//! and page-fraction space go through here.

use crate::types::{NormRect, Rect};

/// Context needed to convert viewport coordinates into container-content
/// coordinates: the container's viewport-space bounding box and its current
/// scroll offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerContext {
    /// Bounding box of the scrollable viewer element, in viewport space.
    pub bounds: Rect,
    pub scroll_left: f32,
    pub scroll_top: f32,
}

impl ContainerContext {
    #[inline]
    pub fn new(bounds: Rect, scroll_left: f32, scroll_top: f32) -> Self {
        Self {
            bounds,
            scroll_left,
            scroll_top,
        }
    }
}

pub struct GeometryMapper;

impl GeometryMapper {
    /// Convert viewport-space rectangles into container-content space.
    ///
    /// Must be called fresh on every capture and every layout pass where
    /// container geometry could have changed (resize, scroll, zoom). Pure;
    /// no hidden state.
    #[inline]
    pub fn to_container_space(viewport_rects: &[Rect], ctx: &ContainerContext) -> Vec<Rect> {
        viewport_rects
            .iter()
            .map(|rect| Self::rect_to_container_space(rect, ctx))
            .collect()
    }

    /// Convert a single viewport-space rectangle into container-content space.
    #[inline]
    pub fn rect_to_container_space(rect: &Rect, ctx: &ContainerContext) -> Rect {
        Rect::new(
            rect.left - ctx.bounds.left + ctx.scroll_left,
            rect.top - ctx.bounds.top + ctx.scroll_top,
            rect.width,
            rect.height,
        )
    }

    /// Convert a viewport-space point into container-content space.
    #[inline]
    pub fn point_to_container_space(point: (f32, f32), ctx: &ContainerContext) -> (f32, f32) {
        (
            point.0 - ctx.bounds.left + ctx.scroll_left,
            point.1 - ctx.bounds.top + ctx.scroll_top,
        )
    }

    /// Normalize a container-space rectangle to fractions of its page's
    /// rendered rect. Stored annotations use this form so they survive zoom
    /// and container resizes.
    #[inline]
    pub fn normalize_to_page(rect: &Rect, page: &Rect) -> NormRect {
        NormRect::new(
            (rect.left - page.left) / page.width,
            (rect.top - page.top) / page.height,
            rect.width / page.width,
            rect.height / page.height,
        )
    }

    /// Re-scale a page-fraction rectangle to container-content pixels against
    /// the page's current rendered rect.
    #[inline]
    pub fn denormalize_from_page(rect: &NormRect, page: &Rect) -> Rect {
        Rect::new(
            page.left + rect.left * page.width,
            page.top + rect.top * page.height,
            rect.width * page.width,
            rect.height * page.height,
        )
    }
}
