//! R-tree hit testing over the overlay's annotation rectangles.
//!
//! The overlay layer takes no pointer events itself; clicks and hovers are
//! dispatched by querying this index with the container-space pointer
//! position. Rebuilt together with the overlay layout, point queries are
//! O(log n) instead of a scan over every rect of every annotation.

use rstar::{AABB, RTree, RTreeObject};

use crate::types::{AnnotationId, Rect};

/// One annotation rectangle in the index. An annotation contributes one
/// entry per rect; `z` is the paint order, later entries render on top.
#[derive(Clone, Debug, PartialEq)]
pub struct RectEntry {
    pub annotation: AnnotationId,
    pub z: usize,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl RectEntry {
    fn new(annotation: AnnotationId, z: usize, rect: &Rect) -> Self {
        Self {
            annotation,
            z,
            min_x: rect.left,
            min_y: rect.top,
            max_x: rect.right(),
            max_y: rect.bottom(),
        }
    }

    #[inline]
    fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl RTreeObject for RectEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

/// Spatial index over the currently laid-out annotation rects.
///
/// The layout pass rebuilds it wholesale; there is no incremental update
/// because every geometry change invalidates every pixel rect anyway.
#[derive(Default)]
pub struct AnnotationHitTester {
    tree: RTree<RectEntry>,
    len: usize,
}

impl AnnotationHitTester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index contents with the given (annotation, rect) pairs,
    /// in paint order.
    pub fn rebuild<I>(&mut self, rects: I)
    where
        I: IntoIterator<Item = (AnnotationId, Rect)>,
    {
        let entries: Vec<RectEntry> = rects
            .into_iter()
            .enumerate()
            .map(|(z, (annotation, rect))| RectEntry::new(annotation, z, &rect))
            .collect();

        self.len = entries.len();
        self.tree = RTree::bulk_load(entries);
    }

    /// All annotations whose rects contain the point, bottom-most first.
    pub fn query_point(&self, x: f32, y: f32) -> Vec<AnnotationId> {
        let envelope = AABB::from_point([x, y]);

        let mut hits: Vec<&RectEntry> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .filter(|entry| entry.contains_point(x, y))
            .collect();
        hits.sort_by_key(|entry| entry.z);

        let mut ids: Vec<AnnotationId> = Vec::new();
        for entry in hits {
            if !ids.contains(&entry.annotation) {
                ids.push(entry.annotation.clone());
            }
        }
        ids
    }

    /// The top-most annotation under the point, if any.
    pub fn top_hit(&self, x: f32, y: f32) -> Option<AnnotationId> {
        self.query_point(x, y).pop()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.len = 0;
    }
}
