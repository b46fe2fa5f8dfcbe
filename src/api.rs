//! Remote annotation store boundary.
//!
//! The backend itself is out of scope; this module defines the contract the
//! subsystem consumes. Calls are blocking and run on the background
//! executor's worker threads, never on the UI thread.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Annotation, AnnotationDraft, AnnotationId, AnnotationPatch, NormRect};

/// Errors surfaced by the remote annotation store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure (timeout, connection refused, ...)
    #[error("network error: {0}")]
    Network(String),

    /// The annotation does not exist on the remote store
    #[error("annotation not found: {0}")]
    NotFound(String),

    /// The remote store rejected the request
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Result type alias for remote annotation calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Remote annotation API, scoped by document id.
///
/// Implementations must be callable from worker threads. The server assigns
/// permanent ids on create; update and delete acknowledge without a body.
pub trait AnnotationApi: Send + Sync {
    fn list(&self, document_id: &str) -> ApiResult<Vec<Annotation>>;

    fn create(&self, document_id: &str, draft: &AnnotationDraft) -> ApiResult<Annotation>;

    fn update(
        &self,
        document_id: &str,
        id: &AnnotationId,
        patch: &AnnotationPatch,
    ) -> ApiResult<()>;

    fn delete(&self, document_id: &str, id: &AnnotationId) -> ApiResult<()>;
}

// ============================================================================
// Wire Geometry
// ============================================================================

/// Rectangle shape used on the wire. Carries redundant `right`/`bottom`
/// edges for consumer convenience.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub right: f32,
    pub bottom: f32,
}

impl From<&NormRect> for SerializableRect {
    fn from(rect: &NormRect) -> Self {
        Self {
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
            right: rect.left + rect.width,
            bottom: rect.top + rect.height,
        }
    }
}

impl From<&SerializableRect> for NormRect {
    fn from(rect: &SerializableRect) -> Self {
        // The redundant edges are derived values; only the canonical four
        // are read back.
        NormRect::new(rect.left, rect.top, rect.width, rect.height)
    }
}

/// Serde adapter putting `Vec<NormRect>` on the wire as `SerializableRect`s.
pub mod rects_wire {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::SerializableRect;
    use crate::types::NormRect;

    pub fn serialize<S>(rects: &[NormRect], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire: Vec<SerializableRect> = rects.iter().map(SerializableRect::from).collect();
        wire.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NormRect>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = Vec::<SerializableRect>::deserialize(deserializer)?;
        Ok(wire.iter().map(NormRect::from).collect())
    }
}
