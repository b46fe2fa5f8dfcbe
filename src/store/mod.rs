//! Optimistic annotation store and its remote synchronization driver.

pub mod annotations;
pub mod sync;

pub use annotations::{AnnotationStore, MutationState, Resolution, StoreError};
pub use sync::{RemoteSync, SyncFailure, SyncOutcome, SyncReport};
