//! Remote synchronization driver for the annotation store.
//!
//! Mutations are applied to the store first (zero-latency UI) and the
//! matching remote call runs on the background executor. Outcomes are queued
//! by the completion callbacks and drained into the store's `resolve_*`
//! reducer by `process`, which the host calls once per frame on the UI
//! thread. Failures come back as `SyncFailure`s for the toast layer.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::api::{AnnotationApi, ApiError, ApiResult};
use crate::background::BackgroundExecutor;
use crate::store::annotations::{AnnotationStore, Resolution, StoreError};
use crate::types::{Annotation, AnnotationDraft, AnnotationId, AnnotationPatch};

/// Completed remote call, queued until the next `process` drain.
pub enum SyncOutcome {
    Loaded {
        result: ApiResult<Vec<Annotation>>,
    },
    Created {
        temp_id: AnnotationId,
        seq: u64,
        result: ApiResult<Annotation>,
    },
    Updated {
        id: AnnotationId,
        seq: u64,
        result: ApiResult<()>,
    },
    Deleted {
        id: AnnotationId,
        seq: u64,
        result: ApiResult<()>,
    },
}

/// A remote failure that rolled back an optimistic change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncFailure {
    pub operation: &'static str,
    pub error: ApiError,
}

impl SyncFailure {
    /// User-facing message for the error toast.
    pub fn message(&self) -> String {
        format!("Couldn't {} annotation: {}", self.operation, self.error)
    }
}

/// What a `process` drain did.
#[derive(Default)]
pub struct SyncReport {
    /// Whether any outcome touched the store (commit or rollback).
    pub changed: bool,
    /// Failures that rolled back optimistic state.
    pub failures: Vec<SyncFailure>,
}

/// Drives the remote `AnnotationApi` without ever blocking the UI thread.
pub struct RemoteSync {
    api: Arc<dyn AnnotationApi>,
    executor: BackgroundExecutor,
    outcomes: Arc<Mutex<Vec<SyncOutcome>>>,
}

impl RemoteSync {
    pub fn new(api: Arc<dyn AnnotationApi>) -> Self {
        Self::with_executor(api, BackgroundExecutor::with_default_workers())
    }

    pub fn with_executor(api: Arc<dyn AnnotationApi>, executor: BackgroundExecutor) -> Self {
        Self {
            api,
            executor,
            outcomes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Whether any remote call has not been drained yet.
    pub fn has_pending(&self) -> bool {
        self.executor.has_pending() || !self.outcomes.lock().is_empty()
    }

    /// Fetch the document's annotation list; the result replaces the store
    /// contents on the next `process`.
    pub fn load(&self, document_id: &str) {
        let api = Arc::clone(&self.api);
        let outcomes = Arc::clone(&self.outcomes);
        let document_id = document_id.to_string();
        self.executor.spawn(
            "annotation_list",
            move || Ok(api.list(&document_id)),
            move |result| {
                let result = flatten(result);
                outcomes.lock().push(SyncOutcome::Loaded { result });
            },
        );
    }

    /// Optimistically insert the draft and fire the remote create.
    pub fn create(
        &self,
        store: &mut AnnotationStore,
        draft: AnnotationDraft,
    ) -> Result<AnnotationId, StoreError> {
        let (temp_id, seq) = store.begin_create(&draft)?;

        let api = Arc::clone(&self.api);
        let outcomes = Arc::clone(&self.outcomes);
        let document_id = store.document_id().to_string();
        let id = temp_id.clone();
        self.executor.spawn(
            "annotation_create",
            move || Ok(api.create(&document_id, &draft)),
            move |result| {
                let result = flatten(result);
                outcomes.lock().push(SyncOutcome::Created {
                    temp_id: id,
                    seq,
                    result,
                });
            },
        );
        Ok(temp_id)
    }

    /// Optimistically apply the patch and fire the remote update.
    pub fn update(
        &self,
        store: &mut AnnotationStore,
        id: &AnnotationId,
        patch: AnnotationPatch,
    ) -> Result<(), StoreError> {
        let seq = store.begin_update(id, &patch)?;

        let api = Arc::clone(&self.api);
        let outcomes = Arc::clone(&self.outcomes);
        let document_id = store.document_id().to_string();
        let id = id.clone();
        let task_id = id.clone();
        self.executor.spawn(
            "annotation_update",
            move || Ok(api.update(&document_id, &task_id, &patch)),
            move |result| {
                let result = flatten(result);
                outcomes.lock().push(SyncOutcome::Updated { id, seq, result });
            },
        );
        Ok(())
    }

    /// Optimistically remove the entry and fire the remote delete.
    pub fn delete(
        &self,
        store: &mut AnnotationStore,
        id: &AnnotationId,
    ) -> Result<(), StoreError> {
        let seq = store.begin_delete(id)?;

        let api = Arc::clone(&self.api);
        let outcomes = Arc::clone(&self.outcomes);
        let document_id = store.document_id().to_string();
        let id = id.clone();
        let task_id = id.clone();
        self.executor.spawn(
            "annotation_delete",
            move || Ok(api.delete(&document_id, &task_id)),
            move |result| {
                let result = flatten(result);
                outcomes.lock().push(SyncOutcome::Deleted { id, seq, result });
            },
        );
        Ok(())
    }

    /// Drain completed calls into the store. Returns what changed and the
    /// failures that rolled back optimistic state, for the toast layer.
    pub fn process(&self, store: &mut AnnotationStore) -> SyncReport {
        self.executor.process_results();

        let outcomes = std::mem::take(&mut *self.outcomes.lock());
        let mut report = SyncReport::default();

        for outcome in outcomes {
            match outcome {
                SyncOutcome::Loaded { result } => match result {
                    Ok(annotations) => {
                        debug!(count = annotations.len(), "annotation list loaded");
                        store.replace_all(annotations);
                        report.changed = true;
                    }
                    Err(error) => report.failures.push(SyncFailure {
                        operation: "load",
                        error,
                    }),
                },
                SyncOutcome::Created {
                    temp_id,
                    seq,
                    result,
                } => {
                    let error = result.as_ref().err().cloned();
                    let resolution = store.resolve_create(&temp_id, seq, result);
                    report.changed |= resolution != Resolution::Stale;
                    if let (Resolution::RolledBack, Some(error)) = (resolution, error) {
                        report.failures.push(SyncFailure {
                            operation: "create",
                            error,
                        });
                    }
                }
                SyncOutcome::Updated { id, seq, result } => {
                    let error = result.as_ref().err().cloned();
                    let resolution = store.resolve_update(&id, seq, result);
                    report.changed |= resolution != Resolution::Stale;
                    if let (Resolution::RolledBack, Some(error)) = (resolution, error) {
                        report.failures.push(SyncFailure {
                            operation: "update",
                            error,
                        });
                    }
                }
                SyncOutcome::Deleted { id, seq, result } => {
                    let error = result.as_ref().err().cloned();
                    let resolution = store.resolve_delete(&id, seq, result);
                    report.changed |= resolution != Resolution::Stale;
                    if let (Resolution::RolledBack, Some(error)) = (resolution, error) {
                        report.failures.push(SyncFailure {
                            operation: "delete",
                            error,
                        });
                    }
                }
            }
        }

        report
    }
}

/// Collapse the executor's transport-level error into the API error space.
fn flatten<T>(result: Result<ApiResult<T>, String>) -> ApiResult<T> {
    match result {
        Ok(inner) => inner,
        Err(message) => Err(ApiError::Network(message)),
    }
}
