//! Optimistic annotation store - a mutation state machine over the ordered
//! annotation list.
//!
//! Every mutation is applied to the in-memory list immediately and recorded
//! as an explicit pending state carrying its rollback snapshot; resolutions
//! from the remote store are fed back through the `resolve_*` reducer, which
//! either commits or rolls back. Rollback is a property of the state
//! machine, not call-site array surgery.
//!
//! ## State Transitions
//!
//! ```text
//! (absent)        -> PendingCreate   (begin_create: temp entry inserted)
//! PendingCreate   -> committed       (resolve_create Ok: temp id replaced in place)
//! PendingCreate   -> removed         (resolve_create Err: temp entry removed)
//!
//! idle            -> PendingUpdate   (begin_update: patch applied, snapshot taken)
//! PendingUpdate   -> committed       (resolve_update Ok)
//! PendingUpdate   -> rolled back     (resolve_update Err: snapshot restored in place)
//!
//! idle            -> PendingDelete   (begin_delete: entry removed, snapshot + index kept)
//! PendingDelete   -> removed         (resolve_delete Ok)
//! PendingDelete   -> restored        (resolve_delete Err: snapshot re-inserted at index)
//! ```
//!
//! Resolutions carry the sequence number issued by the matching `begin_*`;
//! anything else is stale and discarded, so a late response can never
//! overwrite newer optimistic state.

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use tracing::{trace, warn};

use crate::api::ApiError;
use crate::types::{Annotation, AnnotationDraft, AnnotationId, AnnotationPatch};

/// Errors returned by `begin_*` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A mutation for this id has not resolved yet; the UI disables the
    /// relevant menu while pending, this is the backstop.
    #[error("a mutation for annotation {0} is already in flight")]
    MutationInFlight(AnnotationId),

    #[error("unknown annotation: {0}")]
    UnknownAnnotation(AnnotationId),

    /// Persisted annotations always carry at least one rectangle.
    #[error("an annotation needs at least one rectangle")]
    EmptyRects,
}

/// Pending mutation for a single annotation id.
#[derive(Clone, Debug)]
pub enum MutationState {
    PendingCreate {
        seq: u64,
    },
    PendingUpdate {
        seq: u64,
        snapshot: Annotation,
    },
    PendingDelete {
        seq: u64,
        snapshot: Annotation,
        index: usize,
    },
}

impl MutationState {
    fn seq(&self) -> u64 {
        match self {
            MutationState::PendingCreate { seq }
            | MutationState::PendingUpdate { seq, .. }
            | MutationState::PendingDelete { seq, .. } => *seq,
        }
    }
}

/// What a `resolve_*` call did to the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The optimistic state was confirmed.
    Committed,
    /// The optimistic state was undone.
    RolledBack,
    /// The resolution did not match the latest pending mutation and was
    /// discarded.
    Stale,
}

/// In-memory ordered annotation list for one document, with optimistic
/// create/update/delete.
pub struct AnnotationStore {
    document_id: String,
    annotations: Vec<Annotation>,
    in_flight: HashMap<AnnotationId, MutationState>,
    next_seq: u64,
}

impl AnnotationStore {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            annotations: Vec::new(),
            in_flight: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|annotation| &annotation.id == id)
    }

    /// Annotations belonging to the given 1-based page, in list order.
    pub fn for_page(&self, page_number: u32) -> impl Iterator<Item = &Annotation> {
        self.annotations
            .iter()
            .filter(move |annotation| annotation.page_number == page_number)
    }

    /// Whether a mutation for this id is currently in flight.
    pub fn is_pending(&self, id: &AnnotationId) -> bool {
        self.in_flight.contains_key(id)
    }

    /// Install the result of the initial remote list load.
    pub fn replace_all(&mut self, annotations: Vec<Annotation>) {
        trace!(count = annotations.len(), "installing remote annotation list");
        self.annotations = annotations;
        self.in_flight.clear();
    }

    // ==================== Create ====================

    /// Insert the optimistic entry for a draft under a temporary id.
    pub fn begin_create(&mut self, draft: &AnnotationDraft) -> Result<(AnnotationId, u64), StoreError> {
        if draft.rects.is_empty() {
            return Err(StoreError::EmptyRects);
        }

        let temp_id = AnnotationId::temp();
        let seq = self.bump_seq();
        let annotation = Annotation::from_draft(&self.document_id, temp_id.clone(), draft);

        trace!(id = %temp_id, seq, "optimistic create");
        self.annotations.push(annotation);
        self.in_flight
            .insert(temp_id.clone(), MutationState::PendingCreate { seq });
        Ok((temp_id, seq))
    }

    /// Reconcile a create. On success the server entity replaces the temp
    /// entry in place, but the locally computed rects are kept - the remote
    /// store is not assumed to echo geometry back. On failure the temp entry
    /// is removed entirely.
    pub fn resolve_create(
        &mut self,
        temp_id: &AnnotationId,
        seq: u64,
        result: Result<Annotation, ApiError>,
    ) -> Resolution {
        if !self.take_pending(temp_id, seq, |state| {
            matches!(state, MutationState::PendingCreate { .. })
        }) {
            return Resolution::Stale;
        }

        let Some(position) = self.position(temp_id) else {
            warn!(id = %temp_id, "pending create without a list entry");
            return Resolution::Stale;
        };

        match result {
            Ok(mut committed) => {
                committed.rects = self.annotations[position].rects.clone();
                trace!(temp = %temp_id, id = %committed.id, "create committed");
                self.annotations[position] = committed;
                Resolution::Committed
            }
            Err(error) => {
                warn!(id = %temp_id, %error, "create failed; removing temp entry");
                self.annotations.remove(position);
                Resolution::RolledBack
            }
        }
    }

    // ==================== Update ====================

    /// Apply a patch optimistically, snapshotting the previous value.
    pub fn begin_update(
        &mut self,
        id: &AnnotationId,
        patch: &AnnotationPatch,
    ) -> Result<u64, StoreError> {
        if self.is_pending(id) {
            return Err(StoreError::MutationInFlight(id.clone()));
        }
        let Some(position) = self.position(id) else {
            return Err(StoreError::UnknownAnnotation(id.clone()));
        };

        let seq = self.bump_seq();
        let snapshot = self.annotations[position].clone();

        let annotation = &mut self.annotations[position];
        if let Some(color) = patch.color {
            annotation.color = color;
        }
        if let Some(note) = &patch.note {
            annotation.note = Some(note.clone());
        }
        annotation.updated_at = Utc::now();

        trace!(id = %id, seq, "optimistic update");
        self.in_flight
            .insert(id.clone(), MutationState::PendingUpdate { seq, snapshot });
        Ok(seq)
    }

    /// Reconcile an update; on failure the snapshot is restored at the same
    /// list position.
    pub fn resolve_update(
        &mut self,
        id: &AnnotationId,
        seq: u64,
        result: Result<(), ApiError>,
    ) -> Resolution {
        let Some(MutationState::PendingUpdate { snapshot, .. }) =
            self.take_pending_state(id, seq, |state| {
                matches!(state, MutationState::PendingUpdate { .. })
            })
        else {
            return Resolution::Stale;
        };

        match result {
            Ok(()) => Resolution::Committed,
            Err(error) => {
                warn!(id = %id, %error, "update failed; restoring snapshot");
                if let Some(position) = self.position(id) {
                    self.annotations[position] = snapshot;
                    Resolution::RolledBack
                } else {
                    warn!(id = %id, "pending update without a list entry");
                    Resolution::Stale
                }
            }
        }
    }

    // ==================== Delete ====================

    /// Remove the entry optimistically, keeping the value and its index for
    /// a potential restore.
    pub fn begin_delete(&mut self, id: &AnnotationId) -> Result<u64, StoreError> {
        if self.is_pending(id) {
            return Err(StoreError::MutationInFlight(id.clone()));
        }
        let Some(position) = self.position(id) else {
            return Err(StoreError::UnknownAnnotation(id.clone()));
        };

        let seq = self.bump_seq();
        let snapshot = self.annotations.remove(position);

        trace!(id = %id, seq, index = position, "optimistic delete");
        self.in_flight.insert(
            id.clone(),
            MutationState::PendingDelete {
                seq,
                snapshot,
                index: position,
            },
        );
        Ok(seq)
    }

    /// Reconcile a delete; on failure the entry reappears at its original
    /// index.
    pub fn resolve_delete(
        &mut self,
        id: &AnnotationId,
        seq: u64,
        result: Result<(), ApiError>,
    ) -> Resolution {
        let Some(MutationState::PendingDelete {
            snapshot, index, ..
        }) = self.take_pending_state(id, seq, |state| {
            matches!(state, MutationState::PendingDelete { .. })
        })
        else {
            return Resolution::Stale;
        };

        match result {
            Ok(()) => Resolution::Committed,
            Err(error) => {
                warn!(id = %id, %error, "delete failed; restoring entry");
                let position = index.min(self.annotations.len());
                self.annotations.insert(position, snapshot);
                Resolution::RolledBack
            }
        }
    }

    // ==================== Internals ====================

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn position(&self, id: &AnnotationId) -> Option<usize> {
        self.annotations
            .iter()
            .position(|annotation| &annotation.id == id)
    }

    /// Remove the pending state for `id` when it matches both the expected
    /// shape and sequence number. Returns whether it matched.
    fn take_pending(
        &mut self,
        id: &AnnotationId,
        seq: u64,
        expected: impl Fn(&MutationState) -> bool,
    ) -> bool {
        self.take_pending_state(id, seq, expected).is_some()
    }

    fn take_pending_state(
        &mut self,
        id: &AnnotationId,
        seq: u64,
        expected: impl Fn(&MutationState) -> bool,
    ) -> Option<MutationState> {
        match self.in_flight.get(id) {
            Some(state) if expected(state) && state.seq() == seq => self.in_flight.remove(id),
            Some(state) => {
                trace!(id = %id, got = seq, latest = state.seq(), "stale resolution discarded");
                None
            }
            None => {
                trace!(id = %id, seq, "resolution for unknown mutation discarded");
                None
            }
        }
    }
}
