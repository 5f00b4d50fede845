//! Submission lifecycle and stored values.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::{ElementId, FormId, SubmissionId};
use crate::value::FieldValue;

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Visitor is still filling containers.
    InProgress,
    /// Completion was suspended by a gate or the double opt-in check.
    Interrupted,
    /// Terminal success. Values are immutable except for administrative edits.
    Completed,
    /// Visitor never came back; subject to external cleanup.
    Abandoned,
}

/// Which check suspended completion. Resumption re-runs exactly this check
/// plus the ones configured after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interruption {
    /// An access gate, identified by slug.
    Gate(String),
    /// The double opt-in confirmation mail.
    OptIn,
}

/// One visitor's answers to one form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub form_id: FormId,
    pub status: SubmissionStatus,
    /// Validated value per element, in element-id order.
    pub values: BTreeMap<ElementId, FieldValue>,
    /// Remote address captured at creation, used by duplicate prevention.
    pub remote_addr: Option<String>,
    /// Authenticated identity of the submitter, if any.
    pub submitter_identity: Option<String>,
    /// Client-computed device fingerprint, attached on resumption.
    pub fingerprint: Option<String>,
    /// Single-use double opt-in confirmation key.
    pub confirm_key: Option<String>,
    /// Set while status is `Interrupted`.
    pub interrupted_at: Option<Interruption>,
    /// Containers whose elements have all validated.
    pub containers_done: BTreeSet<usize>,
    /// Index of the container the visitor is currently on.
    pub current_container: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn new(id: SubmissionId, form_id: FormId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            form_id,
            status: SubmissionStatus::InProgress,
            values: BTreeMap::new(),
            remote_addr: None,
            submitter_identity: None,
            fingerprint: None,
            confirm_key: None,
            interrupted_at: None,
            containers_done: BTreeSet::new(),
            current_container: 0,
            created_at,
            completed_at: None,
        }
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.submitter_identity = Some(identity.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == SubmissionStatus::Completed
    }

    /// True once every container index in `0..container_count` validated.
    pub fn all_containers_done(&self, container_count: usize) -> bool {
        (0..container_count).all(|index| self.containers_done.contains(&index))
    }

    /// Record that one container's elements all validated and advance
    /// navigation to the next container.
    pub fn mark_container_done(&mut self, index: usize) {
        self.containers_done.insert(index);
        if index >= self.current_container {
            self.current_container = index + 1;
        }
    }

    /// Suspend completion at the given check.
    pub fn mark_interrupted(&mut self, at: Interruption) {
        self.status = SubmissionStatus::Interrupted;
        self.interrupted_at = Some(at);
    }

    /// Transition to `Completed`. Errors if already completed; the transition
    /// happens at most once.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) -> Result<(), ModelError> {
        if self.is_completed() {
            return Err(ModelError::AlreadyCompleted);
        }
        self.status = SubmissionStatus::Completed;
        self.interrupted_at = None;
        self.completed_at = Some(at);
        Ok(())
    }
}
