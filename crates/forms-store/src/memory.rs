//! In-memory reference backend.
//!
//! Backs tests and embedded single-process deployments. Uses interior
//! mutability behind an `RwLock` so the store can be shared by reference.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use forms_model::{FormId, Submission, SubmissionId, SubmissionStatus};

use crate::error::StoreError;
use crate::traits::SubmissionStore;

#[derive(Default)]
struct Inner {
    submissions: BTreeMap<SubmissionId, Submission>,
    options: BTreeMap<(FormId, String), Value>,
}

/// Reference `SubmissionStore` keeping everything in process memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a form-scoped option value.
    pub fn set_form_option(&self, form: FormId, key: impl Into<String>, value: Value) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.options.insert((form, key.into()), value);
    }

    fn completed_matching<F>(&self, form: FormId, predicate: F) -> bool
    where
        F: Fn(&Submission) -> bool,
    {
        let inner = self.inner.read().expect("store lock poisoned");
        inner.submissions.values().any(|submission| {
            submission.form_id == form
                && submission.status == SubmissionStatus::Completed
                && predicate(submission)
        })
    }
}

impl SubmissionStore for MemoryStore {
    fn save(&self, submission: &Submission) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.submissions.insert(submission.id, submission.clone());
        Ok(())
    }

    fn find(&self, id: SubmissionId) -> Result<Option<Submission>, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.submissions.get(&id).cloned())
    }

    fn find_by_confirm_key(&self, key: &str) -> Result<Option<Submission>, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .submissions
            .values()
            .find(|submission| submission.confirm_key.as_deref() == Some(key))
            .cloned())
    }

    fn completed_exists_for_ip(
        &self,
        form: FormId,
        remote_addr: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.completed_matching(form, |submission| {
            submission.remote_addr.as_deref() == Some(remote_addr)
        }))
    }

    fn completed_exists_for_identity(
        &self,
        form: FormId,
        identity: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.completed_matching(form, |submission| {
            submission.submitter_identity.as_deref() == Some(identity)
        }))
    }

    fn completed_exists_for_fingerprint(
        &self,
        form: FormId,
        fingerprint: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.completed_matching(form, |submission| {
            submission.fingerprint.as_deref() == Some(fingerprint)
        }))
    }

    fn form_option(&self, form: FormId, key: &str) -> Result<Option<Value>, StoreError> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.options.get(&(form, key.to_string())).cloned())
    }
}
