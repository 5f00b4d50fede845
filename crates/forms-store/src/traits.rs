use serde_json::Value;

use forms_model::{FormId, Submission, SubmissionId};

use crate::error::StoreError;

/// Persistence collaborator consumed by the orchestrator and the
/// duplicate-prevention gates.
///
/// The pipeline is single-threaded and single-request (suspension points are
/// separate requests), so the trait is synchronous. Implementations must be
/// `Send + Sync` so one backend can serve many request threads.
///
/// The duplicate lookups are check-then-act: nothing here reserves a slot
/// atomically with completion, so two concurrent submissions from the same
/// client can both pass a duplicate check. That race is a documented property
/// of the engine, not something a backend should try to paper over.
pub trait SubmissionStore: Send + Sync {
    /// Persist the submission, inserting or overwriting by id.
    fn save(&self, submission: &Submission) -> Result<(), StoreError>;

    /// Fetch a submission by id.
    fn find(&self, id: SubmissionId) -> Result<Option<Submission>, StoreError>;

    /// Find the interrupted submission holding this double opt-in key, if any.
    fn find_by_confirm_key(&self, key: &str) -> Result<Option<Submission>, StoreError>;

    /// Whether a completed submission for `form` was sent from `remote_addr`.
    fn completed_exists_for_ip(&self, form: FormId, remote_addr: &str)
    -> Result<bool, StoreError>;

    /// Whether `identity` already has a completed submission for `form`.
    fn completed_exists_for_identity(
        &self,
        form: FormId,
        identity: &str,
    ) -> Result<bool, StoreError>;

    /// Whether a completed submission for `form` carries this fingerprint.
    fn completed_exists_for_fingerprint(
        &self,
        form: FormId,
        fingerprint: &str,
    ) -> Result<bool, StoreError>;

    /// Flat form-scoped configuration lookup. Gates and actions read their
    /// settings through this; absent keys are `None`.
    fn form_option(&self, form: FormId, key: &str) -> Result<Option<Value>, StoreError>;
}
