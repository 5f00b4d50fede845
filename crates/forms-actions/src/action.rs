//! The action contract.

use forms_model::{ActionOutcome, Form, RequestContext, Submission};
use forms_store::{StoreError, SubmissionStore};

use crate::mailer::Mailer;

/// What an action may use while handling a completed submission. The
/// redirect slot is first-writer-wins; later writers are ignored.
pub struct ActionContext<'a> {
    pub request: &'a RequestContext,
    pub store: &'a dyn SubmissionStore,
    pub mailer: &'a dyn Mailer,
    redirect: Option<String>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        request: &'a RequestContext,
        store: &'a dyn SubmissionStore,
        mailer: &'a dyn Mailer,
    ) -> Self {
        Self {
            request,
            store,
            mailer,
            redirect: None,
        }
    }

    /// Claim the post-completion redirect. The first action (in the form's
    /// configured order) to set it is authoritative.
    pub fn set_redirect(&mut self, target: impl Into<String>) {
        let target = target.into();
        if let Some(existing) = &self.redirect {
            tracing::debug!(existing, ignored = target, "redirect already claimed");
            return;
        }
        self.redirect = Some(target);
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn take_redirect(self) -> Option<String> {
        self.redirect
    }
}

/// One post-completion side effect.
///
/// Actions run only after the submission completed; a failure is logged and
/// aggregated, never rolled back into the submission's state.
pub trait Action: Send + Sync {
    /// Stable slug this action is referenced by in a form's action order.
    fn slug(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        "Post-completion action"
    }

    /// Whether the action is active for this form. Listing a slug in the
    /// form's action order enables it unless the `action_<slug>` option is
    /// explicitly false.
    fn is_enabled(&self, form: &Form, store: &dyn SubmissionStore) -> Result<bool, StoreError> {
        let key = format!("action_{}", self.slug());
        Ok(store
            .form_option(form.id, &key)?
            .and_then(|value| value.as_bool())
            .unwrap_or(true))
    }

    /// Perform the side effect. Must not panic; failures are values.
    fn handle(
        &self,
        form: &Form,
        submission: &Submission,
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome;
}
