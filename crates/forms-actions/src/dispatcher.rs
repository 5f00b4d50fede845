//! Action dispatcher.
//!
//! Runs every enabled action in the form's configured order on the
//! completed-submission transition. Individual failures are logged and
//! aggregated; the dispatcher never short-circuits and never unwinds the
//! completed state.

use forms_model::{ActionOutcome, Form, RequestContext, Submission};
use forms_store::SubmissionStore;

use crate::action::{Action, ActionContext};
use crate::mailer::Mailer;

/// Result of one dispatch run.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Slugs of actions that ran, in execution order.
    pub executed: Vec<&'static str>,
    /// Aggregated failure messages, one per failed action.
    pub failures: Vec<String>,
    /// Redirect target claimed by the first redirect-capable action.
    pub redirect: Option<String>,
}

pub struct ActionDispatcher {
    actions: Vec<Box<dyn Action>>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register an action, replacing any previous registration of the slug.
    pub fn register(&mut self, action: Box<dyn Action>) {
        self.actions
            .retain(|existing| existing.slug() != action.slug());
        self.actions.push(action);
    }

    pub fn get(&self, slug: &str) -> Option<&dyn Action> {
        self.actions
            .iter()
            .find(|action| action.slug() == slug)
            .map(Box::as_ref)
    }

    /// Run every enabled action for a completed submission.
    pub fn dispatch(
        &self,
        form: &Form,
        submission: &Submission,
        request: &RequestContext,
        store: &dyn SubmissionStore,
        mailer: &dyn Mailer,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut ctx = ActionContext::new(request, store, mailer);

        for slug in &form.action_order {
            let Some(action) = self.get(slug) else {
                tracing::warn!(form_id = %form.id, slug, "unknown action slug, skipping");
                continue;
            };
            match action.is_enabled(form, store) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    report
                        .failures
                        .push(format!("{slug}: enablement check failed: {err}"));
                    continue;
                }
            }

            report.executed.push(action.slug());
            match action.handle(form, submission, &mut ctx) {
                ActionOutcome::Success => {}
                ActionOutcome::Failure { message } => {
                    tracing::warn!(
                        form_id = %form.id,
                        submission_id = %submission.id,
                        action = action.slug(),
                        %message,
                        "action failed"
                    );
                    report.failures.push(format!("{slug}: {message}"));
                }
            }
        }

        report.redirect = ctx.take_redirect();
        report
    }
}

impl Default for ActionDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
