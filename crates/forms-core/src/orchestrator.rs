//! Completion orchestrator.
//!
//! Drives a submission through its lifecycle: per-container validation while
//! collecting, the configured gate sequence, the double opt-in interrupt,
//! the completed transition, and post-completion action dispatch. Suspension
//! points (fingerprint computation, opt-in confirmation) are separate
//! requests; the resumption entry points re-enter the sequence without
//! re-running what already passed.

use std::collections::BTreeMap;

use thiserror::Error;

use forms_actions::{ActionDispatcher, Mailer};
use forms_elements::ElementTypeRegistry;
use forms_gates::{GateContext, GateError, GateRegistry};
use forms_model::{
    CookieDirective, ElementId, Form, GateOutcome, InterruptPayload, Interruption, ModelError,
    RawValue, RequestContext, ResponseDirectives, Submission, ValidationError,
};
use forms_store::{StoreError, SubmissionStore};
use forms_tags::{TagArg, TagArgKind, TagHandler};

use crate::keys;
use crate::value_store::ValueStore;

#[derive(Debug, Error)]
pub enum CompleteError {
    /// The submission already completed; the call had no side effects.
    #[error("submission is already completed")]
    AlreadyCompleted,
    /// Completion requires every container validated first.
    #[error("submission has unvalidated containers")]
    NotValidated,
    /// The submission is not suspended at the check this entry point resumes.
    #[error("submission is not awaiting this resumption")]
    NotInterrupted,
    /// Double opt-in key did not match the stored single-use key.
    #[error("confirmation key does not match")]
    KeyMismatch,
    #[error("container index {0} out of range")]
    UnknownContainer(usize),
    #[error("unknown element: {0}")]
    UnknownElement(ElementId),
    #[error("validation failed for {}: {}", .0.element_id, .0.message)]
    Validation(ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Model(ModelError),
}

impl From<ModelError> for CompleteError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::AlreadyCompleted => CompleteError::AlreadyCompleted,
            other => CompleteError::Model(other),
        }
    }
}

/// Result of validating one container.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Every element validated; navigation advanced.
    Advanced {
        /// Next container to fill, `None` when this was the last one.
        next_container: Option<usize>,
    },
    /// At least one element failed; nothing was stored.
    Invalid(Vec<ValidationError>),
}

/// Terminal result of one completion attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Completed {
        directives: ResponseDirectives,
        /// Non-fatal action failures, already logged.
        action_failures: Vec<String>,
    },
    /// A gate turned the submission away.
    Rejected { gate: String, message: String },
    /// Completion is suspended pending an external signal.
    Interrupted(InterruptPayload),
}

/// The engine: element registry, gate registry, action dispatcher, and the
/// shared collaborators, wired once and reused across requests.
pub struct Orchestrator<'a> {
    elements: &'a ElementTypeRegistry,
    gates: &'a GateRegistry,
    actions: &'a ActionDispatcher,
    store: &'a dyn SubmissionStore,
    mailer: &'a dyn Mailer,
    /// Site base URL, used to build the opt-in confirmation link.
    site_url: String,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        elements: &'a ElementTypeRegistry,
        gates: &'a GateRegistry,
        actions: &'a ActionDispatcher,
        store: &'a dyn SubmissionStore,
        mailer: &'a dyn Mailer,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            elements,
            gates,
            actions,
            store,
            mailer,
            site_url: site_url.into(),
        }
    }

    /// Validate one container's input and advance navigation on success.
    ///
    /// Every input element of the container is validated; failures are
    /// aggregated so the visitor sees all of them at once. Elements absent
    /// from `input` validate as empty.
    pub fn advance(
        &self,
        form: &Form,
        submission: &mut Submission,
        container_index: usize,
        input: &BTreeMap<ElementId, RawValue>,
        _ctx: &RequestContext,
    ) -> Result<AdvanceOutcome, CompleteError> {
        if submission.is_completed() {
            return Err(CompleteError::AlreadyCompleted);
        }
        let container = form
            .containers
            .get(container_index)
            .ok_or(CompleteError::UnknownContainer(container_index))?;

        let mut values = ValueStore::new();
        let absent = RawValue::Text(String::new());
        for element in &container.elements {
            let element_type = self.elements.get(&element.type_slug);
            if !element_type.is_input() {
                continue;
            }
            let raw = input.get(&element.id).unwrap_or(&absent);
            values.record(
                element.id.clone(),
                element_type.validate(raw, element, submission),
            );
        }

        if !values.is_clean() {
            return Ok(AdvanceOutcome::Invalid(values.into_errors()));
        }

        values.merge_into(submission);
        submission.mark_container_done(container_index);
        self.store.save(submission)?;

        let next = container_index + 1;
        Ok(AdvanceOutcome::Advanced {
            next_container: (next < form.containers.len()).then_some(next),
        })
    }

    /// Attempt to complete the submission: gates, the double opt-in check,
    /// the completed transition, then actions.
    pub fn complete(
        &self,
        form: &Form,
        submission: &mut Submission,
        ctx: &RequestContext,
    ) -> Result<CompletionOutcome, CompleteError> {
        if submission.is_completed() {
            return Err(CompleteError::AlreadyCompleted);
        }
        if !submission.all_containers_done(form.containers.len()) {
            return Err(CompleteError::NotValidated);
        }

        // A submission already awaiting its confirmation mail re-reports the
        // pending interrupt; the mail is not re-sent.
        if submission.interrupted_at == Some(Interruption::OptIn) {
            if let Some(key) = &submission.confirm_key {
                return Ok(CompletionOutcome::Interrupted(InterruptPayload::OptIn {
                    confirm_key: key.clone(),
                }));
            }
        }

        // Re-entry after a gate interrupt resumes at the interrupting gate;
        // gates ordered before it passed already and are not re-run.
        let start = match &submission.interrupted_at {
            Some(Interruption::Gate(slug)) => form
                .gate_order
                .iter()
                .position(|entry| entry == slug)
                .unwrap_or_else(|| {
                    tracing::warn!(
                        form_id = %form.id,
                        slug,
                        "interrupting gate no longer in the form's gate order, restarting"
                    );
                    0
                }),
            _ => 0,
        };

        let gate_ctx = GateContext {
            request: ctx,
            store: self.store,
        };
        for slug in &form.gate_order[start..] {
            let Some(gate) = self.gates.get(slug) else {
                tracing::warn!(form_id = %form.id, slug, "unknown gate slug, skipping");
                continue;
            };
            if !gate.is_enabled(form, self.store)? {
                continue;
            }
            match gate.evaluate(form, submission, &gate_ctx)? {
                GateOutcome::Pass => {}
                GateOutcome::Reject { message } => {
                    tracing::info!(
                        form_id = %form.id,
                        submission_id = %submission.id,
                        gate = slug,
                        "submission rejected"
                    );
                    return Ok(CompletionOutcome::Rejected {
                        gate: slug.clone(),
                        message,
                    });
                }
                GateOutcome::Interrupt(payload) => {
                    submission.mark_interrupted(Interruption::Gate(slug.clone()));
                    self.store.save(submission)?;
                    return Ok(CompletionOutcome::Interrupted(payload));
                }
            }
        }

        // Double opt-in runs after the gates: no point confirming a
        // submission a gate would turn away.
        if self.double_opt_in_pending(form, submission)? {
            return self.start_opt_in(form, submission);
        }

        self.finalize(form, submission, ctx)
    }

    /// Attach a client-computed fingerprint and re-enter the gate sequence
    /// at the interrupting gate.
    pub fn resume_fingerprint(
        &self,
        form: &Form,
        submission: &mut Submission,
        fingerprint: &str,
        ctx: &RequestContext,
    ) -> Result<CompletionOutcome, CompleteError> {
        if submission.is_completed() {
            return Err(CompleteError::AlreadyCompleted);
        }
        if !matches!(submission.interrupted_at, Some(Interruption::Gate(_))) {
            return Err(CompleteError::NotInterrupted);
        }
        submission.fingerprint = Some(fingerprint.to_string());
        self.complete(form, submission, ctx)
    }

    /// Confirm a double opt-in. The key must match the stored single-use key
    /// exactly; on match the submission completes directly, without
    /// re-running validation or the gates that already passed.
    pub fn resume_confirmation(
        &self,
        form: &Form,
        submission: &mut Submission,
        key: &str,
        ctx: &RequestContext,
    ) -> Result<CompletionOutcome, CompleteError> {
        if submission.is_completed() {
            return Err(CompleteError::AlreadyCompleted);
        }
        if submission.interrupted_at != Some(Interruption::OptIn) {
            return Err(CompleteError::NotInterrupted);
        }
        if submission.confirm_key.as_deref() != Some(key) {
            return Err(CompleteError::KeyMismatch);
        }
        self.finalize(form, submission, ctx)
    }

    /// Resolve a bare confirmation link to its interrupted submission.
    /// `None` means the key is unknown; the caller redirects to the site root.
    pub fn find_confirmation(&self, key: &str) -> Result<Option<Submission>, CompleteError> {
        Ok(self.store.find_by_confirm_key(key)?)
    }

    /// Administrative edit of one stored value, through the same per-type
    /// validation as visitor input.
    pub fn update_value(
        &self,
        form: &Form,
        submission: &mut Submission,
        element_id: &ElementId,
        raw: &RawValue,
    ) -> Result<(), CompleteError> {
        let element = form
            .element(element_id)
            .ok_or_else(|| CompleteError::UnknownElement(element_id.clone()))?;
        let element_type = self.elements.get(&element.type_slug);
        let value = element_type
            .validate(raw, element, submission)
            .map_err(CompleteError::Validation)?;
        submission.values.insert(element_id.clone(), value);
        self.store.save(submission)?;
        Ok(())
    }

    fn double_opt_in_pending(
        &self,
        form: &Form,
        submission: &Submission,
    ) -> Result<bool, CompleteError> {
        // A present key means the confirmation already happened; completion
        // resumed through `resume_confirmation`.
        if submission.confirm_key.is_some() {
            return Ok(false);
        }
        Ok(self
            .store
            .form_option(form.id, "double_opt_in")?
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }

    fn start_opt_in(
        &self,
        form: &Form,
        submission: &mut Submission,
    ) -> Result<CompletionOutcome, CompleteError> {
        let key = keys::confirmation_key(form, submission);
        submission.confirm_key = Some(key.clone());
        submission.mark_interrupted(Interruption::OptIn);
        self.store.save(submission)?;

        let confirm_url = format!("{}/?confirm_key={}", self.site_url, key);
        let (to, subject, body) = self.opt_in_mail(form, submission, &confirm_url)?;
        match to {
            Some(to) => {
                // A failed confirmation mail is logged, not fatal: the
                // interrupt is already persisted and the mail can be re-sent
                // operationally.
                if let Err(err) = self.mailer.send(&to, &subject, &body, &[]) {
                    tracing::warn!(
                        form_id = %form.id,
                        submission_id = %submission.id,
                        %to,
                        error = %err,
                        "confirmation mail failed"
                    );
                }
            }
            None => {
                tracing::warn!(
                    form_id = %form.id,
                    submission_id = %submission.id,
                    "double opt-in enabled but no recipient resolvable"
                );
            }
        }

        Ok(CompletionOutcome::Interrupted(InterruptPayload::OptIn {
            confirm_key: key,
        }))
    }

    /// Render the confirmation mail. The recipient comes from the
    /// `opt_in_recipient` option, which names the element holding the
    /// visitor's address.
    fn opt_in_mail(
        &self,
        form: &Form,
        submission: &Submission,
        confirm_url: &str,
    ) -> Result<(Option<String>, String, String), CompleteError> {
        let to = self
            .store
            .form_option(form.id, "opt_in_recipient")?
            .and_then(|value| value.as_str().map(str::to_string))
            .and_then(|element| ElementId::new(element).ok())
            .and_then(|id| submission.values.get(&id))
            .map(|value| value.main_text().to_string())
            .filter(|address| !address.is_empty());

        let subject_template = self
            .store
            .form_option(form.id, "opt_in_subject")?
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| "Please confirm your submission".to_string());
        let body_template = self
            .store
            .form_option(form.id, "opt_in_body")?
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_else(|| {
                "Please confirm your submission to {formtitle}: {confirm_url}".to_string()
            });

        let tags = opt_in_tags();
        let args = [
            TagArg::Form(form),
            TagArg::Submission(submission),
            TagArg::Text(confirm_url),
        ];
        Ok((
            to,
            tags.process(&subject_template, &args),
            tags.process(&body_template, &args),
        ))
    }

    /// The completed transition: persist, dispatch actions, collect response
    /// directives. Runs exactly once per submission.
    fn finalize(
        &self,
        form: &Form,
        submission: &mut Submission,
        ctx: &RequestContext,
    ) -> Result<CompletionOutcome, CompleteError> {
        submission.mark_completed(ctx.now)?;
        self.store.save(submission)?;

        let report = self
            .actions
            .dispatch(form, submission, ctx, self.store, self.mailer);

        let directives = ResponseDirectives {
            cookies: self.completion_cookies(form, submission, ctx)?,
            redirect: report.redirect,
        };
        Ok(CompletionOutcome::Completed {
            directives,
            action_failures: report.failures,
        })
    }

    /// Cookies the enabled gates want set on the completion response.
    fn completion_cookies(
        &self,
        form: &Form,
        submission: &Submission,
        ctx: &RequestContext,
    ) -> Result<Vec<CookieDirective>, CompleteError> {
        let gate_ctx = GateContext {
            request: ctx,
            store: self.store,
        };
        let mut cookies = Vec::new();
        for slug in &form.gate_order {
            let Some(gate) = self.gates.get(slug) else {
                continue;
            };
            if !gate.is_enabled(form, self.store)? {
                continue;
            }
            cookies.extend(gate.completion_directives(form, submission, &gate_ctx));
        }
        Ok(cookies)
    }
}

/// Tags available to the opt-in confirmation mail templates.
fn opt_in_tags() -> TagHandler {
    let mut handler = TagHandler::new(vec![
        TagArgKind::Form,
        TagArgKind::Submission,
        TagArgKind::Text,
    ]);
    handler
        .register("formtitle", "form", "Title of the form", |args| {
            match args.first() {
                Some(TagArg::Form(form)) => form.title.clone(),
                _ => String::new(),
            }
        })
        .expect("valid tag name");
    handler
        .register(
            "confirm_url",
            "form",
            "Single-use confirmation link",
            |args| match args.get(2) {
                Some(TagArg::Text(url)) => (*url).to_string(),
                _ => String::new(),
            },
        )
        .expect("valid tag name");
    handler
}
