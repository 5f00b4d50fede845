//! The access gate contract.

use thiserror::Error;

use forms_model::{CookieDirective, Form, GateOutcome, RequestContext, Submission};
use forms_store::{StoreError, SubmissionStore};

/// Errors a gate can hit while consulting collaborators. Distinct from a
/// rejecting outcome: a `GateError` is an infrastructure failure, not a
/// decision about the visitor.
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a gate may read while evaluating: the immutable per-request context
/// and the shared store.
pub struct GateContext<'a> {
    pub request: &'a RequestContext,
    pub store: &'a dyn SubmissionStore,
}

/// One pluggable eligibility or duplicate-prevention check.
///
/// Gates are registered in a [`crate::GateRegistry`] and evaluated in the
/// form's configured order. The first `Reject` or `Interrupt` outcome
/// short-circuits evaluation.
///
/// The duplicate-prevention gates are check-then-act against the store: the
/// lookup is not atomic with completion, so two concurrent submissions from
/// the same client can both pass. This is a documented property of the
/// engine.
pub trait AccessGate: Send + Sync {
    /// Stable slug this gate is referenced by in a form's gate order.
    fn slug(&self) -> &'static str;

    /// Human-readable description.
    fn description(&self) -> &'static str {
        "Access gate"
    }

    /// Whether the gate is active for this form, from form-level
    /// configuration. Listing a slug in the form's gate order enables it
    /// unless the `gate_<slug>` option is explicitly false.
    fn is_enabled(&self, form: &Form, store: &dyn SubmissionStore) -> Result<bool, GateError> {
        let key = format!("gate_{}", self.slug());
        Ok(store
            .form_option(form.id, &key)?
            .and_then(|value| value.as_bool())
            .unwrap_or(true))
    }

    /// Decide whether the submission may proceed past this gate.
    fn evaluate(
        &self,
        form: &Form,
        submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError>;

    /// Cookies to set once the submission completes. Most gates have none;
    /// the cookie-based duplicate gate marks participation here.
    fn completion_directives(
        &self,
        form: &Form,
        submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Vec<CookieDirective> {
        let _ = (form, submission, ctx);
        Vec::new()
    }
}

/// Read a numeric form option, tolerating integers and numeric strings.
/// Anything else is `None` (unconstrained).
pub(crate) fn option_i64(
    store: &dyn SubmissionStore,
    form: &Form,
    key: &str,
) -> Result<Option<i64>, GateError> {
    let value = store.form_option(form.id, key)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::Number(number) => number.as_i64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }))
}

/// Read a boolean form option, defaulting to false when absent.
pub(crate) fn option_flag(
    store: &dyn SubmissionStore,
    form: &Form,
    key: &str,
) -> Result<bool, GateError> {
    let value = store.form_option(form.id, key)?;
    Ok(value.and_then(|value| value.as_bool()).unwrap_or(false))
}

/// Read a string-array form option; absent or malformed means empty.
pub(crate) fn option_str_list(
    store: &dyn SubmissionStore,
    form: &Form,
    key: &str,
) -> Result<Vec<String>, GateError> {
    let value = store.form_option(form.id, key)?;
    Ok(value
        .and_then(|value| {
            value.as_array().map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
        })
        .unwrap_or_default())
}
