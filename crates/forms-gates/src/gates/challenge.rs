//! Challenge-response (CAPTCHA-style) gate.
//!
//! Verification happens out-of-band before the orchestrator runs, so the
//! gate itself always passes; it exists so the challenge shares the same
//! enable/disable and configuration convention as the other gates, and so
//! the transport layer can fetch the client-script configuration from one
//! place.

use forms_model::{Form, GateOutcome, Submission};

use crate::gate::{AccessGate, GateContext, GateError};
use forms_store::{StoreError, SubmissionStore};

/// Client-side configuration of the challenge widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeConfig {
    pub site_key: String,
}

/// Read the widget configuration for rendering, if the form has one.
pub fn client_config(
    form: &Form,
    store: &dyn SubmissionStore,
) -> Result<Option<ChallengeConfig>, StoreError> {
    let site_key = store
        .form_option(form.id, "challenge_site_key")?
        .and_then(|value| value.as_str().map(str::to_string));
    Ok(site_key.map(|site_key| ChallengeConfig { site_key }))
}

pub struct Challenge;

impl AccessGate for Challenge {
    fn slug(&self) -> &'static str {
        "challenge"
    }

    fn description(&self) -> &'static str {
        "Challenge-response verification, checked earlier in the request"
    }

    fn is_enabled(&self, form: &Form, store: &dyn SubmissionStore) -> Result<bool, GateError> {
        // Without keys the widget cannot render, so the gate is off.
        let has_keys = store.form_option(form.id, "challenge_site_key")?.is_some()
            && store
                .form_option(form.id, "challenge_secret_key")?
                .is_some();
        Ok(has_keys)
    }

    fn evaluate(
        &self,
        _form: &Form,
        _submission: &Submission,
        _ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        Ok(GateOutcome::Pass)
    }
}
