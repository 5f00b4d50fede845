//! Duplicate prevention keyed on a client-computed device fingerprint.
//!
//! Two-phase gate: without a fingerprint it interrupts completion with a
//! script payload and a resume token; the client computes the fingerprint
//! and resubmits through the resumption endpoint, after which the gate
//! re-evaluates with the fingerprint attached and performs the duplicate
//! lookup. This is the one gate whose decision is asynchronous from the
//! server's perspective.

use sha2::Digest;

use forms_model::{Form, GateOutcome, InterruptPayload, Submission};

use crate::gate::{AccessGate, GateContext, GateError};

/// Client-side payload. The transport layer injects the resume endpoint; the
/// script posts `(formId, currentStep, nextStep, computedFingerprint)` back.
const FINGERPRINT_SCRIPT: &str = "window.formsComputeFingerprint(document.currentScript.dataset);";

/// Continuation token tying a resumption request to this submission.
pub fn resume_token(form: &Form, submission: &Submission) -> String {
    let seed = format!(
        "fingerprint:{}:{}:{}",
        form.id,
        submission.id,
        submission.created_at.timestamp_micros()
    );
    hex::encode(sha2::Sha256::digest(seed.as_bytes()))
}

pub struct FingerprintDedup;

impl AccessGate for FingerprintDedup {
    fn slug(&self) -> &'static str {
        "fingerprint_dedup"
    }

    fn description(&self) -> &'static str {
        "Rejects repeat submissions from the same device fingerprint"
    }

    fn evaluate(
        &self,
        form: &Form,
        submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        let fingerprint = submission
            .fingerprint
            .as_deref()
            .or(ctx.request.fingerprint.as_deref());
        let Some(fingerprint) = fingerprint else {
            return Ok(GateOutcome::Interrupt(InterruptPayload::Fingerprint {
                resume_token: resume_token(form, submission),
                script: FINGERPRINT_SCRIPT.to_string(),
            }));
        };
        if ctx
            .store
            .completed_exists_for_fingerprint(form.id, fingerprint)?
        {
            return Ok(GateOutcome::reject(
                "A submission from this device has already been received.",
            ));
        }
        Ok(GateOutcome::Pass)
    }
}
