//! Duplicate prevention keyed on the remote address.
//!
//! Check-then-act: the lookup is not atomic with completion (see the trait
//! docs), so concurrent submissions from one address can race past it.

use forms_model::{Form, GateOutcome, Submission};

use crate::gate::{AccessGate, GateContext, GateError};

pub struct IpDedup;

impl AccessGate for IpDedup {
    fn slug(&self) -> &'static str {
        "ip_dedup"
    }

    fn description(&self) -> &'static str {
        "Rejects repeat submissions from the same remote address"
    }

    fn evaluate(
        &self,
        form: &Form,
        submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        // Prefer the address captured at submission creation; fall back to
        // the current request (resumption requests may differ).
        let addr = submission
            .remote_addr
            .as_deref()
            .or(ctx.request.remote_addr.as_deref());
        let Some(addr) = addr else {
            // Nothing to correlate on; not grounds to turn the visitor away.
            tracing::debug!(form_id = %form.id, "ip_dedup: no remote address available");
            return Ok(GateOutcome::Pass);
        };
        if ctx.store.completed_exists_for_ip(form.id, addr)? {
            return Ok(GateOutcome::reject(
                "A submission from your network address has already been received.",
            ));
        }
        Ok(GateOutcome::Pass)
    }
}
