//! Membership gate: requires an authenticated visitor, optionally once per
//! identity.

use forms_model::{Form, GateOutcome, Submission};

use crate::gate::{AccessGate, GateContext, GateError, option_flag};

pub struct Members;

impl AccessGate for Members {
    fn slug(&self) -> &'static str {
        "members"
    }

    fn description(&self) -> &'static str {
        "Requires an authenticated visitor"
    }

    fn evaluate(
        &self,
        form: &Form,
        _submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        let Some(identity) = ctx.request.authenticated_identity.as_deref() else {
            return Ok(GateOutcome::reject(
                "You have to be logged in to submit this form.",
            ));
        };
        if option_flag(ctx.store, form, "members_once")?
            && ctx
                .store
                .completed_exists_for_identity(form.id, identity)?
        {
            return Ok(GateOutcome::reject(
                "You have already submitted this form.",
            ));
        }
        Ok(GateOutcome::Pass)
    }
}
