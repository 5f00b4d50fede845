//! Allow-list gate: only explicitly listed identities may submit.

use forms_model::{Form, GateOutcome, Submission};

use crate::gate::{AccessGate, GateContext, GateError, option_str_list};

pub struct SelectedMembers;

impl AccessGate for SelectedMembers {
    fn slug(&self) -> &'static str {
        "selected_members"
    }

    fn description(&self) -> &'static str {
        "Restricts submission to an explicit allow-list of identities"
    }

    fn evaluate(
        &self,
        form: &Form,
        _submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        // Membership is exact-match against the maintained list, never inferred.
        let allowed = option_str_list(ctx.store, form, "allowed_members")?;
        let permitted = ctx
            .request
            .authenticated_identity
            .as_deref()
            .is_some_and(|identity| allowed.iter().any(|entry| entry == identity));
        if permitted {
            Ok(GateOutcome::Pass)
        } else {
            Ok(GateOutcome::reject(
                "You are not allowed to submit this form.",
            ))
        }
    }
}
