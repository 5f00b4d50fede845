//! Duplicate prevention keyed on a participation cookie.
//!
//! The cookie is set on successful completion and checked on subsequent
//! attempts. Name pattern `has_participated_form_<formId>`, value `"yes"`,
//! lifetime one year.

use forms_model::{CookieDirective, Form, FormId, GateOutcome, Submission};

use crate::gate::{AccessGate, GateContext, GateError};

/// Marker value stored in the participation cookie.
pub const PARTICIPATED: &str = "yes";

/// Cookie lifetime in seconds (365 days).
pub const COOKIE_MAX_AGE: i64 = 365 * 24 * 60 * 60;

/// Name of the participation cookie for one form.
pub fn participation_cookie_name(form_id: FormId) -> String {
    format!("has_participated_form_{form_id}")
}

pub struct CookieDedup;

impl AccessGate for CookieDedup {
    fn slug(&self) -> &'static str {
        "cookie_dedup"
    }

    fn description(&self) -> &'static str {
        "Rejects repeat submissions marked by a participation cookie"
    }

    fn evaluate(
        &self,
        form: &Form,
        _submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        let name = participation_cookie_name(form.id);
        if ctx.request.cookie(&name) == Some(PARTICIPATED) {
            return Ok(GateOutcome::reject(
                "You have already participated in this form.",
            ));
        }
        Ok(GateOutcome::Pass)
    }

    fn completion_directives(
        &self,
        form: &Form,
        _submission: &Submission,
        _ctx: &GateContext<'_>,
    ) -> Vec<CookieDirective> {
        vec![CookieDirective {
            name: participation_cookie_name(form.id),
            value: PARTICIPATED.to_string(),
            max_age: COOKIE_MAX_AGE,
        }]
    }
}
