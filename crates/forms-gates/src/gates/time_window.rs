//! Availability window gate.
//!
//! Bounds come from the `window_start`/`window_end` form options as UNIX
//! seconds. Absent or non-numeric bounds are unconstrained, so a form with
//! neither option is always open.

use chrono::DateTime;

use forms_model::{Form, GateOutcome, Submission};

use crate::gate::{AccessGate, GateContext, GateError, option_i64};

pub struct TimeWindow;

impl AccessGate for TimeWindow {
    fn slug(&self) -> &'static str {
        "time_window"
    }

    fn description(&self) -> &'static str {
        "Accepts submissions only within a configured time window"
    }

    fn evaluate(
        &self,
        form: &Form,
        _submission: &Submission,
        ctx: &GateContext<'_>,
    ) -> Result<GateOutcome, GateError> {
        let now = ctx.request.now;
        let start = option_i64(ctx.store, form, "window_start")?
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        let end = option_i64(ctx.store, form, "window_end")?
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        if let Some(start) = start
            && now < start
        {
            return Ok(GateOutcome::reject("This form is not yet open."));
        }
        if let Some(end) = end
            && now > end
        {
            return Ok(GateOutcome::reject("This form is no longer open."));
        }
        Ok(GateOutcome::Pass)
    }
}
