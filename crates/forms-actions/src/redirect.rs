//! Redirection action: register the post-completion redirect target.

use forms_model::{ActionOutcome, Form, Submission};

use crate::action::{Action, ActionContext};

pub struct RedirectAction;

impl Action for RedirectAction {
    fn slug(&self) -> &'static str {
        "redirect"
    }

    fn description(&self) -> &'static str {
        "Redirects the visitor after completion"
    }

    fn handle(
        &self,
        form: &Form,
        _submission: &Submission,
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        // Explicit URL beats a page reference when both are configured.
        let explicit = match ctx.store.form_option(form.id, "redirect_url") {
            Ok(value) => value.and_then(|v| v.as_str().map(str::to_string)),
            Err(err) => return ActionOutcome::failure(format!("reading redirect_url: {err}")),
        };
        let target = match explicit {
            Some(url) => Some(url),
            None => match ctx.store.form_option(form.id, "redirect_page") {
                Ok(value) => value
                    .and_then(|v| v.as_u64())
                    .map(|page| format!("/?page_id={page}")),
                Err(err) => {
                    return ActionOutcome::failure(format!("reading redirect_page: {err}"));
                }
            },
        };

        match target {
            Some(target) => {
                ctx.set_redirect(target);
                ActionOutcome::Success
            }
            None => ActionOutcome::failure("no redirect target configured"),
        }
    }
}
