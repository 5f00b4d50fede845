//! Notification action: render templates through the tag engine and send.

use serde::Deserialize;

use forms_model::{ActionOutcome, Form, Submission};
use forms_store::SubmissionStore;
use forms_tags::{TagArg, TagHandler};

use crate::action::{Action, ActionContext};
use crate::mailer::MailHeader;

/// One configured notification template, read from the `notifications` form
/// option. Every field may contain template tags.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationTemplate {
    pub to: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub reply_to: Option<String>,
    #[serde(default)]
    pub cc: Option<String>,
    #[serde(default)]
    pub bcc: Option<String>,
    pub subject: String,
    pub body: String,
}

pub struct NotificationAction {
    tags: TagHandler,
}

impl NotificationAction {
    /// `tags` must accept the `[Form, Submission]` signature; see
    /// [`crate::tags::standard_tags`].
    pub fn new(tags: TagHandler) -> Self {
        Self { tags }
    }

    fn templates(
        &self,
        form: &Form,
        store: &dyn SubmissionStore,
    ) -> Result<Vec<NotificationTemplate>, String> {
        let value = store
            .form_option(form.id, "notifications")
            .map_err(|err| format!("reading notifications option: {err}"))?;
        let Some(value) = value else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value).map_err(|err| format!("malformed notifications option: {err}"))
    }
}

impl Action for NotificationAction {
    fn slug(&self) -> &'static str {
        "notification"
    }

    fn description(&self) -> &'static str {
        "Sends configured notification mails"
    }

    fn handle(
        &self,
        form: &Form,
        submission: &Submission,
        ctx: &mut ActionContext<'_>,
    ) -> ActionOutcome {
        let templates = match self.templates(form, ctx.store) {
            Ok(templates) => templates,
            Err(message) => return ActionOutcome::failure(message),
        };

        let args = [TagArg::Form(form), TagArg::Submission(submission)];
        let resolve = |content: &str| self.tags.process(content, &args);
        let mut failures = Vec::new();

        for template in &templates {
            let to = resolve(&template.to);
            let subject = resolve(&template.subject);
            let body = resolve(&template.body);

            let mut headers = Vec::new();
            if let Some(from) = &template.from {
                headers.push(MailHeader::new("From", resolve(from)));
            }
            if let Some(reply_to) = &template.reply_to {
                headers.push(MailHeader::new("Reply-To", resolve(reply_to)));
            }
            if let Some(cc) = &template.cc {
                headers.push(MailHeader::new("Cc", resolve(cc)));
            }
            if let Some(bcc) = &template.bcc {
                headers.push(MailHeader::new("Bcc", resolve(bcc)));
            }

            if let Err(err) = ctx.mailer.send(&to, &subject, &body, &headers) {
                // Record the recipient so the log entry is actionable.
                failures.push(format!("sending to {to}: {err}"));
            }
        }

        if failures.is_empty() {
            ActionOutcome::Success
        } else {
            ActionOutcome::failure(failures.join("; "))
        }
    }
}
