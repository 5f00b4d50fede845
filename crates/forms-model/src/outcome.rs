//! Gate and action outcome types, plus the response directives a completed
//! submission hands back to the transport layer.

use serde::{Deserialize, Serialize};

/// Result of one access-control check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    /// The submission may proceed past this gate.
    Pass,
    /// The submission may not complete. Always carries a user-facing message.
    Reject { message: String },
    /// Completion is suspended pending an external signal. Always carries
    /// enough payload to resume.
    Interrupt(InterruptPayload),
}

impl GateOutcome {
    pub fn reject(message: impl Into<String>) -> Self {
        GateOutcome::Reject {
            message: message.into(),
        }
    }
}

/// What an interrupting gate needs the client to do before completion can
/// resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptPayload {
    /// Run the bundled script to compute a device fingerprint, then resubmit
    /// with the fingerprint attached to the resume token.
    Fingerprint {
        resume_token: String,
        script: String,
    },
    /// Visit the emailed confirmation link carrying this key.
    OptIn { confirm_key: String },
}

/// Result of one post-completion action. Never fatal to the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Success,
    Failure { message: String },
}

impl ActionOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        ActionOutcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ActionOutcome::Failure { .. })
    }
}

/// A cookie the transport layer should set on the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieDirective {
    pub name: String,
    pub value: String,
    /// Lifetime in seconds.
    pub max_age: i64,
}

/// Side effects of a completed submission the transport layer must apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDirectives {
    pub cookies: Vec<CookieDirective>,
    /// Post-completion redirect target, if any redirection action set one.
    pub redirect: Option<String>,
}
