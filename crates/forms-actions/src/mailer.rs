//! Mail transport collaborator.

/// One additional message header (Reply-To, Cc, Bcc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailHeader {
    pub name: String,
    pub value: String,
}

impl MailHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Injected mail transport. Implementations wrap whatever delivery mechanism
/// the host application uses; the engine only needs this narrow surface.
pub trait Mailer: Send + Sync {
    fn send(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        headers: &[MailHeader],
    ) -> anyhow::Result<()>;
}
