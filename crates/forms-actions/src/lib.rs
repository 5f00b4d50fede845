//! Post-completion actions.
//!
//! Once a submission completes, the dispatcher runs every action listed in
//! the form's action order: notification mails rendered through the template
//! tag engine, and the redirect target for the response. Action failures are
//! logged and reported but never fatal; the submission stays completed.

pub mod action;
pub mod dispatcher;
pub mod mailer;
pub mod notification;
pub mod redirect;
pub mod tags;

pub use action::{Action, ActionContext};
pub use dispatcher::{ActionDispatcher, DispatchReport};
pub use mailer::{MailHeader, Mailer};
pub use notification::{NotificationAction, NotificationTemplate};
pub use redirect::RedirectAction;
pub use tags::standard_tags;
