//! Built-in access gates.

mod challenge;
mod cookie;
mod fingerprint;
mod ip;
mod members;
mod selected_members;
mod time_window;

pub use challenge::{Challenge, ChallengeConfig, client_config};
pub use cookie::{COOKIE_MAX_AGE, CookieDedup, PARTICIPATED, participation_cookie_name};
pub use fingerprint::{FingerprintDedup, resume_token};
pub use ip::IpDedup;
pub use members::Members;
pub use selected_members::SelectedMembers;
pub use time_window::TimeWindow;
