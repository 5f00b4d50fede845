//! Per-request context.
//!
//! Built once at the edge of a request and passed by reference into every
//! gate and action. Callees never mutate it; state that must outlive the
//! request lives on the submission instead.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// Everything a gate or action may read about the current request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub remote_addr: Option<String>,
    pub cookies: BTreeMap<String, String>,
    pub authenticated_identity: Option<String>,
    /// Client-computed device fingerprint, present only on resumption
    /// requests.
    pub fingerprint: Option<String>,
    /// Whether an out-of-band challenge (CAPTCHA-style) was verified earlier
    /// in this request.
    pub challenge_verified: bool,
    pub now: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            remote_addr: None,
            cookies: BTreeMap::new(),
            authenticated_identity: None,
            fingerprint: None,
            challenge_verified: false,
            now,
        }
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.authenticated_identity = Some(identity.into());
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}
