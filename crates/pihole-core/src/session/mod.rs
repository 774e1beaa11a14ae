//! Session state for the current API
//!
//! - [`Session`]: one login's worth of credentials
//! - [`SessionStore`]: the lock-guarded slot a dispatcher keeps it in

mod store;

pub use store::SessionStore;

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// An authenticated session issued by the appliance
///
/// Sessions are replaced, never mutated: each login produces a new value.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Session id, sent as `X-FTL-SID`
    pub sid: String,
    /// CSRF token issued alongside the session
    pub csrf: String,
    /// Whether the appliance has two-factor authentication enabled
    pub totp: bool,
    /// Validity window reported at login, in seconds
    pub validity_secs: u64,
    /// When the session expires; `None` when unknown (restored session)
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session from a login response received at `issued_at`
    ///
    /// A zero validity means the appliance did not report one; such a
    /// session has no known expiration.
    pub fn issued(
        sid: impl Into<String>,
        csrf: impl Into<String>,
        totp: bool,
        validity_secs: u64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expires_at = i64::try_from(validity_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .and_then(|validity| issued_at.checked_add_signed(validity));
        Self {
            sid: sid.into(),
            csrf: csrf.into(),
            totp,
            validity_secs,
            expires_at,
        }
    }

    /// Wrap a session id obtained elsewhere; its expiration is unknown
    pub fn restored(sid: impl Into<String>) -> Self {
        Self {
            sid: sid.into(),
            csrf: String::new(),
            totp: false,
            validity_secs: 0,
            expires_at: None,
        }
    }

    /// Whether the session has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Whether the session has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// Session ids are bearer credentials
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("sid", &"<REDACTED>")
            .field("csrf", &"<REDACTED>")
            .field("totp", &self.totp)
            .field("validity_secs", &self.validity_secs)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
