//! Session data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Slot key used when no identity has been established yet (legacy/global
/// session). Identity-scoped slots use the username as the key.
pub const DEFAULT_IDENTITY: &str = "default";

/// One stored session per identity slot.
///
/// A record whose `login_timestamp` is absent is not yet a valid session:
/// the token and the timestamp are co-required, and the manager re-stamps
/// such a record on resume before arming the idle timeout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    /// Opaque bearer credential. Presence implies "logged in".
    pub token: String,

    /// Instant the session was last (re)established or refreshed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_timestamp: Option<DateTime<Utc>>,
}

impl SessionRecord {
    /// Create a freshly stamped record.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            login_timestamp: Some(Utc::now()),
        }
    }

    /// A record carrying only a token, as written by older clients that
    /// did not track the login timestamp.
    pub fn token_only(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            login_timestamp: None,
        }
    }

    /// Time since the last refresh, or `None` when the record has never
    /// been stamped.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        let stamped = self.login_timestamp?;
        Some((now - stamped).to_std().unwrap_or(Duration::ZERO))
    }

    /// Whether the idle window has run out since the last refresh.
    /// An unstamped record is never expired; it is re-initialized instead.
    pub fn is_expired(&self, idle_window: Duration, now: DateTime<Utc>) -> bool {
        match self.elapsed(now) {
            Some(elapsed) => elapsed >= idle_window,
            None => false,
        }
    }
}

/// Timing knobs for the session watcher.
///
/// Production callers use `Default`; tests inject short windows so the
/// timeout behavior can be exercised without mocking the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Inactivity duration after which a session is forcibly ended.
    pub idle_window: Duration,

    /// How often the watcher re-validates the stored record (covers timers
    /// suspended by the host, e.g. a backgrounded tab).
    pub check_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_window: Duration::from_secs(10 * 60),
            check_interval: Duration::from_secs(60),
        }
    }
}
