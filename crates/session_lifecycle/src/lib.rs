//! # Session Lifecycle
//!
//! Client-side authentication session management for the portfolio builder.
//! Tracks one bearer-token session per user identity, enforces a fixed idle
//! timeout, and guarantees logout (local purge + best-effort server notify)
//! on expiry, inactivity, or externally invalidated tokens.

pub mod activity;
pub mod error;
pub mod manager;
pub mod notify;
pub mod storage;
pub mod structs;
pub mod watcher;

// Re-exports
pub use activity::{ActivityBus, ActivityKind};
pub use error::SessionError;
pub use manager::SessionManager;
pub use notify::{HttpLogoutNotifier, LogoutNotifier, SignInRedirect};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};
pub use structs::{SessionConfig, SessionRecord, DEFAULT_IDENTITY};
pub use watcher::SessionWatcher;
