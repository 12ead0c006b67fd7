//! Session Manager service

use crate::activity::ActivityKind;
use crate::error::Result;
use crate::notify::{LogoutNotifier, SignInRedirect};
use crate::storage::SessionStore;
use crate::structs::{SessionConfig, DEFAULT_IDENTITY};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::watcher::SessionWatcher;

/// Session Manager - one bearer-token session per identity slot
///
/// Doubts about a live session funnel into the single `logout` path (fail
/// closed): a missing token, an expired window, or a storage failure
/// observed mid-watch ends the session instead of raising. Direct calls
/// (`start_or_resume`, `refresh`) surface storage errors as `Result` so
/// the page can decide how to react to a broken backend.
pub struct SessionManager<S: SessionStore> {
    store: Arc<S>,
    notifier: Arc<dyn LogoutNotifier>,
    redirect: Arc<dyn SignInRedirect>,
    config: SessionConfig,
}

impl<S: SessionStore> Clone for SessionManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
            redirect: Arc::clone(&self.redirect),
            config: self.config,
        }
    }
}

impl<S: SessionStore + 'static> SessionManager<S> {
    /// Create a new SessionManager
    pub fn new(
        store: S,
        notifier: Arc<dyn LogoutNotifier>,
        redirect: Arc<dyn SignInRedirect>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            notifier,
            redirect,
            config,
        }
    }

    fn slot(identity: Option<&str>) -> &str {
        identity.unwrap_or(DEFAULT_IDENTITY)
    }

    /// Start watching the identity's session, or resume one left by a
    /// previous page.
    ///
    /// No stored token means nothing to watch: the returned watcher is
    /// already stopped and the caller is responsible for redirecting
    /// unauthenticated users. A token stored without a login timestamp is
    /// stamped fresh; a timestamp past the idle window logs out
    /// immediately. Otherwise the idle deadline is armed for the remaining
    /// window and a periodic check re-validates the slot, covering timers
    /// the host suspended (e.g. a backgrounded tab).
    ///
    /// Interaction signals delivered on `activity` re-stamp the session;
    /// the deadline is recomputed from the store after every signal, so
    /// rapid signals never leave a duplicate timer armed.
    pub async fn start_or_resume(
        &self,
        identity: Option<&str>,
        activity: mpsc::Receiver<ActivityKind>,
    ) -> Result<SessionWatcher> {
        let slot = Self::slot(identity).to_string();

        let Some(mut record) = self.store.get(&slot).await? else {
            debug!("No stored token for '{}', nothing to watch", slot);
            return Ok(SessionWatcher::inactive());
        };

        let now = Utc::now();
        match record.elapsed(now) {
            None => {
                // Token written without a timestamp (older client): the
                // pair is co-required, so stamp it and start a full window.
                record.login_timestamp = Some(now);
                self.store.set(&slot, &record).await?;
                info!("Re-initialized unstamped session for '{}'", slot);
            }
            Some(elapsed) if elapsed >= self.config.idle_window => {
                info!("Session for '{}' already idle-expired, logging out", slot);
                self.logout(Some(slot.as_str())).await;
                return Ok(SessionWatcher::inactive());
            }
            Some(_) => {}
        }

        let cancel = CancellationToken::new();
        self.spawn_deadline_task(slot.clone(), activity, cancel.clone());
        self.spawn_periodic_check(slot, cancel.clone());

        Ok(SessionWatcher::new(cancel))
    }

    /// Re-stamp the identity's login timestamp to now, restarting the idle
    /// window from zero. A no-op when no session is stored.
    ///
    /// Called by the watcher for every interaction signal; pages may also
    /// call it directly after a successful authenticated API call.
    pub async fn refresh(&self, identity: Option<&str>) -> Result<()> {
        let slot = Self::slot(identity);

        if let Some(mut record) = self.store.get(slot).await? {
            record.login_timestamp = Some(Utc::now());
            self.store.set(slot, &record).await?;
        }

        Ok(())
    }

    /// End the identity's session: best-effort server notify, unconditional
    /// local purge, redirect to sign-in.
    ///
    /// The purge and redirect run even when the notify fails, and clearing
    /// an already-empty slot is a no-op, so concurrent callers (deadline
    /// and periodic check racing) converge on the same state.
    pub async fn logout(&self, identity: Option<&str>) {
        let slot = Self::slot(identity);

        if let Err(e) = self.notifier.notify_logout(slot).await {
            warn!("Logout notify for '{}' failed: {}", slot, e);
        }

        if let Err(e) = self.store.clear(slot).await {
            error!("Failed to clear session slot '{}': {}", slot, e);
        }

        self.redirect.redirect_to_sign_in(slot);
        info!("Logged out '{}'", slot);
    }

    /// Single task owning both the idle deadline and the activity
    /// subscription: after every signal (or wakeup) the remaining window is
    /// recomputed from the stored timestamp, which is what makes refresh
    /// last-writer-wins without a separately re-armed timer.
    fn spawn_deadline_task(
        &self,
        slot: String,
        mut activity: mpsc::Receiver<ActivityKind>,
        cancel: CancellationToken,
    ) {
        let manager = self.clone();
        let idle_window = self.config.idle_window;

        tokio::spawn(async move {
            let mut activity_closed = false;

            loop {
                // Teardown wins over an expiry decision: a stop that lands
                // while the sleep below is in flight must not log out.
                if cancel.is_cancelled() {
                    break;
                }

                let record = match manager.store.get(&slot).await {
                    Ok(Some(record)) => record,
                    Ok(None) => {
                        // Token invalidated externally while watching.
                        manager.logout(Some(slot.as_str())).await;
                        cancel.cancel();
                        break;
                    }
                    Err(e) => {
                        warn!("Session read for '{}' failed: {}", slot, e);
                        manager.logout(Some(slot.as_str())).await;
                        cancel.cancel();
                        break;
                    }
                };

                let now = Utc::now();
                let Some(elapsed) = record.elapsed(now) else {
                    // Timestamp vanished mid-watch; the pair is co-required.
                    manager.logout(Some(slot.as_str())).await;
                    cancel.cancel();
                    break;
                };

                if elapsed >= idle_window {
                    info!("Idle window for '{}' elapsed, logging out", slot);
                    manager.logout(Some(slot.as_str())).await;
                    cancel.cancel();
                    break;
                }

                let remaining = idle_window - elapsed;
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(remaining) => {
                        // Loop re-validates against the store; a refresh
                        // that landed while we slept moves the deadline.
                    }
                    signal = activity.recv(), if !activity_closed => {
                        match signal {
                            Some(kind) => {
                                debug!("Activity ({:?}) for '{}', refreshing", kind, slot);
                                if let Err(e) = manager.refresh(Some(slot.as_str())).await {
                                    warn!("Refresh for '{}' failed: {}", slot, e);
                                }
                            }
                            None => activity_closed = true,
                        }
                    }
                }
            }
        });
    }

    /// Recurring re-validation of the stored record. Catches idle windows
    /// that elapsed while the deadline timer was suspended by the host.
    fn spawn_periodic_check(&self, slot: String, cancel: CancellationToken) {
        let manager = self.clone();
        let idle_window = self.config.idle_window;
        let check_interval = self.config.check_interval;

        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(Instant::now() + check_interval, check_interval);

            loop {
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let valid = match manager.store.get(&slot).await {
                            Ok(Some(record)) => {
                                record.login_timestamp.is_some()
                                    && !record.is_expired(idle_window, Utc::now())
                            }
                            Ok(None) => false,
                            Err(e) => {
                                warn!("Periodic check read for '{}' failed: {}", slot, e);
                                false
                            }
                        };

                        if !valid && !cancel.is_cancelled() {
                            info!("Periodic check found invalid session for '{}'", slot);
                            manager.logout(Some(slot.as_str())).await;
                            cancel.cancel();
                            break;
                        }
                    }
                }
            }
        });
    }

    /// The configured idle window (exposed for host pages that surface a
    /// countdown).
    pub fn idle_window(&self) -> Duration {
        self.config.idle_window
    }
}
