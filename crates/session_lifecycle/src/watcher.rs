//! Handle for a running session watch

use tokio_util::sync::CancellationToken;

/// Owns the timer tasks and activity subscription armed by
/// [`SessionManager::start_or_resume`](crate::SessionManager::start_or_resume).
///
/// `stop` tears down the idle deadline, the periodic check, and the
/// activity subscription through one cancellation token. It is idempotent
/// and also runs on drop, so a watcher that goes out of scope during a
/// navigation cannot fire a stale timer against the next identity.
pub struct SessionWatcher {
    cancel: CancellationToken,
}

impl SessionWatcher {
    pub(crate) fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// A watcher with nothing to watch (no stored token). Already stopped.
    pub(crate) fn inactive() -> Self {
        let cancel = CancellationToken::new();
        cancel.cancel();
        Self { cancel }
    }

    /// Cancel all timers and the activity subscription. Safe to call more
    /// than once.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_is_idempotent() {
        let watcher = SessionWatcher::new(CancellationToken::new());
        assert!(!watcher.is_stopped());

        watcher.stop();
        watcher.stop();
        assert!(watcher.is_stopped());
    }

    #[test]
    fn test_inactive_watcher_is_stopped() {
        assert!(SessionWatcher::inactive().is_stopped());
    }

    #[test]
    fn test_drop_cancels_token() {
        let cancel = CancellationToken::new();
        let watcher = SessionWatcher::new(cancel.clone());

        drop(watcher);
        assert!(cancel.is_cancelled());
    }
}
