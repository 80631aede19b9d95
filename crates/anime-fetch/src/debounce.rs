//! Trailing-edge debouncing.
//!
//! Each trigger cancels the pending delayed call and schedules a new one, so
//! a burst of triggers fires the action once, with the last value, after the
//! quiet period.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Cancel-and-reschedule timer around an action.
///
/// Must be triggered from within a tokio runtime.
pub struct Debouncer<T> {
    quiet: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(quiet: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            quiet,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    /// Restart the quiet period with `value` as the latest input
    pub fn trigger(&self, value: T) {
        let action = Arc::clone(&self.action);
        let quiet = self.quiet;

        let mut pending = self.pending();
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        *pending = Some(tokio::spawn(async move {
            sleep(quiet).await;
            action(value);
        }));
    }

    /// Drop the pending call, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.pending().take() {
            handle.abort();
        }
    }

    /// Whether a call is scheduled and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        // The guarded handle stays valid even if a holder panicked
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = match self.pending.get_mut() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
