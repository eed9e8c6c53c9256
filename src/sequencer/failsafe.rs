//! Single-shot cancellable delay bounding overlay duration.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A cancellable, single-shot delayed action.
///
/// At most one timer is armed at a time: arming replaces any previous timer.
/// `cancel` is idempotent and guarantees the callback will not run if it has
/// not already begun executing. Dropping the timer cancels it.
#[derive(Debug, Default)]
pub struct FailsafeTimer {
    armed: Option<CancellationToken>,
}

impl FailsafeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `on_expiry` to run once after `delay`, replacing any
    /// previously armed timer.
    pub fn arm<F>(&mut self, delay: Duration, on_expiry: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let token = CancellationToken::new();
        self.armed = Some(token.clone());

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("failsafe timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    debug!("failsafe timer fired after {:?}", delay);
                    on_expiry();
                }
            }
        });
    }

    /// Cancel the armed timer, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.armed.take() {
            token.cancel();
        }
    }

    /// Whether a timer handle is currently held.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl Drop for FailsafeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
