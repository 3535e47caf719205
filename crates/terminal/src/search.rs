//! Debounced search dispatch with stale-response protection.
//!
//! Bursts of keystrokes would otherwise race: a slow earlier response can
//! arrive after a fresher one and overwrite it. Every dispatch therefore
//! supersedes the previous one - the old cancellation token is cancelled,
//! and a result is only surfaced if its dispatch is still the newest when
//! the work finishes. Superseded dispatches resolve to `None`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Serializes a stream of search requests: debounce first, newest wins.
#[derive(Clone)]
pub struct SearchDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    debounce: Duration,
    generation: AtomicU64,
    current: std::sync::Mutex<CancellationToken>,
}

impl SearchDispatcher {
    /// Create a dispatcher with the given debounce delay.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                debounce,
                generation: AtomicU64::new(0),
                current: std::sync::Mutex::new(CancellationToken::new()),
            }),
        }
    }

    /// Debounce, then run `work`, returning its result only if no newer
    /// dispatch arrived in the meantime.
    ///
    /// Returns `None` when this dispatch was superseded - during the
    /// debounce window, while the work was in flight, or just before the
    /// result would have been surfaced.
    pub async fn dispatch<T, F, Fut>(&self, work: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let superseded = {
            let mut current = self
                .inner
                .current
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            std::mem::replace(&mut *current, token.clone())
        };
        superseded.cancel();

        tokio::select! {
            () = token.cancelled() => return None,
            () = tokio::time::sleep(self.inner.debounce) => {}
        }
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            return None;
        }

        let result = tokio::select! {
            () = token.cancelled() => return None,
            result = work() => result,
        };

        // A newer dispatch may have won the race between the work finishing
        // and its token being cancelled.
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            return None;
        }
        Some(result)
    }
}
