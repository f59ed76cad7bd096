// Poll - Bounded re-evaluation of a predicate
//
// The same retry loop that backs `expect()` assertions, pulled out into a
// reusable primitive. Unlike an assertion, expiry is not an error: the caller
// gets `false` / `None` and decides what that means.
//
// Timing contract (interval I, timeout T):
// - a predicate that turns true at t < T is observed no later than t + I
// - a predicate that never turns true returns at or after T, and before T + I
//
// Time is read from `tokio::time`, so paused-clock tests are exact.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default polling interval for workflow poll loops (250ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default budget for workflow poll loops (15 seconds)
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(15);

/// Interval used by driver-level waits (100ms, matching `expect()`)
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timeout and interval for one poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl PollOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Default interval with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Polls `predicate` until it returns true or the budget runs out.
///
/// # Example
///
/// ```ignore
/// let settled = poll_until(
///     || async { toast.is_visible().await || form.has_errors().await },
///     PollOptions::with_timeout(Duration::from_secs(15)),
/// )
/// .await;
/// ```
pub async fn poll_until<F, Fut>(mut predicate: F, options: PollOptions) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    poll_for(
        move || {
            let check = predicate();
            async move { check.await.then_some(()) }
        },
        options,
    )
    .await
    .is_some()
}

/// Polls `probe` until it yields a value or the budget runs out.
///
/// This is the classifying form of [`poll_until`]: each tick inspects every
/// feedback channel at once and returns the first terminal observation.
pub async fn poll_for<T, F, Fut>(mut probe: F, options: PollOptions) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + options.timeout;
    let interval = options.interval.max(Duration::from_millis(1));

    loop {
        if let Some(value) = probe().await {
            return Some(value);
        }

        let now = Instant::now();
        if now >= deadline {
            tracing::debug!(timeout = ?options.timeout, "Poll budget exhausted");
            return None;
        }

        // Never sleep past the deadline, so expiry lands before T + interval
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}
