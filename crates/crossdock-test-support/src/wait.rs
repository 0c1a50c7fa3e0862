//! Polling helpers for asserting on asynchronous fan-out effects.

use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const POLL_TIMEOUT: Duration = Duration::from_secs(2);

/// Polls `condition` until it holds.
///
/// # Panics
///
/// Panics with `description` if the condition does not hold within two
/// seconds.
pub async fn wait_until(description: &str, condition: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;
    loop {
        if condition() {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting until: {description}"
        );
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Gives background fan-out tasks a moment to run.
///
/// Use before negative assertions ("nothing was delivered"); positive
/// assertions should use [`wait_until`] instead.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
