//! Shared test doubles and utilities for the Crossdock hub network.

mod clock;
mod distance;
mod identity;
mod publisher;
mod wait;

pub use clock::FixedClock;
pub use distance::{FailingDistanceProvider, FixedDistanceProvider};
pub use identity::{StaticManagerDirectory, StaticMemberDirectory, StaticPermissionChecker};
pub use publisher::{FailingPublisher, RecordingPublisher};
pub use wait::{settle, wait_until};

/// Installs a tracing subscriber for tests, honoring `RUST_LOG`.
///
/// Safe to call from every test; repeated calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
