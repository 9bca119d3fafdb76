//! Time source for polling loops.

use async_trait::async_trait;
use futures_timer::Delay;
use std::time::Duration;

/// Suspends the caller between polls.
///
/// Scan polling sleeps through this trait so it can run against a fake
/// clock in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock [`Clock`] backed by `futures-timer`, independent of the
/// executor in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    async fn sleep(&self, duration: Duration) {
        Delay::new(duration).await;
    }
}
