//! Runtime environment helpers
//!
//! Emulated latency shared by every operation.

use std::time::Duration;

/// Default emulated network latency.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Wait out the emulated latency. A zero delay still yields once.
pub async fn simulate_latency(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}
