//! Tick task for time-based updates
//!
//! Provides periodic ticks to the controller for:
//! - Session timers
//! - Indicator animation

use embassy_time::{Duration, Instant, Ticker};
use tracing::info;

use crate::channels::TICK_SIGNAL;

/// Milliseconds on the executor's monotonic clock
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Tick task - sends periodic tick signals with a timestamp
#[embassy_executor::task]
pub async fn tick_task(interval_ms: u64) {
    info!(interval_ms, "tick loop started");

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms));

    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(now_ms());
    }
}
