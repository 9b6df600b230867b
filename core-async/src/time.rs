//! Time-related abstractions.
//!
//! Timers come from `tokio::time`, so tests can pause and advance the clock
//! with `tokio::time::pause` when the `test-util` feature is enabled.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(10)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(10));
//! }
//! ```

pub use tokio::time::{
    interval, sleep, sleep_until, timeout, Interval, MissedTickBehavior, Sleep, Timeout,
};

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Monotonic instant that follows Tokio's (pausable) clock.
pub use tokio::time::Instant;

/// Returns the current time as milliseconds since UNIX_EPOCH.
///
/// # Examples
///
/// ```rust
/// use core_async::time::now_millis;
///
/// let timestamp = now_millis();
/// assert!(timestamp > 0);
/// ```
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
