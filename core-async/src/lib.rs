//! Async abstraction layer for the music session core.
//!
//! Every other crate in the workspace spawns, sleeps and synchronizes
//! through this crate instead of naming Tokio directly.
//!
//! # Modules
//!
//! - `task`: Task spawning and execution
//! - `time`: Sleep, intervals, timeouts and instants
//! - `sync`: Channels, locks and cancellation tokens
//! - `runtime`: Runtime handles and `block_on`
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(10)).await;
//!         42
//!     });
//!     assert_eq!(handle.await.unwrap(), 42);
//! }
//! ```

pub use core_async_macros::{main, test};

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};

pub use tokio::select;
