//! Host Lifecycle Observation
//!
//! Lets the core react to the host tearing down its UI task while a playback
//! session is still running.

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Application is in the foreground and active
    Foreground,
    /// Application UI is hidden but the process keeps running
    Background,
    /// The user removed the application task (e.g. swiped it away); the
    /// session should stop and retract its notification
    TaskRemoved,
}

/// Lifecycle observer trait
///
/// # Platform Support
///
/// - **Android**: `onTaskRemoved` / activity lifecycle callbacks
/// - **iOS**: UIApplication lifecycle notifications
/// - **Desktop**: window close events (usually never reports `TaskRemoved`)
///
/// # Example
///
/// ```ignore
/// use bridge_traits::lifecycle::{LifecycleObserver, LifecycleState};
///
/// async fn watch(observer: &dyn LifecycleObserver) -> Result<()> {
///     let mut stream = observer.subscribe_changes().await?;
///     while let Some(state) = stream.next().await {
///         if state == LifecycleState::TaskRemoved {
///             stop_session().await;
///         }
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait LifecycleObserver: PlatformSendSync {
    /// Get current lifecycle state
    async fn get_state(&self) -> Result<LifecycleState>;

    /// Subscribe to lifecycle state changes
    async fn subscribe_changes(&self) -> Result<Box<dyn LifecycleChangeStream>>;
}

/// Stream of lifecycle state changes
#[async_trait::async_trait]
pub trait LifecycleChangeStream: PlatformSend {
    /// Get the next lifecycle state update
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<LifecycleState>;
}
