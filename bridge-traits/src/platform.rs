//! Thread-safety marker traits shared by every bridge trait.
//!
//! Bridge implementations are handed to background tasks and shared through
//! `Arc`, so they must be `Send + Sync`. Naming the bound once keeps the trait
//! definitions short and gives hosts a single place to look up the contract.

/// Marker trait for bridge objects shared across async tasks.
pub trait PlatformSendSync: Send + Sync {}

impl<T> PlatformSendSync for T where T: Send + Sync {}

/// Marker trait for bridge objects moved into async tasks.
pub trait PlatformSend: Send {}

impl<T> PlatformSend for T where T: Send {}
