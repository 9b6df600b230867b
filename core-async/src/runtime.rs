//! Executor entry points. Downstream crates reach Tokio's runtime only
//! through this module.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Drive `future` to completion on a new current-thread runtime with time
/// and IO enabled. Backs `#[core_async::test]`, `#[core_async::main]` and
/// sink delivery from threads that have no runtime.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("current-thread runtime")
        .block_on(future)
}
