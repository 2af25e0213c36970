use std::future::Future;

use crate::error::{LlmError, LlmResult};

/// Execute an async operation using the current runtime or creating a new one.
///
/// Inside a multi-threaded runtime the current worker is handed over with
/// `block_in_place`; outside of one a short-lived runtime is built.
pub(crate) fn run_async<F, Fut, T>(f: F) -> LlmResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = LlmResult<T>>,
{
    if tokio::runtime::Handle::try_current().is_ok() {
        tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(f()))
    } else {
        match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(f()),
            Err(e) => Err(LlmError::Runtime(e.to_string())),
        }
    }
}
