//! Bridging the synchronous provider trait onto async HTTP clients

use crate::LlmError;
use std::future::Future;
use tokio::runtime::{Builder, Handle};

/// Drive `future` to completion from synchronous code
///
/// Inside a tokio runtime this must be called from a blocking context
/// (`spawn_blocking`), which is how the extraction invoker calls providers.
/// Outside any runtime a private current-thread runtime is built for the call.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    match Handle::try_current() {
        Ok(handle) => Ok(handle.block_on(future)),
        Err(_) => {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to create runtime: {}", e)))?;
            Ok(runtime.block_on(future))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_on_without_runtime() {
        let value = block_on(async { 21 * 2 }).unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_block_on_from_blocking_task() {
        let value = tokio::task::spawn_blocking(|| block_on(async { "ok" }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value, "ok");
    }
}
