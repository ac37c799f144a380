//! 异步与并行执行：单个非阻塞操作及保持顺序、快速失败的批量执行。
//!
//! Async and parallel dispatch.
//!
//! [`FloraClient::execute_async`] spawns one operation on the current Tokio
//! runtime and returns immediately. [`FloraClient::execute_many`] composes it:
//! every operation runs concurrently, results come back in submission order,
//! and the first failure fails the whole batch.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::try_join_all;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::warn;

use crate::client::core::FloraClient;
use crate::descriptor::OperationDescriptor;
use crate::response::Payload;
use crate::{Error, ErrorContext, Result};

/// Handle to an operation running in the background. Resolves to its result.
///
/// Dropping the handle detaches the operation; it is not cancelled.
#[derive(Debug)]
pub struct PendingOperation {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    Spawned(JoinHandle<Result<Payload>>),
    Failed(Option<Error>),
}

impl PendingOperation {
    /// Cancel the operation if it is still running.
    pub fn abort(&self) {
        if let Inner::Spawned(handle) = &self.inner {
            handle.abort();
        }
    }

    fn abort_handle(&self) -> Option<AbortHandle> {
        match &self.inner {
            Inner::Spawned(handle) => Some(handle.abort_handle()),
            Inner::Failed(_) => None,
        }
    }
}

impl Future for PendingOperation {
    type Output = Result<Payload>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.inner {
            Inner::Spawned(handle) => match Pin::new(handle).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(join_error)) => Poll::Ready(Err(Error::runtime_with_context(
                    "operation task did not complete",
                    ErrorContext::new()
                        .with_details(join_error.to_string())
                        .with_source("dispatch"),
                ))),
                Poll::Pending => Poll::Pending,
            },
            Inner::Failed(err) => Poll::Ready(Err(err
                .take()
                .unwrap_or_else(|| Error::runtime("operation polled after completion")))),
        }
    }
}

impl FloraClient {
    /// Start one operation without waiting for it.
    ///
    /// Requires a Tokio runtime; without one the returned handle resolves to
    /// a runtime error.
    pub fn execute_async(&self, op: OperationDescriptor) -> PendingOperation {
        let inner = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let client = self.clone();
                Inner::Spawned(runtime.spawn(async move { client.execute(op).await }))
            }
            Err(_) => Inner::Failed(Some(Error::runtime(
                "execute_async requires a Tokio runtime",
            ))),
        };
        PendingOperation { inner }
    }

    /// Run operations concurrently; results follow input order.
    ///
    /// The first error observed fails the batch and cancels the operations
    /// still running. No partial results are returned.
    pub async fn execute_many(&self, ops: Vec<OperationDescriptor>) -> Result<Vec<Payload>> {
        if ops.is_empty() {
            return Ok(Vec::new());
        }

        let total = ops.len();
        let pending: Vec<PendingOperation> =
            ops.into_iter().map(|op| self.execute_async(op)).collect();
        let abort_handles: Vec<AbortHandle> =
            pending.iter().filter_map(PendingOperation::abort_handle).collect();

        match try_join_all(pending).await {
            Ok(results) => Ok(results),
            Err(err) => {
                for handle in &abort_handles {
                    handle.abort();
                }
                warn!(batch_size = total, error = %err, "batch aborted on first failure");
                Err(err)
            }
        }
    }
}
