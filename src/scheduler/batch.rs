//! Joint-await batch of in-flight executor calls.
//!
//! Every "await all in-flight, then clear" flush point in the scheduler goes
//! through a `Batch`: dispatch pushes an executor future, flush drives all of
//! them to completion and surfaces the first failure. The batch is polled on
//! the scheduler's single logical thread; nothing is spawned.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::Result;

/// A group of in-flight executor invocations awaited jointly.
pub struct Batch<'a> {
    in_flight: FuturesUnordered<BoxFuture<'a, Result<()>>>,
}

impl<'a> Batch<'a> {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self {
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Number of invocations currently in flight.
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Add an executor invocation to the in-flight set.
    pub fn dispatch(&mut self, work: BoxFuture<'a, Result<()>>) {
        self.in_flight.push(work);
    }

    /// Await every in-flight invocation, leaving the batch empty.
    ///
    /// The first failure aborts the wait; invocations still in flight at that
    /// point are dropped without their outcomes being observed.
    pub async fn flush(&mut self) -> Result<()> {
        while let Some(outcome) = self.in_flight.next().await {
            if let Err(err) = outcome {
                self.in_flight.clear();
                return Err(err);
            }
        }
        Ok(())
    }
}

impl Default for Batch<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;

    use futures::FutureExt;

    #[tokio::test]
    async fn test_flush_empty_batch() {
        let mut batch = Batch::new();
        assert!(batch.is_empty());
        assert!(batch.flush().await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_and_flush() {
        let mut batch = Batch::new();
        batch.dispatch(async { Ok::<(), DispatchError>(()) }.boxed());
        batch.dispatch(async { Ok::<(), DispatchError>(()) }.boxed());
        assert_eq!(batch.len(), 2);

        batch.flush().await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn test_flush_surfaces_first_failure() {
        let mut batch = Batch::new();
        batch.dispatch(async { Ok::<(), DispatchError>(()) }.boxed());
        batch.dispatch(async { Err(DispatchError::TaskFailed("boom".to_string())) }.boxed());

        let err = batch.flush().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        // Failed flush leaves no stragglers behind.
        assert!(batch.is_empty());
    }
}
