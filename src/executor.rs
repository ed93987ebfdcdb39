//! Executor capability trait.
//!
//! The executor is external: it performs a task's work and signals completion
//! or failure. The scheduler invokes it once per task and awaits the result,
//! either individually or as part of a joint batch wait. Failures are not
//! caught; the first one observed aborts the run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DispatchError, Result};
use crate::task::{Task, TargetId};

/// External capability that performs a task's work.
#[async_trait]
pub trait Executor<T: Task>: Send + Sync {
    /// Perform the task's work; resolves on completion, errors on failure.
    async fn execute_task(&self, task: T) -> Result<()>;
}

/// Recording executor for tests.
///
/// Tracks every dispatch, the global in-flight high-water mark, and whether
/// two tasks for the same target were ever in flight at once. Optionally
/// delays each task and fails on a chosen target.
#[derive(Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<MockState>>,
    /// Simulated per-task work duration.
    delay: Option<Duration>,
    /// Target id whose task should fail.
    fail_on: Option<TargetId>,
}

#[derive(Default)]
struct MockState {
    started: Vec<TargetId>,
    in_flight: HashMap<TargetId, usize>,
    in_flight_total: usize,
    max_in_flight: usize,
    target_overlap: bool,
}

impl MockExecutor {
    /// Create a mock that completes every task immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay each task by `delay` before completing it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the task whose target id equals `target`.
    pub fn with_failure_on(mut self, target: TargetId) -> Self {
        self.fail_on = Some(target);
        self
    }

    /// Target ids in the order their tasks were dispatched.
    pub fn started(&self) -> Vec<TargetId> {
        self.state.lock().unwrap().started.clone()
    }

    /// Total number of executor invocations so far.
    pub fn started_count(&self) -> usize {
        self.state.lock().unwrap().started.len()
    }

    /// Highest number of tasks ever observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    /// Whether two same-target tasks were ever in flight simultaneously.
    pub fn saw_target_overlap(&self) -> bool {
        self.state.lock().unwrap().target_overlap
    }
}

#[async_trait]
impl<T: Task> Executor<T> for MockExecutor {
    async fn execute_task(&self, task: T) -> Result<()> {
        let target = task.target_id();

        {
            let mut state = self.state.lock().unwrap();
            state.started.push(target);
            let per_target = state.in_flight.entry(target).or_insert(0);
            *per_target += 1;
            if *per_target > 1 {
                state.target_overlap = true;
            }
            state.in_flight_total += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight_total);
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        } else {
            // Let sibling futures in the batch start before this one retires.
            tokio::task::yield_now().await;
        }

        {
            let mut state = self.state.lock().unwrap();
            if let Some(per_target) = state.in_flight.get_mut(&target) {
                *per_target -= 1;
            }
            state.in_flight_total -= 1;
        }

        if self.fail_on == Some(target) {
            return Err(DispatchError::TaskFailed(format!("mock failure on target {target}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_dispatches() {
        let mock = MockExecutor::new();
        mock.execute_task(5u64).await.unwrap();
        mock.execute_task(9u64).await.unwrap();

        assert_eq!(mock.started(), vec![5, 9]);
        assert_eq!(mock.started_count(), 2);
        assert!(!mock.saw_target_overlap());
    }

    #[tokio::test]
    async fn test_mock_failure_on_target() {
        let mock = MockExecutor::new().with_failure_on(3);
        assert!(mock.execute_task(1u64).await.is_ok());

        let err = mock.execute_task(3u64).await.unwrap_err();
        assert!(matches!(err, DispatchError::TaskFailed(_)));
        assert!(err.to_string().contains("target 3"));
    }

    #[tokio::test]
    async fn test_mock_tracks_concurrency() {
        use futures::stream::{FuturesUnordered, StreamExt};

        let mock = MockExecutor::new().with_delay(Duration::from_millis(10));
        let batch: FuturesUnordered<_> =
            (0u64..3).map(|t| mock.execute_task(t)).collect();
        let results: Vec<_> = batch.collect().await;

        assert!(results.into_iter().all(|r| r.is_ok()));
        assert_eq!(mock.max_in_flight(), 3);
        assert!(!mock.saw_target_overlap());
    }
}
