//! The dispatch loop: drain, defer, lane, flush.
//!
//! Two strategies share the same bookkeeping. Unbounded mode drains the whole
//! source in one round and replays deferred conflicts lane by lane. Bounded
//! mode runs in cycles, flushing the in-flight batch whenever it reaches the
//! cap, and pulls the tail of the source one task per cycle.

use std::collections::HashSet;

use futures::stream::{Stream, StreamExt};

use crate::error::Result;
use crate::executor::Executor;
use crate::scheduler::batch::Batch;
use crate::scheduler::lanes::{sort_pending, split_lanes};
use crate::task::{Task, TargetId};

/// Bounded-concurrency conflict-aware dispatcher.
///
/// `max_threads == 0` means no explicit concurrency limit; conflicting tasks
/// are still serialized and deferred work still fans out across 4 lanes.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    max_threads: usize,
}

impl Scheduler {
    /// Create a scheduler with the given concurrency cap (0 = unlimited).
    pub fn new(max_threads: usize) -> Self {
        Self { max_threads }
    }

    /// The configured concurrency cap.
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// Drive every task from `tasks` through `executor`.
    ///
    /// Returns once all tasks have been dispatched and awaited, or the first
    /// executor failure, which aborts the run. Tasks sharing a target id are
    /// never in flight together within a dispatch round, and the in-flight
    /// count never exceeds the cap.
    pub async fn run<T, E, S>(&self, executor: &E, tasks: S) -> Result<()>
    where
        T: Task,
        E: Executor<T>,
        S: Stream<Item = T> + Unpin,
    {
        tracing::debug!(max_threads = self.max_threads, "starting dispatch run");
        if self.max_threads == 0 {
            self.run_unbounded(executor, tasks).await
        } else {
            self.run_bounded(executor, tasks).await
        }
    }

    /// Unbounded mode: one round over the whole source, then the lanes.
    async fn run_unbounded<T, E, S>(&self, executor: &E, mut tasks: S) -> Result<()>
    where
        T: Task,
        E: Executor<T>,
        S: Stream<Item = T> + Unpin,
    {
        let mut in_flight = Batch::new();
        let mut pending: Vec<T> = Vec::new();
        let mut seen: HashSet<TargetId> = HashSet::new();

        while let Some(task) = tasks.next().await {
            let target = task.target_id();
            if seen.insert(target) {
                in_flight.dispatch(executor.execute_task(task));
            } else {
                tracing::debug!(target_id = target, "target already dispatched this round, deferring");
                pending.push(task);
            }
        }

        in_flight.flush().await?;

        sort_pending(&mut pending);
        tracing::debug!(deferred = pending.len(), "replaying deferred tasks lane by lane");

        for lane in split_lanes(pending) {
            // A whole lane runs as one wave; conflicts within a lane are not
            // re-checked beyond the round-level dedup above.
            for task in lane {
                in_flight.dispatch(executor.execute_task(task));
            }
            in_flight.flush().await?;
        }

        Ok(())
    }

    /// Bounded mode: cycles of drain, lane replay, and a one-task tail pull.
    async fn run_bounded<T, E, S>(&self, executor: &E, mut tasks: S) -> Result<()>
    where
        T: Task,
        E: Executor<T>,
        S: Stream<Item = T> + Unpin,
    {
        let max_threads = self.max_threads;
        let mut in_flight = Batch::new();
        let mut pending: Vec<T> = Vec::new();
        // Target dispatched by the previous cycle's tail pull; it counts as
        // already dispatched in the cycle that is about to start.
        let mut carried: Option<TargetId> = None;

        loop {
            let mut dispatched: HashSet<TargetId> = HashSet::new();
            if let Some(target) = carried.take() {
                dispatched.insert(target);
            }

            // Drain sub-round. The source is exhausted during the first
            // cycle, so this loop yields nothing on every later cycle and
            // the tail pull below is the only intake.
            while let Some(task) = tasks.next().await {
                let target = task.target_id();
                if dispatched.contains(&target) {
                    pending.push(task);
                    continue;
                }
                if in_flight.len() == max_threads {
                    in_flight.flush().await?;
                }
                dispatched.insert(target);
                in_flight.dispatch(executor.execute_task(task));
            }

            sort_pending(&mut pending);
            let lanes = split_lanes(std::mem::take(&mut pending));

            for lane in lanes {
                if lane.len() < max_threads {
                    // Small lane: a single wave behind a full barrier.
                    in_flight.flush().await?;
                    for task in lane {
                        in_flight.dispatch(executor.execute_task(task));
                    }
                    in_flight.flush().await?;
                } else {
                    // Lane at or above the cap: feed it through the cap with
                    // no end-of-lane barrier of its own.
                    for task in lane {
                        if in_flight.len() == max_threads {
                            in_flight.flush().await?;
                        }
                        in_flight.dispatch(executor.execute_task(task));
                    }
                }
            }

            in_flight.flush().await?;

            // Tail pull: one task starts the next cycle on its own.
            match tasks.next().await {
                Some(task) => {
                    let target = task.target_id();
                    tracing::debug!(target_id = target, "tail pull, starting new cycle");
                    carried = Some(target);
                    in_flight.dispatch(executor.execute_task(task));
                }
                None => break,
            }
        }

        Ok(())
    }
}

/// Dispatch every task from `tasks` through `executor`.
///
/// Convenience wrapper over [`Scheduler`]; `max_threads == 0` means no
/// explicit concurrency limit.
pub async fn run<T, E, S>(executor: &E, tasks: S, max_threads: usize) -> Result<()>
where
    T: Task,
    E: Executor<T>,
    S: Stream<Item = T> + Unpin,
{
    Scheduler::new(max_threads).run(executor, tasks).await
}
