//! Scheduler module - the core dispatch algorithm.
//!
//! This module provides:
//! - **Lane partitioning**: Sorting deferred tasks by target id and striding
//!   them into 4 fixed lanes.
//! - **Batch**: The joint-await group of in-flight executor calls, with
//!   first-failure propagation.
//! - **Scheduler**: The drain/defer/lane/flush loop in its two strategies,
//!   unbounded (`max_threads == 0`) and bounded.
//!
//! # Architecture
//!
//! The scheduler is a single logical thread of control:
//! 1. Tasks are pulled from the source one at a time.
//! 2. First-seen targets dispatch into the in-flight batch; same-target
//!    repeats are deferred to a pending queue.
//! 3. At a flush point, every in-flight call is awaited jointly.
//! 4. Once a round's intake ends, the pending queue is sorted and replayed
//!    across 4 interleaved lanes.
//!
//! # Example
//!
//! ```ignore
//! use dispatchr::scheduler::run;
//!
//! let source = futures::stream::iter(tasks);
//! run(&executor, source, 4).await?;
//! ```

mod batch;
mod lanes;
mod run;

pub use batch::Batch;
pub use lanes::{LANE_COUNT, lane_of, sort_pending, split_lanes};
pub use run::{Scheduler, run};
