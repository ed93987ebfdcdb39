//! Lane partitioning for deferred tasks.
//!
//! Conflicting tasks deferred during a drain are sorted by target id and then
//! spread across a fixed number of lanes by striding the sorted sequence:
//! lane `i` holds positions `i, i+4, i+8, ...`. The lane count is a fixed
//! scheduling policy, independent of the concurrency cap.

use crate::task::Task;

/// Number of interleaved lanes the pending queue is split into.
pub const LANE_COUNT: usize = 4;

/// Lane a position in the sorted pending queue is assigned to.
pub fn lane_of(position: usize) -> usize {
    position % LANE_COUNT
}

/// Sort a pending queue by ascending target id.
pub fn sort_pending<T: Task>(pending: &mut [T]) {
    pending.sort_by_key(|task| task.target_id());
}

/// Split an already-sorted pending queue into `LANE_COUNT` lanes by
/// positional stride. Pure partition; execution order is up to the caller.
pub fn split_lanes<T>(sorted: Vec<T>) -> [Vec<T>; LANE_COUNT] {
    let mut lanes: [Vec<T>; LANE_COUNT] = std::array::from_fn(|_| Vec::new());
    for (position, task) in sorted.into_iter().enumerate() {
        lanes[lane_of(position)].push(task);
    }
    lanes
}
