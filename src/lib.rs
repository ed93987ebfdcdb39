//! Dispatchr - a bounded-concurrency task dispatcher
//!
//! Dispatchr drains an incremental stream of tasks and drives them through an
//! external executor, never running two tasks for the same target resource at
//! once and never exceeding the configured concurrency cap. Same-target
//! conflicts are deferred and replayed as four interleaved lanes.

pub mod error;
pub mod executor;
pub mod scheduler;
pub mod task;

pub use error::{DispatchError, Result};
pub use executor::Executor;
pub use scheduler::{Scheduler, run};
pub use task::{Task, TargetId};
