//! Task abstraction.
//!
//! A task is opaque to the scheduler: the only thing it reads is the target
//! identifier, which names the resource the task will mutate. Two tasks with
//! equal target ids conflict and must never be in flight at the same time
//! within a dispatch round.

/// Identifier of the resource a task affects.
pub type TargetId = u64;

/// An opaque unit of work tied to a target resource.
///
/// The scheduler owns a task only between pulling it from the source and
/// handing it to the executor; it keeps no shared state on it.
pub trait Task: Send + 'static {
    /// The target resource this task will affect.
    fn target_id(&self) -> TargetId;
}

impl Task for TargetId {
    fn target_id(&self) -> TargetId {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Labeled {
        target: TargetId,
        #[allow(dead_code)]
        label: String,
    }

    impl Task for Labeled {
        fn target_id(&self) -> TargetId {
            self.target
        }
    }

    #[test]
    fn test_target_id_is_a_task() {
        let t: TargetId = 7;
        assert_eq!(t.target_id(), 7);
    }

    #[test]
    fn test_custom_task_type() {
        let t = Labeled {
            target: 3,
            label: "compact segment 3".to_string(),
        };
        assert_eq!(t.target_id(), 3);
    }
}
