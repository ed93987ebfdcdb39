//! Plan file model and demo executor for the CLI.
//!
//! A plan is a JSON array of tasks, each naming the target it touches and an
//! optional simulated work duration.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use dispatchr::{DispatchError, Executor, Result, Task, TargetId};

/// One task from a plan file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTask {
    /// Target resource this task affects.
    pub target_id: TargetId,
    /// Optional human-readable label.
    #[serde(default)]
    pub label: Option<String>,
    /// Simulated work duration in milliseconds.
    #[serde(default)]
    pub duration_ms: u64,
}

impl Task for PlanTask {
    fn target_id(&self) -> TargetId {
        self.target_id
    }
}

impl PlanTask {
    /// Label if present, otherwise a target-based fallback.
    pub fn display_name(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("task@{}", self.target_id))
    }
}

/// Load a plan file, rejecting plans with no tasks.
pub fn load_plan(path: &Path) -> Result<Vec<PlanTask>> {
    let raw = std::fs::read_to_string(path)?;
    let tasks: Vec<PlanTask> = serde_json::from_str(&raw)?;

    if tasks.is_empty() {
        return Err(DispatchError::Plan(format!("{} contains no tasks", path.display())));
    }

    Ok(tasks)
}

/// Executor that simulates each task's work by sleeping for its duration.
pub struct SleepExecutor;

#[async_trait]
impl Executor<PlanTask> for SleepExecutor {
    async fn execute_task(&self, task: PlanTask) -> Result<()> {
        log::info!(
            "executing {} (target {}, {}ms)",
            task.display_name(),
            task.target_id,
            task.duration_ms
        );
        tokio::time::sleep(Duration::from_millis(task.duration_ms)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_plan(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("plan.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_plan() {
        let dir = TempDir::new().unwrap();
        let path = write_plan(
            &dir,
            r#"[
                {"target_id": 1, "label": "migrate shard 1", "duration_ms": 5},
                {"target_id": 2}
            ]"#,
        );

        let tasks = load_plan(&path).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].target_id(), 1);
        assert_eq!(tasks[0].display_name(), "migrate shard 1");
        assert_eq!(tasks[1].duration_ms, 0);
        assert_eq!(tasks[1].display_name(), "task@2");
    }

    #[test]
    fn test_load_plan_rejects_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_plan(&dir, "[]");

        let err = load_plan(&path).unwrap_err();
        assert!(matches!(err, DispatchError::Plan(_)));
    }

    #[test]
    fn test_load_plan_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = write_plan(&dir, "{not json");

        let err = load_plan(&path).unwrap_err();
        assert!(matches!(err, DispatchError::Json(_)));
    }

    #[tokio::test]
    async fn test_sleep_executor_completes() {
        let task = PlanTask {
            target_id: 9,
            label: None,
            duration_ms: 1,
        };
        SleepExecutor.execute_task(task).await.unwrap();
    }
}
