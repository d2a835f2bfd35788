//! Append-only activity log port.

use super::TaskRepositoryResult;
use crate::task::domain::{NewTaskActivity, TaskActivity, TaskId};
use async_trait::async_trait;

/// Task activity log contract.
#[async_trait]
pub trait TaskActivityLog: Send + Sync {
    /// Appends an activity and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn append(&self, activity: &NewTaskActivity) -> TaskRepositoryResult<TaskActivity>;

    /// Returns the activities of a task, newest first.
    async fn list_for_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskActivity>>;
}
