//! Repository port for task persistence and lookup.

use crate::{
    agent::domain::AgentId,
    project::domain::ProjectId,
    task::domain::{NewTask, Task, TaskFilter, TaskId, TaskStatus, TaskStatusCounts},
    user::domain::UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task and returns it with its assigned identifier.
    async fn create(&self, task: &NewTask) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks matching `filter`, newest first.
    async fn list(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists the descriptive fields (title, description, priority, tags)
    /// and `updated_at` of a task. Status, assignment, and reviewer columns
    /// are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_details(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Atomically moves a task from `expected` to `new_status`.
    ///
    /// Returns the updated task, or `None` when the task does not exist or is
    /// no longer in `expected`.
    async fn compare_and_set_status(
        &self,
        id: TaskId,
        expected: TaskStatus,
        new_status: TaskStatus,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Option<Task>>;

    /// Sets the assigned agent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn set_assigned_agent(
        &self,
        id: TaskId,
        agent_id: AgentId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Sets the reviewer.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn set_reviewer(
        &self,
        id: TaskId,
        reviewer_id: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Deletes a task together with its activities.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Counts the tasks of a project per status.
    async fn count_by_status(&self, project_id: ProjectId)
    -> TaskRepositoryResult<TaskStatusCounts>;
}

/// Errors returned by task repository and activity log implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
