//! Service layer for task status transitions and the activity trail.
//!
//! Every transition is a compare-and-swap on the stored status. When another
//! writer wins the race the task is re-read and the transition re-evaluated
//! against the fresh status.

use crate::{
    actor::Actor,
    task::{
        domain::{
            NewTaskActivity, Task, TaskActivity, TaskDomainError, TaskId, TaskStatus,
            TaskTransition, validate_progress_message, validate_transition_message,
        },
        ports::{TaskActivityLog, TaskRepository, TaskRepositoryError},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Attempts made before a contended transition gives up.
const MAX_TRANSITION_ATTEMPTS: usize = 3;

/// Activity message used when an agent completes a task without one.
pub const AGENT_COMPLETION_MESSAGE: &str = "Task completed by agent";

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The task kept changing underneath the transition.
    #[error("task {0} changed concurrently")]
    Contention(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task status state machine and activity log orchestration.
#[derive(Clone)]
pub struct TaskLifecycleService<R, L, C>
where
    R: TaskRepository + ?Sized,
    L: TaskActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    activities: Arc<L>,
    clock: Arc<C>,
}

impl<R, L, C> TaskLifecycleService<R, L, C>
where
    R: TaskRepository + ?Sized,
    L: TaskActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<R>, activities: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            activities,
            clock,
        }
    }

    /// Applies a status transition and records it in the activity log.
    ///
    /// A blank or absent `message` is replaced by the transition's default.
    /// Failing to append the activity after the status was written is logged
    /// and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist, [`TaskDomainError::InvalidTransition`] when the current
    /// status has no matching edge, [`TaskDomainError::InvalidMessage`] when
    /// the message is longer than 1000 characters, and
    /// [`TaskLifecycleError::Contention`] when concurrent writers keep
    /// winning the race.
    pub async fn transition(
        &self,
        task_id: TaskId,
        transition: TaskTransition,
        actor: Actor,
        message: Option<&str>,
    ) -> TaskLifecycleResult<Task> {
        let note = validate_transition_message(message)?
            .unwrap_or_else(|| transition.default_message().to_owned());
        self.apply_transition(task_id, transition, actor, note).await
    }

    /// Completes a task on behalf of an agent, but only while it is
    /// `in_progress`.
    ///
    /// Returns `Ok(None)` and leaves the task untouched in any other status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not exist, the
    /// message is too long, or persistence fails.
    pub async fn complete_if_in_progress(
        &self,
        task_id: TaskId,
        actor: Actor,
        message: Option<&str>,
    ) -> TaskLifecycleResult<Option<Task>> {
        let note = validate_transition_message(message)?
            .unwrap_or_else(|| AGENT_COMPLETION_MESSAGE.to_owned());
        let task = self.load(task_id).await?;
        if task.status() != TaskStatus::InProgress {
            return Ok(None);
        }

        match self
            .apply_transition(task_id, TaskTransition::Complete, actor, note)
            .await
        {
            Ok(completed) => Ok(Some(completed)),
            Err(TaskLifecycleError::Domain(TaskDomainError::InvalidTransition { .. })) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Records a progress note on a task.
    ///
    /// Unlike transition activities, the note is the primary effect so a
    /// failed append is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidMessage`] when the note is empty or
    /// longer than 2000 characters, or a repository error when the task does
    /// not exist or the append fails.
    pub async fn add_progress(
        &self,
        task_id: TaskId,
        actor: Actor,
        message: &str,
    ) -> TaskLifecycleResult<TaskActivity> {
        let note = validate_progress_message(message)?;
        self.load(task_id).await?;
        let activity = NewTaskActivity::progress(task_id, actor, note, self.clock.utc());
        Ok(self.activities.append(&activity).await?)
    }

    /// Returns the activity trail of a task, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    pub async fn list_activities(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<TaskActivity>> {
        self.load(task_id).await?;
        Ok(self.activities.list_for_task(task_id).await?)
    }

    async fn apply_transition(
        &self,
        task_id: TaskId,
        transition: TaskTransition,
        actor: Actor,
        note: String,
    ) -> TaskLifecycleResult<Task> {
        for _ in 0..MAX_TRANSITION_ATTEMPTS {
            let current = self.load(task_id).await?;
            let from = current.status();
            let target = transition.check(task_id, from)?;
            let at = self.clock.utc();

            let Some(updated) = self
                .tasks
                .compare_and_set_status(task_id, from, target, at)
                .await?
            else {
                tracing::debug!(task_id = %task_id, %transition, "status changed concurrently, re-reading");
                continue;
            };

            let activity =
                NewTaskActivity::status_changed(task_id, actor, from, target, note, at);
            self.record_best_effort(&activity).await;
            tracing::info!(
                task_id = %task_id,
                %actor,
                from = from.as_str(),
                to = target.as_str(),
                "task transition applied"
            );
            return Ok(updated);
        }
        Err(TaskLifecycleError::Contention(task_id))
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskRepositoryError::NotFound(task_id).into())
    }

    async fn record_best_effort(&self, activity: &NewTaskActivity) {
        if let Err(err) = self.activities.append(activity).await {
            tracing::warn!(
                task_id = %activity.task_id,
                action = activity.action.as_str(),
                error = %err,
                "failed to record task activity"
            );
        }
    }
}
