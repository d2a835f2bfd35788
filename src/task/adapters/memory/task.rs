//! In-memory task store for tests and local runs.
//!
//! Tasks and their activity log share one lock so deleting a task removes its
//! activities in the same step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    agent::domain::AgentId,
    project::domain::ProjectId,
    task::{
        domain::{
            ActivityId, NewTask, NewTaskActivity, PersistedTaskActivityData, PersistedTaskData,
            Task, TaskActivity, TaskFilter, TaskId, TaskStatus, TaskStatusCounts,
        },
        ports::{TaskActivityLog, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
    user::domain::UserId,
};

/// Thread-safe in-memory task repository and activity log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    last_task_id: i64,
    last_activity_id: i64,
    tasks: BTreeMap<TaskId, Task>,
    activities: BTreeMap<ActivityId, TaskActivity>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    /// Rewrites one stored task through its persisted representation.
    fn modify(
        &self,
        id: TaskId,
        change: impl FnOnce(&mut PersistedTaskData),
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        let slot = state
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        let mut data = to_persisted(slot);
        change(&mut data);
        *slot = Task::from_persisted(data);
        Ok(slot.clone())
    }
}

fn to_persisted(task: &Task) -> PersistedTaskData {
    PersistedTaskData {
        id: task.id(),
        project_id: task.project_id(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status(),
        priority: task.priority(),
        assigned_agent_id: task.assigned_agent_id(),
        reviewer_id: task.reviewer_id(),
        created_by: task.created_by(),
        tags: task.tags().to_vec(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn create(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let mut state = self.write()?;
        state.last_task_id += 1;
        let stored = Task::from_persisted(PersistedTaskData {
            id: TaskId::new(state.last_task_id),
            project_id: task.project_id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: TaskStatus::Open,
            priority: task.priority,
            assigned_agent_id: task.assigned_agent_id,
            reviewer_id: task.reviewer_id,
            created_by: task.created_by,
            tags: task.tags.clone(),
            created_at: task.created_at,
            updated_at: task.created_at,
        });
        state.tasks.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        Ok(self
            .read()?
            .tasks
            .values()
            .rev()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn update_details(&self, task: &Task) -> TaskRepositoryResult<()> {
        self.modify(task.id(), |data| {
            data.title = task.title().to_owned();
            data.description = task.description().to_owned();
            data.priority = task.priority();
            data.tags = task.tags().to_vec();
            data.updated_at = task.updated_at();
        })?;
        Ok(())
    }

    async fn compare_and_set_status(
        &self,
        id: TaskId,
        expected: TaskStatus,
        new_status: TaskStatus,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Option<Task>> {
        let mut state = self.write()?;
        let Some(slot) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if slot.status() != expected {
            return Ok(None);
        }
        let mut data = to_persisted(slot);
        data.status = new_status;
        data.updated_at = at;
        *slot = Task::from_persisted(data);
        Ok(Some(slot.clone()))
    }

    async fn set_assigned_agent(
        &self,
        id: TaskId,
        agent_id: AgentId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.modify(id, |data| {
            data.assigned_agent_id = Some(agent_id);
            data.updated_at = at;
        })
    }

    async fn set_reviewer(
        &self,
        id: TaskId,
        reviewer_id: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.modify(id, |data| {
            data.reviewer_id = Some(reviewer_id);
            data.updated_at = at;
        })
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.activities.retain(|_, activity| activity.task_id() != id);
        Ok(())
    }

    async fn count_by_status(
        &self,
        project_id: ProjectId,
    ) -> TaskRepositoryResult<TaskStatusCounts> {
        let state = self.read()?;
        let mut counts = TaskStatusCounts::default();
        for task in state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id)
        {
            counts.add(task.status(), 1);
        }
        Ok(counts)
    }
}

#[async_trait]
impl TaskActivityLog for InMemoryTaskStore {
    async fn append(&self, activity: &NewTaskActivity) -> TaskRepositoryResult<TaskActivity> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&activity.task_id) {
            return Err(TaskRepositoryError::NotFound(activity.task_id));
        }
        state.last_activity_id += 1;
        let stored = TaskActivity::from_persisted(PersistedTaskActivityData {
            id: ActivityId::new(state.last_activity_id),
            task_id: activity.task_id,
            actor: activity.actor,
            action: activity.action,
            old_value: activity.old_value.clone(),
            new_value: activity.new_value.clone(),
            message: activity.message.clone(),
            created_at: activity.created_at,
        });
        state.activities.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn list_for_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskActivity>> {
        let state = self.read()?;
        let mut activities: Vec<TaskActivity> = state
            .activities
            .values()
            .filter(|activity| activity.task_id() == task_id)
            .cloned()
            .collect();
        activities.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| right.id().cmp(&left.id()))
        });
        Ok(activities)
    }
}
