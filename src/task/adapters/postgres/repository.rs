//! `PostgreSQL` repository implementation for tasks and their activity log.

use super::{
    models::{NewTaskActivityRow, NewTaskRow, TaskActivityRow, TaskRow},
    schema::{task_activities, tasks},
};
use crate::{
    actor::Actor,
    agent::domain::AgentId,
    project::domain::ProjectId,
    task::{
        domain::{
            ActivityAction, ActivityId, NewTask, NewTaskActivity, PersistedTaskActivityData,
            PersistedTaskData, Task, TaskActivity, TaskFilter, TaskId, TaskPriority, TaskStatus,
            TaskStatusCounts,
        },
        ports::{TaskActivityLog, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
    user::domain::UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository and activity log.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn create(&self, task: &NewTask) -> TaskRepositoryResult<Task> {
        let new_row = NewTaskRow {
            project_id: task.project_id.value(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: TaskStatus::Open.as_str().to_owned(),
            priority: task.priority.as_str().to_owned(),
            assigned_agent_id: task.assigned_agent_id.map(AgentId::value),
            reviewer_id: task.reviewer_id.map(UserId::value),
            created_by: task.created_by.id_value(),
            creator_type: task.created_by.kind().as_str().to_owned(),
            tags: task.tags.clone(),
            created_at: task.created_at,
            updated_at: task.created_at,
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(project_id) = filter.project_id {
                query = query.filter(tasks::project_id.eq(project_id.value()));
            }
            if let Some(status) = filter.status {
                query = query.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(priority) = filter.priority {
                query = query.filter(tasks::priority.eq(priority.as_str()));
            }
            if let Some(agent_id) = filter.assigned_agent_id {
                query = query.filter(tasks::assigned_agent_id.eq(agent_id.value()));
            }
            if let Some(reviewer_id) = filter.reviewer_id {
                query = query.filter(tasks::reviewer_id.eq(reviewer_id.value()));
            }
            let rows = query
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update_details(&self, task: &Task) -> TaskRepositoryResult<()> {
        let id = task.id();
        let title = task.title().to_owned();
        let description = task.description().to_owned();
        let priority = task.priority().as_str().to_owned();
        let tags = task.tags().to_vec();
        let updated_at = task.updated_at();

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(tasks::table.filter(tasks::id.eq(id.value())))
                .set((
                    tasks::title.eq(&title),
                    tasks::description.eq(&description),
                    tasks::priority.eq(&priority),
                    tasks::tags.eq(&tags),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn compare_and_set_status(
        &self,
        id: TaskId,
        expected: TaskStatus,
        new_status: TaskStatus,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.value()))
                    .filter(tasks::status.eq(expected.as_str())),
            )
            .set((
                tasks::status.eq(new_status.as_str()),
                tasks::updated_at.eq(at),
            ))
            .returning(TaskRow::as_returning())
            .get_result::<TaskRow>(connection)
            .optional()
            .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn set_assigned_agent(
        &self,
        id: TaskId,
        agent_id: AgentId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let row = diesel::update(tasks::table.filter(tasks::id.eq(id.value())))
                .set((
                    tasks::assigned_agent_id.eq(Some(agent_id.value())),
                    tasks::updated_at.eq(at),
                ))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn set_reviewer(
        &self,
        id: TaskId,
        reviewer_id: UserId,
        at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            let row = diesel::update(tasks::table.filter(tasks::id.eq(id.value())))
                .set((
                    tasks::reviewer_id.eq(Some(reviewer_id.value())),
                    tasks::updated_at.eq(at),
                ))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(id))
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(id.value())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn count_by_status(
        &self,
        project_id: ProjectId,
    ) -> TaskRepositoryResult<TaskStatusCounts> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.value()))
                .group_by(tasks::status)
                .select((tasks::status, diesel::dsl::count_star()))
                .load::<(String, i64)>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let mut counts = TaskStatusCounts::default();
            for (status, count) in rows {
                let parsed = TaskStatus::try_from(status.as_str())
                    .map_err(TaskRepositoryError::invalid_persisted_data)?;
                let amount = u64::try_from(count).map_err(TaskRepositoryError::invalid_persisted_data)?;
                counts.add(parsed, amount);
            }
            Ok(counts)
        })
        .await
    }
}

#[async_trait]
impl TaskActivityLog for PostgresTaskStore {
    async fn append(&self, activity: &NewTaskActivity) -> TaskRepositoryResult<TaskActivity> {
        let task_id = activity.task_id;
        let new_row = NewTaskActivityRow {
            task_id: task_id.value(),
            actor_id: activity.actor.id_value(),
            actor_type: activity.actor.kind().as_str().to_owned(),
            action: activity.action.as_str().to_owned(),
            old_value: activity.old_value.clone(),
            new_value: activity.new_value.clone(),
            message: activity.message.clone(),
            created_at: activity.created_at,
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(task_activities::table)
                .values(&new_row)
                .returning(TaskActivityRow::as_returning())
                .get_result::<TaskActivityRow>(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        TaskRepositoryError::NotFound(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            row_to_activity(row)
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> TaskRepositoryResult<Vec<TaskActivity>> {
        self.run_blocking(move |connection| {
            let rows = task_activities::table
                .filter(task_activities::task_id.eq(task_id.value()))
                .order((
                    task_activities::created_at.desc(),
                    task_activities::id.desc(),
                ))
                .select(TaskActivityRow::as_select())
                .load::<TaskActivityRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_activity).collect()
        })
        .await
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        title,
        description,
        status,
        priority,
        assigned_agent_id,
        reviewer_id,
        created_by,
        creator_type,
        tags,
        created_at,
        updated_at,
    } = row;

    let parsed_status =
        TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::invalid_persisted_data)?;
    let parsed_priority = TaskPriority::try_from(priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let creator = Actor::from_parts(&creator_type, created_by)
        .map_err(TaskRepositoryError::invalid_persisted_data)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        project_id: ProjectId::new(project_id),
        title,
        description,
        status: parsed_status,
        priority: parsed_priority,
        assigned_agent_id: assigned_agent_id.map(AgentId::new),
        reviewer_id: reviewer_id.map(UserId::new),
        created_by: creator,
        tags,
        created_at,
        updated_at,
    }))
}

fn row_to_activity(row: TaskActivityRow) -> TaskRepositoryResult<TaskActivity> {
    let actor = Actor::from_parts(&row.actor_type, row.actor_id)
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let action = ActivityAction::try_from(row.action.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    Ok(TaskActivity::from_persisted(PersistedTaskActivityData {
        id: ActivityId::new(row.id),
        task_id: TaskId::new(row.task_id),
        actor,
        action,
        old_value: row.old_value,
        new_value: row.new_value,
        message: row.message,
        created_at: row.created_at,
    }))
}
