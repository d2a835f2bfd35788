//! Service layer for task creation, lookup, editing, and staffing.

use crate::{
    actor::Actor,
    agent::{
        domain::AgentId,
        ports::{AgentRepository, AgentRepositoryError},
    },
    project::{
        domain::ProjectId,
        ports::{ProjectRepository, ProjectRepositoryError},
    },
    task::{
        domain::{
            NewTask, NewTaskActivity, Task, TaskActivity, TaskDomainError, TaskFilter, TaskId,
            TaskPatch, TaskPriority,
        },
        ports::{TaskActivityLog, TaskRepository, TaskRepositoryError},
    },
    user::{
        domain::UserId,
        ports::{UserRepository, UserRepositoryError},
    },
};
use mockable::Clock;
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    title: String,
    description: String,
    priority: Option<TaskPriority>,
    assigned_agent_id: Option<AgentId>,
    reviewer_id: Option<UserId>,
    tags: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: String::new(),
            priority: None,
            assigned_agent_id: None,
            reviewer_id: None,
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Assigns an agent up front.
    #[must_use]
    pub const fn with_assigned_agent(mut self, agent_id: AgentId) -> Self {
        self.assigned_agent_id = Some(agent_id);
        self
    }

    /// Sets a reviewer up front.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer_id: UserId) -> Self {
        self.reviewer_id = Some(reviewer_id);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}

/// Task enriched with the display names of the records it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    /// The task itself.
    #[serde(flatten)]
    pub task: Task,
    /// Name of the owning project.
    pub project_name: Option<String>,
    /// Name of the assigned agent.
    pub assigned_agent_name: Option<String>,
    /// Username of the reviewer.
    pub reviewer_name: Option<String>,
    /// Username or agent name of the creator.
    pub creator_name: Option<String>,
}

/// Activity entry with the display name of whoever performed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDetails {
    /// The activity itself.
    #[serde(flatten)]
    pub activity: TaskActivity,
    /// Username or agent name of the actor.
    pub actor_name: Option<String>,
}

/// Service-level errors for task board operations.
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The agent does not exist or belongs to another project.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),
    /// The reviewer does not exist.
    #[error("reviewer not found: {0}")]
    ReviewerNotFound(UserId),
    /// Project lookup failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
    /// Agent lookup failed.
    #[error(transparent)]
    Agent(#[from] AgentRepositoryError),
    /// User lookup failed.
    #[error(transparent)]
    User(#[from] UserRepositoryError),
}

/// Result type for task board service operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;

/// Task CRUD and staffing orchestration service.
#[derive(Clone)]
pub struct TaskBoardService<R, L, P, A, U, C>
where
    R: TaskRepository + ?Sized,
    L: TaskActivityLog + ?Sized,
    P: ProjectRepository + ?Sized,
    A: AgentRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    activities: Arc<L>,
    projects: Arc<P>,
    agents: Arc<A>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<R, L, P, A, U, C> TaskBoardService<R, L, P, A, U, C>
where
    R: TaskRepository + ?Sized,
    L: TaskActivityLog + ?Sized,
    P: ProjectRepository + ?Sized,
    A: AgentRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task board service.
    #[must_use]
    pub const fn new(
        tasks: Arc<R>,
        activities: Arc<L>,
        projects: Arc<P>,
        agents: Arc<A>,
        users: Arc<U>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            activities,
            projects,
            agents,
            users,
            clock,
        }
    }

    /// Creates an `open` task and records a `created` activity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::ProjectNotFound`] when the project does not
    /// exist, [`TaskBoardError::AgentNotFound`] when the agent is unknown or
    /// belongs to another project, [`TaskBoardError::ReviewerNotFound`] when
    /// the reviewer is unknown, and [`TaskBoardError::Domain`] when the title
    /// or description fails validation.
    pub async fn create(&self, request: CreateTaskRequest, creator: Actor) -> TaskBoardResult<Task> {
        let CreateTaskRequest {
            project_id,
            title,
            description,
            priority,
            assigned_agent_id,
            reviewer_id,
            tags,
        } = request;

        let mut draft = NewTask::new(project_id, title, description, creator, &*self.clock)?
            .with_priority(priority.unwrap_or_default())
            .with_tags(tags);

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(TaskBoardError::ProjectNotFound(project_id));
        }
        if let Some(agent_id) = assigned_agent_id {
            self.project_agent_name(project_id, agent_id).await?;
            draft = draft.with_assigned_agent(agent_id);
        }
        if let Some(user_id) = reviewer_id {
            self.reviewer_name(user_id).await?;
            draft = draft.with_reviewer(user_id);
        }

        let task = self.tasks.create(&draft).await?;
        let activity =
            NewTaskActivity::created(task.id(), creator, task.title(), task.created_at());
        self.record_best_effort(&activity).await;
        tracing::info!(task_id = %task.id(), project_id = %project_id, %creator, "task created");
        Ok(task)
    }

    /// Loads a task that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    pub async fn get(&self, id: TaskId) -> TaskBoardResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskRepositoryError::NotFound(id).into())
    }

    /// Loads a task together with the names of the records it references.
    ///
    /// Names of records that no longer exist are reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    pub async fn details(&self, id: TaskId) -> TaskBoardResult<TaskDetails> {
        let task = self.get(id).await?;
        self.describe(task).await
    }

    /// Adds reference names to an already loaded task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError`] when a lookup fails at the persistence
    /// layer.
    pub async fn describe(&self, task: Task) -> TaskBoardResult<TaskDetails> {
        let project_name = self
            .projects
            .find_by_id(task.project_id())
            .await?
            .map(|project| project.name().to_owned());
        let assigned_agent_name = match task.assigned_agent_id() {
            Some(agent_id) => self.agent_name(agent_id).await?,
            None => None,
        };
        let reviewer_name = match task.reviewer_id() {
            Some(user_id) => self.username(user_id).await?,
            None => None,
        };
        let creator_name = self.actor_name(task.created_by()).await?;

        Ok(TaskDetails {
            task,
            project_name,
            assigned_agent_name,
            reviewer_name,
            creator_name,
        })
    }

    /// Adds the actor's display name to one activity entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError`] when a lookup fails at the persistence
    /// layer.
    pub async fn describe_activity(&self, activity: TaskActivity) -> TaskBoardResult<ActivityDetails> {
        let actor_name = self.actor_name(activity.actor()).await?;
        Ok(ActivityDetails {
            activity,
            actor_name,
        })
    }

    /// Adds actor display names to activity entries, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError`] when a lookup fails at the persistence
    /// layer.
    pub async fn describe_activities(
        &self,
        activities: Vec<TaskActivity>,
    ) -> TaskBoardResult<Vec<ActivityDetails>> {
        let mut names: HashMap<Actor, Option<String>> = HashMap::new();
        let mut details = Vec::with_capacity(activities.len());
        for activity in activities {
            let actor = activity.actor();
            let actor_name = match names.get(&actor) {
                Some(known) => known.clone(),
                None => {
                    let resolved = self.actor_name(actor).await?;
                    names.insert(actor, resolved.clone());
                    resolved
                }
            };
            details.push(ActivityDetails {
                activity,
                actor_name,
            });
        }
        Ok(details)
    }

    /// Returns the tasks matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when persistence lookup fails.
    pub async fn list(&self, filter: TaskFilter) -> TaskBoardResult<Vec<Task>> {
        Ok(self.tasks.list(filter).await?)
    }

    /// Returns the tasks of a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::ProjectNotFound`] when the project does not
    /// exist.
    pub async fn list_by_project(&self, project_id: ProjectId) -> TaskBoardResult<Vec<Task>> {
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(TaskBoardError::ProjectNotFound(project_id));
        }
        Ok(self.tasks.list(TaskFilter::for_project(project_id)).await?)
    }

    /// Applies a partial update to a task's descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError`] when the task does not exist or a field
    /// fails validation.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> TaskBoardResult<Task> {
        let mut task = self.get(id).await?;
        task.apply_patch(patch, &*self.clock)?;
        self.tasks.update_details(&task).await?;
        Ok(task)
    }

    /// Deletes a task and its activity trail.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist.
    pub async fn delete(&self, id: TaskId) -> TaskBoardResult<()> {
        self.tasks.delete(id).await?;
        tracing::info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Assigns an agent of the task's project and records an `assigned`
    /// activity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist and [`TaskBoardError::AgentNotFound`] when the agent is
    /// unknown or belongs to another project.
    pub async fn assign(
        &self,
        id: TaskId,
        agent_id: AgentId,
        actor: Actor,
    ) -> TaskBoardResult<Task> {
        let task = self.get(id).await?;
        let agent_name = self.project_agent_name(task.project_id(), agent_id).await?;
        let at = self.clock.utc();
        let updated = self.tasks.set_assigned_agent(id, agent_id, at).await?;

        let activity = NewTaskActivity::assigned(id, actor, &agent_name, at);
        self.record_best_effort(&activity).await;
        tracing::info!(task_id = %id, agent_id = %agent_id, %actor, "agent assigned to task");
        Ok(updated)
    }

    /// Sets the reviewer and records a `reviewer_set` activity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] (wrapped) when the task does
    /// not exist and [`TaskBoardError::ReviewerNotFound`] when the user is
    /// unknown.
    pub async fn set_reviewer(
        &self,
        id: TaskId,
        reviewer_id: UserId,
        actor: Actor,
    ) -> TaskBoardResult<Task> {
        self.get(id).await?;
        let username = self.reviewer_name(reviewer_id).await?;
        let at = self.clock.utc();
        let updated = self.tasks.set_reviewer(id, reviewer_id, at).await?;

        let activity = NewTaskActivity::reviewer_set(id, actor, &username, at);
        self.record_best_effort(&activity).await;
        tracing::info!(task_id = %id, reviewer_id = %reviewer_id, %actor, "task reviewer set");
        Ok(updated)
    }

    async fn project_agent_name(
        &self,
        project_id: ProjectId,
        agent_id: AgentId,
    ) -> TaskBoardResult<String> {
        self.agents
            .find_by_id(agent_id)
            .await?
            .filter(|agent| agent.project_id() == project_id)
            .map(|agent| agent.name().as_str().to_owned())
            .ok_or(TaskBoardError::AgentNotFound(agent_id))
    }

    async fn reviewer_name(&self, user_id: UserId) -> TaskBoardResult<String> {
        self.username(user_id)
            .await?
            .ok_or(TaskBoardError::ReviewerNotFound(user_id))
    }

    async fn agent_name(&self, agent_id: AgentId) -> TaskBoardResult<Option<String>> {
        Ok(self
            .agents
            .find_by_id(agent_id)
            .await?
            .map(|agent| agent.name().as_str().to_owned()))
    }

    async fn actor_name(&self, actor: Actor) -> TaskBoardResult<Option<String>> {
        match actor {
            Actor::User(user_id) => self.username(user_id).await,
            Actor::Agent(agent_id) => self.agent_name(agent_id).await,
        }
    }

    async fn username(&self, user_id: UserId) -> TaskBoardResult<Option<String>> {
        Ok(self
            .users
            .find_by_id(user_id)
            .await?
            .map(|user| user.username().to_owned()))
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
