//! Task aggregate root and related value types.

use super::{TaskDomainError, TaskPriority, TaskStatus};
use crate::{
    actor::Actor, agent::domain::AgentId, ids::integer_id, project::domain::ProjectId,
    user::domain::UserId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

integer_id! {
    /// Store-assigned task identifier.
    TaskId
}

const MIN_TITLE_LENGTH: usize = 3;
const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Task aggregate root.
///
/// The status is only ever changed through [`super::TaskTransition`]s
/// applied by the lifecycle service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_agent_id: Option<AgentId>,
    reviewer_id: Option<UserId>,
    created_by: Actor,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Assigned agent, if any.
    pub assigned_agent_id: Option<AgentId>,
    /// Reviewing user, if any.
    pub reviewer_id: Option<UserId>,
    /// Creator of the task.
    pub created_by: Actor,
    /// Tag set.
    pub tags: Vec<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated task that has not been assigned an identifier yet.
///
/// New tasks always start `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Priority.
    pub priority: TaskPriority,
    /// Assigned agent, if any.
    pub assigned_agent_id: Option<AgentId>,
    /// Reviewing user, if any.
    pub reviewer_id: Option<UserId>,
    /// Creator of the task.
    pub created_by: Actor,
    /// Tag set without duplicates.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewTask {
    /// Validates and prepares a new task with default priority and no tags.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTitle`] or
    /// [`TaskDomainError::DescriptionTooLong`] when validation fails.
    pub fn new(
        project_id: ProjectId,
        title: impl Into<String>,
        description: impl Into<String>,
        created_by: Actor,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let description_value = description.into();
        validate_description(&description_value)?;
        Ok(Self {
            project_id,
            title: validate_title(title.into())?,
            description: description_value,
            priority: TaskPriority::default(),
            assigned_agent_id: None,
            reviewer_id: None,
            created_by,
            tags: Vec::new(),
            created_at: clock.utc(),
        })
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assigned agent.
    #[must_use]
    pub const fn with_assigned_agent(mut self, agent_id: AgentId) -> Self {
        self.assigned_agent_id = Some(agent_id);
        self
    }

    /// Sets the reviewer.
    #[must_use]
    pub const fn with_reviewer(mut self, reviewer_id: UserId) -> Self {
        self.reviewer_id = Some(reviewer_id);
        self
    }

    /// Sets the tags, dropping blanks and duplicates while keeping order.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = normalize_tags(tags);
        self
    }
}

/// Partial update of a task's descriptive fields.
///
/// Status, assignment, and reviewer have dedicated operations and cannot be
/// patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority.
    pub priority: Option<TaskPriority>,
    /// Replacement tag set.
    pub tags: Option<Vec<String>>,
}

/// Criteria for listing tasks; unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TaskFilter {
    /// Restrict to one project.
    pub project_id: Option<ProjectId>,
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
    /// Restrict to one priority.
    pub priority: Option<TaskPriority>,
    /// Restrict to tasks assigned to one agent.
    pub assigned_agent_id: Option<AgentId>,
    /// Restrict to tasks reviewed by one user.
    pub reviewer_id: Option<UserId>,
}

impl TaskFilter {
    /// Creates a filter for one project.
    #[must_use]
    pub fn for_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    /// Returns `true` when the task satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.project_id.is_none_or(|id| id == task.project_id())
            && self.status.is_none_or(|status| status == task.status())
            && self.priority.is_none_or(|priority| priority == task.priority())
            && self
                .assigned_agent_id
                .is_none_or(|id| Some(id) == task.assigned_agent_id())
            && self
                .reviewer_id
                .is_none_or(|id| Some(id) == task.reviewer_id())
    }
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_agent_id: data.assigned_agent_id,
            reviewer_id: data.reviewer_id,
            created_by: data.created_by,
            tags: data.tags,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assigned agent, if any.
    #[must_use]
    pub const fn assigned_agent_id(&self) -> Option<AgentId> {
        self.assigned_agent_id
    }

    /// Returns the reviewing user, if any.
    #[must_use]
    pub const fn reviewer_id(&self) -> Option<UserId> {
        self.reviewer_id
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> Actor {
        self.created_by
    }

    /// Returns the tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update of the descriptive fields.
    ///
    /// All supplied fields are validated before any of them is written.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the title or description fails
    /// validation.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let title = patch.title.map(validate_title).transpose()?;
        if let Some(description) = patch.description.as_deref() {
            validate_description(description)?;
        }

        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.priority {
            self.priority = value;
        }
        if let Some(value) = patch.tags {
            self.tags = normalize_tags(value);
        }
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_title(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&length) {
        return Err(TaskDomainError::InvalidTitle(raw));
    }
    Ok(trimmed.to_owned())
}

fn validate_description(description: &str) -> Result<(), TaskDomainError> {
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(TaskDomainError::DescriptionTooLong(length));
    }
    Ok(())
}

fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let trimmed = tag.trim();
        if !trimmed.is_empty() && !normalized.iter().any(|existing| existing == trimmed) {
            normalized.push(trimmed.to_owned());
        }
    }
    normalized
}
