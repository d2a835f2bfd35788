//! Immutable task activity records.

use super::{ParseActivityActionError, TaskDomainError, TaskId, TaskStatus};
use crate::{actor::Actor, ids::integer_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

integer_id! {
    /// Store-assigned activity identifier.
    ActivityId
}

/// Longest message accepted with a status change.
const MAX_TRANSITION_MESSAGE_LENGTH: usize = 1000;
/// Longest progress note accepted.
const MAX_PROGRESS_MESSAGE_LENGTH: usize = 2000;

/// Kind of change an activity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// The task was created.
    Created,
    /// The task moved between statuses.
    StatusChanged,
    /// An agent was assigned.
    Assigned,
    /// A reviewer was set.
    ReviewerSet,
    /// A comment was left.
    Commented,
    /// A progress note was recorded.
    Progress,
}

impl ActivityAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::Assigned => "assigned",
            Self::ReviewerSet => "reviewer_set",
            Self::Commented => "commented",
            Self::Progress => "progress",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ActivityAction {
    type Error = ParseActivityActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "status_changed" => Ok(Self::StatusChanged),
            "assigned" => Ok(Self::Assigned),
            "reviewer_set" => Ok(Self::ReviewerSet),
            "commented" => Ok(Self::Commented),
            "progress" => Ok(Self::Progress),
            _ => Err(ParseActivityActionError(value.to_owned())),
        }
    }
}

/// Append-only record of one change on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskActivity {
    id: ActivityId,
    task_id: TaskId,
    actor: Actor,
    action: ActivityAction,
    old_value: Option<String>,
    new_value: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskActivityData {
    /// Persisted activity identifier.
    pub id: ActivityId,
    /// Task the activity belongs to.
    pub task_id: TaskId,
    /// Actor that caused the change.
    pub actor: Actor,
    /// Kind of change.
    pub action: ActivityAction,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Activity that has not been appended to the log yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskActivity {
    /// Task the activity belongs to.
    pub task_id: TaskId,
    /// Actor that caused the change.
    pub actor: Actor,
    /// Kind of change.
    pub action: ActivityAction,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewTaskActivity {
    /// Records creation of a task.
    #[must_use]
    pub fn created(task_id: TaskId, actor: Actor, title: &str, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            actor,
            action: ActivityAction::Created,
            old_value: None,
            new_value: None,
            message: format!("Task '{title}' created"),
            created_at: at,
        }
    }

    /// Records a status change.
    #[must_use]
    pub fn status_changed(
        task_id: TaskId,
        actor: Actor,
        from: TaskStatus,
        to: TaskStatus,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            actor,
            action: ActivityAction::StatusChanged,
            old_value: Some(from.as_str().to_owned()),
            new_value: Some(to.as_str().to_owned()),
            message: message.into(),
            created_at: at,
        }
    }

    /// Records an agent assignment.
    #[must_use]
    pub fn assigned(task_id: TaskId, actor: Actor, agent_name: &str, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            actor,
            action: ActivityAction::Assigned,
            old_value: None,
            new_value: Some(agent_name.to_owned()),
            message: format!("Agent '{agent_name}' assigned to task"),
            created_at: at,
        }
    }

    /// Records a reviewer change.
    #[must_use]
    pub fn reviewer_set(task_id: TaskId, actor: Actor, username: &str, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            actor,
            action: ActivityAction::ReviewerSet,
            old_value: None,
            new_value: Some(username.to_owned()),
            message: format!("Reviewer set to '{username}'"),
            created_at: at,
        }
    }

    /// Records a progress note.
    #[must_use]
    pub fn progress(task_id: TaskId, actor: Actor, message: String, at: DateTime<Utc>) -> Self {
        Self {
            task_id,
            actor,
            action: ActivityAction::Progress,
            old_value: None,
            new_value: None,
            message,
            created_at: at,
        }
    }
}

impl TaskActivity {
    /// Reconstructs an activity from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskActivityData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            actor: data.actor,
            action: data.action,
            old_value: data.old_value,
            new_value: data.new_value,
            message: data.message,
            created_at: data.created_at,
        }
    }

    /// Returns the activity identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the task the activity belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the actor that caused the change.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    /// Returns the kind of change.
    #[must_use]
    pub const fn action(&self) -> ActivityAction {
        self.action
    }

    /// Returns the value before the change.
    #[must_use]
    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    /// Returns the value after the change.
    #[must_use]
    pub fn new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Validates an optional status-change message.
///
/// Blank messages are treated as absent so the transition's default message
/// is used instead.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidMessage`] when the trimmed message is
/// longer than 1000 characters.
pub fn validate_transition_message(
    message: Option<&str>,
) -> Result<Option<String>, TaskDomainError> {
    let Some(raw) = message else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    check_length(trimmed, 0, MAX_TRANSITION_MESSAGE_LENGTH)?;
    Ok(Some(trimmed.to_owned()))
}

/// Validates a progress note.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidMessage`] when the trimmed message is
/// empty or longer than 2000 characters.
pub fn validate_progress_message(message: &str) -> Result<String, TaskDomainError> {
    let trimmed = message.trim();
    check_length(trimmed, 1, MAX_PROGRESS_MESSAGE_LENGTH)?;
    Ok(trimmed.to_owned())
}

fn check_length(message: &str, min: usize, max: usize) -> Result<(), TaskDomainError> {
    let actual = message.chars().count();
    if !(min..=max).contains(&actual) {
        return Err(TaskDomainError::InvalidMessage { min, max, actual });
    }
    Ok(())
}
