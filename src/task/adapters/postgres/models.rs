//! Diesel row models for task persistence.

use super::schema::{task_activities, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Assigned agent.
    pub assigned_agent_id: Option<i64>,
    /// Reviewer.
    pub reviewer_id: Option<i64>,
    /// Creator identifier.
    pub created_by: i64,
    /// Creator kind.
    pub creator_type: String,
    /// Tag set.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Owning project.
    pub project_id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Assigned agent.
    pub assigned_agent_id: Option<i64>,
    /// Reviewer.
    pub reviewer_id: Option<i64>,
    /// Creator identifier.
    pub created_by: i64,
    /// Creator kind.
    pub creator_type: String,
    /// Tag set.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for activity records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskActivityRow {
    /// Activity identifier.
    pub id: i64,
    /// Task identifier.
    pub task_id: i64,
    /// Actor identifier.
    pub actor_id: i64,
    /// Actor kind.
    pub actor_type: String,
    /// Kind of change.
    pub action: String,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// Message.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for activity records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_activities)]
pub struct NewTaskActivityRow {
    /// Task identifier.
    pub task_id: i64,
    /// Actor identifier.
    pub actor_id: i64,
    /// Actor kind.
    pub actor_type: String,
    /// Kind of change.
    pub action: String,
    /// Value before the change.
    pub old_value: Option<String>,
    /// Value after the change.
    pub new_value: Option<String>,
    /// Message.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
