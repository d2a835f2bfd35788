//! Diesel row models for agent persistence.

use super::schema::agents;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for agent records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgentRow {
    /// Store-assigned agent identifier.
    pub id: i64,
    /// Agent name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Owning project.
    pub project_id: i64,
    /// Registering user.
    pub created_by: i64,
    /// Role.
    pub role: String,
    /// Level.
    pub level: String,
    /// Provider name.
    pub provider: String,
    /// Model name.
    pub model: String,
    /// Generation settings payload.
    pub config: Value,
    /// Runtime status.
    pub status: String,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for agent records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agents)]
pub struct NewAgentRow {
    /// Agent name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Owning project.
    pub project_id: i64,
    /// Registering user.
    pub created_by: i64,
    /// Role.
    pub role: String,
    /// Level.
    pub level: String,
    /// Provider name.
    pub provider: String,
    /// Model name.
    pub model: String,
    /// Generation settings payload.
    pub config: Value,
    /// Runtime status.
    pub status: String,
    /// Active flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
