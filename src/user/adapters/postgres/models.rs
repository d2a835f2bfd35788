//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// Store-assigned user identifier.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// Account role.
    pub role: String,
    /// Enabled flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Avatar URL.
    pub avatar_url: String,
    /// Account role.
    pub role: String,
    /// Enabled flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
