//! User aggregate and related value types.

use super::{UserDomainError, UserRole};
use crate::ids::integer_id;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

integer_id! {
    /// Store-assigned user identifier.
    UserId
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;

/// User aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    avatar_url: String,
    role: UserRole,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted unique username.
    pub username: String,
    /// Persisted unique email address.
    pub email: String,
    /// Persisted avatar URL, empty when unset.
    pub avatar_url: String,
    /// Persisted role.
    pub role: UserRole,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated user record that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Avatar URL, empty when unset.
    pub avatar_url: String,
    /// Account role.
    pub role: UserRole,
    /// Whether the account is enabled.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Validates and prepares a new active user record.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidUsername`] or
    /// [`UserDomainError::InvalidEmail`] when validation fails.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        clock: &impl Clock,
    ) -> Result<Self, UserDomainError> {
        Ok(Self {
            username: validate_username(username.into())?,
            email: validate_email(email.into())?,
            avatar_url: String::new(),
            role,
            is_active: true,
            created_at: clock.utc(),
        })
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = avatar_url.into();
        self
    }
}

/// Partial update applied to a user; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserPatch {
    /// Replacement username.
    pub username: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement avatar URL.
    pub avatar_url: Option<String>,
    /// Replacement role.
    pub role: Option<UserRole>,
    /// Replacement enabled flag.
    pub is_active: Option<bool>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            email: data.email,
            avatar_url: data.avatar_url,
            role: data.role,
            is_active: data.is_active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the avatar URL, empty when unset.
    #[must_use]
    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    /// Returns the account role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns whether the account is enabled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
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

    /// Applies a partial update.
    ///
    /// All supplied fields are validated before any of them is written, so a
    /// rejected patch leaves the user unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError`] when a supplied field fails validation.
    pub fn apply_patch(
        &mut self,
        patch: UserPatch,
        clock: &impl Clock,
    ) -> Result<(), UserDomainError> {
        let username = patch.username.map(validate_username).transpose()?;
        let email = patch.email.map(validate_email).transpose()?;

        if let Some(value) = username {
            self.username = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        if let Some(value) = patch.avatar_url {
            self.avatar_url = value;
        }
        if let Some(value) = patch.role {
            self.role = value;
        }
        if let Some(value) = patch.is_active {
            self.is_active = value;
        }
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_username(raw: String) -> Result<String, UserDomainError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(UserDomainError::InvalidUsername(raw));
    }
    Ok(trimmed.to_owned())
}

fn validate_email(raw: String) -> Result<String, UserDomainError> {
    let trimmed = raw.trim();
    let is_valid = trimmed.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    });
    if !is_valid {
        return Err(UserDomainError::InvalidEmail(raw));
    }
    Ok(trimmed.to_owned())
}
