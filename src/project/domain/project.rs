//! Project aggregate root.

use super::{ProjectDomainError, ProjectStatus};
use crate::{ids::integer_id, user::domain::UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

integer_id! {
    /// Store-assigned project identifier.
    ProjectId
}

const MIN_NAME_LENGTH: usize = 3;
const MAX_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    status: ProjectStatus,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: ProjectStatus,
    /// Creating user.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated project that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    /// Project name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Initial status.
    pub status: ProjectStatus,
    /// Creating user.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewProject {
    /// Validates and prepares a new project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when the name or description fails
    /// validation.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        status: ProjectStatus,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        let description_value = description.into();
        validate_description(&description_value)?;
        Ok(Self {
            name: validate_name(name.into())?,
            description: description_value,
            status,
            created_by,
            created_at: clock.utc(),
        })
    }
}

/// Partial update applied to a project; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement status.
    pub status: Option<ProjectStatus>,
}

impl Project {
    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
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

    /// Applies a partial update, validating every supplied field first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when a supplied field fails validation.
    pub fn apply_patch(
        &mut self,
        patch: ProjectPatch,
        clock: &impl Clock,
    ) -> Result<(), ProjectDomainError> {
        let name = patch.name.map(validate_name).transpose()?;
        if let Some(description) = patch.description.as_deref() {
            validate_description(description)?;
        }

        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.status {
            self.status = value;
        }
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_name(raw: String) -> Result<String, ProjectDomainError> {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
        return Err(ProjectDomainError::InvalidName(raw));
    }
    Ok(trimmed.to_owned())
}

fn validate_description(description: &str) -> Result<(), ProjectDomainError> {
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(ProjectDomainError::DescriptionTooLong(length));
    }
    Ok(())
}
