//! Agent aggregate root.

use super::{AgentConfig, AgentDomainError, AgentLevel, AgentName, AgentRole, AgentStatus};
use crate::{ids::integer_id, project::domain::ProjectId, user::domain::UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

integer_id! {
    /// Store-assigned agent identifier.
    AgentId
}

const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Registered AI agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: AgentName,
    description: String,
    project_id: ProjectId,
    created_by: UserId,
    role: AgentRole,
    level: AgentLevel,
    provider: String,
    model: String,
    config: AgentConfig,
    status: AgentStatus,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted agent.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedAgentData {
    /// Persisted agent identifier.
    pub id: AgentId,
    /// Persisted name.
    pub name: AgentName,
    /// Persisted description.
    pub description: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// User that registered the agent.
    pub created_by: UserId,
    /// Persisted role.
    pub role: AgentRole,
    /// Persisted level.
    pub level: AgentLevel,
    /// Provider name.
    pub provider: String,
    /// Model name.
    pub model: String,
    /// Generation settings.
    pub config: AgentConfig,
    /// Runtime status.
    pub status: AgentStatus,
    /// Whether the agent may receive work.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated agent registration that has not been assigned an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAgent {
    /// Agent name.
    pub name: AgentName,
    /// Free-text description, at most 500 characters.
    pub description: String,
    /// Owning project.
    pub project_id: ProjectId,
    /// Registering user.
    pub created_by: UserId,
    /// Role within the project.
    pub role: AgentRole,
    /// Seniority level.
    pub level: AgentLevel,
    /// Provider name.
    pub provider: String,
    /// Model name.
    pub model: String,
    /// Generation settings.
    pub config: AgentConfig,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Partial update applied to an agent; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement role.
    pub role: Option<AgentRole>,
    /// Replacement level.
    pub level: Option<AgentLevel>,
    /// Replacement provider.
    pub provider: Option<String>,
    /// Replacement model.
    pub model: Option<String>,
    /// Replacement generation settings.
    pub config: Option<AgentConfig>,
    /// Replacement runtime status.
    pub status: Option<AgentStatus>,
    /// Replacement active flag.
    pub is_active: Option<bool>,
}

impl NewAgent {
    /// Validates the free-form fields of a registration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError`] when the description is too long, the
    /// provider or model is blank, or the config is out of range.
    pub fn validate(&self) -> Result<(), AgentDomainError> {
        validate_description(&self.description)?;
        validate_non_blank(&self.provider, AgentDomainError::EmptyProvider)?;
        validate_non_blank(&self.model, AgentDomainError::EmptyModel)?;
        self.config.validate()
    }
}

impl Agent {
    /// Reconstructs an agent from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAgentData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            project_id: data.project_id,
            created_by: data.created_by,
            role: data.role,
            level: data.level,
            provider: data.provider,
            model: data.model,
            config: data.config,
            status: data.status,
            is_active: data.is_active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Returns the agent name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the registering user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the agent role.
    #[must_use]
    pub const fn role(&self) -> AgentRole {
        self.role
    }

    /// Returns the seniority level.
    #[must_use]
    pub const fn level(&self) -> AgentLevel {
        self.level
    }

    /// Returns the provider name.
    #[must_use]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the generation settings.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Returns the runtime status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns whether the agent may receive work.
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
    /// All supplied fields are validated before any of them is written.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError`] when a supplied field fails validation.
    pub fn apply_patch(
        &mut self,
        patch: AgentPatch,
        clock: &impl Clock,
    ) -> Result<(), AgentDomainError> {
        let name = patch.name.map(AgentName::new).transpose()?;
        if let Some(description) = patch.description.as_deref() {
            validate_description(description)?;
        }
        if let Some(provider) = patch.provider.as_deref() {
            validate_non_blank(provider, AgentDomainError::EmptyProvider)?;
        }
        if let Some(model) = patch.model.as_deref() {
            validate_non_blank(model, AgentDomainError::EmptyModel)?;
        }
        if let Some(config) = patch.config.as_ref() {
            config.validate()?;
        }

        if let Some(value) = name {
            self.name = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.role {
            self.role = value;
        }
        if let Some(value) = patch.level {
            self.level = value;
        }
        if let Some(value) = patch.provider {
            self.provider = value.trim().to_owned();
        }
        if let Some(value) = patch.model {
            self.model = value.trim().to_owned();
        }
        if let Some(value) = patch.config {
            self.config = value;
        }
        if let Some(value) = patch.status {
            self.status = value;
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

fn validate_description(description: &str) -> Result<(), AgentDomainError> {
    let length = description.chars().count();
    if length > MAX_DESCRIPTION_LENGTH {
        return Err(AgentDomainError::DescriptionTooLong(length));
    }
    Ok(())
}

fn validate_non_blank(value: &str, error: AgentDomainError) -> Result<(), AgentDomainError> {
    if value.trim().is_empty() {
        return Err(error);
    }
    Ok(())
}
