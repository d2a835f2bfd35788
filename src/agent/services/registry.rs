//! Service layer for agent registration and discovery.
//!
//! Provides [`AgentRegistryService`] which coordinates agent registration,
//! updates, removal, and project-scoped discovery.

use crate::{
    agent::{
        domain::{
            Agent, AgentConfig, AgentDomainError, AgentId, AgentLevel, AgentName, AgentPatch,
            AgentRole, NewAgent,
        },
        ports::{AgentRepository, AgentRepositoryError},
    },
    project::{
        domain::ProjectId,
        ports::{ProjectRepository, ProjectRepositoryError},
    },
    user::domain::UserId,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a new agent.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterAgentRequest {
    name: String,
    description: String,
    project_id: ProjectId,
    created_by: UserId,
    role: AgentRole,
    level: AgentLevel,
    provider: String,
    model: String,
    config: AgentConfig,
}

impl RegisterAgentRequest {
    /// Creates a request with required agent fields and default settings.
    #[expect(
        clippy::too_many_arguments,
        reason = "registration bundles all mandatory fields for a single domain aggregate"
    )]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        project_id: ProjectId,
        created_by: UserId,
        role: AgentRole,
        level: AgentLevel,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            project_id,
            created_by,
            role,
            level,
            provider: provider.into(),
            model: model.into(),
            config: AgentConfig::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the generation settings.
    #[must_use]
    pub const fn with_config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }
}

/// Service-level errors for agent registry operations.
#[derive(Debug, Error)]
pub enum AgentRegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AgentDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRepositoryError),
    /// The owning project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// Project lookup failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
}

/// Result type for agent registry service operations.
pub type AgentRegistryServiceResult<T> = Result<T, AgentRegistryServiceError>;

/// Agent registration and discovery orchestration service.
#[derive(Clone)]
pub struct AgentRegistryService<A, P, C>
where
    A: AgentRepository + ?Sized,
    P: ProjectRepository + ?Sized,
    C: Clock + Send + Sync,
{
    agents: Arc<A>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<A, P, C> AgentRegistryService<A, P, C>
where
    A: AgentRepository + ?Sized,
    P: ProjectRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new agent registry service.
    #[must_use]
    pub const fn new(agents: Arc<A>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            agents,
            projects,
            clock,
        }
    }

    /// Registers a new agent in an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::ProjectNotFound`] when the project
    /// does not exist, [`AgentRegistryServiceError::Domain`] when validation
    /// fails, or a repository error when persistence fails.
    pub async fn register(&self, request: RegisterAgentRequest) -> AgentRegistryServiceResult<Agent> {
        let RegisterAgentRequest {
            name,
            description,
            project_id,
            created_by,
            role,
            level,
            provider,
            model,
            config,
        } = request;

        let new_agent = NewAgent {
            name: AgentName::new(name)?,
            description,
            project_id,
            created_by,
            role,
            level,
            provider: provider.trim().to_owned(),
            model: model.trim().to_owned(),
            config,
            created_at: self.clock.utc(),
        };
        new_agent.validate()?;

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(AgentRegistryServiceError::ProjectNotFound(project_id));
        }

        let agent = self.agents.create(&new_agent).await?;
        tracing::info!(
            agent_id = %agent.id(),
            project_id = %project_id,
            name = agent.name().as_str(),
            "agent registered"
        );
        Ok(agent)
    }

    /// Finds an agent by identifier.
    ///
    /// Returns `Ok(None)` when no agent has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn find_by_id(&self, id: AgentId) -> AgentRegistryServiceResult<Option<Agent>> {
        Ok(self.agents.find_by_id(id).await?)
    }

    /// Loads an agent that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] (wrapped) when the agent
    /// does not exist.
    pub async fn get(&self, id: AgentId) -> AgentRegistryServiceResult<Agent> {
        self.agents
            .find_by_id(id)
            .await?
            .ok_or_else(|| AgentRepositoryError::NotFound(id).into())
    }

    /// Returns all agents, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list(&self) -> AgentRegistryServiceResult<Vec<Agent>> {
        Ok(self.agents.list().await?)
    }

    /// Returns the agents of a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::ProjectNotFound`] when the project
    /// does not exist.
    pub async fn list_by_project(
        &self,
        project_id: ProjectId,
    ) -> AgentRegistryServiceResult<Vec<Agent>> {
        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(AgentRegistryServiceError::ProjectNotFound(project_id));
        }
        Ok(self.agents.list_by_project(project_id).await?)
    }

    /// Applies a partial update to an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError`] when the agent does not exist or
    /// a field fails validation.
    pub async fn update(
        &self,
        id: AgentId,
        patch: AgentPatch,
    ) -> AgentRegistryServiceResult<Agent> {
        let mut agent = self.get(id).await?;
        agent.apply_patch(patch, &*self.clock)?;
        self.agents.update(&agent).await?;
        Ok(agent)
    }

    /// Removes an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRegistryServiceError::Repository`] when the agent does
    /// not exist or persistence fails.
    pub async fn delete(&self, id: AgentId) -> AgentRegistryServiceResult<()> {
        self.agents.delete(id).await?;
        tracing::info!(agent_id = %id, "agent removed");
        Ok(())
    }
}
