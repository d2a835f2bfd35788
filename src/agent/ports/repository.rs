//! Repository port for agent persistence and discovery.

use crate::{
    agent::domain::{Agent, AgentId, NewAgent},
    project::domain::ProjectId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent repository operations.
pub type AgentRepositoryResult<T> = Result<T, AgentRepositoryError>;

/// Agent persistence contract.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Stores a new agent and returns it with its assigned identifier.
    async fn create(&self, agent: &NewAgent) -> AgentRepositoryResult<Agent>;

    /// Persists changes to an existing agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist.
    async fn update(&self, agent: &Agent) -> AgentRepositoryResult<()>;

    /// Finds an agent by identifier.
    ///
    /// Returns `None` when the agent does not exist.
    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>>;

    /// Returns all agents, newest first.
    async fn list(&self) -> AgentRepositoryResult<Vec<Agent>>;

    /// Returns the agents of one project, newest first.
    async fn list_by_project(&self, project_id: ProjectId) -> AgentRepositoryResult<Vec<Agent>>;

    /// Deletes an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::NotFound`] when the agent does not
    /// exist.
    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<()>;
}

/// Errors returned by agent repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRepositoryError {
    /// The agent was not found.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
