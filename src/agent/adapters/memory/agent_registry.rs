//! In-memory agent repository for tests and local runs.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    agent::{
        domain::{Agent, AgentId, AgentStatus, NewAgent, PersistedAgentData},
        ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
    },
    project::domain::ProjectId,
};

/// Thread-safe in-memory agent repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRegistry {
    state: Arc<RwLock<InMemoryAgentState>>,
}

#[derive(Debug, Default)]
struct InMemoryAgentState {
    last_id: i64,
    agents: BTreeMap<AgentId, Agent>,
}

impl InMemoryAgentRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AgentRepositoryResult<RwLockReadGuard<'_, InMemoryAgentState>> {
        self.state.read().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> AgentRepositoryResult<RwLockWriteGuard<'_, InMemoryAgentState>> {
        self.state.write().map_err(|err| {
            AgentRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRegistry {
    async fn create(&self, agent: &NewAgent) -> AgentRepositoryResult<Agent> {
        let mut state = self.write()?;
        state.last_id += 1;
        let stored = Agent::from_persisted(PersistedAgentData {
            id: AgentId::new(state.last_id),
            name: agent.name.clone(),
            description: agent.description.clone(),
            project_id: agent.project_id,
            created_by: agent.created_by,
            role: agent.role,
            level: agent.level,
            provider: agent.provider.clone(),
            model: agent.model.clone(),
            config: agent.config,
            status: AgentStatus::default(),
            is_active: true,
            created_at: agent.created_at,
            updated_at: agent.created_at,
        });
        state.agents.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .agents
            .get_mut(&agent.id())
            .ok_or(AgentRepositoryError::NotFound(agent.id()))?;
        *slot = agent.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>> {
        Ok(self.read()?.agents.get(&id).cloned())
    }

    async fn list(&self) -> AgentRepositoryResult<Vec<Agent>> {
        Ok(self.read()?.agents.values().rev().cloned().collect())
    }

    async fn list_by_project(&self, project_id: ProjectId) -> AgentRepositoryResult<Vec<Agent>> {
        Ok(self
            .read()?
            .agents
            .values()
            .rev()
            .filter(|agent| agent.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<()> {
        self.write()?
            .agents
            .remove(&id)
            .map(|_| ())
            .ok_or(AgentRepositoryError::NotFound(id))
    }
}
