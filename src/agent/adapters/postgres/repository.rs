//! `PostgreSQL` repository implementation for agent registration.

use super::{
    models::{AgentRow, NewAgentRow},
    schema::agents,
};
use crate::{
    agent::{
        domain::{
            Agent, AgentConfig, AgentId, AgentLevel, AgentName, AgentRole, AgentStatus, NewAgent,
            PersistedAgentData,
        },
        ports::{AgentRepository, AgentRepositoryError, AgentRepositoryResult},
    },
    project::domain::ProjectId,
    user::domain::UserId,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by agent adapters.
pub type AgentPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed agent repository.
#[derive(Debug, Clone)]
pub struct PostgresAgentRegistry {
    pool: AgentPgPool,
}

impl PostgresAgentRegistry {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AgentPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AgentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AgentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AgentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AgentRepositoryError::persistence)?
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRegistry {
    async fn create(&self, agent: &NewAgent) -> AgentRepositoryResult<Agent> {
        let new_row = to_new_row(agent)?;
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(agents::table)
                .values(&new_row)
                .returning(AgentRow::as_returning())
                .get_result::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            row_to_agent(row)
        })
        .await
    }

    async fn update(&self, agent: &Agent) -> AgentRepositoryResult<()> {
        let id = agent.id();
        let name = agent.name().as_str().to_owned();
        let description = agent.description().to_owned();
        let role = agent.role().as_str().to_owned();
        let level = agent.level().as_str().to_owned();
        let provider = agent.provider().to_owned();
        let model = agent.model().to_owned();
        let config = serde_json::to_value(agent.config()).map_err(AgentRepositoryError::persistence)?;
        let status = agent.status().as_str().to_owned();
        let is_active = agent.is_active();
        let updated_at = agent.updated_at();

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(agents::table.filter(agents::id.eq(id.value())))
                .set((
                    agents::name.eq(&name),
                    agents::description.eq(&description),
                    agents::role.eq(&role),
                    agents::level.eq(&level),
                    agents::provider.eq(&provider),
                    agents::model.eq(&model),
                    agents::config.eq(&config),
                    agents::status.eq(&status),
                    agents::is_active.eq(is_active),
                    agents::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(AgentRepositoryError::persistence)?;

            if updated_count == 0 {
                return Err(AgentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<Agent>> {
        self.run_blocking(move |connection| {
            let row = agents::table
                .filter(agents::id.eq(id.value()))
                .select(AgentRow::as_select())
                .first::<AgentRow>(connection)
                .optional()
                .map_err(AgentRepositoryError::persistence)?;
            row.map(row_to_agent).transpose()
        })
        .await
    }

    async fn list(&self) -> AgentRepositoryResult<Vec<Agent>> {
        self.run_blocking(move |connection| {
            let rows = agents::table
                .order((agents::created_at.desc(), agents::id.desc()))
                .select(AgentRow::as_select())
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_agent).collect()
        })
        .await
    }

    async fn list_by_project(&self, project_id: ProjectId) -> AgentRepositoryResult<Vec<Agent>> {
        self.run_blocking(move |connection| {
            let rows = agents::table
                .filter(agents::project_id.eq(project_id.value()))
                .order((agents::created_at.desc(), agents::id.desc()))
                .select(AgentRow::as_select())
                .load::<AgentRow>(connection)
                .map_err(AgentRepositoryError::persistence)?;
            rows.into_iter().map(row_to_agent).collect()
        })
        .await
    }

    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(agents::table.filter(agents::id.eq(id.value())))
                .execute(connection)
                .map_err(AgentRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(AgentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_new_row(agent: &NewAgent) -> AgentRepositoryResult<NewAgentRow> {
    let config = serde_json::to_value(agent.config).map_err(AgentRepositoryError::persistence)?;
    Ok(NewAgentRow {
        name: agent.name.as_str().to_owned(),
        description: agent.description.clone(),
        project_id: agent.project_id.value(),
        created_by: agent.created_by.value(),
        role: agent.role.as_str().to_owned(),
        level: agent.level.as_str().to_owned(),
        provider: agent.provider.clone(),
        model: agent.model.clone(),
        config,
        status: AgentStatus::default().as_str().to_owned(),
        is_active: true,
        created_at: agent.created_at,
        updated_at: agent.created_at,
    })
}

fn row_to_agent(row: AgentRow) -> AgentRepositoryResult<Agent> {
    let AgentRow {
        id,
        name,
        description,
        project_id,
        created_by,
        role,
        level,
        provider,
        model,
        config,
        status,
        is_active,
        created_at,
        updated_at,
    } = row;

    let parsed_name = AgentName::new(name).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_role =
        AgentRole::try_from(role.as_str()).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_level =
        AgentLevel::try_from(level.as_str()).map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_status = AgentStatus::try_from(status.as_str())
        .map_err(AgentRepositoryError::invalid_persisted_data)?;
    let parsed_config: AgentConfig =
        serde_json::from_value(config).map_err(AgentRepositoryError::invalid_persisted_data)?;

    Ok(Agent::from_persisted(PersistedAgentData {
        id: AgentId::new(id),
        name: parsed_name,
        description,
        project_id: ProjectId::new(project_id),
        created_by: UserId::new(created_by),
        role: parsed_role,
        level: parsed_level,
        provider,
        model,
        config: parsed_config,
        status: parsed_status,
        is_active,
        created_at,
        updated_at,
    }))
}
