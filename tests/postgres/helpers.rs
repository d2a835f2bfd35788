//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use stackflow::{
    actor::Actor,
    api::{AppState, PgPool, Stores},
    project::{domain::Project, services::CreateProjectRequest},
    provider::ProviderCatalog,
    user::{domain::User, services::CreateUserRequest},
};
use std::sync::atomic::{AtomicU32, Ordering};

/// Boxed error type used by setup helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Environment variable naming the database used by these tests.
pub const TEST_DATABASE_URL_VAR: &str = "STACKFLOW_TEST_DATABASE_URL";

/// SQL creating users, projects, agents, tasks, and task activities.
pub const CREATE_CORE_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_core_tables/up.sql");

/// SQL creating execution plans, assignments, and reports.
pub const CREATE_EXECUTION_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000001_create_execution_tables/up.sql");

static SCHEMA_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A migrated schema that is dropped when the value goes out of scope.
pub struct TemporarySchema {
    base_url: String,
    name: String,
    pool: PgPool,
}

impl TemporarySchema {
    /// Returns application state over `PostgreSQL` stores in this schema.
    #[must_use]
    pub fn state(&self) -> AppState {
        AppState::new(Stores::postgres(&self.pool), ProviderCatalog::builtin())
    }
}

impl Drop for TemporarySchema {
    fn drop(&mut self) {
        let statement = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.name);
        let dropped = PgConnection::establish(&self.base_url)
            .map_err(BoxError::from)
            .and_then(|mut conn| conn.batch_execute(&statement).map_err(BoxError::from));
        if let Err(err) = dropped {
            tracing::warn!(schema = %self.name, error = %err, "failed to drop test schema");
        }
    }
}

/// Provisions a fresh migrated schema, or `None` when no test database is
/// configured.
///
/// # Errors
///
/// Returns an error if the schema cannot be created or migrated.
pub async fn temporary_schema() -> Result<Option<TemporarySchema>, eyre::Report> {
    let Ok(base_url) = std::env::var(TEST_DATABASE_URL_VAR) else {
        return Ok(None);
    };
    if base_url.trim().is_empty() {
        return Ok(None);
    }
    let schema = tokio::task::spawn_blocking(move || provision(base_url))
        .await?
        .map_err(|err| eyre::eyre!("provision test schema: {err}"))?;
    Ok(Some(schema))
}

fn provision(base_url: String) -> Result<TemporarySchema, BoxError> {
    let name = format!(
        "stackflow_test_{}_{}",
        std::process::id(),
        SCHEMA_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let mut conn = PgConnection::establish(&base_url)?;
    conn.batch_execute(&format!(
        "DROP SCHEMA IF EXISTS {name} CASCADE; CREATE SCHEMA {name}; SET search_path TO {name};"
    ))?;
    conn.batch_execute(CREATE_CORE_TABLES_SQL)?;
    conn.batch_execute(CREATE_EXECUTION_TABLES_SQL)?;

    let manager = ConnectionManager::<PgConnection>::new(scoped_url(&base_url, &name));
    let pool = Pool::builder().max_size(4).build(manager)?;
    Ok(TemporarySchema {
        base_url,
        name,
        pool,
    })
}

/// Appends a `search_path` startup option for `schema` to a connection URL.
#[must_use]
pub fn scoped_url(base_url: &str, schema: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}options=-csearch_path%3D{schema}")
}

/// A stored user with one project.
pub struct Team {
    /// Project owner.
    pub owner: User,
    /// The team's project.
    pub project: Project,
}

impl Team {
    /// Returns the owner as an acting user.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::User(self.owner.id())
    }
}

/// Creates a user and a project they own.
///
/// # Errors
///
/// Returns an error if either record cannot be stored.
pub async fn team(state: &AppState, username: &str) -> Result<Team, eyre::Report> {
    let owner = state
        .users
        .create(CreateUserRequest::new(
            username,
            format!("{username}@example.com"),
        ))
        .await?;
    let project = state
        .projects
        .create(CreateProjectRequest::new("Apollo", owner.id()))
        .await?;
    Ok(Team { owner, project })
}
