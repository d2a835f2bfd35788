//! `PostgreSQL` repository implementation for projects.

use super::{
    models::{NewProjectRow, ProjectRow},
    schema::projects,
};
use crate::{
    project::{
        domain::{NewProject, PersistedProjectData, Project, ProjectId, ProjectStatus},
        ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
    },
    user::domain::UserId,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by project adapters.
pub type ProjectPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: ProjectPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ProjectPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create(&self, project: &NewProject) -> ProjectRepositoryResult<Project> {
        let new_row = NewProjectRow {
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status.as_str().to_owned(),
            created_by: project.created_by.value(),
            created_at: project.created_at,
            updated_at: project.created_at,
        };
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(projects::table)
                .values(&new_row)
                .returning(ProjectRow::as_returning())
                .get_result::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            row_to_project(row)
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let id = project.id();
        let name = project.name().to_owned();
        let description = project.description().to_owned();
        let status = project.status().as_str().to_owned();
        let updated_at = project.updated_at();

        self.run_blocking(move |connection| {
            let updated_count =
                diesel::update(projects::table.filter(projects::id.eq(id.value())))
                    .set((
                        projects::name.eq(&name),
                        projects::description.eq(&description),
                        projects::status.eq(&status),
                        projects::updated_at.eq(updated_at),
                    ))
                    .execute(connection)
                    .map_err(ProjectRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.value()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .order((projects::created_at.desc(), projects::id.desc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(projects::table.filter(projects::id.eq(id.value())))
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(ProjectRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let status = ProjectStatus::try_from(row.status.as_str())
        .map_err(ProjectRepositoryError::invalid_persisted_data)?;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::new(row.id),
        name: row.name,
        description: row.description,
        status,
        created_by: UserId::new(row.created_by),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
