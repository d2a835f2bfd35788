//! Service layer for project records and statistics.

use crate::{
    agent::ports::{AgentRepository, AgentRepositoryError},
    project::{
        domain::{
            NewProject, Project, ProjectDomainError, ProjectId, ProjectPatch, ProjectStats,
            ProjectStatus,
        },
        ports::{ProjectRepository, ProjectRepositoryError},
    },
    task::ports::{TaskRepository, TaskRepositoryError},
    user::domain::UserId,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: String,
    status: ProjectStatus,
    created_by: UserId,
}

impl CreateProjectRequest {
    /// Creates an active project request with an empty description.
    #[must_use]
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            status: ProjectStatus::default(),
            created_by,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectCatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Task counting failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// Agent counting failed.
    #[error(transparent)]
    Agents(#[from] AgentRepositoryError),
}

/// Result type for project service operations.
pub type ProjectCatalogResult<T> = Result<T, ProjectCatalogError>;

/// Project management service.
#[derive(Clone)]
pub struct ProjectCatalogService<P, T, A, C>
where
    P: ProjectRepository + ?Sized,
    T: TaskRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    agents: Arc<A>,
    clock: Arc<C>,
}

impl<P, T, A, C> ProjectCatalogService<P, T, A, C>
where
    P: ProjectRepository + ?Sized,
    T: TaskRepository + ?Sized,
    A: AgentRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>, agents: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            projects,
            tasks,
            agents,
            clock,
        }
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError`] when validation or persistence fails.
    pub async fn create(&self, request: CreateProjectRequest) -> ProjectCatalogResult<Project> {
        let CreateProjectRequest {
            name,
            description,
            status,
            created_by,
        } = request;
        let new_project = NewProject::new(name, description, status, created_by, &*self.clock)?;
        let project = self.projects.create(&new_project).await?;
        tracing::info!(project_id = %project.id(), name = project.name(), "project created");
        Ok(project)
    }

    /// Loads a project that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] (wrapped) when the project
    /// does not exist.
    pub async fn get(&self, id: ProjectId) -> ProjectCatalogResult<Project> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProjectRepositoryError::NotFound(id).into())
    }

    /// Returns all projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Repository`] when persistence fails.
    pub async fn list(&self) -> ProjectCatalogResult<Vec<Project>> {
        Ok(self.projects.list().await?)
    }

    /// Applies a partial update to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError`] when the project does not exist or a
    /// field fails validation.
    pub async fn update(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> ProjectCatalogResult<Project> {
        let mut project = self.get(id).await?;
        project.apply_patch(patch, &*self.clock)?;
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Deletes a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError::Repository`] when the project does not
    /// exist or persistence fails.
    pub async fn delete(&self, id: ProjectId) -> ProjectCatalogResult<()> {
        self.projects.delete(id).await?;
        tracing::info!(project_id = %id, "project deleted");
        Ok(())
    }

    /// Summarises task and agent totals for a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectCatalogError`] when the project does not exist or a
    /// count query fails.
    pub async fn stats(&self, id: ProjectId) -> ProjectCatalogResult<ProjectStats> {
        self.get(id).await?;
        let task_counts = self.tasks.count_by_status(id).await?;
        let agent_count = self.agents.list_by_project(id).await?.len();
        let total_agents = u64::try_from(agent_count).unwrap_or(u64::MAX);
        Ok(ProjectStats::new(task_counts, total_agents))
    }
}
