//! In-memory project repository for tests and local runs.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::project::{
    domain::{NewProject, PersistedProjectData, Project, ProjectId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
///
/// Deleting a project here does not cascade to other in-memory stores.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    last_id: i64,
    projects: BTreeMap<ProjectId, Project>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ProjectRepositoryResult<RwLockReadGuard<'_, InMemoryProjectState>> {
        self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ProjectRepositoryResult<RwLockWriteGuard<'_, InMemoryProjectState>> {
        self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(&self, project: &NewProject) -> ProjectRepositoryResult<Project> {
        let mut state = self.write()?;
        state.last_id += 1;
        let stored = Project::from_persisted(PersistedProjectData {
            id: ProjectId::new(state.last_id),
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            created_by: project.created_by,
            created_at: project.created_at,
            updated_at: project.created_at,
        });
        state.projects.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.write()?;
        let slot = state
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        *slot = project.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn list(&self) -> ProjectRepositoryResult<Vec<Project>> {
        Ok(self.read()?.projects.values().rev().cloned().collect())
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.write()?
            .projects
            .remove(&id)
            .map(|_| ())
            .ok_or(ProjectRepositoryError::NotFound(id))
    }
}
