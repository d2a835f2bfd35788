//! HTTP error responses.
//!
//! Every service error converts into an [`ApiError`], which renders as a
//! status code and a `{"error": message}` body. Storage failures are logged
//! and answered with an opaque message.

use crate::{
    agent::{ports::AgentRepositoryError, services::AgentRegistryServiceError},
    execution_plan::{
        ports::ExecutionStoreError,
        services::{DispatchError, PlanServiceError},
    },
    project::{ports::ProjectRepositoryError, services::ProjectCatalogError},
    provider::ProviderError,
    task::{
        ports::TaskRepositoryError,
        services::{TaskBoardError, TaskLifecycleError},
    },
    user::{ports::UserRepositoryError, services::UserDirectoryError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;

const INTERNAL_MESSAGE: &str = "internal server error";

/// Errors returned by HTTP handlers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The addressed record does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The request failed validation or asked for a disallowed transition.
    #[error("{0}")]
    BadRequest(String),
    /// The request conflicts with current state.
    #[error("{0}")]
    Conflict(String),
    /// The request carries no authenticated actor.
    #[error("authentication required")]
    Unauthenticated,
    /// The actor may not perform the operation.
    #[error("{0}")]
    Forbidden(String),
    /// Storage or another internal dependency failed.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    /// Returns the status code the error renders with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn not_found(err: &impl Display) -> Self {
        Self::NotFound(err.to_string())
    }

    pub(crate) fn bad_request(err: &impl Display) -> Self {
        Self::BadRequest(err.to_string())
    }

    pub(crate) fn conflict(err: &impl Display) -> Self {
        Self::Conflict(err.to_string())
    }

    pub(crate) fn internal(err: &impl Display) -> Self {
        tracing::error!(error = %err, "request failed");
        Self::Internal
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Internal => INTERNAL_MESSAGE.to_owned(),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

impl From<UserRepositoryError> for ApiError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::NotFound(_) => Self::not_found(&err),
            UserRepositoryError::DuplicateUsername(_) | UserRepositoryError::DuplicateEmail(_) => {
                Self::conflict(&err)
            }
            UserRepositoryError::InvalidPersistedData(_) | UserRepositoryError::Persistence(_) => {
                Self::internal(&err)
            }
        }
    }
}

impl From<ProjectRepositoryError> for ApiError {
    fn from(err: ProjectRepositoryError) -> Self {
        match err {
            ProjectRepositoryError::NotFound(_) => Self::not_found(&err),
            ProjectRepositoryError::InvalidPersistedData(_)
            | ProjectRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<AgentRepositoryError> for ApiError {
    fn from(err: AgentRepositoryError) -> Self {
        match err {
            AgentRepositoryError::NotFound(_) => Self::not_found(&err),
            AgentRepositoryError::InvalidPersistedData(_)
            | AgentRepositoryError::Persistence(_) => Self::internal(&err),
        }
    }
}

impl From<TaskRepositoryError> for ApiError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(_) => Self::not_found(&err),
            TaskRepositoryError::InvalidPersistedData(_) | TaskRepositoryError::Persistence(_) => {
                Self::internal(&err)
            }
        }
    }
}

impl From<ExecutionStoreError> for ApiError {
    fn from(err: ExecutionStoreError) -> Self {
        match err {
            ExecutionStoreError::PlanNotFound(_) => Self::not_found(&err),
            ExecutionStoreError::ActivePlanConflict(_) => Self::conflict(&err),
            ExecutionStoreError::InvalidPersistedData(_) | ExecutionStoreError::Persistence(_) => {
                Self::internal(&err)
            }
        }
    }
}

impl From<UserDirectoryError> for ApiError {
    fn from(err: UserDirectoryError) -> Self {
        match err {
            UserDirectoryError::Domain(domain) => Self::bad_request(&domain),
            UserDirectoryError::Repository(repository) => repository.into(),
        }
    }
}

impl From<ProjectCatalogError> for ApiError {
    fn from(err: ProjectCatalogError) -> Self {
        match err {
            ProjectCatalogError::Domain(domain) => Self::bad_request(&domain),
            ProjectCatalogError::Repository(repository) => repository.into(),
            ProjectCatalogError::Tasks(tasks) => tasks.into(),
            ProjectCatalogError::Agents(agents) => agents.into(),
        }
    }
}

impl From<AgentRegistryServiceError> for ApiError {
    fn from(err: AgentRegistryServiceError) -> Self {
        match err {
            AgentRegistryServiceError::Domain(domain) => Self::bad_request(&domain),
            AgentRegistryServiceError::Repository(repository) => repository.into(),
            AgentRegistryServiceError::ProjectNotFound(_) => Self::not_found(&err),
            AgentRegistryServiceError::Project(project) => project.into(),
        }
    }
}

impl From<TaskBoardError> for ApiError {
    fn from(err: TaskBoardError) -> Self {
        match err {
            TaskBoardError::Domain(domain) => Self::bad_request(&domain),
            TaskBoardError::Repository(repository) => repository.into(),
            TaskBoardError::ProjectNotFound(_) => Self::not_found(&err),
            TaskBoardError::AgentNotFound(_) | TaskBoardError::ReviewerNotFound(_) => {
                Self::bad_request(&err)
            }
            TaskBoardError::Project(project) => project.into(),
            TaskBoardError::Agent(agent) => agent.into(),
            TaskBoardError::User(user) => user.into(),
        }
    }
}

impl From<TaskLifecycleError> for ApiError {
    fn from(err: TaskLifecycleError) -> Self {
        match err {
            TaskLifecycleError::Domain(domain) => Self::bad_request(&domain),
            TaskLifecycleError::Repository(repository) => repository.into(),
            TaskLifecycleError::Contention(_) => Self::conflict(&err),
        }
    }
}

impl From<PlanServiceError> for ApiError {
    fn from(err: PlanServiceError) -> Self {
        match err {
            PlanServiceError::Domain(domain) => Self::bad_request(&domain),
            PlanServiceError::Store(store) => store.into(),
            PlanServiceError::ProjectNotFound(_) | PlanServiceError::NoActivePlan(_) => {
                Self::not_found(&err)
            }
            PlanServiceError::UnknownTask(_) | PlanServiceError::UnknownAgent(_) => {
                Self::bad_request(&err)
            }
            PlanServiceError::Project(project) => project.into(),
            PlanServiceError::Task(task) => task.into(),
            PlanServiceError::Agent(agent) => agent.into(),
            PlanServiceError::User(user) => user.into(),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::AgentNotFound(_)
            | DispatchError::AssignmentNotFound { .. }
            | DispatchError::NoActivePlan(_) => Self::not_found(&err),
            DispatchError::Domain(domain) => Self::bad_request(&domain),
            DispatchError::Store(store) => store.into(),
            DispatchError::Agent(agent) => agent.into(),
            DispatchError::Task(task) => task.into(),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(_) => Self::not_found(&err),
            ProviderError::Duplicate(_) | ProviderError::EmptyName => Self::internal(&err),
        }
    }
}
