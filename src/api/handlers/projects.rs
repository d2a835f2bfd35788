//! `/api/projects` handlers.

use crate::{
    agent::domain::Agent,
    api::{ApiError, AppState, CurrentActor},
    project::{
        domain::{Project, ProjectId, ProjectPatch, ProjectStats, ProjectStatus},
        services::CreateProjectRequest,
    },
    task::services::TaskDetails,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProjectBody {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: ProjectStatus,
}

/// GET /api/projects
pub(crate) async fn list_projects(
    State(state): State<AppState>,
    _actor: CurrentActor,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.projects.list().await?))
}

/// POST /api/projects
pub(crate) async fn create_project(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let owner = actor.require_user()?;
    let request = CreateProjectRequest::new(body.name, owner)
        .with_description(body.description)
        .with_status(body.status);
    let project = state.projects.create(request).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects/{id}
pub(crate) async fn get_project(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<ProjectId>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(state.projects.get(id).await?))
}

/// PUT /api/projects/{id}
pub(crate) async fn update_project(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<ProjectId>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<Project>, ApiError> {
    actor.require_user()?;
    Ok(Json(state.projects.update(id, patch).await?))
}

/// DELETE /api/projects/{id}
pub(crate) async fn delete_project(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode, ApiError> {
    actor.require_user()?;
    state.projects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/projects/{id}/stats
pub(crate) async fn project_stats(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectStats>, ApiError> {
    Ok(Json(state.projects.stats(id).await?))
}

/// GET /api/projects/{id}/tasks
pub(crate) async fn project_tasks(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<ProjectId>,
) -> Result<Json<Vec<TaskDetails>>, ApiError> {
    state.projects.get(id).await?;
    let tasks = state.board.list_by_project(id).await?;
    let mut details = Vec::with_capacity(tasks.len());
    for task in tasks {
        details.push(state.board.describe(task).await?);
    }
    Ok(Json(details))
}

/// GET /api/projects/{id}/agents
pub(crate) async fn project_agents(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<ProjectId>,
) -> Result<Json<Vec<Agent>>, ApiError> {
    state.projects.get(id).await?;
    Ok(Json(state.agents.list_by_project(id).await?))
}
