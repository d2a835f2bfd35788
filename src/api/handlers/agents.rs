//! `/api/agents` handlers, including the agent work queue.

use crate::{
    agent::{
        domain::{Agent, AgentConfig, AgentId, AgentLevel, AgentPatch, AgentRole},
        services::RegisterAgentRequest,
    },
    api::{ApiError, AppState, CurrentActor},
    document::Document,
    execution_plan::{
        domain::{AgentAssignment, AgentContext},
        services::{CompleteTaskRequest, NextTask},
    },
    project::domain::ProjectId,
    task::domain::TaskId,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterAgentBody {
    name: String,
    #[serde(default)]
    description: String,
    project_id: ProjectId,
    role: AgentRole,
    level: AgentLevel,
    provider: String,
    model: String,
    config: Option<AgentConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AgentListQuery {
    project_id: Option<ProjectId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteTaskBody {
    task_id: TaskId,
    report_data: Option<Document>,
    message: Option<String>,
}

/// GET /api/agents
pub(crate) async fn list_agents(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Query(query): Query<AgentListQuery>,
) -> Result<Json<Vec<Agent>>, ApiError> {
    let agents = match query.project_id {
        Some(project_id) => state.agents.list_by_project(project_id).await?,
        None => state.agents.list().await?,
    };
    Ok(Json(agents))
}

/// POST /api/agents
///
/// The provider must be listed in the provider catalog.
pub(crate) async fn register_agent(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(body): Json<RegisterAgentBody>,
) -> Result<(StatusCode, Json<Agent>), ApiError> {
    let created_by = actor.require_user()?;
    state
        .providers
        .find(&body.provider)
        .map_err(|err| ApiError::bad_request(&err))?;

    let RegisterAgentBody {
        name,
        description,
        project_id,
        role,
        level,
        provider,
        model,
        config,
    } = body;
    let request = RegisterAgentRequest::new(name, project_id, created_by, role, level, provider, model)
        .with_description(description)
        .with_config(config.unwrap_or_default());
    let agent = state.agents.register(request).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /api/agents/{id}
pub(crate) async fn get_agent(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<AgentId>,
) -> Result<Json<Agent>, ApiError> {
    Ok(Json(state.agents.get(id).await?))
}

/// PUT /api/agents/{id}
pub(crate) async fn update_agent(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<AgentId>,
    Json(patch): Json<AgentPatch>,
) -> Result<Json<Agent>, ApiError> {
    actor.require_user()?;
    Ok(Json(state.agents.update(id, patch).await?))
}

/// DELETE /api/agents/{id}
pub(crate) async fn delete_agent(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<AgentId>,
) -> Result<StatusCode, ApiError> {
    actor.require_user()?;
    state.agents.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/agents/{id}/next-task
pub(crate) async fn next_task(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<AgentId>,
) -> Result<Json<NextTask>, ApiError> {
    actor.require_agent_access(id)?;
    Ok(Json(state.dispatcher.next_task(id).await?))
}

/// POST /api/agents/{id}/task-complete
pub(crate) async fn task_complete(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<AgentId>,
    Json(body): Json<CompleteTaskBody>,
) -> Result<Json<AgentAssignment>, ApiError> {
    actor.require_agent_access(id)?;
    let CompleteTaskBody {
        task_id,
        report_data,
        message,
    } = body;
    let mut request = CompleteTaskRequest::new(task_id);
    if let Some(report) = report_data {
        request = request.with_report(report);
    }
    if let Some(note) = message {
        request = request.with_message(note);
    }
    Ok(Json(state.dispatcher.complete_task(id, request).await?))
}

/// GET /api/agents/{id}/context
pub(crate) async fn agent_context(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<AgentId>,
) -> Result<Json<AgentContext>, ApiError> {
    actor.require_agent_access(id)?;
    Ok(Json(state.dispatcher.agent_context(id).await?))
}
