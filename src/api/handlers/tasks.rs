//! `/api/tasks` handlers.

use super::optional_body;
use crate::{
    agent::domain::AgentId,
    api::{ApiError, AppState, CurrentActor},
    project::domain::ProjectId,
    task::{
        domain::{TaskFilter, TaskId, TaskPatch, TaskPriority, TaskTransition},
        services::{ActivityDetails, CreateTaskRequest, TaskDetails},
    },
    user::domain::UserId,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTaskBody {
    project_id: ProjectId,
    title: String,
    #[serde(default)]
    description: String,
    priority: Option<TaskPriority>,
    assigned_agent_id: Option<AgentId>,
    reviewer_id: Option<UserId>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TransitionBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignBody {
    agent_id: AgentId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewerBody {
    reviewer_id: UserId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressBody {
    message: String,
}

/// GET /api/tasks
pub(crate) async fn list_tasks(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<TaskDetails>>, ApiError> {
    let tasks = state.board.list(filter).await?;
    let mut details = Vec::with_capacity(tasks.len());
    for task in tasks {
        details.push(state.board.describe(task).await?);
    }
    Ok(Json(details))
}

/// POST /api/tasks
pub(crate) async fn create_task(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskDetails>), ApiError> {
    let CreateTaskBody {
        project_id,
        title,
        description,
        priority,
        assigned_agent_id,
        reviewer_id,
        tags,
    } = body;
    let mut request = CreateTaskRequest::new(project_id, title)
        .with_description(description)
        .with_tags(tags);
    if let Some(level) = priority {
        request = request.with_priority(level);
    }
    if let Some(agent) = assigned_agent_id {
        request = request.with_assigned_agent(agent);
    }
    if let Some(reviewer) = reviewer_id {
        request = request.with_reviewer(reviewer);
    }

    let task = state.board.create(request, actor).await?;
    Ok((StatusCode::CREATED, Json(state.board.describe(task).await?)))
}

/// GET /api/tasks/{id}
pub(crate) async fn get_task(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<TaskId>,
) -> Result<Json<TaskDetails>, ApiError> {
    Ok(Json(state.board.details(id).await?))
}

/// PUT /api/tasks/{id}
pub(crate) async fn update_task(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<TaskId>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<TaskDetails>, ApiError> {
    let task = state.board.update(id, patch).await?;
    Ok(Json(state.board.describe(task).await?))
}

/// DELETE /api/tasks/{id}
///
/// The task is removed first so no new plan can reference it, then its live
/// assignments are skipped. An assignment queued in between is skipped by
/// the dispatcher when it is claimed.
pub(crate) async fn delete_task(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, ApiError> {
    state.board.delete(id).await?;
    state.dispatcher.retire_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn transition(
    state: &AppState,
    actor: CurrentActor,
    id: TaskId,
    transition: TaskTransition,
    body: &Bytes,
) -> Result<Json<TaskDetails>, ApiError> {
    let TransitionBody { message } = optional_body(body)?;
    let task = state
        .lifecycle
        .transition(id, transition, actor.0, message.as_deref())
        .await?;
    Ok(Json(state.board.describe(task).await?))
}

/// POST /api/tasks/{id}/start
pub(crate) async fn start_task(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<TaskId>,
    body: Bytes,
) -> Result<Json<TaskDetails>, ApiError> {
    transition(&state, actor, id, TaskTransition::Start, &body).await
}

/// POST /api/tasks/{id}/done
pub(crate) async fn complete_task(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<TaskId>,
    body: Bytes,
) -> Result<Json<TaskDetails>, ApiError> {
    transition(&state, actor, id, TaskTransition::Complete, &body).await
}

/// POST /api/tasks/{id}/close
pub(crate) async fn close_task(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<TaskId>,
    body: Bytes,
) -> Result<Json<TaskDetails>, ApiError> {
    transition(&state, actor, id, TaskTransition::Close, &body).await
}

/// POST /api/tasks/{id}/wontdo
pub(crate) async fn wont_do_task(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<TaskId>,
    body: Bytes,
) -> Result<Json<TaskDetails>, ApiError> {
    transition(&state, actor, id, TaskTransition::WontDo, &body).await
}

/// POST /api/tasks/{id}/reopen
pub(crate) async fn reopen_task(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<TaskId>,
    body: Bytes,
) -> Result<Json<TaskDetails>, ApiError> {
    transition(&state, actor, id, TaskTransition::Reopen, &body).await
}

/// POST /api/tasks/{id}/assign
pub(crate) async fn assign_task(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<TaskId>,
    Json(body): Json<AssignBody>,
) -> Result<Json<TaskDetails>, ApiError> {
    let task = state.board.assign(id, body.agent_id, actor).await?;
    Ok(Json(state.board.describe(task).await?))
}

/// POST /api/tasks/{id}/reviewer
pub(crate) async fn set_reviewer(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<TaskId>,
    Json(body): Json<ReviewerBody>,
) -> Result<Json<TaskDetails>, ApiError> {
    let task = state.board.set_reviewer(id, body.reviewer_id, actor).await?;
    Ok(Json(state.board.describe(task).await?))
}

/// GET /api/tasks/{id}/activities
pub(crate) async fn list_activities(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<TaskId>,
) -> Result<Json<Vec<ActivityDetails>>, ApiError> {
    let activities = state.lifecycle.list_activities(id).await?;
    Ok(Json(state.board.describe_activities(activities).await?))
}

/// POST /api/tasks/{id}/activities
pub(crate) async fn add_progress(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<TaskId>,
    Json(body): Json<ProgressBody>,
) -> Result<(StatusCode, Json<ActivityDetails>), ApiError> {
    let activity = state.lifecycle.add_progress(id, actor, &body.message).await?;
    Ok((StatusCode::CREATED, Json(state.board.describe_activity(activity).await?)))
}
