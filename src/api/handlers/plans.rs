//! Execution plan handlers.

use crate::{
    api::{ApiError, AppState, CurrentActor},
    execution_plan::{
        domain::{AssignmentDetails, PlanData, PlanDetails, PlanId, PlanPatch, PlanStatus},
        services::CreatePlanRequest,
    },
    project::domain::ProjectId,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CreatePlanBody {
    #[serde(default)]
    plan_data: PlanData,
    status: Option<PlanStatus>,
}

/// POST /api/projects/{id}/execution-plan
pub(crate) async fn create_plan(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<CreatePlanBody>,
) -> Result<(StatusCode, Json<PlanDetails>), ApiError> {
    let mut request = CreatePlanRequest::new(project_id, body.plan_data);
    if let Some(initial) = body.status {
        request = request.with_status(initial);
    }
    let plan = state.planning.create_plan(request, actor).await?;
    Ok((StatusCode::CREATED, Json(state.planning.describe_plan(plan).await?)))
}

/// GET /api/projects/{id}/execution-plan
pub(crate) async fn active_plan(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<PlanDetails>, ApiError> {
    let plan = state.planning.active_plan(project_id).await?;
    Ok(Json(state.planning.describe_plan(plan).await?))
}

/// PUT /api/projects/{id}/execution-plan
pub(crate) async fn update_active_plan(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
    Json(patch): Json<PlanPatch>,
) -> Result<Json<PlanDetails>, ApiError> {
    let plan = state.planning.update_active_plan(project_id, patch).await?;
    Ok(Json(state.planning.describe_plan(plan).await?))
}

/// GET /api/projects/{id}/execution-plans
pub(crate) async fn list_plans(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<PlanDetails>>, ApiError> {
    let plans = state.planning.list_plans(project_id).await?;
    let mut details = Vec::with_capacity(plans.len());
    for plan in plans {
        details.push(state.planning.describe_plan(plan).await?);
    }
    Ok(Json(details))
}

/// GET /api/execution-plans/{id}
pub(crate) async fn get_plan(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<PlanId>,
) -> Result<Json<PlanDetails>, ApiError> {
    let plan = state.planning.get_plan(id).await?;
    Ok(Json(state.planning.describe_plan(plan).await?))
}

/// GET /api/execution-plans/{id}/assignments
pub(crate) async fn plan_assignments(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<PlanId>,
) -> Result<Json<Vec<AssignmentDetails>>, ApiError> {
    Ok(Json(state.planning.list_assignments(id).await?))
}
