//! Execution report handlers.

use super::optional_body;
use crate::{
    api::{ApiError, AppState, CurrentActor},
    document::Document,
    execution_plan::domain::{ExecutionReport, ReportType},
    project::domain::ProjectId,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateReportBody {
    report_type: ReportType,
    report_data: Option<Document>,
}

#[derive(Debug, Default, Deserialize)]
struct TypedReportBody {
    report_data: Option<Document>,
}

/// GET /api/projects/{id}/reports
pub(crate) async fn list_reports(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<ExecutionReport>>, ApiError> {
    Ok(Json(state.planning.list_reports(project_id, None).await?))
}

/// POST /api/projects/{id}/reports/generate
pub(crate) async fn generate_report(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(project_id): Path<ProjectId>,
    Json(body): Json<GenerateReportBody>,
) -> Result<(StatusCode, Json<ExecutionReport>), ApiError> {
    let report = state
        .planning
        .generate_report(project_id, body.report_type, body.report_data, actor)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

async fn list_typed(
    state: &AppState,
    project_id: ProjectId,
    report_type: ReportType,
) -> Result<Json<Vec<ExecutionReport>>, ApiError> {
    Ok(Json(
        state
            .planning
            .list_reports(project_id, Some(report_type))
            .await?,
    ))
}

async fn generate_typed(
    state: &AppState,
    actor: CurrentActor,
    project_id: ProjectId,
    report_type: ReportType,
    body: &Bytes,
) -> Result<(StatusCode, Json<ExecutionReport>), ApiError> {
    let TypedReportBody { report_data } = optional_body(body)?;
    let report = state
        .planning
        .generate_report(project_id, report_type, report_data, actor.0)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/projects/{id}/reports/daily
pub(crate) async fn daily_reports(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<ExecutionReport>>, ApiError> {
    list_typed(&state, project_id, ReportType::Daily).await
}

/// GET /api/projects/{id}/reports/weekly
pub(crate) async fn weekly_reports(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<ExecutionReport>>, ApiError> {
    list_typed(&state, project_id, ReportType::Weekly).await
}

/// POST /api/projects/{id}/reports/daily
pub(crate) async fn generate_daily(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
    body: Bytes,
) -> Result<(StatusCode, Json<ExecutionReport>), ApiError> {
    generate_typed(&state, actor, project_id, ReportType::Daily, &body).await
}

/// POST /api/projects/{id}/reports/weekly
pub(crate) async fn generate_weekly(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(project_id): Path<ProjectId>,
    body: Bytes,
) -> Result<(StatusCode, Json<ExecutionReport>), ApiError> {
    generate_typed(&state, actor, project_id, ReportType::Weekly, &body).await
}
