//! Diesel row models for execution plan persistence.

use super::schema::{agent_assignments, execution_plans, execution_reports};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for plan records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = execution_plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlanRow {
    /// Plan identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Creator identifier.
    pub created_by: i64,
    /// Creator kind.
    pub creator_type: String,
    /// Plan body.
    pub plan_data: Value,
    /// Plan status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for plan records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = execution_plans)]
pub struct NewPlanRow {
    /// Owning project.
    pub project_id: i64,
    /// Creator identifier.
    pub created_by: i64,
    /// Creator kind.
    pub creator_type: String,
    /// Plan body.
    pub plan_data: Value,
    /// Plan status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for assignment records.
///
/// Also loaded from the raw claim and completion statements.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = agent_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssignmentRow {
    /// Assignment identifier.
    pub id: i64,
    /// Owning plan.
    pub plan_id: i64,
    /// Assigned agent.
    pub agent_id: i64,
    /// Assigned task.
    pub task_id: i64,
    /// Assignment status.
    pub status: String,
    /// Pick-up timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// End timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completion report.
    pub report_data: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for assignment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agent_assignments)]
pub struct NewAssignmentRow {
    /// Owning plan.
    pub plan_id: i64,
    /// Assigned agent.
    pub agent_id: i64,
    /// Assigned task.
    pub task_id: i64,
    /// Assignment status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for report records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = execution_reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReportRow {
    /// Report identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Report kind.
    pub report_type: String,
    /// Generator identifier.
    pub generated_by: i64,
    /// Generator kind.
    pub generator_type: String,
    /// Report body.
    pub report_data: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for report records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = execution_reports)]
pub struct NewReportRow {
    /// Owning project.
    pub project_id: i64,
    /// Report kind.
    pub report_type: String,
    /// Generator identifier.
    pub generated_by: i64,
    /// Generator kind.
    pub generator_type: String,
    /// Report body.
    pub report_data: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
