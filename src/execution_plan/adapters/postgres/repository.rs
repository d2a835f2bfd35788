//! `PostgreSQL` repository implementation for plans, assignments, and
//! reports.
//!
//! Assignment claims run as a single `UPDATE ... WHERE id = (SELECT ... FOR
//! UPDATE SKIP LOCKED)` so concurrent agents never receive the same row.

use super::{
    models::{
        AssignmentRow, NewAssignmentRow, NewPlanRow, NewReportRow, PlanRow, ReportRow,
    },
    schema::{agent_assignments, execution_plans, execution_reports},
};
use crate::{
    actor::Actor,
    agent::domain::AgentId,
    document::Document,
    execution_plan::{
        domain::{
            AgentAssignment, AssignmentId, AssignmentStatus, ExecutionPlan, ExecutionReport,
            NewExecutionPlan, NewExecutionReport, PersistedAssignmentData, PersistedPlanData,
            PersistedReportData, PlanData, PlanId, PlanStatus, ReportId, ReportType,
        },
        ports::{
            AssignmentRepository, ExecutionPlanRepository, ExecutionReportRepository,
            ExecutionStoreError, ExecutionStoreResult,
        },
    },
    project::domain::ProjectId,
    task::domain::TaskId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::{BigInt, Jsonb, Nullable, Timestamptz};
use serde_json::Value;

/// `PostgreSQL` connection pool type used by execution adapters.
pub type ExecutionPgPool = Pool<ConnectionManager<PgConnection>>;

const LIVE_STATUSES: [&str; 2] = ["pending", "in_progress"];

/// `PostgreSQL`-backed plan, assignment, and report store.
#[derive(Debug, Clone)]
pub struct PostgresExecutionStore {
    pool: ExecutionPgPool,
}

impl From<DieselError> for ExecutionStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresExecutionStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ExecutionPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ExecutionStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ExecutionStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ExecutionStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ExecutionStoreError::persistence)?
    }
}

fn skip_pending_for_plan(
    connection: &mut PgConnection,
    plan_id: i64,
    at: DateTime<Utc>,
) -> ExecutionStoreResult<()> {
    diesel::update(
        agent_assignments::table
            .filter(agent_assignments::plan_id.eq(plan_id))
            .filter(agent_assignments::status.eq(AssignmentStatus::Pending.as_str())),
    )
    .set((
        agent_assignments::status.eq(AssignmentStatus::Skipped.as_str()),
        agent_assignments::updated_at.eq(at),
    ))
    .execute(connection)?;
    Ok(())
}

#[async_trait]
impl ExecutionPlanRepository for PostgresExecutionStore {
    async fn create_plan(&self, plan: &NewExecutionPlan) -> ExecutionStoreResult<ExecutionPlan> {
        let project_id = plan.project_id;
        let activate = plan.status == PlanStatus::Active;
        let at = plan.created_at;
        let staffed = plan.plan_data.staffed_items();
        let new_row = NewPlanRow {
            project_id: project_id.value(),
            created_by: plan.created_by.id_value(),
            creator_type: plan.created_by.kind().as_str().to_owned(),
            plan_data: serde_json::to_value(&plan.plan_data)
                .map_err(ExecutionStoreError::persistence)?,
            status: plan.status.as_str().to_owned(),
            created_at: at,
            updated_at: at,
        };

        self.run_blocking(move |connection| {
            let row = connection.transaction::<_, ExecutionStoreError, _>(|tx| {
                if activate {
                    let previous = diesel::update(
                        execution_plans::table
                            .filter(execution_plans::project_id.eq(project_id.value()))
                            .filter(execution_plans::status.eq(PlanStatus::Active.as_str())),
                    )
                    .set((
                        execution_plans::status.eq(PlanStatus::Cancelled.as_str()),
                        execution_plans::updated_at.eq(at),
                    ))
                    .returning(execution_plans::id)
                    .get_results::<i64>(tx)?;
                    for previous_id in previous {
                        skip_pending_for_plan(tx, previous_id, at)?;
                    }
                }

                let stored = diesel::insert_into(execution_plans::table)
                    .values(&new_row)
                    .returning(PlanRow::as_returning())
                    .get_result::<PlanRow>(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ExecutionStoreError::ActivePlanConflict(project_id)
                        }
                        _ => ExecutionStoreError::persistence(err),
                    })?;

                if activate && !staffed.is_empty() {
                    let live: Vec<(i64, i64)> = agent_assignments::table
                        .filter(agent_assignments::status.eq_any(LIVE_STATUSES))
                        .filter(
                            agent_assignments::task_id
                                .eq_any(staffed.iter().map(|(_, task_id)| task_id.value())),
                        )
                        .select((agent_assignments::agent_id, agent_assignments::task_id))
                        .load(tx)?;
                    let rows: Vec<NewAssignmentRow> = staffed
                        .iter()
                        .filter(|(agent_id, task_id)| {
                            !live.contains(&(agent_id.value(), task_id.value()))
                        })
                        .map(|&(agent_id, task_id)| NewAssignmentRow {
                            plan_id: stored.id,
                            agent_id: agent_id.value(),
                            task_id: task_id.value(),
                            status: AssignmentStatus::Pending.as_str().to_owned(),
                            created_at: at,
                            updated_at: at,
                        })
                        .collect();
                    if !rows.is_empty() {
                        diesel::insert_into(agent_assignments::table)
                            .values(&rows)
                            .execute(tx)?;
                    }
                }
                Ok(stored)
            })?;
            row_to_plan(row)
        })
        .await
    }

    async fn find_plan(&self, id: PlanId) -> ExecutionStoreResult<Option<ExecutionPlan>> {
        self.run_blocking(move |connection| {
            let row = execution_plans::table
                .filter(execution_plans::id.eq(id.value()))
                .select(PlanRow::as_select())
                .first::<PlanRow>(connection)
                .optional()?;
            row.map(row_to_plan).transpose()
        })
        .await
    }

    async fn find_active_plan(
        &self,
        project_id: ProjectId,
    ) -> ExecutionStoreResult<Option<ExecutionPlan>> {
        self.run_blocking(move |connection| {
            let row = execution_plans::table
                .filter(execution_plans::project_id.eq(project_id.value()))
                .filter(execution_plans::status.eq(PlanStatus::Active.as_str()))
                .order((execution_plans::created_at.desc(), execution_plans::id.desc()))
                .select(PlanRow::as_select())
                .first::<PlanRow>(connection)
                .optional()?;
            row.map(row_to_plan).transpose()
        })
        .await
    }

    async fn list_plans(&self, project_id: ProjectId) -> ExecutionStoreResult<Vec<ExecutionPlan>> {
        self.run_blocking(move |connection| {
            let rows = execution_plans::table
                .filter(execution_plans::project_id.eq(project_id.value()))
                .order((execution_plans::created_at.desc(), execution_plans::id.desc()))
                .select(PlanRow::as_select())
                .load::<PlanRow>(connection)?;
            rows.into_iter().map(row_to_plan).collect()
        })
        .await
    }

    async fn update_plan(&self, plan: &ExecutionPlan) -> ExecutionStoreResult<()> {
        let id = plan.id();
        let status = plan.status();
        let updated_at = plan.updated_at();
        let plan_data =
            serde_json::to_value(plan.plan_data()).map_err(ExecutionStoreError::persistence)?;

        self.run_blocking(move |connection| {
            connection.transaction::<_, ExecutionStoreError, _>(|tx| {
                let updated_count =
                    diesel::update(execution_plans::table.filter(execution_plans::id.eq(id.value())))
                        .set((
                            execution_plans::plan_data.eq(&plan_data),
                            execution_plans::status.eq(status.as_str()),
                            execution_plans::updated_at.eq(updated_at),
                        ))
                        .execute(tx)?;
                if updated_count == 0 {
                    return Err(ExecutionStoreError::PlanNotFound(id));
                }
                if status != PlanStatus::Active {
                    skip_pending_for_plan(tx, id.value(), updated_at)?;
                }
                Ok(())
            })
        })
        .await
    }
}

#[async_trait]
impl AssignmentRepository for PostgresExecutionStore {
    async fn claim_next(
        &self,
        agent_id: AgentId,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<Option<AgentAssignment>> {
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(concat!(
                "UPDATE agent_assignments ",
                "SET status = 'in_progress', started_at = $2, updated_at = $2 ",
                "WHERE id = (",
                "SELECT id FROM agent_assignments ",
                "WHERE agent_id = $1 AND status = 'pending' ",
                "ORDER BY created_at, id ",
                "LIMIT 1 FOR UPDATE SKIP LOCKED) ",
                "RETURNING id, plan_id, agent_id, task_id, status, started_at, ",
                "completed_at, report_data, created_at, updated_at",
            ))
            .bind::<BigInt, _>(agent_id.value())
            .bind::<Timestamptz, _>(at)
            .get_result::<AssignmentRow>(connection)
            .optional()?;
            row.map(row_to_assignment).transpose()
        })
        .await
    }

    async fn complete_live(
        &self,
        agent_id: AgentId,
        task_id: TaskId,
        report: Option<Document>,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<Option<AgentAssignment>> {
        let report_data = report.map(Value::from);
        self.run_blocking(move |connection| {
            let row = diesel::sql_query(concat!(
                "UPDATE agent_assignments ",
                "SET status = 'completed', completed_at = $3, report_data = $4, updated_at = $3 ",
                "WHERE status IN ('pending', 'in_progress') AND id = (",
                "SELECT id FROM agent_assignments ",
                "WHERE agent_id = $1 AND task_id = $2 ",
                "AND status IN ('pending', 'in_progress') ",
                "ORDER BY created_at DESC, id DESC ",
                "LIMIT 1 FOR UPDATE) ",
                "RETURNING id, plan_id, agent_id, task_id, status, started_at, ",
                "completed_at, report_data, created_at, updated_at",
            ))
            .bind::<BigInt, _>(agent_id.value())
            .bind::<BigInt, _>(task_id.value())
            .bind::<Timestamptz, _>(at)
            .bind::<Nullable<Jsonb>, _>(report_data)
            .get_result::<AssignmentRow>(connection)
            .optional()?;
            row.map(row_to_assignment).transpose()
        })
        .await
    }

    async fn find_assignment(
        &self,
        id: AssignmentId,
    ) -> ExecutionStoreResult<Option<AgentAssignment>> {
        self.run_blocking(move |connection| {
            let row = agent_assignments::table
                .filter(agent_assignments::id.eq(id.value()))
                .select(AssignmentRow::as_select())
                .first::<AssignmentRow>(connection)
                .optional()?;
            row.map(row_to_assignment).transpose()
        })
        .await
    }

    async fn list_for_plan(&self, plan_id: PlanId) -> ExecutionStoreResult<Vec<AgentAssignment>> {
        self.run_blocking(move |connection| {
            let rows = agent_assignments::table
                .filter(agent_assignments::plan_id.eq(plan_id.value()))
                .order((agent_assignments::created_at.asc(), agent_assignments::id.asc()))
                .select(AssignmentRow::as_select())
                .load::<AssignmentRow>(connection)?;
            rows.into_iter().map(row_to_assignment).collect()
        })
        .await
    }

    async fn skip_live_for_task(
        &self,
        task_id: TaskId,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<u64> {
        self.run_blocking(move |connection| {
            let skipped = diesel::update(
                agent_assignments::table
                    .filter(agent_assignments::task_id.eq(task_id.value()))
                    .filter(agent_assignments::status.eq_any(LIVE_STATUSES)),
            )
            .set((
                agent_assignments::status.eq(AssignmentStatus::Skipped.as_str()),
                agent_assignments::updated_at.eq(at),
            ))
            .execute(connection)?;
            u64::try_from(skipped).map_err(ExecutionStoreError::invalid_persisted_data)
        })
        .await
    }
}

#[async_trait]
impl ExecutionReportRepository for PostgresExecutionStore {
    async fn create_report(
        &self,
        report: &NewExecutionReport,
    ) -> ExecutionStoreResult<ExecutionReport> {
        let new_row = NewReportRow {
            project_id: report.project_id.value(),
            report_type: report.report_type.as_str().to_owned(),
            generated_by: report.generated_by.id_value(),
            generator_type: report.generated_by.kind().as_str().to_owned(),
            report_data: Value::from(report.report.clone()),
            created_at: report.created_at,
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(execution_reports::table)
                .values(&new_row)
                .returning(ReportRow::as_returning())
                .get_result::<ReportRow>(connection)?;
            row_to_report(row)
        })
        .await
    }

    async fn list_reports(
        &self,
        project_id: ProjectId,
        report_type: Option<ReportType>,
    ) -> ExecutionStoreResult<Vec<ExecutionReport>> {
        self.run_blocking(move |connection| {
            let mut query = execution_reports::table
                .filter(execution_reports::project_id.eq(project_id.value()))
                .select(ReportRow::as_select())
                .into_boxed();
            if let Some(kind) = report_type {
                query = query.filter(execution_reports::report_type.eq(kind.as_str()));
            }
            let rows = query
                .order((execution_reports::created_at.desc(), execution_reports::id.desc()))
                .load::<ReportRow>(connection)?;
            rows.into_iter().map(row_to_report).collect()
        })
        .await
    }
}

fn row_to_plan(row: PlanRow) -> ExecutionStoreResult<ExecutionPlan> {
    let created_by = Actor::from_parts(&row.creator_type, row.created_by)
        .map_err(ExecutionStoreError::invalid_persisted_data)?;
    let plan_data = serde_json::from_value::<PlanData>(row.plan_data)
        .map_err(ExecutionStoreError::invalid_persisted_data)?;
    let status = PlanStatus::try_from(row.status.as_str())
        .map_err(ExecutionStoreError::invalid_persisted_data)?;
    Ok(ExecutionPlan::from_persisted(PersistedPlanData {
        id: PlanId::new(row.id),
        project_id: ProjectId::new(row.project_id),
        created_by,
        plan_data,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_assignment(row: AssignmentRow) -> ExecutionStoreResult<AgentAssignment> {
    let status = AssignmentStatus::try_from(row.status.as_str())
        .map_err(ExecutionStoreError::invalid_persisted_data)?;
    Ok(AgentAssignment::from_persisted(PersistedAssignmentData {
        id: AssignmentId::new(row.id),
        plan_id: PlanId::new(row.plan_id),
        agent_id: AgentId::new(row.agent_id),
        task_id: TaskId::new(row.task_id),
        status,
        started_at: row.started_at,
        completed_at: row.completed_at,
        report: row.report_data.map(Document::from),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_report(row: ReportRow) -> ExecutionStoreResult<ExecutionReport> {
    let generated_by = Actor::from_parts(&row.generator_type, row.generated_by)
        .map_err(ExecutionStoreError::invalid_persisted_data)?;
    let report_type = ReportType::try_from(row.report_type.as_str())
        .map_err(ExecutionStoreError::invalid_persisted_data)?;
    Ok(ExecutionReport::from_persisted(PersistedReportData {
        id: ReportId::new(row.id),
        project_id: ProjectId::new(row.project_id),
        report_type,
        generated_by,
        report: Document::from(row.report_data),
        created_at: row.created_at,
    }))
}
