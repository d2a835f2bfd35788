//! In-memory execution store for tests and local runs.
//!
//! Plans, assignments, and reports share one lock so that activating a plan
//! and materialising its assignments happen in one step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    agent::domain::AgentId,
    document::Document,
    execution_plan::{
        domain::{
            AgentAssignment, AssignmentId, AssignmentStatus, ExecutionPlan, ExecutionReport,
            NewAgentAssignment, NewExecutionPlan, NewExecutionReport, PersistedPlanData,
            PersistedReportData, PlanId, PlanStatus, ReportId, ReportType,
        },
        ports::{
            AssignmentRepository, ExecutionPlanRepository, ExecutionReportRepository,
            ExecutionStoreError, ExecutionStoreResult,
        },
    },
    project::domain::ProjectId,
    task::domain::TaskId,
};

/// Thread-safe in-memory plan, assignment, and report store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutionStore {
    state: Arc<RwLock<InMemoryExecutionState>>,
}

#[derive(Debug, Default)]
struct InMemoryExecutionState {
    last_plan_id: i64,
    last_assignment_id: i64,
    last_report_id: i64,
    plans: BTreeMap<PlanId, ExecutionPlan>,
    assignments: BTreeMap<AssignmentId, AgentAssignment>,
    reports: BTreeMap<ReportId, ExecutionReport>,
}

impl InMemoryExecutionStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ExecutionStoreResult<RwLockReadGuard<'_, InMemoryExecutionState>> {
        self.state.read().map_err(|err| {
            ExecutionStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ExecutionStoreResult<RwLockWriteGuard<'_, InMemoryExecutionState>> {
        self.state.write().map_err(|err| {
            ExecutionStoreError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryExecutionState {
    fn skip_pending_for_plan(&mut self, plan_id: PlanId, at: DateTime<Utc>) -> ExecutionStoreResult<()> {
        for assignment in self.assignments.values_mut().filter(|assignment| {
            assignment.plan_id() == plan_id && assignment.status() == AssignmentStatus::Pending
        }) {
            assignment
                .skip(at)
                .map_err(ExecutionStoreError::invalid_persisted_data)?;
        }
        Ok(())
    }

    fn cancel_active_plans(&mut self, project_id: ProjectId, at: DateTime<Utc>) -> ExecutionStoreResult<()> {
        let active: Vec<PlanId> = self
            .plans
            .values()
            .filter(|plan| plan.project_id() == project_id && plan.status() == PlanStatus::Active)
            .map(ExecutionPlan::id)
            .collect();
        for plan_id in active {
            if let Some(slot) = self.plans.get_mut(&plan_id) {
                let mut data = to_persisted(slot);
                data.status = PlanStatus::Cancelled;
                data.updated_at = at;
                *slot = ExecutionPlan::from_persisted(data);
            }
            self.skip_pending_for_plan(plan_id, at)?;
        }
        Ok(())
    }

    /// Queues the plan's staffed items, leaving out pairs that already hold a
    /// live assignment from an earlier plan.
    fn materialise(&mut self, plan: &ExecutionPlan) {
        for (agent_id, task_id) in plan.plan_data().staffed_items() {
            let already_live = self.assignments.values().any(|assignment| {
                assignment.agent_id() == agent_id
                    && assignment.task_id() == task_id
                    && assignment.status().is_live()
            });
            if already_live {
                continue;
            }
            self.last_assignment_id += 1;
            let id = AssignmentId::new(self.last_assignment_id);
            let draft = NewAgentAssignment {
                plan_id: plan.id(),
                agent_id,
                task_id,
                created_at: plan.created_at(),
            };
            self.assignments
                .insert(id, AgentAssignment::pending(id, &draft));
        }
    }
}

fn to_persisted(plan: &ExecutionPlan) -> PersistedPlanData {
    PersistedPlanData {
        id: plan.id(),
        project_id: plan.project_id(),
        created_by: plan.created_by(),
        plan_data: plan.plan_data().clone(),
        status: plan.status(),
        created_at: plan.created_at(),
        updated_at: plan.updated_at(),
    }
}

#[async_trait]
impl ExecutionPlanRepository for InMemoryExecutionStore {
    async fn create_plan(&self, plan: &NewExecutionPlan) -> ExecutionStoreResult<ExecutionPlan> {
        let mut state = self.write()?;
        if plan.status == PlanStatus::Active {
            state.cancel_active_plans(plan.project_id, plan.created_at)?;
        }

        state.last_plan_id += 1;
        let stored = ExecutionPlan::from_persisted(PersistedPlanData {
            id: PlanId::new(state.last_plan_id),
            project_id: plan.project_id,
            created_by: plan.created_by,
            plan_data: plan.plan_data.clone(),
            status: plan.status,
            created_at: plan.created_at,
            updated_at: plan.created_at,
        });
        state.plans.insert(stored.id(), stored.clone());
        if stored.status() == PlanStatus::Active {
            state.materialise(&stored);
        }
        Ok(stored)
    }

    async fn find_plan(&self, id: PlanId) -> ExecutionStoreResult<Option<ExecutionPlan>> {
        let state = self.read()?;
        Ok(state.plans.get(&id).cloned())
    }

    async fn find_active_plan(
        &self,
        project_id: ProjectId,
    ) -> ExecutionStoreResult<Option<ExecutionPlan>> {
        let state = self.read()?;
        Ok(state
            .plans
            .values()
            .filter(|plan| plan.project_id() == project_id && plan.status() == PlanStatus::Active)
            .max_by_key(|plan| (plan.created_at(), plan.id()))
            .cloned())
    }

    async fn list_plans(&self, project_id: ProjectId) -> ExecutionStoreResult<Vec<ExecutionPlan>> {
        let state = self.read()?;
        Ok(state
            .plans
            .values()
            .rev()
            .filter(|plan| plan.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn update_plan(&self, plan: &ExecutionPlan) -> ExecutionStoreResult<()> {
        let mut state = self.write()?;
        let slot = state
            .plans
            .get_mut(&plan.id())
            .ok_or(ExecutionStoreError::PlanNotFound(plan.id()))?;
        *slot = plan.clone();
        if plan.status() != PlanStatus::Active {
            state.skip_pending_for_plan(plan.id(), plan.updated_at())?;
        }
        Ok(())
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryExecutionStore {
    async fn claim_next(
        &self,
        agent_id: AgentId,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<Option<AgentAssignment>> {
        let mut state = self.write()?;
        let Some(next) = state
            .assignments
            .values_mut()
            .filter(|assignment| {
                assignment.agent_id() == agent_id
                    && assignment.status() == AssignmentStatus::Pending
            })
            .min_by_key(|assignment| (assignment.created_at(), assignment.id()))
        else {
            return Ok(None);
        };
        next.start(at)
            .map_err(ExecutionStoreError::invalid_persisted_data)?;
        Ok(Some(next.clone()))
    }

    async fn complete_live(
        &self,
        agent_id: AgentId,
        task_id: TaskId,
        report: Option<Document>,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<Option<AgentAssignment>> {
        let mut state = self.write()?;
        let Some(live) = state
            .assignments
            .values_mut()
            .filter(|assignment| {
                assignment.agent_id() == agent_id
                    && assignment.task_id() == task_id
                    && assignment.status().is_live()
            })
            .max_by_key(|assignment| (assignment.created_at(), assignment.id()))
        else {
            return Ok(None);
        };
        live.complete(report, at)
            .map_err(ExecutionStoreError::invalid_persisted_data)?;
        Ok(Some(live.clone()))
    }

    async fn find_assignment(
        &self,
        id: AssignmentId,
    ) -> ExecutionStoreResult<Option<AgentAssignment>> {
        let state = self.read()?;
        Ok(state.assignments.get(&id).cloned())
    }

    async fn list_for_plan(&self, plan_id: PlanId) -> ExecutionStoreResult<Vec<AgentAssignment>> {
        let state = self.read()?;
        Ok(state
            .assignments
            .values()
            .filter(|assignment| assignment.plan_id() == plan_id)
            .cloned()
            .collect())
    }

    async fn skip_live_for_task(
        &self,
        task_id: TaskId,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<u64> {
        let mut state = self.write()?;
        let mut skipped = 0;
        for assignment in state.assignments.values_mut().filter(|assignment| {
            assignment.task_id() == task_id && assignment.status().is_live()
        }) {
            assignment
                .skip(at)
                .map_err(ExecutionStoreError::invalid_persisted_data)?;
            skipped += 1;
        }
        Ok(skipped)
    }
}

#[async_trait]
impl ExecutionReportRepository for InMemoryExecutionStore {
    async fn create_report(
        &self,
        report: &NewExecutionReport,
    ) -> ExecutionStoreResult<ExecutionReport> {
        let mut state = self.write()?;
        state.last_report_id += 1;
        let stored = ExecutionReport::from_persisted(PersistedReportData {
            id: ReportId::new(state.last_report_id),
            project_id: report.project_id,
            report_type: report.report_type,
            generated_by: report.generated_by,
            report: report.report.clone(),
            created_at: report.created_at,
        });
        state.reports.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn list_reports(
        &self,
        project_id: ProjectId,
        report_type: Option<ReportType>,
    ) -> ExecutionStoreResult<Vec<ExecutionReport>> {
        let state = self.read()?;
        Ok(state
            .reports
            .values()
            .rev()
            .filter(|report| report.project_id() == project_id)
            .filter(|report| report_type.is_none_or(|kind| report.report_type() == kind))
            .cloned()
            .collect())
    }
}
