//! Service layer for execution plans and reports.

use crate::{
    actor::Actor,
    agent::{
        domain::AgentId,
        ports::{AgentRepository, AgentRepositoryError},
    },
    document::Document,
    execution_plan::{
        domain::{
            AgentAssignment, AssignmentDetails, AssignmentStatus, ExecutionPlan,
            ExecutionReport, NewExecutionPlan, NewExecutionReport, PlanData, PlanDetails,
            PlanDomainError, PlanId, PlanPatch, PlanStatus, ReportType,
        },
        ports::{
            AssignmentRepository, ExecutionPlanRepository, ExecutionReportRepository,
            ExecutionStoreError,
        },
    },
    project::{
        domain::{Project, ProjectId},
        ports::{ProjectRepository, ProjectRepositoryError},
    },
    task::{
        domain::{TaskId, TaskStatusCounts},
        ports::{TaskRepository, TaskRepositoryError},
    },
    user::ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlanRequest {
    project_id: ProjectId,
    plan_data: PlanData,
    status: PlanStatus,
}

impl CreatePlanRequest {
    /// Creates a request for an active plan.
    #[must_use]
    pub fn new(project_id: ProjectId, plan_data: PlanData) -> Self {
        Self {
            project_id,
            plan_data,
            status: PlanStatus::Active,
        }
    }

    /// Sets the initial status; only `active` and `draft` are accepted.
    #[must_use]
    pub const fn with_status(mut self, status: PlanStatus) -> Self {
        self.status = status;
        self
    }
}

/// Service-level errors for plan and report operations.
#[derive(Debug, Error)]
pub enum PlanServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PlanDomainError),
    /// Execution store operation failed.
    #[error(transparent)]
    Store(#[from] ExecutionStoreError),
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The project has no active plan.
    #[error("no active execution plan for project {0}")]
    NoActivePlan(ProjectId),
    /// A plan item names a task outside the project.
    #[error("plan references task {0}, which is not part of the project")]
    UnknownTask(TaskId),
    /// A plan item names an agent outside the project.
    #[error("plan references agent {0}, which is not part of the project")]
    UnknownAgent(AgentId),
    /// Project lookup failed.
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    /// Agent lookup failed.
    #[error(transparent)]
    Agent(#[from] AgentRepositoryError),
    /// User lookup failed.
    #[error(transparent)]
    User(#[from] UserRepositoryError),
}

/// Result type for plan service operations.
pub type PlanServiceResult<T> = Result<T, PlanServiceError>;

/// Execution plan, assignment listing, and report service.
#[derive(Clone)]
pub struct ExecutionPlanService<P, S, R, J, T, A, U, C>
where
    P: ExecutionPlanRepository + ?Sized,
    S: AssignmentRepository + ?Sized,
    R: ExecutionReportRepository + ?Sized,
    J: ProjectRepository + ?Sized,
    T: TaskRepository + ?Sized,
    A: AgentRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    plans: Arc<P>,
    assignments: Arc<S>,
    reports: Arc<R>,
    projects: Arc<J>,
    tasks: Arc<T>,
    agents: Arc<A>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<P, S, R, J, T, A, U, C> ExecutionPlanService<P, S, R, J, T, A, U, C>
where
    P: ExecutionPlanRepository + ?Sized,
    S: AssignmentRepository + ?Sized,
    R: ExecutionReportRepository + ?Sized,
    J: ProjectRepository + ?Sized,
    T: TaskRepository + ?Sized,
    A: AgentRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new plan service.
    #[must_use]
    pub const fn new(
        plans: Arc<P>,
        assignments: Arc<S>,
        reports: Arc<R>,
        projects: Arc<J>,
        tasks: Arc<T>,
        agents: Arc<A>,
        users: Arc<U>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            plans,
            assignments,
            reports,
            projects,
            tasks,
            agents,
            users,
            clock,
        }
    }

    /// Creates a plan for a project.
    ///
    /// An active plan supersedes the project's previous active plan and
    /// queues one pending assignment per staffed item.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError::ProjectNotFound`] for an unknown project,
    /// [`PlanServiceError::UnknownTask`] or [`PlanServiceError::UnknownAgent`]
    /// when an item references something outside the project, and
    /// [`PlanServiceError::Domain`] when the body fails validation.
    pub async fn create_plan(
        &self,
        request: CreatePlanRequest,
        creator: Actor,
    ) -> PlanServiceResult<ExecutionPlan> {
        let CreatePlanRequest {
            project_id,
            plan_data,
            status,
        } = request;
        self.project(project_id).await?;
        let new_plan = NewExecutionPlan::new(project_id, creator, plan_data, status, &*self.clock)?;
        self.check_references(project_id, &new_plan.plan_data).await?;

        let plan = self.plans.create_plan(&new_plan).await?;
        tracing::info!(
            plan_id = %plan.id(),
            project_id = %project_id,
            status = plan.status().as_str(),
            staffed = plan.plan_data().staffed_items().len(),
            "execution plan created"
        );
        Ok(plan)
    }

    /// Returns the active plan of a project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError::NoActivePlan`] when there is none.
    pub async fn active_plan(&self, project_id: ProjectId) -> PlanServiceResult<ExecutionPlan> {
        self.plans
            .find_active_plan(project_id)
            .await?
            .ok_or(PlanServiceError::NoActivePlan(project_id))
    }

    /// Loads a plan by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::PlanNotFound`] (wrapped) when the plan
    /// does not exist.
    pub async fn get_plan(&self, id: PlanId) -> PlanServiceResult<ExecutionPlan> {
        self.plans
            .find_plan(id)
            .await?
            .ok_or_else(|| ExecutionStoreError::PlanNotFound(id).into())
    }

    /// Returns every plan of a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError::ProjectNotFound`] for an unknown project.
    pub async fn list_plans(&self, project_id: ProjectId) -> PlanServiceResult<Vec<ExecutionPlan>> {
        self.project(project_id).await?;
        Ok(self.plans.list_plans(project_id).await?)
    }

    /// Applies a partial update to the project's active plan.
    ///
    /// Replacing the body does not requeue assignments. Moving the plan out
    /// of `active` skips its pending assignments.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError::NoActivePlan`] when there is no active
    /// plan, or a validation error for a replacement body.
    pub async fn update_active_plan(
        &self,
        project_id: ProjectId,
        patch: PlanPatch,
    ) -> PlanServiceResult<ExecutionPlan> {
        let mut plan = self.active_plan(project_id).await?;
        if let Some(plan_data) = patch.plan_data.as_ref() {
            self.check_references(project_id, plan_data).await?;
        }
        plan.apply_patch(patch, &*self.clock)?;
        self.plans.update_plan(&plan).await?;
        tracing::info!(
            plan_id = %plan.id(),
            status = plan.status().as_str(),
            "execution plan updated"
        );
        Ok(plan)
    }

    /// Adds the project name and the creator's display name to a plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError`] when a lookup fails at the persistence
    /// layer.
    pub async fn describe_plan(&self, plan: ExecutionPlan) -> PlanServiceResult<PlanDetails> {
        let project_name = self
            .projects
            .find_by_id(plan.project_id())
            .await?
            .map(|project| project.name().to_owned());
        let creator_name = match plan.created_by() {
            Actor::User(user_id) => self
                .users
                .find_by_id(user_id)
                .await?
                .map(|user| user.username().to_owned()),
            Actor::Agent(agent_id) => self
                .agents
                .find_by_id(agent_id)
                .await?
                .map(|agent| agent.name().as_str().to_owned()),
        };
        Ok(PlanDetails {
            plan,
            project_name,
            creator_name,
        })
    }

    /// Returns the assignments of a plan in dispatch order, with agent names
    /// and task titles.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::PlanNotFound`] (wrapped) when the plan
    /// does not exist.
    pub async fn list_assignments(&self, plan_id: PlanId) -> PlanServiceResult<Vec<AssignmentDetails>> {
        self.get_plan(plan_id).await?;
        let assignments = self.assignments.list_for_plan(plan_id).await?;
        let mut details = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let agent_name = self
                .agents
                .find_by_id(assignment.agent_id())
                .await?
                .map(|agent| agent.name().as_str().to_owned());
            let task_title = self
                .tasks
                .find_by_id(assignment.task_id())
                .await?
                .map(|task| task.title().to_owned());
            details.push(AssignmentDetails {
                assignment,
                agent_name,
                task_title,
            });
        }
        Ok(details)
    }

    /// Stores a report for a project.
    ///
    /// Without a body, a snapshot of the project's task counts and the
    /// active plan's assignment progress is recorded instead.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError::ProjectNotFound`] for an unknown project.
    pub async fn generate_report(
        &self,
        project_id: ProjectId,
        report_type: ReportType,
        body: Option<Document>,
        generator: Actor,
    ) -> PlanServiceResult<ExecutionReport> {
        let project = self.project(project_id).await?;
        let report = match body {
            Some(document) => document,
            None => self.snapshot(&project).await?,
        };
        let new_report = NewExecutionReport {
            project_id,
            report_type,
            generated_by: generator,
            report,
            created_at: self.clock.utc(),
        };
        let stored = self.reports.create_report(&new_report).await?;
        tracing::info!(
            report_id = %stored.id(),
            project_id = %project_id,
            report_type = report_type.as_str(),
            "execution report generated"
        );
        Ok(stored)
    }

    /// Returns a project's reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError::ProjectNotFound`] for an unknown project.
    pub async fn list_reports(
        &self,
        project_id: ProjectId,
        report_type: Option<ReportType>,
    ) -> PlanServiceResult<Vec<ExecutionReport>> {
        self.project(project_id).await?;
        Ok(self.reports.list_reports(project_id, report_type).await?)
    }

    async fn project(&self, project_id: ProjectId) -> PlanServiceResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(PlanServiceError::ProjectNotFound(project_id))
    }

    async fn check_references(&self, project_id: ProjectId, plan_data: &PlanData) -> PlanServiceResult<()> {
        for task_id in plan_data.referenced_tasks() {
            let in_project = self
                .tasks
                .find_by_id(task_id)
                .await?
                .is_some_and(|task| task.project_id() == project_id);
            if !in_project {
                return Err(PlanServiceError::UnknownTask(task_id));
            }
        }
        for agent_id in plan_data.referenced_agents() {
            let in_project = self
                .agents
                .find_by_id(agent_id)
                .await?
                .is_some_and(|agent| agent.project_id() == project_id);
            if !in_project {
                return Err(PlanServiceError::UnknownAgent(agent_id));
            }
        }
        Ok(())
    }

    async fn snapshot(&self, project: &Project) -> PlanServiceResult<Document> {
        let counts = self.tasks.count_by_status(project.id()).await?;
        let active = self.plans.find_active_plan(project.id()).await?;
        let (plan_id, progress) = match active {
            Some(plan) => {
                let assignments = self.assignments.list_for_plan(plan.id()).await?;
                (Document::from(plan.id().value()), assignment_progress(&assignments))
            }
            None => (Document::Null, Document::Null),
        };
        Ok(Document::map([
            ("project_id", Document::from(project.id().value())),
            ("project_name", Document::from(project.name())),
            ("tasks", task_counts(counts)),
            ("active_plan_id", plan_id),
            ("assignments", progress),
        ]))
    }
}

fn task_counts(counts: TaskStatusCounts) -> Document {
    Document::map([
        ("open", Document::from(counts.open)),
        ("in_progress", Document::from(counts.in_progress)),
        ("done", Document::from(counts.done)),
        ("closed", Document::from(counts.closed)),
        ("wont_do", Document::from(counts.wont_do)),
        ("total", Document::from(counts.total())),
    ])
}

fn assignment_progress(assignments: &[AgentAssignment]) -> Document {
    let count = |status: AssignmentStatus| {
        let matching = assignments
            .iter()
            .filter(|assignment| assignment.status() == status)
            .count();
        Document::from(u64::try_from(matching).unwrap_or(u64::MAX))
    };
    Document::map([
        ("pending", count(AssignmentStatus::Pending)),
        ("in_progress", count(AssignmentStatus::InProgress)),
        ("completed", count(AssignmentStatus::Completed)),
        ("failed", count(AssignmentStatus::Failed)),
        ("skipped", count(AssignmentStatus::Skipped)),
    ])
}
