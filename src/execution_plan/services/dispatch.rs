//! Assignment dispatch: agents pull their next task and report completion.
//!
//! Claims and completions are single atomic store operations, so two agents
//! (or two requests from one agent) never receive the same assignment and a
//! completion is applied at most once.

use crate::{
    actor::Actor,
    agent::{
        domain::{Agent, AgentId},
        ports::{AgentRepository, AgentRepositoryError},
    },
    document::Document,
    execution_plan::{
        domain::{AgentAssignment, AgentContext, AssignmentDetails},
        ports::{AssignmentRepository, ExecutionPlanRepository, ExecutionStoreError},
    },
    project::domain::ProjectId,
    task::{
        domain::{TaskDomainError, TaskId, validate_transition_message},
        ports::{TaskActivityLog, TaskRepository, TaskRepositoryError},
        services::TaskLifecycleService,
    },
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Message returned when the agent has nothing pending.
pub const NO_PENDING_TASKS_MESSAGE: &str = "No pending tasks available";

/// Message returned alongside a freshly claimed assignment.
pub const TASK_ASSIGNED_MESSAGE: &str = "Task assigned";

/// Outcome of asking for the next task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextTask {
    /// The claimed assignment, now `in_progress`.
    pub assignment: Option<AssignmentDetails>,
    /// Guidance from the assignment's plan.
    pub context: Option<AgentContext>,
    /// Human-readable outcome.
    pub message: &'static str,
}

impl NextTask {
    /// Returns the empty-queue outcome.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            assignment: None,
            context: None,
            message: NO_PENDING_TASKS_MESSAGE,
        }
    }
}

/// Request payload for an agent reporting completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteTaskRequest {
    task_id: TaskId,
    report: Option<Document>,
    message: Option<String>,
}

impl CompleteTaskRequest {
    /// Creates a completion report for a task without body or message.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            report: None,
            message: None,
        }
    }

    /// Attaches a report document.
    #[must_use]
    pub fn with_report(mut self, report: Document) -> Self {
        self.report = Some(report);
        self
    }

    /// Sets the activity message used if the task is completed.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Service-level errors for dispatch operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The agent does not exist.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),
    /// The agent holds no live assignment for the task.
    #[error("agent {agent_id} has no live assignment for task {task_id}")]
    AssignmentNotFound {
        /// Reporting agent.
        agent_id: AgentId,
        /// Reported task.
        task_id: TaskId,
    },
    /// The agent's project has no active plan.
    #[error("no active execution plan for project {0}")]
    NoActivePlan(ProjectId),
    /// The completion message failed validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Execution store operation failed.
    #[error(transparent)]
    Store(#[from] ExecutionStoreError),
    /// Agent lookup failed.
    #[error(transparent)]
    Agent(#[from] AgentRepositoryError),
    /// Task lookup failed.
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Hands assignments to agents and records their completion.
#[derive(Clone)]
pub struct AssignmentDispatcher<P, S, A, T, L, C>
where
    P: ExecutionPlanRepository + ?Sized,
    S: AssignmentRepository + ?Sized,
    A: AgentRepository + ?Sized,
    T: TaskRepository + ?Sized,
    L: TaskActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    plans: Arc<P>,
    assignments: Arc<S>,
    agents: Arc<A>,
    tasks: Arc<T>,
    lifecycle: TaskLifecycleService<T, L, C>,
    clock: Arc<C>,
}

impl<P, S, A, T, L, C> AssignmentDispatcher<P, S, A, T, L, C>
where
    P: ExecutionPlanRepository + ?Sized,
    S: AssignmentRepository + ?Sized,
    A: AgentRepository + ?Sized,
    T: TaskRepository + ?Sized,
    L: TaskActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new dispatcher.
    #[must_use]
    pub fn new(
        plans: Arc<P>,
        assignments: Arc<S>,
        agents: Arc<A>,
        tasks: Arc<T>,
        activities: Arc<L>,
        clock: Arc<C>,
    ) -> Self {
        let lifecycle = TaskLifecycleService::new(Arc::clone(&tasks), activities, Arc::clone(&clock));
        Self {
            plans,
            assignments,
            agents,
            tasks,
            lifecycle,
            clock,
        }
    }

    /// Claims the agent's oldest pending assignment.
    ///
    /// An empty queue is not an error: the result then carries neither
    /// assignment nor context. When the owning plan cannot be read the
    /// assignment is still returned, without context. An assignment whose
    /// task has been deleted is skipped and the next one is claimed.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AgentNotFound`] for an unknown agent, or a
    /// store error when the claim itself fails.
    pub async fn next_task(&self, agent_id: AgentId) -> DispatchResult<NextTask> {
        let agent = self.agent(agent_id).await?;
        let (assignment, task_title) = loop {
            let Some(claimed) = self
                .assignments
                .claim_next(agent_id, self.clock.utc())
                .await?
            else {
                tracing::debug!(agent_id = %agent_id, "no pending assignment");
                return Ok(NextTask::empty());
            };
            match self.tasks.find_by_id(claimed.task_id()).await {
                Ok(Some(task)) => break (claimed, Some(task.title().to_owned())),
                Ok(None) => {
                    tracing::warn!(
                        assignment_id = %claimed.id(),
                        task_id = %claimed.task_id(),
                        "claimed assignment points at a deleted task"
                    );
                    self.retire_task(claimed.task_id()).await?;
                }
                Err(err) => {
                    tracing::warn!(task_id = %claimed.task_id(), error = %err, "failed to load assigned task");
                    break (claimed, None);
                }
            }
        };
        let context = match self.plans.find_plan(assignment.plan_id()).await {
            Ok(plan) => plan.as_ref().map(AgentContext::from),
            Err(err) => {
                tracing::warn!(plan_id = %assignment.plan_id(), error = %err, "failed to load plan context");
                None
            }
        };

        tracing::info!(
            agent_id = %agent_id,
            assignment_id = %assignment.id(),
            task_id = %assignment.task_id(),
            "assignment dispatched"
        );
        Ok(NextTask {
            assignment: Some(AssignmentDetails {
                assignment,
                agent_name: Some(agent.name().as_str().to_owned()),
                task_title,
            }),
            context,
            message: TASK_ASSIGNED_MESSAGE,
        })
    }

    /// Completes the agent's most recent live assignment for a task.
    ///
    /// If the task is `in_progress` it is driven to `done` with an activity
    /// attributed to the agent; any other task status is left alone. A
    /// failure of that follow-up is logged and does not undo the completed
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AgentNotFound`] for an unknown agent,
    /// [`DispatchError::Domain`] for a message over 1000 characters, and
    /// [`DispatchError::AssignmentNotFound`] when no live assignment matches.
    pub async fn complete_task(
        &self,
        agent_id: AgentId,
        request: CompleteTaskRequest,
    ) -> DispatchResult<AgentAssignment> {
        let CompleteTaskRequest {
            task_id,
            report,
            message,
        } = request;
        self.agent(agent_id).await?;
        validate_transition_message(message.as_deref())?;

        let assignment = self
            .assignments
            .complete_live(agent_id, task_id, report, self.clock.utc())
            .await?
            .ok_or(DispatchError::AssignmentNotFound { agent_id, task_id })?;
        tracing::info!(
            agent_id = %agent_id,
            assignment_id = %assignment.id(),
            task_id = %task_id,
            "assignment completed"
        );

        match self
            .lifecycle
            .complete_if_in_progress(task_id, Actor::Agent(agent_id), message.as_deref())
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!(task_id = %task_id, "task not in progress, status left unchanged");
            }
            Err(err) => {
                tracing::warn!(task_id = %task_id, error = %err, "failed to complete task after assignment");
            }
        }
        Ok(assignment)
    }

    /// Returns the context of the active plan of the agent's project.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AgentNotFound`] for an unknown agent and
    /// [`DispatchError::NoActivePlan`] when the project has no active plan.
    pub async fn agent_context(&self, agent_id: AgentId) -> DispatchResult<AgentContext> {
        let agent = self.agent(agent_id).await?;
        let project_id = agent.project_id();
        self.plans
            .find_active_plan(project_id)
            .await?
            .as_ref()
            .map(AgentContext::from)
            .ok_or(DispatchError::NoActivePlan(project_id))
    }

    /// Skips every live assignment of a deleted task so it can no longer be
    /// dispatched. Returns how many assignments changed.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Store`] when persistence fails.
    pub async fn retire_task(&self, task_id: TaskId) -> DispatchResult<u64> {
        let skipped = self
            .assignments
            .skip_live_for_task(task_id, self.clock.utc())
            .await?;
        if skipped > 0 {
            tracing::info!(task_id = %task_id, skipped, "live assignments skipped");
        }
        Ok(skipped)
    }

    async fn agent(&self, agent_id: AgentId) -> DispatchResult<Agent> {
        self.agents
            .find_by_id(agent_id)
            .await?
            .ok_or(DispatchError::AgentNotFound(agent_id))
    }
}
