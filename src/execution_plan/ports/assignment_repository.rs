//! Repository port for agent assignments.

use super::ExecutionStoreResult;
use crate::{
    agent::domain::AgentId,
    document::Document,
    execution_plan::domain::{AgentAssignment, AssignmentId, PlanId},
    task::domain::TaskId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Assignment persistence contract.
///
/// Assignments are created by [`super::ExecutionPlanRepository::create_plan`];
/// this port only reads and advances them.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Claims the agent's oldest `pending` assignment and moves it to
    /// `in_progress`.
    ///
    /// Concurrent callers never receive the same assignment. Returns `None`
    /// when the agent has nothing pending.
    async fn claim_next(
        &self,
        agent_id: AgentId,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<Option<AgentAssignment>>;

    /// Completes the agent's most recent live assignment for `task_id`.
    ///
    /// Returns `None` when no live assignment matches.
    async fn complete_live(
        &self,
        agent_id: AgentId,
        task_id: TaskId,
        report: Option<Document>,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<Option<AgentAssignment>>;

    /// Finds an assignment by identifier.
    async fn find_assignment(
        &self,
        id: AssignmentId,
    ) -> ExecutionStoreResult<Option<AgentAssignment>>;

    /// Returns the assignments of a plan in dispatch order.
    async fn list_for_plan(&self, plan_id: PlanId) -> ExecutionStoreResult<Vec<AgentAssignment>>;

    /// Skips every live assignment of a task and returns how many changed.
    async fn skip_live_for_task(
        &self,
        task_id: TaskId,
        at: DateTime<Utc>,
    ) -> ExecutionStoreResult<u64>;
}
