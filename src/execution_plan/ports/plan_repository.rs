//! Repository port for execution plans.

use crate::{
    execution_plan::domain::{ExecutionPlan, NewExecutionPlan, PlanId},
    project::domain::ProjectId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for execution store operations.
pub type ExecutionStoreResult<T> = Result<T, ExecutionStoreError>;

/// Execution plan persistence contract.
#[async_trait]
pub trait ExecutionPlanRepository: Send + Sync {
    /// Stores a new plan.
    ///
    /// When the plan is `active`, the store cancels the project's previous
    /// active plan, skips that plan's pending assignments, and creates one
    /// `pending` assignment per staffed item, all in one atomic step. Items
    /// whose agent already holds a live assignment for the task are not
    /// queued again.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::ActivePlanConflict`] when a concurrent
    /// writer activated another plan for the same project first.
    async fn create_plan(&self, plan: &NewExecutionPlan) -> ExecutionStoreResult<ExecutionPlan>;

    /// Finds a plan by identifier.
    async fn find_plan(&self, id: PlanId) -> ExecutionStoreResult<Option<ExecutionPlan>>;

    /// Returns the single active plan of a project, if any.
    async fn find_active_plan(
        &self,
        project_id: ProjectId,
    ) -> ExecutionStoreResult<Option<ExecutionPlan>>;

    /// Returns every plan of a project, newest first.
    async fn list_plans(&self, project_id: ProjectId) -> ExecutionStoreResult<Vec<ExecutionPlan>>;

    /// Persists the body, status, and `updated_at` of a plan.
    ///
    /// Moving a plan out of `active` skips its pending assignments.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionStoreError::PlanNotFound`] when the plan does not
    /// exist.
    async fn update_plan(&self, plan: &ExecutionPlan) -> ExecutionStoreResult<()>;
}

/// Errors returned by execution store implementations.
#[derive(Debug, Clone, Error)]
pub enum ExecutionStoreError {
    /// The plan was not found.
    #[error("execution plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Another plan is already active for the project.
    #[error("project {0} already has an active execution plan")]
    ActivePlanConflict(ProjectId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ExecutionStoreError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
