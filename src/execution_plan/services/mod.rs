//! Application services for execution plans and assignment dispatch.

mod dispatch;
mod planning;

pub use dispatch::{
    AssignmentDispatcher, CompleteTaskRequest, DispatchError, DispatchResult, NextTask,
    NO_PENDING_TASKS_MESSAGE, TASK_ASSIGNED_MESSAGE,
};
pub use planning::{
    CreatePlanRequest, ExecutionPlanService, PlanServiceError, PlanServiceResult,
};
