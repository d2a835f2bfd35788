//! Application services for task lifecycle and board orchestration.

mod board;
mod lifecycle;

pub use board::{
    ActivityDetails, CreateTaskRequest, TaskBoardError, TaskBoardResult, TaskBoardService,
    TaskDetails,
};
pub use lifecycle::{
    AGENT_COMPLETION_MESSAGE, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
