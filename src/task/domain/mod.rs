//! Domain model for tasks and their activity log.
//!
//! The task domain models the status state machine, task priorities, partial
//! updates, and immutable activity records while keeping all infrastructure
//! concerns outside of the domain boundary.

mod activity;
mod error;
mod priority;
mod status;
mod task;

pub use activity::{
    ActivityAction, ActivityId, NewTaskActivity, PersistedTaskActivityData, TaskActivity,
    validate_progress_message, validate_transition_message,
};
pub use error::{
    ParseActivityActionError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
};
pub use priority::TaskPriority;
pub use status::{TaskStatus, TaskStatusCounts, TaskTransition};
pub use task::{NewTask, PersistedTaskData, Task, TaskFilter, TaskId, TaskPatch};
