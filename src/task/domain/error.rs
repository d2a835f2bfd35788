//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus, TaskTransition};
use thiserror::Error;

/// Errors returned while constructing or changing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is outside the 3 to 200 character range.
    #[error("task title must be between 3 and 200 characters: '{0}'")]
    InvalidTitle(String),

    /// The task description exceeds the 2000-character limit.
    #[error("task description exceeds 2000 character limit ({0} characters)")]
    DescriptionTooLong(usize),

    /// The requested transition is not allowed from the current status.
    #[error("cannot {transition} task {task_id} while it is {from}")]
    InvalidTransition {
        /// Task the transition was attempted on.
        task_id: TaskId,
        /// Status the task was in.
        from: TaskStatus,
        /// Rejected transition.
        transition: TaskTransition,
    },

    /// An activity message is empty or exceeds its length limit.
    #[error("activity message must be between {min} and {max} characters (got {actual})")]
    InvalidMessage {
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
        /// Length of the rejected message.
        actual: usize,
    },
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Error returned while parsing activity actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown activity action: {0}")]
pub struct ParseActivityActionError(pub String);
