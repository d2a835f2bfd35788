//! Task status state machine.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Open,
    /// Task is being worked on.
    InProgress,
    /// Work is finished and awaiting review.
    Done,
    /// Work has been reviewed and accepted.
    Closed,
    /// Task was dropped without being done.
    WontDo,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Done,
        Self::Closed,
        Self::WontDo,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Closed => "closed",
            Self::WontDo => "wont_do",
        }
    }

    /// Returns `true` when the state machine has an edge from `self` to
    /// `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::InProgress)
                | (Self::InProgress, Self::Done)
                | (Self::Done, Self::Closed)
                | (
                    Self::Open | Self::InProgress | Self::Done | Self::Closed,
                    Self::WontDo
                )
                | (Self::Done | Self::Closed | Self::WontDo, Self::Open)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "closed" => Ok(Self::Closed),
            "wont_do" => Ok(Self::WontDo),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Named status-changing operation on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskTransition {
    /// `open → in_progress`.
    Start,
    /// `in_progress → done`.
    Complete,
    /// `done → closed`.
    Close,
    /// Any status except `wont_do` → `wont_do`.
    WontDo,
    /// `done`, `closed`, or `wont_do` → `open`.
    Reopen,
}

impl TaskTransition {
    /// Returns the operation name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Close => "close",
            Self::WontDo => "wont_do",
            Self::Reopen => "reopen",
        }
    }

    /// Returns the status a successful transition lands in.
    #[must_use]
    pub const fn target(self) -> TaskStatus {
        match self {
            Self::Start => TaskStatus::InProgress,
            Self::Complete => TaskStatus::Done,
            Self::Close => TaskStatus::Closed,
            Self::WontDo => TaskStatus::WontDo,
            Self::Reopen => TaskStatus::Open,
        }
    }

    /// Returns `true` when the transition may be applied from `from`.
    #[must_use]
    pub const fn allows_from(self, from: TaskStatus) -> bool {
        from.can_transition_to(self.target())
    }

    /// Returns the activity message recorded when the caller supplies none.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::Start => "Task started",
            Self::Complete => "Task completed",
            Self::Close => "Task closed after review",
            Self::WontDo => "Task marked as won't do",
            Self::Reopen => "Task reopened",
        }
    }

    /// Validates the transition against a task's current status and returns
    /// the target status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the state machine
    /// has no matching edge.
    pub const fn check(self, task_id: TaskId, from: TaskStatus) -> Result<TaskStatus, TaskDomainError> {
        if self.allows_from(from) {
            Ok(self.target())
        } else {
            Err(TaskDomainError::InvalidTransition {
                task_id,
                from,
                transition: self,
            })
        }
    }
}

impl fmt::Display for TaskTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of tasks in each status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStatusCounts {
    /// Tasks in `open`.
    pub open: u64,
    /// Tasks in `in_progress`.
    pub in_progress: u64,
    /// Tasks in `done`.
    pub done: u64,
    /// Tasks in `closed`.
    pub closed: u64,
    /// Tasks in `wont_do`.
    pub wont_do: u64,
}

impl TaskStatusCounts {
    /// Adds `count` tasks to the bucket for `status`.
    pub const fn add(&mut self, status: TaskStatus, count: u64) {
        match status {
            TaskStatus::Open => self.open += count,
            TaskStatus::InProgress => self.in_progress += count,
            TaskStatus::Done => self.done += count,
            TaskStatus::Closed => self.closed += count,
            TaskStatus::WontDo => self.wont_do += count,
        }
    }

    /// Returns the number of tasks in any status.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.open + self.in_progress + self.done + self.closed + self.wont_do
    }

    /// Returns the number of `done` or `closed` tasks.
    #[must_use]
    pub const fn completed(&self) -> u64 {
        self.done + self.closed
    }

    /// Returns the number of `open` or `in_progress` tasks.
    #[must_use]
    pub const fn pending(&self) -> u64 {
        self.open + self.in_progress
    }
}
