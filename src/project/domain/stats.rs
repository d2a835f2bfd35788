//! Aggregated project statistics.

use crate::task::domain::TaskStatusCounts;
use serde::Serialize;

/// Task and agent totals for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    /// Number of tasks in any status.
    pub total_tasks: u64,
    /// Tasks that are `done` or `closed`.
    pub completed_tasks: u64,
    /// Tasks that are `open` or `in_progress`.
    pub pending_tasks: u64,
    /// Registered agents.
    pub total_agents: u64,
    /// Per-status task counts.
    pub tasks_by_status: TaskStatusCounts,
}

impl ProjectStats {
    /// Builds statistics from per-status task counts and an agent total.
    #[must_use]
    pub const fn new(tasks_by_status: TaskStatusCounts, total_agents: u64) -> Self {
        Self {
            total_tasks: tasks_by_status.total(),
            completed_tasks: tasks_by_status.completed(),
            pending_tasks: tasks_by_status.pending(),
            total_agents,
            tasks_by_status,
        }
    }
}
