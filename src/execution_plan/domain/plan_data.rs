//! Structured body of an execution plan, stored as a JSONB document.

use super::PlanDomainError;
use crate::{
    agent::domain::AgentId,
    document::Document,
    task::domain::{TaskId, TaskPriority},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const MAX_TEST_COVERAGE: u32 = 100;

/// Ordered work list with global constraints and guidance for agents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanData {
    /// Tasks in the order they should be worked on.
    pub priority_order: Vec<TaskPriorityItem>,
    /// Constraints applying to the whole plan.
    pub constraints: PlanConstraints,
    /// Areas agents should concentrate on.
    pub focus_areas: Vec<String>,
    /// Free-form guidance.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// One task's place in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPriorityItem {
    /// Planned task.
    pub task_id: TaskId,
    /// Task title as known when planning.
    #[serde(default)]
    pub title: String,
    /// Agent expected to work on the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<AgentId>,
    /// Planned priority.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Tasks that should be finished first.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// Item-specific constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Document>,
    /// Effort estimate, free-form.
    #[serde(default)]
    pub estimated_effort: String,
    /// Item notes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl TaskPriorityItem {
    /// Creates an unstaffed item with default priority.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            assigned_agent_id: None,
            priority: TaskPriority::default(),
            dependencies: Vec::new(),
            constraints: None,
            estimated_effort: String::new(),
            notes: String::new(),
        }
    }

    /// Names the agent expected to work on the task.
    #[must_use]
    pub const fn with_agent(mut self, agent_id: AgentId) -> Self {
        self.assigned_agent_id = Some(agent_id);
        self
    }

    /// Sets the tasks this item depends on.
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self
    }
}

/// Constraints applying to every task of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConstraints {
    /// Upper bound on tasks worked on at once; `0` means unbounded.
    pub max_parallel_tasks: u32,
    /// Whether finished work needs a code review.
    pub code_review_required: bool,
    /// Minimum test coverage percentage.
    pub test_coverage_min: u32,
}

impl PlanData {
    /// Checks the plan's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError`] when the coverage target exceeds 100, a
    /// task is listed twice, or an item depends on itself.
    pub fn validate(&self) -> Result<(), PlanDomainError> {
        if self.constraints.test_coverage_min > MAX_TEST_COVERAGE {
            return Err(PlanDomainError::TestCoverageOutOfRange(
                self.constraints.test_coverage_min,
            ));
        }
        let mut seen = BTreeSet::new();
        for item in &self.priority_order {
            if !seen.insert(item.task_id) {
                return Err(PlanDomainError::DuplicatePlanItem(item.task_id));
            }
            if item.dependencies.contains(&item.task_id) {
                return Err(PlanDomainError::SelfDependency(item.task_id));
            }
        }
        Ok(())
    }

    /// Returns every task the plan refers to, as items or dependencies.
    #[must_use]
    pub fn referenced_tasks(&self) -> BTreeSet<TaskId> {
        self.priority_order
            .iter()
            .flat_map(|item| std::iter::once(item.task_id).chain(item.dependencies.iter().copied()))
            .collect()
    }

    /// Returns every agent named by the plan.
    #[must_use]
    pub fn referenced_agents(&self) -> BTreeSet<AgentId> {
        self.priority_order
            .iter()
            .filter_map(|item| item.assigned_agent_id)
            .collect()
    }

    /// Returns the `(agent, task)` pairs to materialise as assignments, in
    /// priority order.
    #[must_use]
    pub fn staffed_items(&self) -> Vec<(AgentId, TaskId)> {
        self.priority_order
            .iter()
            .filter_map(|item| item.assigned_agent_id.map(|agent_id| (agent_id, item.task_id)))
            .collect()
    }
}
