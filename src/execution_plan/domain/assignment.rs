//! Agent assignment aggregate.

use super::{AssignmentStatus, PlanDomainError, PlanId};
use crate::{agent::domain::AgentId, document::Document, ids::integer_id, task::domain::TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

integer_id! {
    /// Store-assigned assignment identifier.
    AssignmentId
}

/// One task handed to one agent under a plan.
///
/// At most one assignment per `(agent, task)` pair is live at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAssignment {
    id: AssignmentId,
    plan_id: PlanId,
    agent_id: AgentId,
    task_id: TaskId,
    status: AssignmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "report_data", skip_serializing_if = "Option::is_none")]
    report: Option<Document>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedAssignmentData {
    /// Persisted assignment identifier.
    pub id: AssignmentId,
    /// Owning plan.
    pub plan_id: PlanId,
    /// Assigned agent.
    pub agent_id: AgentId,
    /// Assigned task.
    pub task_id: TaskId,
    /// Persisted status.
    pub status: AssignmentStatus,
    /// When the agent picked the assignment up.
    pub started_at: Option<DateTime<Utc>>,
    /// When the assignment ended.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completion report.
    pub report: Option<Document>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Pending assignment that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAgentAssignment {
    /// Owning plan.
    pub plan_id: PlanId,
    /// Assigned agent.
    pub agent_id: AgentId,
    /// Assigned task.
    pub task_id: TaskId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Assignment enriched with the names of its agent and task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentDetails {
    /// The assignment itself.
    #[serde(flatten)]
    pub assignment: AgentAssignment,
    /// Name of the assigned agent.
    pub agent_name: Option<String>,
    /// Title of the assigned task.
    pub task_title: Option<String>,
}

impl AgentAssignment {
    /// Builds the stored form of a new pending assignment.
    #[must_use]
    pub const fn pending(id: AssignmentId, draft: &NewAgentAssignment) -> Self {
        Self {
            id,
            plan_id: draft.plan_id,
            agent_id: draft.agent_id,
            task_id: draft.task_id,
            status: AssignmentStatus::Pending,
            started_at: None,
            completed_at: None,
            report: None,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        }
    }

    /// Reconstructs an assignment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAssignmentData) -> Self {
        Self {
            id: data.id,
            plan_id: data.plan_id,
            agent_id: data.agent_id,
            task_id: data.task_id,
            status: data.status,
            started_at: data.started_at,
            completed_at: data.completed_at,
            report: data.report,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the assignment identifier.
    #[must_use]
    pub const fn id(&self) -> AssignmentId {
        self.id
    }

    /// Returns the owning plan.
    #[must_use]
    pub const fn plan_id(&self) -> PlanId {
        self.plan_id
    }

    /// Returns the assigned agent.
    #[must_use]
    pub const fn agent_id(&self) -> AgentId {
        self.agent_id
    }

    /// Returns the assigned task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> AssignmentStatus {
        self.status
    }

    /// Returns when the agent picked the assignment up.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the assignment ended.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the completion report.
    #[must_use]
    pub const fn report(&self) -> Option<&Document> {
        self.report.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks a pending assignment as picked up.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::InvalidAssignmentTransition`] unless the
    /// assignment is pending.
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), PlanDomainError> {
        self.move_to(AssignmentStatus::InProgress, at)?;
        self.started_at = Some(at);
        Ok(())
    }

    /// Marks a live assignment as completed and stores its report.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::InvalidAssignmentTransition`] unless the
    /// assignment is live.
    pub fn complete(
        &mut self,
        report: Option<Document>,
        at: DateTime<Utc>,
    ) -> Result<(), PlanDomainError> {
        self.move_to(AssignmentStatus::Completed, at)?;
        self.completed_at = Some(at);
        self.report = report;
        Ok(())
    }

    /// Withdraws a live assignment.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::InvalidAssignmentTransition`] unless the
    /// assignment is live.
    pub fn skip(&mut self, at: DateTime<Utc>) -> Result<(), PlanDomainError> {
        self.move_to(AssignmentStatus::Skipped, at)
    }

    fn move_to(&mut self, target: AssignmentStatus, at: DateTime<Utc>) -> Result<(), PlanDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(PlanDomainError::InvalidAssignmentTransition {
                id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = at;
        Ok(())
    }
}
