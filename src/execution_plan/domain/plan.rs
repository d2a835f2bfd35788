//! Execution plan aggregate.

use super::{PlanData, PlanDomainError, PlanStatus};
use crate::{actor::Actor, ids::integer_id, project::domain::ProjectId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

integer_id! {
    /// Store-assigned execution plan identifier.
    PlanId
}

/// Execution plan for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    id: PlanId,
    project_id: ProjectId,
    created_by: Actor,
    plan_data: PlanData,
    status: PlanStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Plan enriched with its project name and creator's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanDetails {
    /// The plan itself.
    #[serde(flatten)]
    pub plan: ExecutionPlan,
    /// Name of the owning project.
    pub project_name: Option<String>,
    /// Username or agent name of the creator.
    pub creator_name: Option<String>,
}

/// Parameter object for reconstructing a persisted plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedPlanData {
    /// Persisted plan identifier.
    pub id: PlanId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Creator.
    pub created_by: Actor,
    /// Plan body.
    pub plan_data: PlanData,
    /// Persisted status.
    pub status: PlanStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated plan that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExecutionPlan {
    /// Owning project.
    pub project_id: ProjectId,
    /// Creator.
    pub created_by: Actor,
    /// Plan body.
    pub plan_data: PlanData,
    /// Initial status, `active` or `draft`.
    pub status: PlanStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewExecutionPlan {
    /// Validates and prepares a new plan.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::InvalidInitialStatus`] for statuses other
    /// than `active` and `draft`, or the plan body's validation error.
    pub fn new(
        project_id: ProjectId,
        created_by: Actor,
        plan_data: PlanData,
        status: PlanStatus,
        clock: &impl Clock,
    ) -> Result<Self, PlanDomainError> {
        if !matches!(status, PlanStatus::Active | PlanStatus::Draft) {
            return Err(PlanDomainError::InvalidInitialStatus(status));
        }
        plan_data.validate()?;
        Ok(Self {
            project_id,
            created_by,
            plan_data,
            status,
            created_at: clock.utc(),
        })
    }
}

/// Partial update applied to the active plan; `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanPatch {
    /// Replacement plan body.
    pub plan_data: Option<PlanData>,
    /// Replacement status.
    pub status: Option<PlanStatus>,
}

impl ExecutionPlan {
    /// Reconstructs a plan from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPlanData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            created_by: data.created_by,
            plan_data: data.plan_data,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the plan identifier.
    #[must_use]
    pub const fn id(&self) -> PlanId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> Actor {
        self.created_by
    }

    /// Returns the plan body.
    #[must_use]
    pub const fn plan_data(&self) -> &PlanData {
        &self.plan_data
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> PlanStatus {
        self.status
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

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError`] when the replacement body fails
    /// validation.
    pub fn apply_patch(&mut self, patch: PlanPatch, clock: &impl Clock) -> Result<(), PlanDomainError> {
        if let Some(plan_data) = patch.plan_data.as_ref() {
            plan_data.validate()?;
        }

        if let Some(value) = patch.plan_data {
            self.plan_data = value;
        }
        if let Some(value) = patch.status {
            self.status = value;
        }
        self.updated_at = clock.utc();
        Ok(())
    }
}
