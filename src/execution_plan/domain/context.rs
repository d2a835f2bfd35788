//! Plan-level guidance handed to agents with their work.

use super::{ExecutionPlan, PlanConstraints, PlanId};
use serde::{Deserialize, Serialize};

/// Constraints and notes of the plan an agent is working under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContext {
    /// Source plan.
    pub plan_id: PlanId,
    /// Global constraints.
    pub constraints: PlanConstraints,
    /// Areas to concentrate on.
    pub focus_areas: Vec<String>,
    /// Free-form guidance.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub notes: String,
}

impl From<&ExecutionPlan> for AgentContext {
    fn from(plan: &ExecutionPlan) -> Self {
        let data = plan.plan_data();
        Self {
            plan_id: plan.id(),
            constraints: data.constraints,
            focus_areas: data.focus_areas.clone(),
            notes: data.notes.clone(),
        }
    }
}
