//! Domain model for execution plans, assignments, and reports.

mod assignment;
mod context;
mod error;
mod plan;
mod plan_data;
mod report;
mod status;

pub use assignment::{
    AgentAssignment, AssignmentDetails, AssignmentId, NewAgentAssignment,
    PersistedAssignmentData,
};
pub use context::AgentContext;
pub use error::{
    ParseAssignmentStatusError, ParsePlanStatusError, ParseReportTypeError, PlanDomainError,
};
pub use plan::{
    ExecutionPlan, NewExecutionPlan, PersistedPlanData, PlanDetails, PlanId, PlanPatch,
};
pub use plan_data::{PlanConstraints, PlanData, TaskPriorityItem};
pub use report::{ExecutionReport, NewExecutionReport, PersistedReportData, ReportId, ReportType};
pub use status::{AssignmentStatus, PlanStatus};
