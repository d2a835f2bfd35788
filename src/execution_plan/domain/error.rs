//! Error types for execution plan domain validation and parsing.

use super::{AssignmentId, AssignmentStatus, PlanStatus};
use crate::task::domain::TaskId;
use thiserror::Error;

/// Errors returned while constructing or changing plans and assignments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanDomainError {
    /// New plans may only start out `active` or `draft`.
    #[error("a new plan cannot start as {0}")]
    InvalidInitialStatus(PlanStatus),

    /// The minimum test coverage is above 100 percent.
    #[error("minimum test coverage must be at most 100 (got {0})")]
    TestCoverageOutOfRange(u32),

    /// A task appears more than once in the priority list.
    #[error("task {0} is listed more than once in the plan")]
    DuplicatePlanItem(TaskId),

    /// A plan item lists itself as a dependency.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// The assignment status change is not allowed.
    #[error("assignment {id} cannot move from {from} to {to}")]
    InvalidAssignmentTransition {
        /// Assignment the change was attempted on.
        id: AssignmentId,
        /// Current status.
        from: AssignmentStatus,
        /// Requested status.
        to: AssignmentStatus,
    },
}

/// Error returned while parsing plan statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown plan status: {0}")]
pub struct ParsePlanStatusError(pub String);

/// Error returned while parsing assignment statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown assignment status: {0}")]
pub struct ParseAssignmentStatusError(pub String);

/// Error returned while parsing report types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown report type: {0}")]
pub struct ParseReportTypeError(pub String);
