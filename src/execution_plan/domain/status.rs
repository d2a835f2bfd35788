//! Plan and assignment statuses.

use super::{ParseAssignmentStatusError, ParsePlanStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an execution plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// The plan drives dispatch for its project.
    #[default]
    Active,
    /// The plan ran to completion.
    Completed,
    /// The plan was abandoned or superseded.
    Cancelled,
    /// The plan is being prepared and dispatches nothing.
    Draft,
}

impl PlanStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Draft => "draft",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PlanStatus {
    type Error = ParsePlanStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "draft" => Ok(Self::Draft),
            _ => Err(ParsePlanStatusError(value.to_owned())),
        }
    }
}

/// Lifecycle status of an agent assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Waiting to be handed to the agent.
    #[default]
    Pending,
    /// Handed to the agent and being worked on.
    InProgress,
    /// The agent reported completion.
    Completed,
    /// The agent gave up.
    Failed,
    /// Withdrawn before completion.
    Skipped,
}

impl AssignmentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// Returns `true` for `pending` and `in_progress`.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Returns `true` when an assignment may move from `self` to `target`.
    ///
    /// Only pending assignments can start; any live assignment can end.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        match target {
            Self::Pending => false,
            Self::InProgress => matches!(self, Self::Pending),
            Self::Completed | Self::Failed | Self::Skipped => self.is_live(),
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AssignmentStatus {
    type Error = ParseAssignmentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(ParseAssignmentStatusError(value.to_owned())),
        }
    }
}
