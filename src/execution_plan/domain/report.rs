//! Immutable execution reports.

use super::ParseReportTypeError;
use crate::{actor::Actor, document::Document, ids::integer_id, project::domain::ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

integer_id! {
    /// Store-assigned report identifier.
    ReportId
}

/// Kind of execution report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Daily stand-up style report.
    Daily,
    /// Weekly summary.
    Weekly,
    /// Ad-hoc report.
    Custom,
    /// End-of-plan summary.
    Summary,
}

impl ReportType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Custom => "custom",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportType {
    type Error = ParseReportTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "custom" => Ok(Self::Custom),
            "summary" => Ok(Self::Summary),
            _ => Err(ParseReportTypeError(value.to_owned())),
        }
    }
}

/// Report generated for a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    id: ReportId,
    project_id: ProjectId,
    report_type: ReportType,
    generated_by: Actor,
    #[serde(rename = "report_data")]
    report: Document,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted report.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedReportData {
    /// Persisted report identifier.
    pub id: ReportId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Report kind.
    pub report_type: ReportType,
    /// Generator.
    pub generated_by: Actor,
    /// Report body.
    pub report: Document,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Report that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExecutionReport {
    /// Owning project.
    pub project_id: ProjectId,
    /// Report kind.
    pub report_type: ReportType,
    /// Generator.
    pub generated_by: Actor,
    /// Report body.
    pub report: Document,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ExecutionReport {
    /// Reconstructs a report from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedReportData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            report_type: data.report_type,
            generated_by: data.generated_by,
            report: data.report,
            created_at: data.created_at,
        }
    }

    /// Returns the report identifier.
    #[must_use]
    pub const fn id(&self) -> ReportId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the report kind.
    #[must_use]
    pub const fn report_type(&self) -> ReportType {
        self.report_type
    }

    /// Returns the generator.
    #[must_use]
    pub const fn generated_by(&self) -> Actor {
        self.generated_by
    }

    /// Returns the report body.
    #[must_use]
    pub const fn report(&self) -> &Document {
        &self.report
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
