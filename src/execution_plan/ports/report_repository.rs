//! Repository port for execution reports.

use super::ExecutionStoreResult;
use crate::{
    execution_plan::domain::{ExecutionReport, NewExecutionReport, ReportType},
    project::domain::ProjectId,
};
use async_trait::async_trait;

/// Report persistence contract. Reports are never modified once stored.
#[async_trait]
pub trait ExecutionReportRepository: Send + Sync {
    /// Stores a new report.
    async fn create_report(&self, report: &NewExecutionReport)
    -> ExecutionStoreResult<ExecutionReport>;

    /// Returns the reports of a project, newest first, optionally narrowed to
    /// one kind.
    async fn list_reports(
        &self,
        project_id: ProjectId,
        report_type: Option<ReportType>,
    ) -> ExecutionStoreResult<Vec<ExecutionReport>>;
}
