//! Port contracts for execution plans, assignments, and reports.
//!
//! The three ports share one error type since a single store backs them and
//! plan writes cascade into assignments.

pub mod assignment_repository;
pub mod plan_repository;
pub mod report_repository;

pub use assignment_repository::AssignmentRepository;
pub use plan_repository::{ExecutionPlanRepository, ExecutionStoreError, ExecutionStoreResult};
pub use report_repository::ExecutionReportRepository;
