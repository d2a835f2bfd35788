//! Port contracts for task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod activity_log;
pub mod repository;

pub use activity_log::TaskActivityLog;
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
