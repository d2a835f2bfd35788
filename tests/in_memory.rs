//! In-memory integration tests across the wired application services.
//!
//! Tests are organized into modules by functionality:
//! - `workflow_tests`: Planning, dispatch, and completion end to end
//! - `replanning_tests`: Superseding plans and retiring deleted tasks
//! - `report_tests`: Report snapshots and project statistics

mod in_memory {
    pub mod helpers;

    mod replanning_tests;
    mod report_tests;
    mod workflow_tests;
}
