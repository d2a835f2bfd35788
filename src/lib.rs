//! Stackflow: project coordination backend for human and AI agent teams.
//!
//! This crate provides the core of the Stackflow service: users, projects,
//! AI agents, tasks with a validated status lifecycle, and execution plans
//! that dispatch task assignments to agents.
//!
//! # Architecture
//!
//! Stackflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task records, status state machine, and activity log
//! - [`execution_plan`]: Execution plans, agent assignments, and reports
//! - [`agent`]: AI agent registration
//! - [`project`]: Project records and statistics
//! - [`user`]: User records
//! - [`provider`]: Static LLM provider catalog
//! - [`api`]: HTTP surface
//! - [`config`]: Application configuration
//! - [`telemetry`]: Logging initialisation

mod ids;

pub mod actor;
pub mod agent;
pub mod api;
pub mod config;
pub mod document;
pub mod execution_plan;
pub mod project;
pub mod provider;
pub mod task;
pub mod telemetry;
pub mod user;
