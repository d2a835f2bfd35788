//! Execution plans, agent assignments, and execution reports.
//!
//! A plan orders a project's tasks and names the agent expected to work on
//! each one. Creating an active plan materialises one `pending` assignment
//! per staffed item; agents then pull their assignments in plan order
//! through the dispatcher, which hands out each assignment exactly once and
//! attaches the plan's constraints as context. Reports are immutable,
//! project-scoped documents. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
