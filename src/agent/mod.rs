//! AI agent registration for Stackflow.
//!
//! Agents are project-scoped AI workers configured with a provider, a model,
//! and generation parameters. They receive task assignments through the
//! [`crate::execution_plan`] dispatcher. Provider credentials are managed
//! outside this crate. The module follows hexagonal architecture:
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
