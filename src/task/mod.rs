//! Task tracking for Stackflow.
//!
//! This module owns project tasks, their validated status lifecycle
//! (`open → in_progress → done → closed`, plus `wont_do` and reopening), and
//! the append-only activity log recording every change. Status changes are
//! applied with compare-and-set updates so concurrent transitions never skip
//! an edge of the state machine. The module follows hexagonal architecture:
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
