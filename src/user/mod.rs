//! User records for Stackflow.
//!
//! Users own projects, review tasks, and author plans. Credentials and
//! invitation flows live outside this crate; the module only keeps the
//! profile record. The module follows hexagonal architecture:
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
