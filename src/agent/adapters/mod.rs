//! Adapter implementations for agent persistence.

pub mod memory;
pub mod postgres;
