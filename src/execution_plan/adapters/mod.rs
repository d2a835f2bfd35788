//! Adapter implementations for execution plan persistence.

pub mod memory;
pub mod postgres;
