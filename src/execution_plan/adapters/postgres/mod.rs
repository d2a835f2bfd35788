//! `PostgreSQL` adapters for execution plan persistence.

mod models;
mod repository;
mod schema;

pub use repository::{ExecutionPgPool, PostgresExecutionStore};
