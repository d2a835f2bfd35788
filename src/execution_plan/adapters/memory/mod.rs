//! In-memory adapters for execution plan persistence.

mod store;

pub use store::InMemoryExecutionStore;
