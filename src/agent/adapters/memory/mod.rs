//! In-memory adapters for agent persistence.

mod agent_registry;

pub use agent_registry::InMemoryAgentRegistry;
