//! Domain model for agent registration.
//!
//! The agent domain models validated agent names, role and seniority
//! classification, generation settings, and runtime status. All
//! infrastructure concerns are kept outside the domain boundary.

mod agent;
mod config;
mod error;
mod name;
mod profile;
mod status;

pub use agent::{Agent, AgentId, AgentPatch, NewAgent, PersistedAgentData};
pub use config::AgentConfig;
pub use error::{AgentDomainError, ParseAgentProfileError};
pub use name::AgentName;
pub use profile::{AgentLevel, AgentRole};
pub use status::AgentStatus;
