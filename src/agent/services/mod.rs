//! Application services for agent registration.

mod registry;

pub use registry::{
    AgentRegistryService, AgentRegistryServiceError, AgentRegistryServiceResult,
    RegisterAgentRequest,
};
