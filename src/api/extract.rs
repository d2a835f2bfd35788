//! Request extractors.

use super::ApiError;
use crate::{actor::Actor, agent::domain::AgentId, user::domain::UserId};
use axum::{extract::FromRequestParts, http::request::Parts};

/// The authenticated actor placed in the request extensions by the
/// authentication layer in front of the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentActor(pub Actor);

impl CurrentActor {
    /// Returns the user id, rejecting agent actors.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] when the actor is an agent.
    pub fn require_user(self) -> Result<UserId, ApiError> {
        match self.0 {
            Actor::User(id) => Ok(id),
            Actor::Agent(_) => Err(ApiError::Forbidden(
                "this operation requires a user".to_owned(),
            )),
        }
    }

    /// Allows users, and the agent itself, to act on an agent's queue.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] when a different agent is acting.
    pub fn require_agent_access(self, agent_id: AgentId) -> Result<(), ApiError> {
        match self.0 {
            Actor::Agent(id) if id != agent_id => Err(ApiError::Forbidden(format!(
                "agent {id} may not act for agent {agent_id}"
            ))),
            Actor::User(_) | Actor::Agent(_) => Ok(()),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .copied()
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}
