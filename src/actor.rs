//! Authenticated actors attributed on tasks, activities, plans, and reports.

use crate::{agent::domain::AgentId, user::domain::UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Party performing an operation: a human user or an AI agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// A human user.
    User(UserId),
    /// An AI agent.
    Agent(AgentId),
}

/// Discriminant of an [`Actor`], persisted next to the actor identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A human user.
    User,
    /// An AI agent.
    Agent,
}

impl ActorKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ActorKind {
    type Error = ParseActorKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "user" => Ok(Self::User),
            "agent" => Ok(Self::Agent),
            _ => Err(ParseActorKindError(value.to_owned())),
        }
    }
}

/// Error returned while parsing actor kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown actor kind: {0}")]
pub struct ParseActorKindError(pub String);

impl Actor {
    /// Returns the actor discriminant.
    #[must_use]
    pub const fn kind(self) -> ActorKind {
        match self {
            Self::User(_) => ActorKind::User,
            Self::Agent(_) => ActorKind::Agent,
        }
    }

    /// Returns the raw identifier of the user or agent.
    #[must_use]
    pub const fn id_value(self) -> i64 {
        match self {
            Self::User(id) => id.value(),
            Self::Agent(id) => id.value(),
        }
    }

    /// Rebuilds an actor from its persisted kind and identifier columns.
    ///
    /// # Errors
    ///
    /// Returns [`ParseActorKindError`] when the kind is not recognised.
    pub fn from_parts(kind: &str, id: i64) -> Result<Self, ParseActorKindError> {
        Ok(match ActorKind::try_from(kind)? {
            ActorKind::User => Self::User(UserId::new(id)),
            ActorKind::Agent => Self::Agent(AgentId::new(id)),
        })
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_value())
    }
}
