//! Error types for project domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or patching projects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is outside the 3 to 100 character range.
    #[error("project name must be between 3 and 100 characters: '{0}'")]
    InvalidName(String),

    /// The description exceeds the 500-character limit.
    #[error("project description exceeds 500 character limit ({0} characters)")]
    DescriptionTooLong(usize),
}

/// Error returned while parsing project statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown project status: {0}")]
pub struct ParseProjectStatusError(pub String);
