//! Error types for user domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or patching user values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The username is outside the 3 to 50 character range.
    #[error("username must be between 3 and 50 characters: '{0}'")]
    InvalidUsername(String),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),
}

/// Error returned while parsing user roles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseUserRoleError(pub String);
