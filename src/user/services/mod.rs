//! Application services for user management.

mod directory;

pub use directory::{
    CreateUserRequest, UserDirectoryError, UserDirectoryResult, UserDirectoryService,
};
