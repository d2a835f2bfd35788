//! Domain model for user records.

mod error;
mod role;
mod user;

pub use error::{ParseUserRoleError, UserDomainError};
pub use role::UserRole;
pub use user::{NewUser, PersistedUserData, User, UserId, UserPatch};
