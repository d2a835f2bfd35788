//! Service layer for user records.

use crate::user::{
    domain::{NewUser, User, UserDomainError, UserId, UserPatch, UserRole},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    username: String,
    email: String,
    role: UserRole,
    avatar_url: Option<String>,
}

impl CreateUserRequest {
    /// Creates a request with required user fields and the default role.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            role: UserRole::default(),
            avatar_url: None,
        }
    }

    /// Sets the account role.
    #[must_use]
    pub const fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}

/// Service-level errors for user operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

/// Result type for user service operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User management service.
#[derive(Clone)]
pub struct UserDirectoryService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserDirectoryService<R, C>
where
    R: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new user service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError`] when validation fails or the username
    /// or email is already taken.
    pub async fn create(&self, request: CreateUserRequest) -> UserDirectoryResult<User> {
        let CreateUserRequest {
            username,
            email,
            role,
            avatar_url,
        } = request;

        let mut new_user = NewUser::new(username, email, role, &*self.clock)?;
        if let Some(url) = avatar_url {
            new_user = new_user.with_avatar_url(url);
        }
        let user = self.repository.create(&new_user).await?;
        tracing::info!(user_id = %user.id(), username = user.username(), "user created");
        Ok(user)
    }

    /// Finds a user by identifier.
    ///
    /// Returns `Ok(None)` when no user has the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Loads a user that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::NotFound`] (wrapped) when the user does
    /// not exist.
    pub async fn get(&self, id: UserId) -> UserDirectoryResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserRepositoryError::NotFound(id).into())
    }

    /// Returns all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when persistence lookup
    /// fails.
    pub async fn list(&self) -> UserDirectoryResult<Vec<User>> {
        Ok(self.repository.list().await?)
    }

    /// Applies a partial update to a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError`] when the user does not exist, a field
    /// fails validation, or a unique field collides.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> UserDirectoryResult<User> {
        let mut user = self.get(id).await?;
        user.apply_patch(patch, &*self.clock)?;
        self.repository.update(&user).await?;
        Ok(user)
    }

    /// Deletes a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when the user does not
    /// exist or persistence fails.
    pub async fn delete(&self, id: UserId) -> UserDirectoryResult<()> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
