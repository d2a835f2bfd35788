//! In-memory repository for user tests and local runs.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::user::{
    domain::{NewUser, PersistedUserData, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    last_id: i64,
    users: BTreeMap<UserId, User>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> UserRepositoryResult<RwLockReadGuard<'_, InMemoryUserState>> {
        self.state
            .read()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> UserRepositoryResult<RwLockWriteGuard<'_, InMemoryUserState>> {
        self.state
            .write()
            .map_err(|err| UserRepositoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

fn ensure_unique(
    state: &InMemoryUserState,
    username: &str,
    email: &str,
    except: Option<UserId>,
) -> UserRepositoryResult<()> {
    let others = state
        .users
        .values()
        .filter(|existing| Some(existing.id()) != except);
    for existing in others {
        if existing.username() == username {
            return Err(UserRepositoryError::DuplicateUsername(username.to_owned()));
        }
        if existing.email() == email {
            return Err(UserRepositoryError::DuplicateEmail(email.to_owned()));
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let mut state = self.write()?;
        ensure_unique(&state, &user.username, &user.email, None)?;

        state.last_id += 1;
        let stored = User::from_persisted(PersistedUserData {
            id: UserId::new(state.last_id),
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.created_at,
        });
        state.users.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::NotFound(user.id()));
        }
        ensure_unique(&state, user.username(), user.email(), Some(user.id()))?;
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn list(&self) -> UserRepositoryResult<Vec<User>> {
        Ok(self.read()?.users.values().rev().cloned().collect())
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.write()?
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(UserRepositoryError::NotFound(id))
    }
}
