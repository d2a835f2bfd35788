//! `PostgreSQL` repository implementation for users.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::user::{
    domain::{NewUser, PersistedUserData, User, UserId, UserRole},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by user adapters.
pub type UserPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: UserPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: UserPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let new_row = NewUserRow {
            username: user.username.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            role: user.role.as_str().to_owned(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.created_at,
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(users::table)
                .values(&new_row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .map_err(|err| map_unique_violation(err, &new_row.username, &new_row.email))?;
            row_to_user(row)
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let id = user.id();
        let username = user.username().to_owned();
        let email = user.email().to_owned();
        let avatar_url = user.avatar_url().to_owned();
        let role = user.role().as_str().to_owned();
        let is_active = user.is_active();
        let updated_at = user.updated_at();

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(users::table.filter(users::id.eq(id.value())))
                .set((
                    users::username.eq(&username),
                    users::email.eq(&email),
                    users::avatar_url.eq(&avatar_url),
                    users::role.eq(&role),
                    users::is_active.eq(is_active),
                    users::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|err| map_unique_violation(err, &username, &email))?;

            if updated_count == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .order((users::created_at.desc(), users::id.desc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(users::table.filter(users::id.eq(id.value())))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let role =
        UserRole::try_from(row.role.as_str()).map_err(UserRepositoryError::invalid_persisted_data)?;
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::new(row.id),
        username: row.username,
        email: row.email,
        avatar_url: row.avatar_url,
        role,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn map_unique_violation(err: DieselError, username: &str, email: &str) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_constraint(info.as_ref(), "users_username_key") =>
        {
            UserRepositoryError::DuplicateUsername(username.to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_constraint(info.as_ref(), "users_email_key") =>
        {
            UserRepositoryError::DuplicateEmail(email.to_owned())
        }
        _ => UserRepositoryError::persistence(err),
    }
}

fn is_constraint(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}
