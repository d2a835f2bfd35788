//! `/api/users` handlers.

use crate::{
    api::{ApiError, AppState, CurrentActor},
    user::{
        domain::{User, UserId, UserPatch, UserRole},
        services::CreateUserRequest,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateUserBody {
    username: String,
    email: String,
    #[serde(default)]
    role: UserRole,
    avatar_url: Option<String>,
}

/// GET /api/users
pub(crate) async fn list_users(
    State(state): State<AppState>,
    _actor: CurrentActor,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list().await?))
}

/// POST /api/users
pub(crate) async fn create_user(
    State(state): State<AppState>,
    actor: CurrentActor,
    Json(body): Json<CreateUserBody>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    actor.require_user()?;
    let CreateUserBody {
        username,
        email,
        role,
        avatar_url,
    } = body;
    let mut request = CreateUserRequest::new(username, email).with_role(role);
    if let Some(url) = avatar_url {
        request = request.with_avatar_url(url);
    }
    let user = state.users.create(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{id}
pub(crate) async fn get_user(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get(id).await?))
}

/// PUT /api/users/{id}
pub(crate) async fn update_user(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<UserId>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    actor.require_user()?;
    Ok(Json(state.users.update(id, patch).await?))
}

/// DELETE /api/users/{id}
pub(crate) async fn delete_user(
    State(state): State<AppState>,
    actor: CurrentActor,
    Path(id): Path<UserId>,
) -> Result<StatusCode, ApiError> {
    actor.require_user()?;
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
