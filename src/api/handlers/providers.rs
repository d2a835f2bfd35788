//! `/api/providers` handlers.

use crate::{
    api::{ApiError, AppState, CurrentActor},
    provider::{Provider, ProviderModel},
};
use axum::{
    Json,
    extract::{Path, State},
};

/// GET /api/providers
pub(crate) async fn list_providers(
    State(state): State<AppState>,
    _actor: CurrentActor,
) -> Json<Vec<Provider>> {
    Json(state.providers.list().to_vec())
}

/// GET /api/providers/{name}
pub(crate) async fn get_provider(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(name): Path<String>,
) -> Result<Json<Provider>, ApiError> {
    Ok(Json(state.providers.find(&name)?.clone()))
}

/// GET /api/providers/{name}/models
pub(crate) async fn list_models(
    State(state): State<AppState>,
    _actor: CurrentActor,
    Path(name): Path<String>,
) -> Result<Json<Vec<ProviderModel>>, ApiError> {
    Ok(Json(state.providers.models(&name)?.to_vec()))
}
