//! Route handlers, one module per resource.

pub(super) mod agents;
pub(super) mod plans;
pub(super) mod projects;
pub(super) mod providers;
pub(super) mod reports;
pub(super) mod tasks;
pub(super) mod users;

use super::ApiError;
use axum::body::Bytes;
use serde::de::DeserializeOwned;

/// Parses an optional JSON body; an empty body yields the default value.
fn optional_body<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| ApiError::bad_request(&err))
}
