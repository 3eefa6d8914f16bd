//! User endpoints.

use super::AppState;
use crate::domain::error::{success, ApiError};
use crate::domain::types::{CreateUserRequest, UserAuthQuery};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;

/// `PUT /user/create` - register a caller, return the assigned uuid.
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .service
        .create_user(&request.pub_key, &request.timestamp, &request.signature)
        .await?;
    Ok(success(user))
}

/// `GET /user/:uuid?timestamp&signature` - fetch a user record.
pub async fn get_user(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Query(query): Query<UserAuthQuery>,
) -> Result<Response, ApiError> {
    let user = state
        .service
        .get_user(&uuid, &query.timestamp, &query.signature)
        .await?;
    Ok(success(user))
}
