//! User management API handlers
//!
//! Authenticated CRUD endpoints. Delegates to `UserService` from the
//! application/identity layer.

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{InsertUserRequest, ReplaceUserRequest, UserDto};
use crate::domain::UserRepositoryInterface;
use crate::interfaces::http::common::{ApiError, MessageResponse};
use crate::interfaces::http::AppState;

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = [UserDto]),
        (status = 401, description = "Unauthorized", body = MessageResponse)
    )
)]
pub async fn list_users<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "Not found", body = MessageResponse)
    )
)]
pub async fn get_user<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state.users.get_user(id).await?;
    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/user/register",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = InsertUserRequest,
    responses(
        (status = 200, description = "User inserted", body = UserDto),
        (status = 409, description = "Username already exists", body = MessageResponse)
    )
)]
pub async fn insert_user<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    Json(request): Json<InsertUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .users
        .insert_user(&request.name, &request.username, &request.password)
        .await?;
    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    request_body = ReplaceUserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse),
        (status = 409, description = "Username already exists", body = MessageResponse)
    )
)]
pub async fn replace_user<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
    Json(request): Json<ReplaceUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.users.replace_user(id, request.into()).await?;
    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "Not found", body = MessageResponse)
    )
)]
pub async fn delete_user<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.users.delete(id).await?;
    Ok(Json(MessageResponse::new(message)))
}
