//! Authentication API handlers

use axum::{extract::State, http::header, http::HeaderMap, Extension, Json};

use super::dto::{LoginRequest, RegisterRequest, TokenResponse, UpdateUserRequest};
use crate::domain::UserRepositoryInterface;
use crate::interfaces::http::common::{ApiError, MessageResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = MessageResponse),
        (status = 400, description = "Invalid username or weak password", body = MessageResponse),
        (status = 409, description = "Username already exists", body = MessageResponse)
    )
)]
pub async fn register<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .users
        .register(&request.name, &request.username, &request.password)
        .await?;
    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse)
    )
)]
pub async fn login<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state.users.login(&request.username, &request.password).await?;
    Ok(Json(TokenResponse {
        jwt_token: issued.token,
    }))
}

/// Answers `true` or `false`; never an error status.
#[utoipa::path(
    get,
    path = "/api/auth/validate",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Whether the bearer token is currently valid", body = bool)
    )
)]
pub async fn validate<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
) -> Json<bool> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    Json(state.users.validate_authorization(header).await)
}

#[utoipa::path(
    post,
    path = "/api/auth/update",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User details updated", body = MessageResponse),
        (status = 400, description = "Missing user id or invalid values", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
        (status = 403, description = "User id is not the caller's own", body = MessageResponse),
        (status = 404, description = "User not found", body = MessageResponse),
        (status = 409, description = "Username already exists", body = MessageResponse)
    )
)]
pub async fn update<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.users.update(caller.user_id, request.into()).await?;
    Ok(Json(MessageResponse::new(message)))
}
