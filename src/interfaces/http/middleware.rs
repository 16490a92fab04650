//! Bearer-token authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::common::MessageResponse;
use super::AppState;
use crate::domain::{User, UserRepositoryInterface};
use crate::infrastructure::crypto::jwt::bearer_token;

/// The identity a request was authenticated as.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

/// Rejects requests without a currently valid `Authorization: Bearer` token.
/// On success the caller's identity is attached as an `AuthenticatedUser`
/// request extension.
pub async fn auth_middleware<R: UserRepositoryInterface + 'static>(
    State(state): State<AppState<R>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned);

    let Some(token) = token else {
        return unauthorized("Missing authentication token");
    };

    match state.users.authorize(&token).await {
        Some(user) => {
            request.extensions_mut().insert(AuthenticatedUser::from(user));
            next.run(request).await
        }
        None => unauthorized("Invalid authentication token"),
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(MessageResponse::new(message))).into_response()
}
