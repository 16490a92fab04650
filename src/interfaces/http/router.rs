//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{any, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::middleware::auth_middleware;
use super::modules::{auth, health, users};
use super::AppState;
use crate::domain::UserRepositoryInterface;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::validate,
        auth::update,
        users::list_users,
        users::get_user,
        users::insert_user,
        users::replace_user,
        users::delete_user,
    ),
    components(schemas(
        health::HealthResponse,
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::TokenResponse,
        auth::UpdateUserRequest,
        users::UserDto,
        users::InsertUserRequest,
        users::ReplaceUserRequest,
        super::common::MessageResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Registration, login (JWT), token validation, self-service update"),
        (name = "Users", description = "User administration"),
    )
)]
pub struct ApiDoc;

/// Build the full application router.
pub fn create_api_router<R: UserRepositoryInterface + 'static>(state: AppState<R>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public
    let public_routes = Router::new()
        .route("/health", get(health::health_check::<R>))
        .route("/api/auth/register", post(auth::register::<R>))
        .route("/api/auth/login", post(auth::login::<R>))
        .route("/api/auth/validate", any(auth::validate::<R>));

    // Bearer token required
    let protected_routes = Router::new()
        .route("/api/auth/update", post(auth::update::<R>))
        .route("/api/user", get(users::list_users::<R>))
        .route("/api/user/register", post(users::insert_user::<R>))
        .route(
            "/api/user/{id}",
            get(users::get_user::<R>)
                .put(users::replace_user::<R>)
                .delete(users::delete_user::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<R>,
        ));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(swagger_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::application::UserService;
    use crate::infrastructure::crypto::{JwtConfig, JwtService, PasswordHasher};
    use crate::infrastructure::InMemoryUserRepository;

    fn app() -> Router {
        let jwt = Arc::new(JwtService::new(&JwtConfig::new("router-test", 10)));
        let users = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            jwt,
            PasswordHasher::new(4),
        );
        create_api_router(AppState::new(Arc::new(users)))
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(req).await.unwrap()
    }

    async fn json_body(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn register_and_login(app: &Router, username: &str) -> String {
        let resp = send(
            app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "Ann", "username": username, "password": "Secret1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(
            app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": username, "password": "Secret1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        json_body(resp).await["jwtToken"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn register_login_validate_flow() {
        let app = app();
        let token = register_and_login(&app, "ann@x.com").await;

        let resp = send(&app, "GET", "/api/auth/validate", Some(&token), None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!(true));
    }

    #[tokio::test]
    async fn validate_without_header_is_false() {
        let app = app();
        let resp = send(&app, "GET", "/api/auth/validate", None, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!(false));
    }

    #[tokio::test]
    async fn register_rejects_bad_username_with_message() {
        let app = app();
        let resp = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "Ann", "username": "ann", "password": "Secret1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(resp).await["message"].is_string());
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let app = app();
        register_and_login(&app, "ann@x.com").await;

        let resp = send(
            &app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"name": "Other", "username": "ann@x.com", "password": "Secret1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = app();
        register_and_login(&app, "ann@x.com").await;

        let resp = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "ann@x.com", "password": "Wrong1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        let app = app();
        let resp = send(&app, "GET", "/api/user", None, None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = send(&app, "GET", "/api/user", Some("garbage"), None).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_crud_with_token() {
        let app = app();
        let token = register_and_login(&app, "ann@x.com").await;

        let resp = send(
            &app,
            "POST",
            "/api/user/register",
            Some(&token),
            Some(json!({"name": "Bob", "username": "bob@x.com", "password": "Secret1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let bob = json_body(resp).await;
        assert!(bob.get("password_hash").is_none());
        let bob_id = bob["id"].as_i64().unwrap();

        let resp = send(&app, "GET", "/api/user", Some(&token), None).await;
        assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);

        let uri = format!("/api/user/{}", bob_id);
        let resp = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn self_update_changes_name() {
        let app = app();
        let token = register_and_login(&app, "ann@x.com").await;

        let resp = send(
            &app,
            "POST",
            "/api/auth/update",
            Some(&token),
            Some(json!({"userId": 1, "name": "Annie"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = send(&app, "GET", "/api/user/1", Some(&token), None).await;
        assert_eq!(json_body(resp).await["name"], json!("Annie"));
    }

    #[tokio::test]
    async fn update_with_another_users_token_is_forbidden() {
        let app = app();
        register_and_login(&app, "ann@x.com").await;
        let bob_token = register_and_login(&app, "bob@x.com").await;

        let resp = send(
            &app,
            "POST",
            "/api/auth/update",
            Some(&bob_token),
            Some(json!({"userId": 1, "password": "Hijack1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = send(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "ann@x.com", "password": "Hijack1!"})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn openapi_lists_auth_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/auth/login"));
        assert!(doc.paths.paths.contains_key("/api/user/{id}"));
    }
}
