//! Authentication HTTP Handlers
//!
//! Thin axum adapter over [`AuthService`].

use crate::error::AuthError;
use crate::extractors::{AuthUser, ClientInfo};
use crate::middleware;
use crate::models::*;
use crate::service::AuthService;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared auth service state
pub type AuthState = Arc<AuthService>;

// ============================================
// Route Builder
// ============================================

/// Create authentication routes
pub fn create_routes(auth_service: AuthState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected = Router::new()
        .route("/auth/me", get(get_current_user))
        .layer(axum_middleware::from_fn_with_state(
            auth_service.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(auth_service)
}

/// Unwrap a JSON body, reporting unreadable bodies as validation errors
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AuthError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()))
}

// ============================================
// Registration
// ============================================

/// POST /auth/register
pub async fn register(
    State(auth): State<AuthState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let req = json_body(payload)?;

    auth.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}

// ============================================
// Login
// ============================================

/// POST /auth/login
pub async fn login(
    State(auth): State<AuthState>,
    ClientInfo { ip, user_agent }: ClientInfo,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let req = json_body(payload)?;

    let response = auth.login(req).await.map_err(|e| {
        if e == AuthError::InvalidCredentials {
            tracing::info!(ip = ?ip, user_agent = ?user_agent, "Rejected login");
        }
        e
    })?;

    Ok(Json(response))
}

// ============================================
// Current User
// ============================================

/// GET /auth/me
pub async fn get_current_user(
    State(auth): State<AuthState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AuthError> {
    let profile = auth.current_user(&user.claims).await?;

    Ok(Json(serde_json::json!({ "user": profile })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::store::InMemoryCredentialStore;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let auth = AuthService::new(
            AuthConfig::for_tests(),
            Arc::new(InMemoryCredentialStore::new()),
        )
        .unwrap();
        create_routes(Arc::new(auth))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response: Response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn scenario_user() -> Value {
        json!({
            "email": "a@x.com",
            "password": "Pw1!",
            "firstName": "A",
            "lastName": "B"
        })
    }

    #[tokio::test]
    async fn test_register_login_scenario() {
        let app = app();

        let (status, body) = send(&app, post_json("/auth/register", scenario_user())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "message": "Registration successful" }));

        let (status, body) = send(
            &app,
            post_json("/auth/login", json!({ "email": "a@x.com", "password": "Pw1!" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(
            body["user"],
            json!({ "firstName": "A", "lastName": "B", "email": "a@x.com" })
        );

        let (status, body) = send(
            &app,
            post_json("/auth/login", json!({ "email": "a@x.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_credentials");

        let (status, body) = send(&app, post_json("/auth/register", scenario_user())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate_account");
    }

    #[tokio::test]
    async fn test_unknown_email_response_matches_wrong_password() {
        let app = app();
        send(&app, post_json("/auth/register", scenario_user())).await;

        let wrong = send(
            &app,
            post_json("/auth/login", json!({ "email": "a@x.com", "password": "nope" })),
        )
        .await;
        let unknown = send(
            &app,
            post_json("/auth/login", json!({ "email": "b@x.com", "password": "nope" })),
        )
        .await;

        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn test_missing_fields_are_bad_request() {
        let app = app();

        let (status, body) = send(
            &app,
            post_json("/auth/register", json!({ "email": "a@x.com", "password": "Pw1!" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let (status, _) = send(&app, post_json("/auth/login", json!({ "email": "a@x.com" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();
        let req = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_me_requires_valid_token() {
        let app = app();
        send(&app, post_json("/auth/register", scenario_user())).await;
        let (_, login) = send(
            &app,
            post_json("/auth/login", json!({ "email": "a@x.com", "password": "Pw1!" })),
        )
        .await;
        let token = login["token"].as_str().unwrap();

        let me = |auth: Option<String>| {
            let mut builder = Request::builder().uri("/auth/me");
            if let Some(value) = auth {
                builder = builder.header(header::AUTHORIZATION, value);
            }
            builder.body(Body::empty()).unwrap()
        };

        let (status, body) = send(&app, me(Some(format!("Bearer {}", token)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["firstName"], "A");

        let (status, body) = send(&app, me(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");

        let (status, body) = send(&app, me(Some("Bearer garbage".to_string()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_response_never_contains_hash() {
        let app = app();
        send(&app, post_json("/auth/register", scenario_user())).await;

        let (_, body) = send(
            &app,
            post_json("/auth/login", json!({ "email": "a@x.com", "password": "Pw1!" })),
        )
        .await;

        assert!(!body.to_string().contains("argon2"));
    }
}
